//! Typed client over the backend
//!
//! Binds one caller identity to a shared backend and converts between the
//! typed records in `crate::records` and the backend's JSON values.

use std::sync::Arc;

use serde_json::Value;

use super::errors::{BackendError, BackendResult};
use super::memory::MemoryBackend;
use super::page::ListOptions;
use crate::auth::{AuthContext, Authorizer, RuleAuthorizer};
use crate::records::{CreateUserProfile, Model, UserProfile};
use crate::schema::USER_ID;

/// Client acting as one caller
pub struct DataClient<A: Authorizer = RuleAuthorizer> {
    backend: Arc<MemoryBackend<A>>,
    ctx: AuthContext,
}

impl<A: Authorizer> Clone for DataClient<A> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            ctx: self.ctx.clone(),
        }
    }
}

impl<A: Authorizer> DataClient<A> {
    pub fn new(backend: Arc<MemoryBackend<A>>, ctx: AuthContext) -> Self {
        Self { backend, ctx }
    }

    pub fn context(&self) -> &AuthContext {
        &self.ctx
    }

    pub fn backend(&self) -> &MemoryBackend<A> {
        &self.backend
    }

    pub fn create<M: Model>(&self, input: &M::Create) -> BackendResult<M> {
        let value = serde_json::to_value(input)?;
        let record = self.backend.create(M::NAME, value, &self.ctx)?;
        Ok(serde_json::from_value(record)?)
    }

    pub fn get<M: Model>(&self, id: &str) -> BackendResult<M> {
        let record = self.backend.get(M::NAME, id, &self.ctx)?;
        Ok(serde_json::from_value(record)?)
    }

    /// Applies a partial update. `null` clears an optional field.
    pub fn update<M: Model>(&self, id: &str, patch: Value) -> BackendResult<M> {
        let record = self.backend.update(M::NAME, id, patch, &self.ctx)?;
        Ok(serde_json::from_value(record)?)
    }

    pub fn delete<M: Model>(&self, id: &str) -> BackendResult<M> {
        let record = self.backend.delete(M::NAME, id, &self.ctx)?;
        Ok(serde_json::from_value(record)?)
    }

    /// All records of `M` belonging to `user_id`, following every page.
    pub fn list_by_user<M: Model>(&self, user_id: &str) -> BackendResult<Vec<M>> {
        let mut items = Vec::new();
        let mut options = ListOptions::new();

        loop {
            let page = self
                .backend
                .query_index(M::NAME, USER_ID, user_id, &options, &self.ctx)?;

            for record in page.items {
                items.push(serde_json::from_value(record)?);
            }

            match page.next_token {
                Some(token) => options = options.after(token),
                None => break,
            }
        }

        Ok(items)
    }

    /// First profile for `user_id`, if any.
    pub fn profile_for_user(&self, user_id: &str) -> BackendResult<Option<UserProfile>> {
        let options = ListOptions::new().limit(1);
        let page = self
            .backend
            .query_index(UserProfile::NAME, USER_ID, user_id, &options, &self.ctx)?;

        page.items
            .into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(BackendError::from)
    }

    /// Returns the existing profile for the user or creates one.
    ///
    /// Not atomic across concurrent callers for the same user.
    pub fn ensure_profile(&self, input: &CreateUserProfile) -> BackendResult<UserProfile> {
        match self.profile_for_user(&input.user_id)? {
            Some(profile) => Ok(profile),
            None => self.create::<UserProfile>(input),
        }
    }
}
