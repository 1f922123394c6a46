//! # In-memory reference backend
//!
//! Consumes a `SchemaRegistry` and serves the operations a generated API
//! exposes for every declared model: create, get, update, delete, list and
//! query by secondary index. Each model's records and indexes sit behind
//! one lock, so a reader never sees a record without its index entries.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::errors::{BackendError, BackendResult};
use super::page::{decode_token, paginate, ListOptions, Page, PageLimits};
use crate::auth::{AuthContext, Authorizer, Operation, RuleAuthorizer};
use crate::index::IndexManager;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{
    json_type_name, validate_patch, validate_record, ModelDef, SchemaError, SchemaRegistry, ValidationDetails,
    ID_FIELD,
};

const CREATED_AT: &str = "created_at";
const UPDATED_AT: &str = "updated_at";

/// Records and indexes of one model
#[derive(Debug)]
struct Collection {
    /// Records by id, ascending
    records: BTreeMap<String, Value>,
    indexes: IndexManager,
}

impl Collection {
    fn new(model: &ModelDef) -> Self {
        Self {
            records: BTreeMap::new(),
            indexes: IndexManager::for_model(model),
        }
    }
}

/// In-memory backend for a registered declaration
pub struct MemoryBackend<A: Authorizer = RuleAuthorizer> {
    registry: SchemaRegistry,
    authorizer: A,
    collections: HashMap<String, RwLock<Collection>>,
    limits: PageLimits,
}

impl MemoryBackend<RuleAuthorizer> {
    /// Backend enforcing the rules declared on each model
    pub fn new(registry: SchemaRegistry) -> Self {
        Self::with_authorizer(registry, RuleAuthorizer::new())
    }
}

impl<A: Authorizer> MemoryBackend<A> {
    pub fn with_authorizer(registry: SchemaRegistry, authorizer: A) -> Self {
        let collections = registry
            .models()
            .map(|model| (model.name.clone(), RwLock::new(Collection::new(model))))
            .collect();

        Self {
            registry,
            authorizer,
            collections,
            limits: PageLimits::default(),
        }
    }

    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn page_limits(&self) -> PageLimits {
        self.limits
    }

    /// Creates a record with a generated id.
    ///
    /// Declared `created_at` / `updated_at` fields are filled with the
    /// current time unless the input sets them.
    pub fn create(&self, model: &str, input: Value, ctx: &AuthContext) -> BackendResult<Value> {
        let def = self.admit(model, Operation::Create, ctx)?;

        let actual = json_type_name(&input);
        let Value::Object(mut fields) = input else {
            return Err(self.rejected(
                def,
                SchemaError::validation_failed(
                    &def.name,
                    ValidationDetails::type_mismatch("$root", "object", actual),
                ),
            ));
        };

        if fields.contains_key(ID_FIELD) {
            return Err(BackendError::IdSystemGenerated);
        }

        let now = timestamp();
        for stamp in [CREATED_AT, UPDATED_AT] {
            if def.has_field(stamp) && fields.get(stamp).map_or(true, Value::is_null) {
                fields.insert(stamp.to_string(), Value::String(now.clone()));
            }
        }

        let mut coll = self.write(model)?;

        let mut id = Uuid::new_v4().to_string();
        while coll.records.contains_key(&id) {
            id = Uuid::new_v4().to_string();
        }
        fields.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        let record = Value::Object(fields);
        validate_record(def, &record).map_err(|e| self.rejected(def, e))?;

        coll.indexes.apply_write(&id, None, &record);
        coll.records.insert(id.clone(), record.clone());
        drop(coll);

        log_event_with_fields(Event::RecordCreated, &[("id", &id), ("model", &def.name)]);
        Ok(record)
    }

    /// Fetches a record by id.
    pub fn get(&self, model: &str, id: &str, ctx: &AuthContext) -> BackendResult<Value> {
        let def = self.admit(model, Operation::Read, ctx)?;

        let coll = self.read(model)?;
        coll.records
            .get(id)
            .cloned()
            .ok_or_else(|| BackendError::not_found(model, id))
    }

    /// Merges `patch` into an existing record.
    ///
    /// A `null` in the patch clears an optional field. A declared
    /// `updated_at` is refreshed unless the patch sets it.
    pub fn update(&self, model: &str, id: &str, patch: Value, ctx: &AuthContext) -> BackendResult<Value> {
        let def = self.admit(model, Operation::Update, ctx)?;
        validate_patch(def, id, &patch).map_err(|e| self.rejected(def, e))?;

        let mut coll = self.write(model)?;
        let existing = coll
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| BackendError::not_found(model, id))?;

        let mut merged = existing.clone();
        if let (Value::Object(base), Value::Object(changes)) = (&mut merged, &patch) {
            for (key, value) in changes {
                if value.is_null() {
                    base.remove(key);
                } else {
                    base.insert(key.clone(), value.clone());
                }
            }
            if def.has_field(UPDATED_AT) && !changes.contains_key(UPDATED_AT) {
                base.insert(UPDATED_AT.to_string(), Value::String(timestamp()));
            }
        }

        validate_record(def, &merged).map_err(|e| self.rejected(def, e))?;

        coll.indexes.apply_write(id, Some(&existing), &merged);
        coll.records.insert(id.to_string(), merged.clone());
        drop(coll);

        log_event_with_fields(Event::RecordUpdated, &[("id", id), ("model", &def.name)]);
        Ok(merged)
    }

    /// Deletes a record and returns it. Other models are never touched.
    pub fn delete(&self, model: &str, id: &str, ctx: &AuthContext) -> BackendResult<Value> {
        let def = self.admit(model, Operation::Delete, ctx)?;

        let mut coll = self.write(model)?;
        let record = coll
            .records
            .remove(id)
            .ok_or_else(|| BackendError::not_found(model, id))?;
        coll.indexes.apply_delete(id, &record);
        drop(coll);

        log_event_with_fields(Event::RecordDeleted, &[("id", id), ("model", &def.name)]);
        Ok(record)
    }

    /// Lists records in ascending id order.
    pub fn list(&self, model: &str, options: &ListOptions, ctx: &AuthContext) -> BackendResult<Page> {
        let def = self.admit(model, Operation::Read, ctx)?;

        let limit = self.limits.resolve(options.limit)?;
        let after = options.next_token.as_deref().map(decode_token).transpose()?;

        let coll = self.read(model)?;
        let lower = match &after {
            Some(id) => Bound::Excluded(id.clone()),
            None => Bound::Unbounded,
        };
        let records = coll.records.range((lower, Bound::Unbounded));

        Ok(paginate(records, &options.filter, limit))
    }

    /// Lists records whose indexed `field` equals `value`, in ascending id
    /// order.
    pub fn query_index(
        &self,
        model: &str,
        field: &str,
        value: &str,
        options: &ListOptions,
        ctx: &AuthContext,
    ) -> BackendResult<Page> {
        let def = self.admit(model, Operation::Read, ctx)?;

        let limit = self.limits.resolve(options.limit)?;
        let after = options.next_token.as_deref().map(decode_token).transpose()?;

        let coll = self.read(model)?;
        let ids = coll.indexes.lookup_eq(field, value)?;

        let records = ids
            .iter()
            .filter(|id| after.as_ref().map_or(true, |after| id.as_str() > after.as_str()))
            .filter_map(|id| coll.records.get_key_value(id));

        Ok(paginate(records, &options.filter, limit))
    }

    /// Resolves the model for an authenticated caller. Anonymous callers
    /// are rejected before the model is looked up.
    fn admit(&self, model: &str, operation: Operation, ctx: &AuthContext) -> BackendResult<&ModelDef> {
        if let Err(e) = ctx.require_subject() {
            log_event_with_fields(
                Event::AccessDenied,
                &[
                    ("model", model),
                    ("operation", operation.as_str()),
                    ("reason", &e.to_string()),
                ],
            );
            return Err(BackendError::Auth(e));
        }

        let def = self.registry.require(model)?;
        self.authorize(def, operation, ctx)?;
        Ok(def)
    }

    fn authorize(&self, model: &ModelDef, operation: Operation, ctx: &AuthContext) -> BackendResult<()> {
        self.authorizer.authorize(model, operation, ctx).map_err(|e| {
            log_event_with_fields(
                Event::AccessDenied,
                &[
                    ("model", &model.name),
                    ("operation", operation.as_str()),
                    ("reason", &e.to_string()),
                ],
            );
            BackendError::Auth(e)
        })
    }

    fn rejected(&self, model: &ModelDef, err: SchemaError) -> BackendError {
        log_event_with_fields(
            Event::ValidationRejected,
            &[("model", &model.name), ("reason", err.message())],
        );
        BackendError::Schema(err)
    }

    fn collection(&self, model: &str) -> BackendResult<&RwLock<Collection>> {
        self.collections
            .get(model)
            .ok_or_else(|| BackendError::Schema(SchemaError::unknown_model(model)))
    }

    fn read(&self, model: &str) -> BackendResult<RwLockReadGuard<'_, Collection>> {
        self.collection(model)?
            .read()
            .map_err(|_| BackendError::Internal("Lock poisoned".to_string()))
    }

    fn write(&self, model: &str) -> BackendResult<RwLockWriteGuard<'_, Collection>> {
        self.collection(model)?
            .write()
            .map_err(|_| BackendError::Internal("Lock poisoned".to_string()))
    }
}

/// Current UTC time, RFC 3339 with millisecond precision
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
