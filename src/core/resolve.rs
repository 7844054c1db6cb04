//! Entity resolution
//!
//! Upstream records name customers, vendors and items informally. The
//! resolver turns such a name into the remote entity by searching the
//! relevant collection. Every lookup goes to the server; results are not
//! cached, since entities may be created concurrently by other runs.

use crate::adapters::books::AccountingApi;
use crate::domain::{BooksApiError, Result};
use serde_json::Value;
use std::fmt;

/// Collections that references are resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCollection {
    /// Customers and vendors
    Contacts,
    /// Catalog items
    Items,
}

impl EntityCollection {
    /// Collection path segment, also the key of the search response
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCollection::Contacts => "contacts",
            EntityCollection::Items => "items",
        }
    }

    /// Field holding an entity's canonical identifier
    pub fn id_field(&self) -> &'static str {
        match self {
            EntityCollection::Contacts => "contact_id",
            EntityCollection::Items => "item_id",
        }
    }

    /// Query parameter used for an exact name match
    pub fn name_filter(&self) -> &'static str {
        match self {
            EntityCollection::Contacts => "contact_name",
            EntityCollection::Items => "name",
        }
    }
}

impl fmt::Display for EntityCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityReference {
    /// Name the reference was resolved from
    pub display_name: String,
    /// Identifier of the matching entity
    pub canonical_id: String,
}

/// Looks up entities through the accounting API
pub struct EntityResolver<'a> {
    api: &'a dyn AccountingApi,
}

impl<'a> EntityResolver<'a> {
    /// Create a resolver over an API
    pub fn new(api: &'a dyn AccountingApi) -> Self {
        Self { api }
    }

    /// Search a collection and return the first match
    ///
    /// Ambiguous names resolve to whichever entity the server lists first.
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx statuses are errors. No match is
    /// `Ok(None)`.
    pub async fn resolve(
        &self,
        collection: EntityCollection,
        query: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        let mut matches = self.api.search(collection.as_str(), query).await?;
        tracing::debug!(
            collection = %collection,
            query = ?query,
            matches = matches.len(),
            "Entity search completed"
        );
        if matches.is_empty() {
            Ok(None)
        } else {
            Ok(Some(matches.swap_remove(0)))
        }
    }

    /// Resolve a name to the entity's canonical identifier
    ///
    /// # Errors
    ///
    /// Propagates search errors. A match without a usable id field is an
    /// invalid response.
    pub async fn resolve_id(
        &self,
        collection: EntityCollection,
        name: &str,
    ) -> Result<Option<EntityReference>> {
        let query = [(collection.name_filter(), name)];
        let entity = match self.resolve(collection, &query).await? {
            Some(entity) => entity,
            None => return Ok(None),
        };

        let canonical_id = match entity.get(collection.id_field()) {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                return Err(BooksApiError::InvalidResponse(format!(
                    "Entity '{name}' in '{collection}' has no {}",
                    collection.id_field()
                ))
                .into())
            }
        };

        Ok(Some(EntityReference {
            display_name: name.to_string(),
            canonical_id,
        }))
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory accounting API for pipeline tests

    use crate::adapters::books::{AccountingApi, ApiResponse};
    use crate::domain::{BooksApiError, Result};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Entities keyed by `(collection, name)`, with recorded calls
    #[derive(Default)]
    pub struct FakeApi {
        entities: HashMap<(String, String), Vec<Value>>,
        failing_collections: Vec<String>,
        create_status: Option<u16>,
        pub searches: Mutex<Vec<(String, Vec<(String, String)>)>>,
        pub created: Mutex<Vec<(String, Value)>>,
    }

    impl FakeApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entity(mut self, collection: &str, name: &str, entity: Value) -> Self {
            self.entities
                .entry((collection.to_string(), name.to_string()))
                .or_default()
                .push(entity);
            self
        }

        pub fn failing_search(mut self, collection: &str) -> Self {
            self.failing_collections.push(collection.to_string());
            self
        }

        pub fn create_status(mut self, status: u16) -> Self {
            self.create_status = Some(status);
            self
        }

        pub fn search_count(&self) -> usize {
            self.searches.lock().unwrap().len()
        }

        pub fn created(&self) -> Vec<(String, Value)> {
            self.created.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AccountingApi for FakeApi {
        async fn search(&self, collection: &str, query: &[(&str, &str)]) -> Result<Vec<Value>> {
            self.searches.lock().unwrap().push((
                collection.to_string(),
                query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));

            if self.failing_collections.iter().any(|c| c == collection) {
                return Err(BooksApiError::SearchFailed {
                    collection: collection.to_string(),
                    status: 500,
                    body: "internal error".to_string(),
                }
                .into());
            }

            let name = query.first().map(|(_, v)| v.to_string()).unwrap_or_default();
            Ok(self
                .entities
                .get(&(collection.to_string(), name))
                .cloned()
                .unwrap_or_default())
        }

        async fn create(&self, collection: &str, payload: &Value) -> Result<ApiResponse> {
            self.created
                .lock()
                .unwrap()
                .push((collection.to_string(), payload.clone()));
            let status = self.create_status.unwrap_or(201);
            Ok(ApiResponse::new(status, r#"{"code":0,"message":"created"}"#))
        }
    }
}
