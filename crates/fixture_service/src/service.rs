//! Admin API fixture service.

use std::sync::Arc;

use api_client::header::{HeaderMap, AUTHORIZATION};
use api_client::{ApiClient, HttpMethod, ResolvedEntity, SearchFilter};
use auth_handler::SessionAuthenticator;
use futures::future::try_join_all;
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::merge::{merge, merge_all, nested};
use crate::{DefaultDatasets, DependencyRef, FixtureError, FixtureRequest, FixtureResult};

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

/// Creates, looks up, updates and deletes entities through the admin API.
///
/// Every request carries the bearer token of the injected session. Per-entity
/// fixtures in [`crate::fixtures`] are free functions on top of this type.
pub struct FixtureService {
    client: ApiClient,
    session: Arc<dyn SessionAuthenticator>,
    defaults: DefaultDatasets,
}

impl FixtureService {
    pub fn new(
        client: ApiClient,
        session: Arc<dyn SessionAuthenticator>,
        defaults: DefaultDatasets,
    ) -> Self {
        Self {
            client,
            session,
            defaults,
        }
    }

    pub fn defaults(&self) -> &DefaultDatasets {
        &self.defaults
    }

    pub fn session(&self) -> &Arc<dyn SessionAuthenticator> {
        &self.session
    }

    /// A fresh entity id: a v4 uuid in hex without dashes.
    pub fn create_uuid() -> String {
        Uuid::new_v4().simple().to_string()
    }

    async fn auth_headers(&self) -> FixtureResult<HeaderMap> {
        let credential = self.session.authenticate().await?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, credential.authorization_header()?);
        Ok(headers)
    }

    /// Performs an authenticated admin API request.
    ///
    /// # Returns
    /// The normalized response data, see [`api_client::normalize_body`].
    #[instrument(skip(self, body), fields(method = %method, path = %path))]
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> FixtureResult<Value> {
        let headers = self.auth_headers().await?;
        let response = self
            .client
            .request(method, path, body, Some(&headers))
            .await?;
        Ok(response.data())
    }

    /// Creates an entity from the default dataset named `endpoint` with `data`
    /// merged over it.
    ///
    /// # Errors
    /// `FixtureError::Validation` if the merged payload is not an object, or
    /// the error of the create request.
    pub async fn create(&self, endpoint: &str, data: Value) -> FixtureResult<ResolvedEntity> {
        let payload = match self.defaults.get(endpoint) {
            Some(defaults) => merge(defaults.clone(), data),
            None => data,
        };
        self.post_entity(endpoint, payload).await
    }

    /// Creates an entity after resolving its dependencies.
    ///
    /// Dependency lookups run concurrently. Any lookup that matches nothing
    /// aborts the fixture with `FixtureError::NotFound` before anything is
    /// created.
    #[instrument(skip(self, request), fields(endpoint = %request.endpoint))]
    pub async fn create_fixture(&self, request: FixtureRequest) -> FixtureResult<ResolvedEntity> {
        let defaults = self
            .defaults
            .get(request.dataset_name())
            .cloned()
            .unwrap_or_else(|| json!({}));
        let resolved = self.resolve_dependencies(&request.dependency_refs).await?;

        let payload = merge_all([defaults, resolved, request.data]);
        self.post_entity(&request.endpoint, payload).await
    }

    /// Resolves every reference into one object of ids.
    pub async fn resolve_dependencies(&self, refs: &[DependencyRef]) -> FixtureResult<Value> {
        let ids = try_join_all(refs.iter().map(|dependency| async move {
            let entity = self.find(&dependency.entity, &dependency.filter).await?;
            debug!(
                field = %dependency.field,
                entity = %dependency.entity,
                id = %entity.id,
                "Resolved fixture dependency"
            );
            Ok::<_, FixtureError>(nested(&dependency.field, Value::String(entity.id)))
        }))
        .await?;

        Ok(merge_all(ids))
    }

    #[instrument(skip(self, payload))]
    async fn post_entity(&self, endpoint: &str, mut payload: Value) -> FixtureResult<ResolvedEntity> {
        let Value::Object(fields) = &mut payload else {
            return Err(FixtureError::Validation(format!(
                "Payload for '{}' must be a JSON object",
                endpoint
            )));
        };

        let id = match fields.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let id = Self::create_uuid();
                fields.insert("id".to_string(), Value::String(id.clone()));
                id
            }
        };

        let endpoint = endpoint.trim_matches('/');
        let data = self
            .request(
                HttpMethod::Post,
                &format!("/{}?_response=true", endpoint),
                Some(&payload),
            )
            .await?;

        let entity = ResolvedEntity::from_value(&data).unwrap_or_else(|| {
            if let Value::Object(fields) = &mut payload {
                fields.remove("id");
            }
            ResolvedEntity::new(id, payload)
        });

        info!(endpoint = endpoint, id = %entity.id, "Created fixture");

        Ok(entity)
    }

    /// Searches `entity` with a single filter.
    ///
    /// # Returns
    /// `None` when nothing matches. When several entities match the first one
    /// is returned and a warning logged.
    #[instrument(skip(self), fields(field = %filter.field, value = %filter.value))]
    pub async fn search(
        &self,
        entity: &str,
        filter: &SearchFilter,
    ) -> FixtureResult<Option<ResolvedEntity>> {
        let data = self
            .request(
                HttpMethod::Post,
                &format!("/search/{}", entity),
                Some(&filter.to_criteria()),
            )
            .await?;

        let found = match &data {
            Value::Null => None,
            Value::Array(items) => {
                warn!(
                    entity = entity,
                    matches = items.len(),
                    "Search matched several entities, using the first"
                );
                items.first().and_then(ResolvedEntity::from_value)
            }
            other => ResolvedEntity::from_value(other),
        };

        if found.is_none() {
            debug!(entity = entity, "Search matched nothing");
        }

        Ok(found)
    }

    /// Like [`search`](Self::search), but a missing entity is an error.
    pub async fn find(&self, entity: &str, filter: &SearchFilter) -> FixtureResult<ResolvedEntity> {
        self.search(entity, filter)
            .await?
            .ok_or_else(|| FixtureError::NotFound {
                entity: entity.to_string(),
                field: filter.field.clone(),
                value: filter.value.clone(),
            })
    }

    /// Looks up an entity by name.
    pub async fn find_by_name(&self, entity: &str, name: &str) -> FixtureResult<ResolvedEntity> {
        self.find(entity, &SearchFilter::by_name(name)).await
    }

    /// Patches fields of an existing entity.
    ///
    /// # Errors
    /// `FixtureError::Validation` if `id` is empty; no request is sent then.
    #[instrument(skip(self, data))]
    pub async fn update(&self, entity: &str, id: &str, data: Value) -> FixtureResult<Value> {
        if id.trim().is_empty() {
            return Err(FixtureError::Validation(format!(
                "Updating '{}' requires an id",
                entity
            )));
        }

        let response = self
            .request(HttpMethod::Patch, &format!("/{}/{}", entity, id), Some(&data))
            .await?;

        info!(entity = entity, id = id, "Updated fixture");

        Ok(response)
    }

    /// Deletes the entity called `name`.
    ///
    /// This is a search followed by a delete; the two calls are not atomic.
    ///
    /// # Errors
    /// `FixtureError::NotFound` if no entity has that name.
    #[instrument(skip(self))]
    pub async fn delete(&self, endpoint: &str, name: &str) -> FixtureResult<ResolvedEntity> {
        let entity = self.find_by_name(endpoint, name).await?;

        self.request(
            HttpMethod::Delete,
            &format!("/{}/{}", endpoint, entity.id),
            None,
        )
        .await?;

        info!(endpoint = endpoint, id = %entity.id, "Deleted fixture");

        Ok(entity)
    }

    /// Clears the application cache.
    #[instrument(skip(self))]
    pub async fn clear_cache(&self) -> FixtureResult<()> {
        self.request(HttpMethod::Delete, "/_action/cache", None)
            .await?;
        info!("Application cache cleared");
        Ok(())
    }

    /// Sends a bulk write to the sync endpoint.
    #[instrument(skip(self, payload))]
    pub async fn sync(&self, payload: &Value) -> FixtureResult<Value> {
        self.request(HttpMethod::Post, "/_action/sync", Some(payload))
            .await
    }
}

impl std::fmt::Debug for FixtureService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureService")
            .field("endpoint", &self.client.base_url().as_str())
            .finish()
    }
}
