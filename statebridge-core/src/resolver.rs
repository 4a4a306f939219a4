use async_trait::async_trait;
use statebridge_error::{exchange::ExchangeError, ExchangeResult, StoreResult};
use statebridge_models::{Property, PropertyFamily};
use std::sync::Arc;
use uuid::Uuid;

/// Read-only access to the property registry, per family.
///
/// The production registry lives in an external storage engine; tests and
/// the reference wiring use [`crate::InMemoryPropertyRepository`].
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Find one property by id within a family.
    async fn find(&self, family: PropertyFamily, id: Uuid) -> StoreResult<Option<Arc<Property>>>;

    /// Enumerate all properties of a family in a stable order.
    async fn list(&self, family: PropertyFamily) -> StoreResult<Vec<Arc<Property>>>;
}

/// Resolves command targets to canonical properties.
///
/// Mapping redirection is transparent: callers always receive the property
/// that owns the state, never the mapping itself.
pub struct PropertyResolver {
    repository: Arc<dyn PropertyRepository>,
}

impl PropertyResolver {
    pub fn new(repository: Arc<dyn PropertyRepository>) -> Self {
        Self { repository }
    }

    /// Resolve `id` within `family`, following a mapping to its parent.
    pub async fn resolve(
        &self,
        family: PropertyFamily,
        id: Uuid,
    ) -> ExchangeResult<Arc<Property>> {
        let property = self
            .repository
            .find(family, id)
            .await?
            .ok_or(ExchangeError::PropertyNotFound(id))?;

        match property.parent {
            Some(parent_id) => self
                .repository
                .find(family, parent_id)
                .await?
                .ok_or(ExchangeError::PropertyNotFound(parent_id)),
            None => Ok(property),
        }
    }

    /// Whether a (resolved) property carries controllable runtime state.
    pub fn supports_dynamic_state(property: &Property) -> bool {
        property.is_dynamic()
    }
}
