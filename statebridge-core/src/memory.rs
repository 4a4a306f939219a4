use crate::{resolver::PropertyRepository, store::PropertyStateStore};
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use statebridge_error::{store::StoreError, StoreResult};
use statebridge_models::{Property, PropertyFamily, PropertyState, StateFields};
use std::sync::Arc;
use uuid::Uuid;

/// In-memory property registry.
///
/// Reference implementation of [`PropertyRepository`]; the production
/// registry is backed by an external storage engine.
#[derive(Default)]
pub struct InMemoryPropertyRepository {
    properties: DashMap<Uuid, Arc<Property>>,
}

impl InMemoryPropertyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, property: Property) -> Arc<Property> {
        let property = Arc::new(property);
        self.properties.insert(property.id, Arc::clone(&property));
        property
    }
}

#[async_trait]
impl PropertyRepository for InMemoryPropertyRepository {
    async fn find(&self, family: PropertyFamily, id: Uuid) -> StoreResult<Option<Arc<Property>>> {
        Ok(self
            .properties
            .get(&id)
            .filter(|p| p.family == family)
            .map(|p| Arc::clone(p.value())))
    }

    async fn list(&self, family: PropertyFamily) -> StoreResult<Vec<Arc<Property>>> {
        let mut properties: Vec<Arc<Property>> = self
            .properties
            .iter()
            .filter(|p| p.family == family)
            .map(|p| Arc::clone(p.value()))
            .collect();
        // Stable enumeration order for deterministic snapshots.
        properties.sort_by_key(|p| p.id);
        Ok(properties)
    }
}

/// In-memory property state store.
///
/// `create_state` uses the map entry API so the exists-check and the insert
/// are one atomic step.
#[derive(Default)]
pub struct InMemoryStateStore {
    states: DashMap<Uuid, PropertyState>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertyStateStore for InMemoryStateStore {
    async fn find_state(&self, property: &Property) -> StoreResult<Option<PropertyState>> {
        Ok(self.states.get(&property.id).map(|s| s.value().clone()))
    }

    async fn create_state(
        &self,
        property: &Property,
        fields: StateFields,
    ) -> StoreResult<PropertyState> {
        match self.states.entry(property.id) {
            Entry::Occupied(_) => Err(StoreError::StateAlreadyExists(property.id)),
            Entry::Vacant(entry) => {
                let state = PropertyState::create(fields);
                entry.insert(state.clone());
                Ok(state)
            }
        }
    }

    async fn update_state(
        &self,
        property: &Property,
        _existing: &PropertyState,
        fields: StateFields,
    ) -> StoreResult<PropertyState> {
        match self.states.get_mut(&property.id) {
            Some(mut entry) => {
                entry.value_mut().apply(fields);
                Ok(entry.value().clone())
            }
            None => Err(StoreError::StateNotFound(property.id)),
        }
    }
}
