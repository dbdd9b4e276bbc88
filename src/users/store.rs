//! Concurrent in-memory user store.
//!
//! A single reader/writer lock guards the whole id → record map. Reads
//! (`list`, `get`, `len`) share the lock; writes (`create`, `update`,
//! `delete`) hold it exclusively for their entire check-then-mutate
//! sequence, so no reader ever sees a half-applied record.

use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::users::models::{User, UserPayload};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("user {0} not found")]
    NotFound(Uuid),
}

#[derive(Debug, Default)]
pub struct UserStore {
    items: RwLock<HashMap<Uuid, User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored record, in no particular order.
    pub fn list(&self) -> Vec<User> {
        self.items.read().values().cloned().collect()
    }

    pub fn get(&self, id: Uuid) -> Result<User, StoreError> {
        self.items
            .read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Stores the payload under a freshly generated id and returns the new
    /// record.
    pub fn create(&self, payload: UserPayload) -> User {
        let mut items = self.items.write();

        // v4 collisions are astronomically unlikely, but the id must never
        // overwrite an existing record.
        let mut id = Uuid::new_v4();
        while items.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let user = User::from_payload(id, payload);
        items.insert(id, user.clone());
        user
    }

    pub fn update(&self, id: Uuid, payload: UserPayload) -> Result<User, StoreError> {
        let mut items = self.items.write();
        let slot = items.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        *slot = User::from_payload(id, payload);
        Ok(slot.clone())
    }

    pub fn delete(&self, id: Uuid) -> Result<User, StoreError> {
        self.items
            .write()
            .remove(&id)
            .ok_or(StoreError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}
