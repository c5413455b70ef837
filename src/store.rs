//! Persistence collaborator boundary. The core only needs upsert-by-id
//! load/save plus a recency listing; anything durable sits behind
//! [`HandStore`]. [`MemoryStore`] is the in-process implementation, holding
//! each record as a JSON blob the way the reference schema stores players
//! and actions as serialized columns.

use crate::hand::HandRecord;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    #[error("failed to encode hand record: {0}")]
    Encode(String),
    #[error("failed to decode hand record: {0}")]
    Decode(String),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub trait HandStore {
    /// Fetch a hand by id. `Ok(None)` means the id is unknown.
    fn load(&self, id: &str) -> Result<Option<HandRecord>, StoreError>;
    /// Insert or replace the record under its id.
    fn save(&self, hand: &HandRecord) -> Result<(), StoreError>;
    /// Most recent hands first, at most `limit` of them.
    fn recent(&self, limit: usize) -> Result<Vec<HandRecord>, StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    hands: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.hands.lock().map(|h| h.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HandStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Option<HandRecord>, StoreError> {
        let hands = self
            .hands
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".into()))?;
        match hands.get(id) {
            Some(blob) => {
                let hand = serde_json::from_str(blob)
                    .map_err(|e| StoreError::Decode(e.to_string()))?;
                Ok(Some(hand))
            }
            None => Ok(None),
        }
    }

    fn save(&self, hand: &HandRecord) -> Result<(), StoreError> {
        let blob =
            serde_json::to_string(hand).map_err(|e| StoreError::Encode(e.to_string()))?;
        let mut hands = self
            .hands
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".into()))?;
        hands.insert(hand.id.clone(), blob);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<HandRecord>, StoreError> {
        let hands = self
            .hands
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".into()))?;
        let mut records = hands
            .values()
            .map(|blob| serde_json::from_str(blob).map_err(|e| StoreError::Decode(e.to_string())))
            .collect::<Result<Vec<HandRecord>, StoreError>>()?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }
}
