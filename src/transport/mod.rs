//! stdio framing, JSON message shapes, and the base64 wrapper around the
//! opaque per-turn state blob

pub mod dto;
pub mod framing;

use crate::gameplay::GraphStore;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// encode a `GraphStore`'s byte blob for the `state` field the host
/// round-trips back to us untouched every turn
pub fn encode_state(store: &GraphStore) -> String {
    STANDARD.encode(store.to_bytes())
}

/// the inverse of [`encode_state`]
pub fn decode_state(state: &str) -> anyhow::Result<GraphStore> {
    let bytes = STANDARD.decode(state)?;
    GraphStore::from_bytes(&bytes)
}
