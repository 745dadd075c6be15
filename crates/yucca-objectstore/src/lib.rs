//! Yucca Objectstore - typed views over the config store
//!
//! This crate provides:
//! - The `ObjectCodec` capability bundle (decode/encode/identity/filter)
//! - `IdentifiedObjectStore`: a typed, identity-keyed view over the
//!   versioned config store
//! - The change-event sink contract and event model

pub mod codec;
pub mod event;
pub mod store;

// Re-export commonly used types
pub use codec::ObjectCodec;
pub use event::{ChangeKind, ConfigChangeEvent, ConfigChangeEventSink, NoopEventSink};
pub use store::{IdentifiedObjectStore, StoredObject};
