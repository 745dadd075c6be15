//! Typed-object capability bundle
//!
//! A codec teaches the overlay how one object family maps onto the opaque
//! config payload: serialization both ways, where its identity lives, and
//! how a caller-supplied filter applies. Concrete configuration schemas
//! plug in here.

use serde_json::Value;

use yucca_api::Result;

/// Capabilities of one typed object family.
pub trait ObjectCodec: Send + Sync {
    /// The typed object stored under this resource.
    type Object: Clone + Send + Sync;
    /// Caller-supplied read filter for [`get_all`](crate::IdentifiedObjectStore::get_all_filtered).
    type Filter: Send + Sync;

    /// Decode a stored payload.
    ///
    /// Returning `None` marks the row as unreadable; the overlay skips it
    /// on reads so one incompatible historical payload cannot poison a
    /// listing.
    fn decode(&self, value: &Value) -> Option<Self::Object>;

    /// Encode an object for storage. Failures abort the write.
    fn encode(&self, object: &Self::Object) -> Result<Value>;

    /// The stable identity of an object; used as the storage context.
    fn id_of(&self, object: &Self::Object) -> String;

    /// Whether `object` survives the caller-supplied filter.
    fn matches(&self, object: &Self::Object, filter: &Self::Filter) -> bool;
}
