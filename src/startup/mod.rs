//! Server startup: logging, datastore selection, admin HTTP surface

pub mod http;
pub mod logging;

use std::sync::Arc;

use yucca_docstore::{Datastore, EmbeddedDatastore};

use crate::settings::Settings;

/// Build the document store named by `document.store.dataStoreType`.
///
/// Only the embedded backend ships in-tree; network-backed drivers
/// (mongo, ...) are deployed as external adapters behind the same trait.
pub fn build_datastore(settings: &Settings) -> anyhow::Result<Arc<dyn Datastore>> {
    match settings.data_store_type().as_str() {
        "embedded" => Ok(Arc::new(EmbeddedDatastore::new())),
        other => anyhow::bail!(
            "unsupported document store type '{other}': only 'embedded' ships with this binary"
        ),
    }
}
