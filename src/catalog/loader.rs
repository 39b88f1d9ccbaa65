//! Catalog loading
//!
//! Fetches every configured source, reverses the key substitutions the
//! documents were stored with, and merges the result into one [`Catalog`].

use std::collections::HashMap;

use futures::future::try_join_all;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::catalog::error::CatalogError;
use crate::catalog::source::{CatalogSource, source_for};
use crate::catalog::{Catalog, PackageEntry};
use crate::config::CatalogConfig;

/// Load the catalog described by the configuration
pub async fn load_catalog(config: &CatalogConfig) -> Result<Catalog, CatalogError> {
    let sources = config
        .sources
        .iter()
        .map(|location| source_for(location))
        .collect::<Result<Vec<_>, _>>()?;

    load_from_sources(&sources, &config.keymap).await
}

/// Fetch all sources concurrently and merge them in order
///
/// Later sources override earlier ones package by package.
pub async fn load_from_sources(
    sources: &[Box<dyn CatalogSource>],
    keymap: &IndexMap<String, String>,
) -> Result<Catalog, CatalogError> {
    let documents = try_join_all(sources.iter().map(|source| async move {
        debug!("Fetching catalog from {}", source.location());
        source.fetch_document().await
    }))
    .await?;

    let mut packages: HashMap<String, PackageEntry> = HashMap::new();
    for (source, document) in sources.iter().zip(documents) {
        let decoded = decode_document(document, keymap)?;
        info!(
            "Loaded {} packages from {}",
            decoded.len(),
            source.location()
        );
        packages.extend(decoded);
    }

    Ok(Catalog::new(packages))
}

/// Decode one document rooted at `packages`
fn decode_document(
    document: Value,
    keymap: &IndexMap<String, String>,
) -> Result<HashMap<String, PackageEntry>, CatalogError> {
    let Value::Object(mut root) = document else {
        return Err(CatalogError::InvalidDocument(
            "document is not an object".to_string(),
        ));
    };
    let Some(packages) = root.remove("packages") else {
        return Err(CatalogError::InvalidDocument(
            "missing `packages` root".to_string(),
        ));
    };

    Ok(serde_json::from_value(restore_keys(packages, keymap))?)
}

/// Reverse key substitutions in every object key, recursively
///
/// `keymap` maps an original character to the substitute it was stored as.
/// Values are left untouched.
pub fn restore_keys(value: Value, keymap: &IndexMap<String, String>) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (restore_key(&key, keymap), restore_keys(value, keymap)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| restore_keys(item, keymap))
                .collect(),
        ),
        other => other,
    }
}

fn restore_key(key: &str, keymap: &IndexMap<String, String>) -> String {
    keymap
        .iter()
        .filter(|(_, substitute)| !substitute.is_empty())
        .fold(key.to_string(), |key, (original, substitute)| {
            key.replace(substitute.as_str(), original)
        })
}
