//! Catalog test utilities

use std::sync::Arc;

use cdn_resolver::catalog::Catalog;
use cdn_resolver::config::ResolverConfig;
use cdn_resolver::proxy::PackageProxy;

/// Catalog document with plain (already restored) keys
pub const FIXTURE_CATALOG: &str = include_str!("../fixtures/catalog.json");

/// The fixture catalog as stored upstream, with `.` substituted by `:` in keys
pub fn encoded_fixture_document() -> String {
    let document: serde_json::Value = serde_json::from_str(FIXTURE_CATALOG).unwrap();
    encode_keys(document).to_string()
}

fn encode_keys(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter()
                .map(|(key, value)| (key.replace('.', ":"), encode_keys(value)))
                .collect(),
        ),
        other => other,
    }
}

pub fn fixture_catalog() -> Arc<Catalog> {
    Arc::new(serde_json::from_str(FIXTURE_CATALOG).unwrap())
}

/// Create a proxy over the fixture catalog
pub fn create_test_proxy(config: ResolverConfig) -> PackageProxy {
    PackageProxy::with_catalog(config, fixture_catalog())
}
