use indexmap::IndexMap;
use serde::Deserialize;
use std::path::PathBuf;

// =============================================================================
// Request grammar defaults
// =============================================================================

/// Separator between tokens of a batch request
pub const DEFAULT_GROUP_SEPARATOR: char = ',';

/// Separator between a CDN domain and the rest of a pre-resolved URL
pub const DEFAULT_DOMAIN_SEPARATOR: char = ':';

/// Separator between a package name and its version
pub const DEFAULT_VERSION_SEPARATOR: char = '@';

/// Separator between a package reference and the requested file
pub const DEFAULT_PACKAGE_SEPARATOR: char = '/';

/// Trailing marker forcing per-package file validation
pub const DEFAULT_FORCE_MAINS_MARKER: char = '?';

/// Prefix of redirect targets handed back to the client
pub const DEFAULT_REDIRECT_PREFIX: &str = "../";

/// Catalog document loaded when no source is configured
pub const DEFAULT_CATALOG_SOURCE: &str = "cdnall_data.json";

/// Resolver configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ResolverConfig {
    pub group_separator: char,
    pub domain_separator: char,
    pub version_separator: char,
    pub package_separator: char,
    pub force_mains_marker: char,
    pub redirect_prefix: String,
    pub bundle_policy: BundlePolicy,
    pub catalog: CatalogConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            group_separator: DEFAULT_GROUP_SEPARATOR,
            domain_separator: DEFAULT_DOMAIN_SEPARATOR,
            version_separator: DEFAULT_VERSION_SEPARATOR,
            package_separator: DEFAULT_PACKAGE_SEPARATOR,
            force_mains_marker: DEFAULT_FORCE_MAINS_MARKER,
            redirect_prefix: DEFAULT_REDIRECT_PREFIX.to_string(),
            bundle_policy: BundlePolicy::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl ResolverConfig {
    /// Read a configuration file in JSON format
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// What a bundle request yields when its trailing file is not shared
/// by every package of the bundle.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BundlePolicy {
    /// Deliver the file from its own package only
    #[default]
    Narrow,
    /// Fail the whole batch with a file-not-found error
    Strict,
}

/// Catalog loading configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// File paths or http(s) URLs, merged in order
    pub sources: Vec<String>,
    /// Original character -> substitute stored in catalog keys
    pub keymap: IndexMap<String, String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let mut keymap = IndexMap::new();
        keymap.insert(".".to_string(), ":".to_string());
        Self {
            sources: vec![DEFAULT_CATALOG_SOURCE.to_string()],
            keymap,
        }
    }
}

/// Returns the path to the data directory for cdn-resolver.
/// Uses $XDG_DATA_HOME/cdn-resolver if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/cdn-resolver,
/// or ./cdn-resolver if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("cdn-resolver.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("cdn-resolver")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolver_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<ResolverConfig>(json!({
            "groupSeparator": ";",
            "bundlePolicy": "strict"
        }))
        .unwrap();

        assert_eq!(result.group_separator, ';');
        assert_eq!(result.bundle_policy, BundlePolicy::Strict);
        assert_eq!(result.version_separator, '@');
        assert_eq!(result.catalog, CatalogConfig::default());
    }

    #[test]
    fn resolver_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<ResolverConfig>(json!({
            "groupSeparator": "|",
            "domainSeparator": "!",
            "versionSeparator": "#",
            "packageSeparator": "~",
            "forceMainsMarker": "$",
            "redirectPrefix": "/",
            "bundlePolicy": "narrow",
            "catalog": {
                "sources": ["a.json", "https://example.com/b.json"],
                "keymap": { ".": "," }
            }
        }))
        .unwrap();

        let mut keymap = IndexMap::new();
        keymap.insert(".".to_string(), ",".to_string());
        assert_eq!(
            result,
            ResolverConfig {
                group_separator: '|',
                domain_separator: '!',
                version_separator: '#',
                package_separator: '~',
                force_mains_marker: '$',
                redirect_prefix: "/".to_string(),
                bundle_policy: BundlePolicy::Narrow,
                catalog: CatalogConfig {
                    sources: vec![
                        "a.json".to_string(),
                        "https://example.com/b.json".to_string()
                    ],
                    keymap,
                },
            }
        );
    }

    #[test]
    fn resolver_config_rejects_unknown_fields() {
        let result = serde_json::from_value::<ResolverConfig>(json!({
            "skipInit": true
        }));

        assert!(result.is_err());
    }

    #[test]
    fn resolver_config_rejects_multi_character_separator() {
        let result = serde_json::from_value::<ResolverConfig>(json!({
            "groupSeparator": ",,"
        }));

        assert!(result.is_err());
    }

    #[test]
    fn resolver_config_from_file_reads_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "redirectPrefix": "/cdn/" }"#).unwrap();

        let result = ResolverConfig::from_file(&path).unwrap();

        assert_eq!(result.redirect_prefix, "/cdn/");
        assert_eq!(result.force_mains_marker, '?');
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/cdn-resolver"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/cdn-resolver"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./cdn-resolver"));
    }
}
