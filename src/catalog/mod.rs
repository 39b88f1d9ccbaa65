//! Read-only package metadata catalog
//!
//! The catalog is loaded once at startup and shared by every resolution.
//!
//! # Modules
//!
//! - [`error`]: Error types for catalog loading
//! - [`loader`]: Merges catalog documents and restores substituted keys
//! - [`source`]: Catalog sources (local file, HTTP)

pub mod error;
pub mod loader;
pub mod source;

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;

/// All packages known to the resolver, keyed by package name
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Catalog {
    packages: HashMap<String, PackageEntry>,
}

impl Catalog {
    pub fn new(packages: HashMap<String, PackageEntry>) -> Self {
        Self { packages }
    }

    pub fn get(&self, name: &str) -> Option<&PackageEntry> {
        self.packages.get(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Metadata for one package
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PackageEntry {
    /// Published versions in catalog order
    pub versions: IndexMap<String, VersionEntry>,
    /// Version used when a request names no version
    pub latest: String,
    /// Candidate main files, indexed by [`MainFileSelector`]
    pub mains: Vec<String>,
    /// Comma-joined file whitelist per version
    pub files: HashMap<String, String>,
}

impl PackageEntry {
    pub fn version(&self, version: &str) -> Option<&VersionEntry> {
        self.versions.get(version)
    }

    pub fn version_keys(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    /// Check whether `file` is whitelisted for `version`
    ///
    /// A version without a whitelist permits nothing.
    pub fn is_whitelisted(&self, version: &str, file: &str) -> bool {
        self.files
            .get(version)
            .is_some_and(|list| list.split(',').any(|entry| entry.trim() == file))
    }

    /// Look up the main file selected for `domain` of `version`
    ///
    /// An explicit file override wins, then an explicit index, then the
    /// first entry of `mains`.
    pub fn main_file(&self, version: &str, domain: &str) -> Option<&str> {
        let selector = self.version(version).and_then(|entry| entry.selector(domain));

        match selector {
            Some(MainFileSelector::Detailed {
                file: Some(file), ..
            }) => Some(file.as_str()),
            Some(MainFileSelector::Index(index))
            | Some(MainFileSelector::Detailed {
                main: Some(index), ..
            }) => self.mains.get(*index).map(String::as_str),
            _ => self.mains.first().map(String::as_str),
        }
    }
}

/// CDN choices for one version, in catalog order
///
/// The first domain is the default CDN for the version.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(from = "IndexMap<String, MainFileSelector>")]
pub struct VersionEntry {
    cdns: Vec<(String, MainFileSelector)>,
}

impl VersionEntry {
    pub fn default_domain(&self) -> Option<&str> {
        self.cdns.first().map(|(domain, _)| domain.as_str())
    }

    pub fn selector(&self, domain: &str) -> Option<&MainFileSelector> {
        self.cdns
            .iter()
            .find(|(name, _)| name == domain)
            .map(|(_, selector)| selector)
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.cdns.iter().map(|(domain, _)| domain.as_str())
    }
}

impl From<IndexMap<String, MainFileSelector>> for VersionEntry {
    fn from(map: IndexMap<String, MainFileSelector>) -> Self {
        Self {
            cdns: map.into_iter().collect(),
        }
    }
}

/// How a CDN picks the main file of a version
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MainFileSelector {
    /// Index into the package's `mains`
    Index(usize),
    Detailed {
        #[serde(default)]
        main: Option<usize>,
        #[serde(default)]
        file: Option<String>,
    },
}

impl Default for MainFileSelector {
    fn default() -> Self {
        MainFileSelector::Index(0)
    }
}
