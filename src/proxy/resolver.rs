//! Package resolution for single request tokens
//!
//! Groups the token parser, the version matcher and the catalog that work
//! together to turn one token into a fully resolved package.

use std::sync::Arc;

use crate::catalog::{Catalog, PackageEntry, VersionEntry};
use crate::parser::request::PATH_SEPARATOR;
use crate::parser::{FileRequest, PackageReference, ParsedToken, RequestParser};
use crate::version::matcher::VersionMatcher;

/// Fully resolved target of one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// CDN the package is served from
    pub domain: String,
    pub name: String,
    /// Concrete catalog version
    pub version: String,
    pub file: String,
    /// Directory-style main file: the client is redirected instead of proxied
    pub redirect: bool,
}

impl PackageDescriptor {
    /// `name@version`, as listed in errors
    pub fn label(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

/// Why a token could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    InvalidToken,
    PackageNotFound,
    VersionNotFound,
    DomainNotFound,
    /// The selected main file does not exist in the package's `mains`
    MainFileNotFound,
}

/// Outcome of resolving one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenResolution {
    Passthrough(String),
    Resolved(PackageDescriptor),
    Unresolved {
        token: String,
        /// Name of the package, once the token could be parsed
        name: Option<String>,
        /// Concrete version, once one was picked
        version: Option<String>,
        reason: UnresolvedReason,
    },
}

/// Resolves tokens against one catalog snapshot
pub struct PackageResolver {
    parser: RequestParser,
    matcher: Arc<dyn VersionMatcher>,
    catalog: Arc<Catalog>,
}

impl PackageResolver {
    /// Create a new PackageResolver with the given components
    pub fn new(
        parser: RequestParser,
        matcher: Arc<dyn VersionMatcher>,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            parser,
            matcher,
            catalog,
        }
    }

    /// Get the catalog this resolver reads from
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn resolve_token(&self, token: &str) -> TokenResolution {
        match self.parser.parse(token) {
            Ok(ParsedToken::Passthrough(url)) => TokenResolution::Passthrough(url),
            Ok(ParsedToken::Reference(reference)) => self.resolve_reference(token, reference),
            Err(_) => unresolved(token, None, None, UnresolvedReason::InvalidToken),
        }
    }

    fn resolve_reference(&self, token: &str, reference: PackageReference) -> TokenResolution {
        let PackageReference {
            name,
            version,
            file,
        } = reference;

        let Some(entry) = self.catalog.get(&name) else {
            return unresolved(token, Some(name), None, UnresolvedReason::PackageNotFound);
        };

        let Some(version) = self.pick_version(entry, version.as_deref()) else {
            return unresolved(token, Some(name), None, UnresolvedReason::VersionNotFound);
        };

        let Some(domain) = entry
            .version(&version)
            .and_then(VersionEntry::default_domain)
        else {
            return unresolved(
                token,
                Some(name),
                Some(version),
                UnresolvedReason::DomainNotFound,
            );
        };

        let (file, redirect) = match file {
            FileRequest::Explicit(file) => (file, false),
            FileRequest::Main => match entry.main_file(&version, domain) {
                Some(main) => (main.to_string(), is_directory_style(main)),
                None => {
                    return unresolved(
                        token,
                        Some(name),
                        Some(version),
                        UnresolvedReason::MainFileNotFound,
                    );
                }
            },
        };

        let file = self.parser.finish_file(domain, &name, &file);

        TokenResolution::Resolved(PackageDescriptor {
            domain: domain.to_string(),
            name,
            version,
            file,
            redirect,
        })
    }

    /// Exact catalog key first, then the best range match; no version means latest
    fn pick_version(&self, entry: &PackageEntry, requested: Option<&str>) -> Option<String> {
        match requested {
            Some(requested) if entry.version(requested).is_some() => Some(requested.to_string()),
            Some(requested) => self
                .matcher
                .find_best_version(requested, &mut entry.version_keys())
                .map(str::to_string),
            None => Some(entry.latest.clone()).filter(|latest| !latest.is_empty()),
        }
    }
}

/// A main file pointing into a directory that is not a script
fn is_directory_style(file: &str) -> bool {
    file.contains(PATH_SEPARATOR) && !file.ends_with(".js")
}

fn unresolved(
    token: &str,
    name: Option<String>,
    version: Option<String>,
    reason: UnresolvedReason,
) -> TokenResolution {
    TokenResolution::Unresolved {
        token: token.to_string(),
        name,
        version,
        reason,
    }
}
