//! Batch resolution of grouped requests
//!
//! A request such as `jquery@2.1.4,bootstrap@3.3.5/js/bootstrap.min.js` is
//! split into tokens, every token is resolved, and the requested files are
//! validated against the catalog whitelists before URLs are emitted.

use tracing::{debug, info};

use crate::config::{BundlePolicy, ResolverConfig};
use crate::proxy::error::ResolveError;
use crate::proxy::resolver::{
    PackageDescriptor, PackageResolver, TokenResolution, UnresolvedReason,
};
use crate::proxy::url::UrlBuilder;

/// Raw client input
#[derive(Debug, Clone, Copy)]
pub enum RequestInput<'a> {
    /// Group-separated request string
    Raw(&'a str),
    /// Tokens already split by the caller
    Tokens(&'a [String]),
}

impl<'a> From<&'a str> for RequestInput<'a> {
    fn from(raw: &'a str) -> Self {
        RequestInput::Raw(raw)
    }
}

impl<'a> From<&'a [String]> for RequestInput<'a> {
    fn from(tokens: &'a [String]) -> Self {
        RequestInput::Tokens(tokens)
    }
}

/// Ordered tokens of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    tokens: Vec<String>,
    /// Trailing marker seen: validate each package's own file
    force_mains: bool,
}

impl BatchRequest {
    /// Split the input and strip the trailing force-mains marker
    pub fn parse(input: RequestInput<'_>, config: &ResolverConfig) -> Result<Self, ResolveError> {
        let marker = config.force_mains_marker;

        let (tokens, force_mains) = match input {
            RequestInput::Raw(raw) => {
                let stripped = raw.strip_suffix(marker);
                let request = stripped.unwrap_or(raw);
                if request.is_empty() {
                    return Err(ResolveError::MissingInput);
                }
                let tokens = request
                    .split(config.group_separator)
                    .map(str::to_string)
                    .collect::<Vec<_>>();
                (tokens, stripped.is_some())
            }
            RequestInput::Tokens(tokens) => {
                let mut tokens = tokens.to_vec();
                let force_mains = match tokens.last_mut() {
                    Some(last) if last.ends_with(marker) => {
                        last.pop();
                        true
                    }
                    _ => false,
                };
                if tokens.is_empty() || (tokens.len() == 1 && tokens[0].is_empty()) {
                    return Err(ResolveError::MissingInput);
                }
                (tokens, force_mains)
            }
        };

        Ok(Self {
            tokens,
            force_mains,
        })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn force_mains(&self) -> bool {
        self.force_mains
    }
}

/// Result of a successful batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Canonical URLs for the fetch/cache transport, in request order
    Fetch(Vec<String>),
    /// Relative target the client is sent to instead
    Redirect(String),
}

enum BatchEntry {
    Passthrough(String),
    Package(PackageDescriptor),
}

/// Resolves every token of a batch, fail-fast
pub struct BatchResolver {
    resolver: PackageResolver,
    urls: UrlBuilder,
    bundle_policy: BundlePolicy,
}

impl BatchResolver {
    pub fn new(resolver: PackageResolver, urls: UrlBuilder, bundle_policy: BundlePolicy) -> Self {
        Self {
            resolver,
            urls,
            bundle_policy,
        }
    }

    pub fn resolve(&self, request: &BatchRequest) -> Result<Resolution, ResolveError> {
        debug!(tokens = ?request.tokens(), force_mains = request.force_mains(), "Resolving batch");

        let mut entries = Vec::with_capacity(request.tokens().len());
        for token in request.tokens() {
            match self.resolver.resolve_token(token) {
                TokenResolution::Passthrough(url) => entries.push(BatchEntry::Passthrough(url)),
                TokenResolution::Resolved(descriptor) if descriptor.redirect => {
                    return Ok(Resolution::Redirect(
                        self.urls.redirect(&descriptor, request.force_mains()),
                    ));
                }
                TokenResolution::Resolved(descriptor) => {
                    entries.push(BatchEntry::Package(descriptor));
                }
                TokenResolution::Unresolved {
                    token,
                    name,
                    version,
                    reason,
                } => return Err(unresolved_error(token, name, version, reason)),
            }
        }

        let packages: Vec<&PackageDescriptor> = entries
            .iter()
            .filter_map(|entry| match entry {
                BatchEntry::Package(descriptor) => Some(descriptor),
                BatchEntry::Passthrough(_) => None,
            })
            .collect();

        if packages.len() <= 1 || request.force_mains() {
            self.validate_each(&packages)?;
        } else if let Some(narrowed) = self.validate_bundle(&packages)? {
            return Ok(Resolution::Fetch(vec![self.urls.canonical(narrowed)]));
        }

        Ok(Resolution::Fetch(
            entries
                .iter()
                .map(|entry| match entry {
                    BatchEntry::Passthrough(url) => url.clone(),
                    BatchEntry::Package(descriptor) => self.urls.canonical(descriptor),
                })
                .collect(),
        ))
    }

    /// Every package must whitelist its own file
    fn validate_each(&self, packages: &[&PackageDescriptor]) -> Result<(), ResolveError> {
        match packages.iter().find(|package| !self.is_whitelisted(package, &package.file)) {
            Some(package) => Err(ResolveError::FileNotFound {
                file: package.file.clone(),
                packages: vec![package.label()],
            }),
            None => Ok(()),
        }
    }

    /// Check the trailing file against the rest of the bundle
    ///
    /// Earlier packages must still whitelist their own files. Returns the
    /// package the result narrows to when the trailing file is not shared by
    /// every package, `None` when the whole bundle stays.
    fn validate_bundle<'p>(
        &self,
        packages: &[&'p PackageDescriptor],
    ) -> Result<Option<&'p PackageDescriptor>, ResolveError> {
        let Some((&last, others)) = packages.split_last() else {
            return Ok(None);
        };
        let file = &last.file;

        if !self.is_whitelisted(last, file) {
            return Err(ResolveError::FileNotFound {
                file: file.clone(),
                packages: packages.iter().rev().map(|package| package.label()).collect(),
            });
        }
        self.validate_each(others)?;

        let Some(position) = others
            .iter()
            .rposition(|package| !self.is_whitelisted(package, file))
        else {
            return Ok(None);
        };

        match self.bundle_policy {
            BundlePolicy::Narrow => {
                info!(
                    file = %file,
                    unshared = %others[position].label(),
                    "Bundle file not shared, narrowing to {}",
                    last.label()
                );
                Ok(Some(last))
            }
            BundlePolicy::Strict => Err(ResolveError::FileNotFound {
                file: file.clone(),
                packages: packages[position..]
                    .iter()
                    .rev()
                    .map(|package| package.label())
                    .collect(),
            }),
        }
    }

    fn is_whitelisted(&self, package: &PackageDescriptor, file: &str) -> bool {
        self.resolver
            .catalog()
            .get(&package.name)
            .is_some_and(|entry| entry.is_whitelisted(&package.version, file))
    }
}

fn unresolved_error(
    token: String,
    name: Option<String>,
    version: Option<String>,
    reason: UnresolvedReason,
) -> ResolveError {
    match reason {
        UnresolvedReason::InvalidToken => ResolveError::InvalidToken(token),
        UnresolvedReason::PackageNotFound => ResolveError::PackageNotFound(token),
        UnresolvedReason::VersionNotFound => ResolveError::VersionNotFound(token),
        UnresolvedReason::DomainNotFound => ResolveError::DomainNotFound(token),
        // No main file to name; the token stands in for it
        UnresolvedReason::MainFileNotFound => ResolveError::FileNotFound {
            packages: vec![format!(
                "{}@{}",
                name.unwrap_or_default(),
                version.unwrap_or_default()
            )],
            file: token,
        },
    }
}
