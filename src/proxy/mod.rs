//! Request resolution layer
//!
//! Turns client requests into canonical CDN URLs for the fetch/cache
//! transport.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Batch    │────▶│  Resolver   │────▶│   Catalog   │
//! │ (validate)  │     │  (token)    │     │ (metadata)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │ UrlBuilder  │     │   Matcher   │
//! │  (output)   │     │(version cmp)│
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`batch`]: Batch splitting, fail-fast resolution and whitelist validation
//! - [`error`]: Error kinds of a failed resolution
//! - [`resolver`]: Single-token resolution against the catalog
//! - [`response`]: Responses handed to the transport
//! - [`url`]: Canonical URL and redirect target serialization

pub mod batch;
pub mod error;
pub mod resolver;
pub mod response;
pub mod url;

use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config::ResolverConfig;
use crate::parser::RequestParser;
use crate::proxy::batch::{BatchRequest, BatchResolver, RequestInput, Resolution};
use crate::proxy::error::ResolveError;
use crate::proxy::resolver::PackageResolver;
use crate::proxy::response::ProxyResponse;
use crate::proxy::url::UrlBuilder;
use crate::version::matcher::{SegmentMatcher, VersionMatcher};

/// Entry point for resolving client requests
///
/// The catalog is installed once, after it has been loaded; requests
/// arriving before that fail with [`ResolveError::CatalogUnavailable`].
pub struct PackageProxy {
    config: ResolverConfig,
    matcher: Arc<dyn VersionMatcher>,
    catalog: OnceLock<Arc<Catalog>>,
}

impl PackageProxy {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            matcher: Arc::new(SegmentMatcher),
            catalog: OnceLock::new(),
        }
    }

    /// Build a proxy that is ready to resolve
    pub fn with_catalog(config: ResolverConfig, catalog: Arc<Catalog>) -> Self {
        let proxy = Self::new(config);
        proxy.install_catalog(catalog);
        proxy
    }

    /// Install the loaded catalog; returns false if one is already installed
    pub fn install_catalog(&self, catalog: Arc<Catalog>) -> bool {
        let packages = catalog.len();
        let installed = self.catalog.set(catalog).is_ok();
        if installed {
            debug!("Catalog installed with {} packages", packages);
        } else {
            warn!("Catalog already installed, ignoring new catalog");
        }
        installed
    }

    /// Resolve a request, exposing the failure kind
    pub fn resolve<'a>(
        &self,
        input: impl Into<RequestInput<'a>>,
    ) -> Result<Resolution, ResolveError> {
        let catalog = self
            .catalog
            .get()
            .ok_or(ResolveError::CatalogUnavailable)?;

        let request = BatchRequest::parse(input.into(), &self.config)?;
        let batch = BatchResolver::new(
            PackageResolver::new(
                RequestParser::new(&self.config),
                Arc::clone(&self.matcher),
                Arc::clone(catalog),
            ),
            UrlBuilder::new(&self.config),
            self.config.bundle_policy,
        );

        batch.resolve(&request)
    }

    /// Resolve a request into the response for the transport
    ///
    /// Every failure is logged with its cause and answered with the same
    /// generic not-found response.
    pub fn handle<'a>(&self, input: impl Into<RequestInput<'a>>) -> ProxyResponse {
        let input = input.into();
        match self.resolve(input) {
            Ok(resolution) => resolution.into(),
            Err(e) => {
                warn!(kind = e.kind(), request = ?input, "Failed to resolve request: {}", e);
                ProxyResponse::not_found()
            }
        }
    }
}
