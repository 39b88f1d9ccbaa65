//! Serialization of resolved packages into proxy URLs

use crate::config::ResolverConfig;
use crate::proxy::resolver::PackageDescriptor;

/// Builds canonical `domain:name@version/file` URLs and redirect targets
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    domain_separator: char,
    version_separator: char,
    package_separator: char,
    force_mains_marker: char,
    redirect_prefix: String,
}

impl Default for UrlBuilder {
    fn default() -> Self {
        Self::new(&ResolverConfig::default())
    }
}

impl UrlBuilder {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            domain_separator: config.domain_separator,
            version_separator: config.version_separator,
            package_separator: config.package_separator,
            force_mains_marker: config.force_mains_marker,
            redirect_prefix: config.redirect_prefix.clone(),
        }
    }

    pub fn canonical(&self, descriptor: &PackageDescriptor) -> String {
        format!(
            "{}{}{}",
            descriptor.domain,
            self.domain_separator,
            self.package_path(descriptor)
        )
    }

    /// Relative redirect target: canonical URL without its domain
    pub fn redirect(&self, descriptor: &PackageDescriptor, force_mains: bool) -> String {
        let mut target = format!("{}{}", self.redirect_prefix, self.package_path(descriptor));
        if force_mains {
            target.push(self.force_mains_marker);
        }
        target
    }

    fn package_path(&self, descriptor: &PackageDescriptor) -> String {
        format!(
            "{}{}{}{}{}",
            descriptor.name,
            self.version_separator,
            descriptor.version,
            self.package_separator,
            descriptor.file
        )
    }
}
