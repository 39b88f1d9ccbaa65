use thiserror::Error;

/// Reasons a batch request cannot be resolved
///
/// Every variant is fatal for the whole batch and reaches the client only as
/// the generic not-found response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Missing package(s)")]
    MissingInput,

    #[error("Invalid package: {0}")]
    InvalidToken(String),

    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Version not found: {0}")]
    VersionNotFound(String),

    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    #[error("File not found: {file} (checked {})", .packages.join(", "))]
    FileNotFound { file: String, packages: Vec<String> },

    #[error("Package catalog not loaded")]
    CatalogUnavailable,
}

impl ResolveError {
    /// Short name used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::MissingInput => "missing_input",
            ResolveError::InvalidToken(_) => "invalid_token",
            ResolveError::PackageNotFound(_) => "package_not_found",
            ResolveError::VersionNotFound(_) => "version_not_found",
            ResolveError::DomainNotFound(_) => "domain_not_found",
            ResolveError::FileNotFound { .. } => "file_not_found",
            ResolveError::CatalogUnavailable => "catalog_unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_lists_checked_packages() {
        let error = ResolveError::FileNotFound {
            file: "js/bootstrap.min.js".to_string(),
            packages: vec!["bootstrap@3.3.5".to_string(), "jquery@2.1.4".to_string()],
        };

        assert_eq!(
            error.to_string(),
            "File not found: js/bootstrap.min.js (checked bootstrap@3.3.5, jquery@2.1.4)"
        );
        assert_eq!(error.kind(), "file_not_found");
    }
}
