//! Common types for request parsing

/// File part of a package reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRequest {
    /// No usable file given; the package's main file is used
    Main,
    /// Literal file path requested by the client
    Explicit(String),
}

/// Package reference extracted from one request token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReference {
    /// Package name (e.g., "jquery", "bootswatch")
    pub name: String,
    /// Requested version or range; `None` means the catalog's latest
    pub version: Option<String>,
    pub file: FileRequest,
}

/// Shape of one request token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedToken {
    /// Already domain-qualified URL, forwarded without catalog lookup
    Passthrough(String),
    Reference(PackageReference),
}
