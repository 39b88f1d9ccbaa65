//! Request token parser
//!
//! Grammar, checked in order:
//! - `domain:name@version/file` - pass-through, no catalog lookup
//! - `name[@version]` - main file of the package
//! - `name[@version]/file` - explicit file

use crate::config::ResolverConfig;
use crate::parser::types::{FileRequest, PackageReference, ParsedToken};

/// Separator inside file paths
pub const PATH_SEPARATOR: char = '/';

/// CDN whose extension-less files are bootswatch theme directories
const BOOTSTRAP_DOMAIN: &str = "bootstrap";

/// Package allowed to request extension-less files (theme names)
const BOOTSWATCH_PACKAGE: &str = "bootswatch";

/// Stylesheet served for a bootswatch theme directory
const BOOTSWATCH_DEFAULT_FILE: &str = "bootstrap.min.css";

/// Error type for token parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid package reference: {0:?}")]
    InvalidToken(String),
}

/// Parser for single request tokens
#[derive(Debug, Clone)]
pub struct RequestParser {
    domain_separator: char,
    version_separator: char,
    package_separator: char,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new(&ResolverConfig::default())
    }
}

impl RequestParser {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            domain_separator: config.domain_separator,
            version_separator: config.version_separator,
            package_separator: config.package_separator,
        }
    }

    /// Parse one token into a pass-through URL or a package reference
    pub fn parse(&self, token: &str) -> Result<ParsedToken, ParseError> {
        if token.contains(self.domain_separator) {
            return Ok(ParsedToken::Passthrough(token.to_string()));
        }

        // The first character is skipped so that a leading slash is tolerated
        let separator = token
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == self.package_separator)
            .map(|(index, _)| index);

        let (reference, file) = match separator {
            Some(index) => {
                let file = &token[index + self.package_separator.len_utf8()..];
                (&token[..index], (!file.is_empty()).then_some(file))
            }
            None => (token, None),
        };

        let reference = reference
            .strip_prefix(self.package_separator)
            .unwrap_or(reference);
        let (name, version) = match reference.split_once(self.version_separator) {
            Some((name, version)) => (name, (!version.is_empty()).then_some(version)),
            None => (reference, None),
        };

        if name.is_empty() {
            return Err(ParseError::InvalidToken(token.to_string()));
        }

        let file = match file {
            Some(file) if has_extension(file) || name == BOOTSWATCH_PACKAGE => {
                FileRequest::Explicit(file.to_string())
            }
            _ => FileRequest::Main,
        };

        Ok(ParsedToken::Reference(PackageReference {
            name: name.to_string(),
            version: version.map(str::to_string),
            file,
        }))
    }

    /// Apply the file naming rules that depend on the resolved domain and name
    ///
    /// - on the `bootstrap` CDN an extension-less path is a theme directory and
    ///   gets `bootstrap.min.css` appended
    /// - a last path segment starting with `.` is prefixed with the package name
    ///   (`.min.css` -> `name.min.css`)
    pub fn finish_file(&self, domain: &str, name: &str, file: &str) -> String {
        let file = if domain == BOOTSTRAP_DOMAIN {
            bootswatch_file(file)
        } else {
            file.to_string()
        };

        let expanded = match file.rsplit_once(PATH_SEPARATOR) {
            Some((dir, last)) if last.starts_with('.') => {
                Some(format!("{dir}{PATH_SEPARATOR}{name}{last}"))
            }
            None if file.starts_with('.') => Some(format!("{name}{file}")),
            _ => None,
        };
        expanded.unwrap_or(file)
    }
}

fn has_extension(file: &str) -> bool {
    file.contains('.')
}

fn bootswatch_file(path: &str) -> String {
    if has_extension(path) {
        return path.to_string();
    }

    let mut path = path.to_string();
    if !path.ends_with(PATH_SEPARATOR) {
        path.push(PATH_SEPARATOR);
    }
    path.push_str(BOOTSWATCH_DEFAULT_FILE);
    path
}
