//! Parser layer
//! - types.rs: Common types (ParsedToken, PackageReference, FileRequest)
//! - request.rs: Request token parser and file naming rules

pub mod request;
pub mod types;

pub use request::{ParseError, RequestParser};
pub use types::{FileRequest, PackageReference, ParsedToken};
