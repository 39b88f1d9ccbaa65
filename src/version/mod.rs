//! Version matching layer
//!
//! Implements the three-segment range policy used to pick a catalog version
//! when a request does not name an exact catalog key.
//!
//! # Modules
//!
//! - [`segment`]: Segment comparison, range test and ordering
//! - [`matcher`]: Version matcher trait and the wildcard implementation

pub mod matcher;
pub mod segment;
