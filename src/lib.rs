//! Resolves shorthand package references such as `jquery@2.1.x` or
//! `bootswatch/slate` into canonical CDN URLs.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod parser;
pub mod proxy;
pub mod version;
