//! Core infrastructure for testport.
//!
//! This crate provides the language-agnostic pieces shared by the syntax
//! model, the MSTest migration engine and the CLI:
//!
//! - Byte spans and content hashes (`span`)
//! - Source locations (`types`)
//! - Unified error type and stable exit codes (`error`)
//! - JSON response envelopes (`output`)
//! - `testport.toml` configuration (`config`)
//! - Unified diff rendering (`diff`)

pub mod config;
pub mod diff;
pub mod error;
pub mod output;
pub mod span;
pub mod types;

pub use error::{OutputErrorCode, PortError};
pub use span::{ContentHash, Span};
pub use types::Location;
