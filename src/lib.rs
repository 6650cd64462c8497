//! testport: MSTest to xUnit source migration.
//!
//! Reports MSTest constructs in a compiled C# unit under stable rule ids and
//! rewrites them into their xUnit equivalents.

// Core infrastructure - re-exported from testport-core
pub use testport_core::config;
pub use testport_core::diff;
pub use testport_core::error;
pub use testport_core::output;
pub use testport_core::span;
pub use testport_core::types;

// Syntax and semantic model
pub use testport_syntax as syntax;

// Migration engine
pub use testport_mstest as mstest;

// Front door
pub mod cli;
