//! prep - prepared statement list generator
//!
//! Scans a TypeScript/JavaScript package for calls to known data-access
//! operations, collects the query strings that are statically known, and
//! writes a generated module listing them so the package can prepare them
//! against its database connection at start-up.
//!
//! ## Module Structure
//!
//! - `analysis`: call matching, query resolution and ordering
//! - `catalog`: recognized operations and their query argument positions
//! - `cli`: command-line interface
//! - `config`: configuration file loading and parsing
//! - `emit`: rendering of the generated module
//! - `error`: fatal error taxonomy
//! - `loader`: package discovery, scanning and parsing
//! - `symbols`: module and lexical symbol resolution

pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod loader;
pub mod symbols;
