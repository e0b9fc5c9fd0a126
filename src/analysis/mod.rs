//! Static analysis of a loaded target.
//!
//! `walk` reports calls, `matcher` selects the catalog operations among them,
//! `resolver` turns their query argument into text and `query_list` orders
//! the result. `collect` ties them together.

pub mod collect;
pub mod matcher;
pub mod query_list;
pub mod resolver;
pub mod walk;

pub use collect::{collect_queries, prepare};
pub use matcher::{CallSite, Matcher};
pub use query_list::QueryList;
