//! Syntax-tree helpers for the Python grammar
//!
//! The extractor, the complexity scorer, the pattern matcher and the
//! validation rules all read the same handful of node shapes; the shared
//! accessors live in `common`.

pub mod common;
