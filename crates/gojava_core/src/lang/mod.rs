//! Go and Java vocabulary registries.
//!
//! Callers work with **stable IDs** (e.g. `KeywordId`, `PrimitiveId`) and look up spellings and mapping metadata
//! via registry tables, instead of scattering string comparisons across the parsers and the generator.
//!
//! ## Examples
//! ```rust
//! use gojava_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("func"), Some(KeywordId::Func));
//! assert_eq!(keywords::as_str(KeywordId::Func), "func");
//! ```

pub mod conventions;
pub mod keywords;
pub mod primitives;
pub mod punctuation;
pub mod stdlib;
