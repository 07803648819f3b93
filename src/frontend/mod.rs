//! gojava frontend
//!
//! This module turns Go source text into the Source Model:
//! - `scan`: the line scanner (fast, tolerant of partial and invalid trailing text)
//! - `grammar`: the tree walker over the `gojava_syntax` parser (exact, with source positions)
//! - `typeref`: the type-text and parameter-list rules both strategies share
//! - `consts`: const-group expansion (`iota`, implicit repetition) and literal inference
//!
//! ## Notes
//! - The strategies are interchangeable: both return a [`SourceUnit`], both record unparsable declarations as
//!   [`crate::model::ParseFailure`]s instead of failing, and both attach methods the same way.

// Syntax components are provided by the shared gojava_syntax crate.
pub use gojava_syntax::{ast, diagnostics, lexer, parser};

pub mod consts;
pub mod grammar;
pub mod scan;
pub mod typeref;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{Function, SourceUnit};

/// Which parser produces the Source Model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserStrategy {
    /// Line and bracket scanning.
    Scan,
    /// Full lexer and declaration grammar.
    #[default]
    Grammar,
}

impl ParserStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            ParserStrategy::Scan => "scan",
            ParserStrategy::Grammar => "grammar",
        }
    }
}

impl fmt::Display for ParserStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParserStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scan" => Ok(ParserStrategy::Scan),
            "grammar" => Ok(ParserStrategy::Grammar),
            other => Err(format!("unknown parser strategy `{other}` (expected `scan` or `grammar`)")),
        }
    }
}

/// Parse a Go file or fragment into a [`SourceUnit`].
///
/// Never fails: text with no recognizable declaration yields an empty unit (check [`SourceUnit::is_empty`]).
#[tracing::instrument(skip_all, fields(strategy = %strategy, source_len = text.len()))]
pub fn parse_unit(text: &str, strategy: ParserStrategy) -> SourceUnit {
    let mut unit = match strategy {
        ParserStrategy::Scan => scan::scan_unit(text),
        ParserStrategy::Grammar => grammar::walk_unit(text),
    };
    attach_methods(&mut unit);
    tracing::debug!(
        structs = unit.structs.len(),
        interfaces = unit.interfaces.len(),
        functions = unit.functions.len(),
        failures = unit.failures.len(),
        "parsed unit"
    );
    unit
}

/// Parse the first function or method declaration in `text`.
///
/// Uses the line scanner, so a complete signature followed by an unfinished body or other trailing junk still
/// parses. Returns `None` if no function signature is recognized.
pub fn parse_declaration(text: &str) -> Option<Function> {
    scan::scan_unit(text).functions.into_iter().next()
}

/// Move methods onto the struct or named type their receiver names.
///
/// The receiver's pointer qualifier is stripped before matching. Methods whose receiver names no type in the unit
/// stay in [`SourceUnit::functions`] with `is_method` set.
pub fn attach_methods(unit: &mut SourceUnit) {
    for function in std::mem::take(&mut unit.functions) {
        let Some(owner) = function.receiver_type_name().map(str::to_string) else {
            unit.functions.push(function);
            continue;
        };
        if let Some(s) = unit.structs.iter_mut().find(|s| s.name == owner) {
            s.methods.push(function);
        } else if let Some(t) = unit.typedefs.iter_mut().find(|t| t.name == owner) {
            t.methods.push(function);
        } else {
            unit.functions.push(function);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: &str = r#"// Package shapes is a sample.
package shapes

import (
	"fmt"
	"io"
)

// Unit of measure.
type Unit int

const (
	Metric Unit = iota
	Imperial
)

var DefaultName = "shape"

// Shape is anything with an area.
type Shape interface {
	fmt.Stringer
	// Area computes the area.
	Area() float64
}

// Rect is a rectangle.
type Rect struct {
	io.Reader
	Width, Height float64 `json:"w"`
	name          string
}

// Area computes the area.
func (r *Rect) Area() float64 {
	return r.Width * r.Height
}

func (u Unit) String() string { return "unit" }

func NewRect(w, h float64) (*Rect, error) {
	return &Rect{Width: w, Height: h}, nil
}
"#;

    #[test]
    fn strategies_agree_on_structure() {
        let scanned = parse_unit(SHAPES, ParserStrategy::Scan);
        let walked = parse_unit(SHAPES, ParserStrategy::Grammar);
        assert!(walked.failures.is_empty(), "{:?}", walked.failures);
        assert_eq!(scanned.without_positions(), walked.without_positions());
    }

    #[test]
    fn members_on_brace_lines_are_kept_by_both_strategies() {
        let src = "package p\n\ntype T struct { Z bool\n\tA int\n\tB string }\n\n\
                   type S interface { Len() int\n\tio.Reader }\n";
        let scanned = parse_unit(src, ParserStrategy::Scan);
        let walked = parse_unit(src, ParserStrategy::Grammar);
        assert!(scanned.failures.is_empty(), "{:?}", scanned.failures);
        assert_eq!(scanned.without_positions(), walked.without_positions());

        let fields: Vec<_> = scanned.structs[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["Z", "A", "B"]);
        assert_eq!(scanned.interfaces[0].methods.len(), 1);
        assert_eq!(scanned.interfaces[0].embedded.len(), 1);
    }

    #[test]
    fn methods_attach_by_receiver_base_name() {
        let unit = parse_unit(SHAPES, ParserStrategy::Grammar);
        let rect = unit.find_struct("Rect").expect("Rect");
        assert_eq!(rect.methods.len(), 1);
        assert_eq!(rect.methods[0].name, "Area");
        let unit_type = unit.find_typedef("Unit").expect("Unit");
        assert_eq!(unit_type.methods[0].name, "String");
        let free: Vec<_> = unit.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(free, vec!["NewRect"]);
    }

    #[test]
    fn unmatched_receivers_stay_free_functions() {
        let unit = parse_unit("func (c *Client) Do() error { return nil }\n", ParserStrategy::Grammar);
        assert_eq!(unit.functions.len(), 1);
        assert!(unit.functions[0].is_method);
    }

    #[test]
    fn parse_declaration_tolerates_trailing_text() {
        let f = parse_declaration("func add(a, b int) (int, error) {\n\treturn a +").expect("function");
        assert_eq!(f.name, "add");
        assert_eq!(f.params.len(), 2);
        assert!(f.has_error_return());
        assert!(parse_declaration("type X struct{}").is_none());
        assert!(parse_declaration("not go at all").is_none());
    }

    #[test]
    fn parsing_is_idempotent_per_strategy() {
        for strategy in [ParserStrategy::Scan, ParserStrategy::Grammar] {
            assert_eq!(parse_unit(SHAPES, strategy), parse_unit(SHAPES, strategy));
        }
    }

    #[test]
    fn strategy_names_round_trip() {
        for strategy in [ParserStrategy::Scan, ParserStrategy::Grammar] {
            assert_eq!(strategy.as_str().parse::<ParserStrategy>(), Ok(strategy));
        }
        assert!("regex".parse::<ParserStrategy>().is_err());
    }
}
