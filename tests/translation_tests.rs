//! End-to-end translation tests: Go text in, Java text out.
//!
//! Run with: `cargo test --test translation_tests`

use gojava::backend::{GenerateError, GeneratorOptions, generate_function, generate_unit};
use gojava::config::Settings;
use gojava::frontend::{ParserStrategy, parse_declaration, parse_unit};

const STRATEGIES: [ParserStrategy; 2] = [ParserStrategy::Scan, ParserStrategy::Grammar];

fn translate(src: &str, strategy: ParserStrategy, options: &GeneratorOptions) -> String {
    let unit = parse_unit(src, strategy);
    generate_unit(&unit, None, options).expect("translatable declarations")
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn error_result_becomes_a_throws_clause() {
    let src = "package calc\n\nfunc add(a int, b int) (int, error) {\n\treturn a + b, nil\n}\n";
    for strategy in STRATEGIES {
        let java = translate(src, strategy, &GeneratorOptions::default());
        assert!(java.contains("static int add(int a, int b) throws Exception {\n"), "{strategy}: {java}");
        assert!(java.contains("        return 0;\n"), "{strategy}: {java}");
        assert!(!java.contains("AddResult"), "{strategy}: {java}");
    }
}

#[test]
fn variadic_parameter_becomes_primitive_varargs() {
    let src = "package calc\n\nfunc sum(numbers ...int) int {\n\ttotal := 0\n\treturn total\n}\n";
    for strategy in STRATEGIES {
        let java = translate(src, strategy, &GeneratorOptions::minimal());
        assert!(java.contains("static int sum(int... numbers) {"), "{strategy}: {java}");
        assert!(!java.contains("Integer..."), "{strategy}: {java}");
    }
}

#[test]
fn embedded_reader_is_composed_next_to_an_accessor_field() {
    let src = "package stream\n\nimport \"io\"\n\n// Buffered wraps a reader.\ntype Buffered struct {\n\t*io.Reader\n\tName string\n}\n";
    for strategy in STRATEGIES {
        let java = translate(src, strategy, &GeneratorOptions::default());
        assert!(java.contains("public static class Buffered {"), "{strategy}: {java}");
        assert!(java.contains("private InputStream reader;"), "{strategy}: {java}");
        assert!(java.contains("private String name;"), "{strategy}: {java}");
        assert!(java.contains("public String getName() {"), "{strategy}: {java}");
        assert!(java.contains("public void setName(String name) {"), "{strategy}: {java}");
        assert!(!java.contains("extends") && !java.contains("implements"), "{strategy}: {java}");
        assert!(java.contains("import java.io.InputStream;"), "{strategy}: {java}");
    }
}

#[test]
fn standalone_declarations_render_without_a_class() {
    let f = parse_declaration("func add(a int, b int) (int, error) {").expect("declaration");
    insta::assert_snapshot!(generate_function(&f, &GeneratorOptions::minimal()), @r"
    static int add(int a, int b) throws Exception {
        return 0;
    }
    ");
}

// ============================================================================
// Whole files
// ============================================================================

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
fn both_strategies_produce_the_same_java() {
    let options = GeneratorOptions::default();
    assert_eq!(
        translate(SHAPES, ParserStrategy::Scan, &options),
        translate(SHAPES, ParserStrategy::Grammar, &options)
    );
}

#[test]
fn a_whole_package_becomes_one_outer_class() {
    let java = translate(SHAPES, ParserStrategy::Grammar, &GeneratorOptions::default());
    assert!(java.starts_with("// Translated from Go package `shapes` by gojava."));
    assert!(java.contains("public class Shapes {"));
    assert!(java.contains("public static final Unit METRIC = new Unit(0);"));
    assert!(java.contains("public static final Unit IMPERIAL = new Unit(1);"));
    assert!(java.contains("public static String defaultName = \"shape\";"));
    assert!(java.contains("public interface Shape {"));
    assert!(java.contains("double area();"));
    assert!(java.contains("public static class Rect {"));
    assert!(java.contains("private double width; // `json:\"w\"`"));
    assert!(java.contains("public double area() {"));
    assert!(java.contains("public static Rect newRect(double w, double h) throws Exception {"));
    assert!(java.contains("/** Rect is a rectangle. */") || java.contains("* Rect is a rectangle."));
}

#[test]
fn options_only_remove_decoration() {
    let full = translate(SHAPES, ParserStrategy::Grammar, &GeneratorOptions::default());
    let bare = translate(SHAPES, ParserStrategy::Grammar, &GeneratorOptions::minimal());
    assert!(full.contains("// Go → Java:"));
    assert!(!bare.contains("// Go → Java:"));
    assert!(!bare.contains("/**"));
    assert!(!bare.contains("getWidth"));
    for skeleton in ["public static class Rect {", "public interface Shape {", "public double area() {"] {
        assert!(full.contains(skeleton) && bare.contains(skeleton), "{skeleton}");
    }
}

#[test]
fn settings_drive_the_generator() {
    let settings = Settings::from_json_str(r#"{"gojava.emitLearningNotes": false, "gojava.parser": "scan"}"#)
        .expect("settings");
    let java = translate(SHAPES, settings.parser, &settings.generator_options());
    assert!(!java.contains("// Go → Java:"));
    assert!(java.contains("/**"));
}

#[test]
fn learning_notes_appear_once_per_file() {
    let src = "package p\n\nfunc A() (int, error) { return 0, nil }\n\nfunc B() (int, error) { return 0, nil }\n";
    let java = translate(src, ParserStrategy::Grammar, &GeneratorOptions::default());
    assert_eq!(java.matches("A Go `error` result becomes `throws Exception`").count(), 1);
}

#[test]
fn unparsable_declarations_do_not_block_the_rest() {
    let src = "package p\n\nfunc Map[T any](xs []T) []T { return xs }\n\ntype Point struct {\n\tX, Y int\n}\n";
    for strategy in STRATEGIES {
        let java = translate(src, strategy, &GeneratorOptions::minimal());
        assert!(java.contains("public static class Point {"), "{strategy}: {java}");
        assert!(java.contains("// gojava: skipped `Map` at line 3:"), "{strategy}: {java}");
    }
}

#[test]
fn text_without_declarations_is_an_error_with_a_stub() {
    for strategy in STRATEGIES {
        let unit = parse_unit("package empty\n\n// nothing here\n", strategy);
        let err = generate_unit(&unit, None, &GeneratorOptions::default()).expect_err("no declarations");
        let GenerateError::NoDeclarations { stub, .. } = &err;
        assert!(stub.starts_with("// gojava: no translatable declarations found."), "{strategy}: {stub}");
        let code = miette::Diagnostic::code(&err).map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("gojava::no_declarations"));
    }
}

const MIXED_SAMPLE: &str = r#"package main

import "fmt"

func add(a int, b int) int {
	return a + b
}

func greet(name string) string {
	return "Hello, " + name
}

func divide(a, b float64) (float64, error) {
	if b == 0 {
		return 0, fmt.Errorf("division by zero")
	}
	return a / b, nil
}

func processNumbers(nums []int) (int, int, error) {
	if len(nums) == 0 {
		return 0, 0, fmt.Errorf("empty slice")
	}
	sum := 0
	product := 1
	for _, num := range nums {
		sum += num
		product *= num
	}
	return sum, product, nil
}

type Person struct {
	name string
}

func (p *Person) GetName() string {
	return p.name
}

func calculateStats(data map[string]int) (float64, int) {
	total := 0
	count := 0
	for _, value := range data {
		total += value
		count++
	}
	avg := float64(total) / float64(count)
	return avg, count
}
"#;

#[test]
fn both_strategies_see_every_function_in_a_mixed_file() {
    let expected = ["add", "greet", "divide", "processNumbers", "calculateStats"];
    for strategy in STRATEGIES {
        let unit = parse_unit(MIXED_SAMPLE, strategy);
        assert!(unit.failures.is_empty(), "{strategy}: {:?}", unit.failures);
        let names: Vec<&str> = unit.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, expected, "{strategy}");
        assert_eq!(unit.structs[0].methods.len(), 1, "{strategy}");

        let java = translate(MIXED_SAMPLE, strategy, &GeneratorOptions::minimal());
        assert!(java.contains("static String greet(String name) {"), "{strategy}: {java}");
        assert!(java.contains("static int add(int a, int b) {"), "{strategy}: {java}");
    }
}

#[test]
fn untyped_constants_beyond_int_range_become_long() {
    let src = "package limits\n\nconst Big = 5000000000\n\nconst Small = 42\n\nconst Mask = 0xFFFFFFFF\n";
    for strategy in STRATEGIES {
        let java = translate(src, strategy, &GeneratorOptions::default());
        assert!(java.contains("public static final long BIG = 5000000000L;"), "{strategy}: {java}");
        assert!(java.contains("public static final int SMALL = 42;"), "{strategy}: {java}");
        assert!(java.contains("public static final long MASK = 0xFFFFFFFFL;"), "{strategy}: {java}");
    }
}
