//! Grammar-tree strategy: lex and parse with `gojava_syntax`, then walk the tree into the Source Model.
//!
//! Names, types, parameters and fields come straight from typed tree nodes; positions come from node spans. Every
//! diagnostic the lexer or parser reports becomes a [`ParseFailure`] attributed to the declaration it occurred in.

use gojava_core::lang::conventions::is_exported;
use gojava_syntax::ast::{
    Declaration, FieldDecl, FuncDecl, GenDecl, InterfaceElem, ParamDecl, Signature, SourceFile, Span, Spanned,
    TypeExpr, TypeSpec, ValueSpec,
};
use gojava_syntax::diagnostics::{CompileError, ErrorKind, line_col};
use gojava_syntax::lexer::lex;
use gojava_syntax::parser::parse_with_comments;

use super::consts::{self, RawSpec};
use crate::model::{
    FailureKind, Field, Function, Import, Interface, Parameter, ParseFailure, SourcePosition, SourceRange,
    SourceUnit, Struct, TypeDef, TypeRef,
};

/// Parse a whole file or fragment with the grammar-tree front end.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn walk_unit(source: &str) -> SourceUnit {
    let lexed = lex(source);
    let (file, errors) = parse_with_comments(&lexed.tokens, &lexed.comments);

    let mut walker = TreeWalker {
        source,
        unit: SourceUnit::default(),
    };
    walker.file(file);

    let mut failures: Vec<ParseFailure> = lexed
        .errors
        .iter()
        .chain(errors.iter())
        .map(|e| walker.failure(e))
        .collect();
    failures.sort_by_key(|f| f.line);
    walker.unit.failures = failures;
    walker.unit
}

struct TreeWalker<'a> {
    source: &'a str,
    unit: SourceUnit,
}

impl TreeWalker<'_> {
    fn position(&self, offset: usize) -> SourcePosition {
        let (line, col) = line_col(self.source, offset);
        SourcePosition::new(line, col)
    }

    fn range(&self, span: Span) -> SourceRange {
        SourceRange::new(self.position(span.start), self.position(span.end))
    }

    fn text(&self, span: Span) -> String {
        span.text(self.source).trim().to_string()
    }

    fn failure(&self, error: &CompileError) -> ParseFailure {
        let failure = ParseFailure {
            name: error.declaration.clone(),
            kind: match error.kind {
                ErrorKind::Unsupported => FailureKind::Unsupported,
                ErrorKind::Error | ErrorKind::Lexical | ErrorKind::Syntax => FailureKind::Syntax,
            },
            message: error.message.clone(),
            line: self.position(error.span.start).line,
        };
        tracing::debug!(line = failure.line, name = ?failure.name, kind = %error.kind, "grammar: {}", failure.message);
        failure
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn file(&mut self, file: SourceFile) {
        if let Some(package) = file.package {
            self.unit.package = package.node;
        }
        for import in file.imports {
            let line = self.position(import.span.start).line;
            self.unit.imports.push(Import {
                alias: import.node.alias,
                path: import.node.path,
                line: Some(line),
            });
        }
        for decl in file.declarations {
            match decl.node {
                Declaration::Const(group) => {
                    let specs = self.value_specs(group);
                    self.unit.constants.extend(consts::expand_const_group(specs));
                }
                Declaration::Var(group) => {
                    let specs = self.value_specs(group);
                    self.unit.variables.extend(consts::expand_var_group(specs));
                }
                Declaration::Type(group) => {
                    for spec in group.specs {
                        self.type_spec(spec);
                    }
                }
                Declaration::Func(func) => {
                    let function = self.function(func, decl.span);
                    self.unit.functions.push(function);
                }
            }
        }
    }

    fn value_specs(&self, group: GenDecl<ValueSpec>) -> Vec<RawSpec> {
        group
            .specs
            .into_iter()
            .map(|spec| RawSpec {
                position: Some(self.position(spec.span.start)),
                names: spec.node.names,
                ty: spec.node.ty.map(|t| self.type_ref(&t)),
                values: spec.node.values.iter().map(|v| self.text(*v)).collect(),
                doc: spec.node.doc,
            })
            .collect()
    }

    fn type_spec(&mut self, spec: Spanned<TypeSpec>) {
        let range = Some(self.range(spec.span));
        let TypeSpec { name, alias, ty, doc } = spec.node;
        match ty.node {
            TypeExpr::Struct(fields) => {
                let fields = fields.into_iter().flat_map(|f| self.fields(f)).collect();
                self.unit.structs.push(Struct {
                    name,
                    fields,
                    methods: Vec::new(),
                    doc,
                    range,
                });
            }
            TypeExpr::Interface(elems) => {
                let mut methods = Vec::new();
                let mut embedded = Vec::new();
                for elem in elems {
                    match elem.node {
                        InterfaceElem::Method {
                            name: method,
                            signature,
                            doc: method_doc,
                        } => {
                            let (params, results) = self.signature(&signature);
                            methods.push(Function {
                                name: method,
                                params,
                                results,
                                is_method: true,
                                receiver: None,
                                doc: method_doc,
                                range: Some(self.range(elem.span)),
                            });
                        }
                        InterfaceElem::Embedded(ty) => embedded.push(self.type_ref(&ty)),
                        InterfaceElem::Constraint => {}
                    }
                }
                self.unit.interfaces.push(Interface {
                    name,
                    methods,
                    embedded,
                    doc,
                    range,
                });
            }
            other => {
                let underlying = self.type_ref(&Spanned::new(other, ty.span));
                self.unit.typedefs.push(TypeDef {
                    name,
                    underlying,
                    alias,
                    methods: Vec::new(),
                    doc,
                    range,
                });
            }
        }
    }

    fn fields(&self, field: Spanned<FieldDecl>) -> Vec<Field> {
        let position = Some(self.position(field.span.start));
        let FieldDecl { names, ty, tag, doc } = field.node;
        let type_ref = self.type_ref(&ty);

        if names.is_empty() {
            let name = ty.node.base_name().map_or_else(|| self.text(ty.span), str::to_string);
            return vec![Field {
                exported: is_exported(&name),
                name,
                ty: type_ref,
                tag,
                embedded: true,
                doc,
                position,
            }];
        }
        names
            .into_iter()
            .map(|name| Field {
                exported: is_exported(&name),
                name,
                ty: type_ref.clone(),
                tag: tag.clone(),
                embedded: false,
                doc: doc.clone(),
                position,
            })
            .collect()
    }

    fn function(&self, func: FuncDecl, span: Span) -> Function {
        let (params, results) = self.signature(&func.signature);
        let receiver = func.receiver.as_ref().map(|r| self.parameter(&r.node));
        Function {
            name: func.name,
            params,
            results,
            is_method: receiver.is_some(),
            receiver,
            doc: func.doc,
            range: Some(self.range(span)),
        }
    }

    fn signature(&self, signature: &Signature) -> (Vec<Parameter>, Vec<Parameter>) {
        let convert =
            |list: &[Spanned<ParamDecl>]| -> Vec<Parameter> { list.iter().map(|p| self.parameter(&p.node)).collect() };
        (convert(&signature.params), convert(&signature.results))
    }

    fn parameter(&self, param: &ParamDecl) -> Parameter {
        let ty = self.type_ref(&param.ty);
        let ty = if param.variadic {
            TypeRef::Variadic(Box::new(ty))
        } else {
            ty
        };
        Parameter::new(param.name.clone().unwrap_or_default(), ty)
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn type_ref(&self, ty: &Spanned<TypeExpr>) -> TypeRef {
        match &ty.node {
            TypeExpr::Named {
                package: Some(package),
                name,
            } => TypeRef::Named {
                name: name.clone(),
                package: Some(package.clone()),
            },
            TypeExpr::Named { package: None, name } => TypeRef::named(name),
            TypeExpr::Pointer(inner) => TypeRef::Pointer(Box::new(self.type_ref(inner))),
            TypeExpr::Slice(elem) | TypeExpr::Array { elem, .. } => TypeRef::Slice(Box::new(self.type_ref(elem))),
            TypeExpr::Map { key, value } => {
                TypeRef::Map(Box::new(self.type_ref(key)), Box::new(self.type_ref(value)))
            }
            TypeExpr::Interface(elems) if elems.is_empty() => TypeRef::named("any"),
            TypeExpr::Chan { .. }
            | TypeExpr::Func(_)
            | TypeExpr::Struct(_)
            | TypeExpr::Interface(_)
            | TypeExpr::Generic { .. } => TypeRef::Opaque(self.text(ty.span)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_exact() {
        let unit = walk_unit("package p\n\ntype T struct {\n\tName string\n}\n");
        let s = &unit.structs[0];
        assert_eq!(s.range.map(|r| r.start), Some(SourcePosition::new(2, 5)));
        assert_eq!(s.fields[0].position, Some(SourcePosition::new(3, 1)));
    }

    #[test]
    fn variadic_and_array_types() {
        let unit = walk_unit("func Sum(grid [3]int, rest ...float64) {}\n");
        let f = &unit.functions[0];
        assert_eq!(f.params[0].ty.to_string(), "[]int");
        assert_eq!(f.params[1].ty.to_string(), "...float64");
    }

    #[test]
    fn opaque_types_keep_their_spelling() {
        let unit = walk_unit("type Handler func(ctx context.Context) error\nvar ch chan<- int\n");
        assert_eq!(
            unit.typedefs[0].underlying,
            TypeRef::Opaque("func(ctx context.Context) error".into())
        );
        assert_eq!(unit.variables[0].ty, Some(TypeRef::Opaque("chan<- int".into())));
    }

    #[test]
    fn parser_errors_become_named_failures() {
        let unit = walk_unit("type List[T any] struct{ xs []T }\n\nvar (\n\ta int\n\tb map[string]\n)\n\nfunc Ok() {}\n");
        let failures: Vec<_> = unit.failures.iter().map(|f| (f.name.as_deref(), f.kind)).collect();
        assert_eq!(failures[0], (Some("List"), FailureKind::Unsupported));
        assert_eq!(failures[1], (Some("b"), FailureKind::Syntax));
        assert_eq!(unit.variables.len(), 1);
        assert_eq!(unit.functions[0].name, "Ok");
    }

    #[test]
    fn lexical_errors_are_recorded() {
        let unit = walk_unit("func F() {}\n@\n");
        assert!(!unit.failures.is_empty());
        assert_eq!(unit.functions.len(), 1);
    }
}
