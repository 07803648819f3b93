//! Code generator options.
//!
//! Every option is additive: turning one off removes comments or boilerplate but never changes the structural
//! skeleton (classes, fields, method signatures) of the output.

/// Code generator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// No-arg constructors on classes, plus an all-fields constructor on result wrappers
    pub emit_constructors: bool,
    /// Getter/setter pairs for struct fields
    pub emit_getters_setters: bool,
    /// Javadoc from Go doc comments and cross-reference notes
    pub emit_doc_comments: bool,
    /// Render declarations found by the dependency resolver
    pub emit_external_types: bool,
    /// `// Go → Java:` explanatory notes
    pub emit_learning_notes: bool,
    /// Declare `throws Exception` for `error` results; either way they never occupy the return type
    pub errors_as_exceptions: bool,
    /// Box scalar types outside containers as well
    pub box_scalars: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            emit_constructors: true,
            emit_getters_setters: true,
            emit_doc_comments: true,
            emit_external_types: true,
            emit_learning_notes: true,
            errors_as_exceptions: true,
            box_scalars: false,
        }
    }
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the structural skeleton: no comments, constructors or accessors.
    pub fn minimal() -> Self {
        Self {
            emit_constructors: false,
            emit_getters_setters: false,
            emit_doc_comments: false,
            emit_external_types: false,
            emit_learning_notes: false,
            ..Self::default()
        }
    }

    pub fn with_constructors(mut self, on: bool) -> Self {
        self.emit_constructors = on;
        self
    }

    pub fn with_getters_setters(mut self, on: bool) -> Self {
        self.emit_getters_setters = on;
        self
    }

    pub fn with_doc_comments(mut self, on: bool) -> Self {
        self.emit_doc_comments = on;
        self
    }

    pub fn with_external_types(mut self, on: bool) -> Self {
        self.emit_external_types = on;
        self
    }

    pub fn with_learning_notes(mut self, on: bool) -> Self {
        self.emit_learning_notes = on;
        self
    }

    pub fn with_errors_as_exceptions(mut self, on: bool) -> Self {
        self.errors_as_exceptions = on;
        self
    }

    pub fn with_box_scalars(mut self, on: bool) -> Self {
        self.box_scalars = on;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_emit_everything_but_boxing() {
        let options = GeneratorOptions::default();
        assert!(options.emit_constructors && options.emit_getters_setters && options.emit_doc_comments);
        assert!(options.emit_external_types && options.emit_learning_notes && options.errors_as_exceptions);
        assert!(!options.box_scalars);
        assert_eq!(GeneratorOptions::new(), options);
    }

    #[test]
    fn test_builders_chain() {
        let options = GeneratorOptions::minimal()
            .with_doc_comments(true)
            .with_errors_as_exceptions(false)
            .with_box_scalars(true);
        assert!(options.emit_doc_comments);
        assert!(!options.emit_learning_notes);
        assert!(!options.errors_as_exceptions);
        assert!(options.box_scalars);
    }
}
