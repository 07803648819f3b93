//! Java code emitter - builds Java source text with indentation tracking.

use std::fmt::Write;

/// Prefix of explanatory notes in generated code.
pub const LEARNING_NOTE_PREFIX: &str = "// Go → Java:";

/// A buffer for building Java source code with proper indentation
#[derive(Debug)]
pub struct JavaEmitter {
    buffer: String,
    indent_level: usize,
    indent_str: &'static str,
}

impl Default for JavaEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl JavaEmitter {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_str: "    ",
        }
    }

    /// Get the generated code
    pub fn finish(self) -> String {
        self.buffer
    }

    /// Write a line with current indentation
    pub fn line(&mut self, s: &str) {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
    }

    /// Write formatted text
    pub fn writef(&mut self, args: std::fmt::Arguments<'_>) {
        let _ = self.buffer.write_fmt(args);
    }

    /// Write a blank line, never two in a row and never directly after an opening brace.
    pub fn blank_line(&mut self) {
        if self.buffer.is_empty() || self.buffer.ends_with("\n\n") || self.buffer.ends_with("{\n") {
            return;
        }
        self.buffer.push('\n');
    }

    pub fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent_str);
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Write a block with braces
    pub fn block<F>(&mut self, header: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.line(&format!("{header} {{"));
        self.indent();
        f(self);
        self.dedent();
        self.line("}");
    }

    /// Write a comment
    pub fn comment(&mut self, text: &str) {
        for line in text.lines() {
            if line.is_empty() {
                self.line("//");
            } else {
                self.line(&format!("// {line}"));
            }
        }
    }

    /// Write a `// Go → Java:` explanatory note
    pub fn learning_note(&mut self, text: &str) {
        self.line(&format!("{LEARNING_NOTE_PREFIX} {text}"));
    }

    /// Write a Javadoc block; a single line collapses to `/** text */`.
    pub fn doc_comment(&mut self, lines: &[String]) {
        match lines {
            [] => {}
            [only] => self.line(&format!("/** {} */", escape_doc(only))),
            _ => {
                self.line("/**");
                for line in lines {
                    if line.is_empty() {
                        self.line(" *");
                    } else {
                        self.line(&format!(" * {}", escape_doc(line)));
                    }
                }
                self.line(" */");
            }
        }
    }

    /// Write an `import` statement
    pub fn import(&mut self, path: &str) {
        self.line(&format!("import {path};"));
    }
}

/// Keep Go comment text from closing the Javadoc early.
fn escape_doc(text: &str) -> String {
    text.replace("*/", "*&#47;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_indents_contents() {
        let mut e = JavaEmitter::new();
        e.block("class A", |e| {
            e.line("int x;");
            e.block("void f()", |e| e.line("return;"));
        });
        assert_eq!(e.finish(), "class A {\n    int x;\n    void f() {\n        return;\n    }\n}\n");
    }

    #[test]
    fn test_blank_lines_do_not_stack() {
        let mut e = JavaEmitter::new();
        e.blank_line();
        e.block("class A", |e| {
            e.blank_line();
            e.line("int x;");
            e.blank_line();
            e.blank_line();
            e.line("int y;");
        });
        assert_eq!(e.finish(), "class A {\n    int x;\n\n    int y;\n}\n");
    }

    #[test]
    fn test_doc_comment_shapes() {
        let mut e = JavaEmitter::new();
        e.doc_comment(&["One line.".to_string()]);
        e.doc_comment(&["First.".to_string(), String::new(), "Ends */ early".to_string()]);
        assert_eq!(e.finish(), "/** One line. */\n/**\n * First.\n *\n * Ends *&#47; early\n */\n");
    }
}
