//! CLI module for the gojava translator
//!
//! This module provides the command-line interface over the translation pipeline.
//!
//! ## Commands
//!
//! - `translate <file>` - Parse a Go file, optionally resolve external types, and print the Java translation
//! - `parse <file>` - Dump the Source Model a parser strategy produces
//! - `decl <text>` - Translate a single function or method declaration
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::config::Settings;
use crate::frontend::ParserStrategy;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The input had nothing to translate; an error stub was printed instead.
    pub const NO_DECLARATIONS: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a diagnostic (code, help, labelled source) as the error message.
    pub fn diagnostic<D>(diagnostic: D, exit_code: ExitCode) -> Self
    where
        D: miette::Diagnostic + Send + Sync + 'static,
    {
        Self::new(format!("{:?}", miette::Report::new(diagnostic)), exit_code)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Translate Go declarations into Java skeletons
#[derive(Parser, Debug)]
#[command(name = "gojava")]
#[command(version = VERSION)]
#[command(about = "Structural Go to Java translator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate a Go file into a Java file
    Translate {
        /// Go source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Write the Java file here instead of stdout
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
        /// Resolve types declared in other files of the workspace
        #[arg(long)]
        resolve: bool,
        /// Resolver depth bound
        #[arg(long, value_name = "N", requires = "resolve")]
        depth: Option<usize>,
        /// Extra directories to index for resolution (the file's own directory is always indexed)
        #[arg(long = "include", value_name = "DIR")]
        include: Vec<PathBuf>,
        #[command(flatten)]
        flags: SharedFlags,
    },

    /// Print the Source Model parsed from a Go file
    Parse {
        /// Go source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        flags: SharedFlags,
    },

    /// Translate a single function or method declaration
    Decl {
        /// Declaration text, e.g. `func (c *Client) Get(url string) ([]byte, error)`
        #[arg(value_name = "TEXT")]
        text: String,
        #[command(flatten)]
        flags: SharedFlags,
    },
}

/// Options every command accepts; they override the settings file.
#[derive(Args, Debug, Clone, Default)]
pub struct SharedFlags {
    /// Settings file (JSON object of `gojava.*` keys)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Parser strategy: `scan` or `grammar`
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<ParserStrategy>,
    /// Leave out `// Go → Java:` notes
    #[arg(long)]
    pub no_notes: bool,
    /// Leave out Javadoc
    #[arg(long)]
    pub no_docs: bool,
}

impl SharedFlags {
    /// Load the settings file (if any) and apply the flags on top.
    pub fn settings(&self) -> CliResult<Settings> {
        let settings = match &self.config {
            Some(path) => Settings::load(path).map_err(|e| CliError::diagnostic(e, ExitCode::FAILURE))?,
            None => Settings::default(),
        };
        Ok(self.apply(settings))
    }

    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(strategy) = self.strategy {
            settings = settings.with_parser(strategy);
        }
        if self.no_notes {
            settings = settings.with_learning_notes(false);
        }
        if self.no_docs {
            settings = settings.with_doc_comments(false);
        }
        settings
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Translate {
            file,
            output,
            resolve,
            depth,
            include,
            flags,
        } => {
            let mut settings = flags.settings()?;
            if resolve {
                settings = settings.with_resolver(true);
            }
            if let Some(depth) = depth {
                settings = settings.with_max_depth(depth);
            }
            commands::translate(&file, output.as_deref(), &include, &settings)
        }
        Command::Parse { file, flags } => commands::parse(&file, &flags.settings()?),
        Command::Decl { text, flags } => commands::decl(&text, &flags.settings()?),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_translate() {
        let cli = Cli::try_parse_from(["gojava", "translate", "user.go", "-o", "User.java"]).unwrap();
        if let Command::Translate { file, output, resolve, .. } = cli.command {
            assert_eq!(file, PathBuf::from("user.go"));
            assert_eq!(output, Some(PathBuf::from("User.java")));
            assert!(!resolve);
        } else {
            panic!("Expected Translate command");
        }
    }

    #[test]
    fn test_cli_parse_translate_with_resolver() {
        let cli = Cli::try_parse_from([
            "gojava",
            "translate",
            "user.go",
            "--resolve",
            "--depth",
            "2",
            "--include",
            "../models",
            "--include",
            "../shared",
        ])
        .unwrap();
        if let Command::Translate { resolve, depth, include, .. } = cli.command {
            assert!(resolve);
            assert_eq!(depth, Some(2));
            assert_eq!(include.len(), 2);
        } else {
            panic!("Expected Translate command");
        }
    }

    #[test]
    fn test_cli_depth_requires_resolve() {
        assert!(Cli::try_parse_from(["gojava", "translate", "user.go", "--depth", "2"]).is_err());
    }

    #[test]
    fn test_cli_parse_strategy() {
        let cli = Cli::try_parse_from(["gojava", "parse", "user.go", "--strategy", "scan"]).unwrap();
        if let Command::Parse { flags, .. } = cli.command {
            assert_eq!(flags.strategy, Some(ParserStrategy::Scan));
        } else {
            panic!("Expected Parse command");
        }
        assert!(Cli::try_parse_from(["gojava", "parse", "user.go", "--strategy", "regex"]).is_err());
    }

    #[test]
    fn test_cli_parse_decl() {
        let cli = Cli::try_parse_from(["gojava", "decl", "func Add(a, b int) int", "--no-notes"]).unwrap();
        if let Command::Decl { text, flags } = cli.command {
            assert_eq!(text, "func Add(a, b int) int");
            assert!(flags.no_notes);
        } else {
            panic!("Expected Decl command");
        }
    }

    #[test]
    fn test_flags_override_settings() {
        let flags = SharedFlags {
            strategy: Some(ParserStrategy::Scan),
            no_notes: true,
            ..SharedFlags::default()
        };
        let settings = flags.apply(Settings::default());
        assert_eq!(settings.parser, ParserStrategy::Scan);
        assert!(!settings.emit_learning_notes);
        assert!(settings.emit_doc_comments);
    }

    #[test]
    fn test_missing_config_is_a_failure() {
        let flags = SharedFlags {
            config: Some(PathBuf::from("/definitely/not/settings.json")),
            ..SharedFlags::default()
        };
        let err = flags.settings().unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("gojava::settings"));
    }
}
