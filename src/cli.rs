//! CLI argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Default ceiling on the size of a single input file, in bytes
pub const DEFAULT_MAX_SOURCE_BYTES: usize = 1_000_000;

/// Rule-based Python test synthesizer and test-quality checker
#[derive(Parser, Debug)]
#[command(name = "testwright")]
#[command(about = "Generates pytest suites from Python source and validates candidate tests")]
#[command(version)]
#[command(author)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(
        short,
        long,
        global = true,
        default_value = "text",
        value_enum,
        env = "TESTWRIGHT_FORMAT"
    )]
    pub format: OutputFormat,

    /// Refuse input files larger than this many bytes
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_MAX_SOURCE_BYTES,
        env = "TESTWRIGHT_MAX_SOURCE_BYTES"
    )]
    pub max_source_bytes: usize,

    /// Log progress to stderr (same as TESTWRIGHT_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate a test suite for each Python file.
    ///
    /// All files share one session, so later files receive suggestions
    /// learned from earlier ones.
    Analyze {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Check candidate test files for isolation and quality issues
    Validate {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Source file the candidates exercise
        #[arg(long, value_name = "FILE")]
        source: Option<PathBuf>,
    },

    /// Report the cyclomatic complexity of every class and function
    Complexity {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable boxed report - default
    #[default]
    Text,
    /// JSON - standard JSON output
    Json,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log filter used when TESTWRIGHT_LOG is unset or invalid
    pub fn default_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_takes_many_files() {
        let cli = Cli::try_parse_from(["testwright", "analyze", "a.py", "b.py"]).unwrap();
        match cli.command {
            Command::Analyze { files } => assert_eq!(files.len(), 2),
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.max_source_bytes, DEFAULT_MAX_SOURCE_BYTES);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "testwright",
            "validate",
            "test_a.py",
            "--source",
            "a.py",
            "--format",
            "json",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.default_log_level(), "debug");
        match cli.command {
            Command::Validate { files, source } => {
                assert_eq!(files, vec![PathBuf::from("test_a.py")]);
                assert_eq!(source, Some(PathBuf::from("a.py")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_analyze_requires_a_file() {
        assert!(Cli::try_parse_from(["testwright", "analyze"]).is_err());
    }
}
