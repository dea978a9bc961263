use crate::formatting::{ColorMode, FormattingConfig};
use crate::output::OutputFormat;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "covstat")]
#[command(about = "Go coverage and test statistics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// When to use colors (defaults to NO_COLOR/CLICOLOR detection)
    #[arg(long, value_enum, global = true)]
    pub color: Option<ColorMode>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report coverage from a `go test -coverprofile` profile
    Cover {
        /// Statement coverage profile
        profile: PathBuf,

        /// Existing `go tool cover -func` output (otherwise the Go tool is run)
        #[arg(long = "func")]
        func: Option<PathBuf>,

        /// Module path trimmed from file names
        #[arg(long, env = "COVSTAT_ROOT_MODULE")]
        root_module: Option<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sort packages, files and functions by name
        #[arg(long)]
        sort: bool,
    },

    /// Report results from `go test -json` output
    Tests {
        /// File containing the JSON event stream
        json: PathBuf,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn formatting(&self) -> FormattingConfig {
        self.color
            .map(FormattingConfig::new)
            .unwrap_or_else(FormattingConfig::from_env)
    }
}

/// Log filter for a `-v` count; `RUST_LOG` still takes precedence.
pub fn log_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize env_logger once at startup
pub fn init_logging(verbosity: u8) {
    let env = env_logger::Env::default().default_filter_or(log_filter(verbosity));
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        eprintln!("Note: logger already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cover_command() {
        let cli = Cli::try_parse_from([
            "covstat",
            "-v",
            "cover",
            "cover.out",
            "--func",
            "func.out",
            "--root-module",
            "github.com/acme/proj",
            "--format",
            "json",
            "--sort",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Cover {
                profile,
                func,
                root_module,
                format,
                sort,
                ..
            } => {
                assert_eq!(profile, PathBuf::from("cover.out"));
                assert_eq!(func, Some(PathBuf::from("func.out")));
                assert_eq!(root_module.as_deref(), Some("github.com/acme/proj"));
                assert_eq!(format, Some(OutputFormat::Json));
                assert!(sort);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_tests_command() {
        let cli = Cli::try_parse_from(["covstat", "tests", "out.json", "--color", "never"]).unwrap();
        assert_eq!(cli.color, Some(ColorMode::Never));
        assert!(matches!(cli.command, Commands::Tests { .. }));
    }

    #[test]
    fn test_log_filter_levels() {
        assert_eq!(log_filter(0), "warn");
        assert_eq!(log_filter(1), "debug");
        assert_eq!(log_filter(5), "trace");
    }
}
