//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use formfill_schemas::ValidationMode;
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Formfill CLI - Check form schemas, validate and submit answers
///
/// Checks schema documents before they are published, validates a
/// submission locally against a schema, and submits answers to a
/// configured backend.
#[derive(Parser, Debug)]
#[command(
    name = "formfill",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "FORMFILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a form schema document against the authoring rules
    Check(CheckArgs),

    /// Validate a submission locally against a form schema
    Validate(ValidateArgs),

    /// Submit answers for a form type and print the outcome
    Submit(SubmitArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the form schema (JSON or YAML)
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Which layers of rules to apply
    #[arg(short, long, value_enum, default_value = "strict")]
    pub mode: CheckMode,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the form schema (JSON or YAML)
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Path to the submitted answers (JSON or YAML object)
    #[arg(value_name = "SUBMISSION")]
    pub submission: PathBuf,

    /// Date used as "today" for relative date limits (YYYY-MM-DD)
    #[arg(long, value_parser = parse_day)]
    pub today: Option<NaiveDate>,
}

/// Arguments for the submit command
#[derive(Parser, Debug)]
pub struct SubmitArgs {
    /// Form type whose schema the answers are checked against
    #[arg(value_name = "FORM_TYPE")]
    pub form_type: String,

    /// Path to the submitted answers (JSON or YAML object)
    #[arg(value_name = "SUBMISSION")]
    pub submission: PathBuf,

    /// Run against an in-memory backend instead of the configured one
    #[arg(long, requires = "schema")]
    pub dry_run: bool,

    /// Schema to register for the form type in dry-run mode
    #[arg(long, value_name = "SCHEMA", requires = "dry_run")]
    pub schema: Option<PathBuf>,

    /// Backend URL override
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration, secrets redacted
    Show(ConfigShowArgs),

    /// Write a default configuration file
    Init(ConfigInitArgs),
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file (defaults to .formfill.toml)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Initialize the user config instead of the project config
    #[arg(long, conflicts_with = "path")]
    pub user: bool,

    /// Force overwrite existing config files
    #[arg(long)]
    pub force: bool,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// Pretty-printed JSON output
    JsonPretty,
    /// YAML output
    Yaml,
}

/// Rule layers applied by `check`
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CheckMode {
    /// Structure, field rules and cross-field rules
    Strict,
    /// Structure and field rules
    Partial,
    /// Structure only
    Basic,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected a date like 2025-03-10: {}", e))
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl From<CheckMode> for ValidationMode {
    fn from(mode: CheckMode) -> Self {
        match mode {
            CheckMode::Strict => ValidationMode::Strict,
            CheckMode::Partial => ValidationMode::Partial,
            CheckMode::Basic => ValidationMode::Basic,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::parse_from(["formfill", "-vv", "check", "form.yaml"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["formfill", "--quiet", "check", "form.yaml"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_check_mode_defaults_to_strict() {
        let cli = Cli::parse_from(["formfill", "check", "form.yaml"]);
        match cli.command {
            Commands::Check(args) => assert_eq!(ValidationMode::from(args.mode), ValidationMode::Strict),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_validate_today_is_parsed() {
        let cli = Cli::parse_from([
            "formfill", "validate", "form.yaml", "answers.json", "--today", "2025-03-10",
        ]);
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.today, NaiveDate::from_ymd_opt(2025, 3, 10));
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from([
            "formfill", "validate", "form.yaml", "answers.json", "--today", "10/03/2025",
        ])
        .is_err());
    }

    #[test]
    fn test_dry_run_requires_schema() {
        assert!(Cli::try_parse_from(["formfill", "submit", "survey", "answers.json", "--dry-run"]).is_err());
        assert!(Cli::try_parse_from([
            "formfill", "submit", "survey", "answers.json", "--dry-run", "--schema", "survey.yaml",
        ])
        .is_ok());
    }
}
