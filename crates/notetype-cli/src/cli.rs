//! CLI command definitions and argument parsing.

use crate::config::{ConfigKey, CredentialOverrides};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Notetype - sort zettelkasten notes into Fleeting, Permanent and Literature notes.
#[derive(Debug, Parser)]
#[command(name = "notetype")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Bearer token for this run (not saved)
    #[arg(long, global = true, env = "NOTETYPE_BEARER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Folder id for this run (not saved)
    #[arg(long, global = true, env = "NOTETYPE_FOLDER_ID")]
    pub folder_id: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Messages and tables (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one line per classified or failed note)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify notes and record the type in their front matter
    Classify(ClassifyArgs),

    /// Show or change saved settings
    Settings(SettingsArgs),
}

/// Arguments for the classify command.
#[derive(Debug, Parser)]
pub struct ClassifyArgs {
    /// Markdown files to classify, one after another
    pub files: Vec<PathBuf>,

    /// Report the type without writing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Arguments for settings management.
#[derive(Debug, Parser)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: SettingsAction,
}

/// Settings management actions.
#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Show saved settings (token masked)
    Show,

    /// Change settings and save them
    ///
    /// `set <KEY> <VALUE>` changes one setting; `set --token T --folder-id F`
    /// saves the given credentials.
    Set {
        /// Setting to change
        #[arg(value_enum, requires = "value")]
        key: Option<ConfigKey>,
        /// New value
        value: Option<String>,
    },

    /// Print the configuration file path
    Path,
}

impl Cli {
    /// Credentials given for this invocation.
    pub fn credential_overrides(&self) -> CredentialOverrides {
        CredentialOverrides {
            bearer_token: self.token.clone(),
            folder_id: self.folder_id.clone(),
        }
    }
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
