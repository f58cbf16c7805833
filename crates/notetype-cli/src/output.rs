//! Output formatting for the CLI.

use crate::config::{Config, OutputFormat};
use crate::error::Result;
use colored::*;
use notetype_classifier::{ClassifyError, ClassifyOutcome};
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Shown in place of a path when no note was given.
pub const NO_DOCUMENT: &str = "<no document>";

/// What happened to one note.
#[derive(Debug, Clone)]
pub struct NoteReport {
    /// File path, or [`NO_DOCUMENT`]
    pub target: String,
    /// Outcome of the classification
    pub result: std::result::Result<ClassifyOutcome, ClassifyError>,
}

impl NoteReport {
    /// Whether this note counts as a failure.
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }

    fn status(&self) -> &'static str {
        match &self.result {
            Ok(ClassifyOutcome::Classified { .. }) => "classified",
            Ok(ClassifyOutcome::Unclassified { .. }) => "unclassified",
            Err(ClassifyError::Auth(_)) => "auth_error",
            Err(_) => "error",
        }
    }
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the line printed as soon as one note is done.
    ///
    /// Unrecognized answers produce no line. Failures go to stderr, so in
    /// quiet mode they are `target<TAB>auth_error` or `target<TAB>error`.
    pub fn note_line(&self, report: &NoteReport) -> Option<String> {
        match self.format {
            OutputFormat::Json => None,
            OutputFormat::Quiet => match &report.result {
                Ok(ClassifyOutcome::Classified { note_type, .. }) => {
                    Some(format!("{}\t{}", report.target, note_type))
                }
                Ok(ClassifyOutcome::Unclassified { .. }) => None,
                Err(_) => Some(format!("{}\t{}", report.target, report.status())),
            },
            OutputFormat::Table => match &report.result {
                Ok(ClassifyOutcome::Classified { note_type, written }) => {
                    let suffix = if *written { "" } else { " (not written)" };
                    Some(self.success(&format!(
                        "{}: {}{}",
                        report.target,
                        note_type.label(),
                        suffix
                    )))
                }
                Ok(ClassifyOutcome::Unclassified { .. }) => None,
                Err(ClassifyError::Auth(message)) => Some(self.error(&format!(
                    "{}: {}. Update the token with `notetype settings set bearer-token <TOKEN>`",
                    report.target, message
                ))),
                Err(e) => Some(self.error(&format!("{}: {}", report.target, e))),
            },
        }
    }

    /// Format the summary printed after all notes are done.
    pub fn summary(&self, reports: &[NoteReport]) -> Result<Option<String>> {
        match self.format {
            OutputFormat::Json => Ok(Some(self.summary_json(reports)?)),
            OutputFormat::Table if reports.len() > 1 => Ok(Some(self.summary_table(reports))),
            _ => Ok(None),
        }
    }

    fn summary_json(&self, reports: &[NoteReport]) -> Result<String> {
        let items: Vec<serde_json::Value> = reports
            .iter()
            .map(|r| match &r.result {
                Ok(ClassifyOutcome::Classified { note_type, written }) => json!({
                    "file": r.target,
                    "status": r.status(),
                    "noteType": note_type.as_str(),
                    "written": written,
                }),
                Ok(ClassifyOutcome::Unclassified { answer }) => json!({
                    "file": r.target,
                    "status": r.status(),
                    "answer": answer,
                }),
                Err(e) => json!({
                    "file": r.target,
                    "status": r.status(),
                    "message": e.to_string(),
                }),
            })
            .collect();

        Ok(serde_json::to_string_pretty(&items)?)
    }

    fn summary_table(&self, reports: &[NoteReport]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["File", "Status", "Note type"]);

        for report in reports {
            let note_type = match &report.result {
                Ok(outcome) => outcome.note_type().to_string(),
                Err(_) => "-".to_string(),
            };
            builder.push_record([report.target.as_str(), report.status(), note_type.as_str()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format saved settings, with the token masked.
    pub fn settings(&self, config: &Config) -> Result<String> {
        let token = config.settings.masked_token();
        let timeout = config.client.request_timeout_secs.to_string();
        let color = config.output.color.to_string();
        let format = format!("{:?}", config.output.format).to_lowercase();

        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "bearer_token": token,
                "folder_id": config.settings.folder_id,
                "request_timeout_secs": config.client.request_timeout_secs,
                "color": config.output.color,
                "format": format,
            }))?),
            _ => {
                let mut builder = Builder::default();
                builder.push_record(["Setting", "Value"]);
                builder.push_record(["bearer-token", token.as_str()]);
                builder.push_record(["folder-id", config.settings.folder_id.as_str()]);
                builder.push_record(["request-timeout-secs", timeout.as_str()]);
                builder.push_record(["color", color.as_str()]);
                builder.push_record(["format", format.as_str()]);

                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
