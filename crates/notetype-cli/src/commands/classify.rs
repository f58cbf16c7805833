//! Classify command implementation.

use crate::cli::ClassifyArgs;
use crate::config::{Config, CredentialOverrides};
use crate::error::{CliError, Result};
use crate::output::{Formatter, NoteReport, NO_DOCUMENT};
use notetype_classifier::{Classifier, ClassifyError, ClassifyOutcome, FileDocument, MemoryDocument};
use notetype_domain::{Document, Settings, SettingsStore};
use notetype_llm::CompletionProvider;
use std::path::Path;
use tracing::info;

/// Execute the classify command.
pub async fn execute_classify<S>(
    args: ClassifyArgs,
    store: &S,
    overrides: &CredentialOverrides,
    config: &Config,
    formatter: &Formatter,
) -> Result<()>
where
    S: SettingsStore<Error = CliError>,
{
    let settings = resolve_settings(store, overrides).await?;
    let classifier = Classifier::from_settings(&settings, config.request_timeout())?;

    if args.files.is_empty() {
        eprintln!("{}", formatter.warning("No file given, classifying an empty note"));
    }

    let reports = classify_notes(&classifier, &args, formatter).await?;

    let failed = reports.iter().filter(|r| r.is_failure()).count();
    if failed > 0 {
        return Err(CliError::NotesFailed {
            failed,
            total: reports.len(),
        });
    }

    Ok(())
}

/// Load the saved credentials with this run's overrides applied.
///
/// The overrides are never saved.
pub async fn resolve_settings<S>(store: &S, overrides: &CredentialOverrides) -> Result<Settings>
where
    S: SettingsStore<Error = CliError>,
{
    let mut settings = store.load().await?;
    overrides.apply(&mut settings)?;
    Ok(settings)
}

/// Classify every file in `args`, one after another.
///
/// Each note's failure is reported and the rest are still processed.
pub async fn classify_notes<P: CompletionProvider>(
    classifier: &Classifier<P>,
    args: &ClassifyArgs,
    formatter: &Formatter,
) -> Result<Vec<NoteReport>> {
    let mut reports = Vec::with_capacity(args.files.len().max(1));

    if args.files.is_empty() {
        let result = classifier.classify::<FileDocument>(None).await;
        reports.push(report(formatter, NO_DOCUMENT.to_string(), result));
    }

    for path in &args.files {
        let result = classify_file(classifier, path, args.dry_run).await;
        reports.push(report(formatter, path.display().to_string(), result));
    }

    if let Some(summary) = formatter.summary(&reports)? {
        println!("{}", summary);
    }

    Ok(reports)
}

async fn classify_file<P: CompletionProvider>(
    classifier: &Classifier<P>,
    path: &Path,
    dry_run: bool,
) -> std::result::Result<ClassifyOutcome, ClassifyError> {
    let mut file = FileDocument::new(path);
    if !dry_run {
        return classifier.classify(Some(&mut file)).await;
    }

    // Classify a copy so the file on disk is never written
    let text = file
        .read_text()
        .await
        .map_err(|e| ClassifyError::Document(e.to_string()))?;
    let mut copy = MemoryDocument::new(text);

    match classifier.classify(Some(&mut copy)).await? {
        ClassifyOutcome::Classified { note_type, .. } => Ok(ClassifyOutcome::Classified {
            note_type,
            written: false,
        }),
        unclassified => Ok(unclassified),
    }
}

fn report(
    formatter: &Formatter,
    target: String,
    result: std::result::Result<ClassifyOutcome, ClassifyError>,
) -> NoteReport {
    let report = NoteReport { target, result };
    info!(target = %report.target, failed = report.is_failure(), "Note processed");
    if let Some(line) = formatter.note_line(&report) {
        if report.is_failure() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
    report
}
