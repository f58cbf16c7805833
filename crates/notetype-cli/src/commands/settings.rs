//! Settings command implementation.

use crate::cli::{SettingsAction, SettingsArgs};
use crate::config::{set_credential, ConfigStore, CredentialOverrides};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use notetype_domain::{Settings, SettingsStore};

/// Execute the settings command.
///
/// Credentials are read and written through [`SettingsStore`]; the other keys
/// live in the rest of the configuration file.
pub async fn execute_settings(
    args: SettingsArgs,
    store: &ConfigStore,
    overrides: &CredentialOverrides,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        SettingsAction::Show => {
            let config = store.load_or_init().await?;
            println!("{}", formatter.settings(&config)?);
        }
        SettingsAction::Set {
            key: Some(key),
            value: Some(value),
        } => {
            if key.is_credential() {
                update_settings(store, |settings| set_credential(settings, key, &value)).await?;
            } else {
                let mut config = store.load_or_init().await?;
                config.set(key, &value)?;
                store.save_config(&config).await?;
            }
            print_saved(store, formatter);
        }
        SettingsAction::Set { .. } => {
            if overrides.is_empty() {
                return Err(CliError::InvalidInput(
                    "Nothing to set: give <KEY> <VALUE>, or --token and --folder-id".into(),
                ));
            }
            update_settings(store, |settings| overrides.apply(settings)).await?;
            print_saved(store, formatter);
        }
        SettingsAction::Path => {
            println!("{}", store.path().display());
        }
    }

    Ok(())
}

/// Load the saved credentials, change them, and save them back.
pub async fn update_settings<S, F>(store: &S, update: F) -> Result<Settings>
where
    S: SettingsStore<Error = CliError>,
    F: FnOnce(&mut Settings) -> Result<()>,
{
    let mut settings = store.load().await?;
    update(&mut settings)?;
    store.save(&settings).await?;
    Ok(settings)
}

fn print_saved(store: &ConfigStore, formatter: &Formatter) {
    println!(
        "{}",
        formatter.success(&format!("Saved to {}", store.path().display()))
    );
}
