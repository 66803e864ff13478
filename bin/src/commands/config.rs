//! Settings commands.

use anyhow::{Context, Result};
use m73eta_lib::SettingsStore;

/// Print the current settings.
pub(crate) fn show(settings: &SettingsStore) -> Result<()> {
    let current = settings.settings();
    let state = if settings.path().exists() {
        ""
    } else {
        " (not created yet)"
    };

    println!("Settings file: {}{state}", settings.path().display());
    println!("Silent mode:   {}", current.silent_mode_enabled);
    println!("Print mode:    {}", current.print_mode());

    Ok(())
}

/// Turn silent mode on or off.
pub(crate) fn set_silent(settings: &SettingsStore, enabled: bool) -> Result<()> {
    let changed = settings
        .set_silent_mode_enabled(enabled)
        .context("Failed to store settings")?;

    let state = if enabled { "enabled" } else { "disabled" };
    if changed {
        println!("Silent mode {state}.");
    } else {
        println!("Silent mode already {state}.");
    }

    Ok(())
}
