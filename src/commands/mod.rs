pub mod example;
pub mod export;
pub mod preview;
pub mod tui;
pub mod validate;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::Config;
use crate::error::Result;
use crate::form::FormState;
use crate::settings::{SettingKey, Variant};

/// Optional settings given on the command line. Each flag enables its key;
/// value flags also set the value, or keep the default when given bare.
#[derive(Debug, Clone, Default, Args)]
pub struct SettingsFlags {
    /// Include MigrateHiddenItems
    #[arg(long)]
    pub hidden_items: bool,
    /// Include MigrateItemsCreatedAfter (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", num_args = 0..=1, default_missing_value = "")]
    pub created_after: Option<String>,
    /// Include MigrateItemsModifiedAfter (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", num_args = 0..=1, default_missing_value = "")]
    pub modified_after: Option<String>,
    /// Include SkipFilesWithExtensions (colon-delimited, e.g. txt:mp3)
    #[arg(long, value_name = "LIST", num_args = 0..=1, default_missing_value = "")]
    pub skip_extensions: Option<String>,
    /// Include MigrateOneNoteNotebook
    #[arg(long)]
    pub onenote: bool,
}

impl SettingsFlags {
    pub fn is_empty(&self) -> bool {
        !self.hidden_items
            && self.created_after.is_none()
            && self.modified_after.is_none()
            && self.skip_extensions.is_none()
            && !self.onenote
    }

    pub fn apply(&self, form: &mut FormState) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        if self.hidden_items {
            form.set_setting_enabled(SettingKey::MigrateHiddenItems, true)?;
        }
        for (key, value) in [
            (SettingKey::MigrateItemsCreatedAfter, &self.created_after),
            (SettingKey::MigrateItemsModifiedAfter, &self.modified_after),
            (SettingKey::SkipFilesWithExtensions, &self.skip_extensions),
        ] {
            let Some(value) = value else { continue };
            form.set_setting_enabled(key, true)?;
            if !value.is_empty() {
                form.set_setting_value(key, value)?;
            }
        }
        if self.onenote {
            form.set_setting_enabled(SettingKey::MigrateOneNoteNotebook, true)?;
        }
        Ok(())
    }
}

/// Where the task rows come from.
#[derive(Debug, Clone, Default, Args)]
pub struct TaskSource {
    /// Task document to read (`-` for stdin)
    #[arg(long, short, value_name = "FILE", conflicts_with = "example")]
    pub input: Option<PathBuf>,
    /// Start from the example task instead of a file
    #[arg(long)]
    pub example: bool,
}

/// Build a form from config, source and flags. With no source the form keeps
/// its single blank task.
pub fn load_form(
    config: &Config,
    variant: Option<Variant>,
    source: &TaskSource,
    flags: &SettingsFlags,
) -> Result<FormState> {
    let mut form = FormState::with_defaults(
        variant.unwrap_or(config.variant),
        config.defaults.clone(),
    );

    if source.example {
        form.load_example();
    } else if let Some(input) = &source.input {
        let text = read_source(input)?;
        form.import_text(&text)?;
    }

    flags.apply(&mut form)?;
    Ok(form)
}

fn read_source(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        let mut contents = String::new();
        std::io::stdin().read_to_string(&mut contents)?;
        return Ok(contents);
    }
    Ok(fs::read_to_string(source)?)
}
