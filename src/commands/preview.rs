use crate::commands::{SettingsFlags, TaskSource, load_form};
use crate::config::Config;
use crate::error::Result;
use crate::preview::{self, Theme};
use crate::settings::Variant;

/// Print the document an export would produce, highlighted. Incomplete tasks
/// are shown as they are.
pub fn run(
    config: &Config,
    variant: Option<Variant>,
    source: &TaskSource,
    flags: &SettingsFlags,
    theme: Option<Theme>,
) -> Result<()> {
    let form = load_form(config, variant, source, flags)?;
    let json = form.preview()?;
    println!("{}", preview::highlight_ansi(&json, theme.unwrap_or(config.theme)));
    Ok(())
}
