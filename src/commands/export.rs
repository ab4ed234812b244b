use std::path::{Path, PathBuf};

use crate::commands::{SettingsFlags, TaskSource, load_form};
use crate::config::Config;
use crate::error::Result;
use crate::output::{self, Format};
use crate::settings::Variant;

pub fn run(
    config: &Config,
    variant: Option<Variant>,
    source: &TaskSource,
    flags: &SettingsFlags,
    output_path: Option<PathBuf>,
    format: Format,
) -> Result<()> {
    let form = load_form(config, variant, source, flags)?;
    let path = output_path.unwrap_or_else(|| config.output_path());

    if path == Path::new("-") {
        println!("{}", form.export()?);
        return Ok(());
    }

    form.write_export(&path)?;
    output::print_exported(&path, form.tasks().len(), form.variant(), format)
}
