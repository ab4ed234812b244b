use crate::commands::{SettingsFlags, TaskSource, load_form};
use crate::config::Config;
use crate::error::Result;
use crate::output::{self, Format};
use crate::settings::Variant;

pub fn run(
    config: &Config,
    variant: Option<Variant>,
    flags: &SettingsFlags,
    format: Format,
) -> Result<()> {
    let source = TaskSource {
        input: None,
        example: true,
    };
    let form = load_form(config, variant, &source, flags)?;
    output::print_document(&form.document(), config.theme, format)
}
