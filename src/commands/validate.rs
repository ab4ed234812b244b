use crate::commands::{SettingsFlags, TaskSource, load_form};
use crate::config::Config;
use crate::error::{Result, SpmigError};
use crate::model::incomplete_tasks;
use crate::output::{self, Format};

/// Report completeness per task; fails when any task is incomplete.
pub fn run(config: &Config, source: &TaskSource, format: Format) -> Result<()> {
    let form = load_form(config, None, source, &SettingsFlags::default())?;
    let report = output::validation_report(form.tasks());
    output::print_validation(&report, format)?;

    let incomplete = incomplete_tasks(form.tasks());
    if incomplete.is_empty() {
        Ok(())
    } else {
        Err(SpmigError::Validation { incomplete })
    }
}
