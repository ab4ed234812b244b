use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::{self, ExportDocument};
use crate::error::{Result, SpmigError};
use crate::model::{Task, TaskField};
use crate::settings::{SettingKey, SettingValues, SettingsState, SettingsStrategy, Variant};

/// Two-step guard in front of [`FormState::reset`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ClearState {
    #[default]
    Idle,
    Pending,
}

/// Identifies one file read. Only the most recently issued ticket may apply
/// its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportTicket(u64);

/// In-memory form: the ordered task rows plus the shared settings.
#[derive(Debug)]
pub struct FormState {
    tasks: Vec<Task>,
    settings: SettingsState,
    defaults: SettingValues,
    strategy: Box<dyn SettingsStrategy>,
    clear: ClearState,
    import_generation: u64,
}

impl FormState {
    pub fn new(variant: Variant) -> Self {
        Self::with_defaults(variant, SettingValues::default())
    }

    /// Start with one blank task; `defaults` are the values restored on reset.
    pub fn with_defaults(variant: Variant, defaults: SettingValues) -> Self {
        Self {
            tasks: vec![Task::default()],
            settings: SettingsState::with_values(defaults.clone()),
            defaults,
            strategy: variant.strategy(),
            clear: ClearState::Idle,
            import_generation: 0,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, index: usize) -> Result<&Task> {
        self.tasks
            .get(index)
            .ok_or(SpmigError::TaskOutOfRange(index))
    }

    pub fn settings(&self) -> &SettingsState {
        &self.settings
    }

    pub fn variant(&self) -> Variant {
        self.strategy.variant()
    }

    pub fn is_configurable(&self) -> bool {
        self.strategy.is_configurable()
    }

    pub fn clear_state(&self) -> ClearState {
        self.clear
    }

    /// Append a blank task and return its index.
    pub fn add_task(&mut self) -> usize {
        self.tasks.push(Task::default());
        tracing::debug!(count = self.tasks.len(), "task added");
        self.tasks.len() - 1
    }

    pub fn remove_task(&mut self, index: usize) -> Result<Task> {
        if index >= self.tasks.len() {
            return Err(SpmigError::TaskOutOfRange(index));
        }
        if self.tasks.len() == 1 {
            return Err(SpmigError::LastTask);
        }
        let removed = self.tasks.remove(index);
        tracing::debug!(index, count = self.tasks.len(), "task removed");
        Ok(removed)
    }

    pub fn update_field(&mut self, index: usize, field: TaskField, value: &str) -> Result<()> {
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(SpmigError::TaskOutOfRange(index))?;
        task.set_field(field, value);
        Ok(())
    }

    /// Flip a settings flag and return its new state.
    pub fn toggle_setting(&mut self, key: SettingKey) -> Result<bool> {
        self.ensure_configurable()?;
        let enabled = self.settings.toggle(key);
        tracing::debug!(%key, enabled, "setting toggled");
        Ok(enabled)
    }

    pub fn set_setting_enabled(&mut self, key: SettingKey, enabled: bool) -> Result<()> {
        self.ensure_configurable()?;
        self.settings.set_enabled(key, enabled);
        Ok(())
    }

    pub fn set_setting_value(&mut self, key: SettingKey, value: &str) -> Result<()> {
        self.ensure_configurable()?;
        self.settings.set_value(key, value)
    }

    fn ensure_configurable(&self) -> Result<()> {
        if self.strategy.is_configurable() {
            Ok(())
        } else {
            Err(SpmigError::SettingsNotConfigurable(
                self.variant().to_string(),
            ))
        }
    }

    /// Replace every task with the example task.
    pub fn load_example(&mut self) {
        self.tasks = vec![Task::example()];
        tracing::info!("example task loaded");
    }

    pub fn request_clear(&mut self) {
        self.clear = ClearState::Pending;
    }

    pub fn cancel_clear(&mut self) {
        self.clear = ClearState::Idle;
    }

    /// Reset the form if a clear was requested. Returns whether it did.
    pub fn confirm_clear(&mut self) -> bool {
        if self.clear != ClearState::Pending {
            return false;
        }
        self.reset();
        true
    }

    /// One blank task, every flag off, values back to their defaults.
    pub fn reset(&mut self) {
        self.tasks = vec![Task::default()];
        self.settings = SettingsState::with_values(self.defaults.clone());
        self.clear = ClearState::Idle;
        tracing::info!("form cleared");
    }

    /// Start reading a file. Issuing a new ticket supersedes older ones.
    pub fn begin_import(&mut self) -> ImportTicket {
        self.import_generation += 1;
        ImportTicket(self.import_generation)
    }

    /// Apply a finished read. Returns `Ok(None)` when a newer read was started
    /// in the meantime; on a parse error the current tasks are kept.
    pub fn complete_import(&mut self, ticket: ImportTicket, text: &str) -> Result<Option<usize>> {
        if ticket.0 != self.import_generation {
            tracing::debug!(ticket = ticket.0, latest = self.import_generation, "stale import ignored");
            return Ok(None);
        }
        let tasks = codec::deserialize(text).inspect_err(|err| {
            tracing::warn!(%err, "import rejected");
        })?;
        let count = tasks.len();
        self.tasks = tasks;
        tracing::info!(count, "tasks imported");
        Ok(Some(count))
    }

    pub fn import_text(&mut self, text: &str) -> Result<usize> {
        let ticket = self.begin_import();
        Ok(self.complete_import(ticket, text)?.unwrap_or_default())
    }

    pub fn import_file(&mut self, path: &Path) -> Result<usize> {
        let ticket = self.begin_import();
        let text = fs::read_to_string(path)?;
        Ok(self.complete_import(ticket, &text)?.unwrap_or_default())
    }

    /// Document for the current state, complete or not.
    pub fn document(&self) -> ExportDocument {
        codec::build_document(&self.tasks, &self.settings, self.strategy.as_ref())
    }

    /// Pretty JSON of the current state, without validation.
    pub fn preview(&self) -> Result<String> {
        codec::to_pretty_json(&self.document())
    }

    /// Pretty JSON ready to save. Fails if any task is incomplete.
    pub fn export(&self) -> Result<String> {
        let document = codec::serialize(&self.tasks, &self.settings, self.strategy.as_ref())?;
        codec::to_pretty_json(&document)
    }

    /// Validate, then write the export to `path`. Nothing is written on error.
    ///
    /// The document goes to a `.tmp` sibling first and is renamed into place,
    /// so an existing file at `path` is either fully replaced or untouched.
    pub fn write_export(&self, path: &Path) -> Result<()> {
        let json = self.export()?;
        let tmp_path = staging_path(path);
        if let Err(err) = fs::write(&tmp_path, json).and_then(|()| fs::rename(&tmp_path, path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }
        tracing::info!(path = %path.display(), tasks = self.tasks.len(), "export written");
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(Variant::default())
    }
}
