use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpmigError};

pub const DEFAULT_DATE: &str = "2016-05-22";
pub const DEFAULT_SKIP_EXTENSIONS: &str = "txt:mp3";

const DATE_FORMAT: &str = "%Y-%m-%d";
const KEY_COUNT: usize = 5;

/// Optional migration settings, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    MigrateHiddenItems,
    MigrateItemsCreatedAfter,
    MigrateItemsModifiedAfter,
    SkipFilesWithExtensions,
    MigrateOneNoteNotebook,
}

impl SettingKey {
    pub const ALL: [Self; KEY_COUNT] = [
        Self::MigrateHiddenItems,
        Self::MigrateItemsCreatedAfter,
        Self::MigrateItemsModifiedAfter,
        Self::SkipFilesWithExtensions,
        Self::MigrateOneNoteNotebook,
    ];

    fn index(self) -> usize {
        match self {
            Self::MigrateHiddenItems => 0,
            Self::MigrateItemsCreatedAfter => 1,
            Self::MigrateItemsModifiedAfter => 2,
            Self::SkipFilesWithExtensions => 3,
            Self::MigrateOneNoteNotebook => 4,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::MigrateHiddenItems => "MigrateHiddenItems",
            Self::MigrateItemsCreatedAfter => "MigrateItemsCreatedAfter",
            Self::MigrateItemsModifiedAfter => "MigrateItemsModifiedAfter",
            Self::SkipFilesWithExtensions => "SkipFilesWithExtensions",
            Self::MigrateOneNoteNotebook => "MigrateOneNoteNotebook",
        }
    }

    /// Whether the key carries a value besides its flag.
    pub fn has_value(self) -> bool {
        matches!(
            self,
            Self::MigrateItemsCreatedAfter
                | Self::MigrateItemsModifiedAfter
                | Self::SkipFilesWithExtensions
        )
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Values attached to the keys that carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingValues {
    pub created_after: String,
    pub modified_after: String,
    pub skip_extensions: String,
}

impl Default for SettingValues {
    fn default() -> Self {
        Self {
            created_after: DEFAULT_DATE.to_string(),
            modified_after: DEFAULT_DATE.to_string(),
            skip_extensions: DEFAULT_SKIP_EXTENSIONS.to_string(),
        }
    }
}

impl SettingValues {
    pub fn validate(&self) -> Result<()> {
        check_date(SettingKey::MigrateItemsCreatedAfter, &self.created_after)?;
        check_date(SettingKey::MigrateItemsModifiedAfter, &self.modified_after)?;
        Ok(())
    }
}

/// Shared settings applied to every task of an export batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsState {
    enabled: [bool; KEY_COUNT],
    values: SettingValues,
}

impl SettingsState {
    pub fn with_values(values: SettingValues) -> Self {
        Self {
            enabled: [false; KEY_COUNT],
            values,
        }
    }

    pub fn is_enabled(&self, key: SettingKey) -> bool {
        self.enabled[key.index()]
    }

    pub fn set_enabled(&mut self, key: SettingKey, enabled: bool) {
        self.enabled[key.index()] = enabled;
    }

    /// Flip a flag and return its new state.
    pub fn toggle(&mut self, key: SettingKey) -> bool {
        let slot = &mut self.enabled[key.index()];
        *slot = !*slot;
        *slot
    }

    pub fn enabled_keys(&self) -> Vec<SettingKey> {
        SettingKey::ALL
            .into_iter()
            .filter(|key| self.is_enabled(*key))
            .collect()
    }

    pub fn value(&self, key: SettingKey) -> Option<&str> {
        match key {
            SettingKey::MigrateItemsCreatedAfter => Some(&self.values.created_after),
            SettingKey::MigrateItemsModifiedAfter => Some(&self.values.modified_after),
            SettingKey::SkipFilesWithExtensions => Some(&self.values.skip_extensions),
            SettingKey::MigrateHiddenItems | SettingKey::MigrateOneNoteNotebook => None,
        }
    }

    /// Set the value attached to `key`. Dates are trimmed and must be
    /// `YYYY-MM-DD`; on error the previous value is kept. The extension list
    /// is stored as given.
    pub fn set_value(&mut self, key: SettingKey, value: &str) -> Result<()> {
        match key {
            SettingKey::MigrateItemsCreatedAfter => {
                let date = value.trim();
                check_date(key, date)?;
                self.values.created_after = date.to_string();
            }
            SettingKey::MigrateItemsModifiedAfter => {
                let date = value.trim();
                check_date(key, date)?;
                self.values.modified_after = date.to_string();
            }
            SettingKey::SkipFilesWithExtensions => {
                self.values.skip_extensions = value.to_string();
            }
            SettingKey::MigrateHiddenItems | SettingKey::MigrateOneNoteNotebook => {
                return Err(SpmigError::InvalidSettingValue(
                    key.key().to_string(),
                    "this setting is a flag and takes no value".into(),
                ));
            }
        }
        Ok(())
    }
}

fn check_date(key: SettingKey, value: &str) -> Result<()> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|err| {
        SpmigError::InvalidSettingValue(
            key.key().to_string(),
            format!("'{value}' is not a YYYY-MM-DD date ({err})"),
        )
    })?;
    Ok(())
}

/// Settings object written under each task when optional settings are
/// configurable. Disabled keys are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigurableSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrate_hidden_items: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrate_items_created_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrate_items_modified_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_files_with_extensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrate_one_note_notebook: Option<bool>,
}

/// Constant settings object stamped on every task by the fixed variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FixedSettings {
    pub default_package_file_count: u32,
    pub migrate_site_settings: u32,
    pub migrate_root_folder: bool,
}

impl Default for FixedSettings {
    fn default() -> Self {
        Self {
            default_package_file_count: 0,
            migrate_site_settings: 0,
            migrate_root_folder: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TaskSettings {
    Configurable(ConfigurableSettings),
    Fixed(FixedSettings),
}

/// Turns the shared settings state into the per-task `Settings` object.
pub trait SettingsStrategy: std::fmt::Debug {
    fn variant(&self) -> Variant;

    /// Whether the user may toggle flags or edit values.
    fn is_configurable(&self) -> bool;

    fn build(&self, state: &SettingsState) -> TaskSettings;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigurableStrategy;

impl SettingsStrategy for ConfigurableStrategy {
    fn variant(&self) -> Variant {
        Variant::Configurable
    }

    fn is_configurable(&self) -> bool {
        true
    }

    fn build(&self, state: &SettingsState) -> TaskSettings {
        let value_if = |key: SettingKey| {
            state
                .is_enabled(key)
                .then(|| state.value(key).unwrap_or_default().to_string())
        };
        TaskSettings::Configurable(ConfigurableSettings {
            migrate_hidden_items: state.is_enabled(SettingKey::MigrateHiddenItems).then_some(true),
            migrate_items_created_after: value_if(SettingKey::MigrateItemsCreatedAfter),
            migrate_items_modified_after: value_if(SettingKey::MigrateItemsModifiedAfter),
            skip_files_with_extensions: value_if(SettingKey::SkipFilesWithExtensions),
            migrate_one_note_notebook: state
                .is_enabled(SettingKey::MigrateOneNoteNotebook)
                .then_some(true),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedStrategy;

impl SettingsStrategy for FixedStrategy {
    fn variant(&self) -> Variant {
        Variant::Fixed
    }

    fn is_configurable(&self) -> bool {
        false
    }

    fn build(&self, _state: &SettingsState) -> TaskSettings {
        TaskSettings::Fixed(FixedSettings::default())
    }
}

/// Which settings strategy an export uses.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[clap(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Configurable,
    Fixed,
}

impl Variant {
    pub fn strategy(self) -> Box<dyn SettingsStrategy> {
        match self {
            Self::Configurable => Box::new(ConfigurableStrategy),
            Self::Fixed => Box::new(FixedStrategy),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configurable => write!(f, "configurable"),
            Self::Fixed => write!(f, "fixed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(settings: &TaskSettings) -> String {
        serde_json::to_string(settings).unwrap()
    }

    #[test]
    fn nothing_enabled_builds_empty_object() {
        let state = SettingsState::default();
        assert_eq!(json(&ConfigurableStrategy.build(&state)), "{}");
    }

    #[test]
    fn all_enabled_keeps_table_order() {
        let mut state = SettingsState::default();
        for key in SettingKey::ALL {
            state.set_enabled(key, true);
        }
        assert_eq!(
            json(&ConfigurableStrategy.build(&state)),
            r#"{"MigrateHiddenItems":true,"MigrateItemsCreatedAfter":"2016-05-22","MigrateItemsModifiedAfter":"2016-05-22","SkipFilesWithExtensions":"txt:mp3","MigrateOneNoteNotebook":true}"#
        );
    }

    #[test]
    fn disabling_a_flag_removes_its_key() {
        let mut state = SettingsState::default();
        state.set_enabled(SettingKey::MigrateOneNoteNotebook, true);
        state.set_enabled(SettingKey::SkipFilesWithExtensions, true);
        assert!(json(&ConfigurableStrategy.build(&state)).contains("SkipFilesWithExtensions"));

        assert!(!state.toggle(SettingKey::SkipFilesWithExtensions));
        let out = json(&ConfigurableStrategy.build(&state));
        assert_eq!(out, r#"{"MigrateOneNoteNotebook":true}"#);
        assert!(!out.contains("false"));
        assert!(!out.contains("null"));
    }

    #[test]
    fn values_only_appear_when_flag_enabled() {
        let mut state = SettingsState::default();
        state.set_value(SettingKey::MigrateItemsCreatedAfter, "2020-01-31").unwrap();
        assert_eq!(json(&ConfigurableStrategy.build(&state)), "{}");

        state.toggle(SettingKey::MigrateItemsCreatedAfter);
        assert_eq!(
            json(&ConfigurableStrategy.build(&state)),
            r#"{"MigrateItemsCreatedAfter":"2020-01-31"}"#
        );
    }

    #[test]
    fn invalid_date_is_rejected_and_previous_value_kept() {
        let mut state = SettingsState::default();
        let err = state
            .set_value(SettingKey::MigrateItemsModifiedAfter, "2020-13-40")
            .unwrap_err();
        assert_eq!(err.code(), "invalid_setting_value");
        assert_eq!(
            state.value(SettingKey::MigrateItemsModifiedAfter),
            Some(DEFAULT_DATE)
        );
    }

    #[test]
    fn extension_list_is_stored_as_typed_and_dates_trimmed() {
        let mut state = SettingsState::default();
        state
            .set_value(SettingKey::SkipFilesWithExtensions, " txt : mp3 ")
            .unwrap();
        state
            .set_value(SettingKey::MigrateItemsCreatedAfter, " 2021-02-03\t")
            .unwrap();
        assert_eq!(
            state.value(SettingKey::SkipFilesWithExtensions),
            Some(" txt : mp3 ")
        );
        assert_eq!(
            state.value(SettingKey::MigrateItemsCreatedAfter),
            Some("2021-02-03")
        );
    }

    #[test]
    fn flag_only_keys_take_no_value() {
        let mut state = SettingsState::default();
        assert!(state.set_value(SettingKey::MigrateHiddenItems, "x").is_err());
        assert_eq!(state.value(SettingKey::MigrateOneNoteNotebook), None);
    }

    #[test]
    fn fixed_strategy_ignores_state() {
        let mut state = SettingsState::default();
        state.set_enabled(SettingKey::MigrateHiddenItems, true);
        assert_eq!(
            json(&FixedStrategy.build(&state)),
            r#"{"DefaultPackageFileCount":0,"MigrateSiteSettings":0,"MigrateRootFolder":true}"#
        );
        assert!(!FixedStrategy.is_configurable());
    }

    #[test]
    fn variant_selects_strategy() {
        assert_eq!(Variant::default().strategy().variant(), Variant::Configurable);
        assert_eq!(Variant::Fixed.strategy().variant(), Variant::Fixed);
    }

    #[test]
    fn setting_values_validate_dates() {
        let values = SettingValues {
            created_after: "yesterday".into(),
            ..SettingValues::default()
        };
        assert!(values.validate().is_err());
        assert!(SettingValues::default().validate().is_ok());
    }
}
