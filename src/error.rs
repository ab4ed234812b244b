use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpmigError {
    /// One or more tasks are incomplete. The message stays aggregate; the
    /// offending row indices are kept for callers that want them.
    #[error("please complete all fields for every task before exporting")]
    Validation { incomplete: Vec<usize> },

    #[error("failed to parse task document: {0}")]
    Parse(String),

    #[error("task {0} does not exist")]
    TaskOutOfRange(usize),

    #[error("at least one task must remain")]
    LastTask,

    #[error("settings are fixed in the {0} variant and cannot be changed")]
    SettingsNotConfigurable(String),

    #[error("invalid value for {0}: {1}")]
    InvalidSettingValue(String, String),

    #[error("invalid config file '{0}': {1}")]
    Config(String, String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SpmigError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::Parse(_) => "parse_error",
            Self::TaskOutOfRange(_) => "task_out_of_range",
            Self::LastTask => "last_task",
            Self::SettingsNotConfigurable(_) => "settings_not_configurable",
            Self::InvalidSettingValue(_, _) => "invalid_setting_value",
            Self::Config(_, _) => "config_error",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, SpmigError>;
