use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IconMapError {
    #[error("Catalog not found: {path} (create one with: iconmap sync --mode rebuild)")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse catalog {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Icon root does not exist: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Failed to read icon tree at {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to write catalog {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings {path}: {message}")]
    SettingsParse { path: PathBuf, message: String },

    #[error("Unknown settings key: {key}")]
    SettingsKeyNotFound { key: String },

    #[error("Invalid value for {key}: '{value}' - {reason}")]
    InvalidSettingsValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("{count} catalog service(s) have no icon file")]
    MissingIcons { count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    YamlSer(#[from] serde_yaml::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, IconMapError>;

impl IconMapError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigNotFound { .. } => 2,
            Self::ConfigParse { .. } => 3,
            Self::PathNotFound { .. } => 4,
            Self::Write { .. } => 5,
            Self::SettingsParse { .. } => 6,
            Self::SettingsKeyNotFound { .. } | Self::InvalidSettingsValue { .. } => 7,
            Self::MissingIcons { .. } => 8,
            Self::Scan { .. } => 9,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_for_fatal_run_errors() {
        let not_found = IconMapError::ConfigNotFound {
            path: PathBuf::from("Config.yaml"),
        };
        let missing_root = IconMapError::PathNotFound {
            path: PathBuf::from("source/official"),
        };
        assert_eq!(not_found.exit_code(), 2);
        assert_eq!(missing_root.exit_code(), 4);

        let unreadable = IconMapError::Scan {
            path: PathBuf::from("source/official/storage"),
            source: walkdir::WalkDir::new("/nonexistent/iconmap-root")
                .into_iter()
                .find_map(|e| e.err())
                .unwrap(),
        };
        assert_eq!(unreadable.exit_code(), 9);
        assert!(unreadable.to_string().contains("source/official/storage"));
    }

    #[test]
    fn messages_name_the_offending_path() {
        let err = IconMapError::PathNotFound {
            path: PathBuf::from("source/manual"),
        };
        assert!(err.to_string().contains("source/manual"));
    }
}
