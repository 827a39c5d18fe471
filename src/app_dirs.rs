use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "piq";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    /// Used when no home directory can be determined
    fn fallback_dir() -> PathBuf {
        std::env::temp_dir().join(APP_NAME)
    }

    pub fn high_scores_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.data_dir().to_path_buf())
            .unwrap_or_else(Self::fallback_dir)
            .join("high_scores.json")
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().to_path_buf())
            .unwrap_or_else(Self::fallback_dir)
            .join("config.json")
    }

    pub fn log_dir() -> PathBuf {
        Self::project()
            .map(|pd| pd.data_local_dir().to_path_buf())
            .unwrap_or_else(Self::fallback_dir)
            .join("logs")
    }
}
