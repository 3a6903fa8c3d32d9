//! Runner configuration, read from environment variables.

use std::path::{Path, PathBuf};

use wayfarer_tour::domain::config::TourConfig;

use crate::error::AppError;

const DEFAULT_FRAME_RATE: u32 = 60;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Reads `TOUR_LOG_FORMAT`. Anything but `json` selects text.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_value(std::env::var("TOUR_LOG_FORMAT").ok().as_deref())
    }

    /// Interprets a raw `TOUR_LOG_FORMAT` value.
    #[must_use]
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(value) if value.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Everything the runner needs to start a tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Tour description file (`TOUR_DESCRIPTION`).
    pub description: PathBuf,
    /// Directory assets are resolved under (`TOUR_ASSET_ROOT`).
    pub asset_root: PathBuf,
    /// Location the tour starts at (`TOUR_START_INDEX`).
    pub start_index: usize,
    /// Frame rate fades are stepped at (`TOUR_FRAME_RATE`).
    pub frame_rate: u32,
    /// Optional YAML file with timings and completion policy (`TOUR_CONFIG`).
    pub tour_config: Option<PathBuf>,
    /// Whether the console draws a fade overlay (`TOUR_NO_FADE` unset).
    pub fade: bool,
}

impl CliConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `TOUR_DESCRIPTION` is missing or a
    /// numeric variable does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `TOUR_DESCRIPTION` is missing or a
    /// numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let description = lookup("TOUR_DESCRIPTION")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                AppError::Config("TOUR_DESCRIPTION environment variable must be set".into())
            })?;

        let asset_root = lookup("TOUR_ASSET_ROOT")
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| default_asset_root(&description), PathBuf::from);

        let start_index = match lookup("TOUR_START_INDEX") {
            Some(value) => value.trim().parse::<usize>().map_err(|e| {
                AppError::Config(format!("TOUR_START_INDEX must be a valid index: {e}"))
            })?,
            None => 0,
        };

        let frame_rate = match lookup("TOUR_FRAME_RATE") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|rate| *rate > 0)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "TOUR_FRAME_RATE must be a positive integer, got '{value}'"
                    ))
                })?,
            None => DEFAULT_FRAME_RATE,
        };

        Ok(Self {
            description,
            asset_root,
            start_index,
            frame_rate,
            tour_config: lookup("TOUR_CONFIG").map(PathBuf::from),
            fade: lookup("TOUR_NO_FADE").is_none(),
        })
    }
}

fn default_asset_root(description: &Path) -> PathBuf {
    match description.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Parses a YAML tour configuration.
///
/// # Errors
///
/// Returns `AppError::Config` if the text is not a valid `TourConfig`.
pub fn parse_tour_config(text: &str) -> Result<TourConfig, AppError> {
    serde_yaml::from_str(text).map_err(|e| AppError::Config(format!("invalid tour config: {e}")))
}

/// Reads the tour configuration file, or returns the defaults when none is
/// configured.
///
/// # Errors
///
/// Returns `AppError::Io` if the file cannot be read and `AppError::Config`
/// if it does not parse.
pub async fn load_tour_config(path: Option<&Path>) -> Result<TourConfig, AppError> {
    let Some(path) = path else {
        return Ok(TourConfig::default());
    };
    let text = tokio::fs::read_to_string(path).await?;
    let config = parse_tour_config(&text)?;
    tracing::info!(path = %path.display(), "tour config loaded");
    Ok(config)
}
