use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;
use valuestream_core::layout::Canvas;
use valuestream_schemas::schedule::WorkSchedule;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 420,
        }
    }
}

impl CanvasConfig {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Run settings shared by every subcommand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub schedule: WorkSchedule,
    pub canvas: CanvasConfig,
    pub output_root: String,
    pub render_png: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Value Stream Map".to_string(),
            schedule: WorkSchedule::default(),
            canvas: CanvasConfig::default(),
            output_root: "./runs".to_string(),
            render_png: true,
        }
    }
}

impl AppConfig {
    /// Loads the YAML config at `path`; with no path, or a path that does not exist, the defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        if config.canvas.width == 0 || config.canvas.height == 0 {
            anyhow::bail!(
                "Canvas size in {} must be non-zero (got {}x{})",
                path.display(),
                config.canvas.width,
                config.canvas.height
            );
        }
        info!(path = %path.display(), title = %config.title, "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: AppConfig = serde_yaml::from_str("title: Line 3\nschedule:\n  working_hours: 10\n").unwrap();
        assert_eq!(config.title, "Line 3");
        assert_eq!(config.canvas.width, 1200);
        assert_eq!(config.output_root, "./runs");
        assert!(config.render_png);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = AppConfig::load(Some(Path::new("does/not/exist.yaml"))).unwrap();
        assert_eq!(config.schedule, WorkSchedule::default());
    }
}
