use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tool::ToolError;
use crate::{Color, DEFAULT_SIZE, EXPORT_FILENAME, SNAPSHOT_KEY};

pub const DEFAULT_PALETTE: [&str; 6] = [
    "#000000", "#ff0000", "#00a000", "#0000ff", "#ffa500", "#800080",
];
pub const DEFAULT_SIZES: [u32; 4] = [DEFAULT_SIZE, 10, 15, 20];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("invalid palette color {0:?}")]
    InvalidColor(String),
    #[error("sizes must contain at least one positive width")]
    EmptySizes,
    #[error("brush sizes must be positive")]
    ZeroSize,
    #[error("fixed canvas dimensions must be positive")]
    ZeroDimensions,
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error(transparent)]
    Tool(#[from] ToolError),
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum Sizing {
    Fixed {
        width: u32,
        height: u32,
    },
    #[default]
    FillContainer,
}

/// When strokes are written to the snapshot store. Unload always writes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PersistPolicy {
    #[default]
    EverySegment,
    StrokeEnd,
}

/// What happens to existing strokes when the raster is resized.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ResizePolicy {
    #[default]
    Preserve,
    Clear,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub sizing: Sizing,
    pub palette: Vec<String>,
    pub sizes: Vec<u32>,
    pub storage_key: String,
    pub export_filename: String,
    pub persist: PersistPolicy,
    pub resize: ResizePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sizing: Sizing::default(),
            palette: DEFAULT_PALETTE.iter().map(|color| color.to_string()).collect(),
            sizes: DEFAULT_SIZES.to_vec(),
            storage_key: SNAPSHOT_KEY.to_string(),
            export_filename: EXPORT_FILENAME.to_string(),
            persist: PersistPolicy::default(),
            resize: ResizePolicy::default(),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if let Some(bad) = self.palette.iter().find(|color| Color::parse(color).is_err()) {
            return Err(ConfigError::InvalidColor(bad.clone()));
        }
        if self.sizes.is_empty() {
            return Err(ConfigError::EmptySizes);
        }
        if self.sizes.contains(&0) {
            return Err(ConfigError::ZeroSize);
        }
        if let Sizing::Fixed { width, height } = self.sizing {
            if width == 0 || height == 0 {
                return Err(ConfigError::ZeroDimensions);
            }
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyField("storageKey"));
        }
        if self.export_filename.trim().is_empty() {
            return Err(ConfigError::EmptyField("exportFilename"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolState;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.palette[0], "#000000");
        assert_eq!(config.sizes[0], DEFAULT_SIZE);
        assert_eq!(config.storage_key, "savedDrawing");
        assert_eq!(config.export_filename, "drawing.png");
    }

    #[test]
    fn palette_accepts_css_color_names() {
        let config = Config {
            palette: vec!["red".into(), "rgb(0, 0, 255)".into(), "hsl(120, 100%, 25%)".into()],
            ..Config::default()
        };
        config.validate().unwrap();
        let tools = ToolState::from_config(&config).unwrap();
        assert_eq!(tools.current_color(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = Config::from_json(
            r#"{"sizing":{"mode":"fixed","width":800,"height":600},"persist":"strokeEnd"}"#,
        )
        .unwrap();
        assert_eq!(
            config.sizing,
            Sizing::Fixed {
                width: 800,
                height: 600
            }
        );
        assert_eq!(config.persist, PersistPolicy::StrokeEnd);
        assert_eq!(config.resize, ResizePolicy::Preserve);
        assert_eq!(config.sizes, DEFAULT_SIZES.to_vec());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            Config::from_json(r#"{"palette":[]}"#),
            Err(ConfigError::EmptyPalette)
        ));
        assert!(matches!(
            Config::from_json(r#"{"palette":["bleu"]}"#),
            Err(ConfigError::InvalidColor(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"sizes":[5,0]}"#),
            Err(ConfigError::ZeroSize)
        ));
        assert!(matches!(
            Config::from_json(r#"{"sizing":{"mode":"fixed","width":0,"height":10}}"#),
            Err(ConfigError::ZeroDimensions)
        ));
        assert!(matches!(
            Config::from_json(r#"{"storageKey":" "}"#),
            Err(ConfigError::EmptyField("storageKey"))
        ));
        assert!(matches!(Config::from_json("{"), Err(ConfigError::Json(_))));
    }
}
