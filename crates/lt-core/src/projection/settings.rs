use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_FONT_SIZE: f32 = 60.0;

/// Rendering settings replicated alongside the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    /// Body font size in pixels on a 1920x1080 canvas; always > 0.
    pub font_size: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("font size must be a positive number, got {0}")]
pub struct InvalidDisplaySettings(pub f32);

impl DisplaySettings {
    pub fn new(
        font_size: f32,
        background_image: Option<String>,
    ) -> Result<Self, InvalidDisplaySettings> {
        let settings = Self {
            font_size,
            background_image,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), InvalidDisplaySettings> {
        if self.font_size.is_finite() && self.font_size > 0.0 {
            Ok(())
        } else {
            Err(InvalidDisplaySettings(self.font_size))
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            background_image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_font_size() {
        assert!(DisplaySettings::new(0.0, None).is_err());
        assert!(DisplaySettings::new(-3.0, None).is_err());
        assert!(DisplaySettings::new(f32::NAN, None).is_err());
        assert!(DisplaySettings::new(48.0, Some("file:///bg.png".into())).is_ok());
    }
}
