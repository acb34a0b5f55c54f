// Copyright @yucwang 2026

use std::path::PathBuf;

use crate::core::error::{ RenderError, Result };
use crate::core::sequence::DEFAULT_MAX_SAMPLES;

/// Render configuration. Scene files fill it in, CLI flags override it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub width: usize,
    pub height: usize,
    pub bounces: usize,
    pub tile_size: usize,
    pub max_samples: u32,
    pub frames: u32,
    pub output: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 768,
            height: 576,
            bounces: 3,
            tile_size: 64,
            max_samples: DEFAULT_MAX_SAMPLES,
            frames: 16,
            output: None,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidSettings(
                format!("empty image {}x{}", self.width, self.height)));
        }
        if self.tile_size == 0 {
            return Err(RenderError::InvalidSettings(String::from("tile size must be positive")));
        }
        if self.max_samples == 0 {
            return Err(RenderError::InvalidSettings(String::from("max samples must be positive")));
        }
        Ok(())
    }

    /// True when later frames would replay the last sequence index.
    pub fn exceeds_sample_bound(&self) -> bool {
        self.frames > self.max_samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(RenderSettings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_tile_is_rejected() {
        let settings = RenderSettings { tile_size: 0, ..RenderSettings::default() };
        assert!(matches!(settings.validate(), Err(RenderError::InvalidSettings(_))));
    }

    #[test]
    fn test_sample_bound() {
        let settings = RenderSettings { frames: 8, max_samples: 8, ..RenderSettings::default() };
        assert!(!settings.exceeds_sample_bound());
        let settings = RenderSettings { frames: 9, ..settings };
        assert!(settings.exceeds_sample_bound());
    }
}
