// File: src/config.rs
use crate::color_utils::{self, Rgb8};
use crate::generator::PaletteParams;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_PALETTE_SIZE: usize = 16;
pub const DEFAULT_CHROMA: f64 = 16.0;
pub const DEFAULT_LIGHTNESS: f64 = 87.0;

/// User-facing palette settings. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Number of generated colors.
    pub palette: usize,
    pub chroma: f64,
    /// 0-100, for the light theme. The dark theme derives its own.
    pub lightness: f64,
    /// Rotates the generated palette by this many entries.
    pub seed: usize,
    pub enable_custom_colors: bool,
    pub custom_colors: Vec<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE_SIZE,
            chroma: DEFAULT_CHROMA,
            lightness: DEFAULT_LIGHTNESS,
            seed: 0,
            enable_custom_colors: false,
            custom_colors: Vec::new(),
        }
    }
}

impl Configuration {
    /// Reads a TOML file with any subset of the fields.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Configuration = toml::from_str(content)?;
        Ok(config.sanitized())
    }

    /// Clamps numeric fields into range and drops custom colors that fail
    /// strict hex validation. Never fails.
    pub fn sanitized(mut self) -> Self {
        self.palette = self.palette.max(1);
        if !self.lightness.is_finite() {
            self.lightness = DEFAULT_LIGHTNESS;
        }
        self.lightness = self.lightness.clamp(0.0, 100.0);
        if !self.chroma.is_finite() || self.chroma < 0.0 {
            self.chroma = DEFAULT_CHROMA;
        }

        let before = self.custom_colors.len();
        self.custom_colors.retain(|c| color_utils::is_valid_hex(c.trim()));
        for c in &mut self.custom_colors {
            *c = c.trim().to_lowercase();
        }
        let dropped = before - self.custom_colors.len();
        if dropped > 0 {
            tracing::warn!(dropped, "ignoring invalid custom colors");
        }
        self
    }

    pub fn palette_params(&self) -> PaletteParams {
        PaletteParams {
            size: self.palette.max(1),
            chroma: self.chroma,
            lightness: self.lightness,
        }
    }

    /// The custom palette when it is enabled and has at least one usable
    /// color, `None` otherwise.
    pub fn active_custom_colors(&self) -> Option<Vec<Rgb8>> {
        if !self.enable_custom_colors {
            return None;
        }
        let colors: Vec<Rgb8> = self
            .custom_colors
            .iter()
            .filter_map(|c| color_utils::parse_hex(c).ok())
            .collect();
        if colors.is_empty() { None } else { Some(colors) }
    }
}
