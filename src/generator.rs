// File: src/generator.rs
//! Palette generation: evenly spaced hues at a fixed lightness and chroma.
use crate::color_utils::{self, LchColor, Rgb8};
use crate::model::Theme;

/// Dark-theme colors are more saturated and much darker than their light twins.
const DARK_CHROMA_FACTOR: f64 = 1.8;
const DARK_LIGHTNESS_DIVISOR: f64 = 2.5;

/// Base parameters shared by both theme variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteParams {
    pub size: usize,
    pub chroma: f64,
    pub lightness: f64,
}

/// An immutable, non-empty, ordered set of colors for one theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<LchColor>,
}

impl Palette {
    /// Returns `None` for an empty color list.
    pub fn new(colors: Vec<LchColor>) -> Option<Self> {
        if colors.is_empty() {
            None
        } else {
            Some(Self { colors })
        }
    }

    /// Builds a palette straight from display colors (custom palettes).
    pub fn from_rgb(colors: &[Rgb8]) -> Option<Self> {
        Self::new(colors.iter().copied().map(color_utils::from_rgb8).collect())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[LchColor] {
        &self.colors
    }

    /// Color for a 1-based registry slot, wrapping around the palette.
    /// Slot 0 is treated like slot 1.
    pub fn color_for_slot(&self, slot: u32) -> LchColor {
        let index = (slot.max(1) as usize - 1) % self.colors.len();
        self.colors[index]
    }
}

pub fn generate(
    params: PaletteParams,
    theme: Theme,
    hue_offset: f64,
    shuffle: bool,
    seed: usize,
) -> Palette {
    let size = params.size.max(1);
    let (chroma, lightness) = if theme.is_dark() {
        (
            params.chroma * DARK_CHROMA_FACTOR,
            params.lightness / DARK_LIGHTNESS_DIVISOR,
        )
    } else {
        (params.chroma, params.lightness)
    };

    let step = 360.0 / size as f64;
    let mut colors: Vec<LchColor> = (0..size)
        .map(|i| {
            let hue = (i as f64 * step + hue_offset).rem_euclid(360.0);
            LchColor::new(lightness, chroma, hue)
        })
        .collect();

    if shuffle {
        colors = interleave(colors);
    }
    colors.rotate_right(seed % size);

    Palette { colors }
}

/// Scatters neighbouring hues apart: take the item under a moving cursor, then
/// step the cursor by a third of what is left.
fn interleave<T>(mut pool: Vec<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(pool.len());
    let mut cursor = 0;
    while !pool.is_empty() {
        out.push(pool.remove(cursor));
        let remaining = pool.len();
        if remaining == 0 {
            break;
        }
        let jump = (remaining as f64 / 3.0).round() as usize;
        cursor = (cursor + jump) % remaining;
    }
    out
}
