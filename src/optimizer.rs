// File: src/optimizer.rs
//! Hue rotation search. The same offset is applied to the light and dark
//! palettes so both themes keep their hues aligned.
use crate::color_utils::{self, wcag_contrast};
use crate::generator::{self, Palette, PaletteParams};
use crate::model::Theme;

/// Offsets are searched over half a turn.
pub const OFFSET_RANGE: u16 = 180;

/// Finds the rotation in `[0, 180)` whose unshuffled light palette has the
/// largest summed contrast between hue neighbours.
///
/// On ties the later offset wins.
pub fn find_offset(params: PaletteParams) -> u16 {
    let mut best_offset = 0;
    let mut best_score = f64::NEG_INFINITY;

    for offset in 0..OFFSET_RANGE {
        let palette = generator::generate(params, Theme::Light, f64::from(offset), false, 0);
        let score = neighbour_contrast(&palette);
        if score >= best_score {
            best_score = score;
            best_offset = offset;
        }
    }

    tracing::debug!(
        size = params.size,
        offset = best_offset,
        score = best_score,
        "hue offset selected"
    );
    best_offset
}

/// Sum of WCAG ratios over consecutive pairs, in palette order.
pub fn neighbour_contrast(palette: &Palette) -> f64 {
    let quantized: Vec<_> = palette
        .colors()
        .iter()
        .map(|c| color_utils::to_rgb8(*c))
        .collect();
    quantized
        .windows(2)
        .map(|pair| wcag_contrast(pair[0], pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(size: usize) -> PaletteParams {
        PaletteParams {
            size,
            chroma: 16.0,
            lightness: 87.0,
        }
    }

    #[test]
    fn test_offset_in_range() {
        for size in [1, 2, 3, 7, 16, 32] {
            let offset = find_offset(params(size));
            assert!(offset < OFFSET_RANGE, "size {} gave {}", size, offset);
        }
    }

    #[test]
    fn test_single_color_ties_resolve_to_last() {
        // A one-color palette has no pairs, so every offset scores zero.
        assert_eq!(find_offset(params(1)), OFFSET_RANGE - 1);
    }

    #[test]
    fn test_selected_offset_is_maximal() {
        let p = params(8);
        let chosen = find_offset(p);
        let chosen_score = neighbour_contrast(&generator::generate(
            p,
            Theme::Light,
            f64::from(chosen),
            false,
            0,
        ));
        for offset in 0..OFFSET_RANGE {
            let score = neighbour_contrast(&generator::generate(
                p,
                Theme::Light,
                f64::from(offset),
                false,
                0,
            ));
            assert!(score <= chosen_score);
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(find_offset(params(12)), find_offset(params(12)));
    }
}
