// File: src/resolver.rs
//! Turns a tag path into display colors.
//!
//! The background blends the palette color of every ancestor, each level
//! pulling the running color 40% towards its own slot color. Deep tags stay
//! close to their parent while still drifting with depth.
//!
//! The foreground walks two candidates away from the background, one lighter
//! and one darker, until one of them is readable under both contrast metrics.
use crate::color_utils::{self, LchColor, Rgb8, apca_contrast, wcag_contrast};
use crate::generator::Palette;
use crate::model::TagPath;
use crate::registry::TagRegistry;

/// Share of each deeper level's own color in the running blend.
pub const DEPTH_MIX_WEIGHT: f64 = 0.4;

pub const MIN_APCA: f64 = 60.0;
pub const MIN_WCAG: f64 = 4.5;
pub const MAX_STEPS: usize = 100;
pub const FALLBACK_FOREGROUND: Rgb8 = Rgb8::new(255, 255, 255);

const LIGHT_CHROMA_BOOST: f64 = 3.0;
const DARK_CHROMA_BOOST: f64 = 20.0;

pub fn resolve_background(tag: &TagPath, registry: &TagRegistry, palette: &Palette) -> LchColor {
    let mut prefixes = tag.prefixes();
    // TagPath is never empty, so there is always a first prefix
    let first = prefixes.next().unwrap_or(tag.as_str());
    let mut combined = palette.color_for_slot(registry.slot_or_default(first));

    for prefix in prefixes {
        let own = palette.color_for_slot(registry.slot_or_default(prefix));
        combined = color_utils::mix(combined, own, DEPTH_MIX_WEIGHT);
    }
    combined
}

/// Picks a readable text color for `background`. Pure; same input, same output.
pub fn resolve_foreground(background: Rgb8) -> Rgb8 {
    let base = color_utils::from_rgb8(background);
    let mut light = base;
    light.chroma += LIGHT_CHROMA_BOOST;
    let mut dark = base;
    dark.chroma += DARK_CHROMA_BOOST;

    for _ in 0..MAX_STEPS {
        light.l += 1.0;
        dark.l -= 1.0;

        let candidate = color_utils::to_rgb8(light);
        if lightness_contrast(candidate, background) >= MIN_APCA
            && wcag_contrast(candidate, background) >= MIN_WCAG
        {
            return candidate;
        }

        let candidate = color_utils::to_rgb8(dark);
        if lightness_contrast(candidate, background) <= -MIN_APCA
            && wcag_contrast(candidate, background) >= MIN_WCAG
        {
            return candidate;
        }
    }

    FALLBACK_FOREGROUND
}

/// APCA with the candidate in the background role: positive when the candidate
/// is the lighter color, negative when it is the darker one.
pub fn lightness_contrast(candidate: Rgb8, background: Rgb8) -> f64 {
    apca_contrast(background, candidate)
}

/// Whether `foreground` on `background` passes either threshold pair.
pub fn is_readable(foreground: Rgb8, background: Rgb8) -> bool {
    let lc = lightness_contrast(foreground, background);
    lc.abs() >= MIN_APCA && wcag_contrast(foreground, background) >= MIN_WCAG
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_utils::{hue_degrees, parse_hex, to_hex};
    use crate::generator::{self, PaletteParams};
    use crate::model::Theme;
    use crate::model::tag::parse_all;

    fn four_hue_palette() -> Palette {
        let params = PaletteParams {
            size: 4,
            chroma: 16.0,
            lightness: 87.0,
        };
        generator::generate(params, Theme::Light, 0.0, false, 0)
    }

    #[test]
    fn test_root_tag_uses_its_slot_color() {
        let palette = four_hue_palette();
        let mut registry = TagRegistry::new();
        registry.ensure(&parse_all(["a", "b", "c"]));

        let tag = TagPath::parse("c").unwrap();
        let bg = resolve_background(&tag, &registry, &palette);
        assert_eq!(bg, palette.colors()[2]);
    }

    #[test]
    fn test_depth_weighted_blend() {
        let palette = four_hue_palette();
        let mut registry = TagRegistry::new();
        // x=1, x/a=1, x/y=2, x/y/z=1
        registry.ensure(&parse_all(["x/a", "x/y/z"]));
        assert_eq!(registry.get("x/y"), Some(2));

        let tag = TagPath::parse("x/y/z").unwrap();
        let bg = resolve_background(&tag, &registry, &palette);

        // hue 0 -> 90 at 0.4 gives 36, then back towards 0 at 0.4 gives 21.6
        assert!((bg.l - 87.0).abs() < 1e-3);
        assert!((bg.chroma - 16.0).abs() < 1e-3);
        assert!((hue_degrees(bg) - 21.6).abs() < 1e-3, "hue {}", hue_degrees(bg));
    }

    #[test]
    fn test_unregistered_prefixes_fall_back_to_first_slot() {
        let palette = four_hue_palette();
        let registry = TagRegistry::new();
        let tag = TagPath::parse("nobody/knows").unwrap();
        assert_eq!(
            resolve_background(&tag, &registry, &palette),
            palette.colors()[0]
        );
    }

    #[test]
    fn test_foreground_readable_on_pastels() {
        for hex in ["#f2d9dc", "#d9ecd0", "#d3e3f6", "#ede4c7"] {
            let bg = parse_hex(hex).unwrap();
            let fg = resolve_foreground(bg);
            assert!(is_readable(fg, bg), "{} -> {}", hex, to_hex(fg));
            // light backgrounds get dark text
            assert!(lightness_contrast(fg, bg) < 0.0);
        }
    }

    #[test]
    fn test_foreground_readable_on_dark() {
        for hex in ["#3b2230", "#1f3340", "#2d2d12"] {
            let bg = parse_hex(hex).unwrap();
            let fg = resolve_foreground(bg);
            assert!(is_readable(fg, bg), "{} -> {}", hex, to_hex(fg));
            assert!(lightness_contrast(fg, bg) > 0.0);
        }
    }

    #[test]
    fn test_foreground_deterministic() {
        let bg = parse_hex("#7a6e9c").unwrap();
        assert_eq!(resolve_foreground(bg), resolve_foreground(bg));
    }

    #[test]
    fn test_mid_grey_falls_back_when_unsolvable() {
        // Neither white nor black reaches |Lc| 60 with 4.5:1 on this grey.
        let bg = parse_hex("#777777").unwrap();
        assert!(!is_readable(Rgb8::new(255, 255, 255), bg));
        assert!(!is_readable(Rgb8::new(0, 0, 0), bg));
        assert_eq!(resolve_foreground(bg), FALLBACK_FOREGROUND);
    }
}
