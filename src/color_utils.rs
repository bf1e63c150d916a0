// File: src/color_utils.rs
//! Color-space plumbing shared by the generator and the resolver.
//!
//! Colors live in CIE LCh(ab) under D65 while they are being generated and
//! blended, and are quantized to 8-bit sRGB only when they are emitted. Both
//! contrast metrics are evaluated on the quantized value so that what is
//! measured is exactly what ends up on screen.
use palette::white_point::D65;
use palette::{FromColor, LinSrgb, Lch, Mix, Srgb};
use thiserror::Error;

/// Working color: lightness 0-100, chroma, hue in degrees.
pub type LchColor = Lch<D65, f64>;

/// Display color, one byte per channel.
pub type Rgb8 = Srgb<u8>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color `{0}`: expected #rgb or #rrggbb")]
    InvalidHex(String),
}

/// Strict hex check: a leading `#` followed by exactly 3 or 6 hex digits.
pub fn is_valid_hex(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

pub fn parse_hex(value: &str) -> Result<Rgb8, ColorError> {
    if !is_valid_hex(value) {
        return Err(ColorError::InvalidHex(value.to_string()));
    }
    value
        .parse::<Rgb8>()
        .map_err(|_| ColorError::InvalidHex(value.to_string()))
}

pub fn to_hex(color: Rgb8) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

pub fn from_rgb8(color: Rgb8) -> LchColor {
    LchColor::from_color(color.into_format::<f64>())
}

/// Quantizes an LCh color into displayable sRGB, clamping out-of-gamut values.
pub fn to_rgb8(color: LchColor) -> Rgb8 {
    let rgb = Srgb::<f64>::from_color(color);
    Rgb8::new(quantize(rgb.red), quantize(rgb.green), quantize(rgb.blue))
}

fn quantize(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Moves `from` towards `to` by `factor` (0.0 keeps `from`, 1.0 yields `to`).
/// Hue travels along the shorter arc of the circle.
pub fn mix(from: LchColor, to: LchColor, factor: f64) -> LchColor {
    Mix::mix(from, to, factor)
}

/// Hue normalized into [0, 360).
pub fn hue_degrees(color: LchColor) -> f64 {
    color.hue.into_positive_degrees()
}

/// WCAG 2 relative luminance.
pub fn relative_luminance(color: Rgb8) -> f64 {
    let lin: LinSrgb<f64> = color.into_format::<f64>().into_linear();
    0.2126 * lin.red + 0.7152 * lin.green + 0.0722 * lin.blue
}

/// WCAG 2 contrast ratio, symmetric, in [1, 21].
pub fn wcag_contrast(a: Rgb8, b: Rgb8) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

// APCA-W3 0.0.98G constants
const MAIN_TRC: f64 = 2.4;
const R_CO: f64 = 0.2126729;
const G_CO: f64 = 0.7151522;
const B_CO: f64 = 0.0721750;
const NORM_BG: f64 = 0.56;
const NORM_TXT: f64 = 0.57;
const REV_TXT: f64 = 0.62;
const REV_BG: f64 = 0.65;
const BLK_THRS: f64 = 0.022;
const BLK_CLMP: f64 = 1.414;
const SCALE_BOW: f64 = 1.14;
const SCALE_WOB: f64 = 1.14;
const LO_BOW_OFFSET: f64 = 0.027;
const LO_WOB_OFFSET: f64 = 0.027;
const DELTA_Y_MIN: f64 = 0.0005;
const LO_CLIP: f64 = 0.1;

fn apca_luminance(color: Rgb8) -> f64 {
    let channel = |c: u8| (f64::from(c) / 255.0).powf(MAIN_TRC);
    R_CO * channel(color.red) + G_CO * channel(color.green) + B_CO * channel(color.blue)
}

fn soft_clamp_black(y: f64) -> f64 {
    if y > BLK_THRS {
        y
    } else {
        y + (BLK_THRS - y).powf(BLK_CLMP)
    }
}

/// APCA lightness contrast (Lc) of `text` drawn on `background`.
///
/// Positive for dark text on a light background, negative for light text on a
/// dark background. Magnitudes run up to roughly 106 and 108 respectively.
pub fn apca_contrast(text: Rgb8, background: Rgb8) -> f64 {
    let txt_y = soft_clamp_black(apca_luminance(text));
    let bg_y = soft_clamp_black(apca_luminance(background));

    if (bg_y - txt_y).abs() < DELTA_Y_MIN {
        return 0.0;
    }

    let output = if bg_y > txt_y {
        let sapc = (bg_y.powf(NORM_BG) - txt_y.powf(NORM_TXT)) * SCALE_BOW;
        if sapc < LO_CLIP { 0.0 } else { sapc - LO_BOW_OFFSET }
    } else {
        let sapc = (bg_y.powf(REV_BG) - txt_y.powf(REV_TXT)) * SCALE_WOB;
        if sapc > -LO_CLIP { 0.0 } else { sapc + LO_WOB_OFFSET }
    };

    output * 100.0
}
