use csscolorparser::Color;
use serde::Serialize;

use crate::{TokenError, TokenResult};

/// RGBA channels in `[0, 1]`, the shape the variables API expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorComponents {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Marker written in place of colors that could not be resolved. Magenta is
/// not a real palette value; it only makes the gap easy to spot.
pub const UNRESOLVED_COLOR: ColorComponents = ColorComponents {
    r: 1.0,
    g: 0.0,
    b: 1.0,
    a: 1.0,
};

impl From<Color> for ColorComponents {
    fn from(color: Color) -> Self {
        Self {
            r: round4(color.r),
            g: round4(color.g),
            b: round4(color.b),
            a: round4(color.a),
        }
    }
}

fn round4(channel: f64) -> f64 {
    (channel * 10_000.0).round() / 10_000.0
}

/// Converts `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
pub fn hex_to_color_components(hex: &str) -> TokenResult<ColorComponents> {
    let digits = hex.trim().trim_start_matches('#');
    let valid_len = matches!(digits.len(), 3 | 6 | 8);
    if !valid_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TokenError::InvalidColorFormat(hex.to_string()));
    }
    csscolorparser::parse(&format!("#{digits}"))
        .map(ColorComponents::from)
        .map_err(|_| TokenError::InvalidColorFormat(hex.to_string()))
}

/// Like [`hex_to_color_components`], but also takes CSS functional and named
/// notation (`rgb(...)`, `hsl(...)`, `rebeccapurple`).
pub fn color_components(literal: &str) -> TokenResult<ColorComponents> {
    let literal = literal.trim();
    if literal.starts_with('#') {
        return hex_to_color_components(literal);
    }
    hex_to_color_components(literal).or_else(|_| {
        csscolorparser::parse(literal)
            .map(ColorComponents::from)
            .map_err(|_| TokenError::InvalidColorFormat(literal.to_string()))
    })
}
