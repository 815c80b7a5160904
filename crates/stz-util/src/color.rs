//! CSS color string conversions between `#hex`, `rgb()` and `rgba()`.

use std::fmt;
use std::sync::LazyLock;

use crate::error::{ColorError, ColorResult};
use crate::pattern::{Pattern, compile};

static CHANNEL: Pattern = LazyLock::new(|| compile(r"\d+"));

/// Default opacity used by [`hex_to_rgba`] callers that do not care.
pub const DEFAULT_OPACITY: f64 = 0.5;

/// Notation of a color string, judged by its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    Hex,
    Rgb,
    Rgba,
    Unknown,
}

impl ColorType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Rgb => "rgb",
            Self::Rgba => "rgba",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ColorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[must_use]
pub fn color_type(color: &str) -> ColorType {
    let trimmed = color.trim();
    if trimmed.starts_with('#') {
        ColorType::Hex
    } else if trimmed.starts_with("rgba(") {
        ColorType::Rgba
    } else if trimmed.starts_with("rgb(") {
        ColorType::Rgb
    } else {
        ColorType::Unknown
    }
}

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// ## Summary
    /// Parses `#RGB` or `#RRGGBB`; the `#` is optional.
    ///
    /// ## Errors
    /// Returns an error for other lengths or non-hex digits.
    pub fn from_hex(hex: &str) -> ColorResult<Self> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.is_ascii() {
            return Err(ColorError::InvalidHex(hex.to_string()));
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            other => return Err(ColorError::HexLength(other)),
        };

        let channel = |range: std::ops::Range<usize>| {
            expanded
                .get(range)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ColorError::InvalidHex(hex.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// ## Summary
    /// Reads the first three integers of an `rgb(...)` or `rgba(...)`
    /// string; anything after them (such as the alpha) is ignored.
    ///
    /// ## Errors
    /// Returns an error when fewer than three integers are present or one
    /// of them exceeds 255.
    pub fn from_rgb_text(text: &str) -> ColorResult<Self> {
        let invalid = || ColorError::InvalidRgb(text.to_string());
        let re = CHANNEL.as_ref().ok_or_else(invalid)?;

        let channels = re
            .find_iter(text)
            .take(3)
            .map(|m| {
                let value = m.as_str().parse::<u64>().unwrap_or(u64::MAX);
                u8::try_from(value)
                    .ok()
                    .ok_or(ColorError::ChannelOutOfRange(value))
            })
            .collect::<ColorResult<Vec<u8>>>()?;

        match channels.as_slice() {
            [r, g, b] => Ok(Self {
                r: *r,
                g: *g,
                b: *b,
            }),
            _ => Err(invalid()),
        }
    }

    /// Upper-case `#RRGGBB`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// `rgba(r, g, b, a)` with the opacity clamped to `0..=1`.
    #[must_use]
    pub fn to_rgba(self, opacity: f64) -> String {
        let alpha = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        format!("rgba({}, {}, {}, {alpha})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    /// `rgb(r, g, b)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// ## Summary
/// `#F57` with opacity 0.5 becomes `rgba(255, 85, 119, 0.5)`.
///
/// ## Errors
/// Returns an error if `hex` is not a 3 or 6 digit hex color.
pub fn hex_to_rgba(hex: &str, opacity: f64) -> ColorResult<String> {
    Ok(Rgb::from_hex(hex)?.to_rgba(opacity))
}

/// ## Summary
/// `rgba(255, 85, 119, 0.5)` becomes `#FF5577`; the alpha is dropped.
///
/// ## Errors
/// Returns an error if the text does not hold three channels in range.
pub fn rgba_to_hex(rgba: &str) -> ColorResult<String> {
    Ok(Rgb::from_rgb_text(rgba)?.to_hex())
}

/// ## Summary
/// Adds an alpha channel to an `rgb(...)` color.
///
/// ## Errors
/// Returns an error if the text does not hold three channels in range.
pub fn rgb_add_opacity(rgb: &str, opacity: f64) -> ColorResult<String> {
    Ok(Rgb::from_rgb_text(rgb)?.to_rgba(opacity))
}

/// ## Summary
/// Drops the alpha channel of an `rgba(...)` color.
///
/// ## Errors
/// Returns an error if the text does not hold three channels in range.
pub fn rgba_to_rgb(rgba: &str) -> ColorResult<String> {
    Ok(Rgb::from_rgb_text(rgba)?.to_string())
}

/// ## Errors
/// Returns an error if `hex` is not a 3 or 6 digit hex color.
pub fn hex_to_rgb(hex: &str) -> ColorResult<String> {
    Ok(Rgb::from_hex(hex)?.to_string())
}

/// ## Errors
/// Returns an error if the text does not hold three channels in range.
pub fn rgb_to_hex(rgb: &str) -> ColorResult<String> {
    rgba_to_hex(rgb)
}
