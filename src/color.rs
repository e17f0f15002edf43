//! Bead colors and the plain RGB color model used for matching.

use palette::Srgb;
use serde::{Serialize, Serializer};

/// Luma threshold, scaled by 1000, below which a color counts as dark.
const DARK_LUMA_MILLI: u32 = 128_000;

/// One entry of a bead color table. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorEntry {
    code: String,
    hex: String,
    #[serde(serialize_with = "serialize_rgb")]
    rgb: Srgb<u8>,
}

impl ColorEntry {
    /// Build an entry from a table hex string; unparseable hex becomes black.
    pub fn from_hex(code: impl Into<String>, hex: impl Into<String>) -> Self {
        let code = code.into();
        let hex = hex.into();
        let rgb = match parse_hex(&hex) {
            Some(rgb) => rgb,
            None => {
                tracing::warn!(code = %code, hex = %hex, "malformed hex color, using black");
                Srgb::new(0, 0, 0)
            }
        };
        Self { code, hex, rgb }
    }

    /// Unique short identifier, e.g. `R15`.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Hex string exactly as it appeared in the table.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn rgb(&self) -> Srgb<u8> {
        self.rgb
    }

    pub fn is_dark(&self) -> bool {
        is_dark(self.rgb())
    }
}

fn serialize_rgb<S: Serializer>(rgb: &Srgb<u8>, serializer: S) -> Result<S::Ok, S::Error> {
    [rgb.red, rgb.green, rgb.blue].serialize(serializer)
}

/// Parse `rrggbb` or `#rrggbb` (case-insensitive).
pub fn parse_hex(s: &str) -> Option<Srgb<u8>> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Srgb::new(r, g, b))
}

/// Squared Euclidean distance in 8-bit RGB space.
///
/// Ordering by this value is identical to ordering by [`distance`], so the
/// nearest-color scan compares squares and skips the square root.
#[inline]
pub fn distance_squared(a: Srgb<u8>, b: Srgb<u8>) -> u32 {
    let dr = a.red as i32 - b.red as i32;
    let dg = a.green as i32 - b.green as i32;
    let db = a.blue as i32 - b.blue as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Plain Euclidean distance in 8-bit RGB space, no channel weighting.
pub fn distance(a: Srgb<u8>, b: Srgb<u8>) -> f64 {
    (distance_squared(a, b) as f64).sqrt()
}

#[inline]
fn luma_milli(rgb: Srgb<u8>) -> u32 {
    299 * rgb.red as u32 + 587 * rgb.green as u32 + 114 * rgb.blue as u32
}

/// Rec. 601 luma: `0.299r + 0.587g + 0.114b`.
pub fn luma(rgb: Srgb<u8>) -> f32 {
    luma_milli(rgb) as f32 / 1000.0
}

/// Whether label text drawn on this color should be light.
pub fn is_dark(rgb: Srgb<u8>) -> bool {
    luma_milli(rgb) < DARK_LUMA_MILLI
}
