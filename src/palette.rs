//! Contains the Palette, a fixed-length cyclic sequence of colors
//! built by cosine-interpolating between a short list of "control"
//! colors.  Indexing is always taken modulo the palette length, so
//! any integer (or any real, for the fractional lookup) names a valid
//! color.

use std::f64::consts::PI;

use error::GenerationError;

/// An RGB color.  Packs into the 32-bit pixel layout used throughout
/// the crate: red in bits 16-23, green in 8-15, blue in 0-7.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Constructor, in the obvious channel order.
    pub fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Pack into a 0x00RRGGBB word.
    pub fn pack(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// The inverse of `pack`.  The top byte is ignored.
    pub fn unpack(word: u32) -> Color {
        Color {
            r: ((word >> 16) & 0xFF) as u8,
            g: ((word >> 8) & 0xFF) as u8,
            b: (word & 0xFF) as u8,
        }
    }
}

/// An immutable, cyclic color table.  Between each pair of
/// consecutive control colors (the last wrapping around to the first)
/// lies one "band" of interpolated colors, so the table's length is
/// always `band_size * controls.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Build a palette from at least two control colors and a band
    /// size.  Within a band the channels are blended with the cosine
    /// ease `0.5 * (1 - cos(pi * i / band_size))` rather than
    /// linearly; the ease-in/ease-out keeps the band boundaries from
    /// showing up as creases in the rendered image.
    pub fn build(controls: &[Color], band_size: usize) -> Result<Palette, GenerationError> {
        if controls.len() < 2 {
            return Err(GenerationError::InvalidConfiguration(
                "a palette needs at least two control colors",
            ));
        }
        if band_size == 0 {
            return Err(GenerationError::InvalidConfiguration(
                "a palette band must hold at least one color",
            ));
        }

        let mut colors = Vec::with_capacity(band_size * controls.len());
        for (index, start) in controls.iter().enumerate() {
            let end = controls[(index + 1) % controls.len()];
            for i in 0..band_size {
                let w = 0.5 * (1.0 - (PI * (i as f64) / (band_size as f64)).cos());
                colors.push(Color {
                    r: blend(start.r, end.r, w),
                    g: blend(start.g, end.g, w),
                    b: blend(start.b, end.b, w),
                });
            }
        }
        Ok(Palette { colors })
    }

    /// The number of colors in the table.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True only for a palette that holds no colors, which `build`
    /// never produces.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Look up a color.  The index is reduced modulo the palette
    /// length, so negative indices wrap backwards from the end.
    pub fn get(&self, index: i64) -> Color {
        let n = self.colors.len() as i64;
        self.colors[index.rem_euclid(n) as usize]
    }

    /// Fractional lookup: blends linearly between the colors at
    /// `floor(value)` and `floor(value) + 1`, with the same modulo
    /// wrapping as `get`.
    pub fn get_interpolated(&self, value: f64) -> Color {
        let floor = value.floor();
        let frac = value - floor;
        let a = self.get(floor as i64);
        let b = self.get(floor as i64 + 1);
        Color {
            r: blend(a.r, b.r, frac),
            g: blend(a.g, b.g, frac),
            b: blend(a.b, b.b, frac),
        }
    }
}

/// Weighted blend of one channel.
fn blend(a: u8, b: u8, w: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * w).round() as u8
}

/// The built-in palettes, selectable by name from the command line.
/// "default" is the 512-entry white/red/green/blue cycle; the others
/// are a calmer and a deliberately garish alternative.
pub fn preset(name: &str) -> Option<Palette> {
    let controls: &[Color] = match name {
        "default" => &[
            Color { r: 255, g: 255, b: 255 },
            Color { r: 255, g: 0, b: 0 },
            Color { r: 0, g: 128, b: 0 },
            Color { r: 0, g: 0, b: 255 },
        ],
        "forest" => &[
            Color { r: 25, g: 25, b: 112 },
            Color { r: 34, g: 139, b: 34 },
            Color { r: 255, g: 250, b: 240 },
            Color { r: 128, g: 128, b: 128 },
        ],
        "awful" => &[
            Color { r: 210, g: 105, b: 30 },
            Color { r: 0, g: 255, b: 0 },
            Color { r: 255, g: 218, b: 185 },
            Color { r: 128, g: 0, b: 128 },
        ],
        _ => return None,
    };
    // 4 controls x 128 bands; cannot fail.
    Some(Palette::build(controls, 128).unwrap())
}
