//! Colour and line-style strings as written by the simulation.

use image::Rgba;

const fn rgb(r: u8, g: u8, b: u8) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

pub const BLACK: Rgba<u8> = rgb(0, 0, 0);
pub const WHITE: Rgba<u8> = rgb(255, 255, 255);
/// Grid grey, 0.65 of full intensity.
pub const GRID: Rgba<u8> = rgb(166, 166, 166);

// Default colour cycle, addressed as "C0".."C9".
const CYCLE: [Rgba<u8>; 10] = [
    rgb(0x1f, 0x77, 0xb4),
    rgb(0xff, 0x7f, 0x0e),
    rgb(0x2c, 0xa0, 0x2c),
    rgb(0xd6, 0x27, 0x28),
    rgb(0x94, 0x67, 0xbd),
    rgb(0x8c, 0x56, 0x4b),
    rgb(0xe3, 0x77, 0xc2),
    rgb(0x7f, 0x7f, 0x7f),
    rgb(0xbc, 0xbd, 0x22),
    rgb(0x17, 0xbe, 0xcf),
];

fn named(name: &str) -> Option<Rgba<u8>> {
    let color = match name {
        "b" | "blue" => rgb(0, 0, 255),
        "g" => rgb(0, 128, 0),
        "green" => rgb(0, 128, 0),
        "r" | "red" => rgb(255, 0, 0),
        "c" => rgb(0, 191, 191),
        "cyan" => rgb(0, 255, 255),
        "m" => rgb(191, 0, 191),
        "magenta" => rgb(255, 0, 255),
        "y" => rgb(191, 191, 0),
        "yellow" => rgb(255, 255, 0),
        "k" | "black" => BLACK,
        "w" | "white" => WHITE,
        "orange" => rgb(255, 165, 0),
        "purple" => rgb(128, 0, 128),
        "brown" => rgb(165, 42, 42),
        "pink" => rgb(255, 192, 203),
        "gray" | "grey" => rgb(128, 128, 128),
        "olive" => rgb(128, 128, 0),
        "navy" => rgb(0, 0, 128),
        "teal" => rgb(0, 128, 128),
        _ => return None,
    };
    Some(color)
}

fn hex(digits: &str) -> Option<Rgba<u8>> {
    let byte = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    let nibble = |i: usize| {
        u8::from_str_radix(digits.get(i..i + 1)?, 16)
            .ok()
            .map(|n| n * 17)
    };

    match digits.len() {
        3 => Some(rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

/// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, single-letter and named colours,
/// cycle entries (`C0`..`C9`) and grey levels such as `"0.65"`.
pub fn parse_color(text: &str) -> Option<Rgba<u8>> {
    let text = text.trim();

    if let Some(digits) = text.strip_prefix('#') {
        return hex(digits);
    }

    if let Some(index) = text.strip_prefix('C') {
        if let Ok(i) = index.parse::<usize>() {
            return Some(CYCLE[i % CYCLE.len()]);
        }
    }

    if let Ok(level) = text.parse::<f64>() {
        if (0.0..=1.0).contains(&level) {
            let v = (level * 255.0).round() as u8;
            return Some(rgb(v, v, v));
        }
        return None;
    }

    named(&text.to_ascii_lowercase())
}

/// Dash pattern in pixels, alternating on/off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed(Vec<u32>),
    Hidden,
}

impl LineStyle {
    pub fn parse(text: &str) -> Option<Self> {
        let style = match text.trim() {
            "-" | "solid" => LineStyle::Solid,
            "--" | "dashed" => LineStyle::Dashed(vec![12, 6]),
            ":" | "dotted" => LineStyle::Dashed(vec![2, 4]),
            "-." | "dashdot" => LineStyle::Dashed(vec![12, 4, 2, 4]),
            "" | "None" | "none" => LineStyle::Hidden,
            _ => return None,
        };
        Some(style)
    }

    /// Whether the pixel `step` pixels along the line is drawn.
    pub fn is_on(&self, step: u32) -> bool {
        match self {
            LineStyle::Solid => true,
            LineStyle::Hidden => false,
            LineStyle::Dashed(pattern) => {
                let period: u32 = pattern.iter().sum();
                if period == 0 {
                    return true;
                }
                let mut pos = step % period;
                for (i, len) in pattern.iter().enumerate() {
                    if pos < *len {
                        return i % 2 == 0;
                    }
                    pos -= len;
                }
                true
            }
        }
    }
}
