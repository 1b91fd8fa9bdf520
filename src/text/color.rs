//! Text colors: the sixteen named colors plus 24-bit RGB.

use std::fmt;

/// The sixteen colors every host version understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl NamedColor {
    /// All named colors, ordered by legacy code `0`..`f`.
    pub const ALL: [NamedColor; 16] = [
        Self::Black,
        Self::DarkBlue,
        Self::DarkGreen,
        Self::DarkAqua,
        Self::DarkRed,
        Self::DarkPurple,
        Self::Gold,
        Self::Gray,
        Self::DarkGray,
        Self::Blue,
        Self::Green,
        Self::Aqua,
        Self::Red,
        Self::LightPurple,
        Self::Yellow,
        Self::White,
    ];

    /// JSON name, e.g. `dark_purple`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::DarkBlue => "dark_blue",
            Self::DarkGreen => "dark_green",
            Self::DarkAqua => "dark_aqua",
            Self::DarkRed => "dark_red",
            Self::DarkPurple => "dark_purple",
            Self::Gold => "gold",
            Self::Gray => "gray",
            Self::DarkGray => "dark_gray",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Aqua => "aqua",
            Self::Red => "red",
            Self::LightPurple => "light_purple",
            Self::Yellow => "yellow",
            Self::White => "white",
        }
    }

    pub fn rgb(self) -> u32 {
        match self {
            Self::Black => 0x000000,
            Self::DarkBlue => 0x0000aa,
            Self::DarkGreen => 0x00aa00,
            Self::DarkAqua => 0x00aaaa,
            Self::DarkRed => 0xaa0000,
            Self::DarkPurple => 0xaa00aa,
            Self::Gold => 0xffaa00,
            Self::Gray => 0xaaaaaa,
            Self::DarkGray => 0x555555,
            Self::Blue => 0x5555ff,
            Self::Green => 0x55ff55,
            Self::Aqua => 0x55ffff,
            Self::Red => 0xff5555,
            Self::LightPurple => 0xff55ff,
            Self::Yellow => 0xffff55,
            Self::White => 0xffffff,
        }
    }

    /// Legacy format code (`0`-`9`, `a`-`f`).
    pub fn code(self) -> char {
        let index = Self::ALL.iter().position(|c| *c == self).unwrap_or(15) as u32;
        std::char::from_digit(index, 16).unwrap_or('f')
    }

    pub fn from_code(code: char) -> Option<Self> {
        code.to_digit(16).map(|index| Self::ALL[index as usize])
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }
}

/// A color as carried by a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColor {
    Named(NamedColor),
    /// `0xRRGGBB`
    Rgb(u32),
}

impl TextColor {
    /// RGB color from the low 24 bits of `value`.
    pub const fn from_rgb(value: u32) -> Self {
        Self::Rgb(value & 0xffffff)
    }

    /// Drops bits above the 24-bit range so equal encodings compare equal.
    pub fn normalized(self) -> Self {
        match self {
            Self::Rgb(rgb) => Self::from_rgb(rgb),
            named => named,
        }
    }

    pub fn rgb(self) -> u32 {
        match self {
            Self::Named(named) => named.rgb(),
            Self::Rgb(rgb) => rgb & 0xffffff,
        }
    }

    /// Closest named color by squared RGB distance.
    pub fn nearest_named(self) -> NamedColor {
        if let Self::Named(named) = self {
            return named;
        }
        let target = self.rgb();
        let distance = |rgb: u32| -> u32 {
            let channel = |shift: u32| {
                let a = ((target >> shift) & 0xff) as i32;
                let b = ((rgb >> shift) & 0xff) as i32;
                ((a - b) * (a - b)) as u32
            };
            channel(16) + channel(8) + channel(0)
        };
        NamedColor::ALL
            .iter()
            .copied()
            .min_by_key(|named| distance(named.rgb()))
            .unwrap_or(NamedColor::White)
    }

    /// Maps RGB colors onto the named palette for hosts without hex support.
    pub fn downsample(self) -> Self {
        Self::Named(self.nearest_named())
    }

    /// Parses `#rrggbb` or a named color.
    pub fn parse(value: &str) -> Option<Self> {
        if let Some(hex) = value.strip_prefix('#') {
            if hex.len() != 6 {
                return None;
            }
            return u32::from_str_radix(hex, 16).ok().map(Self::Rgb);
        }
        NamedColor::from_name(value).map(Self::Named)
    }

    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.rgb())
    }
}

impl From<NamedColor> for TextColor {
    fn from(named: NamedColor) -> Self {
        Self::Named(named)
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => f.write_str(named.name()),
            Self::Rgb(_) => f.write_str(&self.to_hex()),
        }
    }
}
