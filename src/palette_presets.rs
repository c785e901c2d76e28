use std::collections::HashMap;

use blockfall_engine::Color as CellColor;
use crossterm::style::Color;

pub type Palette = HashMap<CellColor, Color>;

pub fn color16_palette() -> Palette {
    const COLORS_COLOR16: [(CellColor, Color); 7] = [
        (CellColor::Green, Color::Green),
        (CellColor::Orange, Color::DarkYellow),
        (CellColor::Magenta, Color::Magenta),
        (CellColor::Blue, Color::Blue),
        (CellColor::Yellow, Color::Yellow),
        (CellColor::Red, Color::Red),
        (CellColor::Cyan, Color::Cyan),
    ];
    HashMap::from(COLORS_COLOR16)
}

pub fn fullcolor_palette() -> Palette {
    #[rustfmt::skip]
    const COLORS_FULLCOLOR: [(CellColor, Color); 7] = [
        (CellColor::Green,   Color::Rgb{r:  0,g:255,b:  0}), // #00FF00
        (CellColor::Orange,  Color::Rgb{r:255,g:127,b:  0}), // #FF7F00
        (CellColor::Magenta, Color::Rgb{r:255,g:  0,b:255}), // #FF00FF
        (CellColor::Blue,    Color::Rgb{r:  0,g:  0,b:255}), // #0000FF
        (CellColor::Yellow,  Color::Rgb{r:255,g:255,b:  0}), // #FFFF00
        (CellColor::Red,     Color::Rgb{r:255,g:  0,b:  0}), // #FF0000
        (CellColor::Cyan,    Color::Rgb{r:  0,g:255,b:255}), // #00FFFF
    ];
    HashMap::from(COLORS_FULLCOLOR)
}

pub fn monochrome_palette() -> Palette {
    HashMap::new()
}

#[derive(
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum PalettePreset {
    Monochrome,
    #[default]
    Color16,
    Fullcolor,
}

impl PalettePreset {
    pub const VARIANTS: [Self; 3] = [Self::Monochrome, Self::Color16, Self::Fullcolor];

    pub fn palette(&self) -> Palette {
        match self {
            PalettePreset::Monochrome => monochrome_palette(),
            PalettePreset::Color16 => color16_palette(),
            PalettePreset::Fullcolor => fullcolor_palette(),
        }
    }

    pub fn cycle(&self, steps: isize) -> Self {
        let n = Self::VARIANTS.len() as isize;
        Self::VARIANTS[(*self as isize + steps).rem_euclid(n) as usize]
    }
}
