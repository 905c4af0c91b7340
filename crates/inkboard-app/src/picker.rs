//! Color picker capability.

use peniko::Color;

/// Something that can ask the user for a color.
pub trait ColorPicker {
    /// Pick a color, starting from `initial`. None means the pick was cancelled.
    fn pick(&mut self, initial: Color) -> Option<Color>;
}

/// Picker that steps through a fixed palette.
///
/// Each pick returns the palette entry after `initial`, wrapping around. A
/// color not in the palette picks the first entry; an empty palette always
/// cancels.
#[derive(Debug, Clone)]
pub struct PalettePicker {
    palette: Vec<Color>,
}

impl PalettePicker {
    pub fn new(palette: Vec<Color>) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }
}

impl Default for PalettePicker {
    fn default() -> Self {
        Self::new(vec![
            Color::from_rgba8(0xe6, 0xe6, 0xe6, 0xff),
            Color::from_rgba8(0xff, 0x55, 0x55, 0xff),
            Color::from_rgba8(0xff, 0xb8, 0x6c, 0xff),
            Color::from_rgba8(0xf1, 0xfa, 0x8c, 0xff),
            Color::from_rgba8(0x50, 0xfa, 0x7b, 0xff),
            Color::from_rgba8(0x8b, 0xe9, 0xfd, 0xff),
            Color::from_rgba8(0x5a, 0xa0, 0xff, 0xff),
            Color::from_rgba8(0xbd, 0x93, 0xf9, 0xff),
        ])
    }
}

impl ColorPicker for PalettePicker {
    fn pick(&mut self, initial: Color) -> Option<Color> {
        let current = initial.to_rgba8();
        let next = match self
            .palette
            .iter()
            .position(|color| color.to_rgba8() == current)
        {
            Some(index) => (index + 1) % self.palette.len(),
            None => 0,
        };
        let picked = self.palette.get(next).copied();
        if let Some(color) = picked {
            let rgba = color.to_rgba8();
            log::debug!("Picked color #{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
        }
        picked
    }
}
