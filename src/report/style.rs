//! Shared formatting constants. Each report carries a single accent
//! theme; every other format is derived from it so sheets stay uniform.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

/// Column-width cap applied by the final layout pass.
pub const MAX_COLUMN_WIDTH: usize = 30;
/// Extra character padding on auto-sized columns.
pub const COLUMN_PADDING: usize = 2;

const MET_GREEN: u32 = 0x008000;
const MISSED_RED: u32 = 0xC00000;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: u32,
}

impl Theme {
    pub fn lims() -> Self {
        Self { accent: 0x2E75B6 }
    }

    pub fn nhs() -> Self {
        Self { accent: 0x2B579A }
    }
}

pub fn title(theme: &Theme) -> Format {
    Format::new()
        .set_bold()
        .set_font_size(16)
        .set_font_color(Color::RGB(theme.accent))
}

pub fn caption() -> Format {
    Format::new().set_italic()
}

pub fn section(theme: &Theme) -> Format {
    Format::new()
        .set_bold()
        .set_font_size(12)
        .set_font_color(Color::RGB(theme.accent))
}

pub fn bold() -> Format {
    Format::new().set_bold()
}

pub fn header(theme: &Theme) -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(theme.accent))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
}

pub fn cell() -> Format {
    Format::new().set_border(FormatBorder::Thin)
}

pub fn cell_centered() -> Format {
    Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
}

pub fn met() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::RGB(MET_GREEN))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
}

pub fn missed() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::RGB(MISSED_RED))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
}
