//! Light and dark palettes; the theme toggle swaps the whole palette.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub panel: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(17, 24, 39),
            panel: Color::Rgb(31, 41, 55),
            text: Color::Rgb(243, 244, 246),
            muted: Color::Rgb(156, 163, 175),
            accent: Color::Rgb(99, 102, 241),
            highlight: Color::Rgb(79, 70, 229),
            success: Color::Rgb(34, 197, 94),
            warning: Color::Rgb(245, 158, 11),
            error: Color::Rgb(239, 68, 68),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(243, 244, 246),
            panel: Color::Rgb(255, 255, 255),
            text: Color::Rgb(17, 24, 39),
            muted: Color::Rgb(107, 114, 128),
            accent: Color::Rgb(79, 70, 229),
            highlight: Color::Rgb(79, 70, 229),
            success: Color::Rgb(22, 163, 74),
            warning: Color::Rgb(217, 119, 6),
            error: Color::Rgb(220, 38, 38),
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_selects_the_matching_palette() {
        assert_eq!(Palette::for_mode(true).background, Palette::dark().background);
        assert_eq!(Palette::for_mode(false).background, Palette::light().background);
    }
}
