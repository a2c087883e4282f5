use colored::{Color, Colorize};

use crate::cli::output::use_color;

#[derive(Clone)]
pub struct UiStyle {
    pub horizontal: char,
    pub use_color: bool,
    pub color_header: Option<Color>,
}

impl UiStyle {
    pub fn detect() -> Self {
        let use_color = use_color();
        Self {
            horizontal: '─',
            use_color,
            color_header: use_color.then_some(Color::BrightBlue),
        }
    }

    pub fn horizontal_line(&self, width: usize) -> String {
        self.horizontal.to_string().repeat(width.max(20))
    }

    pub fn apply_header_style(&self, text: &str) -> String {
        if self.use_color {
            match self.color_header {
                Some(color) => text.color(color).bold().to_string(),
                None => text.bold().to_string(),
            }
        } else {
            text.to_string()
        }
    }
}
