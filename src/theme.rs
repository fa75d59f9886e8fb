pub use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    Monochrome,
}

#[derive(Debug, Clone, Default)]
pub struct ColorScheme {
    pub foreground: Option<Color>,
    pub bold: bool,
    pub underline: bool,
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: ColorScheme,
    pub command: ColorScheme,
    pub success: ColorScheme,
    pub error: ColorScheme,
    pub warning: ColorScheme,
    pub suggestion: ColorScheme,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header: ColorScheme {
                foreground: Some(Color::Blue),
                bold: true,
                underline: false,
            },
            command: ColorScheme {
                foreground: Some(Color::Green),
                ..Default::default()
            },
            success: ColorScheme {
                foreground: Some(Color::Green),
                bold: true,
                underline: false,
            },
            error: ColorScheme {
                foreground: Some(Color::Red),
                bold: true,
                underline: false,
            },
            warning: ColorScheme {
                foreground: Some(Color::Yellow),
                ..Default::default()
            },
            suggestion: ColorScheme {
                foreground: Some(Color::Cyan),
                ..Default::default()
            },
        }
    }
}

impl Theme {
    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
            ThemeName::Monochrome => Self::monochrome(),
        }
    }

    pub fn dark() -> Self {
        Self::default()
    }

    pub fn light() -> Self {
        Self {
            header: ColorScheme {
                foreground: Some(Color::BrightBlue),
                bold: true,
                underline: false,
            },
            command: ColorScheme {
                foreground: Some(Color::BrightGreen),
                ..Default::default()
            },
            success: ColorScheme {
                foreground: Some(Color::BrightGreen),
                bold: true,
                underline: false,
            },
            error: ColorScheme {
                foreground: Some(Color::BrightRed),
                bold: true,
                underline: false,
            },
            warning: ColorScheme {
                foreground: Some(Color::BrightYellow),
                ..Default::default()
            },
            suggestion: ColorScheme {
                foreground: Some(Color::BrightCyan),
                ..Default::default()
            },
        }
    }

    pub fn monochrome() -> Self {
        Self {
            header: ColorScheme {
                foreground: None,
                bold: true,
                underline: true,
            },
            command: ColorScheme::default(),
            success: ColorScheme {
                foreground: None,
                bold: true,
                underline: false,
            },
            error: ColorScheme {
                foreground: None,
                bold: true,
                underline: true,
            },
            warning: ColorScheme {
                foreground: None,
                bold: true,
                underline: false,
            },
            suggestion: ColorScheme::default(),
        }
    }
}

impl ColorScheme {
    pub fn apply(&self, text: &str) -> colored::ColoredString {
        let mut colored_text: colored::ColoredString = text.into();

        if let Some(fg) = self.foreground {
            colored_text = colored_text.color(fg);
        }
        if self.bold {
            colored_text = colored_text.bold();
        }
        if self.underline {
            colored_text = colored_text.underline();
        }

        colored_text
    }
}
