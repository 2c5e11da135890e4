use ratatui::style::Color;

#[derive(Debug, Clone)]
pub enum ColorValue {
    Rgb { r: u8, g: u8, b: u8 },
    Named(&'static str),
}

impl ColorValue {
    pub fn to_color(&self) -> Color {
        match self {
            ColorValue::Rgb { r, g, b } => Color::Rgb(*r, *g, *b),
            ColorValue::Named(name) => match *name {
                "black" => Color::Black,
                "red" => Color::Red,
                "green" => Color::Green,
                "yellow" => Color::Yellow,
                "blue" => Color::Blue,
                "magenta" => Color::Magenta,
                "cyan" => Color::Cyan,
                "white" => Color::White,
                "gray" | "grey" => Color::Gray,
                "dark_gray" | "dark_grey" => Color::DarkGray,
                _ => Color::White,
            },
        }
    }
}

/// Theme configuration for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub border: ColorValue,
    pub border_focused: ColorValue,
    pub header: ColorValue,
    pub text_primary: ColorValue,
    pub text_secondary: ColorValue,
    pub user_message: ColorValue,
    pub assistant_message: ColorValue,
    pub error: ColorValue,
    pub pending: ColorValue,
    pub code_foreground: ColorValue,
    pub code_background: ColorValue,
}

impl Theme {
    /// Create the default dark theme
    pub fn dark() -> Self {
        Self {
            name: "dark",
            border: ColorValue::Named("dark_gray"),
            border_focused: ColorValue::Named("cyan"),
            header: ColorValue::Named("cyan"),
            text_primary: ColorValue::Named("white"),
            text_secondary: ColorValue::Named("gray"),
            user_message: ColorValue::Named("blue"),
            assistant_message: ColorValue::Named("green"),
            error: ColorValue::Named("red"),
            pending: ColorValue::Named("yellow"),
            code_foreground: ColorValue::Named("yellow"),
            code_background: ColorValue::Rgb { r: 40, g: 40, b: 40 },
        }
    }

    /// Create a light theme
    pub fn light() -> Self {
        Self {
            name: "light",
            border: ColorValue::Rgb { r: 200, g: 200, b: 200 },
            border_focused: ColorValue::Rgb { r: 0, g: 100, b: 200 },
            header: ColorValue::Rgb { r: 0, g: 100, b: 200 },
            text_primary: ColorValue::Named("black"),
            text_secondary: ColorValue::Rgb { r: 100, g: 100, b: 100 },
            user_message: ColorValue::Rgb { r: 0, g: 50, b: 200 },
            assistant_message: ColorValue::Rgb { r: 0, g: 150, b: 50 },
            error: ColorValue::Rgb { r: 200, g: 0, b: 0 },
            pending: ColorValue::Rgb { r: 200, g: 150, b: 0 },
            code_foreground: ColorValue::Rgb { r: 150, g: 0, b: 150 },
            code_background: ColorValue::Rgb { r: 235, g: 235, b: 235 },
        }
    }

    /// Look up a theme by its config name, falling back to dark
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!("Unknown theme '{}', using dark", other);
                Self::dark()
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
