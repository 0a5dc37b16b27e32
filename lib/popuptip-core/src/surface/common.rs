use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::fmt::{Debug, Display, Formatter};

#[derive(Debug)]
pub struct SurfaceError {
    pub error_type: SurfaceErrorType,
    pub backtrace: Backtrace,
}

#[derive(Debug)]
pub enum SurfaceErrorType {
    Unknown,
    Error(String),
}

impl From<SurfaceErrorType> for SurfaceError {
    fn from(error_type: SurfaceErrorType) -> Self {
        Self {
            error_type,
            backtrace: Backtrace::capture(),
        }
    }
}

impl From<&str> for SurfaceError {
    fn from(error: &str) -> Self {
        SurfaceErrorType::Error(error.to_string()).into()
    }
}

impl From<String> for SurfaceError {
    fn from(error: String) -> Self {
        SurfaceErrorType::Error(error).into()
    }
}

impl From<()> for SurfaceError {
    fn from(_: ()) -> Self {
        SurfaceErrorType::Unknown.into()
    }
}

impl Display for SurfaceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.error_type {
            SurfaceErrorType::Unknown => write!(f, "unknown surface error"),
            SurfaceErrorType::Error(message) => write!(f, "{message}"),
        }
    }
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Absolute screen position. No bounds are enforced, off-screen values are
/// passed through to the provider as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

pub type Rgb = (u8, u8, u8);

/// Visual style of the shared text surface. Fixed once the controller is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    pub foreground: Rgb,
    pub background: Rgb,
    pub border_color: Rgb,
    pub border_width: u32,
    pub editable: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            foreground: (255, 255, 255),
            background: (64, 64, 64),
            border_color: (0, 0, 0),
            border_width: 2,
            editable: false,
        }
    }
}

/// The single reusable text display every tip is rendered from.
///
/// Only the text changes between tips; the style is set at construction.
#[derive(Debug, Clone)]
pub struct TextSurface {
    text: String,
    style: TextStyle,
}

impl TextSurface {
    pub fn new(style: TextStyle) -> Self {
        Self {
            text: String::new(),
            style,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub(crate) fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style() {
        let style = TextStyle::default();
        assert_eq!(style.foreground, (255, 255, 255));
        assert_eq!(style.background, (64, 64, 64));
        assert_eq!(style.border_color, (0, 0, 0));
        assert_eq!(style.border_width, 2);
        assert!(!style.editable);
    }

    #[test]
    fn test_set_text_keeps_style() {
        let style = TextStyle {
            border_width: 5,
            ..TextStyle::default()
        };
        let mut surface = TextSurface::new(style.clone());
        surface.set_text("first");
        surface.set_text("second");
        assert_eq!(surface.text(), "second");
        assert_eq!(surface.style(), &style);
    }

    #[test]
    fn test_error_display() {
        let error: SurfaceError = "no display".into();
        assert_eq!(error.to_string(), "no display");
        let error: SurfaceError = ().into();
        assert_eq!(error.to_string(), "unknown surface error");
    }
}
