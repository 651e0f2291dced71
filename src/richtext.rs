//! Inline text emphasis for report paragraphs.
//!
//! The report only distinguishes a few kinds of text: statistic labels, the values next to them,
//! and chart captions. A [`Span`] pairs a fragment with one of those [`Emphasis`] kinds and turns
//! into a [`genpdf`] [`StyledString`] at layout time.

use genpdf::style::{Color, Style, StyledString};

/// Caption grey, dark enough to stay readable when printed.
const CAPTION_COLOR: Color = Color::Rgb(90, 90, 90);

/// How a fragment stands out from the surrounding text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Emphasis {
    #[default]
    Regular,
    /// Bold lead-in such as `Total Sales: `.
    Label,
    /// Italic grey text placed under a figure.
    Caption,
}

impl Emphasis {
    fn style(self) -> Style {
        let mut style = Style::new();
        match self {
            Emphasis::Regular => {}
            Emphasis::Label => {
                style.set_bold();
            }
            Emphasis::Caption => {
                style.set_italic();
                style.set_color(CAPTION_COLOR);
            }
        }
        style
    }
}

/// A text fragment with its emphasis.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    emphasis: Emphasis,
}

impl Span {
    /// Creates a regular span.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_emphasis(text, Emphasis::Regular)
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::with_emphasis(text, Emphasis::Label)
    }

    pub fn caption(text: impl Into<String>) -> Self {
        Self::with_emphasis(text, Emphasis::Caption)
    }

    pub fn with_emphasis(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }

    /// Converts the span into a [`StyledString`] ready for `genpdf` elements.
    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.emphasis.style())
    }
}

impl From<&Span> for StyledString {
    fn from(span: &Span) -> Self {
        span.to_styled_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_bold_only() {
        let styled = Span::label("Total Sales: ").to_styled_string();
        assert_eq!(styled.s, "Total Sales: ");
        assert!(styled.style.is_bold());
        assert!(!styled.style.is_italic());
        assert_eq!(styled.style.color(), None);
    }

    #[test]
    fn captions_are_italic_and_grey() {
        let styled = StyledString::from(&Span::caption("Total Sales by Region"));
        assert!(styled.style.is_italic());
        assert_eq!(styled.style.color(), Some(CAPTION_COLOR));
    }

    #[test]
    fn regular_spans_keep_the_default_style() {
        let span = Span::new("30");
        assert_eq!(span.emphasis(), Emphasis::Regular);
        let style = span.to_styled_string().style;
        assert!(!style.is_bold() && !style.is_italic());
        assert_eq!(style.color(), None);
    }
}
