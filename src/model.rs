//! Data structures describing the logical content of the PDF report.
//!
//! The model stays independent of the rendering crate so the report content can be assembled and
//! inspected in tests without fonts. [`crate::builder`] maps it onto `genpdf` elements.

use std::path::{Path, PathBuf};

use crate::richtext::Span;

/// Horizontal placement of a paragraph or image.
///
/// The variants map directly to [`genpdf::Alignment`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl From<HorizontalAlignment> for genpdf::Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => genpdf::Alignment::Left,
            HorizontalAlignment::Center => genpdf::Alignment::Center,
            HorizontalAlignment::Right => genpdf::Alignment::Right,
        }
    }
}

/// Rich text paragraph carrying inline styling information and alignment metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RichParagraph {
    spans: Vec<Span>,
    alignment: HorizontalAlignment,
}

impl RichParagraph {
    /// Creates a left-aligned paragraph from the provided spans.
    pub fn new(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
            ..Self::default()
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Sets the alignment and returns the updated paragraph.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Concatenated text of all spans.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }
}

/// Image file with an optional caption and display size.
///
/// Sizes are stored in millimetres. When both are set the image is stretched to exactly that box.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBlock {
    path: PathBuf,
    caption: Option<RichParagraph>,
    alignment: HorizontalAlignment,
    width_mm: Option<f64>,
    height_mm: Option<f64>,
}

impl ImageBlock {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            caption: None,
            alignment: HorizontalAlignment::Left,
            width_mm: None,
            height_mm: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn caption(&self) -> Option<&RichParagraph> {
        self.caption.as_ref()
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    pub fn width_mm(&self) -> Option<f64> {
        self.width_mm
    }

    pub fn height_mm(&self) -> Option<f64> {
        self.height_mm
    }

    /// Sets the caption and returns the updated image block.
    pub fn with_caption(mut self, caption: impl Into<Option<RichParagraph>>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Sets the alignment and returns the updated image block.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Fixes both rendered dimensions.
    pub fn with_size_mm(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.width_mm = Some(width_mm);
        self.height_mm = Some(height_mm);
        self
    }
}

/// Individual content blocks that make up a section.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Styled paragraph content.
    Paragraph(RichParagraph),
    /// Lines rendered verbatim, one per row, without wrapping.
    Preformatted(Vec<String>),
    /// Captioned image content.
    Image(ImageBlock),
    /// Vertical gap measured in lines.
    Spacer(f64),
}

impl Block {
    /// Convenience helper for building a paragraph block.
    pub fn paragraph(spans: impl Into<Vec<Span>>) -> Self {
        Self::Paragraph(RichParagraph::new(spans))
    }

    /// Convenience helper for a preformatted block.
    pub fn preformatted<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Preformatted(lines.into_iter().map(Into::into).collect())
    }

    pub fn spacer(lines: f64) -> Self {
        Self::Spacer(lines)
    }
}

/// A run of blocks with an optional heading.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Section {
    title: Option<String>,
    blocks: Vec<Block>,
}

impl Section {
    /// Creates a section rendered under a heading.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            blocks: Vec::new(),
        }
    }

    /// Creates a section without a heading.
    pub fn untitled() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Appends a block and returns the updated section.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Image blocks in document order.
    pub fn images(&self) -> impl Iterator<Item = &ImageBlock> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Image(image) => Some(image),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preformatted_collects_lines() {
        let block = Block::preformatted(["Region", "A    10"]);
        assert_eq!(
            block,
            Block::Preformatted(vec!["Region".to_string(), "A    10".to_string()])
        );
    }

    #[test]
    fn images_skip_other_blocks() {
        let section = Section::untitled()
            .with_block(Block::paragraph(vec![Span::new("intro")]))
            .with_block(Block::Image(ImageBlock::new("a.png")))
            .with_block(Block::spacer(1.0))
            .with_block(Block::Image(ImageBlock::new("b.png")));

        let paths: Vec<_> = section.images().map(ImageBlock::path).collect();
        assert_eq!(paths, [Path::new("a.png"), Path::new("b.png")]);
    }

    #[test]
    fn size_sets_both_dimensions() {
        let image = ImageBlock::new("chart.png").with_size_mm(141.1, 88.2);
        assert_eq!(image.width_mm(), Some(141.1));
        assert_eq!(image.height_mm(), Some(88.2));
        assert!(image.caption().is_none());
    }
}
