//! Custom `genpdf` elements used by the report.
//!
//! The chart images are decoded with the [`image`] crate so decoding failures carry the file name,
//! then wrapped in a [`CaptionedImage`] that can be pinned to an exact display size.

use std::path::Path;

use image::GenericImageView;

use genpdf::elements::{Image, Paragraph};
use genpdf::error::{Context as _, Error};
use genpdf::style::Style;
use genpdf::{render, Alignment, Element, Mm, Position, RenderResult, Scale, Size};

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;
const POINTS_PER_INCH: f64 = 72.0;
const DEFAULT_CAPTION_SPACING_MM: f64 = 2.0;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Converts typographic points to millimetres.
pub fn points_to_mm(points: f64) -> f64 {
    points * MM_PER_INCH / POINTS_PER_INCH
}

fn estimated_image_size(image: &image::DynamicImage, dpi: f64) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * (px_width as f64) / dpi;
    let height_mm = MM_PER_INCH * (px_height as f64) / dpi;
    Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm))
}

/// Decodes the image file at `path`, guessing the format from its contents.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))
}

/// An image with a caption stacked underneath, sharing one alignment.
pub struct CaptionedImage {
    image: Image,
    caption: Option<Paragraph>,
    alignment: Alignment,
    natural_size: Size,
    requested_width: Option<Mm>,
    requested_height: Option<Mm>,
    spacing: Mm,
}

impl CaptionedImage {
    /// Wraps an already decoded image. Images with an alpha channel are rejected by `genpdf`.
    pub fn from_dynamic_image(image: image::DynamicImage) -> Result<Self, Error> {
        let natural_size = estimated_image_size(&image, DEFAULT_IMAGE_DPI);
        let image = Image::from_dynamic_image(image)?;
        Ok(Self {
            image,
            caption: None,
            alignment: Alignment::Left,
            natural_size,
            requested_width: None,
            requested_height: None,
            spacing: mm_from_f64(DEFAULT_CAPTION_SPACING_MM),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::from_dynamic_image(decode_image_from_path(path)?)
    }

    /// Sets the caption rendered below the image.
    pub fn with_caption(mut self, caption: impl Into<Option<Paragraph>>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Constrains the rendered width. Without a height the aspect ratio is kept.
    pub fn with_width(mut self, width: impl Into<Option<Mm>>) -> Self {
        self.requested_width = width.into();
        self
    }

    /// Constrains the rendered height.
    pub fn with_height(mut self, height: impl Into<Option<Mm>>) -> Self {
        self.requested_height = height.into();
        self
    }

    /// Horizontal and vertical scale factors applied when rendering.
    pub fn scale_factors(&self) -> (f64, f64) {
        let ratio = |requested: Option<Mm>, natural: Mm| {
            let natural = mm_to_f64(natural);
            requested
                .filter(|_| natural > f64::EPSILON)
                .map(|requested| mm_to_f64(requested) / natural)
        };
        let x = ratio(self.requested_width, self.natural_size.width);
        let y = ratio(self.requested_height, self.natural_size.height);
        match (x, y) {
            (Some(x), Some(y)) => (x, y),
            (Some(x), None) => (x, x),
            (None, Some(y)) => (y, y),
            (None, None) => (1.0, 1.0),
        }
    }

    fn apply_layout(&mut self) {
        let (x, y) = self.scale_factors();
        self.image.set_scale(Scale::new(x, y));
        self.image.set_alignment(self.alignment);
        if let Some(caption) = self.caption.as_mut() {
            caption.set_alignment(self.alignment);
        }
    }
}

impl Element for CaptionedImage {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        self.apply_layout();

        let mut result = RenderResult::default();
        let image_result = self.image.render(context, area.clone(), style)?;
        result.size = result.size.stack_vertical(image_result.size);
        result.has_more |= image_result.has_more;

        if let Some(caption) = self.caption.as_mut() {
            let spacing = self.spacing;
            area.add_offset(Position::new(0, image_result.size.height + spacing));
            result.size = result.size.stack_vertical(Size::new(0, spacing));

            let caption_result = caption.render(context, area, style)?;
            result.size = result.size.stack_vertical(caption_result.size);
            result.has_more |= caption_result.has_more;
        }

        Ok(result)
    }
}
