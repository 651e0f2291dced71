//! Turns the report model into a rendered PDF document.

use genpdf::elements::{Break, LinearLayout, Paragraph, Text};
use genpdf::error::{Error, ErrorKind};
use genpdf::style::Style;
use genpdf::{self, Alignment, Element, Margins, Mm, PageDecorator, PaperSize, Position};

use crate::elements::{mm_from_f64, CaptionedImage};
use crate::error::ReportError;
use crate::fonts;
use crate::model::{Block, ImageBlock, RichParagraph, Section};

const DEFAULT_MARGINS_MM: f64 = 20.0;
const TITLE_FONT_SIZE: u8 = 20;
const HEADING_FONT_SIZE: u8 = 14;
const PREFORMATTED_FONT_SIZE: u8 = 10;

type FooterFactory = dyn Fn(usize) -> Box<dyn Element>;

/// Rendered PDF bytes.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
}

/// Collects a title and sections and renders them on US Letter pages with 20 mm margins.
#[derive(Default)]
pub struct PdfBuilder {
    title: String,
    footer: Option<FooterSpec>,
    sections: Vec<Section>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document title, shown at the top of the first page and in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Configures a footer with a fixed height, invoked with the 1-based page number.
    pub fn with_footer<F, E>(mut self, height: impl Into<Mm>, footer: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.footer = Some(FooterSpec::new(height, footer));
        self
    }

    pub fn add_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Lays out every section and serializes the document.
    pub fn render(self) -> Result<RenderedPdf, ReportError> {
        let font_family = fonts::default_font_family().map_err(ReportError::FontLoad)?;
        let mut document = genpdf::Document::new(font_family);
        let monospace =
            fonts::install_monospace_fonts(&mut document).map_err(ReportError::FontLoad)?;
        let preformatted = Style::new()
            .with_font_family(monospace)
            .with_font_size(PREFORMATTED_FONT_SIZE);

        let margin = mm_from_f64(DEFAULT_MARGINS_MM);
        document.set_title(self.title.clone());
        document.set_paper_size(PaperSize::Letter);
        document.set_page_decorator(ReportPageDecorator::new(
            Margins::trbl(margin, margin, margin, margin),
            self.footer,
        ));

        if !self.title.is_empty() {
            document.push(
                Paragraph::new(self.title.clone())
                    .aligned(Alignment::Center)
                    .styled(Style::new().bold().with_font_size(TITLE_FONT_SIZE)),
            );
            document.push(Break::new(1));
        }

        for section in &self.sections {
            if let Some(title) = section.title() {
                document.push(
                    Paragraph::new(title).styled(Style::new().bold().with_font_size(HEADING_FONT_SIZE)),
                );
            }
            for block in section.blocks() {
                push_block(&mut document, block, preformatted)?;
            }
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes).map_err(ReportError::Render)?;
        Ok(RenderedPdf { bytes })
    }
}

/// `preformatted` carries the fixed-width family so padded columns stay aligned.
fn push_block(
    document: &mut genpdf::Document,
    block: &Block,
    preformatted: Style,
) -> Result<(), ReportError> {
    match block {
        Block::Paragraph(paragraph) => document.push(rich_paragraph(paragraph)),
        Block::Preformatted(lines) => {
            let mut layout = LinearLayout::vertical();
            for line in lines {
                layout.push(Text::new(line.as_str()).styled(preformatted));
            }
            document.push(layout);
        }
        Block::Image(image) => document.push(captioned_image(image)?),
        Block::Spacer(lines) => document.push(Break::new(*lines)),
    }
    Ok(())
}

fn rich_paragraph(paragraph: &RichParagraph) -> Paragraph {
    let mut element = Paragraph::default();
    for span in paragraph.spans() {
        element.push(span);
    }
    element.set_alignment(paragraph.alignment().into());
    element
}

fn captioned_image(block: &ImageBlock) -> Result<CaptionedImage, ReportError> {
    let image = CaptionedImage::from_path(block.path()).map_err(|source| ReportError::Image {
        path: block.path().to_path_buf(),
        source,
    })?;

    Ok(image
        .with_caption(block.caption().map(rich_paragraph))
        .with_alignment(block.alignment().into())
        .with_width(block.width_mm().map(mm_from_f64))
        .with_height(block.height_mm().map(mm_from_f64)))
}

/// Definition of a footer rendered through the page decorator.
pub struct FooterSpec {
    height: Mm,
    factory: Box<FooterFactory>,
}

impl FooterSpec {
    pub fn new<F, E>(height: impl Into<Mm>, factory: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        Self {
            height: height.into(),
            factory: Box::new(move |page| Box::new(factory(page)) as Box<dyn Element>),
        }
    }
}

struct ReportPageDecorator {
    page: usize,
    margins: Margins,
    footer: Option<FooterSpec>,
}

impl ReportPageDecorator {
    fn new(margins: Margins, footer: Option<FooterSpec>) -> Self {
        Self {
            page: 0,
            margins,
            footer,
        }
    }
}

impl PageDecorator for ReportPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;
        area.add_margins(self.margins);

        if let Some(footer) = &self.footer {
            let available = area.size().height;
            if footer.height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer.height));
            let mut element = (footer.factory)(self.page);
            let result = element.render(context, footer_area, style)?;
            if result.has_more {
                return Err(Error::new(
                    "Footer element does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - footer.height);
        }

        Ok(area)
    }
}
