//! Assembles the sales report document from a [`Summary`] and the rendered charts.

use std::fs;
use std::path::Path;

use genpdf::elements::Paragraph;
use genpdf::Alignment;
use log::info;

use crate::builder::PdfBuilder;
use crate::chart::ChartPaths;
use crate::elements::points_to_mm;
use crate::error::ReportError;
use crate::model::{Block, HorizontalAlignment, ImageBlock, RichParagraph, Section};
use crate::richtext::Span;
use crate::summary::{Grouping, Summary};

pub const REPORT_TITLE: &str = "Sales Analytics Report";

/// Display size of each embedded chart, in points.
pub const CHART_DISPLAY_WIDTH_PT: f64 = 400.0;
pub const CHART_DISPLAY_HEIGHT_PT: f64 = 250.0;

const FOOTER_HEIGHT_MM: f64 = 8.0;

/// Formats an amount the way it appears in the report: integers without a fractional part.
pub fn format_amount(amount: f64) -> String {
    amount.to_string()
}

/// Renders a grouping as aligned `key  value` lines under a header naming the key column.
pub fn format_grouping(label: &str, grouping: &Grouping) -> Vec<String> {
    let width = grouping
        .keys()
        .map(|key| key.chars().count())
        .chain(std::iter::once(label.chars().count()))
        .max()
        .unwrap_or_default();

    std::iter::once(label.to_owned())
        .chain(
            grouping
                .iter()
                .map(|(key, total)| format!("{key:<width$}    {}", format_amount(*total))),
        )
        .collect()
}

/// Builds the report content. Nothing is rendered until [`PdfBuilder::render`] runs.
pub fn build_report(summary: &Summary, charts: &ChartPaths) -> PdfBuilder {
    let average = summary
        .average_sale()
        .map(|average| format!("{average:.2}"))
        .unwrap_or_else(|| "n/a".to_owned());

    let statistics = Section::untitled()
        .with_block(Block::paragraph(vec![
            Span::label("Total Sales: "),
            Span::new(format_amount(summary.total_sales())),
        ]))
        .with_block(Block::paragraph(vec![
            Span::label("Average Sale per Transaction: "),
            Span::new(average),
        ]))
        .with_block(Block::spacer(1.0));

    let by_region = Section::new("Sales by Region:")
        .with_block(Block::preformatted(format_grouping(
            "Region",
            summary.sales_by_region(),
        )))
        .with_block(Block::spacer(1.0));

    let by_product = Section::new("Sales by Product:")
        .with_block(Block::preformatted(format_grouping(
            "Product",
            summary.sales_by_product(),
        )))
        .with_block(Block::spacer(1.0));

    let visuals = Section::untitled()
        .with_block(Block::Image(chart_block(
            &charts.by_region,
            "Total Sales by Region",
        )))
        .with_block(Block::spacer(1.0))
        .with_block(Block::Image(chart_block(
            &charts.by_product,
            "Total Sales by Product",
        )));

    PdfBuilder::new()
        .with_title(REPORT_TITLE)
        .with_footer(FOOTER_HEIGHT_MM, |page| {
            Paragraph::new(format!("Page {page}")).aligned(Alignment::Right)
        })
        .add_section(statistics)
        .add_section(by_region)
        .add_section(by_product)
        .add_section(visuals)
}

fn chart_block(path: &Path, title: &str) -> ImageBlock {
    ImageBlock::new(path)
        .with_caption(RichParagraph::new(vec![Span::caption(title)]))
        .with_alignment(HorizontalAlignment::Center)
        .with_size_mm(
            points_to_mm(CHART_DISPLAY_WIDTH_PT),
            points_to_mm(CHART_DISPLAY_HEIGHT_PT),
        )
}

/// Renders the report and writes it to `path`, creating parent directories as needed.
pub fn write_report(summary: &Summary, charts: &ChartPaths, path: &Path) -> Result<(), ReportError> {
    let pdf = build_report(summary, charts).render()?;

    let write_error = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, &pdf.bytes).map_err(write_error)?;

    info!("PDF report generated: {} ({} bytes)", path.display(), pdf.bytes.len());
    Ok(())
}
