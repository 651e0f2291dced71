//! Bar chart rendering for the sales groupings.
//!
//! Charts are drawn straight into an RGB pixel buffer with the [`image`] crate and saved as PNG.
//! The PDF report embeds them later, so they carry no alpha channel.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use log::info;

use crate::error::ChartError;
use crate::summary::{Grouping, Summary};

/// File name of the per-region chart inside the visuals directory.
pub const REGION_CHART_FILE: &str = "sales_by_region.png";
/// File name of the per-product chart inside the visuals directory.
pub const PRODUCT_CHART_FILE: &str = "sales_by_product.png";

/// Pixel dimensions of every chart. The 8:5 ratio matches the report's display size.
pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 500;

const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 30;
const MARGIN_TOP: u32 = 30;
const MARGIN_BOTTOM: u32 = 50;
const GRID_LINES: u32 = 4;
const BAR_FILL_RATIO: f64 = 0.7;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([64, 64, 64]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);

/// Colour ramp applied across the bars of a chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    start: [u8; 3],
    end: [u8; 3],
}

impl Palette {
    /// Cyan to magenta, used for regions.
    pub const COOL: Palette = Palette {
        start: [0, 255, 255],
        end: [255, 0, 255],
    };

    /// Deep purple to salmon, used for products.
    pub const MAGMA: Palette = Palette {
        start: [80, 18, 123],
        end: [251, 136, 97],
    };

    /// Returns the colour for bar `index` out of `count`.
    pub fn color(&self, index: usize, count: usize) -> Rgb<u8> {
        let mix = if count > 1 {
            index as f32 / (count - 1) as f32
        } else {
            0.0
        };
        let mut channels = [0u8; 3];
        for (channel, value) in channels.iter_mut().enumerate() {
            let start = self.start[channel] as f32;
            let end = self.end[channel] as f32;
            *value = (start + (end - start) * mix).round().clamp(0.0, 255.0) as u8;
        }
        Rgb(channels)
    }
}

/// Locations of the two rendered charts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartPaths {
    pub by_region: PathBuf,
    pub by_product: PathBuf,
}

/// Draws one bar per group, scaled against the largest value.
pub fn render_bar_chart(groups: &Grouping, palette: Palette) -> RgbImage {
    let mut chart = ImageBuffer::from_pixel(CHART_WIDTH, CHART_HEIGHT, BACKGROUND);

    let plot_left = MARGIN_LEFT;
    let plot_right = CHART_WIDTH - MARGIN_RIGHT;
    let plot_top = MARGIN_TOP;
    let baseline = CHART_HEIGHT - MARGIN_BOTTOM;
    let plot_height = baseline - plot_top;

    for step in 1..=GRID_LINES {
        let y = baseline - plot_height * step / GRID_LINES;
        fill_rect(&mut chart, plot_left, y, plot_right, y + 1, GRID);
    }

    let peak = groups.values().copied().fold(0.0_f64, f64::max);
    if peak > 0.0 {
        let slot = f64::from(plot_right - plot_left) / groups.len() as f64;
        let bar_width = slot * BAR_FILL_RATIO;
        for (index, value) in groups.values().enumerate() {
            let ratio = (value.max(0.0) / peak).min(1.0);
            let bar_height = (f64::from(plot_height) * ratio).round() as u32;
            let x0 = f64::from(plot_left) + slot * index as f64 + (slot - bar_width) / 2.0;
            let x1 = x0 + bar_width;
            fill_rect(
                &mut chart,
                x0.round() as u32,
                baseline - bar_height,
                x1.round() as u32,
                baseline,
                palette.color(index, groups.len()),
            );
        }
    }

    fill_rect(&mut chart, plot_left, baseline, plot_right, baseline + 2, AXIS);
    fill_rect(&mut chart, plot_left - 2, plot_top, plot_left, baseline + 2, AXIS);
    chart
}

/// Renders both grouping charts into `dir`, creating the directory when needed.
pub fn write_charts(summary: &Summary, dir: &Path) -> Result<ChartPaths, ChartError> {
    fs::create_dir_all(dir).map_err(|source| ChartError::Directory {
        path: dir.to_path_buf(),
        source,
    })?;

    let paths = ChartPaths {
        by_region: dir.join(REGION_CHART_FILE),
        by_product: dir.join(PRODUCT_CHART_FILE),
    };
    save_png(
        &render_bar_chart(summary.sales_by_region(), Palette::COOL),
        &paths.by_region,
    )?;
    save_png(
        &render_bar_chart(summary.sales_by_product(), Palette::MAGMA),
        &paths.by_product,
    )?;

    info!(
        "Charts written to {} and {}",
        paths.by_region.display(),
        paths.by_product.display()
    );
    Ok(paths)
}

fn save_png(chart: &RgbImage, path: &Path) -> Result<(), ChartError> {
    chart
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| ChartError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Fills the half-open rectangle `[x0, x1) × [y0, y1)`, clipped to the image.
fn fill_rect(image: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(image.width());
    let y1 = y1.min(image.height());
    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(entries: &[(&str, f64)]) -> Grouping {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect()
    }

    fn bar_height(chart: &RgbImage, x: u32) -> u32 {
        let baseline = CHART_HEIGHT - MARGIN_BOTTOM;
        (MARGIN_TOP..baseline)
            .filter(|&y| {
                let pixel = *chart.get_pixel(x, y);
                pixel != BACKGROUND && pixel != GRID
            })
            .count() as u32
    }

    #[test]
    fn bars_scale_against_the_peak() {
        let chart = render_bar_chart(&groups(&[("A", 10.0), ("B", 20.0)]), Palette::COOL);
        let slot = (CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / 2;
        let first = bar_height(&chart, MARGIN_LEFT + slot / 2);
        let second = bar_height(&chart, MARGIN_LEFT + slot + slot / 2);

        assert_eq!(second, CHART_HEIGHT - MARGIN_BOTTOM - MARGIN_TOP);
        assert_eq!(first, second / 2);
    }

    #[test]
    fn empty_grouping_renders_axes_only() {
        let chart = render_bar_chart(&Grouping::new(), Palette::MAGMA);
        assert_eq!(chart.dimensions(), (CHART_WIDTH, CHART_HEIGHT));
        assert_eq!(bar_height(&chart, CHART_WIDTH / 2), 0);
    }

    #[test]
    fn palette_spans_both_ends() {
        assert_eq!(Palette::COOL.color(0, 3), Rgb([0, 255, 255]));
        assert_eq!(Palette::COOL.color(2, 3), Rgb([255, 0, 255]));
        assert_eq!(Palette::MAGMA.color(0, 1), Rgb([80, 18, 123]));
    }

    #[test]
    fn writes_both_charts() {
        use image::GenericImageView;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("visuals");
        let summary = Summary::default();

        let paths = write_charts(&summary, &target).unwrap();
        assert!(paths.by_region.ends_with(REGION_CHART_FILE));
        let decoded = image::open(&paths.by_product).unwrap();
        assert_eq!(decoded.dimensions(), (CHART_WIDTH, CHART_HEIGHT));
    }
}
