use std::path::Path;

use sales_report::chart::write_charts;
use sales_report::fonts;
use sales_report::report::{build_report, write_report};
use sales_report::summary::Summary;
use sales_report::table::Record;
use sha2::{Digest, Sha256};

const SKIP_NOTICE: &str =
    "Roboto/Roboto Mono fonts missing. Set SALES_REPORT_FONTS_DIR or copy assets/fonts next to the binary.";

fn sample_summary() -> Summary {
    let record = |region: &str, product: &str, quantity: u64, unit_price: f64| Record {
        date: None,
        region: region.to_string(),
        product: product.to_string(),
        quantity,
        unit_price,
        total: quantity as f64 * unit_price,
    };
    Summary::from_records(&[
        record("Punjab", "Jeans", 2, 2000.0),
        record("Sindh", "Shirts", 5, 750.0),
        record("KPK", "Pants", 1, 1200.0),
    ])
}

fn render_sample_pdf(dir: &Path) -> Option<Vec<u8>> {
    if !fonts::default_fonts_available() {
        return None;
    }

    let summary = sample_summary();
    let charts = write_charts(&summary, dir).expect("write charts");
    let pdf = build_report(&summary, &charts)
        .render()
        .expect("render sample report");
    Some(pdf.bytes)
}

/// Blanks out the timestamp and identifier values `printpdf` embeds in every document.
fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn blank_after(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if !data[index..].starts_with(tag) {
                index += 1;
                continue;
            }
            let mut cursor = index + tag.len();
            while cursor < data.len() && data[cursor] != terminator {
                let keep = terminator != b')'
                    && matches!(data[cursor], b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t');
                if !keep {
                    data[cursor] = b'0';
                }
                cursor += 1;
            }
            index = cursor;
        }
    }

    fn blank_between(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while let Some(found) = data[offset..]
            .windows(start.len())
            .position(|window| window == start)
        {
            let from = offset + found + start.len();
            let Some(length) = data[from..]
                .windows(end.len())
                .position(|window| window == end)
            else {
                break;
            };
            for byte in &mut data[from..from + length] {
                if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            offset = from + length + end.len();
        }
    }

    let mut normalized = bytes.to_vec();
    for tag in [&b"/CreationDate("[..], b"/ModDate(", b"/Producer("] {
        blank_after(&mut normalized, tag, b')');
    }
    blank_after(&mut normalized, b"/ID[", b']');
    for element in [
        "xmp:CreateDate",
        "xmp:ModifyDate",
        "xmp:MetadataDate",
        "xmpMM:DocumentID",
        "xmpMM:InstanceID",
        "xmpMM:VersionID",
    ] {
        let open = format!("<{element}>");
        let close = format!("</{element}>");
        blank_between(&mut normalized, open.as_bytes(), close.as_bytes());
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

#[test]
fn renders_report_with_charts() {
    let dir = tempfile::tempdir().unwrap();
    let Some(bytes) = render_sample_pdf(dir.path()) else {
        eprintln!("Skipping renders_report_with_charts: {SKIP_NOTICE}");
        return;
    };
    assert!(bytes.starts_with(b"%PDF"), "output should carry a PDF header");
}

#[test]
fn report_rendering_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let (Some(first), Some(second)) = (render_sample_pdf(dir.path()), render_sample_pdf(dir.path()))
    else {
        eprintln!("Skipping report_rendering_is_deterministic: {SKIP_NOTICE}");
        return;
    };

    assert_eq!(first.len(), second.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&first),
        normalized_hash(&second),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn write_report_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    if !fonts::default_fonts_available() {
        eprintln!("Skipping write_report_creates_parent_directories: {SKIP_NOTICE}");
        return;
    }

    let summary = sample_summary();
    let charts = write_charts(&summary, dir.path()).unwrap();
    let target = dir.path().join("nested").join("sales_report.pdf");
    write_report(&summary, &charts, &target).unwrap();
    assert!(target.is_file());
}

#[test]
fn scrubbing_blanks_creation_dates() {
    let a = scrub_pdf(b"/CreationDate(D:20240101120000)/Title(x)");
    let b = scrub_pdf(b"/CreationDate(D:20251231235959)/Title(x)");
    assert_eq!(a, b);
}
