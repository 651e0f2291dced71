//! Font lookup for the PDF report.
//!
//! Body text uses Roboto and the aligned grouping blocks use Roboto Mono. Both families must sit
//! in the same directory.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{self, Font, FontData, FontFamily};
use genpdf::Document;
use log::debug;

/// Name of the proportional family used for body text.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Name of the fixed-width family used for preformatted blocks.
pub const MONOSPACE_FONT_FAMILY_NAME: &str = "RobotoMono";

/// Environment variable that points at a directory holding the font files.
pub const FONTS_DIR_ENV: &str = "SALES_REPORT_FONTS_DIR";

const FONT_FAMILIES: &[&str] = &[DEFAULT_FONT_FAMILY_NAME, MONOSPACE_FONT_FAMILY_NAME];
const FONT_STYLES: &[&str] = &["Regular", "Bold", "Italic", "BoldItalic"];

/// File names `genpdf::fonts::from_files` expects for every family.
fn font_files() -> Vec<String> {
    FONT_FAMILIES
        .iter()
        .flat_map(|family| {
            FONT_STYLES
                .iter()
                .map(move |style| format!("{family}-{style}.ttf"))
        })
        .collect()
}

/// Directory the fonts are expected in when running from a source checkout.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env::var_os(FONTS_DIR_ENV) {
        if !path.is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }

    if let Some(bin_dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(bin_dir.join("assets/fonts"));
    }

    let manifest_candidate = bundled_fonts_source_dir();
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn missing_font_files(path: &Path) -> Vec<String> {
    font_files()
        .into_iter()
        .filter(|name| !path.join(name).is_file())
        .collect()
}

fn resolve_font_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        if !candidate.is_dir() {
            attempts.push(format!("{} (directory missing)", candidate.display()));
            continue;
        }

        let missing = missing_font_files(&candidate);
        if missing.is_empty() {
            debug!("Using report fonts from {}", candidate.display());
            return Ok(candidate);
        }
        attempts.push(format!(
            "{} (missing files [{}])",
            candidate.display(),
            missing.join(", ")
        ));
    }

    Err(Error::new(
        format!(
            "Unable to locate report fonts. Checked: {}. Set {} to a directory containing {}.",
            attempts.join(", "),
            FONTS_DIR_ENV,
            font_files().join(", ")
        ),
        io::Error::new(io::ErrorKind::NotFound, "report fonts not found"),
    ))
}

fn load_family(name: &str) -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory()?;

    fonts::from_files(&directory, name, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                name,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

/// Loads the Roboto family used as the document default.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    load_family(DEFAULT_FONT_FAMILY_NAME)
}

/// Adds the Roboto Mono family to `document` and returns the cached fonts for use in styles.
pub fn install_monospace_fonts(document: &mut Document) -> Result<FontFamily<Font>, Error> {
    let family = load_family(MONOSPACE_FONT_FAMILY_NAME)?;
    Ok(document.add_font_family(family))
}

/// Indicates whether both report font families can be found.
pub fn default_fonts_available() -> bool {
    resolve_font_directory().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_reports_every_font_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = missing_font_files(dir.path());
        assert_eq!(missing.len(), 8);
        assert!(missing.contains(&"Roboto-BoldItalic.ttf".to_string()));
        assert!(missing.contains(&"RobotoMono-Regular.ttf".to_string()));
    }

    #[test]
    fn a_partial_family_is_still_reported() {
        let dir = tempfile::tempdir().unwrap();
        for style in FONT_STYLES {
            std::fs::write(dir.path().join(format!("Roboto-{style}.ttf")), b"").unwrap();
        }
        let missing = missing_font_files(dir.path());
        assert_eq!(missing.len(), 4);
        assert!(missing.iter().all(|name| name.starts_with("RobotoMono-")));
    }

    #[test]
    fn manifest_directory_is_always_a_candidate() {
        assert!(font_directory_candidates().contains(&bundled_fonts_source_dir()));
    }
}
