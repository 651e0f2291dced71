//! Runtime configuration for a pipeline run.

use std::path::{Path, PathBuf};

/// Default location of the sales table, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "Data/sales_data.csv";
/// Default directory for chart images and the PDF report.
pub const DEFAULT_VISUALS_DIR: &str = "visuals";
/// File name of the generated PDF inside the visuals directory.
pub const DEFAULT_REPORT_FILE: &str = "sales_report.pdf";
/// Default location of the email credentials file.
pub const DEFAULT_EMAIL_CONFIG_PATH: &str = "config.json";

/// Header names used to locate the sales columns. Matching is case-sensitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnNames {
    pub date: String,
    pub region: String,
    pub product: String,
    pub quantity: String,
    pub unit_price: String,
    pub total: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "Date".to_owned(),
            region: "Region".to_owned(),
            product: "Product".to_owned(),
            quantity: "Quantity".to_owned(),
            unit_price: "Unit_Price".to_owned(),
            total: "Total".to_owned(),
        }
    }
}

impl ColumnNames {
    /// Columns that must be present in the header row, in reporting order.
    pub fn required(&self) -> [&str; 4] {
        [
            self.quantity.as_str(),
            self.unit_price.as_str(),
            self.region.as_str(),
            self.product.as_str(),
        ]
    }
}

/// SMTP endpoint used for the notification email. The session always uses implicit TLS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_owned(),
            port: 465,
        }
    }
}

/// Paths and settings for one end-to-end run.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    data_path: PathBuf,
    visuals_dir: PathBuf,
    report_path: Option<PathBuf>,
    email_config_path: PathBuf,
    columns: ColumnNames,
    smtp: SmtpSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            visuals_dir: PathBuf::from(DEFAULT_VISUALS_DIR),
            report_path: None,
            email_config_path: PathBuf::from(DEFAULT_EMAIL_CONFIG_PATH),
            columns: ColumnNames::default(),
            smtp: SmtpSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with the default relative paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sales table that is loaded and overwritten with the cleaned rows.
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Sets the directory receiving chart images (and the report unless overridden).
    pub fn with_visuals_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.visuals_dir = dir.into();
        self
    }

    /// Overrides the PDF output path.
    pub fn with_report_path(mut self, path: impl Into<Option<PathBuf>>) -> Self {
        self.report_path = path.into();
        self
    }

    /// Sets the JSON file holding the email credentials.
    pub fn with_email_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.email_config_path = path.into();
        self
    }

    /// Sets the header names used to locate columns.
    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    /// Sets the SMTP endpoint.
    pub fn with_smtp(mut self, smtp: SmtpSettings) -> Self {
        self.smtp = smtp;
        self
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn visuals_dir(&self) -> &Path {
        &self.visuals_dir
    }

    /// Returns the PDF path, defaulting to `sales_report.pdf` in the visuals directory.
    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .clone()
            .unwrap_or_else(|| self.visuals_dir.join(DEFAULT_REPORT_FILE))
    }

    pub fn email_config_path(&self) -> &Path {
        &self.email_config_path
    }

    pub fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    pub fn smtp(&self) -> &SmtpSettings {
        &self.smtp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_defaults_into_visuals_dir() {
        let config = PipelineConfig::new().with_visuals_dir("out");
        assert_eq!(config.report_path(), PathBuf::from("out/sales_report.pdf"));

        let config = config.with_report_path(Some(PathBuf::from("elsewhere.pdf")));
        assert_eq!(config.report_path(), PathBuf::from("elsewhere.pdf"));
    }

    #[test]
    fn required_columns_follow_reporting_order() {
        let columns = ColumnNames::default();
        assert_eq!(
            columns.required(),
            ["Quantity", "Unit_Price", "Region", "Product"]
        );
    }
}
