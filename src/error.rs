//! Error types shared across the pipeline stages.
//!
//! Loading and schema problems are fatal and surface as [`DatasetError`]. Write-back failures share
//! that type but the pipeline only logs them, as it does for every other error type here.

use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading, validating, or writing back the sales table.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be opened or read.
    #[error("failed to read sales data from {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file was readable but is not a well-formed delimited table.
    #[error("malformed sales data in {}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    /// One or more required columns are absent from the header row.
    #[error("missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },
    /// Writing the cleaned table back to disk failed.
    #[error("failed to write cleaned data to {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Failures while writing synthetic sales data.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("year {0} is outside the supported calendar range")]
    InvalidYear(i32),
    #[error("failed to write synthetic data to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Failures while drawing or saving a bar chart.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to create chart directory {}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write chart image {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Failures while assembling the PDF report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// No usable font family could be located.
    #[error("unable to load report fonts")]
    FontLoad(#[source] genpdf::error::Error),
    /// A chart image could not be decoded or embedded.
    #[error("failed to embed chart image {}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: genpdf::error::Error,
    },
    /// Layout or serialization of the document failed.
    #[error("failed to render PDF document")]
    Render(#[source] genpdf::error::Error),
    /// The rendered bytes could not be written to disk.
    #[error("failed to write PDF report to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures while preparing or sending the notification email.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to read report attachment {}", path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid email address {address:?}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("invalid attachment content type")]
    ContentType(#[source] lettre::message::header::ContentTypeErr),
    #[error("failed to build notification email")]
    Message(#[source] lettre::error::Error),
    #[error("failed to send notification email via {host}")]
    Smtp {
        host: String,
        #[source]
        source: lettre::transport::smtp::Error,
    },
}

/// Joins an error and all of its sources into one line, outermost first.
pub fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_message_lists_every_column() {
        let err = DatasetError::MissingColumns {
            missing: vec!["Quantity".into(), "Region".into()],
        };
        assert_eq!(err.to_string(), "missing required columns: Quantity, Region");
    }

    #[test]
    fn persist_error_names_the_target() {
        let err = DatasetError::Persist {
            path: PathBuf::from("Data/sales_data.csv"),
            source: csv::Error::from(io::Error::new(io::ErrorKind::Other, "disk full")),
        };
        assert_eq!(
            error_chain(&err),
            "failed to write cleaned data to Data/sales_data.csv: disk full"
        );
    }

    #[test]
    fn chain_includes_every_source() {
        let err = DatasetError::Unreadable {
            path: PathBuf::from("Data/sales_data.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            error_chain(&err),
            "failed to read sales data from Data/sales_data.csv: no such file"
        );
    }
}
