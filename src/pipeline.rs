//! End-to-end run: load, clean, persist, summarise, chart, report, notify.

use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::chart::{self, ChartPaths};
use crate::clean::{self, CleanReport};
use crate::config::PipelineConfig;
use crate::error::{error_chain, DatasetError, NotifyError};
use crate::notify::{self, SkipReason};
use crate::report;
use crate::storage;
use crate::summary::Summary;
use crate::table::Table;

/// Result of the notification stage.
#[derive(Debug)]
pub enum Notification {
    Sent,
    Skipped(SkipReason),
    Failed(NotifyError),
}

impl Notification {
    pub fn was_sent(&self) -> bool {
        matches!(self, Notification::Sent)
    }
}

/// What a completed run produced. Recoverable stage failures show up as `false` or `None`.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub clean: CleanReport,
    pub summary: Summary,
    /// Whether the cleaned table was written back to the data file.
    pub persisted: bool,
    pub charts: Option<ChartPaths>,
    pub report: Option<PathBuf>,
    pub notification: Notification,
}

/// Runs every stage in order.
///
/// Only loading and schema validation can fail the run; every later stage logs its error and the
/// run carries on with whatever it can still do.
pub fn run(config: &PipelineConfig) -> Result<PipelineOutcome, DatasetError> {
    let columns = config.columns();
    let mut table = storage::load_table(config.data_path(), columns)?;
    let clean = clean::clean_table(&mut table, columns)?;

    let persisted = persist_stage(&table, config.data_path());

    let summary = Summary::from_table(&table, columns);
    info!("Total Sales: {}", report::format_amount(summary.total_sales()));
    match summary.average_sale() {
        Some(average) => info!("Average Sale Per Transaction: {:.2}", average),
        None => warn!("No transactions left after cleaning; average sale is undefined"),
    }

    let charts = match chart::write_charts(&summary, config.visuals_dir()) {
        Ok(paths) => Some(paths),
        Err(err) => {
            error!("{}", error_chain(&err));
            None
        }
    };

    let report = charts.as_ref().and_then(|charts| {
        let path = config.report_path();
        match report::write_report(&summary, charts, &path) {
            Ok(()) => Some(path),
            Err(err) => {
                error!("{}", error_chain(&err));
                None
            }
        }
    });
    if charts.is_none() {
        warn!("Skipping PDF report because the charts are unavailable");
    }

    let notification = notify_stage(config, report.as_ref());

    Ok(PipelineOutcome {
        clean,
        summary,
        persisted,
        charts,
        report,
        notification,
    })
}

fn persist_stage(table: &Table, path: &Path) -> bool {
    match storage::persist_table(table, path) {
        Ok(()) => {
            info!("Cleaned data saved to {}", path.display());
            true
        }
        Err(err) => {
            error!("{}", error_chain(&err));
            false
        }
    }
}

fn notify_stage(config: &PipelineConfig, report: Option<&PathBuf>) -> Notification {
    let email = match notify::load_email_config(config.email_config_path()) {
        Ok(email) => email,
        Err(reason) => {
            warn!("Skipping email: {}", reason);
            return Notification::Skipped(reason);
        }
    };

    let Some(report) = report else {
        warn!("Skipping email: {}", SkipReason::NoReport);
        return Notification::Skipped(SkipReason::NoReport);
    };

    match notify::send_report(&email, report, config.smtp()) {
        Ok(()) => Notification::Sent,
        Err(err) => {
            error!("Error sending email: {}", error_chain(&err));
            Notification::Failed(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn failed_write_back_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("sales_data.csv");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "x").unwrap();

        let table = storage::read_table("Region\nPunjab\n".as_bytes()).unwrap();
        assert!(!persist_stage(&table, &target));
        assert!(target.is_dir());
    }

    #[test]
    fn missing_email_config_skips_before_anything_is_sent() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::new().with_email_config_path(dir.path().join("config.json"));

        let notification = notify_stage(&config, None);
        assert!(matches!(
            notification,
            Notification::Skipped(SkipReason::MissingConfig(_))
        ));
        assert!(!notification.was_sent());
    }

    #[test]
    fn complete_config_without_report_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"sender_email":"a@example.com","app_password":"x","receiver_email":"b@example.com"}"#,
        )
        .unwrap();
        let config = PipelineConfig::new().with_email_config_path(path);

        assert!(matches!(
            notify_stage(&config, None),
            Notification::Skipped(SkipReason::NoReport)
        ));
    }
}
