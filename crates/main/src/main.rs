use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::info;

use sales_report::config::{
    PipelineConfig, SmtpSettings, DEFAULT_DATA_PATH, DEFAULT_EMAIL_CONFIG_PATH,
    DEFAULT_VISUALS_DIR,
};
use sales_report::generator;
use sales_report::pipeline;

/// Cleans a sales CSV, summarises it, and produces a PDF report.
///
/// Report fonts are looked up under `assets/fonts` next to the binary or in the crate
/// directory, or in the directory named by `SALES_REPORT_FONTS_DIR`.
#[derive(Parser)]
#[command(author, version, about = "Sales data cleaning and PDF reporting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the data file, write charts and the PDF report, then email it if configured.
    Run(RunArgs),

    /// Write a synthetic sales data file.
    #[command(name = "generate", aliases = ["gen"])]
    Generate(GenerateArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Sales CSV to clean; it is overwritten with the cleaned rows.
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Directory receiving the chart images.
    #[arg(long, default_value = DEFAULT_VISUALS_DIR)]
    visuals_dir: PathBuf,

    /// PDF output path. Defaults to `sales_report.pdf` inside the visuals directory.
    #[arg(long)]
    report: Option<PathBuf>,

    /// JSON file with `sender_email`, `app_password`, and `receiver_email`.
    #[arg(long, default_value = DEFAULT_EMAIL_CONFIG_PATH)]
    email_config: PathBuf,

    #[arg(long, default_value = "smtp.gmail.com")]
    smtp_host: String,

    #[arg(long, default_value_t = 465)]
    smtp_port: u16,
}

#[derive(Args)]
struct GenerateArgs {
    /// Output CSV path.
    #[arg(long, short, default_value = generator::DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Number of rows to generate.
    #[arg(long, default_value_t = generator::DEFAULT_ROW_COUNT)]
    rows: usize,

    /// Calendar year the dates fall in.
    #[arg(long, default_value_t = generator::DEFAULT_YEAR)]
    year: i32,

    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result: Result<(), Box<dyn Error>> = match cli.command {
        Commands::Run(args) => run(args),
        Commands::Generate(args) => {
            generator::generate_file(&args.output, args.rows, args.year, args.seed)
                .map_err(Into::into)
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let config = PipelineConfig::new()
        .with_data_path(args.data)
        .with_visuals_dir(args.visuals_dir)
        .with_report_path(args.report)
        .with_email_config_path(args.email_config)
        .with_smtp(SmtpSettings {
            host: args.smtp_host,
            port: args.smtp_port,
        });

    let outcome = pipeline::run(&config)?;
    info!(
        "Run finished: {} rows kept, report {}, email {}",
        outcome.clean.rows_remaining,
        if outcome.report.is_some() {
            "written"
        } else {
            "not written"
        },
        if outcome.notification.was_sent() {
            "sent"
        } else {
            "not sent"
        }
    );
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
