pub mod config;
pub mod db;
pub mod models;
pub mod reports;
pub mod seed;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::db::Session;
use crate::reports::{run_named_report, ReportError, REPORTS};

/// Command line accepted by the `hospital-records` binary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Parser)]
#[command(name = "hospital-records", version, about = "Hospital records store and reports")]
pub struct Invocation {
    /// Load the demonstration data set before reporting.
    #[arg(long)]
    pub seed: bool,

    /// Run a single report; every report is printed when omitted.
    #[arg(long, value_name = "NAME")]
    pub report: Option<String>,

    /// Arguments for the selected report.
    #[arg(value_name = "ARGS", requires = "report")]
    pub args: Vec<String>,
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> Result<(), ReportError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let invocation = Invocation::parse();
    let session = Session::from_config();
    tracing::info!(path = %session.db_path().display(), "Using database");

    session.with_connection(|conn| -> Result<(), ReportError> {
        if invocation.seed {
            seed::populate_all(conn)?;
        }

        let today = chrono::Local::now().date_naive();
        match &invocation.report {
            Some(name) => {
                let args: Vec<&str> = invocation.args.iter().map(String::as_str).collect();
                let value = run_named_report(conn, name, &args, today)?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            None => {
                for report in REPORTS {
                    let value = run_named_report(conn, report.name, report.defaults, today)?;
                    println!("== {} {}", report.name, report.defaults.join(" "));
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
            }
        }
        Ok(())
    })
}
