use crate::infra::open_store;
use clap::{Args, ValueEnum};
use job_tracker::applications::ApplicationService;
use job_tracker::config::AppConfig;
use job_tracker::error::AppError;
use job_tracker::export::ExportFormat;
use job_tracker::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct MigrateArgs {
    /// Override the configured SQLite database path
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Destination file
    #[arg(long, short)]
    pub(crate) output: PathBuf,
    /// Spreadsheet format to write
    #[arg(long, value_enum, default_value_t = FormatArg::Xlsx)]
    pub(crate) format: FormatArg,
    /// Override the configured SQLite database path
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FormatArg {
    Xlsx,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Xlsx => ExportFormat::Xlsx,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

pub(crate) fn run_migrate(args: MigrateArgs) -> Result<(), AppError> {
    let config = load_config(args.database)?;
    let store = open_store(&config.database.path)?;
    info!(path = %config.database.path.display(), "schema up to date");
    drop(store);
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = load_config(args.database)?;
    let store = open_store(&config.database.path)?;
    let service = ApplicationService::new(Arc::new(store));

    let export = service.export(args.format.into())?;
    std::fs::write(&args.output, &export.bytes)?;
    info!(
        rows = export.rows,
        output = %args.output.display(),
        "export written"
    );
    Ok(())
}

fn load_config(database: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = database {
        config.database.path = path;
    }
    telemetry::init(&config.telemetry)?;
    Ok(config)
}
