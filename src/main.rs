use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser as _;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use requirements_lint::config::{DEFAULT_GALAXY_URL, LintConfig, OutputFormat};
use requirements_lint::lint::Resolver;
use requirements_lint::parser::{LoadError, RequirementsParser, load_roles};
use requirements_lint::pipeline;
use requirements_lint::report::renderer_for;

/// Exit code for unreadable manifests and invalid arguments
const EXIT_USAGE: u8 = 2;

/// Exit code after Ctrl-C
const EXIT_INTERRUPTED: u8 = 130;

#[derive(clap::Parser)]
#[command(name = "requirements-lint")]
#[command(version, about = "Checks Ansible role requirements for outdated versions")]
struct Cli {
    /// requirements.yml or meta/main.yml to check
    file: PathBuf,

    /// Ansible Galaxy base URL
    #[arg(long, env = "REQUIREMENTS_LINT_GALAXY_URL", default_value = DEFAULT_GALAXY_URL)]
    galaxy: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Also report roles that are up to date
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> LintConfig {
        LintConfig {
            galaxy_url: self.galaxy.clone(),
            format: self.output,
            verbose: self.verbose,
            color: !self.no_color && console::colors_enabled(),
        }
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .with_context(|| format!("invalid log level {}", cli.log_level))?;

    let Some(log_file) = &cli.log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        return Ok(None);
    };

    let directory = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .with_context(|| format!("invalid log file {}", log_file.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn describe_load_error(path: &Path, err: &LoadError) -> String {
    match err.io_kind() {
        Some(io::ErrorKind::NotFound) => {
            format!("unable to open {}: the file does not exist", path.display())
        }
        Some(io::ErrorKind::PermissionDenied) => format!(
            "unable to open {}: please check file permissions",
            path.display()
        ),
        _ => format!("unable to parse the requirements file: {}", err),
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.config();

    let roles = match load_roles(&RequirementsParser::new(), &cli.file) {
        Ok(roles) => roles,
        Err(e) => {
            error!("Loading {} failed: {}", cli.file.display(), e);
            eprintln!("{}", describe_load_error(&cli.file, &e));
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };
    info!("Loaded {} roles from {}", roles.len(), cli.file.display());

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, cancelling");
                cancel.cancel();
            }
        })
    };

    let mut renderer = renderer_for(&config);
    let mut stdout = io::stdout();
    let summary = pipeline::run(
        roles,
        Resolver::from_config(&config),
        renderer.as_mut(),
        &mut stdout,
        cancel.clone(),
    )
    .await
    .context("writing results")?;
    interrupt.abort();

    info!(
        "{} roles checked: {} info, {} warnings, {} errors",
        summary.total(),
        summary.info,
        summary.warning,
        summary.error
    );

    if cancel.is_cancelled() {
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }
    Ok(ExitCode::from(summary.exit_code() as u8))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match init_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let result = pipeline::block_on(run(cli))
        .context("starting the async runtime")
        .and_then(|result| result);

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
