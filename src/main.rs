#![forbid(unsafe_code)]
//! Acquia CLI

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use console::style;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use acli::commands::{
    execute_aliases_download, execute_drush, execute_link, execute_log_download, execute_login,
    execute_logout, execute_telemetry, DrushOptions, LinkOptions, LogDownloadOptions, LoginOptions,
};
use acli::telemetry::invocation_properties;
use acli::{project, CommandBase, CommandEvent, HostEnvironment, OsInfo, Settings, Telemetry};

#[derive(Parser)]
#[command(name = "acli")]
#[command(about = "Acquia CLI - command-line client for the Acquia Cloud API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Do not ask any interactive question
    #[arg(short = 'n', long, global = true)]
    no_interaction: bool,

    /// Cloud API credentials file
    #[arg(long, env = "ACLI_CLOUD_CONFIG", global = true, hide = true)]
    cloud_config: Option<PathBuf>,

    /// acli datastore file
    #[arg(long, env = "ACLI_CONFIG", global = true, hide = true)]
    acli_config: Option<PathBuf>,

    /// Cloud API base URI
    #[arg(long, env = "ACLI_CLOUD_API_BASE_URI", global = true, hide = true)]
    cloud_api_base_uri: Option<String>,

    /// Accounts (OAuth) base URI
    #[arg(long, env = "ACLI_ACCOUNTS_URI", global = true, hide = true)]
    accounts_uri: Option<String>,

    /// Directory downloads are staged in
    #[arg(long, env = "ACLI_STAGING_DIR", global = true, hide = true)]
    staging_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register your Cloud API key and secret to use API functionality
    #[command(name = "auth:login")]
    AuthLogin {
        /// Your Cloud API key
        #[arg(short, long)]
        key: Option<String>,

        /// Your Cloud API secret
        #[arg(short, long)]
        secret: Option<String>,
    },

    /// Remove your Cloud API key and secret from this machine
    #[command(name = "auth:logout")]
    AuthLogout,

    /// Toggle anonymous sharing of usage and performance data
    Telemetry,

    /// Associate your project with a Cloud application
    Link {
        #[arg(long)]
        cloud_app_uuid: Option<String>,
    },

    /// Download drush aliases for Acquia Cloud environments
    #[command(name = "remote:aliases:download")]
    RemoteAliasesDownload,

    /// Run a drush command remotely on a Cloud environment
    #[command(name = "remote:drush")]
    RemoteDrush {
        #[arg(long)]
        cloud_app_uuid: Option<String>,

        /// Drush command and arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        drush_args: Vec<String>,
    },

    /// Download logs from a Cloud environment
    #[command(name = "log:download")]
    LogDownload {
        #[arg(long)]
        cloud_app_uuid: Option<String>,

        /// Directory to write the logs to
        #[arg(short, long, default_value = ".")]
        destination: PathBuf,
    },
}

impl Commands {
    fn requires_authentication(&self) -> bool {
        !matches!(self, Commands::AuthLogin { .. })
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands, base: &mut CommandBase) -> anyhow::Result<i32> {
    base.initialize(command.requires_authentication())?;

    match command {
        Commands::AuthLogin { key, secret } => execute_login(base, LoginOptions { key, secret }),
        Commands::AuthLogout => execute_logout(base),
        Commands::Telemetry => execute_telemetry(base),
        Commands::Link { cloud_app_uuid } => execute_link(base, LinkOptions { cloud_app_uuid }),
        Commands::RemoteAliasesDownload => execute_aliases_download(base),
        Commands::RemoteDrush {
            cloud_app_uuid,
            drush_args,
        } => execute_drush(
            base,
            DrushOptions {
                cloud_app_uuid,
                drush_args,
            },
        ),
        Commands::LogDownload {
            cloud_app_uuid,
            destination,
        } => execute_log_download(
            base,
            LogDownloadOptions {
                cloud_app_uuid,
                destination,
            },
        ),
    }
}

/// Exit code for a failed parse, `None` for help and version output
fn parse_failure_code(e: &clap::Error) -> Option<i32> {
    e.use_stderr().then(|| e.exit_code())
}

/// Queue and send the "Ran command" event when the user opted in
fn report_run(
    settings: &Settings,
    exit_code: i32,
    arguments: Map<String, Value>,
    options: Map<String, Value>,
) {
    match Telemetry::from_store(&settings.acli_datastore()) {
        Ok(mut telemetry) if telemetry.is_enabled() => {
            let event = CommandEvent::new(exit_code, arguments, options, &OsInfo::detect());
            telemetry.queue_event("Ran command", &event);
            telemetry.flush();
        }
        Ok(_) => {}
        Err(e) => tracing::debug!("Telemetry unavailable: {}", e),
    }
}

fn exit_after_parse_error(e: clap::Error) -> ! {
    let Some(exit_code) = parse_failure_code(&e) else {
        e.exit()
    };
    let _ = e.print();

    // The datastore overrides still apply when the rest of the line is bad
    let settings = Settings::with_overrides(
        std::env::var_os("ACLI_CLOUD_CONFIG").map(PathBuf::from),
        std::env::var_os("ACLI_CONFIG").map(PathBuf::from),
        None,
        None,
    );
    let mut arguments = Map::new();
    if let Some(name) = std::env::args().skip(1).find(|a| !a.starts_with('-')) {
        arguments.insert("command".to_string(), Value::String(name));
    }
    report_run(&settings, exit_code, arguments, Map::new());
    std::process::exit(exit_code);
}

fn main() {
    let matches = match Cli::command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => exit_after_parse_error(e),
    };
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => exit_after_parse_error(e),
    };

    init_tracing(cli.verbose);

    let mut settings = Settings::with_overrides(
        cli.cloud_config,
        cli.acli_config,
        cli.cloud_api_base_uri,
        cli.accounts_uri,
    );
    if let Some(dir) = cli.staging_dir {
        settings.staging_dir = dir;
    }
    let interactive = !cli.no_interaction && std::io::stdin().is_terminal();
    let mut base = CommandBase::new(
        settings.clone(),
        HostEnvironment::from_env(),
        project::current_repo_root(),
        interactive,
    );

    let exit_code = match run(cli.command, &mut base) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", style("✗").red(), e);
            1
        }
    };

    // Analytics never change the exit code
    let (arguments, options) = invocation_properties(&Cli::command(), &matches);
    report_run(&settings, exit_code, arguments, options);

    std::process::exit(exit_code);
}
