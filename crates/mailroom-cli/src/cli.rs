//! Argument parsing, context wiring, and command dispatch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mailroom_api_models::RecordId;
use mailroom_dashboard::config::DEFAULT_UNSUBSCRIBE_BASE;
use mailroom_dashboard::{Dashboard, DashboardConfig};
use mailroom_telemetry::{LogFormat, LoggingConfig, init_logging};
use reqwest::Client;
use url::Url;
use uuid::Uuid;

use crate::client::{CliError, CliResult, HttpTransport, build_http_client, parse_url};
use crate::commands::{recipients, session, templates};
use crate::storage::FileStorage;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "http://127.0.0.1:5018/api";
const DEFAULT_STATE_DIR: &str = ".mailroom";
const DEFAULT_CLI_LOG_LEVEL: &str = "warn";

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    init_telemetry(&cli);
    let trace_id = Uuid::new_v4().to_string();
    tracing::debug!(trace_id = %trace_id, "starting command");

    let mut ctx = match AppContext::from_cli(&cli, &trace_id) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    match dispatch(cli.command, &mut ctx).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn init_telemetry(cli: &Cli) {
    let format = match cli.log_format.as_deref().unwrap_or("auto").parse::<LogFormat>() {
        Ok(format) => format,
        Err(err) => {
            eprintln!("warning: {err}; using the default log format");
            LogFormat::infer()
        }
    };
    let config = LoggingConfig {
        level: &cli.log_level,
        format,
        build_sha: env!("CARGO_PKG_VERSION"),
    };
    if let Err(err) = init_logging(&config) {
        eprintln!("warning: logging disabled: {err}");
    }
}

async fn dispatch(command: Command, ctx: &mut AppContext) -> CliResult<()> {
    match command {
        Command::Login(args) => session::handle_login(ctx, args),
        Command::Logout => session::handle_logout(ctx),
        Command::Signup(args) => session::handle_signup(ctx, args),
        Command::Email(email) => match email {
            EmailCommand::Ls(args) => recipients::handle_ls(ctx, args).await,
            EmailCommand::Show(args) => recipients::handle_show(ctx, args).await,
            EmailCommand::Add(args) => recipients::handle_add(ctx, args).await,
            EmailCommand::Edit(args) => recipients::handle_edit(ctx, args).await,
            EmailCommand::Rm(args) => recipients::handle_rm(ctx, args).await,
            EmailCommand::Restore(args) => recipients::handle_restore(ctx, args).await,
            EmailCommand::Import(args) => recipients::handle_import(ctx, args).await,
        },
        Command::Template(template) => match template {
            TemplateCommand::Ls(args) => templates::handle_ls(ctx, args).await,
            TemplateCommand::Show(args) => templates::handle_show(ctx, args).await,
            TemplateCommand::Add(args) => templates::handle_add(ctx, args).await,
            TemplateCommand::Edit(args) => templates::handle_edit(ctx, args).await,
            TemplateCommand::Rm(args) => templates::handle_rm(ctx, args).await,
            TemplateCommand::Restore(args) => templates::handle_restore(ctx, args).await,
            TemplateCommand::Send(args) => templates::handle_send(ctx, args).await,
        },
    }
}

#[derive(Parser)]
#[command(name = "mailroom", about = "Manage email recipients and templates")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "MAILROOM_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: Url,
    #[arg(
        long,
        global = true,
        env = "MAILROOM_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout: u64,
    #[arg(
        long,
        global = true,
        env = "MAILROOM_STATE_DIR",
        default_value = DEFAULT_STATE_DIR,
        help = "Directory holding the durable session state"
    )]
    state_dir: PathBuf,
    #[arg(
        long,
        global = true,
        env = "MAILROOM_UNSUBSCRIBE_BASE",
        default_value = DEFAULT_UNSUBSCRIBE_BASE,
        help = "Base of the unsubscribe link appended to saved recipient bodies"
    )]
    unsubscribe_base: String,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render records"
    )]
    output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "MAILROOM_LOG_LEVEL",
        default_value = DEFAULT_CLI_LOG_LEVEL
    )]
    log_level: String,
    #[arg(
        long,
        global = true,
        env = "MAILROOM_LOG_FORMAT",
        help = "Log format: pretty, json, or auto"
    )]
    log_format: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a session.
    Login(LoginArgs),
    /// End the session and clear local state.
    Logout,
    /// Validate signup details.
    Signup(SignupArgs),
    /// Manage recipients.
    #[command(subcommand)]
    Email(EmailCommand),
    /// Manage templates.
    #[command(subcommand)]
    Template(TemplateCommand),
}

#[derive(Subcommand)]
enum EmailCommand {
    /// List recipients.
    Ls(ListArgs),
    /// Show one recipient with its full body.
    Show(IdArgs),
    /// Create a recipient.
    Add(EmailAddArgs),
    /// Edit a recipient.
    Edit(EmailEditArgs),
    /// Soft-delete a recipient.
    Rm(RemoveArgs),
    /// Restore a soft-deleted recipient.
    Restore(IdArgs),
    /// Import recipients from a spreadsheet.
    Import(ImportArgs),
}

#[derive(Subcommand)]
enum TemplateCommand {
    /// List templates.
    Ls(ListArgs),
    /// Show one template.
    Show(IdArgs),
    /// Create a template.
    Add(TemplateAddArgs),
    /// Edit a template.
    Edit(TemplateEditArgs),
    /// Soft-delete a template.
    Rm(RemoveArgs),
    /// Restore a soft-deleted template.
    Restore(IdArgs),
    /// Send a template to recipients with the unsubscribe footer.
    Send(IdArgs),
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(long, env = "MAILROOM_EMAIL")]
    pub(crate) email: Option<String>,
    #[arg(long, env = "MAILROOM_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Args)]
pub(crate) struct SignupArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) password: Option<String>,
    #[arg(long)]
    pub(crate) confirm: Option<String>,
}

#[derive(Args, Default)]
pub(crate) struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
    #[arg(long, help = "Rows per page: 5, 10, 25, 50, or 100")]
    pub(crate) page_size: Option<u32>,
    #[arg(long, help = "Status filter by name or code")]
    pub(crate) status: Option<String>,
}

#[derive(Args)]
pub(crate) struct IdArgs {
    #[arg(help = "Record identifier")]
    pub(crate) id: RecordId,
}

#[derive(Args)]
pub(crate) struct RemoveArgs {
    #[arg(help = "Record identifier")]
    pub(crate) id: RecordId,
    #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
    pub(crate) yes: bool,
}

#[derive(Args)]
pub(crate) struct EmailAddArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, help = "HTML body file")]
    pub(crate) body_file: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct EmailEditArgs {
    #[arg(help = "Record identifier")]
    pub(crate) id: RecordId,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(long, help = "HTML body file")]
    pub(crate) body_file: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct ImportArgs {
    #[arg(help = "Spreadsheet (.xlsx or .xls)")]
    pub(crate) file: PathBuf,
}

#[derive(Args)]
pub(crate) struct TemplateAddArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) subject: String,
    #[arg(long, help = "HTML content file")]
    pub(crate) content_file: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct TemplateEditArgs {
    #[arg(help = "Record identifier")]
    pub(crate) id: RecordId,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) subject: Option<String>,
    #[arg(long, help = "HTML content file")]
    pub(crate) content_file: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) dashboard: Dashboard,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    fn from_cli(cli: &Cli, trace_id: &str) -> CliResult<Self> {
        let client = build_http_client(cli.timeout, trace_id)?;
        Self::new(
            client,
            cli.api_url.clone(),
            &cli.state_dir,
            &cli.unsubscribe_base,
            cli.output,
        )
    }

    /// Wire the dashboard to an HTTP transport and file-backed session state.
    pub(crate) fn new(
        client: Client,
        api_url: Url,
        state_dir: &Path,
        unsubscribe_base: &str,
        output: OutputFormat,
    ) -> CliResult<Self> {
        let config = DashboardConfig {
            unsubscribe_base: unsubscribe_base.to_string(),
            ..DashboardConfig::for_api_base(api_url.as_str())
        };
        let transport = Arc::new(HttpTransport::new(client, api_url));
        let storage = Arc::new(FileStorage::new(state_dir));
        let dashboard = Dashboard::new(&config, transport, storage).map_err(CliError::failure)?;
        Ok(Self { dashboard, output })
    }
}
