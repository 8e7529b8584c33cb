use crate::application::resolver::is_bare_url;
use crate::application::services::HttpRequestService;
use crate::domain::entities::{LoginDescriptor, RequestDescriptor};
use crate::infrastructure::config::{ConfigStore, DEFAULT_CONFIG_DIR};
use crate::infrastructure::output::Renderer;
use crate::presentation::docs::USAGE_GUIDE;
use anyhow::{Result, anyhow};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

/// CLI configuration for htp
#[derive(Parser, Debug)]
#[command(
    name = "htp",
    version,
    about = "htp: log in once, then hit your JSON API without retyping URLs and tokens",
    long_about = None
)]
pub struct Cli {
    /// Directory holding the persisted base URL and auth token
    #[arg(long, global = true, env = "HTP_CONFIG_DIR", default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: PathBuf,

    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Persist the base URL that request paths are appended to
    SetBaseUrl(SetBaseUrlArgs),
    /// Log in and persist the token from the Authorization response header
    Login(LoginArgs),
    /// Send a request to <base URL><path> or to --url
    Req(ReqArgs),
    /// Print the usage guide
    Doc,
    /// Print the version
    Version,
}

#[derive(Args, Debug)]
pub struct SetBaseUrlArgs {
    /// Base URL for the API
    #[arg(value_name = "URL")]
    pub value: Option<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub url: Option<String>,
}

impl SetBaseUrlArgs {
    fn chosen(&self) -> Option<&str> {
        self.value
            .as_deref()
            .or(self.base_url.as_deref())
            .or(self.url.as_deref())
    }
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub password: String,

    /// Use this base URL instead of the persisted one
    #[arg(long)]
    pub base_url: Option<String>,

    /// Full login URL; ignores base URL and login path
    #[arg(long)]
    pub url: Option<String>,

    #[arg(long, default_value = "/login")]
    pub login_path: String,
}

#[derive(Args, Debug)]
pub struct ReqArgs {
    /// HTTP method (GET, POST, etc.)
    pub method: String,

    /// API endpoint path appended to the base URL
    pub path: Option<String>,

    /// Use this base URL instead of the persisted one
    #[arg(long)]
    pub base_url: Option<String>,

    /// Full request URL; ignores base URL and path
    #[arg(long)]
    pub url: Option<String>,

    /// Body data as key=value pairs (POST only)
    #[arg(long, num_args = 1.., value_name = "KEY=VALUE")]
    pub data: Option<Vec<String>>,

    /// Comma separated list of fields to extract from the JSON response
    #[arg(long)]
    pub fields: Option<String>,
}

impl From<&ReqArgs> for RequestDescriptor {
    fn from(args: &ReqArgs) -> Self {
        RequestDescriptor {
            method: args.method.clone(),
            direct_url: args.url.clone(),
            override_base_url: args.base_url.clone(),
            path: args.path.clone(),
            data_pairs: args.data.clone(),
            fields: args.fields.clone(),
        }
    }
}

impl From<&LoginArgs> for LoginDescriptor {
    fn from(args: &LoginArgs) -> Self {
        LoginDescriptor {
            username: args.username.clone(),
            password: args.password.clone(),
            direct_url: args.url.clone(),
            override_base_url: args.base_url.clone(),
            login_path: args.login_path.clone(),
        }
    }
}

/// Rewrites `htp <url>` into `htp req GET --url <url>`.
///
/// Only a single bare argument qualifies; anything else is left to clap.
pub fn expand_bare_url(args: Vec<String>) -> Vec<String> {
    match args.as_slice() {
        [program, url] if is_bare_url(url) => vec![
            program.clone(),
            "req".to_string(),
            "GET".to_string(),
            "--url".to_string(),
            url.clone(),
        ],
        _ => args,
    }
}

/// How a command that did not error out finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failure,
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Success => ExitCode::SUCCESS,
            RunStatus::Failure => ExitCode::FAILURE,
        }
    }
}

impl Cli {
    pub async fn run(
        &self,
        request_service: &HttpRequestService,
        renderer: &Renderer,
    ) -> Result<RunStatus> {
        let store = ConfigStore::new(&self.config_dir);
        debug!(config_dir = %store.dir().display(), "using config directory");

        match &self.command {
            Some(Command::SetBaseUrl(args)) => {
                let url = args
                    .chosen()
                    .ok_or_else(|| anyhow!("no base URL given: pass it as URL, --base-url or --url"))?;
                store.save_base_url(url)?;
                println!("Base URL set to: {}", url.cyan());
                Ok(RunStatus::Success)
            }
            Some(Command::Login(args)) => {
                let credentials = store.load()?;
                let updated = request_service
                    .login(&LoginDescriptor::from(args), &credentials)
                    .await?;
                if let Some(token) = &updated.auth_token {
                    store.save_token(token)?;
                }
                println!("{}", "Login successful, token saved.".green());
                Ok(RunStatus::Success)
            }
            Some(Command::Req(args)) => {
                let credentials = store.load()?;
                let descriptor = RequestDescriptor::from(args);
                let outcome = request_service.dispatch(&descriptor, &credentials).await?;
                if renderer.print_outcome(&outcome, descriptor.fields.as_deref())? {
                    Ok(RunStatus::Success)
                } else {
                    Ok(RunStatus::Failure)
                }
            }
            Some(Command::Doc) => {
                println!("{USAGE_GUIDE}");
                Ok(RunStatus::Success)
            }
            Some(Command::Version) => {
                println!("htp {}", env!("CARGO_PKG_VERSION"));
                Ok(RunStatus::Success)
            }
            None => {
                Cli::command().print_help()?;
                Ok(RunStatus::Failure)
            }
        }
    }
}
