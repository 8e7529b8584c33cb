mod application;
mod domain;
mod infrastructure;
mod presentation;

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

use crate::infrastructure::http_client::HyperHttpClient;
use crate::infrastructure::output::Renderer;
use crate::infrastructure::{config, logging};
use crate::presentation::cli::{Cli, expand_bare_url};

/// htp: HTTP client that remembers your API
///
/// Stores a base URL and the token handed out by a login endpoint, then
/// replays them on every request. JSON responses are pretty-printed, can be
/// narrowed down to a few fields and colored with `HTP_COL=1`.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(expand_bare_url(std::env::args().collect()));
    logging::init(cli.verbose);

    let color = config::color_enabled();
    colored::control::set_override(color);
    let renderer = Renderer::new(color);

    let request_service = match HyperHttpClient::new() {
        Ok(client) => client.create_request_service(),
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            return ExitCode::FAILURE;
        }
    };

    match cli.run(&request_service, &renderer).await {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("{}", format!("{err:#}").red());
            ExitCode::FAILURE
        }
    }
}
