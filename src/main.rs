use std::sync::Arc;

use clap::Parser;
use sunmark::cli::{self, Command, HELP};
use sunmark::config::{ClientConfig, ConfigError};
use sunmark::controller::{ChatController, SendOutcome, SendRejection};
use sunmark::net::api::HttpChatApi;
use sunmark::net::error::ApiError;
use sunmark::pages::{chat, login};
use sunmark::util::storage::{FileTokenStore, MemoryTokenStore, TokenStore};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("could not build http client: {0}")]
    Api(#[from] ApiError),
    #[error("terminal io failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "sunmark", about = "Terminal client for the Sunmark school assistant")]
struct Cli {
    #[arg(long, env = "SUNMARK_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "SUNMARK_TOKEN_PATH")]
    token_path: Option<String>,

    #[arg(long, env = "SUNMARK_REQUEST_TIMEOUT_SECS")]
    timeout_secs: Option<String>,

    /// Keep the token in memory only; nothing is written to disk.
    #[arg(long)]
    no_persist: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sunmark=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> Result<(), CliError> {
    let home = std::env::var("HOME").ok();
    let config = ClientConfig::from_parts(
        args.base_url.as_deref(),
        args.token_path.as_deref(),
        args.timeout_secs.as_deref(),
        home.as_deref(),
    )?;
    tracing::info!(
        base_url = %config.base_url,
        token_path = %config.token_path.display(),
        "starting"
    );

    let api = HttpChatApi::new(&config.base_url, config.request_timeout)?;
    let store: Arc<dyn TokenStore> = if args.no_persist {
        Arc::new(MemoryTokenStore::default())
    } else {
        Arc::new(FileTokenStore::new(config.token_path))
    };
    let controller = ChatController::new(Arc::new(api), store);
    controller.restore().await;

    let mut form = login::AuthForm::default();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_view(&mut stdout, &controller, &form).await?;
    while let Some(line) = lines.next_line().await? {
        let command = match cli::parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                write_out(&mut stdout, &format!("{err}\n")).await?;
                continue;
            }
        };
        if !dispatch(&mut stdout, &controller, &mut form, command).await? {
            break;
        }
    }
    stdout.flush().await?;
    Ok(())
}

/// Run one command. Returns `false` when the user asked to quit.
async fn dispatch(
    out: &mut tokio::io::Stdout,
    controller: &ChatController,
    form: &mut login::AuthForm,
    command: Command,
) -> Result<bool, CliError> {
    let authenticated = controller.snapshot().auth.is_authenticated();
    match command {
        Command::Empty => return Ok(true),
        Command::Quit => return Ok(false),
        Command::Help => {
            write_out(out, &format!("{HELP}\n")).await?;
            return Ok(true);
        }
        Command::Login { email, password } => {
            *form = login::AuthForm::login(&email, &password);
            controller.submit_auth(form).await;
        }
        Command::Register { email, password, confirm } => {
            *form = login::AuthForm::register(&email, &password, &confirm);
            controller.submit_auth(form).await;
        }
        Command::ToggleMode => {
            form.toggle_mode();
            controller.clear_error();
        }
        Command::Logout => controller.logout(),
        _ if !authenticated => {
            write_out(out, "Sign in first (/login or /register).\n").await?;
            return Ok(true);
        }
        Command::NewSession => controller.new_session().await,
        Command::Sessions => {
            let sidebar = chat::render_sidebar(&controller.snapshot().chat);
            write_out(out, &sidebar).await?;
            return Ok(true);
        }
        Command::Open(id) => controller.select_session(id).await,
        Command::Send(text) => {
            controller.set_draft(&text);
            match controller.send().await {
                SendOutcome::Rejected(SendRejection::AlreadySending) => {
                    write_out(out, "Still waiting for the previous reply.\n").await?;
                }
                SendOutcome::Rejected(reason) => tracing::debug!(?reason, "send rejected"),
                SendOutcome::Failed(err) | SendOutcome::RefreshFailed(err) => {
                    tracing::debug!(error = %err, "send did not complete cleanly");
                }
                SendOutcome::Delivered | SendOutcome::NoReply | SendOutcome::SessionEnded => {}
            }
        }
    }
    print_view(out, controller, form).await?;
    Ok(true)
}

async fn print_view(
    out: &mut tokio::io::Stdout,
    controller: &ChatController,
    form: &login::AuthForm,
) -> Result<(), CliError> {
    let state = controller.snapshot();
    let view = if state.auth.is_authenticated() {
        chat::render(&state)
    } else {
        login::render(form, &state)
    };
    write_out(out, &view).await
}

async fn write_out(out: &mut tokio::io::Stdout, text: &str) -> Result<(), CliError> {
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}
