use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use adaptive_card_renderer::{
    AdaptiveCard, AdaptiveCardRenderer, RecordingDispatcher, RenderError, RenderedCard,
    UnsupportedElementPolicy,
};
use card_host_config::{HostConfig, HostConfigError};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "card-render")]
#[command(about = "Render Adaptive Cards against a host config and fire their actions", long_about = None)]
struct Cli {
    /// Log at debug level when RUST_LOG is unset.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct CardArgs {
    #[arg(long, value_name = "CARD_JSON")]
    card: PathBuf,
    #[arg(long, value_name = "HOST_CONFIG_JSON")]
    host_config: Option<PathBuf>,
    /// abort, skip or placeholder; defaults to ADAPTIVE_CARD_UNSUPPORTED_POLICY.
    #[arg(long, value_parser = parse_policy)]
    policy: Option<UnsupportedElementPolicy>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the rendered element tree as JSON.
    Render {
        #[command(flatten)]
        card: CardArgs,
        #[arg(long)]
        pretty: bool,
    },
    /// Fill inputs, fire an action and print the invocation.
    Submit {
        #[command(flatten)]
        card: CardArgs,
        #[arg(long, value_name = "ACTION_ID")]
        action: String,
        #[arg(long = "input", value_name = "ID=VALUE", value_parser = parse_input)]
        inputs: Vec<(String, String)>,
    },
    /// List the remote resources a card references.
    Resources {
        #[arg(long, value_name = "CARD_JSON")]
        card: PathBuf,
    },
    /// Print the effective host config, defaults filled in.
    HostConfig {
        #[arg(long, value_name = "HOST_CONFIG_JSON")]
        host_config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code()
        }
    };
    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Render { card, pretty } => handle_render(&card, pretty),
        Command::Submit {
            card,
            action,
            inputs,
        } => handle_submit(&card, &action, inputs),
        Command::Resources { card } => handle_resources(&card),
        Command::HostConfig { host_config } => handle_host_config(host_config.as_deref()),
    }
}

fn handle_render(args: &CardArgs, pretty: bool) -> Result<(), CliError> {
    let rendered = render(args, RecordingDispatcher::new())?;
    print_json(&rendered, pretty)
}

fn handle_submit(
    args: &CardArgs,
    action: &str,
    inputs: Vec<(String, String)>,
) -> Result<(), CliError> {
    let dispatcher = RecordingDispatcher::new();
    let rendered = render(args, dispatcher.clone())?;
    for (id, value) in inputs {
        let cell = rendered
            .input(&id)
            .ok_or_else(|| CliError::UnknownInput(id.clone()))?;
        cell.set(value);
    }
    let invocation = rendered
        .action(action)
        .and_then(|node| node.invoke())
        .ok_or_else(|| CliError::UnknownAction(action.to_string()))?
        .map_err(CliError::Action)?;
    debug!(
        dispatched = dispatcher.invocations().len(),
        "action fired"
    );
    print_json(&invocation, true)
}

fn handle_resources(path: &Path) -> Result<(), CliError> {
    let card = load_card(path)?;
    print_json(&card.resource_information(), true)
}

fn handle_host_config(path: Option<&Path>) -> Result<(), CliError> {
    let host_config = load_host_config(path)?;
    print_json(&host_config, true)
}

fn render(args: &CardArgs, dispatcher: RecordingDispatcher) -> Result<RenderedCard, CliError> {
    let card = load_card(&args.card)?;
    let host_config = load_host_config(args.host_config.as_deref())?;
    let mut renderer = AdaptiveCardRenderer::new(host_config);
    if let Some(policy) = args.policy {
        renderer = renderer.with_policy(policy);
    }
    debug!(policy = %renderer.policy(), card = %args.card.display(), "rendering card");
    let rendered = renderer
        .render_card(&card, dispatcher)
        .map_err(CliError::Render)?;
    for warning in &rendered.warnings {
        warn!(
            code = %warning.code,
            path = ?warning.path,
            message = ?warning.message,
            "render warning"
        );
    }
    Ok(rendered)
}

fn load_card(path: &Path) -> Result<AdaptiveCard, CliError> {
    let raw =
        fs::read_to_string(path).map_err(|err| CliError::CardFile(path.to_path_buf(), err))?;
    AdaptiveCard::from_json_str(&raw).map_err(|err| CliError::CardParse(path.to_path_buf(), err))
}

fn load_host_config(path: Option<&Path>) -> Result<HostConfig, CliError> {
    match path {
        Some(path) => Ok(HostConfig::load(path)?),
        None => Ok(HostConfig::default()),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|err| CliError::Output(err.into()))?;
    println!("{json}");
    Ok(())
}

fn parse_input(raw: &str) -> Result<(String, String), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got `{raw}`"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err("input id must not be empty".to_string());
    }
    Ok((id.to_string(), value.to_string()))
}

fn parse_policy(raw: &str) -> Result<UnsupportedElementPolicy, String> {
    UnsupportedElementPolicy::parse(raw)
        .ok_or_else(|| format!("unknown policy `{raw}`, expected abort, skip or placeholder"))
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("card file failed ({0}): {1}")]
    CardFile(PathBuf, #[source] std::io::Error),
    #[error("card parse failed ({0}): {1}")]
    CardParse(PathBuf, #[source] serde_json::Error),
    #[error("host config failed: {0}")]
    HostConfig(#[from] HostConfigError),
    #[error("render failed: {0}")]
    Render(#[source] RenderError),
    #[error("no input with id `{0}`")]
    UnknownInput(String),
    #[error("no interactive action with id `{0}`")]
    UnknownAction(String),
    #[error("action failed: {0}")]
    Action(#[source] RenderError),
    #[error("output failed: {0}")]
    Output(#[source] anyhow::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::CardFile(_, _) => 1,
            CliError::CardParse(_, _) => 1,
            CliError::HostConfig(_) => 1,
            CliError::UnknownInput(_) => 2,
            CliError::UnknownAction(_) => 2,
            CliError::Render(_) => 3,
            CliError::Action(_) => 4,
            CliError::Output(_) => 5,
        }
    }
}
