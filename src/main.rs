use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use viewdeck::config::{Config, parse_policy};
use viewdeck::error::ErrorCode;
use viewdeck::intent::decode_intent;
use viewdeck::services::agent_socket::{AgentLink, spawn_agent_socket};
use viewdeck::services::emitter::IntentEmitter;
use viewdeck::services::{compose, local, render, view};
use viewdeck::state::{RelayState, ViewState};

#[derive(Parser, Debug)]
#[command(name = "viewdeck", about = "Intent-driven view registry: relay hub, client, and emitter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the relay hub that fans intents out to connected clients.
    Relay {
        #[arg(long, env = "VIEWDECK_BIND")]
        bind: Option<std::net::SocketAddr>,
    },
    /// Run a client: hold a registry, follow the agent, read local commands.
    Client {
        #[arg(long, env = "VIEWDECK_AGENT_WS")]
        url: Option<String>,
        #[arg(long, env = "VIEWDECK_CONSTRAINT_POLICY")]
        policy: Option<String>,
    },
    /// Send one intent (JSON) to the relay.
    Emit {
        intent: String,
        #[arg(long, env = "VIEWDECK_RELAY_URL")]
        relay: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = Config::from_env().expect("invalid configuration");

    match cli.command {
        Command::Relay { bind } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            run_relay(&config).await;
        }
        Command::Client { url, policy } => {
            if let Some(url) = url {
                config.agent_ws_url = url;
            }
            if policy.is_some() {
                config.constraint_policy = parse_policy(policy.as_deref()).expect("invalid constraint policy");
            }
            run_client(config).await;
        }
        Command::Emit { intent, relay } => {
            if let Some(relay) = relay {
                config.relay_url = relay;
            }
            if let Err(code) = run_emit(&config, &intent).await {
                std::process::exit(code);
            }
        }
    }
}

async fn run_relay(config: &Config) {
    let app = viewdeck::routes::app(RelayState::new());
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .expect("failed to bind");

    info!(bind = %config.bind, "viewdeck relay listening");
    axum::serve(listener, app).await.expect("server failed");
}

async fn run_client(config: Config) {
    let state = ViewState::new(config.constraint_policy);
    let link = AgentLink::new();
    let _socket = spawn_agent_socket(config.agent_ws_url.clone(), state.clone(), link.clone(), config.reconnect_delay);

    // View composer: recompose on every render signal.
    let (_listener_id, mut renders) = render::subscribe(&state).await;
    let composer_state = state.clone();
    tokio::spawn(async move {
        log_plan(&composer_state).await;
        while let Some(event) = renders.recv().await {
            info!(seq = event.seq, intent = event.intent, view = %event.current_view, "client: render");
            log_plan(&composer_state).await;
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match local::handle_line(&state, &link, &line).await {
            Ok(action) => info!(?action, "client: local command"),
            Err(e) => warn!(error = %e, code = e.error_code(), "client: local command rejected"),
        }
    }

    // stdin closed; keep following the agent.
    std::future::pending::<()>().await;
}

async fn log_plan(state: &ViewState) {
    let plan = compose::compose(&view::snapshot(state).await);
    info!(
        view = %plan.view,
        mounted = plan.len(),
        primary = ?plan.primary,
        panels = ?plan.panels,
        dynamic = plan.dynamic.len(),
        charts = plan.charts.len(),
        "client: composed view"
    );
}

async fn run_emit(config: &Config, raw: &str) -> Result<(), i32> {
    let intent = decode_intent(raw).map_err(|e| {
        eprintln!("{}: {e}", e.error_code());
        2
    })?;
    let emitter = IntentEmitter::new(&config.relay_url).map_err(|e| {
        eprintln!("{}: {e}", e.error_code());
        1
    })?;
    match emitter.emit(&intent).await {
        Ok(delivered) => {
            println!("{} delivered to {delivered} peer(s)", intent.kind());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {e}", e.error_code());
            Err(1)
        }
    }
}
