//! # NoGo-router CLI
//!
//! Command-line front end for the nogo-router library.
//! Asks the routing backend for a route that avoids a set of streets and
//! frames the result, optionally writing it out as GeoJSON.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::error;
use nogo_router::{
    frame, ClientConfig, Error, GeoJsonMap, MapSynchronizer, Msg, RequestStatus, RouteClient,
    Session, DEFAULT_BASE_URL,
};

mod cli;

/// Command-line interface for nogo-router
#[derive(Parser)]
#[command(name = "nogo-router")]
#[command(about = "Find a route through Ottawa that avoids the streets you name")]
#[command(long_about = "Find a route through Ottawa that avoids the streets you name:
  nogo-router -s \"1125 Colonel By Dr\" -e \"75 Laurier Avenue East\"
  nogo-router -s ... -e ... -a \"Bank St\" -a \"Rideau St\"
  nogo-router -s ... -e ... --avoid-file streets.txt --geojson route.geojson
  nogo-router --interactive

The backend address defaults to http://127.0.0.1:5000 and can be set with
--server or NOGO_ROUTER_URL.")]
#[command(version = env!("NOGO_ROUTER_VERSION"))]
struct Cli {
    /// Start address
    #[arg(short, long)]
    start: Option<String>,

    /// Destination address
    #[arg(short, long)]
    end: Option<String>,

    /// Street to avoid (repeatable)
    #[arg(short, long = "avoid", value_name = "STREET")]
    avoid: Vec<String>,

    /// File with streets to avoid, one per line
    #[arg(long, value_name = "PATH")]
    avoid_file: Option<PathBuf>,

    /// Routing backend base URL
    #[arg(long, env = "NOGO_ROUTER_URL", default_value = DEFAULT_BASE_URL)]
    server: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Write the rendered route as GeoJSON to this file
    #[arg(long, value_name = "PATH")]
    geojson: Option<PathBuf>,

    /// Line-driven interactive session
    #[arg(short, long)]
    interactive: bool,

    /// Print the request payload without sending it
    #[arg(long)]
    dry_run: bool,

    /// Only check that the backend is up
    #[arg(long)]
    check: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Avoid-box text assembled from `--avoid` values and `--avoid-file`
    fn avoid_text(&self) -> anyhow::Result<String> {
        let mut text = self.avoid.join("\n");
        if let Some(path) = &self.avoid_file {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read avoid file {}", path.display()))?;
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&contents);
        }
        Ok(text)
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.server.clone(),
            timeout: Duration::from_secs(self.timeout),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("🗺️  NoGo-router v{} starting...", env!("NOGO_ROUTER_VERSION"));
    }

    let client = RouteClient::with_config(cli.client_config())?;

    if cli.check {
        return check_backend(&client).await;
    }

    if cli.interactive {
        return cli::repl::run(client, cli.geojson.clone()).await;
    }

    let mut session = Session::new();
    session.update(Msg::StartChanged(cli.start.clone().unwrap_or_default()))?;
    session.update(Msg::EndChanged(cli.end.clone().unwrap_or_default()))?;
    session.update(Msg::AvoidChanged(cli.avoid_text()?))?;

    eprintln!("{}", cli::view::avoid_preview(&session.form().avoid_list()));

    if cli.dry_run {
        return dry_run(&session);
    }

    route_once(&mut session, &client, cli.geojson.as_deref()).await
}

/// Print the payload that would be sent
fn dry_run(session: &Session) -> anyhow::Result<()> {
    let request = session.form().to_request().map_err(alert)?;
    eprintln!("🔍 [DRY RUN] Would POST to /api/find_route:");
    println!("{}", serde_json::to_string_pretty(&request)?);
    eprintln!("Avoid count: {}", request.avoid().len());
    Ok(())
}

/// Submit once, wait for the reply and report it
async fn route_once(
    session: &mut Session,
    client: &RouteClient,
    geojson: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let request = session.begin_submit().map_err(alert)?;

    let spinner = cli::RequestSpinner::start(&format!(
        "Finding route from {} to {}",
        request.start_address(),
        request.destination_address()
    ));
    let result = client.find_route(&request).await;
    session.update(Msg::RouteFetched(result))?;
    spinner.finish(session.status().describe());

    if let RequestStatus::Failed(message) = session.status() {
        anyhow::bail!("{message}");
    }

    if !session.log().is_empty() {
        println!("Log: {}", session.log());
    }
    println!("{}", cli::view::frame_summary(&frame(session.map())));

    if let Some(path) = geojson {
        let mut map = GeoJsonMap::new();
        MapSynchronizer::new().sync(session.map(), &mut map);
        map.write_to(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("🗺️  Map written to {}", path.display());
    }

    Ok(())
}

/// Probe `/health`
async fn check_backend(client: &RouteClient) -> anyhow::Result<()> {
    if client.health().await? {
        println!("✅ Backend at {} is up", client.base_url());
        Ok(())
    } else {
        anyhow::bail!("backend at {} is not healthy", client.base_url())
    }
}

/// Surface a validation problem the way the form would: as an alert
fn alert(e: Error) -> anyhow::Error {
    eprintln!("⚠️  {}", e.status_message());
    anyhow::Error::new(e)
}
