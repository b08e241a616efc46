//! Interactive mode
//!
//! A line-driven event loop over stdin. Route requests run in the
//! background while input keeps being read; their outcomes are applied to
//! the session in whatever order they arrive.

use std::path::PathBuf;

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};

use nogo_router::{
    frame, Command, GeoJsonMap, MapSynchronizer, Msg, RouteClient, RouteRequest, RouteResult,
    Session,
};

use super::view;

const HELP: &str = "Commands:
  start <address>     set the start address
  end <address>       set the destination address
  avoid               enter streets to avoid, one per line, finish with a lone '.'
  route               request a route
  clear               reset every field and the map
  show                print the form, avoid list and status
  help                show this help
  quit                leave";

/// One parsed input line
#[derive(Debug)]
pub enum Input {
    Update(Msg),
    BeginAvoid,
    Show,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Parse a command line (outside of avoid entry)
pub fn parse_command(line: &str) -> Input {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim().to_string();

    match word.to_ascii_lowercase().as_str() {
        "" => Input::Empty,
        "start" => Input::Update(Msg::StartChanged(rest)),
        "end" | "dest" | "destination" => Input::Update(Msg::EndChanged(rest)),
        "avoid" => Input::BeginAvoid,
        "route" | "go" => Input::Update(Msg::Submit),
        "clear" => Input::Update(Msg::Clear),
        "show" => Input::Show,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => Input::Unknown(other.to_string()),
    }
}

/// What the event loop must do after a line
#[derive(Debug, PartialEq)]
pub enum Step {
    Continue,
    Fetch(RouteRequest),
    Quit,
}

/// Terminal front end around a [`Session`]
pub struct Repl {
    session: Session,
    map: GeoJsonMap,
    sync: MapSynchronizer,
    geojson_path: Option<PathBuf>,
    avoid_buffer: Option<Vec<String>>,
}

impl Repl {
    pub fn new(geojson_path: Option<PathBuf>) -> Self {
        Self {
            session: Session::new(),
            map: GeoJsonMap::new(),
            sync: MapSynchronizer::new(),
            geojson_path,
            avoid_buffer: None,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Handle one line of input
    pub fn handle_line(&mut self, line: &str) -> Step {
        if let Some(buffer) = self.avoid_buffer.as_mut() {
            if line.trim() != "." {
                buffer.push(line.to_string());
                return Step::Continue;
            }
            let text = buffer.join("\n");
            self.avoid_buffer = None;
            self.dispatch(Msg::AvoidChanged(text));
            println!("{}", view::avoid_preview(&self.session.form().avoid_list()));
            return Step::Continue;
        }

        match parse_command(line) {
            Input::Update(msg) => {
                let clearing = matches!(msg, Msg::Clear);
                let step = self.dispatch(msg);
                if clearing {
                    println!("All fields have been cleared.");
                    self.refresh_map();
                }
                step
            }
            Input::BeginAvoid => {
                self.avoid_buffer = Some(Vec::new());
                println!("Enter streets to avoid, one per line. Finish with '.'");
                Step::Continue
            }
            Input::Show => {
                println!("{}", view::form_summary(self.session.form()));
                println!("{}", view::status_line(&self.session));
                println!("{}", view::frame_summary(&frame(self.session.map())));
                Step::Continue
            }
            Input::Help => {
                println!("{HELP}");
                Step::Continue
            }
            Input::Quit => Step::Quit,
            Input::Empty => Step::Continue,
            Input::Unknown(word) => {
                println!("Unknown command '{word}'. Type 'help' for a list.");
                Step::Continue
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) -> Step {
        match self.session.update(msg) {
            Ok(Command::FetchRoute(request)) => {
                println!("{}", view::status_line(&self.session));
                Step::Fetch(request)
            }
            Ok(Command::None) => Step::Continue,
            Err(e) => {
                println!("⚠️  {}", e.status_message());
                Step::Continue
            }
        }
    }

    /// Apply a finished request
    pub fn route_fetched(&mut self, result: RouteResult) {
        self.session.finish_submit(result);
        println!("{}", view::status_line(&self.session));
        self.refresh_map();
    }

    fn refresh_map(&mut self) {
        if !self.sync.sync(self.session.map(), &mut self.map) {
            return;
        }
        println!("{}", view::frame_summary(&frame(self.session.map())));
        if let Some(path) = &self.geojson_path {
            match self.map.write_to(path) {
                Ok(()) => println!("🗺️  Map written to {}", path.display()),
                Err(e) => log::warn!("Could not write {}: {e}", path.display()),
            }
        }
    }
}

/// Run the interactive loop until `quit` or end of input.
///
/// Requests still in flight at end of input are awaited so piped scripts
/// see their outcome.
pub async fn run(client: RouteClient, geojson_path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut repl = Repl::new(geojson_path);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: FuturesUnordered<BoxFuture<'static, RouteResult>> = FuturesUnordered::new();

    println!("NoGo-router interactive mode, backend {}", client.base_url());
    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match repl.handle_line(&line) {
                    Step::Continue => {}
                    Step::Fetch(request) => {
                        let client = client.clone();
                        in_flight.push(async move { client.find_route(&request).await }.boxed());
                    }
                    Step::Quit => return Ok(()),
                }
            }
            Some(result) = in_flight.next(), if !in_flight.is_empty() => {
                repl.route_fetched(result);
            }
        }
    }

    while let Some(result) = in_flight.next().await {
        repl.route_fetched(result);
    }
    Ok(())
}
