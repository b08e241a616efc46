//! Session state and the route request controller
//!
//! A [`Session`] owns everything the user sees: the form, the request status,
//! the algorithm log and the route on the map. It changes only through
//! [`Session::update`], which keeps every transition testable without a UI
//! or a network.
//!
//! Submitting is split in two halves around the network call. `Msg::Submit`
//! validates the form and hands back a [`Command::FetchRoute`]; the event
//! loop runs it and feeds the outcome back as `Msg::RouteFetched`. Outcomes
//! are applied in arrival order: a slow earlier request that resolves last
//! overwrites a faster later one.

use crate::core::avoid::{normalize, AvoidList};
use crate::core::client::RouteClient;
use crate::core::error::{Error, Result};
use crate::core::map::MapRouteState;
use crate::core::route::{RouteRequest, RouteResult};

/// Text the user typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub start: String,
    pub end: String,
    pub avoid_text: String,
}

impl FormState {
    /// The avoid box as it will be sent
    pub fn avoid_list(&self) -> AvoidList {
        normalize(&self.avoid_text)
    }

    /// Build the request for the current form, or say why it can't be sent.
    pub fn to_request(&self) -> Result<RouteRequest> {
        RouteRequest::new(&self.start, &self.end, self.avoid_list())
    }
}

/// Where the latest route request stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(String),
}

impl RequestStatus {
    /// Status line text
    pub fn describe(&self) -> &str {
        match self {
            RequestStatus::Idle => "Ready",
            RequestStatus::InFlight => "Finding route...",
            RequestStatus::Succeeded => "Route found",
            RequestStatus::Failed(message) => message,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestStatus::InFlight)
    }
}

/// User and network events
#[derive(Debug)]
pub enum Msg {
    StartChanged(String),
    EndChanged(String),
    AvoidChanged(String),
    Submit,
    RouteFetched(RouteResult),
    Clear,
}

/// Side effect the event loop must perform after an update
#[derive(Debug, PartialEq)]
pub enum Command {
    None,
    FetchRoute(RouteRequest),
}

/// Per-session UI state
#[derive(Debug, Clone, Default)]
pub struct Session {
    form: FormState,
    status: RequestStatus,
    log: String,
    map: MapRouteState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// Log text from the last successful route
    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn map(&self) -> &MapRouteState {
        &self.map
    }

    /// Apply one event.
    ///
    /// Only `Msg::Submit` can fail, with [`Error::Validation`] when an
    /// address is blank; the session is left untouched in that case.
    pub fn update(&mut self, msg: Msg) -> Result<Command> {
        match msg {
            Msg::StartChanged(text) => self.form.start = text,
            Msg::EndChanged(text) => self.form.end = text,
            Msg::AvoidChanged(text) => self.form.avoid_text = text,
            Msg::Submit => return self.begin_submit().map(Command::FetchRoute),
            Msg::RouteFetched(result) => self.finish_submit(result),
            Msg::Clear => self.clear(),
        }
        Ok(Command::None)
    }

    /// Validate the form and mark a request in flight.
    pub fn begin_submit(&mut self) -> Result<RouteRequest> {
        let request = self.form.to_request()?;
        log::info!(
            "Submitting route {} -> {} ({} street(s) to avoid)",
            request.start_address(),
            request.destination_address(),
            request.avoid().len()
        );
        self.status = RequestStatus::InFlight;
        self.log.clear();
        Ok(request)
    }

    /// Record the outcome of a request.
    ///
    /// A failure leaves the map as it was.
    pub fn finish_submit(&mut self, result: RouteResult) {
        match result {
            Ok(found) => {
                self.map = MapRouteState::from_route(&found);
                self.log = found.log;
                self.status = RequestStatus::Succeeded;
            }
            Err(e) => self.record_failure(&e),
        }
    }

    fn record_failure(&mut self, err: &Error) {
        log::debug!("Submission failed: {err}");
        self.status = RequestStatus::Failed(err.status_message());
    }

    /// Reset the form, the map and the status.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Submit the current form and wait for the backend.
///
/// Validation failures return early with no network call and no state
/// change. Any other failure is recorded in the session status and also
/// returned.
pub async fn submit(session: &mut Session, client: &RouteClient) -> RouteResult {
    let request = session.begin_submit()?;
    let result = client.find_route(&request).await;
    match &result {
        Ok(found) => session.finish_submit(Ok(found.clone())),
        Err(e) => session.record_failure(e),
    }
    result
}
