//! One display surface's fetch lifecycle: `Idle -> Loading -> {Succeeded, Failed}`.
//!
//! The session never touches display state. It emits [`PresentationEvent`]s on
//! a channel and whoever owns the display drains them on its own thread.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    error::FetchError,
    location::LocationProvider,
    model::{WeatherQuery, WeatherReport},
    provider::WeatherFetcher,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Messages for the presentation side.
///
/// On `Finished` the sink replaces every weather field (or clears them all on
/// error) so nothing from a previous query survives.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    Loading(bool),
    Finished(Result<WeatherReport, FetchError>),
    /// Input or location problem; no request was sent.
    Notice(String),
}

#[derive(Debug)]
pub struct WeatherSession<F> {
    fetcher: F,
    state: FetchState,
    events: mpsc::UnboundedSender<PresentationEvent>,
}

impl<F: WeatherFetcher> WeatherSession<F> {
    pub fn new(fetcher: F) -> (Self, mpsc::UnboundedReceiver<PresentationEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { fetcher, state: FetchState::Idle, events }, rx)
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Run one fetch. `&mut self` keeps a surface to a single request in flight.
    pub async fn submit(&mut self, query: WeatherQuery) -> FetchState {
        if self.state == FetchState::Loading {
            // A previous submit was dropped mid-request.
            debug!("previous fetch abandoned");
            self.emit(PresentationEvent::Loading(false));
        }

        self.state = FetchState::Loading;
        self.emit(PresentationEvent::Loading(true));

        let result = self.fetcher.fetch(&query).await;

        self.state = match &result {
            Ok(_) => FetchState::Succeeded,
            Err(_) => FetchState::Failed,
        };
        self.emit(PresentationEvent::Loading(false));
        self.emit(PresentationEvent::Finished(result));
        self.state
    }

    /// Blank input is reported as a notice and never reaches the fetcher.
    pub async fn submit_city(&mut self, input: &str) -> FetchState {
        match WeatherQuery::by_city(input) {
            Ok(query) => self.submit(query).await,
            Err(err) => {
                self.emit(PresentationEvent::Notice(err.to_string()));
                self.state
            }
        }
    }

    pub async fn submit_location<L>(&mut self, locator: &L) -> FetchState
    where
        L: LocationProvider + ?Sized,
    {
        match locator.current_coordinates().await {
            Ok(coords) => self.submit(WeatherQuery::ByCoordinates(coords)).await,
            Err(err) => {
                info!(error = %err, "no location for weather lookup");
                self.emit(PresentationEvent::Notice(err.to_string()));
                self.state
            }
        }
    }

    fn emit(&self, event: PresentationEvent) {
        if self.events.send(event).is_err() {
            debug!("presentation receiver dropped; event discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        location::{FixedLocation, LocationError},
        model::Coordinates,
    };
    use async_trait::async_trait;
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    #[derive(Debug, Clone)]
    struct CannedFetcher {
        result: Result<WeatherReport, FetchError>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl WeatherFetcher for CannedFetcher {
        async fn fetch(&self, _query: &WeatherQuery) -> Result<WeatherReport, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn report() -> WeatherReport {
        WeatherReport {
            location_name: Some("London".into()),
            condition: "Clouds".into(),
            description: "overcast clouds".into(),
            temperature_celsius: 12.0,
            feels_like_celsius: 10.5,
        }
    }

    fn canned(result: Result<WeatherReport, FetchError>) -> (CannedFetcher, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (CannedFetcher { result, calls: calls.clone() }, calls)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<PresentationEvent>) -> Vec<PresentationEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    #[tokio::test]
    async fn success_emits_loading_then_report() {
        let (fetcher, calls) = canned(Ok(report()));
        let (mut session, mut rx) = WeatherSession::new(fetcher);

        let state = session.submit_city("London").await;

        assert_eq!(state, FetchState::Succeeded);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            drain(&mut rx),
            vec![
                PresentationEvent::Loading(true),
                PresentationEvent::Loading(false),
                PresentationEvent::Finished(Ok(report())),
            ]
        );
    }

    #[tokio::test]
    async fn failure_still_hides_loading() {
        let err = FetchError::HttpFailure { status: 404, message: "city not found".into() };
        let (fetcher, _) = canned(Err(err.clone()));
        let (mut session, mut rx) = WeatherSession::new(fetcher);

        assert_eq!(session.submit_city("Atlantis").await, FetchState::Failed);
        assert_eq!(
            drain(&mut rx),
            vec![
                PresentationEvent::Loading(true),
                PresentationEvent::Loading(false),
                PresentationEvent::Finished(Err(err)),
            ]
        );
    }

    #[tokio::test]
    async fn blank_city_never_fetches() {
        let (fetcher, calls) = canned(Ok(report()));
        let (mut session, mut rx) = WeatherSession::new(fetcher);

        assert_eq!(session.submit_city("  ").await, FetchState::Idle);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(drain(&mut rx), vec![PresentationEvent::Notice("Enter City".into())]);
    }

    #[tokio::test]
    async fn location_failure_is_a_notice() {
        struct Disabled;

        #[async_trait]
        impl LocationProvider for Disabled {
            async fn current_coordinates(&self) -> Result<Coordinates, LocationError> {
                Err(LocationError::LocationDisabled)
            }
        }

        let (fetcher, calls) = canned(Ok(report()));
        let (mut session, mut rx) = WeatherSession::new(fetcher);

        session.submit_location(&Disabled).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(drain(&mut rx), vec![PresentationEvent::Notice("Turn on location".into())]);
    }

    #[tokio::test]
    async fn location_success_fetches_by_coordinates() {
        let (fetcher, calls) = canned(Ok(report()));
        let (mut session, _rx) = WeatherSession::new(fetcher);
        let here = FixedLocation::new(Some(Coordinates::new(51.5, -0.12).unwrap()));

        assert_eq!(session.submit_location(&here).await, FetchState::Succeeded);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn terminal_state_allows_next_fetch() {
        let (fetcher, calls) = canned(Ok(report()));
        let (mut session, _rx) = WeatherSession::new(fetcher);

        session.submit_city("London").await;
        session.submit_city("Paris").await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(session.state(), FetchState::Succeeded);
    }

    /// Hangs on its first call, answers normally afterwards.
    #[derive(Debug)]
    struct StallsOnce {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherFetcher for StallsOnce {
        async fn fetch(&self, _query: &WeatherQuery) -> Result<WeatherReport, FetchError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                std::future::pending::<()>().await;
            }
            Ok(report())
        }
    }

    #[tokio::test]
    async fn abandoned_submit_turns_loading_off_before_next() {
        let (mut session, mut rx) = WeatherSession::new(StallsOnce { calls: AtomicUsize::new(0) });

        let abandoned =
            tokio::time::timeout(Duration::from_millis(20), session.submit_city("London")).await;
        assert!(abandoned.is_err());
        assert_eq!(session.state(), FetchState::Loading);
        assert_eq!(drain(&mut rx), vec![PresentationEvent::Loading(true)]);

        assert_eq!(session.submit_city("London").await, FetchState::Succeeded);
        assert_eq!(
            drain(&mut rx),
            vec![
                PresentationEvent::Loading(false),
                PresentationEvent::Loading(true),
                PresentationEvent::Loading(false),
                PresentationEvent::Finished(Ok(report())),
            ]
        );
    }

    #[tokio::test]
    async fn dropped_receiver_does_not_break_session() {
        let (fetcher, _) = canned(Ok(report()));
        let (mut session, rx) = WeatherSession::new(fetcher);
        drop(rx);

        assert_eq!(session.submit_city("London").await, FetchState::Succeeded);
    }
}
