//! The orchestrator behind the two user actions and the settings toggles.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};

use crate::{
    CacheGate, LocationResolver, Settings, WeatherError, WeatherFetcher, WeatherSnapshot,
    cache::{Clock, SystemClock},
    host::{Notifier, TextField, WeatherDisplay},
    note,
    provider::{ForecastService, GeocodingService},
    settings::SettingsStore,
};

const CACHED_NOTICE_DURATION: Duration = Duration::from_secs(3);

/// The host-side collaborators a session talks to.
#[derive(Clone)]
pub struct HostBindings {
    pub store: Arc<dyn SettingsStore>,
    pub notifier: Arc<dyn Notifier>,
    pub display: Arc<dyn WeatherDisplay>,
    pub author_note: Arc<dyn TextField>,
    pub compose_box: Arc<dyn TextField>,
}

/// Result of [`WeatherSession::request_weather`]. Failures have already been
/// reported through the notifier by the time this is returned.
#[derive(Debug)]
pub enum FetchOutcome {
    Updated(WeatherSnapshot),
    Cached { seconds_remaining: i64 },
    Failed(WeatherError),
}

/// Owns the settings and is their only writer.
pub struct WeatherSession {
    settings: Settings,
    last_location: String,
    resolver: LocationResolver,
    fetcher: WeatherFetcher,
    clock: Arc<dyn Clock>,
    host: HostBindings,
}

impl WeatherSession {
    pub fn new(
        settings: Settings,
        geocoder: Arc<dyn GeocodingService>,
        forecast: Arc<dyn ForecastService>,
        host: HostBindings,
    ) -> Self {
        let last_location = settings.location.trim().to_string();
        Self {
            settings,
            last_location,
            resolver: LocationResolver::new(geocoder),
            fetcher: WeatherFetcher::new(forecast),
            clock: Arc::new(SystemClock),
            host,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn persist(&self) {
        self.host.store.save_debounced(&self.settings);
    }

    fn report(&self, err: &WeatherError) {
        match err {
            WeatherError::EmptyLocation
            | WeatherError::NoCachedWeather
            | WeatherError::FetchInProgress => {
                self.host.notifier.warning(&err.user_message(), err.display_duration());
            }
            _ => {
                tracing::error!(error = %err, "weather fetch failed");
                self.host.notifier.error(&err.user_message(), err.display_duration());
            }
        }
    }

    /// The "fetch weather" action.
    pub async fn request_weather(&mut self) -> FetchOutcome {
        let location = self.settings.location.trim().to_string();
        if location.is_empty() {
            let err = WeatherError::EmptyLocation;
            self.report(&err);
            return FetchOutcome::Failed(err);
        }

        let now = self.clock.now();
        let now_ms = now.timestamp_millis();
        let gate = CacheGate::new(self.settings.last_fetch_time);
        if gate.is_valid(now_ms) && self.settings.last_weather.is_some() {
            let seconds_remaining = gate.seconds_remaining(now_ms);
            tracing::debug!(seconds_remaining, "cache still valid, skipping fetch");
            self.host.notifier.info(
                &format!(
                    "Using cached weather data. Next fetch available in {seconds_remaining} seconds."
                ),
                Some(CACHED_NOTICE_DURATION),
            );
            return FetchOutcome::Cached { seconds_remaining };
        }

        tracing::info!(%location, "fetching weather");
        self.host.notifier.info("Fetching weather data...", None);

        match self.fetch_snapshot(&location, now).await {
            Ok(snapshot) => {
                self.store_snapshot(snapshot.clone(), now_ms);
                FetchOutcome::Updated(snapshot)
            }
            Err(err) => {
                self.report(&err);
                FetchOutcome::Failed(err)
            }
        }
    }

    async fn fetch_snapshot(
        &self,
        location: &str,
        now: DateTime<Utc>,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let resolution = self.resolver.resolve(location).await?;
        if let Some(warning) = &resolution.warning {
            self.host.notifier.warning(&warning.to_string(), None);
        }

        self.fetcher.fetch(&resolution.place, now).await
    }

    fn store_snapshot(&mut self, snapshot: WeatherSnapshot, fetched_at_ms: i64) {
        let name = snapshot.location_name.clone();
        tracing::info!(
            location = %name,
            condition = %snapshot.condition,
            temp_c = snapshot.temp_c,
            "weather updated"
        );

        self.settings.last_weather = Some(snapshot);
        self.settings.last_fetch_time = fetched_at_ms;
        self.persist();

        self.refresh_display();
        if self.settings.auto_inject {
            self.inject_note();
        }

        self.host
            .notifier
            .success(&format!("Weather updated for {name}"), None);
    }

    fn refresh_display(&self) {
        self.host
            .display
            .render(self.settings.last_weather.as_ref(), self.settings.use_celsius);
    }

    /// An unreadable note is left alone rather than overwritten.
    fn read_note(&self) -> Option<String> {
        match self.host.author_note.read() {
            Ok(text) => Some(text),
            Err(e) => {
                let err = WeatherError::UnreadableText {
                    field: "author's note",
                    reason: format!("{e:#}"),
                };
                tracing::warn!(error = %err, "author's note left unchanged");
                self.host.notifier.warning(&err.user_message(), None);
                None
            }
        }
    }

    fn inject_note(&self) {
        let Some(snapshot) = &self.settings.last_weather else {
            return;
        };
        let Some(current) = self.read_note() else {
            return;
        };
        let updated = note::upsert(&current, &snapshot.note_line(self.settings.use_celsius));
        if updated != current {
            self.host.author_note.write(updated);
        }
    }

    fn strip_note(&self) {
        let Some(current) = self.read_note() else {
            return;
        };
        let updated = note::strip(&current);
        if updated != current {
            self.host.author_note.write(updated);
        }
    }

    /// The "insert weather into compose box" action. Returns the inserted line.
    pub fn insert_into_compose_box(&self) -> Result<String, WeatherError> {
        let Some(snapshot) = &self.settings.last_weather else {
            let err = WeatherError::NoCachedWeather;
            self.report(&err);
            return Err(err);
        };

        let line = snapshot.chat_line(self.settings.use_celsius);
        let current = self.host.compose_box.read().map_err(|e| {
            let err = WeatherError::UnreadableText {
                field: "compose box",
                reason: format!("{e:#}"),
            };
            self.report(&err);
            err
        })?;
        let updated = if current.is_empty() {
            line.clone()
        } else {
            format!("{current}\n{line}")
        };
        self.host.compose_box.write(updated);
        self.host.notifier.success("Weather inserted into chat", None);

        Ok(line)
    }

    /// Location text edit. A different place (ignoring case) lifts the cache gate.
    pub fn set_location(&mut self, text: &str) {
        let mut gate = CacheGate::new(self.settings.last_fetch_time);
        if gate.on_location_change(&self.last_location, text) {
            tracing::debug!("location changed, cache reset");
            self.settings.last_fetch_time = gate.last_fetch_time();
        }
        if !text.trim().is_empty() {
            self.last_location = text.trim().to_string();
        }

        self.settings.location = text.to_string();
        self.persist();
    }

    pub fn set_auto_inject(&mut self, enabled: bool) {
        self.settings.auto_inject = enabled;
        self.persist();

        if enabled {
            self.inject_note();
        } else {
            self.strip_note();
        }
    }

    pub fn set_use_celsius(&mut self, use_celsius: bool) {
        self.settings.use_celsius = use_celsius;
        self.persist();

        self.refresh_display();
        if self.settings.auto_inject {
            self.inject_note();
        }
    }

    /// Renders whatever snapshot is stored, without fetching.
    pub fn show(&self) {
        self.refresh_display();
    }
}

/// A session shared between tasks. A fetch requested while another is still
/// in flight is rejected with [`WeatherError::FetchInProgress`]; every other
/// action waits for the session to be free.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<tokio::sync::Mutex<WeatherSession>>,
    notifier: Arc<dyn Notifier>,
}

impl SharedSession {
    pub fn new(session: WeatherSession) -> Self {
        let notifier = session.host.notifier.clone();
        Self {
            inner: Arc::new(tokio::sync::Mutex::new(session)),
            notifier,
        }
    }

    pub async fn request_weather(&self) -> FetchOutcome {
        match self.inner.try_lock() {
            Ok(mut session) => session.request_weather().await,
            Err(_) => {
                let err = WeatherError::FetchInProgress;
                tracing::debug!("rejecting overlapping fetch");
                self.notifier.warning(&err.user_message(), None);
                FetchOutcome::Failed(err)
            }
        }
    }

    pub async fn insert_into_compose_box(&self) -> Result<String, WeatherError> {
        self.inner.lock().await.insert_into_compose_box()
    }

    pub async fn set_location(&self, text: &str) {
        self.inner.lock().await.set_location(text);
    }

    pub async fn set_auto_inject(&self, enabled: bool) {
        self.inner.lock().await.set_auto_inject(enabled);
    }

    pub async fn set_use_celsius(&self, use_celsius: bool) {
        self.inner.lock().await.set_use_celsius(use_celsius);
    }

    pub async fn show(&self) {
        self.inner.lock().await.show();
    }

    pub async fn settings(&self) -> Settings {
        self.inner.lock().await.settings().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CurrentConditions, GeocodeCandidate, UnitSystem, host::Severity};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };
    use tokio::sync::Notify;

    type CallLog = Arc<Mutex<Vec<&'static str>>>;

    #[derive(Debug, Default)]
    struct FakeGeocoder {
        results: Vec<GeocodeCandidate>,
        calls: AtomicUsize,
        log: CallLog,
    }

    #[async_trait]
    impl GeocodingService for FakeGeocoder {
        async fn search(&self, _: &str, _: usize) -> Result<Vec<GeocodeCandidate>, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.log.lock().unwrap().push("geocode");
            Ok(self.results.clone())
        }
    }

    #[derive(Debug, Default)]
    struct FakeForecast {
        temperature: f64,
        fail: bool,
        calls: AtomicUsize,
        coords: Mutex<Vec<(f64, f64)>>,
        log: CallLog,
        started: Option<Arc<Notify>>,
        release: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl ForecastService for FakeForecast {
        async fn current(
            &self,
            latitude: f64,
            longitude: f64,
            _: UnitSystem,
        ) -> Result<CurrentConditions, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.coords.lock().unwrap().push((latitude, longitude));
            self.log.lock().unwrap().push("forecast");
            if let (Some(started), Some(release)) = (&self.started, &self.release) {
                started.notify_one();
                release.notified().await;
            }
            if self.fail {
                return Err(WeatherError::Network("HTTP 503".into()));
            }
            Ok(CurrentConditions {
                temperature: self.temperature,
                humidity: 50.0,
                weather_code: 0,
                wind_speed: 10.0,
                raw: serde_json::json!({}),
            })
        }
    }

    #[derive(Default)]
    struct Recorder {
        notices: Mutex<Vec<(Severity, String)>>,
        saves: AtomicUsize,
        renders: AtomicUsize,
    }

    impl Recorder {
        fn last(&self, severity: Severity) -> Option<String> {
            self.notices
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(s, _)| *s == severity)
                .map(|(_, m)| m.clone())
        }
    }

    impl Notifier for Recorder {
        fn notify(&self, severity: Severity, message: &str, _: Option<Duration>) {
            self.notices.lock().unwrap().push((severity, message.to_string()));
        }
    }

    impl SettingsStore for Recorder {
        fn save_debounced(&self, _: &Settings) {
            self.saves.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl WeatherDisplay for Recorder {
        fn render(&self, _: Option<&WeatherSnapshot>, _: bool) {
            self.renders.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct MemoryText(Mutex<String>);

    impl MemoryText {
        fn with(text: &str) -> Self {
            Self(Mutex::new(text.to_string()))
        }

        fn text(&self) -> String {
            self.0.lock().unwrap().clone()
        }
    }

    impl TextField for MemoryText {
        fn read(&self) -> anyhow::Result<String> {
            Ok(self.text())
        }

        fn write(&self, text: String) {
            *self.0.lock().unwrap() = text;
        }
    }

    /// A host field that cannot be read, e.g. a note file with invalid UTF-8.
    #[derive(Default)]
    struct UnreadableText {
        writes: AtomicUsize,
    }

    impl TextField for UnreadableText {
        fn read(&self) -> anyhow::Result<String> {
            anyhow::bail!("stream did not contain valid UTF-8")
        }

        fn write(&self, _: String) {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn advance(&self, ms: i64) {
            let mut now = self.0.lock().unwrap();
            *now += chrono::Duration::milliseconds(ms);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    struct Harness {
        geocoder: Arc<FakeGeocoder>,
        forecast: Arc<FakeForecast>,
        recorder: Arc<Recorder>,
        note: Arc<MemoryText>,
        compose: Arc<MemoryText>,
        clock: Arc<ManualClock>,
        log: CallLog,
    }

    fn place(name: &str, admin1: &str, latitude: f64, longitude: f64) -> GeocodeCandidate {
        GeocodeCandidate {
            name: name.into(),
            admin1: Some(admin1.into()),
            country: Some("United States".into()),
            latitude,
            longitude,
        }
    }

    impl Harness {
        fn new(forecast: FakeForecast) -> Self {
            Self::with_candidates(forecast, vec![place("Decatur", "Georgia", 33.77, -84.29)])
        }

        fn with_candidates(mut forecast: FakeForecast, results: Vec<GeocodeCandidate>) -> Self {
            let log = CallLog::default();
            forecast.log = log.clone();
            Self {
                geocoder: Arc::new(FakeGeocoder {
                    results,
                    log: log.clone(),
                    ..Default::default()
                }),
                forecast: Arc::new(forecast),
                recorder: Arc::new(Recorder::default()),
                note: Arc::new(MemoryText::with("Tone: cozy")),
                compose: Arc::new(MemoryText::default()),
                clock: Arc::new(ManualClock(Mutex::new(
                    Utc.with_ymd_and_hms(2026, 1, 5, 15, 0, 0).unwrap(),
                ))),
                log,
            }
        }

        fn session(&self, settings: Settings) -> WeatherSession {
            self.session_with_note(settings, self.note.clone())
        }

        fn session_with_note(
            &self,
            settings: Settings,
            author_note: Arc<dyn TextField>,
        ) -> WeatherSession {
            let host = HostBindings {
                store: self.recorder.clone(),
                notifier: self.recorder.clone(),
                display: self.recorder.clone(),
                author_note,
                compose_box: self.compose.clone(),
            };
            WeatherSession::new(settings, self.geocoder.clone(), self.forecast.clone(), host)
                .with_clock(self.clock.clone())
        }

        fn network_calls(&self) -> usize {
            self.geocoder.calls.load(Ordering::SeqCst) + self.forecast.calls.load(Ordering::SeqCst)
        }
    }

    fn at(location: &str) -> Settings {
        Settings {
            location: location.into(),
            ..Settings::default()
        }
    }

    fn warm() -> FakeForecast {
        FakeForecast {
            temperature: 20.6,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn empty_location_warns_without_side_effects() {
        let h = Harness::new(warm());
        let mut session = h.session(at("   "));

        let outcome = session.request_weather().await;

        assert!(matches!(outcome, FetchOutcome::Failed(WeatherError::EmptyLocation)));
        assert_eq!(h.network_calls(), 0);
        assert_eq!(h.recorder.saves.load(Ordering::SeqCst), 0);
        assert_eq!(
            h.recorder.last(Severity::Warning).as_deref(),
            Some("Please enter a location first")
        );
    }

    #[tokio::test]
    async fn successful_fetch_stores_snapshot() {
        let h = Harness::new(warm());
        let mut session = h.session(at("Decatur, GA"));

        let outcome = session.request_weather().await;

        let FetchOutcome::Updated(snapshot) = outcome else {
            panic!("expected an updated snapshot");
        };
        assert_eq!(snapshot.location_name, "Decatur, Georgia, United States");
        assert_eq!((snapshot.temp_c, snapshot.temp_f), (21, 70));
        assert_eq!(session.settings().last_weather.as_ref(), Some(&snapshot));
        assert_eq!(
            session.settings().last_fetch_time,
            h.clock.now().timestamp_millis()
        );
        assert_eq!(h.network_calls(), 2);
        assert_eq!(h.recorder.saves.load(Ordering::SeqCst), 1);
        assert_eq!(h.recorder.renders.load(Ordering::SeqCst), 1);
        assert_eq!(
            h.recorder.last(Severity::Success).as_deref(),
            Some("Weather updated for Decatur, Georgia, United States")
        );
        // auto-inject is off by default
        assert_eq!(h.note.text(), "Tone: cozy");
    }

    #[tokio::test]
    async fn second_fetch_within_a_minute_is_served_from_cache() {
        let h = Harness::new(warm());
        let mut session = h.session(at("Decatur"));

        session.request_weather().await;
        let before = session.settings().last_weather.clone();
        h.clock.advance(15_500);

        let outcome = session.request_weather().await;

        assert!(matches!(outcome, FetchOutcome::Cached { seconds_remaining: 45 }));
        assert_eq!(h.network_calls(), 2);
        assert_eq!(session.settings().last_weather, before);
        assert_eq!(
            h.recorder.last(Severity::Info).as_deref(),
            Some("Using cached weather data. Next fetch available in 45 seconds.")
        );
    }

    #[tokio::test]
    async fn fetch_after_a_minute_hits_the_network_again() {
        let h = Harness::new(warm());
        let mut session = h.session(at("Decatur"));

        session.request_weather().await;
        h.clock.advance(60_000);
        let outcome = session.request_weather().await;

        assert!(matches!(outcome, FetchOutcome::Updated(_)));
        assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.forecast.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn coordinates_only_call_the_forecast() {
        let h = Harness::new(warm());
        let mut session = h.session(at("33.7748,-84.2963"));

        session.request_weather().await;

        assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.forecast.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn location_change_lifts_the_gate() {
        let h = Harness::new(warm());
        let mut session = h.session(at("Decatur"));
        session.request_weather().await;

        session.set_location("DECATUR");
        assert_ne!(session.settings().last_fetch_time, 0);
        assert!(matches!(
            session.request_weather().await,
            FetchOutcome::Cached { .. }
        ));

        session.set_location("Atlanta");
        assert_eq!(session.settings().last_fetch_time, 0);
        assert!(matches!(
            session.request_weather().await,
            FetchOutcome::Updated(_)
        ));
    }

    #[tokio::test]
    async fn clearing_then_retyping_same_place_keeps_gate() {
        let h = Harness::new(warm());
        let mut session = h.session(at("Decatur"));
        session.request_weather().await;
        let fetched_at = session.settings().last_fetch_time;

        session.set_location("");
        session.set_location("decatur");

        assert_eq!(session.settings().last_fetch_time, fetched_at);
        assert_eq!(session.settings().location, "decatur");
    }

    #[tokio::test]
    async fn failure_leaves_settings_untouched() {
        let h = Harness::new(FakeForecast {
            fail: true,
            ..Default::default()
        });
        let mut session = h.session(at("Decatur"));
        let before = session.settings().clone();

        let outcome = session.request_weather().await;

        assert!(matches!(outcome, FetchOutcome::Failed(WeatherError::Network(_))));
        assert_eq!(session.settings(), &before);
        assert_eq!(h.recorder.saves.load(Ordering::SeqCst), 0);
        assert_eq!(
            h.recorder.last(Severity::Error).as_deref(),
            Some("Failed to fetch weather data. Check logs for details.")
        );
    }

    #[tokio::test]
    async fn unknown_place_shows_guidance() {
        let h = Harness::new(warm());
        let geocoder = Arc::new(FakeGeocoder::default());
        let host = HostBindings {
            store: h.recorder.clone(),
            notifier: h.recorder.clone(),
            display: h.recorder.clone(),
            author_note: h.note.clone(),
            compose_box: h.compose.clone(),
        };
        let mut session =
            WeatherSession::new(at("Atlantis"), geocoder, h.forecast.clone(), host);

        let outcome = session.request_weather().await;

        assert!(matches!(
            outcome,
            FetchOutcome::Failed(WeatherError::LocationNotFound { .. })
        ));
        assert_eq!(h.forecast.calls.load(Ordering::SeqCst), 0);
        let msg = h.recorder.last(Severity::Error).unwrap();
        assert!(msg.contains("Paris, France"));
    }

    #[tokio::test]
    async fn region_mismatch_warns_but_succeeds() {
        let h = Harness::new(warm());
        let mut session = h.session(at("Decatur, Texas"));

        let outcome = session.request_weather().await;

        assert!(matches!(outcome, FetchOutcome::Updated(_)));
        let warning = h.recorder.last(Severity::Warning).unwrap();
        assert!(warning.contains("Decatur, Georgia, United States"));
    }

    #[tokio::test]
    async fn auto_inject_replaces_then_strips() {
        let h = Harness::new(warm());
        let mut session = h.session(Settings {
            auto_inject: true,
            ..at("Decatur")
        });

        session.request_weather().await;
        assert_eq!(
            h.note.text(),
            "Tone: cozy\nCurrent Weather in Decatur, Georgia, United States: Clear sky, 70°F, Humidity: 50%, Wind: 6 mph"
        );

        h.clock.advance(61_000);
        session.request_weather().await;
        assert_eq!(h.note.text().matches(note::SENTINEL).count(), 1);

        session.set_use_celsius(true);
        assert!(h.note.text().ends_with("21°C, Humidity: 50%, Wind: 10 km/h"));

        session.set_auto_inject(false);
        assert_eq!(h.note.text(), "Tone: cozy");
    }

    #[tokio::test]
    async fn enabling_auto_inject_writes_existing_snapshot() {
        let h = Harness::new(warm());
        let mut session = h.session(at("Decatur"));
        session.request_weather().await;
        assert_eq!(h.note.text(), "Tone: cozy");

        session.set_auto_inject(true);

        assert!(h.note.text().starts_with("Tone: cozy\nCurrent Weather in Decatur"));
        assert!(session.settings().auto_inject);
    }

    #[tokio::test]
    async fn insert_requires_a_snapshot() {
        let h = Harness::new(warm());
        let session = h.session(at("Decatur"));

        let err = session.insert_into_compose_box().unwrap_err();

        assert!(matches!(err, WeatherError::NoCachedWeather));
        assert_eq!(h.compose.text(), "");
        assert!(h.recorder.last(Severity::Warning).is_some());
    }

    #[tokio::test]
    async fn insert_appends_on_a_new_line() {
        let h = Harness::new(warm());
        let mut session = h.session(at("Decatur"));
        session.request_weather().await;

        session.insert_into_compose_box().unwrap();
        assert_eq!(
            h.compose.text(),
            "[Weather in Decatur, Georgia, United States: Clear sky, 70°F, humidity 50%, wind 6 mph]"
        );

        h.compose.write("Look outside:".into());
        session.set_use_celsius(true);
        let line = session.insert_into_compose_box().unwrap();
        assert_eq!(h.compose.text(), format!("Look outside:\n{line}"));
        assert!(line.contains("21°C"));
    }

    #[tokio::test]
    async fn overlapping_fetch_is_rejected() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let h = Harness::new(FakeForecast {
            temperature: 20.6,
            started: Some(started.clone()),
            release: Some(release.clone()),
            ..Default::default()
        });
        let shared = SharedSession::new(h.session(at("Decatur")));

        let first = {
            let shared = shared.clone();
            tokio::spawn(async move { shared.request_weather().await })
        };
        started.notified().await;

        let second = shared.request_weather().await;
        assert!(matches!(second, FetchOutcome::Failed(WeatherError::FetchInProgress)));
        assert_eq!(h.forecast.calls.load(Ordering::SeqCst), 1);

        release.notify_one();
        let first = first.await.unwrap();
        assert!(matches!(first, FetchOutcome::Updated(_)));
        assert!(shared.settings().await.last_weather.is_some());
        assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refetch_geocodes_then_forecasts_the_selected_place() {
        let h = Harness::with_candidates(
            warm(),
            vec![
                place("Columbus", "Ohio", 39.96, -82.99),
                place("Columbus", "Georgia", 32.46, -84.98),
            ],
        );
        let mut session = h.session(at("Columbus, GA"));

        session.request_weather().await;
        h.clock.advance(60_000);
        h.log.lock().unwrap().clear();
        h.forecast.coords.lock().unwrap().clear();

        let outcome = session.request_weather().await;

        assert!(matches!(outcome, FetchOutcome::Updated(_)));
        assert_eq!(*h.log.lock().unwrap(), vec!["geocode", "forecast"]);
        assert_eq!(*h.forecast.coords.lock().unwrap(), vec![(32.46, -84.98)]);
        assert_eq!(
            session.settings().last_weather.as_ref().map(|w| w.location_name.as_str()),
            Some("Columbus, Georgia, United States")
        );
    }

    #[tokio::test]
    async fn last_fetch_time_is_the_request_instant() {
        let h = Harness::new(warm());
        let mut session = h.session(at("Decatur"));
        let requested_at = h.clock.now().timestamp_millis();

        session.request_weather().await;

        assert_eq!(session.settings().last_fetch_time, requested_at);
    }

    #[tokio::test]
    async fn unreadable_note_is_never_overwritten() {
        let h = Harness::new(warm());
        let note = Arc::new(UnreadableText::default());
        let mut session = h.session_with_note(
            Settings {
                auto_inject: true,
                ..at("Decatur")
            },
            note.clone(),
        );

        let outcome = session.request_weather().await;
        session.set_use_celsius(true);
        session.set_auto_inject(false);

        assert!(matches!(outcome, FetchOutcome::Updated(_)));
        assert_eq!(note.writes.load(Ordering::SeqCst), 0);
        let warning = h.recorder.last(Severity::Warning).unwrap();
        assert!(warning.starts_with("Could not read the author's note"));
    }

    #[tokio::test]
    async fn shared_session_forwards_toggles() {
        let h = Harness::new(warm());
        let shared = SharedSession::new(h.session(at("Decatur")));
        shared.request_weather().await;

        shared.set_location("Atlanta").await;
        shared.set_use_celsius(true).await;
        shared.set_auto_inject(true).await;
        shared.show().await;

        let settings = shared.settings().await;
        assert_eq!(settings.location, "Atlanta");
        assert_eq!(settings.last_fetch_time, 0);
        assert!(settings.use_celsius);
        assert!(settings.auto_inject);
        assert!(h.note.text().ends_with("21°C, Humidity: 50%, Wind: 10 km/h"));
    }
}
