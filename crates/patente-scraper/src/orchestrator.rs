//! The lookup state machine driving the target site.
//!
//! One `search_by_plate` call is one deterministic attempt: navigate to
//! the home page, check for a block, submit the search form, check again,
//! extract. No internal retries or memoization; retry and caching policy
//! belong one layer up. The browser session is closed on every exit path
//! unless explicitly kept warm for a subsequent call.

use crate::diagnostics::{Checkpoint, DiagnosticsSink};
use crate::error::{Result, ScrapeError};
use crate::{block, extractor};
use patente_browser::{BrowserSession, SessionConfig};
use patente_core::config::{BrowserConfig, ScraperConfig};
use patente_core::{PlateNumber, VehicleRecord};
use rand::Rng;
use std::time::Duration;

/// Search input on the home page.
const PLATE_INPUT_SELECTOR: &str = r#"input[name="patente"]"#;

/// Submit control of the search form.
const SUBMIT_SELECTOR: &str = r#"button[type="submit"]"#;

/// Drives one plate search against the target site.
///
/// Not shareable across concurrent lookups; each in-flight lookup owns
/// its own scraper and therefore its own browser session.
pub struct PlateScraper {
    base_url: String,
    wait_min_ms: u64,
    wait_max_ms: u64,
    keep_session_alive: bool,
    session_config: SessionConfig,
    session: Option<BrowserSession>,
    diagnostics: Option<Box<dyn DiagnosticsSink>>,
}

impl PlateScraper {
    /// Scraper with default browser and flow settings.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&BrowserConfig::default(), &ScraperConfig::default())
    }

    /// Scraper configured from the application config sections.
    ///
    /// An inverted wait range is clamped so the upper bound is never
    /// below the lower; the config layer does not validate this.
    #[must_use]
    pub fn from_config(browser: &BrowserConfig, scraper: &ScraperConfig) -> Self {
        let wait_min_ms = scraper.wait_min_ms;
        let wait_max_ms = if scraper.wait_max_ms < wait_min_ms {
            tracing::warn!(
                wait_min_ms,
                wait_max_ms = scraper.wait_max_ms,
                "wait_max_ms below wait_min_ms, clamping to the lower bound"
            );
            wait_min_ms
        } else {
            scraper.wait_max_ms
        };

        let session_config = SessionConfig {
            headless: browser.headless,
            navigation_timeout: Duration::from_secs(browser.navigation_timeout_secs),
            element_timeout: Duration::from_secs(browser.element_timeout_secs),
            typing_delay: Duration::from_millis(scraper.typing_delay_ms),
            filter_resources: browser.filter_resources,
            ..SessionConfig::default()
        };

        Self {
            base_url: scraper.base_url.clone(),
            wait_min_ms,
            wait_max_ms,
            keep_session_alive: scraper.keep_session_alive,
            session_config,
            session: None,
            diagnostics: None,
        }
    }

    /// Attach a diagnostics sink invoked at pipeline checkpoints.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: Box<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Run one full search for a plate.
    ///
    /// Lazily opens a session if none is owned yet. Two calls with the
    /// same plate perform two independent full navigations. The session
    /// is closed before returning, success or failure, unless configured
    /// to stay warm and the call succeeded.
    pub async fn search_by_plate(&mut self, plate: &PlateNumber) -> Result<VehicleRecord> {
        if self.session.is_none() {
            self.session = Some(BrowserSession::open(self.session_config.clone()).await?);
        }

        let result = self.run_search(plate).await;

        if let Err(e) = &result {
            tracing::warn!(plate = %plate, error = %e, "plate search failed");
            if !matches!(e, ScrapeError::Blocked { .. }) {
                self.capture_screenshot(Checkpoint::Failed).await;
            }
        }

        if !(self.keep_session_alive && result.is_ok()) {
            self.close_session().await;
        }

        result
    }

    /// Whether a successful call leaves the session open for the next one.
    #[must_use]
    pub fn keeps_session_alive(&self) -> bool {
        self.keep_session_alive
    }

    /// Close the owned session if one is open. Idempotent.
    pub async fn close_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close().await;
        }
    }

    async fn run_search(&self, plate: &PlateNumber) -> Result<VehicleRecord> {
        tracing::info!(plate = %plate, url = %self.base_url, "starting plate search");

        let base_url = self.base_url.clone();
        self.session()?.navigate(&base_url).await?;
        self.capture_screenshot(Checkpoint::HomeLoaded).await;
        self.human_wait().await;
        self.check_block("home page").await?;

        tracing::debug!(plate = %plate, "submitting search form");
        self.session()?
            .fill_and_submit(PLATE_INPUT_SELECTOR, plate.as_str(), SUBMIT_SELECTOR)
            .await?;
        self.capture_screenshot(Checkpoint::ResultsLoaded).await;
        self.human_wait().await;
        self.check_block("results page").await?;

        let html = self
            .session()?
            .content()
            .await
            .map_err(|e| ScrapeError::Extraction {
                reason: e.to_string(),
            })?;
        if let Some(sink) = &self.diagnostics {
            sink.capture_html(Checkpoint::ResultsLoaded, &html);
        }

        let record = extractor::extract(&html, plate);
        tracing::info!(
            plate = %plate,
            reported = record.is_reported,
            confidence = record.confidence,
            "extraction complete"
        );
        Ok(record)
    }

    async fn check_block(&self, stage: &'static str) -> Result<()> {
        let session = self.session()?;
        let title = session.title().await?;
        let content = session.content().await?;

        if block::is_blocked(&title, &content) {
            tracing::warn!(stage, title = %title, "anti-bot block detected");
            self.capture_screenshot(Checkpoint::Blocked).await;
            return Err(ScrapeError::Blocked { stage });
        }
        Ok(())
    }

    /// Randomized pause between interactions, simulating human timing.
    async fn human_wait(&self) {
        // rng is not Send; sample before the await point
        let wait_ms = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.wait_min_ms..=self.wait_max_ms)
        };
        tracing::debug!(wait_ms, "human-timing pause");
        tokio::time::sleep(Duration::from_millis(wait_ms)).await;
    }

    async fn capture_screenshot(&self, checkpoint: Checkpoint) {
        let Some(sink) = &self.diagnostics else {
            return;
        };
        let Ok(session) = self.session() else {
            return;
        };
        match session.screenshot().await {
            Ok(png) => sink.capture_screenshot(checkpoint, &png),
            Err(e) => tracing::debug!("screenshot failed: {}", e),
        }
    }

    fn session(&self) -> Result<&BrowserSession> {
        self.session
            .as_ref()
            .ok_or(patente_browser::BrowserError::Closed)
            .map_err(ScrapeError::from)
    }
}

impl Default for PlateScraper {
    fn default() -> Self {
        Self::new()
    }
}
