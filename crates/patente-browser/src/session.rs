//! The browser session lifecycle and page operations.

use crate::error::{BrowserError, Result};
use crate::fingerprint::Fingerprint;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams as FetchEnableParams, EventRequestPaused,
    FailRequestParams,
};
use chromiumoxide::cdp::browser_protocol::network::{
    ErrorReason, ResourceType, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Element, Page};
use futures_util::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};

/// How often to re-poll the DOM while waiting for an element.
const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Fixed settle delay after a load event, since the protocol has no
/// reliable network-idle signal for arbitrary pages.
const POST_NAVIGATION_SETTLE: Duration = Duration::from_millis(500);

/// Configuration applied when a session is opened.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// User agent and viewport presented to the target site
    pub fingerprint: Fingerprint,
    /// Run the browser headless
    pub headless: bool,
    /// Per-navigation timeout
    pub navigation_timeout: Duration,
    /// Wait-for-element timeout
    pub element_timeout: Duration,
    /// Delay between typed characters
    pub typing_delay: Duration,
    /// Abort requests for non-essential resource types
    pub filter_resources: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fingerprint: Fingerprint::randomized(),
            headless: true,
            navigation_timeout: Duration::from_secs(30),
            element_timeout: Duration::from_secs(30),
            typing_delay: Duration::from_millis(100),
            filter_resources: true,
        }
    }
}

/// One browser process with one active page.
///
/// A session is an isolated unit of concurrency: it is never shared across
/// in-flight lookups and carries at most one navigation at a time. It must
/// be closed via [`BrowserSession::close`] on every exit path; closing is
/// idempotent.
pub struct BrowserSession {
    browser: Option<Browser>,
    page: Page,
    config: SessionConfig,
    handler_task: JoinHandle<()>,
    intercept_task: Option<JoinHandle<()>>,
}

impl BrowserSession {
    /// Launch a browser process and open a single blank page.
    ///
    /// Applies the fingerprint's user agent and viewport, and, when
    /// configured, installs a request filter that aborts image, stylesheet,
    /// font, and media requests to cut load time and network footprint.
    pub async fn open(config: SessionConfig) -> Result<Self> {
        let fingerprint = config.fingerprint.clone();

        let mut builder = BrowserConfig::builder().no_sandbox().window_size(
            fingerprint.viewport_width,
            fingerprint.viewport_height,
        );
        if !config.headless {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(BrowserError::Chromium)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))?;

        // Drive CDP messages for the lifetime of the session
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))?;

        page.set_user_agent(SetUserAgentOverrideParams::new(
            fingerprint.user_agent.clone(),
        ))
        .await
        .map_err(|e| BrowserError::Chromium(e.to_string()))?;

        let intercept_task = if config.filter_resources {
            Some(Self::install_resource_filter(&page).await?)
        } else {
            None
        };

        tracing::debug!(
            user_agent = %fingerprint.user_agent,
            width = fingerprint.viewport_width,
            height = fingerprint.viewport_height,
            "browser session opened"
        );

        Ok(Self {
            browser: Some(browser),
            page,
            config,
            handler_task,
            intercept_task,
        })
    }

    /// Intercept requests and abort non-essential resource types.
    async fn install_resource_filter(page: &Page) -> Result<JoinHandle<()>> {
        let mut paused = page
            .event_listener::<EventRequestPaused>()
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))?;

        page.execute(FetchEnableParams::default())
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))?;

        let intercept_page = page.clone();
        Ok(tokio::spawn(async move {
            while let Some(event) = paused.next().await {
                let request_id = event.request_id.clone();
                let abort = matches!(
                    event.resource_type,
                    ResourceType::Image
                        | ResourceType::Stylesheet
                        | ResourceType::Font
                        | ResourceType::Media
                );
                let outcome = if abort {
                    intercept_page
                        .execute(FailRequestParams::new(request_id, ErrorReason::Aborted))
                        .await
                        .map(|_| ())
                } else {
                    intercept_page
                        .execute(ContinueRequestParams::new(request_id))
                        .await
                        .map(|_| ())
                };
                if let Err(e) = outcome {
                    tracing::trace!("resource filter: {}", e);
                }
            }
        }))
    }

    /// Navigate the page and wait for the load event, bounded by the
    /// configured navigation timeout.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        self.ensure_open()?;
        tracing::debug!(url, "navigating");

        let navigation = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<(), chromiumoxide::error::CdpError>(())
        };

        match timeout(self.config.navigation_timeout, navigation).await {
            Ok(Ok(())) => {
                sleep(POST_NAVIGATION_SETTLE).await;
                Ok(())
            }
            Ok(Err(e)) => Err(BrowserError::Navigation(e.to_string())),
            Err(_) => Err(BrowserError::Timeout {
                operation: format!("navigation to {url}"),
                timeout: self.config.navigation_timeout,
            }),
        }
    }

    /// Read the current page title.
    pub async fn title(&self) -> Result<String> {
        self.ensure_open()?;
        Ok(self
            .page
            .get_title()
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))?
            .unwrap_or_default())
    }

    /// Read the full rendered markup of the current page.
    pub async fn content(&self) -> Result<String> {
        self.ensure_open()?;
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))
    }

    /// Wait until an element matching `selector` exists in the DOM.
    pub async fn wait_for_element(&self, selector: &str) -> Result<()> {
        self.ensure_open()?;
        self.wait_for(selector).await.map(|_| ())
    }

    /// Fill the target control character by character and submit, then wait
    /// for the resulting navigation to settle.
    ///
    /// Both controls must appear in the DOM within the element timeout or
    /// the call fails with [`BrowserError::ElementNotFound`].
    pub async fn fill_and_submit(
        &self,
        input_selector: &str,
        value: &str,
        submit_selector: &str,
    ) -> Result<()> {
        self.ensure_open()?;

        let input = self.wait_for(input_selector).await?;
        input
            .click()
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))?;
        for ch in value.chars() {
            input
                .type_str(ch.to_string())
                .await
                .map_err(|e| BrowserError::Chromium(e.to_string()))?;
            sleep(self.config.typing_delay).await;
        }

        let submit = self.wait_for(submit_selector).await?;
        tracing::debug!(submit_selector, "submitting form");

        let submission = async {
            submit.click().await?;
            self.page.wait_for_navigation().await?;
            Ok::<(), chromiumoxide::error::CdpError>(())
        };

        match timeout(self.config.navigation_timeout, submission).await {
            Ok(Ok(())) => {
                sleep(POST_NAVIGATION_SETTLE).await;
                Ok(())
            }
            Ok(Err(e)) => Err(BrowserError::Navigation(e.to_string())),
            Err(_) => Err(BrowserError::Timeout {
                operation: "form submission".to_string(),
                timeout: self.config.navigation_timeout,
            }),
        }
    }

    /// Capture a PNG screenshot of the current page.
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        self.ensure_open()?;
        self.page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .build(),
            )
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))
    }

    /// Release the underlying browser process.
    ///
    /// Safe to call multiple times; only the first call does work.
    pub async fn close(&mut self) {
        if let Some(mut browser) = self.browser.take() {
            if let Some(task) = self.intercept_task.take() {
                task.abort();
            }
            if let Err(e) = browser.close().await {
                tracing::debug!("browser close: {}", e);
            }
            if let Err(e) = browser.wait().await {
                tracing::debug!("browser wait: {}", e);
            }
            self.handler_task.abort();
            tracing::debug!("browser session closed");
        }
    }

    /// Whether the session has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.browser.is_none()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.browser.is_some() {
            Ok(())
        } else {
            Err(BrowserError::Closed)
        }
    }

    async fn wait_for(&self, selector: &str) -> Result<Element> {
        let deadline = tokio::time::Instant::now() + self.config.element_timeout;
        loop {
            match self.page.find_element(selector).await {
                Ok(element) => return Ok(element),
                Err(_) if tokio::time::Instant::now() < deadline => {
                    sleep(ELEMENT_POLL_INTERVAL).await;
                }
                Err(_) => {
                    return Err(BrowserError::ElementNotFound {
                        selector: selector.to_string(),
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_defaults() {
        let config = SessionConfig::default();
        assert!(config.headless);
        assert!(config.filter_resources);
        assert_eq!(config.navigation_timeout, Duration::from_secs(30));
        assert_eq!(config.element_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_user_agent_override_params_construct() {
        // Network-domain params, the type Page::set_user_agent accepts
        let params = SetUserAgentOverrideParams::new("test-agent");
        assert_eq!(params.user_agent, "test-agent");
    }

    #[test]
    fn test_poll_interval_below_timeout() {
        let config = SessionConfig::default();
        assert!(ELEMENT_POLL_INTERVAL < config.element_timeout);
    }
}
