//! Chromium backend over the DevTools protocol (`chromiumoxide`).
//!
//! Each launch gets its own process and its own throwaway profile directory, so
//! concurrent renders never share browser state.

use std::path::PathBuf;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetDeviceMetricsOverrideParams, SetEmulatedMediaParams,
};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::render::browser::{
    wait_for_quiescence, BrowserError, BrowserLauncher, BrowserSession, MediaType, NetworkEvent,
    NetworkIdle, PageMargins, PdfOptions, Quiescence, Viewport, A4_VIEWPORT,
};

const PROFILE_PREFIX: &str = "cv-api-chrome-";

/// Flags for hosts (containers, serverless) without a usable Chrome sandbox.
const SANDBOXLESS_ARGS: &[&str] = &[
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--no-first-run",
    "--no-zygote",
    "--font-render-hinting=none",
];

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        BrowserError::Protocol(e.to_string())
    }
}

pub struct ChromiumLauncher {
    executable: Option<PathBuf>,
}

impl ChromiumLauncher {
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let profile_dir = profile_dir()
            .map_err(|e| BrowserError::Launch(format!("cannot create profile dir: {e}")))?;

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .args(SANDBOXLESS_ARGS.iter().copied())
            .window_size(A4_VIEWPORT.width, A4_VIEWPORT.height)
            .user_data_dir(profile_dir.path());
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The handler drives the websocket; the browser is unusable without it.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler stopped: {e}");
                    break;
                }
            }
        });

        debug!("Chromium launched with profile {}", profile_dir.path().display());
        Ok(Box::new(ChromiumSession {
            browser,
            handler,
            page: None,
            profile_dir: Some(profile_dir),
            closed: false,
        }))
    }
}

pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
    /// Removed by `close`, or by its own drop when the session is abandoned.
    profile_dir: Option<TempDir>,
    closed: bool,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, BrowserError> {
        self.page.as_ref().ok_or(BrowserError::NoPage)
    }

    async fn network_events(page: &Page) -> Result<BoxStream<'static, NetworkEvent>, BrowserError> {
        page.execute(EnableParams::default()).await?;

        let started = page
            .event_listener::<EventRequestWillBeSent>()
            .await?
            .map(|e| NetworkEvent::RequestStarted(e.request_id.inner().clone()));
        let finished = page
            .event_listener::<EventLoadingFinished>()
            .await?
            .map(|e| NetworkEvent::RequestSettled(e.request_id.inner().clone()));
        let failed = page
            .event_listener::<EventLoadingFailed>()
            .await?
            .map(|e| NetworkEvent::RequestSettled(e.request_id.inner().clone()));

        Ok(stream::select_all([started.boxed(), finished.boxed(), failed.boxed()]).boxed())
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn open_page(&mut self) -> Result<(), BrowserError> {
        let page = self.browser.new_page("about:blank").await?;
        self.page = Some(page);
        Ok(())
    }

    async fn set_viewport(&mut self, viewport: Viewport) -> Result<(), BrowserError> {
        let params = SetDeviceMetricsOverrideParams::new(
            i64::from(viewport.width),
            i64::from(viewport.height),
            viewport.device_scale_factor,
            false,
        );
        self.page()?.execute(params).await?;
        Ok(())
    }

    async fn load_html(
        &mut self,
        html: &str,
        idle: NetworkIdle,
    ) -> Result<Quiescence, BrowserError> {
        let page = self.page()?;
        // Subscribe before loading so early font/image requests are counted.
        let events = Self::network_events(page).await?;
        page.set_content(html).await?;
        Ok(wait_for_quiescence(events, idle).await)
    }

    async fn emulate_media(&mut self, media: MediaType) -> Result<(), BrowserError> {
        let params = SetEmulatedMediaParams::builder()
            .media(media.as_str())
            .build();
        self.page()?.execute(params).await?;
        Ok(())
    }

    async fn inject_style(&mut self, css: &str) -> Result<(), BrowserError> {
        let css = serde_json::to_string(css)
            .map_err(|e| BrowserError::Protocol(format!("cannot encode style: {e}")))?;
        let script = format!(
            "(() => {{ const s = document.createElement('style'); s.textContent = {css}; \
             (document.head || document.documentElement).appendChild(s); }})()"
        );
        self.page()?.evaluate(script).await?;
        Ok(())
    }

    async fn print_pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>, BrowserError> {
        let params = print_params(options)?;
        Ok(self.page()?.pdf(params).await?)
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }

        let result = self.browser.close().await;
        if result.is_err() {
            // Crashed or disconnected browser: make sure the process is gone.
            if let Some(Err(e)) = self.browser.kill().await {
                warn!("Failed to kill browser process: {e}");
            }
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to reap browser process: {e}");
        }
        self.handler.abort();
        self.closed = true;

        if let Some(dir) = self.profile_dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                debug!("Could not remove {}: {e}", path.display());
            }
        }

        result.map(|_| ()).map_err(BrowserError::from)
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler.abort();
        if !self.closed {
            // The child is spawned kill-on-drop; dropping `browser` ends it and
            // dropping `profile_dir` removes the profile.
            warn!("Browser session dropped without close; process will be killed");
        }
    }
}

fn profile_dir() -> std::io::Result<TempDir> {
    tempfile::Builder::new().prefix(PROFILE_PREFIX).tempdir()
}

fn print_params(options: &PdfOptions) -> Result<PrintToPdfParams, BrowserError> {
    let PageMargins {
        top,
        right,
        bottom,
        left,
    } = &options.margins;

    Ok(PrintToPdfParams {
        print_background: Some(options.print_background),
        prefer_css_page_size: Some(options.prefer_css_page_size),
        paper_width: Some(options.paper.width_in),
        paper_height: Some(options.paper.height_in),
        margin_top: Some(css_length_to_inches(top)?),
        margin_right: Some(css_length_to_inches(right)?),
        margin_bottom: Some(css_length_to_inches(bottom)?),
        margin_left: Some(css_length_to_inches(left)?),
        ..Default::default()
    })
}

/// Converts a CSS absolute length to inches. Unitless numbers are pixels.
pub fn css_length_to_inches(value: &str) -> Result<f64, BrowserError> {
    let value = value.trim();
    let split = value
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);

    let number: f64 = number
        .trim()
        .parse()
        .map_err(|_| BrowserError::Geometry(format!("invalid length '{value}'")))?;
    if !number.is_finite() || number < 0.0 {
        return Err(BrowserError::Geometry(format!("invalid length '{value}'")));
    }

    let per_inch = match unit.to_ascii_lowercase().as_str() {
        "" | "px" => 96.0,
        "in" => 1.0,
        "cm" => 2.54,
        "mm" => 25.4,
        "pt" => 72.0,
        "pc" => 6.0,
        other => {
            return Err(BrowserError::Geometry(format!(
                "unsupported unit '{other}' in '{value}'"
            )))
        }
    };
    Ok(number / per_inch)
}
