//! Browser seam — the traits the renderer drives, and the page/print option types
//! passed across them.
//!
//! `PdfRenderer` only ever talks to a `BrowserLauncher`. The production backend is
//! `chromium::ChromiumLauncher`; tests swap in a recording fake.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("no page is open in this browser session")]
    NoPage,

    #[error("browser protocol error: {0}")]
    Protocol(String),

    #[error("invalid page geometry: {0}")]
    Geometry(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Page geometry and print options
// ────────────────────────────────────────────────────────────────────────────

/// Viewport applied to the page before the document is loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
}

/// One A4 page at ~150 DPI. Keeps `vw`/`vh` based layouts stable whatever
/// paper size is printed later.
pub const A4_VIEWPORT: Viewport = Viewport {
    width: 1240,
    height: 1754,
    device_scale_factor: 1.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Screen,
    Print,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Screen => "screen",
            MediaType::Print => "print",
        }
    }
}

/// Paper dimensions in inches, the unit the DevTools print call expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperSize {
    pub width_in: f64,
    pub height_in: f64,
}

pub const A4: PaperSize = PaperSize {
    width_in: 8.27,
    height_in: 11.69,
};

/// Page margins as CSS length strings (`"20mm"`, `"0.5in"`, `"12px"`).
/// Values are carried verbatim; only the browser backend converts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMargins {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top: "20mm".to_string(),
            right: "16mm".to_string(),
            bottom: "20mm".to_string(),
            left: "16mm".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfOptions {
    pub paper: PaperSize,
    pub print_background: bool,
    /// Let `@page { size: ... }` in the document win over `paper`.
    pub prefer_css_page_size: bool,
    pub margins: PageMargins,
}

impl PdfOptions {
    pub fn a4(margins: PageMargins) -> Self {
        Self {
            paper: A4,
            print_background: true,
            prefer_css_page_size: true,
            margins,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Network quiescence
// ────────────────────────────────────────────────────────────────────────────

/// How long the page must be free of in-flight requests, and how long we are
/// willing to wait for that to happen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkIdle {
    pub quiet_window: Duration,
    pub timeout: Duration,
}

impl NetworkIdle {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            quiet_window: Duration::from_millis(500),
            timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    RequestStarted(String),
    RequestSettled(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quiescence {
    Settled,
    TimedOut { in_flight: usize },
}

/// Consumes page network events until no request has been in flight for
/// `idle.quiet_window`, or `idle.timeout` runs out.
pub async fn wait_for_quiescence<S>(mut events: S, idle: NetworkIdle) -> Quiescence
where
    S: Stream<Item = NetworkEvent> + Unpin,
{
    let deadline = Instant::now() + idle.timeout;
    let mut in_flight: HashSet<String> = HashSet::new();

    loop {
        let window_end = (Instant::now() + idle.quiet_window).min(deadline);
        match tokio::time::timeout_at(window_end, events.next()).await {
            Ok(Some(NetworkEvent::RequestStarted(id))) => {
                in_flight.insert(id);
            }
            Ok(Some(NetworkEvent::RequestSettled(id))) => {
                in_flight.remove(&id);
            }
            // Listener closed: nothing more will arrive.
            Ok(None) => {
                return if in_flight.is_empty() {
                    Quiescence::Settled
                } else {
                    Quiescence::TimedOut {
                        in_flight: in_flight.len(),
                    }
                };
            }
            Err(_) => {
                if in_flight.is_empty() && window_end < deadline {
                    return Quiescence::Settled;
                }
                if Instant::now() >= deadline {
                    return if in_flight.is_empty() {
                        Quiescence::Settled
                    } else {
                        Quiescence::TimedOut {
                            in_flight: in_flight.len(),
                        }
                    };
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Traits
// ────────────────────────────────────────────────────────────────────────────

/// Starts a fresh, exclusively-owned browser process per call.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// One browser process and at most one page inside it.
///
/// `close` must be called exactly once when the caller is done, whatever the
/// outcome of the page operations.
#[async_trait]
pub trait BrowserSession: Send {
    async fn open_page(&mut self) -> Result<(), BrowserError>;

    async fn set_viewport(&mut self, viewport: Viewport) -> Result<(), BrowserError>;

    /// Loads `html` into the page and waits for network quiescence.
    async fn load_html(&mut self, html: &str, idle: NetworkIdle)
        -> Result<Quiescence, BrowserError>;

    async fn emulate_media(&mut self, media: MediaType) -> Result<(), BrowserError>;

    async fn inject_style(&mut self, css: &str) -> Result<(), BrowserError>;

    async fn print_pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>, BrowserError>;

    async fn close(&mut self) -> Result<(), BrowserError>;
}
