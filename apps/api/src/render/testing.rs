//! Recording browser backend for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::render::browser::{
    BrowserError, BrowserLauncher, BrowserSession, MediaType, NetworkIdle, PdfOptions, Quiescence,
    Viewport,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Launch,
    OpenPage,
    SetViewport(Viewport),
    LoadHtml(String),
    EmulateMedia(MediaType),
    InjectStyle(String),
    PrintPdf(PdfOptions),
    Close,
    /// The session value was dropped, on any exit path.
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Launch,
    LoadHtml,
    PrintPdf,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    None,
    Fail(Step),
    Hang(Step),
}

#[derive(Clone)]
pub struct FakeLauncher {
    calls: Arc<Mutex<Vec<Call>>>,
    fault: Fault,
    pdf: Option<Vec<u8>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self {
            calls: Arc::default(),
            fault: Fault::None,
            pdf: None,
        }
    }

    pub fn failing_at(step: Step) -> Self {
        Self {
            fault: Fault::Fail(step),
            ..Self::new()
        }
    }

    pub fn hanging_at(step: Step) -> Self {
        Self {
            fault: Fault::Hang(step),
            ..Self::new()
        }
    }

    pub fn with_pdf(pdf: Vec<u8>) -> Self {
        Self {
            pdf: Some(pdf),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::Close).count()
    }

    pub fn dropped_count(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::Dropped).count()
    }

    pub fn printed_options(&self) -> Vec<PdfOptions> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::PrintPdf(options) => Some(options),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Stands in for a PDF: deterministic bytes derived from the loaded document.
fn fake_pdf(document: &str) -> Vec<u8> {
    format!("%PDF-1.7\n% {} bytes of html\n%%EOF\n", document.len()).into_bytes()
}

async fn apply(fault: Fault, step: Step) -> Result<(), BrowserError> {
    match fault {
        Fault::Fail(s) if s == step => Err(BrowserError::Protocol(format!("{step:?} failed"))),
        Fault::Hang(s) if s == step => std::future::pending().await,
        _ => Ok(()),
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        self.record(Call::Launch);
        apply(self.fault, Step::Launch)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;
        Ok(Box::new(FakeSession {
            launcher: self.clone(),
            document: String::new(),
        }))
    }
}

struct FakeSession {
    launcher: FakeLauncher,
    document: String,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn open_page(&mut self) -> Result<(), BrowserError> {
        self.launcher.record(Call::OpenPage);
        Ok(())
    }

    async fn set_viewport(&mut self, viewport: Viewport) -> Result<(), BrowserError> {
        self.launcher.record(Call::SetViewport(viewport));
        Ok(())
    }

    async fn load_html(
        &mut self,
        html: &str,
        _idle: NetworkIdle,
    ) -> Result<Quiescence, BrowserError> {
        self.launcher.record(Call::LoadHtml(html.to_string()));
        apply(self.launcher.fault, Step::LoadHtml).await?;
        self.document = html.to_string();
        Ok(Quiescence::Settled)
    }

    async fn emulate_media(&mut self, media: MediaType) -> Result<(), BrowserError> {
        self.launcher.record(Call::EmulateMedia(media));
        Ok(())
    }

    async fn inject_style(&mut self, css: &str) -> Result<(), BrowserError> {
        self.launcher.record(Call::InjectStyle(css.to_string()));
        Ok(())
    }

    async fn print_pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>, BrowserError> {
        self.launcher.record(Call::PrintPdf(options.clone()));
        apply(self.launcher.fault, Step::PrintPdf).await?;
        Ok(self
            .launcher
            .pdf
            .clone()
            .unwrap_or_else(|| fake_pdf(&self.document)))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.launcher.record(Call::Close);
        apply(self.launcher.fault, Step::Close).await
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.launcher.record(Call::Dropped);
    }
}
