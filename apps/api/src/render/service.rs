//! PDF Renderer — drives one headless browser per request from HTML to PDF bytes.
//!
//! Every session that launches is closed exactly once, on success, on error and
//! on timeout. The overall deadline covers launch and page work; closing has its
//! own short bound so a wedged browser cannot hold the response.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::render::browser::{
    BrowserError, BrowserLauncher, BrowserSession, MediaType, NetworkIdle, PdfOptions, Quiescence,
    A4_VIEWPORT,
};
use crate::render::error::RenderError;
use crate::render::request::RenderJob;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Forces an opaque page and stops the print engine from dropping background
/// colours and images.
pub const PRINT_COLOR_CSS: &str = "\
html, body { background: #ffffff; }
* { -webkit-print-color-adjust: exact !important; print-color-adjust: exact !important; color-adjust: exact !important; }";

#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    /// Wall-clock ceiling for launch + page work.
    pub render_timeout: Duration,
    pub network_idle: NetworkIdle,
    /// Emulate `screen` instead of `print` media while exporting. Resume
    /// templates hide their accent colours and backgrounds under `@media print`;
    /// screen emulation keeps the designed look in the PDF.
    pub emulate_screen_media_for_print: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render_timeout: Duration::from_secs(60),
            network_idle: NetworkIdle::with_timeout(Duration::from_secs(15)),
            emulate_screen_media_for_print: true,
        }
    }
}

impl RenderSettings {
    fn media_type(&self) -> MediaType {
        if self.emulate_screen_media_for_print {
            MediaType::Screen
        } else {
            MediaType::Print
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub pdf: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

#[derive(Clone)]
pub struct PdfRenderer {
    launcher: Arc<dyn BrowserLauncher>,
    settings: RenderSettings,
}

impl PdfRenderer {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, settings: RenderSettings) -> Self {
        Self { launcher, settings }
    }

    pub async fn render(&self, job: RenderJob) -> Result<RenderedDocument, RenderError> {
        let limit = self.settings.render_timeout;
        let deadline = Instant::now() + limit;

        let mut session = match timeout_at(deadline, self.launcher.launch()).await {
            Ok(Ok(session)) => session,
            Ok(Err(e)) => return Err(RenderError::Infrastructure(e.to_string())),
            Err(_) => return Err(RenderError::Timeout(limit)),
        };
        debug!("Browser launched for '{}'", job.file_stem);

        let outcome = timeout_at(deadline, self.drive(session.as_mut(), &job)).await;
        release(session.as_mut()).await;

        let pdf = match outcome {
            Ok(Ok(pdf)) => pdf,
            Ok(Err(e)) => return Err(RenderError::Rendering(e.to_string())),
            Err(_) => return Err(RenderError::Timeout(limit)),
        };
        if pdf.is_empty() {
            return Err(RenderError::Rendering(
                "browser returned an empty PDF".to_string(),
            ));
        }

        info!("Rendered '{}' ({} bytes)", job.file_stem, pdf.len());
        Ok(RenderedDocument {
            pdf,
            filename: format!("{}.pdf", job.file_stem),
            content_type: PDF_CONTENT_TYPE,
        })
    }

    async fn drive(
        &self,
        session: &mut dyn BrowserSession,
        job: &RenderJob,
    ) -> Result<Vec<u8>, BrowserError> {
        session.open_page().await?;
        session.set_viewport(A4_VIEWPORT).await?;

        match session
            .load_html(&job.document, self.settings.network_idle)
            .await?
        {
            Quiescence::Settled => debug!("Page network settled"),
            Quiescence::TimedOut { in_flight } => warn!(
                "Network still busy after {:?} ({in_flight} requests in flight); rendering anyway",
                self.settings.network_idle.timeout
            ),
        }

        session.emulate_media(self.settings.media_type()).await?;
        session.inject_style(PRINT_COLOR_CSS).await?;
        session
            .print_pdf(&PdfOptions::a4(job.margins.clone()))
            .await
    }
}

async fn release(session: &mut dyn BrowserSession) {
    match timeout(CLOSE_TIMEOUT, session.close()).await {
        Ok(Ok(())) => debug!("Browser closed"),
        Ok(Err(e)) => warn!("Browser close reported an error: {e}"),
        Err(_) => warn!("Browser close did not finish within {CLOSE_TIMEOUT:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::browser::PageMargins;
    use crate::render::testing::{Call, FakeLauncher, Step};

    fn job(document: &str) -> RenderJob {
        RenderJob {
            document: document.to_string(),
            file_stem: "cv".to_string(),
            margins: PageMargins::default(),
        }
    }

    fn renderer(fake: &FakeLauncher) -> PdfRenderer {
        PdfRenderer::new(Arc::new(fake.clone()), RenderSettings::default())
    }

    #[tokio::test]
    async fn test_render_runs_the_full_sequence() {
        let fake = FakeLauncher::new();
        let doc = renderer(&fake).render(job("<p>Hi</p>")).await.unwrap();

        assert_eq!(doc.content_type, "application/pdf");
        assert_eq!(doc.filename, "cv.pdf");
        assert!(doc.pdf.starts_with(b"%PDF"));

        let calls = fake.calls();
        assert_eq!(
            calls,
            vec![
                Call::Launch,
                Call::OpenPage,
                Call::SetViewport(A4_VIEWPORT),
                Call::LoadHtml("<p>Hi</p>".to_string()),
                Call::EmulateMedia(MediaType::Screen),
                Call::InjectStyle(PRINT_COLOR_CSS.to_string()),
                Call::PrintPdf(PdfOptions::a4(PageMargins::default())),
                Call::Close,
                Call::Dropped,
            ]
        );
    }

    #[tokio::test]
    async fn test_print_media_when_screen_emulation_disabled() {
        let fake = FakeLauncher::new();
        let settings = RenderSettings {
            emulate_screen_media_for_print: false,
            ..RenderSettings::default()
        };
        PdfRenderer::new(Arc::new(fake.clone()), settings)
            .render(job("<p/>"))
            .await
            .unwrap();
        assert!(fake.calls().contains(&Call::EmulateMedia(MediaType::Print)));
    }

    #[tokio::test]
    async fn test_margins_reach_print_call_verbatim() {
        let fake = FakeLauncher::new();
        let margins = PageMargins {
            top: "10mm".into(),
            right: "0.25in".into(),
            bottom: "2cm".into(),
            left: "30px".into(),
        };
        let mut j = job("<p/>");
        j.margins = margins.clone();
        renderer(&fake).render(j).await.unwrap();

        assert_eq!(fake.printed_options(), vec![PdfOptions::a4(margins)]);
    }

    #[tokio::test]
    async fn test_print_failure_still_closes_once() {
        let fake = FakeLauncher::failing_at(Step::PrintPdf);
        let err = renderer(&fake).render(job("<p/>")).await.unwrap_err();

        assert!(matches!(err, RenderError::Rendering(_)));
        assert_eq!(fake.close_count(), 1);
    }

    #[tokio::test]
    async fn test_load_failure_still_closes_once() {
        let fake = FakeLauncher::failing_at(Step::LoadHtml);
        let err = renderer(&fake).render(job("<p/>")).await.unwrap_err();

        assert!(matches!(err, RenderError::Rendering(_)));
        assert_eq!(fake.close_count(), 1);
        assert!(!fake
            .calls()
            .iter()
            .any(|c| matches!(c, Call::PrintPdf(_))));
    }

    #[tokio::test]
    async fn test_launch_failure_attempts_no_page_work() {
        let fake = FakeLauncher::failing_at(Step::Launch);
        let err = renderer(&fake).render(job("<p/>")).await.unwrap_err();

        assert!(matches!(err, RenderError::Infrastructure(_)));
        assert_eq!(fake.calls(), vec![Call::Launch]);
        assert_eq!(fake.close_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_render_times_out_and_closes() {
        let fake = FakeLauncher::hanging_at(Step::PrintPdf);
        let started = Instant::now();
        let err = renderer(&fake).render(job("<p/>")).await.unwrap_err();

        assert!(matches!(err, RenderError::Timeout(d) if d == Duration::from_secs(60)));
        assert_eq!(started.elapsed(), Duration::from_secs(60));
        assert_eq!(fake.close_count(), 1);
        assert_eq!(fake.dropped_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_render_releases_session_once() {
        let fake = FakeLauncher::hanging_at(Step::PrintPdf);
        let r = renderer(&fake);

        let cancelled = timeout(Duration::from_secs(1), r.render(job("<p/>"))).await;
        assert!(cancelled.is_err());

        // No close ran; dropping the session is the release.
        assert_eq!(fake.close_count(), 0);
        assert_eq!(fake.dropped_count(), 1);
        assert_eq!(fake.calls().last(), Some(&Call::Dropped));
    }

    #[tokio::test]
    async fn test_failed_render_releases_session_once() {
        let fake = FakeLauncher::failing_at(Step::LoadHtml);
        renderer(&fake).render(job("<p/>")).await.unwrap_err();

        let calls = fake.calls();
        let tail = &calls[calls.len() - 2..];
        assert_eq!(tail, &[Call::Close, Call::Dropped]);
        assert_eq!(fake.dropped_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_launch_times_out_without_close() {
        let fake = FakeLauncher::hanging_at(Step::Launch);
        let err = renderer(&fake).render(job("<p/>")).await.unwrap_err();

        assert!(matches!(err, RenderError::Timeout(_)));
        assert_eq!(fake.close_count(), 0);
    }

    #[tokio::test]
    async fn test_close_failure_does_not_mask_result() {
        let fake = FakeLauncher::failing_at(Step::Close);
        let doc = renderer(&fake).render(job("<p/>")).await.unwrap();
        assert!(!doc.pdf.is_empty());
        assert_eq!(fake.close_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_pdf_is_a_rendering_failure() {
        let fake = FakeLauncher::with_pdf(Vec::new());
        let err = renderer(&fake).render(job("<p/>")).await.unwrap_err();
        assert!(matches!(err, RenderError::Rendering(_)));
        assert_eq!(fake.close_count(), 1);
    }

    #[tokio::test]
    async fn test_same_job_renders_identically() {
        let fake = FakeLauncher::new();
        let r = renderer(&fake);
        let first = r.render(job("<h1>Jane</h1>")).await.unwrap();
        let second = r.render(job("<h1>Jane</h1>")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fake.close_count(), 2);
    }
}
