use crate::driver::{Browser, Driver, Page};
use crate::error::{Error, ErrorKind, Result};
use crate::idle::{NetworkEvent, wait_for_idle};
use crate::options::{LaunchOptions, PdfOptions, Readiness};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::error::CdpError;
use exn::Exn;
use futures::{Stream, StreamExt, stream};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::task::JoinHandle;

type NetworkEvents = Pin<Box<dyn Stream<Item = NetworkEvent> + Send>>;

/// Locate a Chrome/Chromium executable.
pub(crate) fn discover() -> Result<PathBuf> {
    // Check for direct executables
    let executables = ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser", "chrome"];
    for exe in executables {
        if let Ok(path) = which::which(exe) {
            tracing::debug!(path = %path.display(), "Discovered Chrome executable in PATH");
            return Ok(path);
        }
    }
    tracing::info!("Chrome executable not found in PATH");
    // Application bundles that never make it onto PATH.
    let bundles = [
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        r"C:\Program Files\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    ];
    for bundle in bundles.map(Path::new) {
        if bundle.is_file() {
            tracing::debug!(path = %bundle.display(), "Discovered Chrome application bundle");
            return Ok(bundle.to_path_buf());
        }
    }
    exn::bail!(ErrorKind::ChromeNotFound);
}

fn cdp(kind: fn(String) -> ErrorKind) -> impl FnOnce(CdpError) -> Error {
    move |err| Exn::new(kind(err.to_string()))
}

/// Headless Chrome/Chromium driven over the DevTools protocol.
#[derive(Clone, Copy, Debug, Default)]
pub struct Chromium;

#[async_trait]
impl Driver for Chromium {
    type Browser = ChromiumBrowser;

    async fn launch(&self, options: &LaunchOptions) -> Result<ChromiumBrowser> {
        let executable = match &options.executable {
            Some(path) => path.clone(),
            None => discover()?,
        };
        let mut builder = chromiumoxide::BrowserConfig::builder().chrome_executable(&executable);
        for arg in options.args() {
            builder = builder.arg(arg);
        }
        let config = builder.build().map_err(|e| Exn::new(ErrorKind::Launch(e)))?;
        tracing::debug!(executable = %executable.display(), sandbox = options.sandbox, "Launching headless browser");
        let (browser, mut handler) = chromiumoxide::Browser::launch(config).await.map_err(cdp(ErrorKind::Launch))?;
        // The CDP connection only makes progress while its handler is polled.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    tracing::trace!(error = %err, "DevTools handler error");
                }
            }
        });
        Ok(ChromiumBrowser { browser: Some(browser), handler })
    }
}

pub struct ChromiumBrowser {
    browser: Option<chromiumoxide::Browser>,
    handler: JoinHandle<()>,
}

#[async_trait]
impl Browser for ChromiumBrowser {
    type Page = ChromiumPage;

    async fn new_page(&mut self) -> Result<ChromiumPage> {
        let Some(browser) = self.browser.as_mut() else {
            exn::bail!(ErrorKind::Navigation("browser already closed".to_string()));
        };
        let page = browser.new_page("about:blank").await.map_err(cdp(ErrorKind::Navigation))?;
        Ok(ChromiumPage { page })
    }

    async fn close(&mut self) -> Result<()> {
        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };
        let closed = shut_down(&mut browser).await;
        self.handler.abort();
        closed
    }
}

/// The process-level half of a browser handle.
#[async_trait]
trait Process: Send {
    async fn close(&mut self) -> std::result::Result<(), CdpError>;
    async fn kill(&mut self) -> Option<std::io::Result<()>>;
    async fn wait(&mut self) -> std::io::Result<()>;
}

#[async_trait]
impl Process for chromiumoxide::Browser {
    async fn close(&mut self) -> std::result::Result<(), CdpError> {
        chromiumoxide::Browser::close(self).await.map(|_| ())
    }

    async fn kill(&mut self) -> Option<std::io::Result<()>> {
        chromiumoxide::Browser::kill(self).await
    }

    async fn wait(&mut self) -> std::io::Result<()> {
        chromiumoxide::Browser::wait(self).await.map(|_| ())
    }
}

/// Ask the browser to exit, kill it if it does not answer, then reap it.
async fn shut_down<P: Process>(process: &mut P) -> Result<()> {
    let closed = process.close().await;
    if let Err(err) = &closed {
        // An unresponsive process never exits on its own; waiting on it would hang.
        tracing::warn!(error = %err, "Browser did not acknowledge close; killing process");
        if let Some(Err(err)) = process.kill().await {
            tracing::warn!(error = %err, "Failed to kill browser process");
        }
    }
    if let Err(err) = process.wait().await {
        tracing::warn!(error = %err, "Failed to reap browser process");
    }
    closed.map_err(cdp(ErrorKind::Close))
}

impl Drop for ChromiumBrowser {
    fn drop(&mut self) {
        // The browser kills its own child process on drop; the handler task
        // would otherwise outlive it.
        self.handler.abort();
    }
}

pub struct ChromiumPage {
    page: chromiumoxide::Page,
}
impl ChromiumPage {
    /// Subscribe to request lifecycle events. Must happen before loading so
    /// that no request slips past the idle tracker.
    async fn network_events(&self) -> Result<NetworkEvents> {
        let started = self.page.event_listener::<EventRequestWillBeSent>().await.map_err(cdp(ErrorKind::Navigation))?;
        let finished = self.page.event_listener::<EventLoadingFinished>().await.map_err(cdp(ErrorKind::Navigation))?;
        let failed = self.page.event_listener::<EventLoadingFailed>().await.map_err(cdp(ErrorKind::Navigation))?;
        let started = started.map(|e| NetworkEvent::Started(e.request_id.inner().clone()));
        let finished = finished.map(|e| NetworkEvent::Settled(e.request_id.inner().clone()));
        let failed = failed.map(|e| NetworkEvent::Settled(e.request_id.inner().clone()));
        Ok(Box::pin(stream::select(started, stream::select(finished, failed))))
    }
}

#[async_trait]
impl Page for ChromiumPage {
    async fn set_content(&self, html: &str, readiness: &Readiness) -> Result<()> {
        let events = self.network_events().await?;
        self.page.set_content(html).await.map_err(cdp(ErrorKind::Navigation))?;
        wait_for_idle(events, readiness).await
    }

    async fn goto(&self, url: &str, readiness: &Readiness) -> Result<()> {
        let events = self.network_events().await?;
        self.page.goto(url).await.map_err(cdp(ErrorKind::Navigation))?;
        wait_for_idle(events, readiness).await
    }

    async fn print_to_pdf(&self, options: &PdfOptions) -> Result<Vec<u8>> {
        self.page.pdf(print_params(options)).await.map_err(cdp(ErrorKind::Print))
    }
}

fn print_params(options: &PdfOptions) -> PrintToPdfParams {
    let (width, height) = options.format.inches();
    let (top, right, bottom, left) = options.margins.inches();
    PrintToPdfParams {
        print_background: Some(options.print_background),
        paper_width: Some(width),
        paper_height: Some(height),
        margin_top: Some(top),
        margin_right: Some(right),
        margin_bottom: Some(bottom),
        margin_left: Some(left),
        ..Default::default()
    }
}
