//! Browser capability traits.
//!
//! The converter only ever talks to a browser through these three traits, so
//! the real Chrome/Chromium driver ([`Chromium`](crate::Chromium)) and the
//! in-memory fake used in tests are interchangeable.
//!
//! One invocation performs, in order: [`Driver::launch`], [`Browser::new_page`],
//! one of [`Page::set_content`] / [`Page::goto`], [`Page::print_to_pdf`], and
//! finally [`Browser::close`], which must be called on every exit path.

use crate::error::Result;
use crate::options::{LaunchOptions, PdfOptions, Readiness};
use async_trait::async_trait;

/// Starts browser processes.
#[async_trait]
pub trait Driver: Send + Sync {
    type Browser: Browser;

    async fn launch(&self, options: &LaunchOptions) -> Result<Self::Browser>;
}

/// A running browser process.
#[async_trait]
pub trait Browser: Send {
    type Page: Page;

    async fn new_page(&mut self) -> Result<Self::Page>;

    /// Shut the browser down and release the process. Calling this more than
    /// once is allowed; later calls are no-ops.
    async fn close(&mut self) -> Result<()>;
}

/// A single browser tab.
#[async_trait]
pub trait Page: Send + Sync {
    /// Replace the document with `html` and wait until the page is ready.
    async fn set_content(&self, html: &str, readiness: &Readiness) -> Result<()>;

    /// Navigate to `url` and wait until the page is ready.
    async fn goto(&self, url: &str, readiness: &Readiness) -> Result<()>;

    async fn print_to_pdf(&self, options: &PdfOptions) -> Result<Vec<u8>>;
}
