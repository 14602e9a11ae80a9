//! In-memory browser driver for testing.

use crate::driver::{Browser, Driver, Page};
use crate::error::{ErrorKind, Result};
use crate::options::{LaunchOptions, PdfOptions, Readiness};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Which step of a conversion the [`MockDriver`] should fail at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Failure {
    Launch,
    Load,
    Print,
    Close,
}

#[derive(Default)]
struct State {
    launches: usize,
    closes: usize,
    loaded: Vec<String>,
    launched_with: Vec<LaunchOptions>,
}

/// Browser driver that never starts a process.
///
/// "Printing" produces a small deterministic document: a `%PDF-1.4` header,
/// the loaded content as a comment, and a `%%EOF` trailer. Clones share their
/// counters, so a test can keep one handle and give another to the converter.
#[derive(Clone, Default)]
pub struct MockDriver {
    fail_at: Option<Failure>,
    state: Arc<Mutex<State>>,
}

impl MockDriver {
    pub fn failing(at: Failure) -> Self {
        Self { fail_at: Some(at), ..Self::default() }
    }

    pub fn launches(&self) -> usize {
        self.state().launches
    }

    pub fn closes(&self) -> usize {
        self.state().closes
    }

    /// Everything loaded so far, as `content:<html>` or `goto:<url>`.
    pub fn loaded(&self) -> Vec<String> {
        self.state().loaded.clone()
    }

    /// Options passed to each launch, in order.
    pub fn launched_with(&self) -> Vec<LaunchOptions> {
        self.state().launched_with.clone()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        // A panicking test poisons the lock; the counters are still valid.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn fails_at(&self, step: Failure) -> bool {
        self.fail_at == Some(step)
    }
}

#[async_trait]
impl Driver for MockDriver {
    type Browser = MockBrowser;

    async fn launch(&self, options: &LaunchOptions) -> Result<MockBrowser> {
        if self.fails_at(Failure::Launch) {
            exn::bail!(ErrorKind::Launch("mock launch failure".to_string()));
        }
        let mut state = self.state();
        state.launches += 1;
        state.launched_with.push(options.clone());
        Ok(MockBrowser { driver: self.clone(), open: true })
    }
}

pub struct MockBrowser {
    driver: MockDriver,
    open: bool,
}

#[async_trait]
impl Browser for MockBrowser {
    type Page = MockPage;

    async fn new_page(&mut self) -> Result<MockPage> {
        Ok(MockPage { driver: self.driver.clone(), content: Mutex::new(String::new()) })
    }

    async fn close(&mut self) -> Result<()> {
        if !std::mem::replace(&mut self.open, false) {
            return Ok(());
        }
        self.driver.state().closes += 1;
        if self.driver.fails_at(Failure::Close) {
            exn::bail!(ErrorKind::Close("mock close failure".to_string()));
        }
        Ok(())
    }
}

pub struct MockPage {
    driver: MockDriver,
    content: Mutex<String>,
}
impl MockPage {
    fn load(&self, entry: String, content: &str) -> Result<()> {
        if self.driver.fails_at(Failure::Load) {
            exn::bail!(ErrorKind::Navigation("mock load failure".to_string()));
        }
        self.driver.state().loaded.push(entry);
        *self.content.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = content.to_string();
        Ok(())
    }
}

#[async_trait]
impl Page for MockPage {
    async fn set_content(&self, html: &str, _readiness: &Readiness) -> Result<()> {
        self.load(format!("content:{html}"), html)
    }

    async fn goto(&self, url: &str, _readiness: &Readiness) -> Result<()> {
        self.load(format!("goto:{url}"), url)
    }

    async fn print_to_pdf(&self, _options: &PdfOptions) -> Result<Vec<u8>> {
        if self.driver.fails_at(Failure::Print) {
            exn::bail!(ErrorKind::Print("mock print failure".to_string()));
        }
        let content = self.content.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone();
        let mut pdf = b"%PDF-1.4\n".to_vec();
        for line in content.lines() {
            pdf.extend_from_slice(b"% ");
            pdf.extend_from_slice(line.as_bytes());
            pdf.push(b'\n');
        }
        pdf.extend_from_slice(b"%%EOF\n");
        Ok(pdf)
    }
}
