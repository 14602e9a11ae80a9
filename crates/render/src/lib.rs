//! HTML to PDF conversion through a headless Chrome/Chromium.
//!
//! A [`Converter`] owns a browser [`Driver`] plus the [`LaunchOptions`] every
//! conversion uses. Each conversion launches one browser, opens one page,
//! loads the HTML, waits for the network to go idle, prints an A4 PDF and
//! closes the browser again, whether or not anything failed along the way.
//!
//! The real driver is [`Chromium`]. With the `mock` feature enabled,
//! [`mock::MockDriver`] stands in for it without starting any process.

mod chrome;
pub mod driver;
pub mod error;
mod idle;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod options;
mod render;
mod request;

pub use crate::chrome::{Chromium, ChromiumBrowser, ChromiumPage};
pub use crate::driver::Driver;
pub use crate::options::{LaunchOptions, Margins, PaperFormat, PdfOptions, Readiness};
pub use crate::render::Output;
pub use crate::request::{Request, Source, derive_output_path};

pub struct Converter<D: Driver = Chromium> {
    driver: D,
    options: LaunchOptions,
}
impl<D: Driver> Converter<D> {
    pub fn new(driver: D, options: LaunchOptions) -> Self {
        Self { driver, options }
    }
}
impl From<LaunchOptions> for Converter<Chromium> {
    fn from(options: LaunchOptions) -> Self {
        Converter::new(Chromium, options)
    }
}
