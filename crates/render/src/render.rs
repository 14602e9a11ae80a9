use crate::driver::{Browser, Driver, Page};
use crate::error::{ErrorKind, Result};
use crate::request::{Request, Source, derive_output_path, file_url};
use crate::{Converter, PdfOptions};
use std::path::PathBuf;
use tracing::instrument;

/// Result of a conversion: either the PDF itself, or where it was written.
#[derive(Debug, PartialEq, Eq)]
pub enum Output {
    Bytes(Vec<u8>),
    Persisted(PathBuf),
}

impl<D: Driver> Converter<D> {
    /// Resolve `request` and produce a PDF.
    ///
    /// - An explicit `output` path is always written to.
    /// - Without one, a non-streaming conversion of a `.html`/`.htm` file is
    ///   written next to its input with a `.pdf` extension.
    /// - Everything else is returned as [`Output::Bytes`].
    ///
    /// Input problems ([`NoInputProvided`](ErrorKind::NoInputProvided),
    /// [`InputNotFound`](ErrorKind::InputNotFound)) are reported before a
    /// browser is launched.
    pub async fn convert(&self, request: &Request, output: Option<PathBuf>, stream: bool) -> Result<Output> {
        let source = request.resolve()?;
        let save_to = match (output, &source) {
            (Some(path), _) => Some(path),
            (None, Source::File(input)) if !stream => derive_output_path(input),
            (None, _) => None,
        };
        match save_to {
            Some(path) => self.render_to(&source, path).await.map(Output::Persisted),
            None => self.render(&source).await.map(Output::Bytes),
        }
    }

    /// Render `source` and write the PDF to `save_to`, returning the path written.
    pub async fn render_to(&self, source: &Source, save_to: impl Into<PathBuf>) -> Result<PathBuf> {
        let save_to = save_to.into();
        let pdf = self.render(source).await?;
        tokio::fs::write(&save_to, &pdf).await.map_err(ErrorKind::io(&save_to))?;
        tracing::info!(path = %save_to.display(), bytes = pdf.len(), "PDF written");
        Ok(save_to)
    }

    /// Render `source` to PDF bytes.
    ///
    /// The browser is closed on every path out of this function. If printing
    /// succeeded but closing did not, the PDF is still returned.
    #[instrument(skip_all, fields(source = %source.describe()))]
    pub async fn render(&self, source: &Source) -> Result<Vec<u8>> {
        let mut browser = self.driver.launch(&self.options).await?;
        let printed = self.print(&mut browser, source).await;
        let closed = browser.close().await;
        match (printed, closed) {
            (Ok(pdf), Ok(())) => Ok(pdf),
            (Ok(pdf), Err(err)) => {
                let kind: &ErrorKind = &err;
                tracing::warn!(error = %kind, "Browser did not close cleanly");
                Ok(pdf)
            },
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                let kind: &ErrorKind = &close_err;
                tracing::warn!(error = %kind, "Browser did not close cleanly after failure");
                Err(err)
            },
        }
    }

    async fn print(&self, browser: &mut D::Browser, source: &Source) -> Result<Vec<u8>> {
        let page = browser.new_page().await?;
        let readiness = &self.options.readiness;
        match source {
            Source::Html(html) => page.set_content(html, readiness).await?,
            Source::File(path) => page.goto(file_url(path)?.as_str(), readiness).await?,
        }
        tracing::debug!("Page settled; printing");
        let pdf = page.print_to_pdf(&PdfOptions::default()).await?;
        tracing::debug!(bytes = pdf.len(), "PDF printed");
        Ok(pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Failure, MockDriver};
    use crate::options::LaunchOptions;

    fn converter(driver: MockDriver) -> Converter<MockDriver> {
        Converter::new(driver, LaunchOptions::default())
    }

    #[tokio::test]
    async fn inline_html_renders_pdf_bytes() {
        let driver = MockDriver::default();
        let out = converter(driver.clone()).convert(&Request::html("<p>Hi</p>"), None, true).await.unwrap();
        let Output::Bytes(pdf) = out else { panic!("expected bytes") };
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert_eq!(driver.launches(), 1);
        assert_eq!(driver.closes(), 1);
        assert_eq!(driver.loaded(), vec!["content:<p>Hi</p>".to_string()]);
    }

    #[tokio::test]
    async fn missing_file_never_launches_browser() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.html");
        let driver = MockDriver::default();
        let err = converter(driver.clone()).convert(&Request::file(&missing), None, false).await.unwrap_err();
        assert_eq!(*err, ErrorKind::InputNotFound(missing));
        assert_eq!(driver.launches(), 0);
    }

    #[tokio::test]
    async fn no_input_never_launches_browser() {
        let driver = MockDriver::default();
        let err = converter(driver.clone()).convert(&Request::default(), None, true).await.unwrap_err();
        assert_eq!(*err, ErrorKind::NoInputProvided);
        assert_eq!(driver.launches(), 0);
    }

    #[tokio::test]
    async fn html_file_is_written_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Invoice.HTML");
        std::fs::write(&input, "<h1>Invoice</h1>").unwrap();
        let driver = MockDriver::default();
        let out = converter(driver.clone()).convert(&Request::file(&input), None, false).await.unwrap();
        let expected = dir.path().join("Invoice.pdf");
        assert_eq!(out, Output::Persisted(expected.clone()));
        assert!(std::fs::read(&expected).unwrap().starts_with(b"%PDF-"));
        assert!(driver.loaded()[0].starts_with("goto:file://"));
    }

    #[tokio::test]
    async fn streaming_file_returns_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.html");
        std::fs::write(&input, "<p></p>").unwrap();
        let out = converter(MockDriver::default()).convert(&Request::file(&input), None, true).await.unwrap();
        assert!(matches!(out, Output::Bytes(_)));
        assert!(!dir.path().join("page.pdf").exists());
    }

    #[tokio::test]
    async fn explicit_output_wins() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("custom.pdf");
        let out = converter(MockDriver::default())
            .convert(&Request::html("<p></p>"), Some(target.clone()), true)
            .await
            .unwrap();
        assert_eq!(out, Output::Persisted(target.clone()));
        assert!(target.exists());
    }

    #[tokio::test]
    async fn unrecognised_extension_returns_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.xhtml");
        std::fs::write(&input, "<p></p>").unwrap();
        let out = converter(MockDriver::default()).convert(&Request::file(&input), None, false).await.unwrap();
        assert!(matches!(out, Output::Bytes(_)));
    }

    #[tokio::test]
    async fn browser_closed_after_load_failure() {
        let driver = MockDriver::failing(Failure::Load);
        let err = converter(driver.clone()).render(&Source::Html("<p></p>".into())).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::Navigation(_)));
        assert_eq!(driver.launches(), 1);
        assert_eq!(driver.closes(), 1);
    }

    #[tokio::test]
    async fn browser_closed_after_print_failure() {
        let driver = MockDriver::failing(Failure::Print);
        let err = converter(driver.clone()).render(&Source::Html("<p></p>".into())).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::Print(_)));
        assert_eq!(driver.closes(), 1);
    }

    #[tokio::test]
    async fn launch_failure_propagates() {
        let driver = MockDriver::failing(Failure::Launch);
        let err = converter(driver.clone()).render(&Source::Html("<p></p>".into())).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::Launch(_)));
        assert_eq!(driver.closes(), 0);
    }

    #[tokio::test]
    async fn close_failure_keeps_pdf() {
        let driver = MockDriver::failing(Failure::Close);
        let pdf = converter(driver.clone()).render(&Source::Html("<p></p>".into())).await.unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert_eq!(driver.closes(), 1);
    }

    #[tokio::test]
    async fn write_failure_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing-dir").join("out.pdf");
        let err = converter(MockDriver::default())
            .render_to(&Source::Html("<p></p>".into()), &target)
            .await
            .unwrap_err();
        let ErrorKind::Io { path, reason } = &*err else { panic!("expected an I/O error, got {:?}", *err) };
        assert_eq!(*path, target);
        assert!(!reason.is_empty());
        assert!((*err).to_string().starts_with(&format!("failed to write {}: ", target.display())));
    }
}
