//! Convert HTML documents to PDF with headless Chrome/Chromium.
//!
//! The binary is a thin shell around these modules: [`cli`] parses the
//! arguments, [`input`] finds the HTML, [`output`] decides where the PDF goes
//! and [`app`] runs the conversion through [`html2pdf_render`].

pub mod app;
pub mod cli;
pub mod error;
pub mod input;
pub mod output;
