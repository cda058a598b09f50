//! PageRenderer 実装

mod pdfium;

pub use pdfium::PdfiumRenderer;
