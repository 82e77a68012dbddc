//! Output formats. Each renderer walks a [`DocumentIr`](super::ir::DocumentIr)
//! and only decides presentation; wording is fixed by the composer.

pub mod docx;
pub mod html;
pub mod pdf;
pub mod preview;

pub use docx::render_docx;
pub use html::{render_html, HtmlOptions};
pub use pdf::render_pdf;
pub use preview::{render_preview, PreviewDocument, PreviewElement};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to pack document archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("failed to write document bytes: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to build pdf: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("failed to load bundled font: {0}")]
    Font(#[from] ttf_parser::FaceParsingError),
    #[error("failed to render html template: {0}")]
    Template(#[from] tera::Error),
}
