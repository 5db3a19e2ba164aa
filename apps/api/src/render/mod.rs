// Format emitters. Both are thin adapters over the layout module: PDF writes
// the page flow's draw instructions, DOCX maps the section walk onto named
// paragraph styles.

pub mod docx;
pub mod pdf;
pub mod winansi;

use thiserror::Error;

pub use docx::render_docx;
pub use pdf::{render_pdf, RenderedPdf};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("DOCX packaging failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("render task failed: {0}")]
    Task(String),
}
