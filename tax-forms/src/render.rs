//! Output backend seam.
//!
//! The assembler hands a loaded template and its field values to a
//! [`DocumentRenderer`] and gets back document bytes plus a page count. The
//! `tax-pdf` crate provides the PDF implementation.

use thiserror::Error;

use crate::documents::DocumentKind;
use crate::template::FormTemplate;
use crate::value::FieldValues;

/// One rendered document, or a merged package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{document}: {message}")]
    Fill {
        document: DocumentKind,
        message: String,
    },

    #[error("failed to write text page: {0}")]
    TextPage(String),

    #[error("failed to merge documents: {0}")]
    Merge(String),

    #[error("nothing to merge")]
    Empty,
}

pub trait DocumentRenderer: Send + Sync {
    /// Writes `values` into a copy of `template`.
    fn fill(
        &self,
        template: &FormTemplate,
        values: &FieldValues,
    ) -> Result<RenderedDocument, RenderError>;

    /// A page of plain text: instruction sheets and placeholders.
    fn text_page(
        &self,
        title: &str,
        lines: &[String],
    ) -> Result<RenderedDocument, RenderError>;

    /// Concatenates `parts` in order, keeping every page.
    fn merge(
        &self,
        parts: Vec<RenderedDocument>,
    ) -> Result<RenderedDocument, RenderError>;
}
