use lopdf::Document;
use tax_forms::{DocumentRenderer, FieldValues, FormTemplate, RenderError, RenderedDocument};
use tracing::debug;

use crate::{acroform, merge, text};

/// Renders filled AcroForm templates, text pages and merged packages as PDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfRenderer;

impl LopdfRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for LopdfRenderer {
    fn fill(
        &self,
        template: &FormTemplate,
        values: &FieldValues,
    ) -> Result<RenderedDocument, RenderError> {
        let fill_error = |err: lopdf::Error| RenderError::Fill {
            document: template.kind,
            message: err.to_string(),
        };

        let mut doc = Document::load_mem(&template.bytes).map_err(fill_error)?;
        let written = acroform::fill_fields(&mut doc, values).map_err(fill_error)?;
        let page_count = doc.get_pages().len();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).map_err(|err| RenderError::Fill {
            document: template.kind,
            message: err.to_string(),
        })?;

        debug!(
            document = %template.kind,
            fields = written,
            pages = page_count,
            "Filled template"
        );
        Ok(RenderedDocument { bytes, page_count })
    }

    fn text_page(
        &self,
        title: &str,
        lines: &[String],
    ) -> Result<RenderedDocument, RenderError> {
        let (bytes, page_count) = text::text_document(title, lines)
            .map_err(|err| RenderError::TextPage(err.to_string()))?;
        Ok(RenderedDocument { bytes, page_count })
    }

    fn merge(
        &self,
        parts: Vec<RenderedDocument>,
    ) -> Result<RenderedDocument, RenderError> {
        if parts.is_empty() {
            return Err(RenderError::Empty);
        }
        let (bytes, page_count) = merge::merge_documents(parts.into_iter().map(|part| part.bytes))
            .map_err(|err| RenderError::Merge(err.to_string()))?;
        Ok(RenderedDocument { bytes, page_count })
    }
}
