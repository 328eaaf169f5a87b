//! Template loading.
//!
//! A [`TemplateStore`] resolves a [`DocumentKind`] to the blank template and
//! the field namespace it declares. Every load returns a fresh copy, so
//! concurrent fills never share a template.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::documents::DocumentKind;
use crate::value::TemplateNamespace;

/// A blank template and the fields it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormTemplate {
    pub kind: DocumentKind,
    pub fields: TemplateNamespace,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template for {kind} not found at {}", .path.display())]
    NotFound { kind: DocumentKind, path: PathBuf },

    #[error("failed to read template for {kind}: {source}")]
    Io {
        kind: DocumentKind,
        #[source]
        source: std::io::Error,
    },

    #[error("template for {kind} is malformed: {message}")]
    Malformed { kind: DocumentKind, message: String },

    #[error("loading template for {kind} timed out after {}s", .after.as_secs())]
    TimedOut { kind: DocumentKind, after: Duration },
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn load(
        &self,
        kind: DocumentKind,
    ) -> Result<FormTemplate, TemplateError>;
}

/// Templates held in memory, keyed by document.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    templates: HashMap<DocumentKind, FormTemplate>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        template: FormTemplate,
    ) {
        self.templates.insert(template.kind, template);
    }

    pub fn with(
        mut self,
        template: FormTemplate,
    ) -> Self {
        self.insert(template);
        self
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn load(
        &self,
        kind: DocumentKind,
    ) -> Result<FormTemplate, TemplateError> {
        self.templates
            .get(&kind)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound {
                kind,
                path: PathBuf::from(kind.template_file()),
            })
    }
}
