use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tax_forms::{DocumentKind, FormTemplate, TemplateError, TemplateStore};
use tracing::{debug, warn};

use crate::acroform;

/// Blank PDF templates read from one directory, one file per document under
/// the document's template file name.
#[derive(Debug, Clone)]
pub struct DirectoryTemplateStore {
    root: PathBuf,
}

impl DirectoryTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(
        &self,
        kind: DocumentKind,
    ) -> PathBuf {
        self.root.join(kind.template_file())
    }
}

#[async_trait]
impl TemplateStore for DirectoryTemplateStore {
    async fn load(
        &self,
        kind: DocumentKind,
    ) -> Result<FormTemplate, TemplateError> {
        let path = self.path_for(kind);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(TemplateError::NotFound { kind, path });
            }
            Err(source) => return Err(TemplateError::Io { kind, source }),
        };

        let fields = acroform::read_namespace(&bytes).map_err(|err| TemplateError::Malformed {
            kind,
            message: err.to_string(),
        })?;
        if fields.is_empty() {
            warn!(document = %kind, path = %path.display(), "Template declares no form fields");
        }
        debug!(
            document = %kind,
            path = %path.display(),
            fields = fields.len(),
            "Loaded template"
        );

        Ok(FormTemplate {
            kind,
            fields,
            bytes,
        })
    }
}
