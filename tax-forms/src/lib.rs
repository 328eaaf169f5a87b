//! Form field mapping and package assembly for nonresident student filings.
//!
//! Each supported document is described by a declarative field table (see
//! [`documents`]). The [`PackageAssembler`] loads templates through a
//! [`TemplateStore`], fills them concurrently, and merges the results with a
//! [`DocumentRenderer`] into one package per product.

pub mod assembler;
pub mod context;
pub mod documents;
pub mod format;
pub mod instructions;
pub mod mapping;
pub mod render;
pub mod template;
pub mod value;

#[cfg(test)]
mod test_support;

pub use assembler::{
    AssemblyError, Criticality, DocumentFailure, Package, PackageAssembler, PlanEntry,
    PlannedDocument, ProductPlan,
};
pub use context::FillContext;
pub use documents::{DocumentKind, FormTarget, UnknownDocument};
pub use mapping::{FieldClass, FieldMapping, FieldWarning, FillOutcome, evaluate_table, fill_template};
pub use render::{DocumentRenderer, RenderError, RenderedDocument};
pub use template::{FormTemplate, MemoryTemplateStore, TemplateError, TemplateStore};
pub use value::{FieldKind, FieldValue, FieldValues, TemplateNamespace};
