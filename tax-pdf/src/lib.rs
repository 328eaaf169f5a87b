//! PDF backend for the package assembler.
//!
//! Templates are AcroForm PDFs read from a directory. Filling sets field
//! values and asks viewers to regenerate appearances; instruction sheets and
//! placeholders are plain Helvetica text pages.

pub mod acroform;
pub mod merge;
pub mod renderer;
pub mod store;
pub mod text;

pub use renderer::LopdfRenderer;
pub use store::DirectoryTemplateStore;
