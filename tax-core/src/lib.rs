pub mod calculations;
pub mod models;
pub mod validation;

pub use calculations::{TaxRuleError, compute_tax_result};
pub use models::*;
pub use validation::{ValidationError, ValidationIssue, validate_form_data};
