mod form_data;
mod income;
mod personal;
mod product;
mod residency;
mod tax_bracket;
mod tax_result;
mod tax_year_config;

pub use form_data::FormData;
pub use income::{
    AccountType, BankDetails, FicaEmployerInfo, IncomeEntry, IncomeItem, IncomeKind, IncomeRecord,
    IncomeState, W2Entry,
};
pub use personal::{AcademicInfo, ForeignAddress, PersonalInfo, UsAddress};
pub use product::{Product, UnknownProduct};
pub use residency::{ResidencyRecord, Visit, VisaType};
pub(crate) use residency::{year_end, year_start};
pub use tax_bracket::TaxBracket;
pub use tax_result::{
    FederalForms, FederalTaxResult, Settlement, StateForms, StateTaxResult, TaxResult,
};
pub use tax_year_config::{SUPPORTED_TAX_YEAR, TaxYearConfig};
