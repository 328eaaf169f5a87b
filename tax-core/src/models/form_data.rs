use serde::{Deserialize, Serialize};

use super::{AcademicInfo, IncomeRecord, PersonalInfo, ResidencyRecord};

/// Everything the form-input collector hands over for one filing session.
///
/// Nothing here is persisted; the value lives as long as the session that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub tax_year: i32,
    pub personal: PersonalInfo,
    #[serde(default)]
    pub academic: AcademicInfo,
    pub residency: ResidencyRecord,
    pub income: IncomeRecord,
}
