use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsAddress {
    pub street: String,
    #[serde(default)]
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl UsAddress {
    /// Street line including the apartment, if any.
    pub fn street_line(&self) -> String {
        match self.apartment.as_deref().map(str::trim) {
            Some(apt) if !apt.is_empty() => format!("{}, Apt {}", self.street.trim(), apt),
            _ => self.street.trim().to_string(),
        }
    }

    /// "City, ST 12345".
    pub fn city_state_zip(&self) -> String {
        format!("{}, {} {}", self.city.trim(), self.state.trim(), self.zip.trim())
    }

    pub fn one_line(&self) -> String {
        format!("{}, {}", self.street_line(), self.city_state_zip())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForeignAddress {
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub postal_code: String,
    pub country: String,
}

impl ForeignAddress {
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.street.trim().to_string(), self.city.trim().to_string()];
        if let Some(province) = self.province.as_deref().filter(|p| !p.trim().is_empty()) {
            parts.push(province.trim().to_string());
        }
        if !self.postal_code.trim().is_empty() {
            parts.push(self.postal_code.trim().to_string());
        }
        parts.push(self.country.trim().to_string());
        parts.retain(|part| !part.is_empty());
        parts.join(", ")
    }
}

/// Identity and contact details of the filer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    #[serde(default)]
    pub middle_initial: Option<String>,
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub us_address: UsAddress,
    #[serde(default)]
    pub foreign_address: ForeignAddress,
    pub country_of_citizenship: String,
    #[serde(default)]
    pub passport_country: String,
    #[serde(default)]
    pub passport_number: String,
}

impl PersonalInfo {
    /// First name plus middle initial, as IRS name lines expect.
    pub fn first_and_initial(&self) -> String {
        match self.middle_initial.as_deref().map(str::trim) {
            Some(mi) if !mi.is_empty() => format!("{} {}", self.first_name.trim(), mi),
            _ => self.first_name.trim().to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_and_initial(), self.last_name.trim())
    }
}

/// School and program director, reported on Form 8843 Part III.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AcademicInfo {
    pub institution_name: String,
    #[serde(default)]
    pub institution_address: String,
    #[serde(default)]
    pub institution_phone: String,
    #[serde(default)]
    pub director_name: String,
    #[serde(default)]
    pub director_address: String,
    #[serde(default)]
    pub director_phone: String,
}
