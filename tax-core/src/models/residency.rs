use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Nonimmigrant status held during a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisaType {
    #[serde(rename = "F-1")]
    F1,
    #[serde(rename = "J-1")]
    J1,
    #[serde(rename = "M-1")]
    M1,
    #[serde(rename = "Q-1")]
    Q1,
    #[serde(rename = "B-1/B-2")]
    B1B2,
    #[serde(rename = "H-1B")]
    H1b,
    #[serde(rename = "other")]
    Other,
}

impl VisaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::F1 => "F-1",
            Self::J1 => "J-1",
            Self::M1 => "M-1",
            Self::Q1 => "Q-1",
            Self::B1B2 => "B-1/B-2",
            Self::H1b => "H-1B",
            Self::Other => "Other",
        }
    }

    /// F, J, M and Q holders are "exempt individuals" for the substantial
    /// presence test and are exempt from FICA on student employment.
    pub fn is_student_or_exchange(&self) -> bool {
        matches!(self, Self::F1 | Self::J1 | Self::M1 | Self::Q1)
    }
}

impl fmt::Display for VisaType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stay in the United States.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub visa_type: VisaType,
    /// Required by the collector; a visit without it counts zero days.
    #[serde(default)]
    pub entry_date: Option<NaiveDate>,
    /// `None` means the filer is still in the United States.
    #[serde(default)]
    pub exit_date: Option<NaiveDate>,
}

impl Visit {
    pub fn is_open(&self) -> bool {
        self.exit_date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidencyRecord {
    pub date_of_first_visit: NaiveDate,
    #[serde(default)]
    pub visits: Vec<Visit>,
    #[serde(default)]
    pub has_filed_tax_return_before: bool,
    #[serde(default)]
    pub year_filed: Option<i32>,
    #[serde(default)]
    pub form_used: Option<String>,
}

impl ResidencyRecord {
    /// Visa held on the most recent visit.
    pub fn current_visa(&self) -> Option<VisaType> {
        self.latest_visit().map(|visit| visit.visa_type)
    }

    /// The visit with the latest entry date, falling back to list order.
    pub fn latest_visit(&self) -> Option<&Visit> {
        self.visits
            .iter()
            .enumerate()
            .max_by_key(|(idx, visit)| (visit.entry_date, *idx))
            .map(|(_, visit)| visit)
    }

    /// Whether the filer ever held more than one type of visa.
    pub fn visa_changed(&self) -> bool {
        let mut types = self.visits.iter().map(|visit| visit.visa_type);
        match types.next() {
            Some(first) => types.any(|other| other != first),
            None => false,
        }
    }

    /// Visits whose stay touches `year`, in chronological order.
    pub fn visits_in_year(
        &self,
        year: i32,
    ) -> Vec<&Visit> {
        let mut visits: Vec<&Visit> = self
            .visits
            .iter()
            .filter(|visit| {
                let Some(entry) = visit.entry_date else {
                    return false;
                };
                let entered_by_year_end = entry <= year_end(year);
                let still_here_in_year = visit
                    .exit_date
                    .is_none_or(|exit| exit >= year_start(year));
                entered_by_year_end && still_here_in_year
            })
            .collect();
        visits.sort_by_key(|visit| visit.entry_date);
        visits
    }

    /// Visa held at any point in `year`, taking the last visit of that year.
    pub fn visa_held_in_year(
        &self,
        year: i32,
    ) -> Option<VisaType> {
        self.visits_in_year(year)
            .last()
            .map(|visit| visit.visa_type)
    }
}

pub(crate) fn year_start(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub(crate) fn year_end(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX)
}
