//! Field tables for every supported form.
//!
//! Each submodule exposes `field_mappings()` for its document and documents
//! which answers are fixed for F-1 students from India with Illinois income
//! and which are computed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tax_core::calculations::aggregate::FicaClaim;
use thiserror::Error;

use crate::context::FillContext;
use crate::format::CurrencyStyle;
use crate::mapping::FieldMapping;
use crate::value::FieldValue;

pub mod f1040nr;
pub mod f8316;
pub mod f843;
pub mod f8843;
pub mod il1040;
pub mod il_schedule_nr;
pub mod il_schedule_wit;
pub mod schedule_oi;

/// One fillable template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    F8843,
    F1040Nr,
    F1040NrScheduleOi,
    Il1040,
    IlScheduleNr,
    IlScheduleIlWit,
    F843,
    F8316,
}

impl DocumentKind {
    pub fn all() -> [Self; 8] {
        [
            Self::F8843,
            Self::F1040Nr,
            Self::F1040NrScheduleOi,
            Self::Il1040,
            Self::IlScheduleNr,
            Self::IlScheduleIlWit,
            Self::F843,
            Self::F8316,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::F8843 => "8843",
            Self::F1040Nr => "1040-nr",
            Self::F1040NrScheduleOi => "1040-nr-schedule-oi",
            Self::Il1040 => "il-1040",
            Self::IlScheduleNr => "il-schedule-nr",
            Self::IlScheduleIlWit => "il-schedule-il-wit",
            Self::F843 => "843",
            Self::F8316 => "8316",
        }
    }

    /// Title printed on instruction sheets and placeholder pages.
    pub fn title(&self) -> &'static str {
        match self {
            Self::F8843 => "Form 8843, Statement for Exempt Individuals",
            Self::F1040Nr => "Form 1040-NR, U.S. Nonresident Alien Income Tax Return",
            Self::F1040NrScheduleOi => "Schedule OI (Form 1040-NR), Other Information",
            Self::Il1040 => "Form IL-1040, Individual Income Tax Return",
            Self::IlScheduleNr => "Schedule NR, Nonresident and Part-Year Resident Computation",
            Self::IlScheduleIlWit => "Schedule IL-WIT, Illinois Income Tax Withholding",
            Self::F843 => "Form 843, Claim for Refund and Request for Abatement",
            Self::F8316 => "Form 8316, Social Security Tax Refund Information",
        }
    }

    /// File name of the blank template.
    pub fn template_file(&self) -> &'static str {
        match self {
            Self::F8843 => "f8843.pdf",
            Self::F1040Nr => "f1040nr.pdf",
            Self::F1040NrScheduleOi => "f1040nr_schedule_oi.pdf",
            Self::Il1040 => "il1040.pdf",
            Self::IlScheduleNr => "il1040_schedule_nr.pdf",
            Self::IlScheduleIlWit => "il1040_schedule_il_wit.pdf",
            Self::F843 => "f843.pdf",
            Self::F8316 => "f8316.pdf",
        }
    }

    /// How every amount on this document is printed.
    pub fn currency_style(&self) -> CurrencyStyle {
        match self {
            Self::F843 | Self::F8316 => CurrencyStyle::Cents,
            Self::F8843
            | Self::F1040Nr
            | Self::F1040NrScheduleOi
            | Self::Il1040
            | Self::IlScheduleNr
            | Self::IlScheduleIlWit => CurrencyStyle::WholeDollars,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown document '{0}'")]
pub struct UnknownDocument(pub String);

impl FromStr for DocumentKind {
    type Err = UnknownDocument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDocument(s.to_string()))
    }
}

/// A document instance to fill: a template plus, for per-employer claim
/// forms, the claim it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    F8843,
    F1040Nr,
    F1040NrScheduleOi,
    Il1040,
    IlScheduleNr,
    IlScheduleIlWit,
    F843(FicaClaim),
    F8316(FicaClaim),
}

impl FormTarget {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::F8843 => DocumentKind::F8843,
            Self::F1040Nr => DocumentKind::F1040Nr,
            Self::F1040NrScheduleOi => DocumentKind::F1040NrScheduleOi,
            Self::Il1040 => DocumentKind::Il1040,
            Self::IlScheduleNr => DocumentKind::IlScheduleNr,
            Self::IlScheduleIlWit => DocumentKind::IlScheduleIlWit,
            Self::F843(_) => DocumentKind::F843,
            Self::F8316(_) => DocumentKind::F8316,
        }
    }

    /// Human-readable label, naming the employer for claim forms.
    pub fn label(&self) -> String {
        match self {
            Self::F843(claim) | Self::F8316(claim) => {
                format!("{} ({})", self.kind(), claim.employer_name)
            }
            _ => self.kind().to_string(),
        }
    }

    pub fn field_mappings(&self) -> Vec<FieldMapping> {
        match self {
            Self::F8843 => f8843::field_mappings(),
            Self::F1040Nr => f1040nr::field_mappings(),
            Self::F1040NrScheduleOi => schedule_oi::field_mappings(),
            Self::Il1040 => il1040::field_mappings(),
            Self::IlScheduleNr => il_schedule_nr::field_mappings(),
            Self::IlScheduleIlWit => il_schedule_wit::field_mappings(),
            Self::F843(claim) => f843::field_mappings(claim),
            Self::F8316(claim) => f8316::field_mappings(claim),
        }
    }
}

/// Shorthand for fields on an IRS XFA-style template page.
pub(crate) fn irs_field(
    page: u8,
    name: &str,
) -> String {
    irs_box(page, name, 0)
}

/// One widget of a checkbox group; IRS yes/no pairs are `[0]` and `[1]`.
pub(crate) fn irs_box(
    page: u8,
    name: &str,
    index: u8,
) -> String {
    format!("topmostSubform[0].Page{page}[0].{name}[{index}]")
}

/// The Yes and No boxes of an IRS checkbox pair.
pub(crate) fn irs_yes_no(
    page: u8,
    name: &str,
    answer: impl Fn(&FillContext) -> bool + Copy + Send + Sync + 'static,
) -> [FieldMapping; 2] {
    [
        FieldMapping::required(irs_box(page, name, 0), move |ctx| {
            FieldValue::Checkbox(answer(ctx))
        }),
        FieldMapping::required(irs_box(page, name, 1), move |ctx| {
            FieldValue::Checkbox(!answer(ctx))
        }),
    ]
}
