//! Checks run on collector input before any rule is computed.
//!
//! Every problem found is reported, not just the first, so the caller can show
//! them together.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{FormData, IncomeRecord, IncomeState, ResidencyRecord};

/// A single problem with the collected data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    IncomeStateMissing,
    SsnMissing,
    SsnMalformed { digits: usize },
    EinMalformed { w2_index: usize, digits: usize },
    NegativeAmount { field: String },
    FicaEmployerCountMismatch { expected: usize, found: usize },
    FicaEmployerIncomplete { position: usize },
    VisitMissingEntryDate { visit_index: usize },
    VisitExitBeforeEntry { visit_index: usize },
    OpenVisitNotLast { visit_index: usize },
}

impl fmt::Display for ValidationIssue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::IncomeStateMissing => write!(f, "income state must be selected"),
            Self::SsnMissing => write!(f, "SSN or ITIN is required when reporting income"),
            Self::SsnMalformed { digits } => {
                write!(f, "SSN must have 9 digits, found {digits}")
            }
            Self::EinMalformed { w2_index, digits } => {
                write!(f, "W-2 #{} EIN must have 9 digits, found {digits}", w2_index + 1)
            }
            Self::NegativeAmount { field } => write!(f, "{field} cannot be negative"),
            Self::FicaEmployerCountMismatch { expected, found } => write!(
                f,
                "expected employer details for {expected} W-2s with FICA withheld, found {found}"
            ),
            Self::FicaEmployerIncomplete { position } => write!(
                f,
                "employer details #{} need both a name and an address",
                position + 1
            ),
            Self::VisitMissingEntryDate { visit_index } => {
                write!(f, "visit #{} has no entry date", visit_index + 1)
            }
            Self::VisitExitBeforeEntry { visit_index } => {
                write!(f, "visit #{} exits before it enters", visit_index + 1)
            }
            Self::OpenVisitNotLast { visit_index } => write!(
                f,
                "visit #{} has no exit date but is not the most recent visit",
                visit_index + 1
            ),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("form data failed validation: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Strips everything but ASCII digits from an SSN, ITIN or EIN.
pub fn normalize_tin(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Validates `form` as a whole.
///
/// # Errors
/// * [`ValidationError`] listing every issue found.
pub fn validate_form_data(form: &FormData) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    check_income(&form.income, &mut issues);
    check_visits(&form.residency, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

fn check_income(
    income: &IncomeRecord,
    issues: &mut Vec<ValidationIssue>,
) {
    if !income.had_us_income {
        return;
    }

    if income.income_state == IncomeState::Unset {
        issues.push(ValidationIssue::IncomeStateMissing);
    }

    match income.ssn.as_deref().map(normalize_tin) {
        None => issues.push(ValidationIssue::SsnMissing),
        Some(ssn) if ssn.is_empty() => issues.push(ValidationIssue::SsnMissing),
        Some(ssn) if ssn.len() != 9 => {
            issues.push(ValidationIssue::SsnMalformed { digits: ssn.len() })
        }
        Some(_) => {}
    }

    for (w2_index, w2) in income.w2_entries.iter().enumerate() {
        let digits = normalize_tin(&w2.ein).len();
        if digits != 9 {
            issues.push(ValidationIssue::EinMalformed { w2_index, digits });
        }
        let amounts = [
            ("wages", w2.wages),
            ("federal tax withheld", w2.federal_tax_withheld),
            ("state tax withheld", w2.state_tax_withheld),
            ("social security withheld", w2.social_security_withheld),
            ("Medicare withheld", w2.medicare_withheld),
        ];
        check_amounts(&format!("W-2 #{}", w2_index + 1), &amounts, issues);
    }

    for (label, entries) in [
        ("1099-INT", &income.interest_entries),
        ("1099-MISC", &income.misc_entries),
    ] {
        for (index, entry) in entries.iter().enumerate() {
            let amounts = [
                ("amount", entry.amount),
                ("federal tax withheld", entry.federal_tax_withheld),
                ("state tax withheld", entry.state_tax_withheld),
            ];
            check_amounts(&format!("{label} #{}", index + 1), &amounts, issues);
        }
    }

    if !income.fica_refund_opt_out {
        check_fica_employers(income, issues);
    }
}

fn check_amounts(
    entry: &str,
    amounts: &[(&str, Decimal)],
    issues: &mut Vec<ValidationIssue>,
) {
    for (name, value) in amounts {
        if value.is_sign_negative() && !value.is_zero() {
            issues.push(ValidationIssue::NegativeAmount {
                field: format!("{entry} {name}"),
            });
        }
    }
}

fn check_fica_employers(
    income: &IncomeRecord,
    issues: &mut Vec<ValidationIssue>,
) {
    let expected = income.fica_w2_entries().count();
    if expected == 0 {
        return;
    }

    let info = income.fica_employer_info.as_deref().unwrap_or(&[]);
    if info.len() != expected {
        issues.push(ValidationIssue::FicaEmployerCountMismatch {
            expected,
            found: info.len(),
        });
    }

    for (position, employer) in info.iter().enumerate() {
        if employer.employer_name.trim().is_empty() || employer.employer_address.trim().is_empty()
        {
            issues.push(ValidationIssue::FicaEmployerIncomplete { position });
        }
    }
}

fn check_visits(
    residency: &ResidencyRecord,
    issues: &mut Vec<ValidationIssue>,
) {
    for (visit_index, visit) in residency.visits.iter().enumerate() {
        match (visit.entry_date, visit.exit_date) {
            (None, _) => issues.push(ValidationIssue::VisitMissingEntryDate { visit_index }),
            (Some(entry), Some(exit)) if exit < entry => {
                issues.push(ValidationIssue::VisitExitBeforeEntry { visit_index })
            }
            _ => {}
        }
    }

    let latest_entry = residency
        .visits
        .iter()
        .filter_map(|visit| visit.entry_date)
        .max();
    for (visit_index, visit) in residency.visits.iter().enumerate() {
        let is_latest = visit.entry_date.is_some() && visit.entry_date == latest_entry;
        if visit.is_open() && visit.entry_date.is_some() && !is_latest {
            issues.push(ValidationIssue::OpenVisitNotLast { visit_index });
        }
    }
}
