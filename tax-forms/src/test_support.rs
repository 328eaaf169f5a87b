//! Shared filer used by the field table tests.
//!
//! Two W-2s (the second with FICA withheld in error) and one 1099-INT, Illinois
//! income, prepared on March 1, 2026. Computed results:
//!
//! | Quantity | Federal | Illinois |
//! |----------|---------|----------|
//! | gross    | 34120.90 | 34120.90 |
//! | taxable  | 18370   | 31270    |
//! | tax      | 1965    | 1547     |
//! | withheld | 2150    | 1520     |
//! | balance  | refund 185 | owed 27 |

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tax_core::{
    AcademicInfo, AccountType, BankDetails, FicaEmployerInfo, ForeignAddress, FormData,
    IncomeEntry, IncomeRecord, IncomeState, PersonalInfo, ResidencyRecord, UsAddress, VisaType,
    Visit, W2Entry, compute_tax_result,
};

use crate::context::FillContext;

pub(crate) fn date(
    y: i32,
    m: u32,
    d: u32,
) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn sample_form() -> FormData {
    FormData {
        tax_year: 2025,
        personal: PersonalInfo {
            first_name: "Asha".to_string(),
            middle_initial: Some("K".to_string()),
            last_name: "Rao".to_string(),
            date_of_birth: Some(date(2000, 4, 12)),
            email: "asha.rao@example.edu".to_string(),
            phone: "217-555-0142".to_string(),
            us_address: UsAddress {
                street: "1010 W Green St".to_string(),
                apartment: Some("4B".to_string()),
                city: "Urbana".to_string(),
                state: "IL".to_string(),
                zip: "61801".to_string(),
            },
            foreign_address: ForeignAddress {
                street: "12 MG Road".to_string(),
                city: "Pune".to_string(),
                province: Some("Maharashtra".to_string()),
                postal_code: "411001".to_string(),
                country: "India".to_string(),
            },
            country_of_citizenship: "India".to_string(),
            passport_country: "India".to_string(),
            passport_number: "Z1234567".to_string(),
        },
        academic: AcademicInfo {
            institution_name: "University of Illinois Urbana-Champaign".to_string(),
            institution_address: "601 E John St, Champaign, IL 61820".to_string(),
            institution_phone: "217-333-1000".to_string(),
            director_name: "Jordan Lee".to_string(),
            director_address: "310 Turner Student Services Bldg, Urbana, IL 61801".to_string(),
            director_phone: "217-333-1303".to_string(),
        },
        residency: ResidencyRecord {
            date_of_first_visit: date(2023, 8, 10),
            visits: vec![
                Visit {
                    visa_type: VisaType::F1,
                    entry_date: Some(date(2023, 8, 10)),
                    exit_date: Some(date(2024, 5, 20)),
                },
                Visit {
                    visa_type: VisaType::F1,
                    entry_date: Some(date(2024, 8, 12)),
                    exit_date: None,
                },
            ],
            has_filed_tax_return_before: true,
            year_filed: Some(2024),
            form_used: Some("1040-NR".to_string()),
        },
        income: IncomeRecord {
            had_us_income: true,
            income_state: IncomeState::Illinois,
            ssn: Some("123456789".to_string()),
            w2_entries: vec![
                W2Entry {
                    employer_name: "University of Illinois".to_string(),
                    ein: "376000511".to_string(),
                    wages: dec!(30000.00),
                    federal_tax_withheld: dec!(2000.00),
                    state_tax_withheld: dec!(1400.00),
                    social_security_withheld: dec!(0),
                    medicare_withheld: dec!(0),
                },
                W2Entry {
                    employer_name: "Campus Rec".to_string(),
                    ein: "37-1234567".to_string(),
                    wages: dec!(4000.50),
                    federal_tax_withheld: dec!(150.25),
                    state_tax_withheld: dec!(120.75),
                    social_security_withheld: dec!(248.03),
                    medicare_withheld: dec!(58.01),
                },
            ],
            interest_entries: vec![IncomeEntry {
                payer_name: "First Midwest Bank".to_string(),
                payer_tin: Some("361234567".to_string()),
                amount: dec!(120.40),
                federal_tax_withheld: dec!(0),
                state_tax_withheld: dec!(0),
            }],
            misc_entries: Vec::new(),
            fica_employer_info: Some(vec![FicaEmployerInfo {
                employer_name: "Campus Recreation".to_string(),
                employer_address: "201 E Peabody Dr, Champaign, IL 61820".to_string(),
            }]),
            fica_refund_opt_out: false,
            bank_details: Some(BankDetails {
                account_number: "000123456789".to_string(),
                routing_number: "071000013".to_string(),
                account_type: AccountType::Checking,
            }),
        },
    }
}

pub(crate) fn context_for(form: FormData) -> FillContext {
    let tax = compute_tax_result(&form).unwrap();
    FillContext::as_of(form, tax, date(2026, 3, 1))
}

pub(crate) fn sample_context() -> FillContext {
    context_for(sample_form())
}
