//! CSV loader for W-2 entries.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Header names
//! are case-sensitive.
//!
//! | Column                     | Required | Type    | Notes                          |
//! |----------------------------|----------|---------|--------------------------------|
//! | `employer_name`            | yes      | string  | Box c                          |
//! | `ein`                      | yes      | string  | Box b, with or without the dash |
//! | `wages`                    | yes      | decimal | Box 1                          |
//! | `federal_tax_withheld`     | yes      | decimal | Box 2                          |
//! | `state_tax_withheld`       | no       | decimal | Box 17, empty means 0          |
//! | `social_security_withheld` | no       | decimal | Box 4, empty means 0           |
//! | `medicare_withheld`        | no       | decimal | Box 6, empty means 0           |
//!
//! ### Example
//!
//! ```csv
//! employer_name,ein,wages,federal_tax_withheld,state_tax_withheld,social_security_withheld,medicare_withheld
//! University of Illinois,37-6000511,30000.00,2000.00,1000.00,,
//! Campus Recreation,371234567,4000.00,300.00,300.00,248.03,58.01
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::W2Entry;
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct CsvRow {
    employer_name: String,
    ein: String,
    wages: Decimal,
    federal_tax_withheld: Decimal,
    state_tax_withheld: Option<Decimal>,
    social_security_withheld: Option<Decimal>,
    medicare_withheld: Option<Decimal>,
}

#[derive(Debug, Error)]
pub enum W2CsvError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Bad structure, missing column or a value of the wrong type.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based; the header is row 0.
    #[error("missing EIN for '{employer}' on row {row}")]
    MissingEin { employer: String, row: usize },
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<W2Entry, W2CsvError> {
    if row.ein.is_empty() {
        return Err(W2CsvError::MissingEin {
            employer: row.employer_name,
            row: row_number,
        });
    }

    Ok(W2Entry {
        employer_name: row.employer_name,
        ein: row.ein,
        wages: row.wages,
        federal_tax_withheld: row.federal_tax_withheld,
        state_tax_withheld: row.state_tax_withheld.unwrap_or_default(),
        social_security_withheld: row.social_security_withheld.unwrap_or_default(),
        medicare_withheld: row.medicare_withheld.unwrap_or_default(),
    })
}

/// Parses CSV text into W-2 entries in file order.
pub fn load_from_str(input: &str) -> Result<Vec<W2Entry>, W2CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1))
        .collect()
}

pub fn load_from_file(path: &Path) -> Result<Vec<W2Entry>, W2CsvError> {
    let contents = std::fs::read_to_string(path).map_err(|source| W2CsvError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL_CSV: &str = "\
employer_name,ein,wages,federal_tax_withheld
University of Illinois,37-6000511,30000.00,2000.00
";

    const FICA_CSV: &str = "\
ein,employer_name,wages,federal_tax_withheld,state_tax_withheld,social_security_withheld,medicare_withheld
37-6000511,University of Illinois,30000.00,2000.00,1000.00,,
371234567, Campus Recreation ,4000.00,300.00,300.00,248.03,58.01
";

    // =========================================================================
    // Parsing
    // =========================================================================

    #[test]
    fn optional_amounts_default_to_zero() {
        let entries = load_from_str(MINIMAL_CSV).unwrap();

        assert_eq!(entries.len(), 1);
        let w2 = &entries[0];
        assert_eq!(w2.employer_name, "University of Illinois");
        assert_eq!(w2.wages, dec!(30000.00));
        assert_eq!(w2.state_tax_withheld, dec!(0));
        assert!(!w2.has_fica_withholding());
    }

    #[test]
    fn rows_keep_file_order_and_fica_amounts() {
        let entries = load_from_str(FICA_CSV).unwrap();

        let employers: Vec<&str> = entries.iter().map(|w2| w2.employer_name.as_str()).collect();
        assert_eq!(employers, vec!["University of Illinois", "Campus Recreation"]);
        assert_eq!(entries[1].fica_withheld(), dec!(306.04));
        assert_eq!(entries[1].ein, "371234567");
    }

    #[test]
    fn header_only_is_empty() {
        let csv = "employer_name,ein,wages,federal_tax_withheld\n";

        assert!(load_from_str(csv).unwrap().is_empty());
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn missing_ein_reports_row() {
        let csv = "\
employer_name,ein,wages,federal_tax_withheld
A,371234567,1.00,0
B,,2.00,0
";

        match load_from_str(csv).unwrap_err() {
            W2CsvError::MissingEin { employer, row } => {
                assert_eq!(employer, "B");
                assert_eq!(row, 2);
            }
            other => panic!("expected MissingEin, got {other:?}"),
        }
    }

    #[test]
    fn missing_required_column_is_parse_error() {
        let csv = "employer_name,ein,wages\nA,371234567,1.00\n";

        assert!(matches!(load_from_str(csv), Err(W2CsvError::Parse(_))));
    }

    #[test]
    fn non_numeric_wages_is_parse_error() {
        let csv = "employer_name,ein,wages,federal_tax_withheld\nA,371234567,lots,0\n";

        assert!(matches!(load_from_str(csv), Err(W2CsvError::Parse(_))));
    }
}
