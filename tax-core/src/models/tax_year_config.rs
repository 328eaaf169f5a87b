use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxBracket;

/// The only tax year the rule set is published for.
pub const SUPPORTED_TAX_YEAR: i32 = 2025;

/// Rule constants for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,
    /// Flat standard deduction available to Indian students under Article
    /// 21(2) of the U.S.-India treaty.
    pub treaty_standard_deduction: Decimal,
    /// Illinois personal exemption for a single filer.
    pub il_exemption_allowance: Decimal,
    /// Above this base income the exemption is lost entirely.
    pub il_exemption_income_limit: Decimal,
    pub il_income_tax_rate: Decimal,
    /// Schedule X (single), sorted by `min_income`.
    pub federal_brackets: Vec<TaxBracket>,
}

impl TaxYearConfig {
    /// Rule constants for `tax_year`, or `None` if the year is not supported.
    pub fn for_year(tax_year: i32) -> Option<Self> {
        match tax_year {
            2025 => Some(Self::tax_year_2025()),
            _ => None,
        }
    }

    pub fn tax_year_2025() -> Self {
        // (min, max, rate in percent, base tax in cents)
        const SCHEDULE_X: [(i64, Option<i64>, i64, i64); 7] = [
            (0, Some(11_925), 10, 0),
            (11_926, Some(48_475), 12, 119_250),
            (48_476, Some(103_350), 22, 557_850),
            (103_351, Some(197_300), 24, 1_765_100),
            (197_301, Some(250_525), 32, 4_019_900),
            (250_526, Some(626_350), 35, 5_723_100),
            (626_351, None, 37, 18_876_975),
        ];

        let federal_brackets = SCHEDULE_X
            .iter()
            .map(|&(min, max, rate, base_cents)| TaxBracket {
                tax_year: 2025,
                min_income: Decimal::from(min),
                max_income: max.map(Decimal::from),
                tax_rate: Decimal::new(rate, 2),
                base_tax: Decimal::new(base_cents, 2),
            })
            .collect();

        Self {
            tax_year: 2025,
            treaty_standard_deduction: Decimal::from(15_750),
            il_exemption_allowance: Decimal::from(2_850),
            il_exemption_income_limit: Decimal::from(250_000),
            il_income_tax_rate: Decimal::new(495, 4),
            federal_brackets,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn tax_year_2025_has_seven_contiguous_brackets() {
        let config = TaxYearConfig::tax_year_2025();

        assert_eq!(config.federal_brackets.len(), 7);
        for pair in config.federal_brackets.windows(2) {
            let upper = pair[0].max_income.expect("only the last bracket is open");
            assert_eq!(pair[1].min_income, upper + dec!(1));
        }
        assert_eq!(config.federal_brackets[6].max_income, None);
    }

    #[test]
    fn tax_year_2025_base_amounts() {
        let config = TaxYearConfig::tax_year_2025();
        let bases: Vec<Decimal> = config
            .federal_brackets
            .iter()
            .map(|b| b.base_tax)
            .collect();

        assert_eq!(
            bases,
            vec![
                dec!(0),
                dec!(1192.50),
                dec!(5578.50),
                dec!(17651),
                dec!(40199),
                dec!(57231),
                dec!(188769.75)
            ]
        );
    }

    #[test]
    fn illinois_constants() {
        let config = TaxYearConfig::tax_year_2025();

        assert_eq!(config.il_income_tax_rate, dec!(0.0495));
        assert_eq!(config.il_exemption_allowance, dec!(2850));
        assert_eq!(config.il_exemption_income_limit, dec!(250000));
    }

    #[test]
    fn unsupported_year_is_none() {
        assert_eq!(TaxYearConfig::for_year(2024), None);
        assert!(TaxYearConfig::for_year(SUPPORTED_TAX_YEAR).is_some());
    }
}
