//! Cover sheets placed first in every package: what was prepared, what to
//! sign, what to attach, and where to mail it.

use rust_decimal::Decimal;
use tax_core::calculations::aggregate::fica_claims;
use tax_core::{Product, Settlement};

use crate::context::FillContext;
use crate::format::{self, CurrencyStyle};

pub const IRS_AUSTIN: &str =
    "Department of the Treasury, Internal Revenue Service, Austin, TX 73301-0215";
pub const IRS_OGDEN: &str =
    "Department of the Treasury, Internal Revenue Service Center, Ogden, UT 84201-0038";
pub const IDOR_REFUND: &str = "Illinois Department of Revenue, PO Box 1040, Galesburg, IL 61402-1040";
pub const IDOR_PAYMENT: &str =
    "Illinois Department of Revenue, PO Box 19027, Springfield, IL 62794-9027";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionSheet {
    pub title: String,
    pub lines: Vec<String>,
}

pub fn instruction_sheet(
    product: Product,
    ctx: &FillContext,
) -> InstructionSheet {
    let year = ctx.tax_year();
    let mut lines = vec![
        format!("Prepared for {}", ctx.form.personal.full_name()),
        format!("Prepared on {}", format::date(ctx.today)),
        String::new(),
    ];

    let title = match product {
        Product::Federal => {
            lines.push(balance_line("Federal", &ctx.tax.federal.settlement));
            lines.extend([
                String::new(),
                "1. Sign and date Form 1040-NR on page 2.".to_string(),
                "2. Place Schedule OI and Form 8843 behind Form 1040-NR.".to_string(),
                "3. Attach Copy B of every Form W-2 and any Form 1099 showing federal tax withheld."
                    .to_string(),
                format!("4. Mail by April 15, {} to:", year + 1),
                format!("   {IRS_AUSTIN}"),
            ]);
            if ctx.tax.federal.amount_owed() > Decimal::ZERO {
                lines.push(
                    "Include a check payable to \"United States Treasury\" for the amount owed."
                        .to_string(),
                );
            }
            format!("Federal return for {year}: Form 1040-NR")
        }
        Product::State => {
            let owed = ctx.tax.state.amount_owed() > Decimal::ZERO;
            lines.push(balance_line("Illinois", &ctx.tax.state.settlement));
            lines.extend([
                String::new(),
                "1. Sign and date Form IL-1040 on page 2.".to_string(),
                "2. Place Schedule NR and Schedule IL-WIT behind Form IL-1040.".to_string(),
                "3. Attach a copy of your federal Form 1040-NR and every Form W-2.".to_string(),
                format!("4. Mail by April 15, {} to:", year + 1),
                format!("   {}", if owed { IDOR_PAYMENT } else { IDOR_REFUND }),
            ]);
            if owed {
                lines.push(
                    "Include a check payable to \"Illinois Department of Revenue\" for the amount owed."
                        .to_string(),
                );
            }
            format!("Illinois return for {year}: Form IL-1040")
        }
        Product::FicaRefund => {
            let claims = fica_claims(&ctx.form.income);
            lines.push(format!(
                "Social security and Medicare tax withheld in error, {} employer(s):",
                claims.len()
            ));
            for claim in &claims {
                lines.push(format!(
                    "   {}: ${}",
                    claim.employer_name.trim(),
                    CurrencyStyle::Cents.format(claim.total())
                ));
            }
            lines.extend([
                String::new(),
                "1. Sign and date each Form 843.".to_string(),
                "2. Place the matching Form 8316 behind each Form 843.".to_string(),
                "3. Attach Form W-2, a copy of your visa, Form I-94 and Form I-20.".to_string(),
                "4. Mail each claim to:".to_string(),
                format!("   {IRS_OGDEN}"),
            ]);
            format!("FICA refund claim for {year}: Forms 843 and 8316")
        }
        Product::Form8843Only => {
            lines.push(if ctx.form.income.had_us_income {
                "This package holds Form 8843 only. File your income tax returns separately."
                    .to_string()
            } else {
                "You had no U.S. income, so Form 8843 is the only statement you file.".to_string()
            });
            lines.extend([
                String::new(),
                "1. Sign and date Form 8843 on page 2.".to_string(),
                format!("2. Mail by June 15, {} to:", year + 1),
                format!("   {IRS_AUSTIN}"),
            ]);
            format!("Form 8843 for {year}")
        }
    };

    InstructionSheet { title, lines }
}

fn balance_line(
    authority: &str,
    settlement: &Settlement,
) -> String {
    let dollars = CurrencyStyle::WholeDollars;
    if settlement.refund > Decimal::ZERO {
        format!("{authority} refund: ${}", dollars.format(settlement.refund))
    } else if settlement.amount_owed > Decimal::ZERO {
        format!("{authority} amount owed: ${}", dollars.format(settlement.amount_owed))
    } else {
        format!("{authority} balance: $0")
    }
}
