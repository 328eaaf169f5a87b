//! Subcommand handlers. Each returns what it would print so that callers and
//! tests decide where it goes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tax_core::calculations::aggregate::fica_claims;
use tax_core::calculations::{NetPosition, YearPresence, ensure_payable_allowed, presence_history};
use tax_core::{FormData, Product, TaxResult, compute_tax_result, validate_form_data};
use tax_forms::{
    AssemblyError, DocumentKind, FieldValues, FillContext, FormTarget, PackageAssembler,
    evaluate_table,
};
use tax_pdf::{DirectoryTemplateStore, LopdfRenderer};
use tracing::{info, warn};

use crate::cli::InputArgs;
use crate::config::AppConfig;
use crate::w2_csv;

/// Reads the filing data, appends CSV W-2s when given and validates the
/// result.
pub fn read_form(input: &InputArgs) -> Result<FormData> {
    let json = std::fs::read_to_string(&input.input)
        .with_context(|| format!("Failed to read: {}", input.input.display()))?;
    let mut form: FormData = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse filing data: {}", input.input.display()))?;

    if let Some(path) = &input.w2_csv {
        let entries = w2_csv::load_from_file(path)
            .with_context(|| format!("Failed to load W-2 CSV: {}", path.display()))?;
        info!(path = %path.display(), count = entries.len(), "Imported W-2 entries");
        if !entries.is_empty() {
            form.income.had_us_income = true;
        }
        form.income.w2_entries.extend(entries);
    }

    validate_form_data(&form).context("Filing data is incomplete")?;
    Ok(form)
}

/// The filing data's own `tax_year` drives `compute`, `fields` and `prepare`;
/// the configured year only picks the year `days` counts. Returns a note when
/// the two differ.
pub fn tax_year_mismatch(
    form: &FormData,
    config: &AppConfig,
) -> Option<String> {
    (form.tax_year != config.tax_year).then(|| {
        format!(
            "Filing data is for {} but the configured tax year is {}; using {}",
            form.tax_year, config.tax_year, form.tax_year
        )
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputeReport {
    pub tax_year: i32,
    pub result: TaxResult,
    pub position: NetPosition,
    pub products: Vec<Product>,
    /// Why federal and state packages will be refused, if they will.
    pub refusal: Option<String>,
}

pub fn compute(form: &FormData) -> Result<ComputeReport> {
    let result = compute_tax_result(form).context("Tax rules failed")?;
    let position = NetPosition::from_result(&result);
    let refusal = ensure_payable_allowed(&result)
        .err()
        .map(|refusal| refusal.to_string());
    let products = result
        .applicable_products()
        .into_iter()
        .filter(|product| refusal.is_none() || !product.is_payable())
        .collect();

    Ok(ComputeReport {
        tax_year: form.tax_year,
        result,
        position,
        products,
        refusal,
    })
}

pub fn days(
    form: &FormData,
    year: i32,
    today: NaiveDate,
) -> [YearPresence; 3] {
    presence_history(&form.residency.visits, year, today)
}

/// Field values `document` would receive, before any template is consulted.
pub fn fields(
    form: FormData,
    document: DocumentKind,
    employer: usize,
    today: NaiveDate,
) -> Result<FieldValues> {
    let tax = compute_tax_result(&form).context("Tax rules failed")?;
    let target = target_for(document, &form, employer)?;
    let ctx = FillContext::as_of(form, tax, today);
    Ok(evaluate_table(&target.field_mappings(), &ctx))
}

fn target_for(
    document: DocumentKind,
    form: &FormData,
    employer: usize,
) -> Result<FormTarget> {
    let claim = || {
        let claims = fica_claims(&form.income);
        let count = claims.len();
        match claims.into_iter().nth(employer) {
            Some(claim) => Ok(claim),
            None if count == 0 => bail!("No W-2 has FICA withheld"),
            None => bail!("Employer {employer} out of range; {count} FICA claim(s)"),
        }
    };
    Ok(match document {
        DocumentKind::F8843 => FormTarget::F8843,
        DocumentKind::F1040Nr => FormTarget::F1040Nr,
        DocumentKind::F1040NrScheduleOi => FormTarget::F1040NrScheduleOi,
        DocumentKind::Il1040 => FormTarget::Il1040,
        DocumentKind::IlScheduleNr => FormTarget::IlScheduleNr,
        DocumentKind::IlScheduleIlWit => FormTarget::IlScheduleIlWit,
        DocumentKind::F843 => FormTarget::F843(claim()?),
        DocumentKind::F8316 => FormTarget::F8316(claim()?),
    })
}

/// One product's result from `prepare`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Prepared {
    Written {
        product: Product,
        path: PathBuf,
        pages: usize,
        degraded: Vec<String>,
        warnings: Vec<String>,
    },
    Refused {
        product: Product,
        reason: String,
    },
    NotApplicable {
        product: Product,
    },
}

pub fn output_path(
    output_dir: &Path,
    product: Product,
    tax_year: i32,
) -> PathBuf {
    output_dir.join(format!("{product}-{tax_year}.pdf"))
}

/// Assembles each of `products`, or every applicable product when empty, and
/// writes the packages under the configured output directory.
///
/// Refused and inapplicable products are reported, not treated as errors.
pub async fn prepare(
    form: FormData,
    products: &[Product],
    config: &AppConfig,
    today: NaiveDate,
) -> Result<Vec<Prepared>> {
    if let Some(note) = tax_year_mismatch(&form, config) {
        warn!("{note}");
    }
    let tax = compute_tax_result(&form).context("Tax rules failed")?;
    let products = if products.is_empty() {
        tax.applicable_products()
    } else {
        products.to_vec()
    };
    let tax_year = form.tax_year;
    let ctx = Arc::new(FillContext::as_of(form, tax, today));

    let assembler = PackageAssembler::new(
        Arc::new(DirectoryTemplateStore::new(&config.templates_dir)),
        Arc::new(LopdfRenderer::new()),
    )
    .with_template_timeout(config.template_timeout());

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Failed to create: {}", config.output_dir.display()))?;

    let mut prepared = Vec::with_capacity(products.len());
    for product in products {
        let package = match assembler.assemble(product, Arc::clone(&ctx)).await {
            Ok(package) => package,
            Err(AssemblyError::Refused(refusal)) => {
                warn!(%product, "{refusal}");
                prepared.push(Prepared::Refused {
                    product,
                    reason: refusal.to_string(),
                });
                continue;
            }
            Err(AssemblyError::NotApplicable { product }) => {
                warn!(%product, "Filing does not qualify for product");
                prepared.push(Prepared::NotApplicable { product });
                continue;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to prepare {product} package"));
            }
        };

        let path = output_path(&config.output_dir, product, tax_year);
        tokio::fs::write(&path, &package.bytes)
            .await
            .with_context(|| format!("Failed to write: {}", path.display()))?;
        info!(%product, path = %path.display(), pages = package.page_count, "Wrote package");

        prepared.push(Prepared::Written {
            product,
            path,
            pages: package.page_count,
            degraded: package.degraded,
            warnings: package.warnings.iter().map(ToString::to_string).collect(),
        });
    }
    Ok(prepared)
}

pub fn today_or(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Local::now().date_naive())
}
