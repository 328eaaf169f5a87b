//! Package assembly.
//!
//! Each product has a fixed plan: the instruction sheet first, then the forms
//! to sign, then supporting schedules. Every entry is rendered in its own task
//! on a [`JoinSet`]; results are put back in plan order before merging.
//!
//! | Product | Plan |
//! |---------|------|
//! | federal | instructions, 1040-NR, Schedule OI, 8843 (optional) |
//! | state | instructions, IL-1040, Schedule NR, Schedule IL-WIT |
//! | fica-refund | instructions, then 843 and 8316 for each employer |
//! | 8843-only | instructions, 8843 |
//!
//! A required entry that fails, or renders no pages, aborts the package and
//! drops the remaining tasks. An optional entry is replaced by a placeholder
//! page and reported in [`Package::degraded`].

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tax_core::Product;
use tax_core::calculations::aggregate::fica_claims;
use tax_core::calculations::{FilingRefusal, ensure_payable_allowed};
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::context::FillContext;
use crate::documents::FormTarget;
use crate::instructions::instruction_sheet;
use crate::mapping::{FieldWarning, fill_template};
use crate::render::{DocumentRenderer, RenderError, RenderedDocument};
use crate::template::{TemplateError, TemplateStore};

pub const DEFAULT_TEMPLATE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    /// Failure aborts the package.
    Required,
    /// Failure is replaced by a placeholder page.
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEntry {
    Instructions,
    Form(FormTarget),
}

impl PlanEntry {
    pub fn label(&self) -> String {
        match self {
            Self::Instructions => "instructions".to_string(),
            Self::Form(target) => target.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDocument {
    pub entry: PlanEntry,
    pub criticality: Criticality,
}

impl PlannedDocument {
    fn required(entry: PlanEntry) -> Self {
        Self {
            entry,
            criticality: Criticality::Required,
        }
    }

    fn optional(entry: PlanEntry) -> Self {
        Self {
            entry,
            criticality: Criticality::Optional,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPlan {
    pub product: Product,
    pub documents: Vec<PlannedDocument>,
}

impl ProductPlan {
    pub fn for_product(
        product: Product,
        ctx: &FillContext,
    ) -> Self {
        let form = |target| PlannedDocument::required(PlanEntry::Form(target));
        let mut documents = vec![PlannedDocument::required(PlanEntry::Instructions)];

        match product {
            Product::Federal => documents.extend([
                form(FormTarget::F1040Nr),
                form(FormTarget::F1040NrScheduleOi),
                PlannedDocument::optional(PlanEntry::Form(FormTarget::F8843)),
            ]),
            Product::State => documents.extend([
                form(FormTarget::Il1040),
                form(FormTarget::IlScheduleNr),
                form(FormTarget::IlScheduleIlWit),
            ]),
            Product::FicaRefund => {
                for claim in fica_claims(&ctx.form.income) {
                    documents.push(form(FormTarget::F843(claim.clone())));
                    documents.push(form(FormTarget::F8316(claim)));
                }
            }
            Product::Form8843Only => documents.push(form(FormTarget::F8843)),
        }

        Self { product, documents }
    }
}

/// The merged output for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub product: Product,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Labels of optional documents replaced by a placeholder.
    pub degraded: Vec<String>,
    pub warnings: Vec<FieldWarning>,
}

/// Why a single plan entry could not be rendered.
#[derive(Debug, Error)]
pub enum DocumentFailure {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("rendered no pages")]
    NoPages,
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("the {product} package does not apply to this filing")]
    NotApplicable { product: Product },

    #[error(transparent)]
    Refused(#[from] FilingRefusal),

    #[error("required document {label} failed: {source}")]
    RequiredDocument {
        label: String,
        #[source]
        source: DocumentFailure,
    },

    #[error("document task failed: {0}")]
    Task(#[from] JoinError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

type EntryOutput = (RenderedDocument, Vec<FieldWarning>);

pub struct PackageAssembler {
    store: Arc<dyn TemplateStore>,
    renderer: Arc<dyn DocumentRenderer>,
    template_timeout: Duration,
}

impl PackageAssembler {
    pub fn new(
        store: Arc<dyn TemplateStore>,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        Self {
            store,
            renderer,
            template_timeout: DEFAULT_TEMPLATE_TIMEOUT,
        }
    }

    pub fn with_template_timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.template_timeout = timeout;
        self
    }

    /// Builds the package for `product`.
    ///
    /// Payable products are refused when the filer owes net tax across the
    /// federal and Illinois returns.
    pub async fn assemble(
        &self,
        product: Product,
        ctx: Arc<FillContext>,
    ) -> Result<Package, AssemblyError> {
        if !ctx.tax.applicable_products().contains(&product) {
            return Err(AssemblyError::NotApplicable { product });
        }
        if product.is_payable() {
            ensure_payable_allowed(&ctx.tax)?;
        }

        let plan = ProductPlan::for_product(product, &ctx);
        info!(%product, documents = plan.documents.len(), "assembling package");

        let mut tasks = JoinSet::new();
        for (index, planned) in plan.documents.iter().enumerate() {
            let entry = planned.entry.clone();
            let store = Arc::clone(&self.store);
            let renderer = Arc::clone(&self.renderer);
            let ctx = Arc::clone(&ctx);
            let timeout = self.template_timeout;
            tasks.spawn(async move {
                let result =
                    render_entry(&entry, product, &ctx, store.as_ref(), renderer.as_ref(), timeout)
                        .await;
                (index, result)
            });
        }

        let mut rendered: Vec<Option<Result<EntryOutput, DocumentFailure>>> =
            plan.documents.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined?;
            let planned = &plan.documents[index];
            match result {
                Err(failure) if planned.criticality == Criticality::Required => {
                    let label = planned.entry.label();
                    error!(%product, document = %label, %failure, "required document failed");
                    return Err(AssemblyError::RequiredDocument {
                        label,
                        source: failure,
                    });
                }
                result => rendered[index] = Some(result),
            }
        }

        let mut parts = Vec::with_capacity(plan.documents.len());
        let mut degraded = Vec::new();
        let mut warnings = Vec::new();
        for (planned, result) in plan.documents.iter().zip(rendered) {
            match result {
                Some(Ok((document, field_warnings))) => {
                    warnings.extend(field_warnings);
                    parts.push(document);
                }
                Some(Err(failure)) => {
                    let label = planned.entry.label();
                    warn!(
                        %product,
                        document = %label,
                        %failure,
                        "optional document replaced by placeholder"
                    );
                    parts.push(self.placeholder(&planned.entry, &failure)?);
                    degraded.push(label);
                }
                None => {}
            }
        }

        let merged = self.renderer.merge(parts)?;
        info!(
            %product,
            pages = merged.page_count,
            degraded = degraded.len(),
            warnings = warnings.len(),
            "package assembled"
        );

        Ok(Package {
            product,
            bytes: merged.bytes,
            page_count: merged.page_count,
            degraded,
            warnings,
        })
    }

    fn placeholder(
        &self,
        entry: &PlanEntry,
        failure: &DocumentFailure,
    ) -> Result<RenderedDocument, RenderError> {
        let title = match entry {
            PlanEntry::Form(target) => target.kind().title(),
            PlanEntry::Instructions => "Instructions",
        };
        self.renderer.text_page(
            title,
            &[
                "This form could not be prepared automatically.".to_string(),
                format!("Reason: {failure}"),
                "Download the blank form from the issuing agency and complete it by hand."
                    .to_string(),
            ],
        )
    }
}

async fn render_entry(
    entry: &PlanEntry,
    product: Product,
    ctx: &FillContext,
    store: &dyn TemplateStore,
    renderer: &dyn DocumentRenderer,
    timeout: Duration,
) -> Result<EntryOutput, DocumentFailure> {
    let (document, warnings) = match entry {
        PlanEntry::Instructions => {
            let sheet = instruction_sheet(product, ctx);
            (renderer.text_page(&sheet.title, &sheet.lines)?, Vec::new())
        }
        PlanEntry::Form(target) => {
            let kind = target.kind();
            let template = tokio::time::timeout(timeout, store.load(kind))
                .await
                .map_err(|_| TemplateError::TimedOut {
                    kind,
                    after: timeout,
                })??;
            let outcome = fill_template(kind, &target.field_mappings(), &template.fields, ctx);
            debug!(
                document = %target.label(),
                filled = outcome.values.len(),
                skipped = outcome.warnings.len(),
                "filled template"
            );
            (renderer.fill(&template, &outcome.values)?, outcome.warnings)
        }
    };

    if document.page_count == 0 {
        return Err(DocumentFailure::NoPages);
    }
    Ok((document, warnings))
}
