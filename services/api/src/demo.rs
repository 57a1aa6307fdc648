use crate::infra::{default_criteria, load_criteria_from_path, seed_default_weights};
use clap::Args;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use vendorscore::config::ScoringConfig;
use vendorscore::error::AppError;
use vendorscore::evaluations::{
    Criterion, CriterionId, EvaluationRequest, EvaluationService, EvaluationSummary,
    InMemoryStore, OrganizationId, Rating, ScoreEntry, ScoringInput, Strategy,
    SupplierRegistration,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Strategy the demo evaluation is scored under
    #[arg(long, value_parser = parse_strategy, default_value = "Strategisch")]
    pub(crate) strategy: Strategy,
    /// Supplier name used for the demo evaluation
    #[arg(long, default_value = "Noordzee Facilitair B.V.")]
    pub(crate) supplier: String,
    /// CSV criteria catalog; defaults to the built-in catalog
    #[arg(long)]
    pub(crate) criteria_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file with `criteria`, `scores` (criterion id -> entry) and `weights` (block -> raw weight)
    #[arg(long)]
    pub(crate) input: PathBuf,
}

fn parse_strategy(raw: &str) -> Result<Strategy, String> {
    Strategy::parse(raw).ok_or_else(|| {
        let expected = Strategy::ALL.map(Strategy::label).join(", ");
        format!("unknown strategy '{raw}' (expected one of {expected})")
    })
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let reader = BufReader::new(File::open(&args.input)?);
    let input: ScoringInput = serde_json::from_reader(reader)?;
    let totals = input.compute();
    println!("{}", serde_json::to_string_pretty(&totals)?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        strategy,
        supplier,
        criteria_csv,
    } = args;

    let criteria = match criteria_csv {
        Some(path) => load_criteria_from_path(&path)?,
        None => default_criteria(),
    };

    let store = Arc::new(InMemoryStore::with_criteria(criteria.clone()));
    let service = EvaluationService::new(store.clone(), store, ScoringConfig::default());
    let organization_id = OrganizationId("org-demo".to_string());

    println!("VendorScore evaluation demo");
    seed_default_weights(&service, &organization_id)?;

    let supplier = service.register_supplier(SupplierRegistration {
        organization_id: organization_id.clone(),
        name: supplier,
        kvk_number: Some("1234 5678".to_string()),
        classification: Some(format!("{} leverancier", strategy.label())),
    })?;
    println!(
        "Supplier: {} (KVK {})",
        supplier.name,
        supplier
            .kvk_number
            .as_ref()
            .map(|kvk| kvk.as_str())
            .unwrap_or("-")
    );

    let evaluation = service.create_evaluation(EvaluationRequest {
        organization_id,
        supplier_id: supplier.id,
        strategy,
        title: None,
    })?;
    println!("Evaluation: {} [{}]", evaluation.title, evaluation.strategy);

    let saved = service.save_all(&evaluation.id, demo_ratings(&criteria))?;
    println!("Saved {} of {} criteria", saved.len(), criteria.len());

    let summary = service.summary(&evaluation.id)?;
    render_summary(&summary);
    Ok(())
}

/// Rates every criterion except the last one, cycling through the rating scale.
fn demo_ratings(criteria: &[Criterion]) -> BTreeMap<CriterionId, ScoreEntry> {
    const CYCLE: [Rating; 4] = [
        Rating::Uitstekend,
        Rating::Goed,
        Rating::Goed,
        Rating::Redelijk,
    ];

    let rated = criteria.len().saturating_sub(1);
    criteria
        .iter()
        .take(rated)
        .enumerate()
        .map(|(index, criterion)| {
            (
                criterion.id.clone(),
                ScoreEntry::rated(CYCLE[index % CYCLE.len()]),
            )
        })
        .collect()
}

fn render_summary(summary: &EvaluationSummary) {
    println!("\nBlock breakdown");
    for (block, breakdown) in &summary.totals.per_block {
        println!(
            "  {} {:<32} score {:>5.2}  weight {:>4.1} ({:>5.1}%)  contribution {:>6.2}  rated {}/{}",
            block.code(),
            block.title(),
            breakdown.block_score,
            breakdown.raw_weight,
            breakdown.normalized_weight * 100.0,
            breakdown.contribution,
            breakdown.rated,
            breakdown.criteria,
        );
    }

    println!(
        "\nProgress: {}/{} criteria rated ({}%)",
        summary.progress.rated, summary.progress.total, summary.progress.percent
    );
    println!(
        "Total: {:.1} / 100  {}",
        summary.totals.total, summary.totals.stars
    );
}
