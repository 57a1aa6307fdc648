use metrics_exporter_prometheus::PrometheusHandle;
use std::fs::File;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use vendorscore::error::AppError;
use vendorscore::evaluations::{
    load_criteria, Block, Criterion, CriterionId, EvaluationRepository, EvaluationService,
    EvaluationServiceError, OrganizationId, Strategy, WeightRepository,
};
use vendorscore::scoring::RawWeights;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn criterion(id: &str, block: Block, label: &str, points_max: f64) -> Criterion {
    Criterion {
        id: CriterionId(id.to_string()),
        block,
        label: label.to_string(),
        points_max,
    }
}

/// Built-in catalog used when no CSV catalog is supplied.
pub(crate) fn default_criteria() -> Vec<Criterion> {
    vec![
        criterion("k1-levertijd", Block::K1, "Levertijd conform afspraak", 10.0),
        criterion("k1-sla", Block::K1, "Naleving SLA en KPI's", 10.0),
        criterion("k1-rapportage", Block::K1, "Tijdigheid van rapportages", 5.0),
        criterion("k2-prijs", Block::K2, "Prijsniveau ten opzichte van markt", 10.0),
        criterion("k2-facturatie", Block::K2, "Juistheid van facturatie", 5.0),
        criterion("k2-contract", Block::K2, "Naleving contractvoorwaarden", 10.0),
        criterion("k3-kwaliteit", Block::K3, "Kwaliteit geleverde producten en diensten", 10.0),
        criterion("k3-continuiteit", Block::K3, "Leveringszekerheid en continuïteit", 10.0),
        criterion("k4-communicatie", Block::K4, "Bereikbaarheid en communicatie", 10.0),
        criterion("k4-escalatie", Block::K4, "Afhandeling van escalaties", 5.0),
        criterion("k5-innovatie", Block::K5, "Innovatieve voorstellen", 5.0),
        criterion("k5-duurzaamheid", Block::K5, "Duurzaamheid en CO2-reductie", 5.0),
    ]
}

/// Starting weight set per strategy: Strategisch leans on K3/K4, Knelpunt on continuity,
/// Hefboom on cost with strict performance, Routine stays flat and leaves K5 out.
pub(crate) fn default_weight_matrix(strategy: Strategy) -> RawWeights {
    let weights: [f64; 5] = match strategy {
        Strategy::Strategisch => [3.0, 3.0, 5.0, 5.0, 2.0],
        Strategy::Knelpunt => [5.0, 2.0, 6.0, 3.0, 1.0],
        Strategy::Hefboom => [5.0, 6.0, 3.0, 2.0, 1.0],
        Strategy::Routine => [4.0, 4.0, 3.0, 2.0, 0.0],
    };
    Block::ALL.into_iter().zip(weights).collect()
}

/// Store the default matrix for every strategy of `organization_id`.
pub(crate) fn seed_default_weights<R, W>(
    service: &EvaluationService<R, W>,
    organization_id: &OrganizationId,
) -> Result<(), EvaluationServiceError>
where
    R: EvaluationRepository + 'static,
    W: WeightRepository + 'static,
{
    for strategy in Strategy::ALL {
        service.configure_weights(organization_id, strategy, &default_weight_matrix(strategy))?;
    }
    info!(organization = %organization_id, "default weight matrix seeded");
    Ok(())
}

pub(crate) fn load_criteria_from_path(path: &Path) -> Result<Vec<Criterion>, AppError> {
    let file = File::open(path)?;
    Ok(load_criteria(file)?)
}
