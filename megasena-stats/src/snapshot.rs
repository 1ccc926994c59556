use tracing::debug;

use megasena_db::models::Draw;

use crate::frequency::FrequencyTable;
use crate::patterns::{
    DecadeAnalysis, ParityAnalysis, TransitionAnalysis, analyze_decades, analyze_parity,
    analyze_transitions,
};

/// Frequências e padrões calculados uma vez por importação.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSnapshot {
    pub frequency: FrequencyTable,
    pub decades: Option<DecadeAnalysis>,
    pub parity: Option<ParityAnalysis>,
    pub transitions: Option<TransitionAnalysis>,
}

impl StatsSnapshot {
    pub fn from_draws(draws: &[Draw]) -> Self {
        let snapshot = Self {
            frequency: FrequencyTable::from_draws(draws),
            decades: analyze_decades(draws),
            parity: analyze_parity(draws),
            transitions: analyze_transitions(draws),
        };
        debug!(
            "Estatísticas recalculadas sobre {} sorteios (paridade dominante: {:?})",
            draws.len(),
            snapshot.parity.as_ref().and_then(|p| p.most_common()).map(|p| p.to_string())
        );
        snapshot
    }

    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }
}
