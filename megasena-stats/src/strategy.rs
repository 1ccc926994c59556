use std::collections::BTreeSet;

use tracing::info;

use megasena_db::models::{DecadeGroup, POOL_SIZE};
use megasena_db::store::DrawSet;

use crate::config::GeneratorConfig;
use crate::patterns::DecadeAnalysis;
use crate::snapshot::StatsSnapshot;

/// Conjunto de dezenas ainda permitidas, estreitado filtro a filtro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    numbers: BTreeSet<u8>,
}

impl FilterState {
    pub fn full() -> Self {
        Self { numbers: (1..=POOL_SIZE).collect() }
    }

    pub fn keep_only(&mut self, allowed: &BTreeSet<u8>) {
        self.numbers.retain(|n| allowed.contains(n));
    }

    pub fn exclude(&mut self, removed: &BTreeSet<u8>) {
        self.numbers.retain(|n| !removed.contains(n));
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn numbers(&self) -> &BTreeSet<u8> {
        &self.numbers
    }

    pub fn into_numbers(self) -> BTreeSet<u8> {
        self.numbers
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterInfo {
    pub initial_count: usize,
    pub top_frequent: usize,
    pub removed_recent: usize,
    pub remaining: usize,
}

pub fn most_frequent(snapshot: &StatsSnapshot, count: usize) -> BTreeSet<u8> {
    snapshot.frequency.hot_numbers(count).into_iter().collect()
}

/// Dezenas dos `count` sorteios mais recentes.
pub fn recent_numbers(draws: &DrawSet, count: usize) -> BTreeSet<u8> {
    draws
        .recent(count)
        .iter()
        .flat_map(|d| d.numbers.iter().copied())
        .collect()
}

/// Dezenas dos grupos cuja participação atinge `min_pct`. Sem análise, todos os grupos.
pub fn strong_decades(decades: Option<&DecadeAnalysis>, min_pct: f64) -> BTreeSet<u8> {
    DecadeGroup::ALL
        .iter()
        .filter(|&&group| decades.is_none_or(|analysis| analysis.share(group) >= min_pct))
        .flat_map(|group| group.range())
        .collect()
}

/// Mais frequentes, menos os sorteados recentemente, opcionalmente restritos aos grupos fortes.
///
/// Sem histórico devolve 1..=60 e um `FilterInfo` zerado.
pub fn apply_all_filters(
    snapshot: &StatsSnapshot,
    draws: &DrawSet,
    config: &GeneratorConfig,
) -> (BTreeSet<u8>, FilterInfo) {
    let mut state = FilterState::full();
    if snapshot.is_empty() || draws.is_empty() {
        return (state.into_numbers(), FilterInfo::default());
    }

    let initial_count = state.len();
    let top = most_frequent(snapshot, config.top_frequent);
    state.keep_only(&top);

    let recent = recent_numbers(draws, config.recent_window);
    state.exclude(&recent);

    if let Some(min_pct) = config.min_decade_pct {
        state.keep_only(&strong_decades(snapshot.decades.as_ref(), min_pct));
    }

    let info = FilterInfo {
        initial_count,
        top_frequent: top.len(),
        removed_recent: recent.len(),
        remaining: state.len(),
    };
    info!(
        "Filtros aplicados : {} mais frequentes, {} recentes removidas, {} restantes",
        info.top_frequent, info.removed_recent, info.remaining
    );
    (state.into_numbers(), info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use megasena_db::models::make_test_draws;

    #[test]
    fn test_filter_state_ops() {
        let mut state = FilterState::full();
        assert_eq!(state.len(), 60);
        state.keep_only(&(1..=10).collect());
        state.exclude(&[2, 4, 99].into_iter().collect());
        assert_eq!(state.numbers().iter().copied().collect::<Vec<_>>(), vec![1, 3, 5, 6, 7, 8, 9, 10]);
        state.keep_only(&BTreeSet::new());
        assert!(state.is_empty());
    }

    #[test]
    fn test_recent_numbers() {
        let draws = DrawSet::new(make_test_draws(12));
        // concursos 12 e 11 : bases 1 e 0
        let recent = recent_numbers(&draws, 2);
        assert_eq!(recent, (1..=12).collect::<BTreeSet<u8>>());
        assert!(recent_numbers(&draws, 0).is_empty());
    }

    #[test]
    fn test_recent_numbers_ignores_input_order() {
        let mut draws = make_test_draws(12);
        draws.reverse();
        let recent = recent_numbers(&DrawSet::new(draws), 1);
        assert_eq!(recent, (7..=12).collect::<BTreeSet<u8>>());
    }

    #[test]
    fn test_strong_decades_without_analysis() {
        assert_eq!(strong_decades(None, 50.0).len(), 60);
    }

    #[test]
    fn test_strong_decades_threshold() {
        let snapshot = StatsSnapshot::from_draws(&make_test_draws(1));
        // um único sorteio 1..6 : grupo 01-10 com 100%
        let kept = strong_decades(snapshot.decades.as_ref(), 16.0);
        assert_eq!(kept, (1..=10).collect::<BTreeSet<u8>>());
    }

    #[test]
    fn test_apply_all_filters_without_history() {
        let snapshot = StatsSnapshot::default();
        let (numbers, info) = apply_all_filters(&snapshot, &DrawSet::default(), &GeneratorConfig::default());
        assert_eq!(numbers.len(), 60);
        assert_eq!(info, FilterInfo::default());
    }

    #[test]
    fn test_apply_all_filters() {
        let draws = DrawSet::new(make_test_draws(30));
        let snapshot = StatsSnapshot::from_draws(&draws);
        let config = GeneratorConfig::default();
        let (numbers, info) = apply_all_filters(&snapshot, &draws, &config);

        // Todas as dezenas saem 3 vezes : os 30 mais frequentes são 1..=30
        assert_eq!(info.initial_count, 60);
        assert_eq!(info.top_frequent, 30);
        // 5 sorteios recentes : concursos 30..26, bases 9..5 => 31..=60
        assert_eq!(info.removed_recent, 30);
        assert_eq!(info.remaining, 30);
        assert_eq!(numbers, (1..=30).collect::<BTreeSet<u8>>());
    }

    #[test]
    fn test_apply_all_filters_removes_recent() {
        let draws = DrawSet::new(make_test_draws(30));
        let snapshot = StatsSnapshot::from_draws(&draws);
        let config = GeneratorConfig { top_frequent: 60, recent_window: 2, ..Default::default() };
        let (numbers, info) = apply_all_filters(&snapshot, &draws, &config);
        // concursos 30 e 29 : bases 9 e 8 => 49..=60
        assert_eq!(info.removed_recent, 12);
        assert_eq!(numbers, (1..=48).collect::<BTreeSet<u8>>());
    }

    #[test]
    fn test_apply_all_filters_with_decade_threshold() {
        let draws = DrawSet::new(make_test_draws(30));
        let snapshot = StatsSnapshot::from_draws(&draws);
        let config = GeneratorConfig {
            top_frequent: 60,
            recent_window: 0,
            min_decade_pct: Some(100.0),
            ..Default::default()
        };
        let (numbers, _) = apply_all_filters(&snapshot, &draws, &config);
        assert!(numbers.is_empty());
    }
}
