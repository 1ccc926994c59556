//! Estado de uma sessão de uso: sorteios carregados, estatísticas em cache, seleção,
//! favoritos, histórico de jogos gerados e o gerador aleatório.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Local};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use megasena_db::models::{Game, format_numbers};
use megasena_db::store::DrawSet;

use crate::config::GeneratorConfig;
use crate::error::{StatsError, validate_game, validate_number};
use crate::generator::Generator;
use crate::history::{GameAnalysis, analyze_game};
use crate::snapshot::StatsSnapshot;
use crate::strategy::{FilterInfo, apply_all_filters};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedGame {
    pub numbers: Game,
    pub created_at: DateTime<Local>,
}

impl GeneratedGame {
    /// `[dd/mm/aaaa HH:MM:SS] 01 - 02 - ...`
    pub fn history_line(&self) -> String {
        format!(
            "[{}] {}",
            self.created_at.format("%d/%m/%Y %H:%M:%S"),
            format_numbers(&self.numbers, " - ")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
    /// A seleção já está no limite; nada mudou.
    Full,
}

pub struct Session {
    draws: Arc<DrawSet>,
    snapshot: StatsSnapshot,
    config: GeneratorConfig,
    selected: BTreeSet<u8>,
    favorites: BTreeSet<u8>,
    history: Vec<GeneratedGame>,
    rng: StdRng,
}

impl Session {
    /// Sem `seed`, o gerador é inicializado a partir do gerador da thread.
    pub fn new(config: GeneratorConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            draws: Arc::new(DrawSet::default()),
            snapshot: StatsSnapshot::default(),
            config,
            selected: BTreeSet::new(),
            favorites: BTreeSet::new(),
            history: Vec::new(),
            rng,
        }
    }

    pub fn draws(&self) -> Arc<DrawSet> {
        Arc::clone(&self.draws)
    }

    pub fn snapshot(&self) -> &StatsSnapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Troca o histórico inteiro de uma vez e recalcula as estatísticas.
    pub fn replace_draws(&mut self, draws: DrawSet) {
        let snapshot = StatsSnapshot::from_draws(&draws);
        self.draws = Arc::new(draws);
        self.snapshot = snapshot;
        info!("Sessão atualizada com {} sorteios", self.draws.len());
    }

    pub fn selected(&self) -> &BTreeSet<u8> {
        &self.selected
    }

    pub fn favorites(&self) -> &BTreeSet<u8> {
        &self.favorites
    }

    pub fn toggle_selected(&mut self, n: u8) -> Result<Toggle, StatsError> {
        validate_number(n)?;
        if self.selected.remove(&n) {
            return Ok(Toggle::Removed);
        }
        if self.selected.len() >= self.config.max_selected {
            return Ok(Toggle::Full);
        }
        self.selected.insert(n);
        Ok(Toggle::Added)
    }

    /// Move a seleção atual para os favoritos e a esvazia. `false` quando nada está selecionado.
    pub fn mark_favorites(&mut self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        self.favorites.append(&mut self.selected);
        true
    }

    pub fn set_favorites(&mut self, numbers: &[u8]) -> Result<(), StatsError> {
        for &n in numbers {
            validate_number(n)?;
        }
        self.favorites = numbers.iter().copied().collect();
        Ok(())
    }

    pub fn clear_selected(&mut self) {
        self.selected.clear();
    }

    pub fn clear_favorites(&mut self) {
        self.favorites.clear();
    }

    pub fn history(&self) -> &[GeneratedGame] {
        &self.history
    }

    fn record(&mut self, games: &[Game]) {
        let now = Local::now();
        self.history
            .extend(games.iter().map(|&numbers| GeneratedGame { numbers, created_at: now }));
    }

    fn favorites_vec(&self) -> Vec<u8> {
        self.favorites.iter().copied().collect()
    }

    pub fn generate_smart(&mut self, count: usize) -> Result<Vec<Game>, StatsError> {
        let favorites = self.favorites_vec();
        let games = Generator::new(&self.snapshot, &self.config).generate_smart(count, &favorites, &mut self.rng)?;
        self.record(&games);
        Ok(games)
    }

    /// Aplica os filtros estratégicos e gera dentro do conjunto resultante.
    pub fn generate_strategic(&mut self, count: usize) -> Result<(Vec<Game>, FilterInfo), StatsError> {
        let (filtered, info) = self.apply_filters();
        let favorites = self.favorites_vec();
        let games = Generator::new(&self.snapshot, &self.config).generate_strategic(
            count,
            &favorites,
            &filtered,
            &mut self.rng,
        )?;
        self.record(&games);
        Ok((games, info))
    }

    pub fn generate_random(&mut self, count: usize) -> Result<Vec<Game>, StatsError> {
        let games = Generator::new(&self.snapshot, &self.config).generate_random(count, &mut self.rng)?;
        self.record(&games);
        Ok(games)
    }

    pub fn apply_filters(&self) -> (BTreeSet<u8>, FilterInfo) {
        apply_all_filters(&self.snapshot, &self.draws, &self.config)
    }

    pub fn analyze(&self, numbers: &[u8]) -> Result<GameAnalysis, StatsError> {
        let game = validate_game(numbers)?;
        Ok(analyze_game(&self.draws, &game, self.config.recent_window))
    }
}
