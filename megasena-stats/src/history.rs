use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use megasena_db::models::Game;
use megasena_db::store::DrawSet;

pub const DEFAULT_RECENT_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawMatch {
    pub date: NaiveDate,
    pub numbers: Vec<u8>,
}

/// Contexto histórico de um jogo candidato.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameAnalysis {
    pub was_drawn: bool,
    pub last_drawn_date: Option<NaiveDate>,
    /// Dezenas do jogo que saíram nos últimos sorteios da janela.
    pub matches_recent: Vec<u8>,
    /// Concurso -> dezenas em comum, para todo sorteio com ao menos uma coincidência.
    pub matching_numbers: BTreeMap<u32, DrawMatch>,
}

impl GameAnalysis {
    /// Concursos com pelo menos `min` dezenas em comum, do mais recente ao mais antigo.
    pub fn strong_matches(&self, min: usize) -> Vec<(u32, &DrawMatch)> {
        self.matching_numbers
            .iter()
            .rev()
            .filter(|(_, m)| m.numbers.len() >= min)
            .map(|(&contest, m)| (contest, m))
            .collect()
    }
}

/// `DrawSet` garante a ordem do mais recente ao mais antigo: a primeira coincidência exata
/// é a última vez que o jogo saiu.
pub fn analyze_game(draws: &DrawSet, game: &Game, recent_window: usize) -> GameAnalysis {
    let mut analysis = GameAnalysis::default();
    let mut sorted = *game;
    sorted.sort_unstable();

    for draw in draws.iter() {
        if draw.numbers == sorted {
            analysis.was_drawn = true;
            analysis.last_drawn_date = Some(draw.date);
            break;
        }
    }

    for draw in draws.iter() {
        let shared: Vec<u8> = sorted.iter().copied().filter(|&n| draw.contains(n)).collect();
        if !shared.is_empty() {
            analysis.matching_numbers.insert(
                draw.contest,
                DrawMatch { date: draw.date, numbers: shared },
            );
        }
    }

    let recent: BTreeSet<u8> = draws
        .recent(recent_window)
        .iter()
        .flat_map(|d| d.numbers.iter().copied())
        .filter(|n| sorted.contains(n))
        .collect();
    analysis.matches_recent = recent.into_iter().collect();

    analysis
}
