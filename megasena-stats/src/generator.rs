//! Geração de jogos por amostragem com rejeição limitada.
//!
//! Cada jogo é montado gulosamente a partir de um pool priorizado (favoritos, quentes,
//! restantes), respeitando alvos de paridade e de grupos de dezenas. As restrições são
//! de melhor esforço: se o pool se esgota, o jogo é completado sem restrição.

use std::collections::{BTreeSet, HashSet};

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::{debug, warn};

use megasena_db::models::{DecadeGroup, Game, PICK_COUNT, POOL_SIZE, Parity};

use crate::config::GeneratorConfig;
use crate::error::{StatsError, validate_count, validate_favorites};
use crate::frequency::FrequencyTable;
use crate::patterns::{DecadePattern, ParityPattern};
use crate::snapshot::StatsSnapshot;

const PREALLOCATED_GAMES: usize = 1024;

/// Quantas dezenas de cada paridade e de cada grupo um jogo deve ter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Targets {
    pub parity: ParityPattern,
    pub decades: DecadePattern,
}

impl Targets {
    /// Sem histórico : `default_even` pares e uma dezena por grupo.
    pub fn fallback(default_even: u8) -> Self {
        Self {
            parity: ParityPattern::with_even(default_even),
            decades: DecadePattern::uniform(),
        }
    }

    /// Padrões mais comuns do histórico, cada um com seu próprio fallback.
    pub fn most_common(snapshot: &StatsSnapshot, default_even: u8) -> Self {
        let fallback = Self::fallback(default_even);
        Self {
            parity: snapshot
                .parity
                .as_ref()
                .and_then(|p| p.most_common())
                .unwrap_or(fallback.parity),
            decades: snapshot
                .decades
                .as_ref()
                .and_then(|d| d.most_common())
                .unwrap_or(fallback.decades),
        }
    }

    /// Sorteia paridade e grupos entre os `top` padrões mais comuns.
    pub fn random_among_top<R: Rng + ?Sized>(
        snapshot: &StatsSnapshot,
        top: usize,
        default_even: u8,
        rng: &mut R,
    ) -> Self {
        let fallback = Self::fallback(default_even);
        let parity = snapshot
            .parity
            .as_ref()
            .and_then(|p| p.top(top).choose(rng))
            .map(|s| s.pattern)
            .unwrap_or(fallback.parity);
        let decades = snapshot
            .decades
            .as_ref()
            .and_then(|d| d.top(top).choose(rng))
            .map(|s| s.pattern)
            .unwrap_or(fallback.decades);
        Self { parity, decades }
    }
}

/// Jogo em construção, com as contagens por paridade e grupo já acumuladas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialGame {
    numbers: Vec<u8>,
    parity: ParityPattern,
    decades: DecadePattern,
}

impl PartialGame {
    fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_complete(&self) -> bool {
        self.numbers.len() >= PICK_COUNT
    }

    pub fn contains(&self, n: u8) -> bool {
        self.numbers.contains(&n)
    }

    pub fn parity_count(&self, parity: Parity) -> u8 {
        self.parity.target(parity)
    }

    pub fn decade_count(&self, group: DecadeGroup) -> u8 {
        self.decades.count(group)
    }

    pub fn push(&mut self, n: u8) {
        self.numbers.push(n);
        match Parity::of(n) {
            Parity::Even => self.parity.even += 1,
            Parity::Odd => self.parity.odd += 1,
        }
        self.decades.0[DecadeGroup::of(n).index()] += 1;
    }

    /// Só chamar com o jogo completo.
    fn into_game(self) -> Game {
        let mut game: Game = [0; PICK_COUNT];
        game.copy_from_slice(&self.numbers[..PICK_COUNT]);
        game.sort_unstable();
        game
    }
}

/// A dezena cabe no jogo sem estourar nenhum alvo?
pub fn admissible(game: &PartialGame, targets: &Targets, n: u8) -> bool {
    if game.is_complete() || !(1..=POOL_SIZE).contains(&n) || game.contains(n) {
        return false;
    }
    let parity = Parity::of(n);
    let group = DecadeGroup::of(n);
    game.parity_count(parity) < targets.parity.target(parity)
        && game.decade_count(group) < targets.decades.count(group)
}

/// Percorre o pool na ordem, admitindo o que couber; completa ao acaso se faltar.
pub fn build_game<R: Rng + ?Sized>(pool: &[u8], targets: &Targets, rng: &mut R) -> Game {
    let mut game = PartialGame::default();
    for &n in pool {
        if game.is_complete() {
            break;
        }
        if admissible(&game, targets, n) {
            game.push(n);
        }
    }

    if !game.is_complete() {
        let mut rest: Vec<u8> = (1..=POOL_SIZE).filter(|&n| !game.contains(n)).collect();
        rest.shuffle(rng);
        let missing = PICK_COUNT - game.len();
        for n in rest.into_iter().take(missing) {
            game.push(n);
        }
    }

    game.into_game()
}

/// Favoritos embaralhados, depois os quentes (fora os favoritos), depois o resto.
pub fn smart_pool<R: Rng + ?Sized>(
    favorites: &BTreeSet<u8>,
    frequency: &FrequencyTable,
    hot_size: usize,
    rng: &mut R,
) -> Vec<u8> {
    let mut favs: Vec<u8> = favorites.iter().copied().collect();
    favs.shuffle(rng);

    let mut hot: Vec<u8> = if frequency.is_empty() {
        Vec::new()
    } else {
        frequency
            .hot_numbers(hot_size)
            .into_iter()
            .filter(|n| !favorites.contains(n))
            .collect()
    };
    hot.shuffle(rng);

    let mut rest: Vec<u8> = (1..=POOL_SIZE)
        .filter(|n| !favorites.contains(n) && !hot.contains(n))
        .collect();
    rest.shuffle(rng);

    favs.into_iter().chain(hot).chain(rest).collect()
}

/// Favoritos presentes no conjunto filtrado primeiro, depois o restante do filtro.
pub fn strategic_pool<R: Rng + ?Sized>(
    favorites: &BTreeSet<u8>,
    filtered: &BTreeSet<u8>,
    rng: &mut R,
) -> Vec<u8> {
    let mut favs: Vec<u8> = favorites.intersection(filtered).copied().collect();
    favs.shuffle(rng);
    let mut others: Vec<u8> = filtered.difference(favorites).copied().collect();
    others.shuffle(rng);
    favs.into_iter().chain(others).collect()
}

/// Teto de tentativas: `count × factor`, nunca acima de `limit`.
pub fn attempt_ceiling(count: usize, factor: usize, limit: usize) -> usize {
    count.saturating_mul(factor).min(limit)
}

/// Repete `make` até ter `count` jogos distintos ou esgotar `max_attempts`.
fn collect_unique(count: usize, max_attempts: usize, mut make: impl FnMut() -> Game) -> Vec<Game> {
    let capacity = count.min(max_attempts).min(PREALLOCATED_GAMES);
    let mut seen: HashSet<Game> = HashSet::with_capacity(capacity);
    let mut games = Vec::with_capacity(capacity);
    let mut attempts = 0usize;

    while games.len() < count && attempts < max_attempts {
        attempts += 1;
        let game = make();
        if seen.insert(game) {
            games.push(game);
        }
    }

    if games.len() < count {
        warn!(
            "Apenas {} de {} jogos únicos após {} tentativas",
            games.len(),
            count,
            attempts
        );
    }
    games
}

pub struct Generator<'a> {
    snapshot: &'a StatsSnapshot,
    config: &'a GeneratorConfig,
}

impl<'a> Generator<'a> {
    pub fn new(snapshot: &'a StatsSnapshot, config: &'a GeneratorConfig) -> Self {
        Self { snapshot, config }
    }

    pub fn targets(&self) -> Targets {
        Targets::most_common(self.snapshot, self.config.default_even)
    }

    fn ceiling(&self, count: usize, factor: usize) -> usize {
        attempt_ceiling(count, factor, self.config.max_attempts)
    }

    /// Jogos guiados pelo padrão de paridade e de grupos mais comum do histórico.
    pub fn generate_smart<R: Rng + ?Sized>(
        &self,
        count: usize,
        favorites: &[u8],
        rng: &mut R,
    ) -> Result<Vec<Game>, StatsError> {
        validate_count(count)?;
        let favorites = validate_favorites(favorites)?;
        let targets = self.targets();
        debug!("Alvos : paridade {} / grupos {}", targets.parity, targets.decades);

        let max_attempts = self.ceiling(count, self.config.attempt_factor);
        Ok(collect_unique(count, max_attempts, || {
            let pool = smart_pool(&favorites, &self.snapshot.frequency, self.config.hot_pool_size, rng);
            build_game(&pool, &targets, rng)
        }))
    }

    /// Como `generate_smart`, mas restrito ao conjunto filtrado e com alvos sorteados
    /// por jogo entre os padrões mais comuns.
    pub fn generate_strategic<R: Rng + ?Sized>(
        &self,
        count: usize,
        favorites: &[u8],
        filtered: &BTreeSet<u8>,
        rng: &mut R,
    ) -> Result<Vec<Game>, StatsError> {
        validate_count(count)?;
        let favorites = validate_favorites(favorites)?;
        let filtered = validate_favorites(&filtered.iter().copied().collect::<Vec<_>>())?;

        let max_attempts = self.ceiling(count, self.config.strategic_attempt_factor);
        Ok(collect_unique(count, max_attempts, || {
            let targets = Targets::random_among_top(
                self.snapshot,
                self.config.strategic_top_patterns,
                self.config.default_even,
                rng,
            );
            let pool = strategic_pool(&favorites, &filtered, rng);
            build_game(&pool, &targets, rng)
        }))
    }

    /// Jogos uniformes, sem nenhum viés.
    pub fn generate_random<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Vec<Game>, StatsError> {
        validate_count(count)?;
        let max_attempts = self.ceiling(count, self.config.attempt_factor);
        Ok(collect_unique(count, max_attempts, || {
            let mut all: Vec<u8> = (1..=POOL_SIZE).collect();
            all.shuffle(rng);
            let mut game: Game = [0; PICK_COUNT];
            game.copy_from_slice(&all[..PICK_COUNT]);
            game.sort_unstable();
            game
        }))
    }
}
