//! Análises descritivas por sorteio: grupos de dezenas, paridade e transições de paridade.
//!
//! Toda análise devolve `None` quando não há sorteios carregados.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use megasena_db::models::{DECADE_COUNT, DecadeGroup, Draw, PICK_COUNT, Parity};

/// Quantidade de dezenas em cada grupo (01-10 .. 51-60), exibida como `1-1-1-1-1-1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecadePattern(pub [u8; DECADE_COUNT]);

impl DecadePattern {
    pub fn of(numbers: &[u8]) -> Self {
        let mut counts = [0u8; DECADE_COUNT];
        for &n in numbers {
            counts[DecadeGroup::of(n).index()] += 1;
        }
        DecadePattern(counts)
    }

    /// Uma dezena por grupo.
    pub fn uniform() -> Self {
        DecadePattern([1; DECADE_COUNT])
    }

    pub fn count(&self, group: DecadeGroup) -> u8 {
        self.0[group.index()]
    }
}

impl fmt::Display for DecadePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("-"))
    }
}

/// Pares e ímpares de um sorteio, exibido como `3p-3i`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParityPattern {
    pub even: u8,
    pub odd: u8,
}

impl ParityPattern {
    pub fn of(numbers: &[u8]) -> Self {
        let even = numbers.iter().filter(|&&n| Parity::of(n) == Parity::Even).count() as u8;
        ParityPattern { even, odd: numbers.len() as u8 - even }
    }

    pub fn with_even(even: u8) -> Self {
        let even = even.min(PICK_COUNT as u8);
        ParityPattern { even, odd: PICK_COUNT as u8 - even }
    }

    pub fn target(&self, parity: Parity) -> u8 {
        match parity {
            Parity::Even => self.even,
            Parity::Odd => self.odd,
        }
    }
}

impl fmt::Display for ParityPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p-{}i", self.even, self.odd)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternStat<P> {
    pub pattern: P,
    pub count: u32,
    pub percentage: f64,
}

/// Mais comum primeiro; empate resolvido pela ordem textual do padrão.
fn rank_patterns<P: Copy + Ord + Hash>(patterns: impl IntoIterator<Item = P>, total: usize) -> Vec<PatternStat<P>> {
    let mut counts: HashMap<P, u32> = HashMap::new();
    for p in patterns {
        *counts.entry(p).or_insert(0) += 1;
    }
    let mut ranked: Vec<PatternStat<P>> = counts
        .into_iter()
        .map(|(pattern, count)| PatternStat {
            pattern,
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.pattern.cmp(&b.pattern)));
    ranked
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecadeAnalysis {
    /// Percentual das posições sorteadas que caíram em cada grupo.
    pub shares: [f64; DECADE_COUNT],
    pub patterns: Vec<PatternStat<DecadePattern>>,
}

impl DecadeAnalysis {
    pub fn share(&self, group: DecadeGroup) -> f64 {
        self.shares[group.index()]
    }

    pub fn most_common(&self) -> Option<DecadePattern> {
        self.patterns.first().map(|s| s.pattern)
    }

    pub fn top(&self, k: usize) -> &[PatternStat<DecadePattern>] {
        &self.patterns[..k.min(self.patterns.len())]
    }
}

pub fn analyze_decades(draws: &[Draw]) -> Option<DecadeAnalysis> {
    if draws.is_empty() {
        return None;
    }

    let mut slots = [0u32; DECADE_COUNT];
    let patterns: Vec<DecadePattern> = draws
        .iter()
        .map(|d| {
            let pattern = DecadePattern::of(&d.numbers);
            for (slot, &c) in slots.iter_mut().zip(pattern.0.iter()) {
                *slot += c as u32;
            }
            pattern
        })
        .collect();

    let denominator = (draws.len() * PICK_COUNT) as f64;
    let mut shares = [0.0f64; DECADE_COUNT];
    for (share, &count) in shares.iter_mut().zip(slots.iter()) {
        *share = count as f64 / denominator * 100.0;
    }

    Some(DecadeAnalysis {
        shares,
        patterns: rank_patterns(patterns, draws.len()),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParityAnalysis {
    pub patterns: Vec<PatternStat<ParityPattern>>,
}

impl ParityAnalysis {
    pub fn most_common(&self) -> Option<ParityPattern> {
        self.patterns.first().map(|s| s.pattern)
    }

    pub fn top(&self, k: usize) -> &[PatternStat<ParityPattern>] {
        &self.patterns[..k.min(self.patterns.len())]
    }
}

pub fn analyze_parity(draws: &[Draw]) -> Option<ParityAnalysis> {
    if draws.is_empty() {
        return None;
    }
    let patterns = draws.iter().map(|d| ParityPattern::of(&d.numbers));
    Some(ParityAnalysis {
        patterns: rank_patterns(patterns, draws.len()),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    EvenEven,
    EvenOdd,
    OddEven,
    OddOdd,
}

impl TransitionKind {
    pub const ALL: [TransitionKind; 4] = [
        TransitionKind::EvenEven,
        TransitionKind::EvenOdd,
        TransitionKind::OddEven,
        TransitionKind::OddOdd,
    ];

    pub fn between(current: u8, next: u8) -> Self {
        match (Parity::of(current), Parity::of(next)) {
            (Parity::Even, Parity::Even) => TransitionKind::EvenEven,
            (Parity::Even, Parity::Odd) => TransitionKind::EvenOdd,
            (Parity::Odd, Parity::Even) => TransitionKind::OddEven,
            (Parity::Odd, Parity::Odd) => TransitionKind::OddOdd,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionKind::EvenEven => write!(f, "par-par"),
            TransitionKind::EvenOdd => write!(f, "par-impar"),
            TransitionKind::OddEven => write!(f, "impar-par"),
            TransitionKind::OddOdd => write!(f, "impar-impar"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionAnalysis {
    counts: [u32; 4],
    pub total_pairs: u32,
}

impl TransitionAnalysis {
    pub fn count(&self, kind: TransitionKind) -> u32 {
        self.counts[kind.index()]
    }

    pub fn percentage(&self, kind: TransitionKind) -> f64 {
        self.count(kind) as f64 / self.total_pairs as f64 * 100.0
    }

    pub fn percentages(&self) -> [(TransitionKind, f64); 4] {
        TransitionKind::ALL.map(|kind| (kind, self.percentage(kind)))
    }
}

pub fn analyze_transitions(draws: &[Draw]) -> Option<TransitionAnalysis> {
    let mut counts = [0u32; 4];
    let mut total_pairs = 0u32;

    for draw in draws {
        let mut sorted = draw.numbers;
        sorted.sort_unstable();
        for pair in sorted.windows(2) {
            counts[TransitionKind::between(pair[0], pair[1]).index()] += 1;
            total_pairs += 1;
        }
    }

    if total_pairs == 0 {
        return None;
    }
    Some(TransitionAnalysis { counts, total_pairs })
}
