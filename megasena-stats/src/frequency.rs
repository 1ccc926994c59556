use megasena_db::models::{Draw, POOL_SIZE, is_valid_number};

/// Contagem de ocorrências de cada dezena no histórico carregado.
///
/// Reconstruída por inteiro a cada importação; dezenas nunca sorteadas valem 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; POOL_SIZE as usize],
    draw_count: usize,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self { counts: [0; POOL_SIZE as usize], draw_count: 0 }
    }
}

impl FrequencyTable {
    pub fn from_draws(draws: &[Draw]) -> Self {
        let mut table = Self::default();
        for draw in draws {
            for &n in &draw.numbers {
                table.counts[(n - 1) as usize] += 1;
            }
        }
        table.draw_count = draws.len();
        table
    }

    pub fn count(&self, n: u8) -> u32 {
        if is_valid_number(n) { self.counts[(n - 1) as usize] } else { 0 }
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    pub fn is_empty(&self) -> bool {
        self.draw_count == 0
    }

    pub fn min_count(&self) -> u32 {
        self.counts.iter().copied().min().unwrap_or(0)
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// (dezena, contagem) para 1..=60.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts.iter().enumerate().map(|(i, &c)| (i as u8 + 1, c))
    }

    /// Contagem decrescente, dezena crescente no empate.
    pub fn ranked(&self) -> Vec<(u8, u32)> {
        let mut ranked: Vec<(u8, u32)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    pub fn hot_numbers(&self, k: usize) -> Vec<u8> {
        self.ranked().into_iter().take(k).map(|(n, _)| n).collect()
    }

    /// Contagem crescente, dezena crescente no empate.
    pub fn cold_numbers(&self, k: usize) -> Vec<u8> {
        let mut ranked: Vec<(u8, u32)> = self.iter().collect();
        ranked.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        ranked.into_iter().take(k).map(|(n, _)| n).collect()
    }
}
