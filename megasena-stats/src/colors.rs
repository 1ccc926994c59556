use std::fmt;

use crate::frequency::FrequencyTable;

pub const LEGEND_STEPS: usize = 5;

/// Cor de uma dezena : vermelho para as frias, verde para as quentes, azul sempre 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const NEUTRAL: Rgb = Rgb { r: 0x80, g: 0x80, b: 0x80 };
    pub const COLDEST: Rgb = Rgb { r: 255, g: 0, b: 0 };
    pub const HOTTEST: Rgb = Rgb { r: 0, g: 255, b: 0 };

    /// `v` em [0, 1]; valores fora são limitados.
    pub fn from_normalized(v: f64) -> Self {
        let v = v.clamp(0.0, 1.0);
        Rgb {
            r: (255.0 * (1.0 - v)).floor() as u8,
            g: (255.0 * v).floor() as u8,
            b: 0,
        }
    }

    /// Cinza neutro quando nenhum sorteio foi carregado.
    pub fn for_frequency(table: &FrequencyTable, n: u8) -> Self {
        if table.is_empty() {
            return Rgb::NEUTRAL;
        }
        Rgb::from_normalized(normalized_frequency(table, n))
    }
}

/// `#rrggbb`
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// (f - min) / (max - min) sobre as 60 contagens; 0 quando todas são iguais.
pub fn normalized_frequency(table: &FrequencyTable, n: u8) -> f64 {
    let min = table.min_count();
    let max = table.max_count();
    if max <= min {
        return 0.0;
    }
    (table.count(n).saturating_sub(min)) as f64 / (max - min) as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendEntry {
    pub color: Rgb,
    pub frequency: u32,
}

/// Cinco amostras igualmente espaçadas entre a menor e a maior frequência.
pub fn legend(table: &FrequencyTable) -> Vec<LegendEntry> {
    if table.is_empty() {
        return Vec::new();
    }
    let min = table.min_count() as f64;
    let max = table.max_count() as f64;
    let last = (LEGEND_STEPS - 1) as f64;

    (0..LEGEND_STEPS)
        .map(|i| {
            let v = i as f64 / last;
            LegendEntry {
                color: Rgb::from_normalized(v),
                frequency: (min + (max - min) * v).floor() as u32,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use megasena_db::models::{Draw, make_test_draws};

    fn table(draws: &[[u8; 6]]) -> FrequencyTable {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let draws: Vec<Draw> = draws
            .iter()
            .enumerate()
            .map(|(i, &numbers)| Draw::new(i as u32 + 1, date, numbers).unwrap())
            .collect();
        FrequencyTable::from_draws(&draws)
    }

    #[test]
    fn test_hex_format() {
        assert_eq!(Rgb::COLDEST.to_string(), "#ff0000");
        assert_eq!(Rgb::HOTTEST.to_string(), "#00ff00");
        assert_eq!(Rgb::NEUTRAL.to_string(), "#808080");
        assert_eq!(Rgb::from_normalized(0.5).to_string(), "#7f7f00");
    }

    #[test]
    fn test_min_is_coldest_max_is_hottest() {
        let t = table(&[[1, 2, 3, 4, 5, 6], [1, 2, 3, 4, 5, 7]]);
        assert_eq!(Rgb::for_frequency(&t, 1), Rgb::HOTTEST);
        assert_eq!(Rgb::for_frequency(&t, 60), Rgb::COLDEST);
        assert_eq!(Rgb::for_frequency(&t, 6), Rgb::from_normalized(0.5));
    }

    #[test]
    fn test_degenerate_table_is_coldest() {
        // make_test_draws(10) sorteia cada dezena exatamente uma vez
        let t = FrequencyTable::from_draws(&make_test_draws(10));
        for n in 1..=60 {
            assert_eq!(Rgb::for_frequency(&t, n), Rgb::COLDEST);
        }
    }

    #[test]
    fn test_empty_table_is_neutral() {
        let t = FrequencyTable::default();
        assert_eq!(Rgb::for_frequency(&t, 7), Rgb::NEUTRAL);
        assert!(legend(&t).is_empty());
    }

    #[test]
    fn test_legend_steps() {
        let t = table(&[[1, 2, 3, 4, 5, 6], [1, 2, 3, 4, 5, 7], [1, 8, 9, 10, 11, 12], [1, 2, 13, 14, 15, 16]]);
        // min 0, max 4
        let entries = legend(&t);
        assert_eq!(entries.len(), LEGEND_STEPS);
        let freqs: Vec<u32> = entries.iter().map(|e| e.frequency).collect();
        assert_eq!(freqs, vec![0, 1, 2, 3, 4]);
        assert_eq!(entries[0].color, Rgb::COLDEST);
        assert_eq!(entries[4].color, Rgb::HOTTEST);
        assert!(entries.iter().all(|e| e.color.b == 0));
    }
}
