use std::fmt;
use std::ops::RangeInclusive;

use anyhow::{bail, Result};
use chrono::{Days, NaiveDate};

pub const POOL_SIZE: u8 = 60;
pub const PICK_COUNT: usize = 6;
pub const DECADE_COUNT: usize = 6;

/// Seis dezenas ordenadas, distintas, em [1, 60].
pub type Game = [u8; PICK_COUNT];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub contest: u32,
    pub date: NaiveDate,
    pub numbers: Game,
}

impl Draw {
    /// Valida e ordena as dezenas.
    pub fn new(contest: u32, date: NaiveDate, mut numbers: Game) -> Result<Self> {
        validate_numbers(&numbers)?;
        numbers.sort_unstable();
        Ok(Self { contest, date, numbers })
    }

    pub fn contains(&self, n: u8) -> bool {
        self.numbers.binary_search(&n).is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn of(n: u8) -> Self {
        if n % 2 == 0 { Parity::Even } else { Parity::Odd }
    }
}

/// Grupo de dezenas: 01-10, 11-20, ..., 51-60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecadeGroup(u8);

impl DecadeGroup {
    pub const ALL: [DecadeGroup; DECADE_COUNT] = [
        DecadeGroup(0),
        DecadeGroup(1),
        DecadeGroup(2),
        DecadeGroup(3),
        DecadeGroup(4),
        DecadeGroup(5),
    ];

    pub fn of(n: u8) -> Self {
        debug_assert!(is_valid_number(n));
        DecadeGroup((n.clamp(1, POOL_SIZE) - 1) / 10)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn range(self) -> RangeInclusive<u8> {
        let start = self.0 * 10 + 1;
        start..=start + 9
    }
}

impl fmt::Display for DecadeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.range();
        write!(f, "{:02}-{}", range.start(), range.end())
    }
}

pub fn is_valid_number(n: u8) -> bool {
    (1..=POOL_SIZE).contains(&n)
}

pub fn validate_numbers(numbers: &[u8]) -> Result<()> {
    for &n in numbers {
        if !is_valid_number(n) {
            bail!("Dezena {} fora do intervalo (1-60)", n);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Dezena repetida : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

/// "01 - 07 - 23 ..." : dezenas com dois dígitos, na ordem recebida.
pub fn format_numbers(numbers: &[u8], separator: &str) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Sorteios sintéticos válidos, do mais recente (maior concurso) ao mais antigo.
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    let origin = NaiveDate::default() + Days::new(19_723); // 2024-01-01
    (0..n)
        .rev()
        .map(|i| {
            let base = (i % 10) as u8;
            Draw {
                contest: i as u32 + 1,
                date: origin + Days::new(i as u64 * 3),
                numbers: [
                    base * 6 + 1,
                    base * 6 + 2,
                    base * 6 + 3,
                    base * 6 + 4,
                    base * 6 + 5,
                    base * 6 + 6,
                ],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_numbers_ok() {
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 6]).is_ok());
        assert!(validate_numbers(&[60, 59, 58, 57, 56, 55]).is_ok());
    }

    #[test]
    fn test_validate_numbers_out_of_range() {
        assert!(validate_numbers(&[0, 2, 3, 4, 5, 6]).is_err());
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 61]).is_err());
    }

    #[test]
    fn test_validate_numbers_duplicate() {
        assert!(validate_numbers(&[1, 1, 3, 4, 5, 6]).is_err());
    }

    #[test]
    fn test_draw_new_sorts_numbers() {
        let draw = Draw::new(10, date(2024, 1, 1), [42, 5, 17, 60, 1, 33]).unwrap();
        assert_eq!(draw.numbers, [1, 5, 17, 33, 42, 60]);
        assert!(draw.contains(17));
        assert!(!draw.contains(18));
    }

    #[test]
    fn test_draw_new_rejects_invalid() {
        assert!(Draw::new(10, date(2024, 1, 1), [1, 2, 3, 4, 5, 5]).is_err());
    }

    #[test]
    fn test_decade_group_of() {
        assert_eq!(DecadeGroup::of(1).index(), 0);
        assert_eq!(DecadeGroup::of(10).index(), 0);
        assert_eq!(DecadeGroup::of(11).index(), 1);
        assert_eq!(DecadeGroup::of(60).index(), 5);
    }

    #[test]
    fn test_decade_group_labels() {
        let labels: Vec<String> = DecadeGroup::ALL.iter().map(|g| g.to_string()).collect();
        assert_eq!(labels, vec!["01-10", "11-20", "21-30", "31-40", "41-50", "51-60"]);
    }

    #[test]
    fn test_parity_of() {
        assert_eq!(Parity::of(2), Parity::Even);
        assert_eq!(Parity::of(7), Parity::Odd);
    }

    #[test]
    fn test_format_numbers() {
        assert_eq!(format_numbers(&[1, 23, 60], " - "), "01 - 23 - 60");
    }

    #[test]
    fn test_make_test_draws_valid() {
        let draws = make_test_draws(25);
        assert_eq!(draws.len(), 25);
        assert_eq!(draws[0].contest, 25);
        assert_eq!(draws[24].date, date(2024, 1, 1));
        for d in &draws {
            assert!(validate_numbers(&d.numbers).is_ok());
        }
    }
}
