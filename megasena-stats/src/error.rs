use std::collections::BTreeSet;

use thiserror::Error;

use megasena_db::models::{Game, PICK_COUNT, is_valid_number};

/// Erros de entrada do usuário. Casos estatísticos degenerados (histórico vazio,
/// geração incompleta) não passam por aqui.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("Quantidade de jogos inválida : {0} (deve ser positiva)")]
    InvalidGameCount(usize),
    #[error("Dezena {0} fora do intervalo (1-60)")]
    NumberOutOfRange(u8),
    #[error("Dezena repetida : {0:02}")]
    DuplicateNumber(u8),
    #[error("Um jogo tem exatamente 6 dezenas, recebidas {0}")]
    WrongNumberCount(usize),
}

pub fn validate_count(count: usize) -> Result<(), StatsError> {
    if count == 0 {
        return Err(StatsError::InvalidGameCount(count));
    }
    Ok(())
}

pub fn validate_number(n: u8) -> Result<(), StatsError> {
    if !is_valid_number(n) {
        return Err(StatsError::NumberOutOfRange(n));
    }
    Ok(())
}

/// Favoritos só precisam estar no intervalo; repetições são absorvidas.
pub fn validate_favorites(favorites: &[u8]) -> Result<BTreeSet<u8>, StatsError> {
    favorites
        .iter()
        .map(|&n| validate_number(n).map(|_| n))
        .collect()
}

/// Exatamente 6 dezenas distintas no intervalo; devolve o jogo ordenado.
pub fn validate_game(numbers: &[u8]) -> Result<Game, StatsError> {
    if numbers.len() != PICK_COUNT {
        return Err(StatsError::WrongNumberCount(numbers.len()));
    }
    let mut game: Game = [0; PICK_COUNT];
    game.copy_from_slice(numbers);
    game.sort_unstable();
    for &n in &game {
        validate_number(n)?;
    }
    if let Some(w) = game.windows(2).find(|w| w[0] == w[1]) {
        return Err(StatsError::DuplicateNumber(w[0]));
    }
    Ok(game)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_count() {
        assert_eq!(validate_count(0), Err(StatsError::InvalidGameCount(0)));
        assert!(validate_count(1).is_ok());
    }

    #[test]
    fn test_validate_favorites_dedup() {
        let favs = validate_favorites(&[10, 3, 10, 60]).unwrap();
        assert_eq!(favs.into_iter().collect::<Vec<_>>(), vec![3, 10, 60]);
    }

    #[test]
    fn test_validate_favorites_out_of_range() {
        assert_eq!(validate_favorites(&[5, 61]), Err(StatsError::NumberOutOfRange(61)));
        assert_eq!(validate_favorites(&[0]), Err(StatsError::NumberOutOfRange(0)));
    }

    #[test]
    fn test_validate_game() {
        assert_eq!(validate_game(&[6, 5, 4, 3, 2, 1]).unwrap(), [1, 2, 3, 4, 5, 6]);
        assert_eq!(validate_game(&[1, 2, 3]), Err(StatsError::WrongNumberCount(3)));
        assert_eq!(validate_game(&[1, 2, 3, 4, 5, 5]), Err(StatsError::DuplicateNumber(5)));
        assert_eq!(validate_game(&[1, 2, 3, 4, 5, 70]), Err(StatsError::NumberOutOfRange(70)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StatsError::WrongNumberCount(3).to_string(),
            "Um jogo tem exatamente 6 dezenas, recebidas 3"
        );
        assert_eq!(StatsError::DuplicateNumber(5).to_string(), "Dezena repetida : 05");
    }
}
