use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use regex::Regex;
use tracing::{info, warn};

use crate::models::{Draw, Game, PICK_COUNT};
use crate::store::DrawSet;

/// Posições das colunas relevantes no cabeçalho.
///
/// As dezenas são reconhecidas por padrão (`Bola1..6` ou `Dezena 1..6`), nunca por nome fixo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub contest: usize,
    pub date: usize,
    pub numbers: [usize; PICK_COUNT],
}

impl ColumnMap {
    pub fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let number_re = Regex::new(r"(?i)^(?:bola|dezena)\s*([1-6])$")?;
        let contest_re = Regex::new(r"(?i)^concurso$")?;
        let date_re = Regex::new(r"(?i)\bdata\b")?;

        let mut contest = None;
        let mut date = None;
        let mut numbers = [None; PICK_COUNT];

        for (idx, raw) in headers.iter().enumerate() {
            let name = raw.trim_start_matches('\u{feff}').trim();
            if let Some(caps) = number_re.captures(name) {
                let slot: usize = caps[1].parse()?;
                numbers[slot - 1].get_or_insert(idx);
            } else if contest_re.is_match(name) {
                contest.get_or_insert(idx);
            } else if date_re.is_match(name) {
                date.get_or_insert(idx);
            }
        }

        let contest = contest.context("Coluna 'Concurso' não encontrada")?;
        let date = date.context("Coluna de data não encontrada")?;
        let mut resolved = [0usize; PICK_COUNT];
        for (slot, found) in numbers.into_iter().enumerate() {
            resolved[slot] = found.with_context(|| {
                format!("Coluna da dezena {} não encontrada (Bola{} / Dezena {})", slot + 1, slot + 1, slot + 1)
            })?;
        }

        Ok(Self { contest, date, numbers: resolved })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub total_records: u32,
    pub imported: u32,
    pub duplicates: u32,
    pub errors: u32,
}

/// Aceita `dd/mm/aaaa` (planilhas oficiais) e `aaaa-mm-dd`.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .with_context(|| format!("Formato de data inválido: '{}'", raw))
}

fn parse_number(raw: &str) -> Result<u8> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u8>() {
        return Ok(n);
    }
    // Planilhas convertidas às vezes trazem "5.0"
    let value: f64 = raw
        .replace(',', ".")
        .parse()
        .with_context(|| format!("Impossível interpretar a dezena '{}'", raw))?;
    if value.fract() != 0.0 || !(0.0..=255.0).contains(&value) {
        bail!("Dezena inválida: '{}'", raw);
    }
    Ok(value as u8)
}

fn parse_record(record: &csv::StringRecord, columns: &ColumnMap) -> Result<Draw> {
    let get = |idx: usize| -> Result<&str> {
        record
            .get(idx)
            .map(str::trim)
            .with_context(|| format!("Campo ausente no índice {}", idx))
    };

    let contest_raw = get(columns.contest)?;
    let contest: u32 = contest_raw
        .parse()
        .with_context(|| format!("Concurso inválido: '{}'", contest_raw))?;
    let date = parse_date(get(columns.date)?)?;

    let mut numbers: Game = [0; PICK_COUNT];
    for (slot, &idx) in columns.numbers.iter().enumerate() {
        numbers[slot] = parse_number(get(idx)?)?;
    }

    Draw::new(contest, date, numbers).with_context(|| format!("Concurso {}", contest))
}

/// `;` quando o cabeçalho o contém, `,` caso contrário.
pub fn sniff_delimiter(header_line: &str) -> u8 {
    if header_line.contains(';') { b';' } else { b',' }
}

pub fn import_reader<R: Read>(reader: R, delimiter: u8) -> Result<(DrawSet, ImportResult)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().context("Cabeçalho ilegível")?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut result = ImportResult::default();
    let mut draws = Vec::new();

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => {
                // Linhas totalmente vazias no fim das planilhas
                if record.iter().all(|f| f.trim().is_empty()) {
                    result.total_records -= 1;
                    continue;
                }
                match parse_record(&record, &columns) {
                    Ok(draw) => draws.push(draw),
                    Err(e) => {
                        warn!("Erro ao interpretar a linha {}: {:#}", result.total_records, e);
                        result.errors += 1;
                    }
                }
            }
            Err(e) => {
                warn!("Erro de leitura na linha {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    let parsed = draws.len() as u32;
    let set = DrawSet::new(draws);
    result.imported = set.len() as u32;
    result.duplicates = parsed - result.imported;

    info!(
        "Importação concluída: {} sorteios, {} duplicados, {} erros",
        result.imported, result.duplicates, result.errors
    );
    Ok((set, result))
}

pub fn parse_csv_text(text: &str) -> Result<(DrawSet, ImportResult)> {
    let header_line = text.lines().next().unwrap_or_default();
    import_reader(text.as_bytes(), sniff_delimiter(header_line))
}

pub fn import_csv(path: &Path) -> Result<(DrawSet, ImportResult)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Impossível abrir {:?}", path))?;
    parse_csv_text(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOLA_CSV: &str = "\
Concurso;Data do Sorteio;Bola1;Bola2;Bola3;Bola4;Bola5;Bola6
2;06/01/2024;60;12;33;4;5;18
1;03/01/2024;1;2;3;4;5;6
";

    const DEZENA_CSV: &str = "\
Concurso,Data Sorteio,Dezena 1,Dezena 2,Dezena 3,Dezena 4,Dezena 5,Dezena 6,Ganhadores
10,2024-02-01,7,14,21,28,35,42,0
";

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("17/02/2026").unwrap(), NaiveDate::from_ymd_opt(2026, 2, 17).unwrap());
        assert_eq!(parse_date("2020-01-01").unwrap(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert!(parse_date("2020/01").is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("05").unwrap(), 5);
        assert_eq!(parse_number(" 42 ").unwrap(), 42);
        assert_eq!(parse_number("7.0").unwrap(), 7);
        assert!(parse_number("7.5").is_err());
        assert!(parse_number("abc").is_err());
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("Concurso;Data"), b';');
        assert_eq!(sniff_delimiter("Concurso,Data"), b',');
    }

    #[test]
    fn test_import_bola_columns() {
        let (set, result) = parse_csv_text(BOLA_CSV).unwrap();
        assert_eq!(result.total_records, 2);
        assert_eq!(result.imported, 2);
        assert_eq!(result.errors, 0);
        assert_eq!(set[0].contest, 2);
        assert_eq!(set[0].numbers, [4, 5, 12, 18, 33, 60]);
    }

    #[test]
    fn test_import_dezena_columns() {
        let (set, result) = parse_csv_text(DEZENA_CSV).unwrap();
        assert_eq!(result.imported, 1);
        assert_eq!(set[0].numbers, [7, 14, 21, 28, 35, 42]);
        assert_eq!(set[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn test_import_counts_bad_rows() {
        let text = "\
Concurso;Data do Sorteio;Bola1;Bola2;Bola3;Bola4;Bola5;Bola6
3;09/01/2024;1;1;2;3;4;5
2;06/01/2024;61;12;33;4;5;18
1;03/01/2024;1;2;3;4;5;6
1;03/01/2024;1;2;3;4;5;6
";
        let (set, result) = parse_csv_text(text).unwrap();
        assert_eq!(result.total_records, 4);
        assert_eq!(result.errors, 2);
        assert_eq!(result.imported, 1);
        assert_eq!(result.duplicates, 1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_missing_number_column() {
        let text = "Concurso;Data do Sorteio;Bola1;Bola2;Bola3;Bola4;Bola5\n1;03/01/2024;1;2;3;4;5\n";
        assert!(parse_csv_text(text).is_err());
    }

    #[test]
    fn test_column_map_ignores_order() {
        let headers = csv::StringRecord::from(vec![
            "Bola6", "Bola5", "Bola4", "Bola3", "Bola2", "Bola1", "Data do Sorteio", "Concurso",
        ]);
        let map = ColumnMap::from_headers(&headers).unwrap();
        assert_eq!(map.numbers, [5, 4, 3, 2, 1, 0]);
        assert_eq!(map.date, 6);
        assert_eq!(map.contest, 7);
    }
}
