use std::collections::BTreeSet;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use megasena_db::import::ImportResult;
use megasena_db::models::{DecadeGroup, Draw, Game, format_numbers};
use megasena_db::store::DrawSet;
use megasena_stats::colors::{LegendEntry, Rgb};
use megasena_stats::frequency::FrequencyTable;
use megasena_stats::history::{GameAnalysis, analyze_game};
use megasena_stats::patterns::{DecadePattern, ParityPattern};
use megasena_stats::session::GeneratedGame;
use megasena_stats::snapshot::StatsSnapshot;
use megasena_stats::strategy::FilterInfo;

/// Concursos com pelo menos esta quantidade de dezenas em comum são destacados.
const STRONG_MATCH: usize = 4;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn table_color(rgb: Rgb) -> Color {
    Color::Rgb { r: rgb.r, g: rgb.g, b: rgb.b }
}

fn number_cell(n: u8, frequency: &FrequencyTable) -> Cell {
    Cell::new(format!("{:02}", n)).fg(table_color(Rgb::for_frequency(frequency, n)))
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Importação concluída :");
    println!("  Linhas lidas        : {}", result.total_records);
    println!("  Sorteios carregados : {}", result.imported);
    println!("  Duplicados ignorados: {}", result.duplicates);
    if result.errors > 0 {
        println!("  Linhas com erro     : {}", result.errors);
    }
}

pub fn display_latest(draws: &DrawSet) {
    match draws.latest() {
        Some(draw) => println!(
            "Último concurso : {} ({})",
            draw.contest,
            draw.date.format("%d/%m/%Y")
        ),
        None => println!("Nenhum sorteio carregado."),
    }
}

pub fn display_draws(draws: &[Draw], frequency: &FrequencyTable) {
    if draws.is_empty() {
        println!("Nenhum sorteio para exibir.");
        return;
    }

    let mut table = new_table(vec!["Concurso", "Data", "D1", "D2", "D3", "D4", "D5", "D6"]);
    for draw in draws {
        let mut row = vec![
            Cell::new(draw.contest),
            Cell::new(draw.date.format("%d/%m/%Y")),
        ];
        row.extend(draw.numbers.iter().map(|&n| number_cell(n, frequency)));
        table.add_row(row);
    }
    println!("{table}");
}

pub fn display_frequencies(frequency: &FrequencyTable) {
    println!("\nFrequência das dezenas em {} sorteios\n", frequency.draw_count());

    let mut table = new_table(vec!["Dezena", "Vezes", "Cor"]);
    for (n, count) in frequency.ranked() {
        let rgb = Rgb::for_frequency(frequency, n);
        table.add_row(vec![
            number_cell(n, frequency),
            Cell::new(count),
            Cell::new(rgb.to_string()).fg(table_color(rgb)),
        ]);
    }
    println!("{table}");
}

pub fn display_legend(entries: &[LegendEntry]) {
    if entries.is_empty() {
        println!("Legenda indisponível : nenhum sorteio carregado.");
        return;
    }
    let mut table = new_table(vec!["Cor", "Frequência"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.color.to_string()).fg(table_color(entry.color)),
            Cell::new(entry.frequency),
        ]);
    }
    println!("{table}");
}

pub fn display_patterns(snapshot: &StatsSnapshot) {
    let (Some(decades), Some(parity)) = (&snapshot.decades, &snapshot.parity) else {
        println!("Sem dados disponíveis");
        return;
    };

    println!("\n── Grupos de dezenas ──");
    let mut table = new_table(vec!["Grupo", "Participação"]);
    for group in DecadeGroup::ALL {
        table.add_row(vec![group.to_string(), format!("{:.1}%", decades.share(group))]);
    }
    println!("{table}");

    let mut table = new_table(vec!["Padrão de grupos", "Sorteios", "%"]);
    for stat in decades.top(10) {
        table.add_row(vec![
            stat.pattern.to_string(),
            stat.count.to_string(),
            format!("{:.1}", stat.percentage),
        ]);
    }
    println!("{table}");

    println!("\n── Paridade ──");
    let mut table = new_table(vec!["Padrão", "Sorteios", "%"]);
    for stat in &parity.patterns {
        table.add_row(vec![
            stat.pattern.to_string(),
            stat.count.to_string(),
            format!("{:.1}", stat.percentage),
        ]);
    }
    println!("{table}");

    if let Some(transitions) = &snapshot.transitions {
        println!("\n── Transições de paridade ({} pares) ──", transitions.total_pairs);
        let mut table = new_table(vec!["Transição", "Pares", "%"]);
        for (kind, pct) in transitions.percentages() {
            table.add_row(vec![
                kind.to_string(),
                transitions.count(kind).to_string(),
                format!("{:.1}", pct),
            ]);
        }
        println!("{table}");
    }
}

/// Jogos gerados, anotados com o padrão e o histórico de cada um.
pub fn display_games(title: &str, games: &[Game], snapshot: &StatsSnapshot, draws: &DrawSet, recent_window: usize) {
    println!("\n{} ({} jogos)\n", title, games.len());
    if games.is_empty() {
        println!("Nenhum jogo gerado.");
        return;
    }

    let mut table = new_table(vec![
        "#", "D1", "D2", "D3", "D4", "D5", "D6", "Paridade", "Grupos", "Já sorteado", "Recentes",
    ]);
    for (i, game) in games.iter().enumerate() {
        let analysis = analyze_game(draws, game, recent_window);
        let mut row = vec![Cell::new(i + 1)];
        row.extend(game.iter().map(|&n| number_cell(n, &snapshot.frequency)));
        row.push(Cell::new(ParityPattern::of(game)));
        row.push(Cell::new(DecadePattern::of(game)));
        row.push(match analysis.last_drawn_date {
            Some(date) => Cell::new(format!("Sim ({})", date.format("%d/%m/%Y"))).fg(Color::Yellow),
            None => Cell::new("Não"),
        });
        row.push(Cell::new(format_numbers(&analysis.matches_recent, " ")));
        table.add_row(row);
    }
    println!("{table}");
}

pub fn display_filter_info(info: &FilterInfo, numbers: &BTreeSet<u8>) {
    println!("\nFiltros estratégicos :");
    println!("  Dezenas iniciais       : {}", info.initial_count);
    println!("  Mais frequentes        : {}", info.top_frequent);
    println!("  Removidas (recentes)   : {}", info.removed_recent);
    println!("  Restantes              : {}", info.remaining);
    let numbers: Vec<u8> = numbers.iter().copied().collect();
    println!("  Conjunto : {}", format_numbers(&numbers, " "));
}

pub fn display_analysis(game: &Game, analysis: &GameAnalysis) {
    println!("\nAnálise do jogo {}\n", format_numbers(game, " - "));

    match analysis.last_drawn_date {
        Some(date) => println!("Este jogo JÁ FOI sorteado, em {}.", date.format("%d/%m/%Y")),
        None => println!("Este jogo nunca foi sorteado."),
    }

    if analysis.matches_recent.is_empty() {
        println!("Nenhuma dezena saiu nos sorteios recentes.");
    } else {
        println!(
            "Dezenas presentes nos sorteios recentes : {}",
            format_numbers(&analysis.matches_recent, " - ")
        );
    }

    let strong = analysis.strong_matches(STRONG_MATCH);
    if strong.is_empty() {
        println!("Nenhum concurso com {} ou mais acertos.", STRONG_MATCH);
        return;
    }

    let mut table = new_table(vec!["Concurso", "Data", "Acertos", "Dezenas em comum"]);
    for (contest, m) in strong {
        table.add_row(vec![
            contest.to_string(),
            m.date.format("%d/%m/%Y").to_string(),
            m.numbers.len().to_string(),
            format_numbers(&m.numbers, " - "),
        ]);
    }
    println!("{table}");
}

pub fn display_history(history: &[GeneratedGame]) {
    if history.is_empty() {
        println!("Nenhum jogo gerado nesta sessão.");
        return;
    }
    println!("\nJogos gerados nesta sessão :");
    for game in history {
        println!("  {}", game.history_line());
    }
}

pub fn display_selection(selected: &BTreeSet<u8>, favorites: &BTreeSet<u8>) {
    let selected: Vec<u8> = selected.iter().copied().collect();
    let favorites: Vec<u8> = favorites.iter().copied().collect();
    println!("Selecionadas : {}", if selected.is_empty() { "-".to_string() } else { format_numbers(&selected, " ") });
    println!("Favoritas    : {}", if favorites.is_empty() { "-".to_string() } else { format_numbers(&favorites, " ") });
}
