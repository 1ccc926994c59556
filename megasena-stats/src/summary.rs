use std::fmt::Write;

use megasena_db::models::DecadeGroup;

use crate::snapshot::StatsSnapshot;

pub const NO_DATA: &str = "Sem dados disponíveis";

const TOP_NUMBERS: usize = 10;
const TOP_DECADE_PATTERNS: usize = 5;

/// Resumo textual das estatísticas, no formato exibido pela interface.
pub fn summary_text(stats: &StatsSnapshot) -> String {
    if stats.is_empty() {
        return NO_DATA.to_string();
    }

    let mut out = String::from("Estatísticas da Mega Sena\n\n");

    out.push_str("TOP 10 - Mais sorteados:\n");
    for (n, count) in stats.frequency.ranked().into_iter().take(TOP_NUMBERS) {
        let _ = writeln!(out, "Número {:02}: {} vezes", n, count);
    }

    out.push_str("\nTOP 10 - Menos sorteados:\n");
    for n in stats.frequency.cold_numbers(TOP_NUMBERS) {
        let _ = writeln!(out, "Número {:02}: {} vezes", n, stats.frequency.count(n));
    }

    if let Some(decades) = &stats.decades {
        out.push_str("\nDistribuição por Grupos de Dezenas:\n");
        for group in DecadeGroup::ALL {
            let _ = writeln!(out, "Grupo {}: {:.1}%", group, decades.share(group));
        }

        out.push_str("\nPadrões mais comuns de grupos:\n");
        for stat in decades.top(TOP_DECADE_PATTERNS) {
            let _ = writeln!(out, "Padrão {}: {} jogos ({:.1}%)", stat.pattern, stat.count, stat.percentage);
        }
    }

    if let Some(parity) = &stats.parity {
        out.push_str("\nDistribuição de Paridade:\n");
        for stat in &parity.patterns {
            let _ = writeln!(out, "{}: {} jogos ({:.1}%)", stat.pattern, stat.count, stat.percentage);
        }
    }

    if let Some(transitions) = &stats.transitions {
        out.push_str("\nCombinações de Paridade:\n");
        for (kind, pct) in transitions.percentages() {
            let _ = writeln!(out, "{}: {:.1}%", kind, pct);
        }
    }

    out
}
