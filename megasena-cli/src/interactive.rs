use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};

use megasena_stats::session::{Session, Toggle};

use crate::display::{display_latest, display_selection};

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Select,
    Favorite,
    Clear,
    Generate,
    Strategic,
    Random,
    Analyze,
    Stats,
    History,
    Update,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "selecionar" | "sel" => Some(InteractiveCommand::Select),
        "2" | "favoritar" | "fav" => Some(InteractiveCommand::Favorite),
        "3" | "limpar" | "clear" => Some(InteractiveCommand::Clear),
        "4" | "gerar" | "inteligente" => Some(InteractiveCommand::Generate),
        "5" | "estrategico" | "estratégico" | "est" => Some(InteractiveCommand::Strategic),
        "6" | "aleatorio" | "aleatório" | "random" => Some(InteractiveCommand::Random),
        "7" | "analisar" | "analyze" => Some(InteractiveCommand::Analyze),
        "8" | "estatisticas" | "estatísticas" | "stats" => Some(InteractiveCommand::Stats),
        "9" | "historico" | "histórico" | "hist" => Some(InteractiveCommand::History),
        "10" | "atualizar" | "baixar" => Some(InteractiveCommand::Update),
        "11" | "sair" | "q" | "quit" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── Modo interativo ──");
    println!("  1. selecionar    Marcar/desmarcar dezenas");
    println!("  2. favoritar     Marcar a seleção como favorita");
    println!("  3. limpar        Limpar a seleção");
    println!("  4. gerar         Jogos inteligentes");
    println!("  5. estrategico   Jogos estratégicos");
    println!("  6. aleatorio     Jogos aleatórios");
    println!("  7. analisar      Comparar um jogo com o histórico");
    println!("  8. estatisticas  Resumo das estatísticas");
    println!("  9. historico     Jogos gerados na sessão");
    println!(" 10. atualizar     Baixar os resultados");
    println!(" 11. sair          Sair");
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erro de leitura")?;
    if read == 0 {
        anyhow::bail!("Fim da entrada");
    }
    Ok(input.trim().to_string())
}

fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}] : ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn prompt_count() -> Result<usize> {
    let n = prompt_with_default("Quantidade de jogos", "5")?;
    n.parse().context("Quantidade inválida")
}

fn cmd_select_interactive(session: &mut Session) -> Result<()> {
    let input = prompt("Dezenas a marcar/desmarcar (1-60) : ")?;
    for n in super::parse_numbers(&input)? {
        match session.toggle_selected(n)? {
            Toggle::Added => println!("  {:02} selecionada", n),
            Toggle::Removed => println!("  {:02} removida", n),
            Toggle::Full => println!(
                "  {:02} ignorada : limite de {} dezenas atingido",
                n,
                session.config().max_selected
            ),
        }
    }
    display_selection(session.selected(), session.favorites());
    Ok(())
}

fn cmd_analyze_interactive(session: &Session) -> Result<()> {
    let input = prompt("6 dezenas (separadas por espaço) : ")?;
    let numbers = super::parse_numbers(&input)?;
    super::cmd_analyze(session, &numbers)
}

fn cmd_update_interactive(session: &mut Session, url: Option<&str>, timeout: Duration) -> Result<()> {
    let url = match url {
        Some(u) => prompt_with_default("URL", u)?,
        None => prompt("URL dos resultados (CSV) : ")?,
    };
    super::cmd_fetch(session, &url, timeout)
}

pub fn run_interactive(session: &mut Session, url: Option<&str>, timeout: Duration) -> Result<()> {
    println!("Bem-vindo ao modo interativo do megasena!");
    if session.draws().is_empty() {
        println!("Nenhum sorteio carregado : use 'atualizar' ou reinicie com --file.");
    } else {
        display_latest(&session.draws());
    }

    loop {
        display_menu();
        display_selection(session.selected(), session.favorites());
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break,
        };

        if input.is_empty() {
            continue;
        }

        let result = match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Até logo!");
                break;
            }
            Some(InteractiveCommand::Select) => cmd_select_interactive(session),
            Some(InteractiveCommand::Favorite) => {
                if session.mark_favorites() {
                    println!("Seleção adicionada aos favoritos.");
                } else {
                    println!("Nenhuma dezena selecionada.");
                }
                Ok(())
            }
            Some(InteractiveCommand::Clear) => {
                session.clear_selected();
                Ok(())
            }
            Some(InteractiveCommand::Generate) => {
                prompt_count().and_then(|n| super::cmd_generate(session, n, &[]))
            }
            Some(InteractiveCommand::Strategic) => {
                prompt_count().and_then(|n| super::cmd_strategic(session, n, &[]))
            }
            Some(InteractiveCommand::Random) => {
                prompt_count().and_then(|n| super::cmd_random(session, n))
            }
            Some(InteractiveCommand::Analyze) => cmd_analyze_interactive(session),
            Some(InteractiveCommand::Stats) => super::cmd_stats(session),
            Some(InteractiveCommand::History) => super::cmd_history(session),
            Some(InteractiveCommand::Update) => cmd_update_interactive(session, url, timeout),
            None => {
                println!("Comando desconhecido : '{}'. Digite um número (1-11) ou o nome do comando.", input);
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("Erro: {e:#}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_by_number() {
        assert_eq!(parse_command("1"), Some(InteractiveCommand::Select));
        assert_eq!(parse_command("4"), Some(InteractiveCommand::Generate));
        assert_eq!(parse_command("5"), Some(InteractiveCommand::Strategic));
        assert_eq!(parse_command("10"), Some(InteractiveCommand::Update));
        assert_eq!(parse_command("11"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_by_name() {
        assert_eq!(parse_command("selecionar"), Some(InteractiveCommand::Select));
        assert_eq!(parse_command("favoritar"), Some(InteractiveCommand::Favorite));
        assert_eq!(parse_command("limpar"), Some(InteractiveCommand::Clear));
        assert_eq!(parse_command("aleatorio"), Some(InteractiveCommand::Random));
        assert_eq!(parse_command("analisar"), Some(InteractiveCommand::Analyze));
        assert_eq!(parse_command("estatisticas"), Some(InteractiveCommand::Stats));
        assert_eq!(parse_command("historico"), Some(InteractiveCommand::History));
        assert_eq!(parse_command("sair"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_accents_and_case() {
        assert_eq!(parse_command("Estratégico"), Some(InteractiveCommand::Strategic));
        assert_eq!(parse_command("HISTÓRICO"), Some(InteractiveCommand::History));
        assert_eq!(parse_command("  Sair "), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_unknown() {
        assert_eq!(parse_command("foo"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("12"), None);
    }
}
