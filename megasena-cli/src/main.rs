mod display;
mod interactive;

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{Level, warn};
use tracing_subscriber::FmtSubscriber;

use megasena_db::fetch::{FetchOutcome, spawn_fetch};
use megasena_db::import::import_csv;
use megasena_db::store::DrawSet;
use megasena_stats::colors::legend;
use megasena_stats::config::{GeneratorConfig, load_config, save_config};
use megasena_stats::error::validate_game;
use megasena_stats::session::Session;
use megasena_stats::summary::summary_text;

use crate::display::{
    display_analysis, display_draws, display_filter_info, display_frequencies, display_games,
    display_history, display_import_summary, display_latest, display_legend, display_patterns,
};

#[derive(Parser)]
#[command(name = "megasena", about = "Análise de resultados e gerador de jogos da Mega-Sena")]
struct Cli {
    /// Planilha CSV com os resultados
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// URL de onde baixar os resultados em CSV
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Tempo limite do download, em segundos
    #[arg(long, global = true, default_value = "10")]
    timeout: u64,

    /// Configuração do gerador (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed para a reprodutibilidade
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Logs detalhados
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Listar os últimos sorteios
    List {
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Resumo das estatísticas
    Stats,

    /// Frequência de cada dezena, colorida
    Frequencies,

    /// Grupos de dezenas, paridade e transições
    Patterns,

    /// Legenda de cores por frequência
    Legend,

    /// Gerar jogos inteligentes
    Generate {
        #[arg(short = 'n', long, default_value = "5")]
        count: usize,

        /// Dezenas favoritas, separadas por vírgula
        #[arg(long, value_delimiter = ',')]
        favorites: Vec<u8>,
    },

    /// Gerar jogos a partir do conjunto filtrado
    Strategic {
        #[arg(short = 'n', long, default_value = "5")]
        count: usize,

        #[arg(long, value_delimiter = ',')]
        favorites: Vec<u8>,
    },

    /// Gerar jogos totalmente aleatórios
    Random {
        #[arg(short = 'n', long, default_value = "5")]
        count: usize,
    },

    /// Comparar um jogo com o histórico
    Analyze {
        /// As 6 dezenas do jogo
        #[arg(num_args = 6, required = true)]
        numbers: Vec<u8>,
    },

    /// Baixar os resultados e mostrar os mais recentes
    Fetch {
        #[arg(value_name = "URL")]
        source: String,
    },

    /// Gravar a configuração atual em JSON
    InitConfig {
        #[arg(short, long, default_value = "megasena.json")]
        output: PathBuf,
    },

    /// Modo interativo
    Interactive,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_generator_config(cli.config.as_deref())?;
    let timeout = Duration::from_secs(cli.timeout);
    let mut session = Session::new(config, cli.seed);

    if let Some(file) = &cli.file {
        let (draws, report) = import_csv(file)?;
        display_import_summary(&report);
        session.replace_draws(draws);
    } else if let Some(url) = cli.url.as_deref().filter(|_| downloads_at_startup(&cli.command)) {
        if let Some(draws) = fetch_with_spinner(url, timeout)? {
            session.replace_draws(draws);
        }
    }

    match cli.command {
        Command::List { last } => cmd_list(&session, last),
        Command::Stats => cmd_stats(&session),
        Command::Frequencies => cmd_frequencies(&session),
        Command::Patterns => cmd_patterns(&session),
        Command::Legend => cmd_legend(&session),
        Command::Generate { count, favorites } => cmd_generate(&mut session, count, &favorites),
        Command::Strategic { count, favorites } => cmd_strategic(&mut session, count, &favorites),
        Command::Random { count } => cmd_random(&mut session, count),
        Command::Analyze { numbers } => cmd_analyze(&session, &numbers),
        Command::Fetch { source } => {
            cmd_fetch(&mut session, &source, timeout)?;
            cmd_list(&session, 5)
        }
        Command::InitConfig { output } => {
            save_config(session.config(), &output)?;
            println!("Configuração gravada em {}", output.display());
            Ok(())
        }
        Command::Interactive => interactive::run_interactive(&mut session, cli.url.as_deref(), timeout),
    }
}

/// `fetch` baixa o próprio endereço: o `--url` global não é baixado antes.
fn downloads_at_startup(command: &Command) -> bool {
    !matches!(command, Command::Fetch { .. })
}

/// Arquivo ausente não é erro : os valores padrão são usados.
fn load_generator_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(p) if p.exists() => load_config(p),
        Some(p) => {
            warn!("Configuração {:?} não encontrada, usando os valores padrão", p);
            Ok(GeneratorConfig::default())
        }
        None => Ok(GeneratorConfig::default()),
    }
}

/// Baixa numa thread separada, com spinner, sem bloquear a saída.
/// `None` quando o download falha; o histórico anterior permanece.
fn fetch_with_spinner(url: &str, timeout: Duration) -> Result<Option<DrawSet>> {
    let mut handle = spawn_fetch(url.to_string(), timeout);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")?);
    pb.set_message(format!("Baixando {}", url));

    let outcome = loop {
        if let Some(outcome) = handle.poll() {
            break outcome;
        }
        pb.tick();
        thread::sleep(Duration::from_millis(80));
    };
    pb.finish_and_clear();

    match outcome {
        FetchOutcome::Loaded { draws, report } => {
            display_import_summary(&report);
            Ok(Some(draws))
        }
        FetchOutcome::TimedOut => {
            println!("Tempo esgotado ({}s) ao baixar os resultados.", timeout.as_secs());
            Ok(None)
        }
        FetchOutcome::Failed(msg) => {
            println!("Falha no download : {}", msg);
            Ok(None)
        }
    }
}

fn require_draws(session: &Session) -> Result<()> {
    if session.draws().is_empty() {
        bail!("Nenhum sorteio carregado. Use --file <resultados.csv> ou --url <endereço>");
    }
    Ok(())
}

fn cmd_list(session: &Session, last: usize) -> Result<()> {
    require_draws(session)?;
    let draws = session.draws();
    display_draws(draws.recent(last), &session.snapshot().frequency);
    Ok(())
}

fn cmd_stats(session: &Session) -> Result<()> {
    println!("{}", summary_text(session.snapshot()));
    Ok(())
}

fn cmd_frequencies(session: &Session) -> Result<()> {
    require_draws(session)?;
    display_frequencies(&session.snapshot().frequency);
    Ok(())
}

fn cmd_patterns(session: &Session) -> Result<()> {
    display_patterns(session.snapshot());
    Ok(())
}

fn cmd_legend(session: &Session) -> Result<()> {
    display_legend(&legend(&session.snapshot().frequency));
    Ok(())
}

fn cmd_generate(session: &mut Session, count: usize, favorites: &[u8]) -> Result<()> {
    if !favorites.is_empty() {
        session.set_favorites(favorites)?;
    }
    let games = session.generate_smart(count)?;
    let draws = session.draws();
    display_games(
        "Jogos inteligentes",
        &games,
        session.snapshot(),
        &draws,
        session.config().recent_window,
    );
    Ok(())
}

fn cmd_strategic(session: &mut Session, count: usize, favorites: &[u8]) -> Result<()> {
    if !favorites.is_empty() {
        session.set_favorites(favorites)?;
    }
    let (filtered, info) = session.apply_filters();
    display_filter_info(&info, &filtered);

    let (games, _) = session.generate_strategic(count)?;
    let draws = session.draws();
    display_games(
        "Jogos estratégicos",
        &games,
        session.snapshot(),
        &draws,
        session.config().recent_window,
    );
    Ok(())
}

fn cmd_random(session: &mut Session, count: usize) -> Result<()> {
    let games = session.generate_random(count)?;
    let draws = session.draws();
    display_games(
        "Jogos aleatórios",
        &games,
        session.snapshot(),
        &draws,
        session.config().recent_window,
    );
    Ok(())
}

fn cmd_analyze(session: &Session, numbers: &[u8]) -> Result<()> {
    require_draws(session)?;
    let game = validate_game(numbers)?;
    let analysis = session.analyze(&game)?;
    display_analysis(&game, &analysis);
    Ok(())
}

fn cmd_fetch(session: &mut Session, url: &str, timeout: Duration) -> Result<()> {
    match fetch_with_spinner(url, timeout)? {
        Some(draws) => {
            session.replace_draws(draws);
            display_latest(&session.draws());
            Ok(())
        }
        None => bail!("Não foi possível atualizar os resultados"),
    }
}

fn cmd_history(session: &Session) -> Result<()> {
    display_history(session.history());
    Ok(())
}

fn parse_numbers(input: &str) -> Result<Vec<u8>> {
    input
        .split(|c: char| c.is_whitespace() || c == ',' || c == '-')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u8>().with_context(|| format!("Dezena inválida : '{}'", s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_args() {
        let cli = Cli::try_parse_from(["megasena", "--seed", "7", "generate", "-n", "3", "--favorites", "5,10,60"]).unwrap();
        assert_eq!(cli.seed, Some(7));
        match cli.command {
            Command::Generate { count, favorites } => {
                assert_eq!(count, 3);
                assert_eq!(favorites, vec![5, 10, 60]);
            }
            _ => panic!("esperado Generate"),
        }
    }

    #[test]
    fn test_parse_analyze_requires_six() {
        assert!(Cli::try_parse_from(["megasena", "analyze", "1", "2", "3"]).is_err());
        assert!(Cli::try_parse_from(["megasena", "analyze", "1", "2", "3", "4", "5", "6"]).is_ok());
    }

    #[test]
    fn test_parse_fetch_keeps_global_url() {
        let cli = Cli::try_parse_from(["megasena", "--url", "http://a/x.csv", "fetch", "http://b/y.csv"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://a/x.csv"));
        assert!(matches!(cli.command, Command::Fetch { source } if source == "http://b/y.csv"));
    }

    #[test]
    fn test_fetch_command_skips_startup_download() {
        let cli = Cli::try_parse_from(["megasena", "--url", "http://a/x.csv", "fetch", "http://b/y.csv"]).unwrap();
        assert!(!downloads_at_startup(&cli.command));
        let cli = Cli::try_parse_from(["megasena", "--url", "http://a/x.csv", "stats"]).unwrap();
        assert!(downloads_at_startup(&cli.command));
        let cli = Cli::try_parse_from(["megasena", "--url", "http://a/x.csv", "interactive"]).unwrap();
        assert!(downloads_at_startup(&cli.command));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_numbers("1 2,3 - 45").unwrap(), vec![1, 2, 3, 45]);
        assert!(parse_numbers("1 x").is_err());
        assert!(parse_numbers("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let config = load_generator_config(Some(Path::new("/nao/existe/megasena.json"))).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }
}
