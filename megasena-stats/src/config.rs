use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Parâmetros da geração e dos filtros estratégicos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Quantos números "quentes" entram no segundo nível do pool.
    pub hot_pool_size: usize,
    /// Teto de tentativas = jogos pedidos × fator.
    pub attempt_factor: usize,
    pub strategic_attempt_factor: usize,
    /// Limite absoluto de tentativas por lote, qualquer que seja a quantidade pedida.
    pub max_attempts: usize,
    /// A geração estratégica sorteia os alvos entre os N padrões mais comuns.
    pub strategic_top_patterns: usize,
    /// Pares por jogo quando não há histórico.
    pub default_even: u8,
    pub recent_window: usize,
    pub top_frequent: usize,
    /// Mantém só os grupos de dezenas com participação >= este percentual.
    pub min_decade_pct: Option<f64>,
    pub max_selected: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            hot_pool_size: 20,
            attempt_factor: 10,
            strategic_attempt_factor: 20,
            max_attempts: 100_000,
            strategic_top_patterns: 3,
            default_even: 3,
            recent_window: 5,
            top_frequent: 30,
            min_decade_pct: None,
            max_selected: 6,
        }
    }
}

pub fn save_config(config: &GeneratorConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json).with_context(|| format!("Impossível gravar {:?}", path))?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<GeneratorConfig> {
    let json = std::fs::read_to_string(path).with_context(|| format!("Impossível ler {:?}", path))?;
    let config: GeneratorConfig =
        serde_json::from_str(&json).with_context(|| format!("Configuração inválida em {:?}", path))?;
    Ok(config)
}
