use std::ops::Deref;

use crate::models::Draw;

/// Histórico carregado em memória, do sorteio mais recente ao mais antigo.
///
/// Construído de uma só vez na importação e nunca alterado depois: uma nova importação
/// produz um novo `DrawSet` que substitui o anterior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawSet {
    draws: Vec<Draw>,
}

impl DrawSet {
    /// Ordena por concurso decrescente (data como desempate) e descarta concursos repetidos.
    pub fn new(mut draws: Vec<Draw>) -> Self {
        draws.sort_by(|a, b| b.contest.cmp(&a.contest).then(b.date.cmp(&a.date)));
        draws.dedup_by_key(|d| d.contest);
        Self { draws }
    }

    pub fn latest(&self) -> Option<&Draw> {
        self.draws.first()
    }

    /// Os `n` sorteios mais recentes (ou todos, se houver menos).
    pub fn recent(&self, n: usize) -> &[Draw] {
        &self.draws[..n.min(self.draws.len())]
    }
}

impl Deref for DrawSet {
    type Target = [Draw];

    fn deref(&self) -> &[Draw] {
        &self.draws
    }
}
