use crate::*;

/// Связь между нейронами соседних слоёв.
/// Хранится во входных связях нейрона-приёмника, источник задан номером в предыдущем слое.
#[derive(Clone, Debug, PartialEq)]
pub struct Synapse {
    /// Номер нейрона-источника в предыдущем слое
    source: usize,
    /// Вес связи
    weight: f64,
}

impl Synapse {
    /// Конструктор (вес случайный из [0,1))
    pub fn random(rng: &mut impl Rng, source: usize) -> Self {
        Self::new(source, rng.gen::<f64>())
    }

    pub fn new(source: usize, weight: f64) -> Self {
        Self { source, weight }
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Взвешенный вклад связи: вес * активация источника
    pub fn transmit(&self, sources: &[Neuron]) -> f64 {
        self.weight * sources[self.source].activation()
    }

    /// Шаг градиентного спуска для веса
    pub(crate) fn descend(&mut self, step: f64) {
        self.weight -= step;
    }
}
