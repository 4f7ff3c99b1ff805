use crate::*;

/// Слой, которому принадлежит нейрон
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NeuronType {
    Input,
    Hidden,
    Output,
}

impl NeuronType {
    /// Номер слоя: 1 - входной, 2 - скрытый, 3 - выходной
    pub fn layer_num(self) -> usize {
        match self {
            NeuronType::Input => 1,
            NeuronType::Hidden => 2,
            NeuronType::Output => 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Neuron {
    kind: NeuronType,
    /// Активация (для входного нейрона - значение признака)
    activation: f64,
    bias: f64,
    /// Входные связи (пусто у входного слоя и до построения топологии)
    incoming: Vec<Synapse>,
}

impl Neuron {
    /// Входной нейрон с заданной активацией
    pub fn input(activation: f64, bias: f64) -> Self {
        Self {
            kind: NeuronType::Input,
            activation,
            bias,
            incoming: Vec::new(),
        }
    }

    /// Нейрон скрытого или выходного слоя со случайным смещением из [0,1), пока без связей
    pub fn random(rng: &mut impl Rng, kind: NeuronType) -> Self {
        Self {
            kind,
            activation: 0.0,
            bias: rng.gen::<f64>(),
            incoming: Vec::new(),
        }
    }

    pub fn kind(&self) -> NeuronType {
        self.kind
    }

    pub fn activation(&self) -> f64 {
        self.activation
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn incoming(&self) -> &[Synapse] {
        &self.incoming
    }

    pub(crate) fn incoming_mut(&mut self) -> &mut [Synapse] {
        &mut self.incoming
    }

    pub(crate) fn set_activation(&mut self, activation: f64) {
        debug_assert_eq!(self.kind, NeuronType::Input);
        self.activation = activation;
    }

    pub(crate) fn descend_bias(&mut self, step: f64) {
        self.bias -= step;
    }

    /// Полносвязное соединение со всеми нейронами предыдущего слоя (веса случайные)
    pub(crate) fn connect(&mut self, rng: &mut impl Rng, sources: usize) {
        debug_assert_ne!(self.kind, NeuronType::Input);
        self.incoming = (0..sources)
            .map(|source| Synapse::random(rng, source))
            .collect();
    }

    /// Сумма взвешенных вкладов входных связей плюс смещение
    pub fn net_input(&self, sources: &[Neuron]) -> f64 {
        self.incoming
            .iter()
            .map(|synapse| synapse.transmit(sources))
            .sum::<f64>()
            + self.bias
    }

    /// Пересчёт активации по предыдущему слою
    pub(crate) fn activate(&mut self, sources: &[Neuron]) -> f64 {
        self.activation = sigmoid(self.net_input(sources));
        self.activation
    }
}
