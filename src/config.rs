use crate::*;

/// Скорость обучения по умолчанию
pub const LEARNING_RATE: f64 = 0.0005;
/// Количество нейронов скрытого слоя по умолчанию
pub const HIDDEN_NEURONS: usize = 12;
/// Количество выходных нейронов по умолчанию (бинарная классификация)
pub const OUTPUT_NEURONS: usize = 1;

/// Что делать с последним полем записи (меткой)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Метка не попадает во входной слой: входов на один меньше, чем полей записи
    #[default]
    Excluded,
    /// Метка подаётся на вход как обычный признак (входов столько же, сколько полей)
    AsFeature,
}

/// Как часто обновляется смещение нейрона за один обратный проход
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasUpdate {
    /// Один раз на нейрон
    #[default]
    PerNeuron,
    /// Один раз на каждую входную связь нейрона
    PerSynapse,
}

/// Параметры сети
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub hidden_neurons: usize,
    pub output_neurons: usize,
    pub learning_rate: f64,
    pub label_policy: LabelPolicy,
    pub bias_update: BiasUpdate,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            hidden_neurons: HIDDEN_NEURONS,
            output_neurons: OUTPUT_NEURONS,
            learning_rate: LEARNING_RATE,
            label_policy: LabelPolicy::default(),
            bias_update: BiasUpdate::default(),
        }
    }
}

impl NetworkConfig {
    /// Чтение параметров из TOML (отсутствующие ключи берутся по умолчанию)
    pub fn from_toml_str(text: &str) -> NetworkResult<Self> {
        let config: NetworkConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> NetworkResult<()> {
        if self.hidden_neurons == 0 {
            return Err(NetworkError::EmptyLayer { layer: NeuronType::Hidden });
        }
        if self.output_neurons == 0 {
            return Err(NetworkError::EmptyLayer { layer: NeuronType::Output });
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(NetworkError::InvalidLearningRate(self.learning_rate));
        }
        Ok(())
    }

    pub fn with_hidden_neurons(mut self, hidden_neurons: usize) -> Self {
        self.hidden_neurons = hidden_neurons;
        self
    }

    pub fn with_output_neurons(mut self, output_neurons: usize) -> Self {
        self.output_neurons = output_neurons;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_label_policy(mut self, label_policy: LabelPolicy) -> Self {
        self.label_policy = label_policy;
        self
    }

    pub fn with_bias_update(mut self, bias_update: BiasUpdate) -> Self {
        self.bias_update = bias_update;
        self
    }
}
