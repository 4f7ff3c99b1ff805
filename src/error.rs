use std::num::ParseFloatError;

use crate::*;

/// Ошибки сети
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Поле записи не является числом с плавающей точкой
    #[error("field #{index} ({value:?}) is not a floating-point number: {source}")]
    Format {
        index: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    /// Количество полей записи не совпадает с размером входного слоя (вместе с меткой)
    #[error("record has {actual} fields, the network expects {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Слой без нейронов
    #[error("{layer:?} layer must contain at least one neuron")]
    EmptyLayer { layer: NeuronType },

    #[error("learning rate must be finite and positive, got {0}")]
    InvalidLearningRate(f64),

    /// Топология ещё не построена: сеть не получила ни одной записи
    #[error("network topology is not built yet, initialize it with a record first")]
    Unbuilt,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Tensor(#[from] candle_core::Error),
}

impl From<toml::de::Error> for NetworkError {
    fn from(err: toml::de::Error) -> Self {
        NetworkError::Config(err.to_string())
    }
}

pub type NetworkResult<T> = Result<T, NetworkError>;
