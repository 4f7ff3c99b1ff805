//! Нейронная сеть прямого распространения с одним скрытым слоем.
//! Обучение онлайн (по одной записи) градиентным спуском,
//! функция активации - сигмоида, функция потерь - квадрат ошибки.

pub use self::{
    activation::*,
    backprop::*,
    config::*,
    error::*,
    layer_topology::*,
    network::*,
    neuron::*,
    record::*,
    synapse::*,
    tensor_model::*,
};

mod activation;
mod backprop;
mod config;
mod error;
mod layer_topology;
mod network;
mod neuron;
mod record;
mod synapse;
mod tensor_model;

use candle_core::{Device, Tensor};
use candle_nn::{seq, Activation, Linear, Module, Sequential};
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
