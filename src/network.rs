use crate::*;

/// Входной слой: до первой записи не построен (известен только размер)
#[derive(Clone, Debug, PartialEq)]
pub enum InputLayer {
    Unbuilt,
    Built(Vec<Neuron>),
}

impl InputLayer {
    /// Нейроны построенного слоя
    pub fn neurons(&self) -> NetworkResult<&[Neuron]> {
        match self {
            InputLayer::Built(neurons) => Ok(neurons),
            InputLayer::Unbuilt => Err(NetworkError::Unbuilt),
        }
    }
}

/// Сеть с одним скрытым слоем
#[derive(Clone, Debug)]
pub struct Network<R: Rng = ChaCha8Rng> {
    pub(crate) config: NetworkConfig,
    topology: NetworkTopology,
    /// Входной слой
    pub(crate) input_layer: InputLayer,
    /// Скрытый слой
    pub(crate) hidden_layer: Vec<Neuron>,
    /// Выходной слой (при бинарной классификации - один нейрон)
    pub(crate) output_layer: Vec<Neuron>,
    /// Метка текущей записи
    target_value: f64,
    /// Активация первого выходного нейрона после прямого прохода
    predicted_value: f64,
    loss: f64,
    pub(crate) loss_gradient: f64,
    /// Признак обученной сети. Выставляет вызывающий код, сама сеть его не читает.
    is_trained: bool,
    /// Генератор случайных весов и смещений
    rng: R,
}

impl Network<ChaCha8Rng> {
    /// Конструктор с генератором, инициализированным из энтропии ОС
    pub fn new(fields: usize, config: NetworkConfig) -> NetworkResult<Self> {
        Self::with_rng(fields, config, ChaCha8Rng::from_entropy())
    }

    /// Конструктор с воспроизводимым генератором
    pub fn seeded(fields: usize, config: NetworkConfig, seed: u64) -> NetworkResult<Self> {
        Self::with_rng(fields, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Network<R> {
    /// Конструктор. `fields` - количество полей записи вместе с меткой.
    /// Нейроны скрытого и выходного слоёв создаются сразу, входной слой
    /// и связи - при первой записи.
    pub fn with_rng(fields: usize, config: NetworkConfig, mut rng: R) -> NetworkResult<Self> {
        let topology = NetworkTopology::new(fields, &config)?;
        let hidden_layer = (0..topology.hidden.neurons)
            .map(|_| Neuron::random(&mut rng, NeuronType::Hidden))
            .collect();
        let output_layer = (0..topology.output.neurons)
            .map(|_| Neuron::random(&mut rng, NeuronType::Output))
            .collect();
        debug!(
            fields,
            inputs = topology.input.neurons,
            hidden = topology.hidden.neurons,
            outputs = topology.output.neurons,
            "network created"
        );
        Ok(Self {
            config,
            topology,
            input_layer: InputLayer::Unbuilt,
            hidden_layer,
            output_layer,
            target_value: 0.0,
            predicted_value: 0.0,
            loss: 1.0,
            loss_gradient: 0.0,
            is_trained: false,
            rng,
        })
    }

    /// Подача записи на вход сети. Последнее поле - метка.
    /// При первом вызове строится входной слой и все связи, затем
    /// меняются только активации входных нейронов.
    /// При ошибке разбора сеть не меняется.
    pub fn initialize<S: AsRef<str>>(&mut self, fields: &[S]) -> NetworkResult<()> {
        let record = Record::parse(fields, &self.topology)?;
        self.load(&record)
    }

    /// То же, что `initialize`, для уже разобранной записи
    pub fn load(&mut self, record: &Record) -> NetworkResult<()> {
        if record.features.len() != self.topology.input.neurons {
            return Err(NetworkError::SizeMismatch {
                expected: self.topology.input.neurons,
                actual: record.features.len(),
            });
        }
        match self.input_layer {
            InputLayer::Built(ref mut neurons) => {
                for (neuron, value) in neurons.iter_mut().zip_eq(&record.features) {
                    neuron.set_activation(*value);
                }
            }
            InputLayer::Unbuilt => self.build(&record.features),
        }
        self.target_value = record.label;
        Ok(())
    }

    /// Построение входного слоя и полносвязной топологии (выполняется один раз)
    fn build(&mut self, features: &[f64]) {
        let rng = &mut self.rng;
        let inputs = features
            .iter()
            .map(|value| Neuron::input(*value, rng.gen::<f64>()))
            .collect_vec();
        for neuron in &mut self.hidden_layer {
            neuron.connect(rng, inputs.len());
        }
        for neuron in &mut self.output_layer {
            neuron.connect(rng, self.hidden_layer.len());
        }
        self.input_layer = InputLayer::Built(inputs);
        debug!(synapses = self.synapse_count(), "network topology built");
    }

    /// Прямой проход: активации скрытого, затем выходного слоя.
    /// Возвращает активацию первого выходного нейрона.
    pub fn feedforward(&mut self) -> NetworkResult<f64> {
        let inputs = self.input_layer.neurons()?;
        for neuron in &mut self.hidden_layer {
            neuron.activate(inputs);
        }
        for neuron in &mut self.output_layer {
            neuron.activate(&self.hidden_layer);
        }
        self.predicted_value = self.output_layer[0].activation();
        Ok(self.predicted_value)
    }

    /// Ошибка: 0.5 * (predicted - target)^2
    pub fn compute_loss(&mut self) -> f64 {
        self.loss = 0.5 * (self.predicted_value - self.target_value).powi(2);
        self.loss
    }

    /// Производная ошибки по предсказанию: predicted - target
    pub fn compute_loss_gradient(&mut self) -> f64 {
        self.loss_gradient = self.predicted_value - self.target_value;
        self.loss_gradient
    }

    /// Полный цикл обучения на одной записи. Возвращает ошибку до обновления весов.
    pub fn train<S: AsRef<str>>(&mut self, fields: &[S]) -> NetworkResult<f64> {
        let loss = self.evaluate(fields)?;
        self.compute_loss_gradient();
        self.backpropagate()?;
        trace!(
            predicted = self.predicted_value,
            target = self.target_value,
            loss,
            "training cycle"
        );
        Ok(loss)
    }

    /// Прямой проход и ошибка на одной записи, без обновления весов
    pub fn evaluate<S: AsRef<str>>(&mut self, fields: &[S]) -> NetworkResult<f64> {
        self.initialize(fields)?;
        self.feedforward()?;
        Ok(self.compute_loss())
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn topology(&self) -> &NetworkTopology {
        &self.topology
    }

    pub fn is_built(&self) -> bool {
        matches!(self.input_layer, InputLayer::Built(_))
    }

    pub fn input_layer(&self) -> &InputLayer {
        &self.input_layer
    }

    pub fn hidden_layer(&self) -> &[Neuron] {
        &self.hidden_layer
    }

    pub fn output_layer(&self) -> &[Neuron] {
        &self.output_layer
    }

    pub fn target_value(&self) -> f64 {
        self.target_value
    }

    pub fn predicted_value(&self) -> f64 {
        self.predicted_value
    }

    pub fn loss(&self) -> f64 {
        self.loss
    }

    pub fn loss_gradient(&self) -> f64 {
        self.loss_gradient
    }

    pub fn is_trained(&self) -> bool {
        self.is_trained
    }

    pub fn set_trained(&mut self, is_trained: bool) {
        self.is_trained = is_trained;
    }

    pub fn synapse_count(&self) -> usize {
        self.hidden_layer
            .iter()
            .chain(&self.output_layer)
            .map(|neuron| neuron.incoming().len())
            .sum()
    }

    /// Веса всех связей послойно: (вес, слой приёмника, №приёмника в слое, №источника)
    pub fn weights(&self) -> impl Iterator<Item = (f64, usize, usize, usize)> + '_ {
        let hidden = self.hidden_layer.iter().enumerate();
        let output = self.output_layer.iter().enumerate();
        hidden.chain(output).flat_map(|(destination, neuron)| {
            let layer_num = neuron.kind().layer_num();
            neuron
                .incoming()
                .iter()
                .map(move |synapse| (synapse.weight(), layer_num, destination, synapse.source()))
        })
    }

    /// Смещения нейронов слоя
    pub fn biases(&self, kind: NeuronType) -> Vec<f64> {
        match kind {
            NeuronType::Input => match &self.input_layer {
                InputLayer::Built(neurons) => neurons.iter().map(Neuron::bias).collect(),
                InputLayer::Unbuilt => Vec::new(),
            },
            NeuronType::Hidden => self.hidden_layer.iter().map(Neuron::bias).collect(),
            NeuronType::Output => self.output_layer.iter().map(Neuron::bias).collect(),
        }
    }
}
