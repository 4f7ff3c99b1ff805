use crate::*;

/// Локальные производные нейронов скрытого слоя.
/// Считаются по ошибке на выходе до изменения весов и нужны для обновления связей вход-скрытый.
#[derive(Clone, Debug, PartialEq)]
pub struct HiddenDeltas(Vec<f64>);

impl HiddenDeltas {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl BiasUpdate {
    /// Сдвиг смещения нейрона на шаг `step` (один раз или по разу на каждую входную связь)
    fn apply(self, neuron: &mut Neuron, step: f64) {
        match self {
            BiasUpdate::PerNeuron => neuron.descend_bias(step),
            BiasUpdate::PerSynapse => {
                for _ in 0..neuron.incoming().len() {
                    neuron.descend_bias(step);
                }
            }
        }
    }
}

impl<R: Rng> Network<R> {
    /// Обратный проход по сохранённой производной ошибки (`compute_loss_gradient`):
    /// 1. производные скрытых нейронов по текущим весам скрытый-выход;
    /// 2. обновление связей скрытый-выход и смещений выходного слоя;
    /// 3. обновление связей вход-скрытый и смещений скрытого слоя.
    pub fn backpropagate(&mut self) -> NetworkResult<()> {
        self.input_layer.neurons()?;
        let loss_gradient = self.loss_gradient;
        let deltas = self.hidden_deltas(loss_gradient);
        self.update_output_synapses(loss_gradient);
        self.update_hidden_synapses(&deltas)
    }

    /// Шаг 1. Производная источника каждой связи выходного нейрона:
    /// sigmoid'(активация выхода) * вес * производная ошибки.
    /// При нескольких выходных нейронах значение задаёт последний из них.
    pub fn hidden_deltas(&self, loss_gradient: f64) -> HiddenDeltas {
        let mut deltas = vec![0.0; self.hidden_layer.len()];
        for neuron in &self.output_layer {
            let local = sigmoid_derivative(neuron.activation());
            for synapse in neuron.incoming() {
                deltas[synapse.source()] = local * synapse.weight() * loss_gradient;
            }
        }
        HiddenDeltas(deltas)
    }

    /// Шаг 2. Связи скрытый-выход
    fn update_output_synapses(&mut self, loss_gradient: f64) {
        let rate = self.config.learning_rate;
        let bias_update = self.config.bias_update;
        let hidden = &self.hidden_layer;
        for neuron in &mut self.output_layer {
            for synapse in neuron.incoming_mut() {
                let source = hidden[synapse.source()].activation();
                synapse.descend(rate * loss_gradient * sigmoid_derivative(source));
            }
            bias_update.apply(neuron, rate * loss_gradient);
        }
    }

    /// Шаг 3. Связи вход-скрытый
    fn update_hidden_synapses(&mut self, deltas: &HiddenDeltas) -> NetworkResult<()> {
        let rate = self.config.learning_rate;
        let bias_update = self.config.bias_update;
        let inputs = self.input_layer.neurons()?;
        for (neuron, delta) in self.hidden_layer.iter_mut().zip_eq(deltas.as_slice()) {
            for synapse in neuron.incoming_mut() {
                let source = inputs[synapse.source()].activation();
                synapse.descend(rate * source * delta);
            }
            bias_update.apply(neuron, rate * delta);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const XOR: [[&str; 3]; 4] = [
        ["0", "0", "0"],
        ["0", "1", "1"],
        ["1", "0", "1"],
        ["1", "1", "0"],
    ];

    fn cycle(network: &mut Network, record: &[&str]) {
        network.initialize(record).unwrap();
        network.feedforward().unwrap();
        network.compute_loss();
        network.compute_loss_gradient();
        network.backpropagate().unwrap();
    }

    fn average_loss(network: &mut Network, records: &[[&str; 3]]) -> f64 {
        records
            .iter()
            .map(|record| network.evaluate(record).unwrap())
            .sum::<f64>()
            / records.len() as f64
    }

    #[test]
    fn backpropagate_before_initialize() {
        let mut network = Network::seeded(3, NetworkConfig::default(), 1).unwrap();
        let before = network.clone();
        assert!(matches!(network.backpropagate(), Err(NetworkError::Unbuilt)));
        assert_eq!(network.hidden_layer(), before.hidden_layer());
        assert_eq!(network.output_layer(), before.output_layer());
    }

    #[test]
    fn hidden_deltas_by_hand() {
        let mut network = Network::seeded(3, NetworkConfig::default().with_hidden_neurons(3), 5).unwrap();
        network.initialize(&["0.4", "0.9", "0"]).unwrap();
        let p = network.feedforward().unwrap();
        let g = network.compute_loss_gradient();
        let deltas = network.hidden_deltas(g);
        let out = &network.output_layer()[0];
        for (j, synapse) in out.incoming().iter().enumerate() {
            assert_relative_eq!(deltas.as_slice()[j], p * (1.0 - p) * synapse.weight() * g, epsilon = 1e-15);
        }
    }

    /// Один обратный проход, пересчитанный вручную по весам до обновления
    fn check_one_step(bias_update: BiasUpdate) {
        let rate = 0.1;
        let config = NetworkConfig::default()
            .with_hidden_neurons(2)
            .with_learning_rate(rate)
            .with_bias_update(bias_update);
        let mut network = Network::seeded(3, config, 11).unwrap();
        network.initialize(&["0.5", "0.25", "0"]).unwrap();
        network.feedforward().unwrap();
        network.compute_loss();
        let g = network.compute_loss_gradient();
        let before = network.clone();
        let deltas = before.hidden_deltas(g);
        network.backpropagate().unwrap();

        let repeats = |neuron: &Neuron| match bias_update {
            BiasUpdate::PerNeuron => 1.0,
            BiasUpdate::PerSynapse => neuron.incoming().len() as f64,
        };

        //скрытый-выход
        let (old, new) = (&before.output_layer()[0], &network.output_layer()[0]);
        for (old_s, new_s) in old.incoming().iter().zip(new.incoming()) {
            let a = before.hidden_layer()[old_s.source()].activation();
            assert_relative_eq!(new_s.weight(), old_s.weight() - rate * g * a * (1.0 - a), epsilon = 1e-12);
        }
        assert_relative_eq!(new.bias(), old.bias() - repeats(old) * rate * g, epsilon = 1e-12);

        //вход-скрытый
        let x = [0.5, 0.25];
        for (j, (old, new)) in before.hidden_layer().iter().zip(network.hidden_layer()).enumerate() {
            let delta = deltas.as_slice()[j];
            for (old_s, new_s) in old.incoming().iter().zip(new.incoming()) {
                assert_relative_eq!(
                    new_s.weight(),
                    old_s.weight() - rate * x[old_s.source()] * delta,
                    epsilon = 1e-12
                );
            }
            assert_relative_eq!(new.bias(), old.bias() - repeats(old) * rate * delta, epsilon = 1e-12);
        }

        //входные нейроны не меняются
        assert_eq!(network.input_layer(), before.input_layer());
    }

    #[test]
    fn one_step_per_neuron_bias() {
        check_one_step(BiasUpdate::PerNeuron);
    }

    #[test]
    fn one_step_per_synapse_bias() {
        check_one_step(BiasUpdate::PerSynapse);
    }

    #[test]
    fn last_output_neuron_sets_delta() {
        let config = NetworkConfig::default().with_hidden_neurons(2).with_output_neurons(3);
        let mut network = Network::seeded(3, config, 3).unwrap();
        network.initialize(&["0.5", "0.5", "1"]).unwrap();
        network.feedforward().unwrap();
        let g = network.compute_loss_gradient();
        let last = network.output_layer().last().unwrap();
        let a = last.activation();
        let expected: Vec<f64> = last.incoming().iter().map(|s| a * (1.0 - a) * s.weight() * g).collect();
        assert_eq!(network.hidden_deltas(g).as_slice(), expected.as_slice());
    }

    #[test]
    fn gradient_descent_direction() {
        let mut decreased = 0;
        let trials = 200;
        for seed in 0..trials {
            let mut rng = ChaCha8Rng::seed_from_u64(1000 + seed);
            let record: Vec<String> = vec![
                rng.gen::<f64>().to_string(),
                rng.gen::<f64>().to_string(),
                rng.gen::<f64>().to_string(),
                if rng.gen::<bool>() { "1" } else { "0" }.to_string(),
            ];
            let mut network = Network::seeded(4, NetworkConfig::default(), seed).unwrap();
            network.initialize(&record).unwrap();
            network.feedforward().unwrap();
            let before = network.compute_loss();
            network.compute_loss_gradient();
            network.backpropagate().unwrap();
            network.feedforward().unwrap();
            if network.compute_loss() < before {
                decreased += 1;
            }
        }
        assert!(decreased * 100 >= trials * 95, "loss decreased in {decreased} of {trials} trials");
    }

    fn single_record(config: NetworkConfig) {
        let mut network = Network::seeded(3, config.with_hidden_neurons(2).with_learning_rate(0.1), 17).unwrap();
        network.initialize(&["0.0", "1.0", "1"]).unwrap();
        let first = network.feedforward().unwrap();
        assert!(first > 0.0 && first < 1.0);

        for _ in 0..500 {
            cycle(&mut network, &["0.0", "1.0", "1"]);
        }
        network.feedforward().unwrap();
        let loss = network.compute_loss();
        assert!(loss < 0.005, "loss = {loss}");
        assert!((1.0 - network.predicted_value()).abs() < 0.05, "predicted = {}", network.predicted_value());
    }

    #[test]
    fn single_record_converges() {
        single_record(NetworkConfig::default());
    }

    #[test]
    fn single_record_converges_label_as_feature() {
        single_record(NetworkConfig::default().with_label_policy(LabelPolicy::AsFeature));
    }

    #[test]
    fn single_record_converges_per_synapse_bias() {
        single_record(NetworkConfig::default().with_bias_update(BiasUpdate::PerSynapse));
    }

    #[test]
    fn single_record_default_rate_improves() {
        let mut network = Network::seeded(3, NetworkConfig::default().with_hidden_neurons(2), 17).unwrap();
        let first = network.evaluate(&["0.0", "1.0", "1"]).unwrap();
        for _ in 0..500 {
            network.train(&["0.0", "1.0", "1"]).unwrap();
        }
        let last = network.evaluate(&["0.0", "1.0", "1"]).unwrap();
        assert!(last < first, "{last} >= {first}");
    }

    fn xor(config: NetworkConfig) {
        let mut network = Network::seeded(3, config, 23).unwrap();
        let first = average_loss(&mut network, &XOR);
        for _ in 0..5000 {
            for record in &XOR {
                network.train(record).unwrap();
            }
        }
        let last = average_loss(&mut network, &XOR);
        assert!(last < first * 0.8, "average loss {first} -> {last}");
    }

    #[test]
    fn xor_loss_decreases() {
        xor(NetworkConfig::default());
    }

    #[test]
    fn xor_loss_decreases_label_as_feature() {
        xor(NetworkConfig::default().with_label_policy(LabelPolicy::AsFeature));
    }

    #[test]
    fn xor_loss_decreases_per_synapse_bias() {
        xor(NetworkConfig::default().with_bias_update(BiasUpdate::PerSynapse));
    }
}
