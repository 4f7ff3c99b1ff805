use crate::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerTopology {
    pub neurons: usize,
}

/// Топология сети
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkTopology {
    /// Количество полей записи (признаки + метка в последнем поле)
    pub fields: usize,
    /// Входной слой
    pub input: LayerTopology,
    /// Скрытый слой
    pub hidden: LayerTopology,
    /// Выходной слой
    pub output: LayerTopology,
}

impl NetworkTopology {
    /// Размеры слоёв по количеству полей записи и параметрам сети
    pub fn new(fields: usize, config: &NetworkConfig) -> NetworkResult<Self> {
        config.validate()?;
        let inputs = match config.label_policy {
            LabelPolicy::Excluded => fields.saturating_sub(1),//последнее поле - только метка
            LabelPolicy::AsFeature => fields,
        };
        if inputs == 0 {
            return Err(NetworkError::EmptyLayer { layer: NeuronType::Input });
        }
        Ok(Self {
            fields,
            input: LayerTopology { neurons: inputs },
            hidden: LayerTopology { neurons: config.hidden_neurons },
            output: LayerTopology { neurons: config.output_neurons },
        })
    }

    /// Количество связей полносвязной сети (вход-скрытый + скрытый-выход)
    pub fn synapses(&self) -> usize {
        self.input.neurons * self.hidden.neurons + self.hidden.neurons * self.output.neurons
    }

    pub fn layer(&self, kind: NeuronType) -> LayerTopology {
        match kind {
            NeuronType::Input => self.input,
            NeuronType::Hidden => self.hidden,
            NeuronType::Output => self.output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_excluded() {
        let topology = NetworkTopology::new(3, &NetworkConfig::default()).unwrap();
        assert_eq!(topology.fields, 3);
        assert_eq!(topology.input.neurons, 2);
        assert_eq!(topology.hidden.neurons, 12);
        assert_eq!(topology.output.neurons, 1);
        assert_eq!(topology.synapses(), 2 * 12 + 12);
    }

    #[test]
    fn label_as_feature() {
        let config = NetworkConfig::default()
            .with_label_policy(LabelPolicy::AsFeature)
            .with_hidden_neurons(2);
        let topology = NetworkTopology::new(3, &config).unwrap();
        assert_eq!(topology.input.neurons, 3);
        assert_eq!(topology.layer(NeuronType::Hidden).neurons, 2);
        assert_eq!(topology.synapses(), 3 * 2 + 2);
    }

    #[test]
    fn empty_input_layer() {
        //одно поле - это только метка
        assert!(matches!(
            NetworkTopology::new(1, &NetworkConfig::default()),
            Err(NetworkError::EmptyLayer { layer: NeuronType::Input })
        ));
        assert!(matches!(
            NetworkTopology::new(0, &NetworkConfig::default().with_label_policy(LabelPolicy::AsFeature)),
            Err(NetworkError::EmptyLayer { layer: NeuronType::Input })
        ));
        assert!(NetworkTopology::new(1, &NetworkConfig::default().with_label_policy(LabelPolicy::AsFeature)).is_ok());
    }
}
