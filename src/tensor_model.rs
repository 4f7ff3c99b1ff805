use crate::*;

/// Снимок весов сети в виде тензоров для пакетного расчёта
#[derive(Clone, Debug)]
pub struct TensorModel {
    /// Количество входов
    inputs: usize,
    /// -Список смещений нейронов по слоям Vec<Tensor>, (1, кол.нейр)
    layers_biases: Vec<Tensor>,
    /// -Список весов нейронов по слоям Vec<Tensor>, (кол.нейр, кол.вх.связей)
    layers_weights: Vec<Tensor>,
}

impl TensorModel {
    /// Снимок построенной сети
    pub fn from_network<R: Rng>(network: &Network<R>) -> NetworkResult<Self> {
        let inputs = network.input_layer.neurons()?.len();
        let (layers_biases, layers_weights) =
            TensorModel::tensors(&[network.hidden_layer.as_slice(), network.output_layer.as_slice()])?;
        Ok(Self {
            inputs,
            layers_biases,
            layers_weights,
        })
    }

    /// Тензоры для расчета
    /// -Список смещений нейронов по слоям Vec<Tensor>
    /// -Список весов нейронов по слоям Vec<Tensor>
    pub fn tensors(layers: &[&[Neuron]]) -> Result<(Vec<Tensor>, Vec<Tensor>), candle_core::Error> {
        let mut layers_biases: Vec<Tensor> = Vec::new();
        let mut layers_weights: Vec<Tensor> = Vec::new();
        for neurons in layers { //обход послойно
            let n_count = neurons.len();//кол.нейронов слоя
            let l_count = neurons.first().map_or(0, |n| n.incoming().len());//кол. вх.связей
            let b = neurons.iter().map(Neuron::bias).collect_vec();
            let w = neurons
                .iter()
                .flat_map(|n| n.incoming().iter().map(Synapse::weight))
                .collect_vec();
            let bt_mx = Tensor::new(b, &Device::Cpu)?//смещения одного слоя
                .reshape((1, n_count))?;
            let wt_mx = Tensor::new(w, &Device::Cpu)?//веса входных связей одного слоя
                .reshape((n_count, l_count))?;
            layers_biases.push(bt_mx);
            layers_weights.push(wt_mx);
        }
        Ok((layers_biases, layers_weights))
    }

    /// Модель для расчета: линейный слой + сигмоида на каждый слой
    pub fn model(&self) -> Result<Sequential, candle_core::Error> {
        let mut model = seq();
        for (wt_mx, bt_mx) in self.layers_weights.iter().zip_eq(&self.layers_biases) {
            model = model.add(Linear::new(wt_mx.clone(), Some(bt_mx.clone())));
            model = model.add(Activation::Sigmoid);
        }
        Ok(model)
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    /// Расчет в прямом направлении для одного вектора входов
    pub fn propagate(&self, inputs: &[f64]) -> NetworkResult<Vec<f64>> {
        let mut outputs = self.propagate_batch(&[inputs.to_vec()])?;
        Ok(outputs.pop().unwrap_or_default())
    }

    /// Расчет в прямом направлении для пакета входов (по строке на запись)
    pub fn propagate_batch(&self, rows: &[Vec<f64>]) -> NetworkResult<Vec<Vec<f64>>> {
        if let Some(row) = rows.iter().find(|row| row.len() != self.inputs) {
            return Err(NetworkError::SizeMismatch {
                expected: self.inputs,
                actual: row.len(),
            });
        }
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let data = rows.iter().flatten().copied().collect_vec();
        let xs = Tensor::new(data, &Device::Cpu)?
            .reshape((rows.len(), self.inputs))?;//(кол.записей, кол.входов)
        let output_tensor = self.model()?.forward(&xs)?;
        Ok(output_tensor.to_vec2::<f64>()?)
    }
}

impl<R: Rng> Network<R> {
    /// Снимок весов в тензорах
    pub fn tensor_model(&self) -> NetworkResult<TensorModel> {
        TensorModel::from_network(self)
    }

    /// Предсказания (первый выходной нейрон) для пакета текстовых записей
    /// без изменения состояния сети
    pub fn predict_batch<S: AsRef<str>>(&self, records: &[Vec<S>]) -> NetworkResult<Vec<f64>> {
        let rows = records
            .iter()
            .map(|fields| Record::parse(fields, self.topology()).map(|record| record.features))
            .collect::<NetworkResult<Vec<_>>>()?;
        let outputs = self.tensor_model()?.propagate_batch(&rows)?;
        Ok(outputs.into_iter().map(|row| row[0]).collect())
    }
}
