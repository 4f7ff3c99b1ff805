use crate::*;

/// Одна запись данных в числовом виде
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// Значения для входного слоя
    pub features: Vec<f64>,
    /// Метка (последнее поле записи)
    pub label: f64,
}

impl Record {
    /// Разбор текстовых полей записи. Разделитель дробной части - точка,
    /// независимо от локали. Последнее поле - метка.
    pub fn parse<S: AsRef<str>>(fields: &[S], topology: &NetworkTopology) -> NetworkResult<Self> {
        if fields.len() != topology.fields {
            return Err(NetworkError::SizeMismatch {
                expected: topology.fields,
                actual: fields.len(),
            });
        }
        let mut values = fields
            .iter()
            .enumerate()
            .map(|(index, field)| parse_field(index, field.as_ref()))
            .collect::<NetworkResult<Vec<f64>>>()?;
        let label = match values.last() {
            Some(label) => *label,
            None => return Err(NetworkError::SizeMismatch { expected: topology.fields, actual: 0 }),
        };
        values.truncate(topology.input.neurons);//без метки, если она исключена
        Ok(Self { features: values, label })
    }
}

fn parse_field(index: usize, field: &str) -> NetworkResult<f64> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|source| NetworkError::Format {
            index,
            value: field.to_string(),
            source,
        })
}
