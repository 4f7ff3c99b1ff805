/// Сигмоида: 1 / (1 + e^-x)
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Производная сигмоиды, выраженная через уже посчитанную активацию a = sigmoid(x)
pub fn sigmoid_derivative(a: f64) -> f64 {
    a * (1.0 - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn sigmoid_at_zero() {
        assert_relative_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn sigmoid_range() {
        for i in -300..=300 {
            let x = i as f64 / 10.0;//шаг 0.1 на [-30, 30]
            let a = sigmoid(x);
            assert!(a > 0.0 && a < 1.0, "sigmoid({x}) = {a}");
        }
    }

    #[test]
    fn sigmoid_is_monotonic() {
        let values: Vec<f64> = (-100..=100).map(|i| sigmoid(i as f64 / 10.0)).collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn derivative_identity() {
        //сравниваем a(1-a) с центральной разностью
        let h = 1e-6;
        for i in -80..=80 {
            let x = i as f64 / 10.0;
            let numeric = (sigmoid(x + h) - sigmoid(x - h)) / (2.0 * h);
            assert_abs_diff_eq!(sigmoid_derivative(sigmoid(x)), numeric, epsilon = 1e-9);
        }
    }

    #[test]
    fn derivative_peaks_at_half() {
        assert_relative_eq!(sigmoid_derivative(0.5), 0.25);
        assert_relative_eq!(sigmoid_derivative(0.0), 0.0);
        assert_relative_eq!(sigmoid_derivative(1.0), 0.0);
    }
}
