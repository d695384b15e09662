//! The [logistic sigmoid](https://en.wikipedia.org/wiki/Sigmoid_function)
//! activation used by every neuron.

/// Evaluates `σ(x) = 1 / (1 + e^{-x})`.
#[inline]
pub fn f(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Evaluates the derivative `σ'(x)`, where `x = σ^{-1}(y)`.
///
/// Note that this function takes in the *output* of the activation
/// function, rather than the input. Layers only ever keep their activated
/// values around, and `σ'(x) = σ(x) * (1 - σ(x))` needs nothing else.
#[inline]
pub fn fprime(y: f64) -> f64 {
    y * (1.0 - y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sigmoid_is_centered() {
        assert_eq!(f(0.0), 0.5);
        assert_abs_diff_eq!(f(2.0) + f(-2.0), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn sigmoid_saturates_inside_unit_interval() {
        assert!(f(30.0) < 1.0);
        assert!(f(-30.0) > 0.0);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let h = 1e-6;
        for &x in &[-3.0, -0.5, 0.0, 0.7, 2.5] {
            let numeric = (f(x + h) - f(x - h)) / (2.0 * h);
            assert_abs_diff_eq!(fprime(f(x)), numeric, epsilon = 1e-8);
        }
    }
}
