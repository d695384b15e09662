use crate::activator;
use crate::error::{check_len, Error, Result};
use crate::matrix::Mat;

use itertools::multizip;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// How a layer combines its weight update with the error it hands back to
/// the previous layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Propagation {
    /// Update each weight first, then propagate the error through the
    /// *updated* weight. This is the default.
    PostUpdate,
    /// Propagate the error through the weight as it was before this step,
    /// as in textbook backpropagation.
    PreUpdate,
}

impl Default for Propagation {
    fn default() -> Self {
        Propagation::PostUpdate
    }
}

impl Propagation {
    /// Adds `step` to `weight` and returns the share of `error` that flows
    /// back through it.
    #[inline]
    fn update_and_propagate(self, weight: &mut f64, step: f64, error: f64) -> f64 {
        match self {
            Propagation::PostUpdate => {
                *weight += step;
                *weight * error
            }
            Propagation::PreUpdate => {
                let propagated = *weight * error;
                *weight += step;
                propagated
            }
        }
    }
}

/// A fully connected layer with a sigmoid on every output.
///
/// The layer holds only its parameters. Activations are handed back to the
/// caller by `forward` and handed in again to `backward`, so nothing goes
/// stale between passes.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// The network weights, with each neuron's weights stored as a row.
    weights: Mat,
    /// One bias per neuron.
    biases: Vec<f64>,
}

impl Layer {
    /// Initializes a new, untrained layer.
    ///
    /// Arguments:
    ///
    ///  * `inputs` - the number of inputs to this layer.
    ///  * `outputs` - the number of outputs from this layer.
    ///  * `rng` - the source for the initial weights and biases, which are
    ///            drawn uniformly from `[-1, 1)`.
    pub fn new<R>(inputs: usize, outputs: usize, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        if inputs == 0 || outputs == 0 {
            return Err(Error::InvalidConfiguration(format!(
                "layer sizes must be positive, got {} inputs and {} outputs",
                inputs, outputs
            )));
        }
        let distribution = Uniform::new(-1.0, 1.0);
        let weights = Mat::random(&distribution, rng, outputs, inputs);
        let biases = (0..outputs).map(|_| distribution.sample(rng)).collect();
        Ok(Layer { weights, biases })
    }

    /// Builds a layer with known parameters. `weights[i][j]` connects input
    /// `j` to output `i`.
    pub fn from_parts<W>(weights: &[W], biases: Vec<f64>) -> Result<Self>
    where
        W: AsRef<[f64]>,
    {
        let cols = weights.first().map_or(0, |row| row.as_ref().len());
        let weights = Mat::from_rows(weights, cols)?;
        check_len("biases", weights.rows(), biases.len())?;
        if weights.iter_rows().flatten().chain(&biases).any(|w| !w.is_finite()) {
            return Err(Error::InvalidConfiguration(
                "layer parameters must be finite".into(),
            ));
        }
        Ok(Layer { weights, biases })
    }

    /// Returns the number of inputs to this layer.
    pub fn input_len(&self) -> usize {
        self.weights.cols()
    }

    /// Returns the number of outputs from this layer.
    pub fn output_len(&self) -> usize {
        self.weights.rows()
    }

    /// Iterates over each neuron's incoming weights.
    pub fn weights(&self) -> impl Iterator<Item = &[f64]> {
        self.weights.iter_rows()
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    /// Feeds the provided `inputs` forward through the layer, returning the
    /// activated outputs.
    pub fn forward(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        check_len("layer inputs", self.input_len(), inputs.len())?;
        let mut outputs = vec![0.0; self.output_len()];
        self.feed_forward(inputs, &mut outputs);
        Ok(outputs)
    }

    /// Feeds the provided error signal backwards through the layer, adjusting
    /// the weights and biases in place.
    ///
    /// Arguments:
    ///
    ///  * `propagation` - the update ordering to use.
    ///  * `learning_rate` - the gradient descent step size.
    ///  * `inputs` - the values this layer saw on its last forward pass.
    ///  * `outputs` - the activations that pass produced.
    ///  * `output_errors` - the error signal for each output.
    ///
    /// Returns the error signal for each input, to be fed to the previous
    /// layer.
    pub fn backward(
        &mut self,
        propagation: Propagation,
        learning_rate: f64,
        inputs: &[f64],
        outputs: &[f64],
        output_errors: &[f64],
    ) -> Result<Vec<f64>> {
        check_len("layer inputs", self.input_len(), inputs.len())?;
        check_len("layer outputs", self.output_len(), outputs.len())?;
        check_len("layer errors", self.output_len(), output_errors.len())?;
        Ok(self.feed_backward(
            propagation,
            learning_rate,
            inputs,
            outputs,
            output_errors,
        ))
    }

    /// Writes the activations for `inputs` into `outputs`. Lengths must
    /// already be checked.
    pub(crate) fn feed_forward(&self, inputs: &[f64], outputs: &mut [f64]) {
        for (row, bias, y) in
            multizip((self.weights.iter_rows(), &self.biases, outputs))
        {
            let mut sum = *bias;
            for (w, x) in row.iter().zip(inputs) {
                sum += w * x;
            }
            *y = activator::f(sum);
        }
    }

    /// Unchecked body of `backward`.
    pub(crate) fn feed_backward(
        &mut self,
        propagation: Propagation,
        learning_rate: f64,
        inputs: &[f64],
        outputs: &[f64],
        output_errors: &[f64],
    ) -> Vec<f64> {
        let mut input_errors = vec![0.0; self.input_len()];
        for (row, bias, &y, &e) in multizip((
            self.weights.iter_rows_mut(),
            self.biases.iter_mut(),
            outputs,
            output_errors,
        )) {
            let delta = activator::fprime(y) * e * learning_rate;
            *bias += delta;
            for (w, x, back) in
                multizip((row.iter_mut(), inputs, input_errors.iter_mut()))
            {
                *back += propagation.update_and_propagate(w, delta * x, e);
            }
        }
        input_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn known_layer() -> Layer {
        Layer::from_parts(&[[0.7, -0.6]], vec![0.05]).unwrap()
    }

    #[test]
    fn forward_of_zero_input_is_half() {
        let layer = Layer::from_parts(&[[1.0, 1.0]], vec![0.0]).unwrap();
        let out = layer.forward(&[0.0, 0.0]).unwrap();
        assert_eq!(out.len(), 1);
        assert_abs_diff_eq!(out[0], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn forward_applies_bias_and_weights() {
        let layer = Layer::from_parts(
            &[vec![0.5, -0.4], vec![0.3, 0.8]],
            vec![0.1, -0.2],
        )
        .unwrap();
        let out = layer.forward(&[1.0, 0.5]).unwrap();
        assert_abs_diff_eq!(out[0], activator::f(0.1 + 0.5 - 0.2));
        assert_abs_diff_eq!(out[1], activator::f(-0.2 + 0.3 + 0.4));
    }

    #[test]
    fn forward_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(3);
        let layer = Layer::new(4, 3, &mut rng).unwrap();
        let inputs = [0.25, -1.5, 3.0, 0.0];
        let a = layer.forward(&inputs).unwrap();
        let b = layer.forward(&inputs).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn new_layer_has_bounded_parameters() {
        let mut rng = StdRng::seed_from_u64(11);
        let layer = Layer::new(3, 2, &mut rng).unwrap();
        assert_eq!(layer.input_len(), 3);
        assert_eq!(layer.output_len(), 2);
        assert_eq!(layer.biases().len(), 2);
        assert_eq!(layer.weights().count(), 2);
        for w in layer.weights().flatten().chain(layer.biases()) {
            assert!((-1.0..1.0).contains(w));
        }
    }

    #[test]
    fn zero_sized_layer_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            Layer::new(0, 2, &mut rng),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Layer::new(2, 0, &mut rng),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn from_parts_checks_shapes() {
        assert_eq!(
            Layer::from_parts(&[[1.0, 2.0]], vec![0.0, 0.0]),
            Err(Error::DimensionMismatch {
                context: "biases",
                expected: 1,
                actual: 2,
            })
        );
        assert!(Layer::from_parts(&[[f64::NAN]], vec![0.0]).is_err());
    }

    #[test]
    fn backward_updates_before_propagating() {
        let mut layer = known_layer();
        let inputs = [0.6, 0.4];
        let outputs = layer.forward(&inputs).unwrap();
        let errors = [0.5];
        let delta = outputs[0] * (1.0 - outputs[0]) * 0.5 * 0.1;

        let back = layer
            .backward(Propagation::PostUpdate, 0.1, &inputs, &outputs, &errors)
            .unwrap();

        let w: Vec<f64> = layer.weights().flatten().cloned().collect();
        assert_eq!(layer.biases(), &[0.05 + delta]);
        assert_eq!(w, vec![0.7 + delta * 0.6, -0.6 + delta * 0.4]);
        assert_eq!(back, vec![w[0] * 0.5, w[1] * 0.5]);
    }

    #[test]
    fn backward_sums_errors_over_every_output() {
        let mut layer = Layer::from_parts(
            &[[0.2, -0.5, 0.9], [-0.7, 0.4, 0.1]],
            vec![0.3, -0.1],
        )
        .unwrap();
        let inputs = [0.5, -1.0, 0.25];
        let outputs = layer.forward(&inputs).unwrap();
        let errors = [0.8, -0.6];

        let back = layer
            .backward(Propagation::PostUpdate, 0.1, &inputs, &outputs, &errors)
            .unwrap();

        let w: Vec<&[f64]> = layer.weights().collect();
        let expected: Vec<f64> = (0..3)
            .map(|j| w[0][j] * errors[0] + w[1][j] * errors[1])
            .collect();
        assert_eq!(back, expected);
        // Both outputs contribute, not just the last one.
        assert_ne!(back[0], w[1][0] * errors[1]);
    }

    #[test]
    fn pre_update_propagates_through_old_weights() {
        let mut layer = known_layer();
        let inputs = [0.6, 0.4];
        let outputs = layer.forward(&inputs).unwrap();
        let back = layer
            .backward(Propagation::PreUpdate, 0.1, &inputs, &outputs, &[0.5])
            .unwrap();
        assert_eq!(back, vec![0.7 * 0.5, -0.6 * 0.5]);
        assert_ne!(layer, known_layer());
    }

    #[test]
    fn backward_rejects_bad_lengths_without_mutating() {
        let mut layer = known_layer();
        let result = layer.backward(
            Propagation::PostUpdate,
            0.1,
            &[0.6, 0.4],
            &[0.5],
            &[0.5, 0.5],
        );
        assert_eq!(
            result,
            Err(Error::DimensionMismatch {
                context: "layer errors",
                expected: 1,
                actual: 2,
            })
        );
        assert_eq!(layer, known_layer());
        assert!(layer.forward(&[1.0]).is_err());
    }
}
