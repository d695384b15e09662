//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network).
//!
//! # Example
//!
//! Let's train a simple neural network to compute the XOR function:
//!
//! ```
//! # use perceptron::feed_forward::*;
//! // Create examples of the XOR function
//! let examples = [([0.0, 0.0], [0.0]),
//!                 ([0.0, 1.0], [1.0]),
//!                 ([1.0, 0.0], [1.0]),
//!                 ([1.0, 1.0], [0.0])];
//!
//! // Train networks from a few seeds until one escapes the usual XOR
//! // plateau.
//! let network = (0..10)
//!     .find_map(|seed| {
//!         let mut network = Network::builder(2, &[4], 1)
//!             .learning_rate(0.5)
//!             .seed(seed)
//!             .build()
//!             .unwrap();
//!         let error = network.train(&examples[..], 5000).unwrap();
//!         if error < 0.05 { Some(network) } else { None }
//!     })
//!     .unwrap();
//!
//! // And verify the network correctly computes XOR!
//! let classify = |input: [f64; 2]| network.predict(&input).unwrap()[0] > 0.5;
//! assert_eq!(classify([0.0, 0.0]), false);
//! assert_eq!(classify([0.0, 1.0]), true);
//! assert_eq!(classify([1.0, 0.0]), true);
//! assert_eq!(classify([1.0, 1.0]), false);
//! ```

use crate::error::{check_len, Error, Result};
use crate::layer::Layer;
use crate::trainer::Trainer;
use crate::utils::{Back, Front};

pub use crate::layer::Propagation;
pub use crate::trainer::{Logging, TrainingReport};

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The learning rate used unless one is configured.
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// The number of epochs `Network::train_default` runs.
pub const DEFAULT_EPOCHS: usize = 1000;

/// A Feedforward neural network
#[derive(Clone, Debug, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
    learning_rate: f64,
    propagation: Propagation,
}

impl Network {
    /// Creates a new, untrained neural network with the default learning
    /// rate, seeded from system randomness.
    ///
    /// Arguments:
    ///  * `inputs` - the size of each network input.
    ///  * `hidden` - the number of neurons in each hidden layer, possibly
    ///               none.
    ///  * `outputs` - the size of each network output.
    pub fn new(inputs: usize, hidden: &[usize], outputs: usize) -> Result<Self> {
        Network::builder(inputs, hidden, outputs).build()
    }

    /// Returns a builder for a network with the provided topology.
    pub fn builder(
        inputs: usize,
        hidden: &[usize],
        outputs: usize,
    ) -> NetworkBuilder {
        let mut layer_sizes = Vec::with_capacity(hidden.len() + 2);
        layer_sizes.push(inputs);
        layer_sizes.extend_from_slice(hidden);
        layer_sizes.push(outputs);
        NetworkBuilder {
            layer_sizes,
            learning_rate: DEFAULT_LEARNING_RATE,
            seed: None,
            propagation: Propagation::default(),
        }
    }

    /// Assembles a network from existing layers, which must chain together:
    /// each layer's output length has to match the next layer's input
    /// length.
    pub fn from_layers(layers: Vec<Layer>, learning_rate: f64) -> Result<Self> {
        check_learning_rate(learning_rate)?;
        if layers.is_empty() {
            return Err(Error::InvalidConfiguration(
                "a network needs at least one layer".into(),
            ));
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_len() != pair[1].input_len() {
                return Err(Error::InvalidConfiguration(format!(
                    "layer {} produces {} outputs but layer {} takes {} inputs",
                    i,
                    pair[0].output_len(),
                    i + 1,
                    pair[1].input_len()
                )));
            }
        }
        Ok(Network {
            layers,
            learning_rate,
            propagation: Propagation::default(),
        })
    }

    /// Returns the size of the input layer to the network.
    pub fn input_len(&self) -> usize {
        self.layers.front().input_len()
    }

    /// Returns the size of the output layer from the network.
    pub fn output_len(&self) -> usize {
        self.layers.back().output_len()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Replaces the learning rate used by subsequent training steps.
    pub fn set_learning_rate(&mut self, rate: f64) -> Result<()> {
        check_learning_rate(rate)?;
        self.learning_rate = rate;
        Ok(())
    }

    pub fn propagation(&self) -> Propagation {
        self.propagation
    }

    pub fn set_propagation(&mut self, propagation: Propagation) {
        self.propagation = propagation;
    }

    /// Feeds the provided `input` through the network, returning the output
    /// layer.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        check_len("network inputs", self.input_len(), input.len())?;
        let mut activations = self.feed_forward(input);
        Ok(activations.pop().unwrap_or_default())
    }

    /// Returns half the summed squared error of the prediction for `input`
    /// against `expected`.
    pub fn error(&self, input: &[f64], expected: &[f64]) -> Result<f64> {
        self.check_example(input, expected)?;
        Ok(self.squared_error(input, expected))
    }

    /// Runs a single gradient descent step on one labelled example.
    pub fn backward(&mut self, input: &[f64], expected: &[f64]) -> Result<()> {
        self.check_example(input, expected)?;
        self.feed_backward(input, expected);
        Ok(())
    }

    /// Trains the network on `examples` for exactly `epochs` passes, updating
    /// after every example, and returns the average error of the last pass.
    ///
    /// The provided `examples` should be a list of labelled data, where each
    /// element takes the form `(network input, expected output)`. Nothing is
    /// logged; use a `Trainer` for progress logging or the error history.
    pub fn train<I, O>(&mut self, examples: &[(I, O)], epochs: usize) -> Result<f64>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        let report = Trainer::quiet(self).epochs(epochs).train(examples)?;
        Ok(report.final_error)
    }

    /// Trains for `DEFAULT_EPOCHS` passes.
    pub fn train_default<I, O>(&mut self, examples: &[(I, O)]) -> Result<f64>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        self.train(examples, DEFAULT_EPOCHS)
    }

    /// Verifies that an example fits the network topology.
    pub(crate) fn check_example(&self, input: &[f64], expected: &[f64]) -> Result<()> {
        check_len("network inputs", self.input_len(), input.len())?;
        check_len("network targets", self.output_len(), expected.len())
    }

    /// Feeds the provided `input` through the network, returning the activated
    /// values for each layer. The first entry is the input itself.
    fn feed_forward(&self, input: &[f64]) -> Vec<Vec<f64>> {
        let mut network = Vec::with_capacity(self.layers.len() + 1);
        network.push(input.to_vec());
        for layer in &self.layers {
            let mut output = vec![0.0; layer.output_len()];
            layer.feed_forward(network.back(), &mut output);
            network.push(output);
        }
        network
    }

    /// Feeds the provided `expected` value back through the network, updating
    /// every layer on the way.
    pub(crate) fn feed_backward(&mut self, input: &[f64], expected: &[f64]) {
        let network = self.feed_forward(input);
        let mut errors: Vec<f64> = expected
            .iter()
            .zip(network.back())
            .map(|(e, y)| e - y)
            .collect();
        let (propagation, rate) = (self.propagation, self.learning_rate);
        for (i, layer) in self.layers.iter_mut().enumerate().rev() {
            let (inputs, outputs) = io_layers(&network, i);
            errors = layer.feed_backward(propagation, rate, inputs, outputs, &errors);
        }
    }

    pub(crate) fn squared_error(&self, input: &[f64], expected: &[f64]) -> f64 {
        let network = self.feed_forward(input);
        let mut error = 0.0;
        for (&a, e) in network.back().iter().zip(expected) {
            error += (a - e) * (a - e);
        }
        error / 2.0
    }
}

/// Builds a new `Network`.
#[derive(Clone, Debug)]
pub struct NetworkBuilder {
    layer_sizes: Vec<usize>,
    learning_rate: f64,
    seed: Option<u64>,
    propagation: Propagation,
}

impl NetworkBuilder {
    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Seeds the weight initialization, making the network reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the error propagation ordering used by training.
    pub fn propagation(mut self, propagation: Propagation) -> Self {
        self.propagation = propagation;
        self
    }

    /// Builds the network, drawing initial weights from the configured seed
    /// or from system randomness.
    pub fn build(self) -> Result<Network> {
        match self.seed {
            Some(seed) => self.build_with_rng(&mut StdRng::seed_from_u64(seed)),
            None => self.build_with_rng(&mut rand::thread_rng()),
        }
    }

    /// Builds the network, drawing initial weights from `rng`.
    pub fn build_with_rng<R>(self, rng: &mut R) -> Result<Network>
    where
        R: Rng + ?Sized,
    {
        check_learning_rate(self.learning_rate)?;
        if self.layer_sizes.contains(&0) {
            return Err(Error::InvalidConfiguration(format!(
                "layer sizes must be positive, got {:?}",
                self.layer_sizes
            )));
        }
        let mut layers = Vec::with_capacity(self.layer_sizes.len() - 1);
        for pair in self.layer_sizes.windows(2) {
            layers.push(Layer::new(pair[0], pair[1], rng)?);
        }
        debug!(
            "built network with layer sizes {:?}, learning rate {}",
            self.layer_sizes, self.learning_rate
        );
        Ok(Network {
            layers,
            learning_rate: self.learning_rate,
            propagation: self.propagation,
        })
    }
}

fn check_learning_rate(rate: f64) -> Result<()> {
    if rate > 0.0 && rate.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration(format!(
            "learning rate must be positive and finite, got {}",
            rate
        )))
    }
}

/// Gets input and output slices for a layer.
fn io_layers(layers: &[Vec<f64>], layer: usize) -> (&[f64], &[f64]) {
    let (before, after) = layers[layer..].split_at(1);
    (&before[0], &after[0])
}
