//! Utilities for training neural networks.

use crate::error::{Error, Result};
use crate::feed_forward::{Network, DEFAULT_EPOCHS};

use log::{debug, info};
use std::time::Instant;

/// The outcome of a training run.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingReport {
    /// How many passes over the examples were made.
    pub epochs: usize,
    /// The average error over the last pass.
    pub final_error: f64,
    /// The average error of every pass, in order.
    pub history: Vec<f64>,
}

/// A builder for training runs over an existing `Network`.
#[derive(Debug)]
pub struct Trainer<'a> {
    network: &'a mut Network,
    epochs: usize,
    logging: Logging,
    /// Whether every epoch's error is kept for the report.
    record_history: bool,
}

impl<'a> Trainer<'a> {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * Runs `DEFAULT_EPOCHS` passes over the examples.
    /// * Logs on training completion.
    pub fn new(network: &'a mut Network) -> Self {
        Trainer {
            network,
            epochs: DEFAULT_EPOCHS,
            logging: Logging::Completion,
            record_history: true,
        }
    }

    /// A silent trainer that keeps only the final error, so its memory use
    /// does not depend on the number of epochs.
    pub(crate) fn quiet(network: &'a mut Network) -> Self {
        Trainer {
            network,
            epochs: DEFAULT_EPOCHS,
            logging: Logging::Silent,
            record_history: false,
        }
    }

    /// Sets how many passes over the examples to make.
    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Trains the network using the provided labelled data.
    ///
    /// The provided `examples` should be a list of labelled data, where each
    /// element takes the form `(network input, expected output)`. Examples
    /// are visited in order, and the weights are updated after each one.
    ///
    /// Returns:
    ///   The per-epoch training error (only the final error for the trainer
    ///   behind `Network::train`), or an error if invalid training
    ///   parameters were provided. Nothing is trained in the latter case.
    pub fn train<I, O>(self, examples: &[(I, O)]) -> Result<TrainingReport>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        self.validate(examples)?;

        let start_time = Instant::now();
        let mut history = Vec::new();
        let mut training_error = 0.0;
        for epoch in 1..=self.epochs {
            training_error = 0.0;
            for (example, expected) in examples {
                let (example, expected) = (example.as_ref(), expected.as_ref());
                self.network.feed_backward(example, expected);
                training_error += self.network.squared_error(example, expected);
            }
            training_error /= examples.len() as f64;
            if self.record_history {
                history.push(training_error);
            }
            self.logging.epoch(epoch, training_error);
        }
        self.logging
            .completion(self.epochs, training_error, start_time);
        Ok(TrainingReport {
            epochs: self.epochs,
            final_error: training_error,
            history,
        })
    }

    /// Verifies that all provided inputs to the `Trainer` are valid, returning
    /// an error if something is wrong.
    fn validate<I, O>(&self, examples: &[(I, O)]) -> Result<()>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        if self.epochs == 0 {
            return Err(Error::InvalidConfiguration(
                "training needs at least one epoch".into(),
            ));
        }
        if examples.is_empty() {
            return Err(Error::InvalidConfiguration(
                "training needs at least one example".into(),
            ));
        }
        for (example, expected) in examples {
            self.network
                .check_example(example.as_ref(), expected.as_ref())?;
        }
        Ok(())
    }
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be logged at completion
    Completion,
    /// A summary will be logged after every `n` training epochs, as well as
    /// at completion
    Epochs(usize),
}

impl Logging {
    /// Performs logging at the current `epoch` of training.
    fn epoch(&self, epoch: usize, training_error: f64) {
        if let Logging::Epochs(freq) = *self {
            if freq > 0 && epoch % freq == 0 {
                debug!("epoch {}: error={}", epoch, training_error);
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, epochs: usize, training_error: f64, start_time: Instant) {
        if let Logging::Silent = *self {
            return;
        }
        info!(
            "ran {} epochs in {:?}, final error {}",
            epochs,
            start_time.elapsed(),
            training_error
        );
    }
}
