//! A small multilayer perceptron: fully connected sigmoid layers trained by
//! online backpropagation.

pub mod activator;
pub mod error;
pub mod feed_forward;
pub mod layer;
pub mod trainer;

mod matrix;
mod utils;

pub use crate::error::{Error, Result};
pub use crate::feed_forward::{Network, NetworkBuilder};
pub use crate::layer::{Layer, Propagation};
pub use crate::trainer::{Logging, Trainer, TrainingReport};
