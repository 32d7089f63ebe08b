pub mod activations;
mod network;

pub use network::{evaluate, ForwardPass, Network};
