pub mod arch;
pub mod classify;
pub mod coerce;
pub mod error;
pub mod gradient;
mod param_id;
pub mod params;
pub mod presets;

pub use arch::{activations::ActivationMode, evaluate, ForwardPass, Network};
pub use classify::{classify, truth_table, Label, TruthTableReport, XOR_TRUTH_TABLE};
pub use error::{Error, Result};
pub use gradient::{gradient, Effect, Gradient, Partial};
pub use param_id::ParamId;
pub use params::{
    BiasVector1, BiasVector2, InputVector, NetworkParams, WeightMatrix1, WeightMatrix2,
};
pub use presets::{NetworkConfig, Preset};
