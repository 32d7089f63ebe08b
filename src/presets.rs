use std::{fmt, fs, path::Path, str::FromStr};

use log::info;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    arch::{activations::ActivationMode, Network},
    error::{Error, Result},
    params::{
        BiasVector1, BiasVector2, Biases, InputVector, NetworkParams, WeightMatrix1,
        WeightMatrix2, Weights,
    },
};

/// Built-in parameter sets. They only differ in configuration, the evaluator
/// is the same for all of them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Sigmoid network solving exclusive-or: hidden unit 1 acts as an OR
    /// gate, hidden unit 2 as an AND gate, hidden unit 3 is unused.
    #[default]
    XorGate,
    /// Linear network without biases.
    LinearToy,
    /// Sigmoid network without biases and small weights.
    SigmoidToy,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::XorGate, Preset::LinearToy, Preset::SigmoidToy];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::XorGate => "xor_gate",
            Preset::LinearToy => "linear_toy",
            Preset::SigmoidToy => "sigmoid_toy",
        }
    }

    pub fn config(&self) -> NetworkConfig {
        match self {
            Preset::XorGate => NetworkConfig {
                mode: ActivationMode::Sigmoid,
                inputs: InputVector::new(1., 0.),
                params: NetworkParams::new(
                    Weights::new([
                        [20., 20., 0.], // x1
                        [20., 20., 0.], // x2
                    ]),
                    Weights::new([
                        [20., -20.], // a1
                        [-20., 20.], // a2
                        [0., 0.],    // a3
                    ]),
                )
                .with_biases(Biases::new([-10., -30., 0.]), Biases::new([-10., 10.])),
            },
            Preset::LinearToy => NetworkConfig {
                mode: ActivationMode::Identity,
                inputs: InputVector::new(1., 2.),
                params: NetworkParams::new(
                    Weights::new([
                        [0.5, -1., 2.],  // x1
                        [1., 0.5, -0.5], // x2
                    ]),
                    Weights::new([
                        [1., -1.],  // a1
                        [0.5, 2.],  // a2
                        [-1., 0.5], // a3
                    ]),
                ),
            },
            Preset::SigmoidToy => NetworkConfig {
                mode: ActivationMode::Sigmoid,
                inputs: InputVector::new(1., 0.5),
                params: NetworkParams::new(
                    Weights::new([
                        [0.8, -0.4, 0.3], // x1
                        [0.2, 0.9, -0.7], // x2
                    ]),
                    Weights::new([
                        [1.2, -0.6], // a1
                        [-0.5, 1.1], // a2
                        [0.7, 0.4],  // a3
                    ]),
                ),
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| Error::UnknownPreset(s.to_string()))
    }
}

/// Everything needed to show the network: mode, current inputs and parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NetworkConfig {
    pub mode: ActivationMode,
    pub inputs: InputVector,
    #[serde(flatten)]
    pub params: NetworkParams,
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn explicit<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A config document as written by hand: every field is optional and falls
/// back to the named preset.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDraft {
    #[serde(default)]
    preset: Option<Preset>,
    #[serde(default)]
    mode: Option<ActivationMode>,
    #[serde(default)]
    inputs: Option<InputVector>,
    #[serde(default)]
    weights1: Option<WeightMatrix1>,
    #[serde(default)]
    weights2: Option<WeightMatrix2>,
    #[serde(default, deserialize_with = "explicit")]
    biases1: Option<Option<BiasVector1>>,
    #[serde(default, deserialize_with = "explicit")]
    biases2: Option<Option<BiasVector2>>,
}

impl ConfigDraft {
    fn build(self) -> NetworkConfig {
        let base = self.preset.unwrap_or_default().config();
        let params = base.params;

        NetworkConfig {
            mode: self.mode.unwrap_or(base.mode),
            inputs: self.inputs.unwrap_or(base.inputs),
            params: NetworkParams {
                weights1: self.weights1.unwrap_or(params.weights1),
                weights2: self.weights2.unwrap_or(params.weights2),
                biases1: self.biases1.unwrap_or(params.biases1),
                biases2: self.biases2.unwrap_or(params.biases2),
            },
        }
    }
}

impl NetworkConfig {
    /// Parses a JSON config document.
    ///
    /// Missing fields are taken from the preset named by the `preset` key, or
    /// from [`Preset::XorGate`] when there is none. An explicit `null` bias
    /// vector removes that bias.
    ///
    /// # Errors
    /// Returns `Error::Config` on malformed JSON, unknown keys or wrongly
    /// shaped matrices.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let draft: ConfigDraft = serde_json::from_str(s)?;
        Ok(draft.build())
    }

    /// Reads and parses a JSON config file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read, otherwise see
    /// [`NetworkConfig::from_json_str`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        info!("loading network config from {}", path.display());
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn network(&self) -> Network {
        Network::new(self.mode, self.params.clone())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}
