use std::{fmt, str::FromStr};

use crate::{
    error::Error,
    params::{N_HIDDEN, N_INPUTS, N_OUTPUTS},
};

/// Names a single weight or bias of the network.
///
/// Indices are 0-based. The textual form follows the diagram's 1-based ids:
/// `w1_nm` is the weight from input `m` to hidden unit `n`, `w2_jm` the weight
/// from hidden unit `m` to output `j`, `bN` a hidden bias and `bN_out` an
/// output bias.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamId {
    Weight1 { input: usize, hidden: usize },
    Weight2 { hidden: usize, output: usize },
    Bias1 { hidden: usize },
    Bias2 { output: usize },
}

impl ParamId {
    /// Every weight and bias of the network, first layer first.
    pub fn all() -> Vec<ParamId> {
        let weights1 = (0..N_INPUTS)
            .flat_map(|input| (0..N_HIDDEN).map(move |hidden| ParamId::Weight1 { input, hidden }));
        let weights2 = (0..N_HIDDEN)
            .flat_map(|hidden| (0..N_OUTPUTS).map(move |output| ParamId::Weight2 { hidden, output }));
        let biases1 = (0..N_HIDDEN).map(|hidden| ParamId::Bias1 { hidden });
        let biases2 = (0..N_OUTPUTS).map(|output| ParamId::Bias2 { output });

        weights1.chain(weights2).chain(biases1).chain(biases2).collect()
    }

    pub fn is_weight(&self) -> bool {
        matches!(self, ParamId::Weight1 { .. } | ParamId::Weight2 { .. })
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ParamId::Weight1 { input, hidden } => write!(f, "w1_{}{}", hidden + 1, input + 1),
            ParamId::Weight2 { hidden, output } => write!(f, "w2_{}{}", output + 1, hidden + 1),
            ParamId::Bias1 { hidden } => write!(f, "b{}", hidden + 1),
            ParamId::Bias2 { output } => write!(f, "b{}_out", output + 1),
        }
    }
}

/// Parses a 1-based diagram index, returning it 0-based when within `1..=max`.
fn index(c: char, max: usize) -> Option<usize> {
    let n = c.to_digit(10)? as usize;
    (1..=max).contains(&n).then(|| n - 1)
}

fn pair(s: &str) -> Option<(char, char)> {
    let mut chars = s.chars();
    let pair = (chars.next()?, chars.next()?);
    chars.next().is_none().then_some(pair)
}

impl FromStr for ParamId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || Error::UnknownParam(s.to_string());

        let id = if let Some(sub) = s.strip_prefix("w1_") {
            let (n, m) = pair(sub).ok_or_else(unknown)?;
            ParamId::Weight1 {
                input: index(m, N_INPUTS).ok_or_else(unknown)?,
                hidden: index(n, N_HIDDEN).ok_or_else(unknown)?,
            }
        } else if let Some(sub) = s.strip_prefix("w2_") {
            let (j, m) = pair(sub).ok_or_else(unknown)?;
            ParamId::Weight2 {
                hidden: index(m, N_HIDDEN).ok_or_else(unknown)?,
                output: index(j, N_OUTPUTS).ok_or_else(unknown)?,
            }
        } else if let Some(n) = s.strip_prefix('b').and_then(|s| s.strip_suffix("_out")) {
            let mut chars = n.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(unknown());
            };
            ParamId::Bias2 {
                output: index(c, N_OUTPUTS).ok_or_else(unknown)?,
            }
        } else if let Some(n) = s.strip_prefix('b') {
            let mut chars = n.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(unknown());
            };
            ParamId::Bias1 {
                hidden: index(c, N_HIDDEN).ok_or_else(unknown)?,
            }
        } else {
            return Err(unknown());
        };

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_diagram_ids() {
        assert_eq!(
            "w1_31".parse::<ParamId>().unwrap(),
            ParamId::Weight1 { input: 0, hidden: 2 }
        );
        assert_eq!(
            "w1_12".parse::<ParamId>().unwrap(),
            ParamId::Weight1 { input: 1, hidden: 0 }
        );
        assert_eq!(
            "w2_23".parse::<ParamId>().unwrap(),
            ParamId::Weight2 { hidden: 2, output: 1 }
        );
        assert_eq!("b3".parse::<ParamId>().unwrap(), ParamId::Bias1 { hidden: 2 });
        assert_eq!("b1_out".parse::<ParamId>().unwrap(), ParamId::Bias2 { output: 0 });
    }

    #[test]
    fn test_display_is_the_inverse_of_parse() {
        let all = ParamId::all();
        assert_eq!(all.len(), 17);
        for id in all {
            assert_eq!(id.to_string().parse::<ParamId>().unwrap(), id);
        }
    }

    #[test]
    fn test_rejects_unknown_ids() {
        for s in ["", "w3_11", "w1_41", "w1_13", "w2_31", "w2_14", "w1_1", "w1_111", "b0", "b4", "b3_out", "b12", "x1", "a2"] {
            assert!(
                matches!(s.parse::<ParamId>(), Err(Error::UnknownParam(ref id)) if id == s),
                "'{s}' should be rejected"
            );
        }
    }

    #[test]
    fn test_is_weight() {
        assert!(ParamId::Weight2 { hidden: 0, output: 1 }.is_weight());
        assert!(!ParamId::Bias2 { output: 1 }.is_weight());
    }
}
