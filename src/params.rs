use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::{coerce::coerce, error::Error, param_id::ParamId};

pub const N_INPUTS: usize = 2;
pub const N_HIDDEN: usize = 3;
pub const N_OUTPUTS: usize = 2;

/// Maps each input to each hidden unit, entry `[i, j]` is input `i` → hidden `j`.
pub type WeightMatrix1 = Weights<N_INPUTS, N_HIDDEN>;

/// Maps each hidden unit to each output, entry `[j, k]` is hidden `j` → output `k`.
pub type WeightMatrix2 = Weights<N_HIDDEN, N_OUTPUTS>;

pub type BiasVector1 = Biases<N_HIDDEN>;
pub type BiasVector2 = Biases<N_OUTPUTS>;

/// The two input scalars of the network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputVector {
    pub x1: f64,
    pub x2: f64,
}

impl InputVector {
    pub fn new(x1: f64, x2: f64) -> Self {
        Self { x1, x2 }
    }

    /// Returns the `i`-th input (0-based).
    ///
    /// # Panics
    /// If `i` is not `0` or `1`.
    pub fn get(&self, i: usize) -> f64 {
        match i {
            0 => self.x1,
            1 => self.x2,
            _ => panic!("input index {i} out of range, the network has {N_INPUTS} inputs"),
        }
    }

    /// Returns a copy with the `i`-th input replaced.
    ///
    /// # Panics
    /// If `i` is not `0` or `1`.
    pub fn with(mut self, i: usize, value: f64) -> Self {
        match i {
            0 => self.x1 = value,
            1 => self.x2 = value,
            _ => panic!("input index {i} out of range, the network has {N_INPUTS} inputs"),
        }
        self
    }

    /// Like [`InputVector::with`] but parses user text, malformed text becomes `0`.
    pub fn with_text(self, i: usize, text: &str) -> Self {
        self.with(i, coerce(text))
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from(vec![self.x1, self.x2])
    }
}

/// A dense `R`×`C` weight matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Weights<const R: usize, const C: usize>(Array2<f64>);

impl<const R: usize, const C: usize> Weights<R, C> {
    /// Builds the matrix from its rows, `rows[i][j]` connects unit `i` of the
    /// previous layer to unit `j` of the next.
    pub fn new(rows: [[f64; C]; R]) -> Self {
        Self(Array2::from_shape_fn((R, C), |(i, j)| rows[i][j]))
    }

    pub fn zeros() -> Self {
        Self(Array2::zeros((R, C)))
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.0[[i, j]]
    }

    pub fn with(mut self, i: usize, j: usize, value: f64) -> Self {
        self.0[[i, j]] = value;
        self
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.0.view()
    }
}

impl<const R: usize, const C: usize> TryFrom<Vec<Vec<f64>>> for Weights<R, C> {
    type Error = Error;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        if rows.len() != R {
            return Err(Error::ShapeMismatch {
                what: "weight matrix rows",
                got: rows.len(),
                expected: R,
            });
        }

        if let Some(row) = rows.iter().find(|row| row.len() != C) {
            return Err(Error::ShapeMismatch {
                what: "weight matrix columns",
                got: row.len(),
                expected: C,
            });
        }

        Ok(Self(Array2::from_shape_fn((R, C), |(i, j)| rows[i][j])))
    }
}

impl<const R: usize, const C: usize> From<Weights<R, C>> for Vec<Vec<f64>> {
    fn from(weights: Weights<R, C>) -> Self {
        weights.0.outer_iter().map(|row| row.to_vec()).collect()
    }
}

/// One bias per unit of a layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Biases<const N: usize>(Array1<f64>);

impl<const N: usize> Biases<N> {
    pub fn new(values: [f64; N]) -> Self {
        Self(Array1::from(values.to_vec()))
    }

    pub fn zeros() -> Self {
        Self(Array1::zeros(N))
    }

    pub fn get(&self, j: usize) -> f64 {
        self.0[j]
    }

    pub fn with(mut self, j: usize, value: f64) -> Self {
        self.0[j] = value;
        self
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.0.view()
    }
}

impl<const N: usize> TryFrom<Vec<f64>> for Biases<N> {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        if values.len() != N {
            return Err(Error::ShapeMismatch {
                what: "bias vector",
                got: values.len(),
                expected: N,
            });
        }

        Ok(Self(Array1::from(values)))
    }
}

impl<const N: usize> From<Biases<N>> for Vec<f64> {
    fn from(biases: Biases<N>) -> Self {
        biases.0.to_vec()
    }
}

/// Every weight and bias of the network.
///
/// A missing bias vector behaves exactly like a vector of zeros.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub weights1: WeightMatrix1,
    pub weights2: WeightMatrix2,
    #[serde(default)]
    pub biases1: Option<BiasVector1>,
    #[serde(default)]
    pub biases2: Option<BiasVector2>,
}

impl NetworkParams {
    pub fn new(weights1: WeightMatrix1, weights2: WeightMatrix2) -> Self {
        Self {
            weights1,
            weights2,
            biases1: None,
            biases2: None,
        }
    }

    pub fn with_biases(mut self, biases1: BiasVector1, biases2: BiasVector2) -> Self {
        self.biases1 = Some(biases1);
        self.biases2 = Some(biases2);
        self
    }

    pub fn bias1(&self, hidden: usize) -> f64 {
        self.biases1.as_ref().map_or(0., |b| b.get(hidden))
    }

    pub fn bias2(&self, output: usize) -> f64 {
        self.biases2.as_ref().map_or(0., |b| b.get(output))
    }

    /// Reads the value of a single parameter.
    pub fn get(&self, param: ParamId) -> f64 {
        match param {
            ParamId::Weight1 { input, hidden } => self.weights1.get(input, hidden),
            ParamId::Weight2 { hidden, output } => self.weights2.get(hidden, output),
            ParamId::Bias1 { hidden } => self.bias1(hidden),
            ParamId::Bias2 { output } => self.bias2(output),
        }
    }

    /// Returns a copy with a single parameter replaced.
    ///
    /// Setting a bias on a parameter set without that bias vector starts it
    /// from zeros.
    pub fn with(mut self, param: ParamId, value: f64) -> Self {
        match param {
            ParamId::Weight1 { input, hidden } => {
                self.weights1 = self.weights1.with(input, hidden, value);
            }
            ParamId::Weight2 { hidden, output } => {
                self.weights2 = self.weights2.with(hidden, output, value);
            }
            ParamId::Bias1 { hidden } => {
                let biases = self.biases1.take().unwrap_or_else(Biases::zeros);
                self.biases1 = Some(biases.with(hidden, value));
            }
            ParamId::Bias2 { output } => {
                let biases = self.biases2.take().unwrap_or_else(Biases::zeros);
                self.biases2 = Some(biases.with(output, value));
            }
        }
        self
    }

    /// Like [`NetworkParams::with`] but parses user text, malformed text becomes `0`.
    pub fn with_text(self, param: ParamId, text: &str) -> Self {
        self.with(param, coerce(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> NetworkParams {
        NetworkParams::new(
            Weights::new([[1., 2., 3.], [4., 5., 6.]]),
            Weights::new([[7., 8.], [9., 10.], [11., 12.]]),
        )
    }

    #[test]
    fn test_weights_are_row_major_by_source_unit() {
        let params = params();
        assert_eq!(params.weights1.get(0, 2), 3.);
        assert_eq!(params.weights1.get(1, 0), 4.);
        assert_eq!(params.weights2.get(2, 1), 12.);
        assert_eq!(params.weights1.view().dim(), (2, 3));
        assert_eq!(params.weights2.view().dim(), (3, 2));
    }

    #[test]
    fn test_missing_biases_read_as_zero() {
        let params = params();
        for j in 0..N_HIDDEN {
            assert_eq!(params.get(ParamId::Bias1 { hidden: j }), 0.);
        }
        for k in 0..N_OUTPUTS {
            assert_eq!(params.get(ParamId::Bias2 { output: k }), 0.);
        }
    }

    #[test]
    fn test_with_only_touches_one_param() {
        let before = params();
        let id = ParamId::Weight2 { hidden: 1, output: 0 };
        let after = before.clone().with(id, -3.5);

        assert_eq!(after.get(id), -3.5);
        for other in ParamId::all().into_iter().filter(|p| *p != id) {
            assert_eq!(after.get(other), before.get(other), "{other} changed");
        }
    }

    #[test]
    fn test_setting_a_bias_materializes_the_vector() {
        let params = params().with(ParamId::Bias1 { hidden: 2 }, 1.5);
        let biases = params.biases1.as_ref().unwrap();
        assert_eq!(Vec::<f64>::from(biases.clone()), vec![0., 0., 1.5]);
        assert!(params.biases2.is_none());
    }

    #[test]
    fn test_with_text_coerces_malformed_input() {
        let id = ParamId::Weight1 { input: 0, hidden: 0 };
        let params = params().with_text(id, "abc");
        assert_eq!(params.get(id), 0.);

        let params = params.with_text(id, " -2.5e1xyz");
        assert_eq!(params.get(id), -25.);
    }

    #[test]
    fn test_inputs_with() {
        let inputs = InputVector::new(1., 0.).with(1, 4.).with_text(0, "oops");
        assert_eq!(inputs, InputVector::new(0., 4.));
        assert_eq!(inputs.to_array().to_vec(), vec![0., 4.]);
    }

    #[test]
    fn test_weights_reject_wrong_shape() {
        let res = WeightMatrix1::try_from(vec![vec![1., 2., 3.]]);
        assert!(matches!(
            res,
            Err(Error::ShapeMismatch {
                got: 1,
                expected: 2,
                ..
            })
        ));

        let res = WeightMatrix2::try_from(vec![vec![1., 2.], vec![3.], vec![4., 5.]]);
        assert!(matches!(
            res,
            Err(Error::ShapeMismatch {
                got: 1,
                expected: 2,
                ..
            })
        ));

        let res = BiasVector1::try_from(vec![1., 2.]);
        assert!(matches!(
            res,
            Err(Error::ShapeMismatch {
                got: 2,
                expected: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_params_json_shape() {
        let params = params().with_biases(Biases::new([-1., 0., 1.]), Biases::new([2., 3.]));
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["weights1"], serde_json::json!([[1., 2., 3.], [4., 5., 6.]]));
        assert_eq!(json["biases2"], serde_json::json!([2., 3.]));

        let back: NetworkParams = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }
}
