use std::fmt;

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    arch::{activations::ActivationMode, evaluate},
    params::{InputVector, NetworkParams},
};

/// A predicted or expected class. `y1` votes for `One`, `y2` for `Zero`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Zero,
    One,
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        match label {
            Label::Zero => 0,
            Label::One => 1,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// One row of a two-input truth table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TruthRow {
    pub x1: f64,
    pub x2: f64,
    pub expected: Label,
}

impl TruthRow {
    pub fn inputs(&self) -> InputVector {
        InputVector::new(self.x1, self.x2)
    }
}

/// The exclusive-or function the diagram asks the learner to reproduce.
pub const XOR_TRUTH_TABLE: [TruthRow; 4] = [
    TruthRow { x1: 0., x2: 0., expected: Label::Zero },
    TruthRow { x1: 0., x2: 1., expected: Label::One },
    TruthRow { x1: 1., x2: 0., expected: Label::One },
    TruthRow { x1: 1., x2: 1., expected: Label::Zero },
];

/// Predicts `One` if `y1 > y2`, `Zero` otherwise (ties included).
pub fn classify(inputs: &InputVector, params: &NetworkParams, mode: ActivationMode) -> Label {
    let forward = evaluate(inputs, params, mode);
    predict(forward.y1(), forward.y2())
}

fn predict(y1: f64, y2: f64) -> Label {
    if y1 > y2 {
        Label::One
    } else {
        Label::Zero
    }
}

/// The outcome of evaluating a single truth table row.
#[derive(Clone, Debug, PartialEq)]
pub struct RowOutcome {
    pub row: TruthRow,
    pub y1: f64,
    pub y2: f64,
    pub predicted: Label,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TruthTableReport {
    pub rows: Vec<RowOutcome>,
    pub successes: usize,
    /// `successes` over the row count, rounded to the nearest percent.
    pub percentage: u32,
}

impl TruthTableReport {
    pub fn all_correct(&self) -> bool {
        self.successes == self.rows.len()
    }
}

/// Scores `rows` against the network, every row is evaluated exactly once.
pub fn score(rows: &[TruthRow], params: &NetworkParams, mode: ActivationMode) -> TruthTableReport {
    let rows: Vec<_> = rows
        .par_iter()
        .map(|row| {
            let forward = evaluate(&row.inputs(), params, mode);
            let (y1, y2) = (forward.y1(), forward.y2());
            let predicted = predict(y1, y2);

            RowOutcome {
                row: *row,
                y1,
                y2,
                predicted,
                correct: predicted == row.expected,
            }
        })
        .collect();

    let successes = rows.iter().filter(|r| r.correct).count();
    let percentage = if rows.is_empty() {
        0
    } else {
        (successes as f64 * 100. / rows.len() as f64).round() as u32
    };

    info!("{successes}/{} rows correct ({percentage}%)", rows.len());

    TruthTableReport {
        rows,
        successes,
        percentage,
    }
}

/// Scores the network against [`XOR_TRUTH_TABLE`].
pub fn truth_table(params: &NetworkParams, mode: ActivationMode) -> TruthTableReport {
    score(&XOR_TRUTH_TABLE, params, mode)
}
