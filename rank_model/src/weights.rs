use log::{debug, error, info, warn};
use snafu::prelude::*;
use std::collections::HashMap;

use crate::config::*;
use crate::order::{OrderRegistry, Ordering};
use crate::possible::PossibleValues;
use crate::table::{Cell, ModelTable};

/// The weight of every possible value of one characteristic, for one answer.
#[derive(PartialEq, Debug, Clone)]
pub struct ValueWeights(Vec<(Value, f64)>);

impl ValueWeights {
    /// The weight of a value, if the value is a possible value of the characteristic.
    pub fn get(&self, value: &Value) -> Option<f64> {
        self.0.iter().find(|(v, _)| v == value).map(|(_, w)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Value, f64)> {
        self.0.iter()
    }
}

/// The weights of one answer, per characteristic in table order.
#[derive(PartialEq, Debug, Clone)]
pub struct AnswerWeights {
    pub answer: Value,
    pub characteristics: Vec<(String, ValueWeights)>,
}

impl AnswerWeights {
    pub fn get(&self, characteristic: &str) -> Option<&ValueWeights> {
        self.characteristics
            .iter()
            .find(|(c, _)| c == characteristic)
            .map(|(_, w)| w)
    }
}

/// answer -> characteristic -> value -> weight.
///
/// Answers are kept in the order of the table. The table is keyed by the
/// answer identifier: when two rows share an identifier, the later row
/// replaces the earlier one (at the position of the first).
#[derive(PartialEq, Debug, Clone, Default)]
pub struct WeightTable {
    answers: Vec<AnswerWeights>,
    duplicates: Vec<Value>,
}

impl WeightTable {
    pub fn answers(&self) -> &[AnswerWeights] {
        &self.answers
    }

    pub fn get(&self, answer: &Value) -> Option<&AnswerWeights> {
        self.answers.iter().find(|a| a.answer == *answer)
    }

    /// The identifiers that appeared on more than one row.
    pub fn duplicates(&self) -> &[Value] {
        &self.duplicates
    }
}

/// Computes the weight table.
///
/// Characteristics without order use the binary rule over their possible
/// values. Characteristics with an order get, for every value of the order, a
/// weight decreasing with the distance (in the order) to the closest value
/// of the answer.
pub fn compute_weights(
    table: &ModelTable,
    orders: &OrderRegistry,
    possible: &PossibleValues,
) -> ModelResult<WeightTable> {
    let mut answers: Vec<AnswerWeights> = Vec::new();
    let mut positions: HashMap<Value, usize> = HashMap::new();
    let mut duplicates: Vec<Value> = Vec::new();

    for row in table.rows().iter() {
        let answer = table.answer_of(row);
        let mut characteristics: Vec<(String, ValueWeights)> = Vec::new();
        for (idx, name) in table.characteristics() {
            let cell = &row.cells[idx];
            let weights = match orders.get_order(name) {
                Ordering::Unordered => {
                    let values = possible.get(name).unwrap_or(&[]);
                    weights_binary(cell, values)
                }
                Ordering::Ordered(order) => match weights_ordered(name, cell, order) {
                    Ok(w) => w,
                    Err(e) => {
                        error!(
                            "unable to find row value in order list {:?} ({:?})",
                            name, order
                        );
                        return Err(e);
                    }
                },
            };
            characteristics.push((name.clone(), weights));
        }
        debug!("compute_weights: {:?}: {:?}", answer, characteristics);

        let aw = AnswerWeights {
            answer: answer.clone(),
            characteristics,
        };
        if let Some(pos) = positions.get(&answer) {
            warn!(
                "compute_weights: answer {:?} appears on several rows, keeping the last one",
                answer
            );
            answers[*pos] = aw;
            if !duplicates.contains(&answer) {
                duplicates.push(answer);
            }
        } else {
            positions.insert(answer, answers.len());
            answers.push(aw);
        }
    }
    info!("compute_weights: weights computed for {} answers", answers.len());
    Ok(WeightTable {
        answers,
        duplicates,
    })
}

fn weights_binary(cell: &Cell, possible_values: &[Value]) -> ValueWeights {
    ValueWeights(
        possible_values
            .iter()
            .map(|v| (v.clone(), if cell.contains(v) { 1.0 } else { 0.0 }))
            .collect(),
    )
}

fn weights_ordered(name: &str, cell: &Cell, order: &[Value]) -> ModelResult<ValueWeights> {
    let mut row_indexes: Vec<usize> = Vec::new();
    for v in cell.values() {
        let idx = order
            .iter()
            .position(|o| o == v)
            .with_context(|| ValueNotInOrderSnafu {
                column: name,
                value: v.to_string(),
                order: order.iter().map(|o| o.to_string()).collect::<Vec<String>>(),
            })?;
        row_indexes.push(idx);
    }
    let order_len = order.len() as f64;
    let res = order
        .iter()
        .enumerate()
        .map(|(item_idx, item)| {
            if cell.contains(item) {
                return (item.clone(), 1.0);
            }
            let distance = row_indexes
                .iter()
                .map(|row_idx| item_idx.abs_diff(*row_idx))
                .min()
                .unwrap_or(order.len());
            (item.clone(), 1.0 - distance as f64 / order_len)
        })
        .collect();
    Ok(ValueWeights(res))
}
