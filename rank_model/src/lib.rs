pub mod builder;
mod config;
pub mod manual;
mod navigate;
mod order;
mod possible;
pub mod quick_start;
mod table;
mod values;
mod weights;

use log::{debug, info};

pub use crate::config::*;
pub use crate::navigate::{
    CharacteristicOptions, NavigationResult, Navigator, OptionCount, RankedAnswer, Selection,
};
pub use crate::order::{OrderRegistry, Ordering};
pub use crate::possible::PossibleValues;
pub use crate::table::{parse_details, parse_table, Cell, DataTypes, Details, ModelTable, Row};
pub use crate::values::{parse_cell, parse_order, parse_value};
pub use crate::weights::{compute_weights, AnswerWeights, ValueWeights, WeightTable};

/// A fully processed model: the typed table and everything derived from it.
#[derive(PartialEq, Debug, Clone)]
pub struct Model {
    table: ModelTable,
    orders: OrderRegistry,
    possible: PossibleValues,
    weights: WeightTable,
    details: Vec<Details>,
}

impl Model {
    pub fn table(&self) -> &ModelTable {
        &self.table
    }

    pub fn orders(&self) -> &OrderRegistry {
        &self.orders
    }

    pub fn possible_values(&self) -> &PossibleValues {
        &self.possible
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn details(&self) -> &[Details] {
        &self.details
    }

    /// The details of an answer. With several details rows for the same
    /// answer, the last one wins (as for the data rows).
    pub fn details_of(&self, answer: &Value) -> Option<&Details> {
        self.details.iter().rev().find(|d| d.answer == *answer)
    }

    /// The answers that appear on several rows of the data section.
    pub fn duplicate_answers(&self) -> &[Value] {
        self.weights.duplicates()
    }

    pub fn navigator(&self) -> Navigator<'_> {
        Navigator::new(&self.weights, &self.possible, self.table.answer_column())
    }
}

/// Builds a model from the sections read in a spreadsheet.
///
/// The steps are run in order: data types, table, orders, possible values,
/// weights and details. The first failure stops the processing.
pub fn load_model(raw: &RawModel) -> ModelResult<Model> {
    let types = DataTypes::from_raw(&raw.data_types)?;
    debug!("load_model: data types: {:?}", types);
    let table = parse_table(&raw.data, &types, raw.answer_column.as_deref())?;
    let orders = OrderRegistry::from_raw(&raw.orders, &types)?;
    let possible = PossibleValues::build(&table, &orders);
    let weights = compute_weights(&table, &orders, &possible)?;
    let details = match raw.details.as_ref() {
        Some(d) => parse_details(d, &types)?,
        None => vec![],
    };
    for d in details.iter() {
        if weights.get(&d.answer).is_none() {
            info!(
                "load_model: details for {:?} do not match any answer",
                d.answer
            );
        }
    }
    info!(
        "load_model: {} answers, {} characteristics, {} details, {} possible pages",
        weights.answers().len(),
        table.characteristics().count(),
        details.len(),
        possible.total_count(table.answer_column())
    );
    Ok(Model {
        table,
        orders,
        possible,
        weights,
        details,
    })
}
