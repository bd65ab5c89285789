use log::debug;
use std::collections::BTreeSet;

use crate::config::*;
use crate::order::{OrderRegistry, Ordering};
use crate::table::ModelTable;

/// Per column, the values that can be picked as a filter.
///
/// Columns are kept in table order, the answer column included (its values
/// are the list of answers).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PossibleValues {
    columns: Vec<(String, Vec<Value>)>,
}

impl PossibleValues {
    /// Collects the distinct values of every column.
    ///
    /// Without an explicit order the values are sorted. With an order, the
    /// order values come first as declared, followed by any other value seen
    /// in the table.
    pub fn build(table: &ModelTable, orders: &OrderRegistry) -> PossibleValues {
        let mut columns: Vec<(String, Vec<Value>)> = Vec::new();
        for (idx, name) in table.columns().iter().enumerate() {
            let observed: BTreeSet<Value> = table
                .column_cells(idx)
                .flat_map(|c| c.values().iter().cloned())
                .collect();
            let values: Vec<Value> = match orders.get_order(name) {
                Ordering::Unordered => observed.into_iter().collect(),
                Ordering::Ordered(order) => {
                    let mut res = order.clone();
                    res.extend(observed.into_iter().filter(|v| !order.contains(v)));
                    res
                }
            };
            debug!("PossibleValues: {:?}: {:?}", name, values);
            columns.push((name.clone(), values));
        }
        PossibleValues { columns }
    }

    pub fn get(&self, column: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Value>)> {
        self.columns.iter().map(|(n, v)| (n, v))
    }

    /// Looks up a value of a column from its display form.
    pub fn resolve(&self, column: &str, raw: &str) -> Option<&Value> {
        self.get(column)?.iter().find(|v| v.to_string() == raw)
    }

    /// The number of distinct pages needed to enumerate every sequence of
    /// choices: the product of the number of values of each characteristic,
    /// times the number of ways of ordering the characteristics.
    ///
    /// Only used to report progress, so it saturates instead of overflowing.
    pub fn total_count(&self, answer_column: &str) -> u128 {
        let mut total: u128 = 1;
        let mut num_chars: u128 = 0;
        for (name, values) in self.columns.iter() {
            if name == answer_column {
                continue;
            }
            total = total.saturating_mul(values.len() as u128);
            num_chars += 1;
        }
        for k in 2..=num_chars {
            total = total.saturating_mul(k);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::raw;
    use crate::table::{parse_table, DataTypes};

    fn pairs(p: &[(&str, &str)]) -> Vec<(String, String)> {
        p.iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    fn furniture() -> (ModelTable, OrderRegistry) {
        let types = DataTypes::from_raw(&pairs(&[("color", "str list")])).unwrap();
        let table = parse_table(
            &raw(
                &["name", "color", "size"],
                &[
                    &["table", "red, blue", "large"],
                    &["stool", "red", "small"],
                    &["bench", "green", "large"],
                ],
            ),
            &types,
            None,
        )
        .unwrap();
        let orders =
            OrderRegistry::from_raw(&pairs(&[("size", "small, medium, large")]), &types).unwrap();
        (table, orders)
    }

    #[test]
    fn sorted_distinct_values() {
        let (table, orders) = furniture();
        let pv = PossibleValues::build(&table, &orders);
        assert_eq!(
            pv.get("color").unwrap(),
            &[Value::str("blue"), Value::str("green"), Value::str("red")]
        );
        assert_eq!(
            pv.get("name").unwrap(),
            &[Value::str("bench"), Value::str("stool"), Value::str("table")]
        );
    }

    #[test]
    fn order_takes_precedence() {
        let (table, orders) = furniture();
        let pv = PossibleValues::build(&table, &orders);
        // "medium" is never used but is part of the order.
        assert_eq!(
            pv.get("size").unwrap(),
            &[Value::str("small"), Value::str("medium"), Value::str("large")]
        );
    }

    #[test]
    fn observed_values_outside_order_are_kept() {
        let (table, _) = furniture();
        let orders = OrderRegistry::from_raw(
            &pairs(&[("color", "red, green")]),
            &DataTypes::default(),
        )
        .unwrap();
        let pv = PossibleValues::build(&table, &orders);
        assert_eq!(
            pv.get("color").unwrap(),
            &[Value::str("red"), Value::str("green"), Value::str("blue")]
        );
    }

    #[test]
    fn build_is_idempotent() {
        let (table, orders) = furniture();
        assert_eq!(
            PossibleValues::build(&table, &orders),
            PossibleValues::build(&table, &orders)
        );
    }

    #[test]
    fn resolve_by_display_form() {
        let types = DataTypes::from_raw(&pairs(&[("legs", "int")])).unwrap();
        let table = parse_table(
            &raw(&["name", "legs"], &[&["table", "4"], &["stool", "3"]]),
            &types,
            None,
        )
        .unwrap();
        let pv = PossibleValues::build(&table, &OrderRegistry::default());
        assert_eq!(pv.resolve("legs", "4"), Some(&Value::Int(4)));
        assert_eq!(pv.resolve("legs", "5"), None);
        assert_eq!(pv.resolve("wheels", "4"), None);
    }

    #[test]
    fn total_count() {
        let (table, orders) = furniture();
        let pv = PossibleValues::build(&table, &orders);
        // colors: 3, sizes: 3, 2 characteristics -> 3 * 3 * 2!
        assert_eq!(pv.total_count("name"), 18);
    }
}
