use log::{debug, warn};
use snafu::prelude::*;
use std::collections::HashMap;

use crate::config::*;
use crate::table::DataTypes;
use crate::values::parse_order;

/// The ordering of the values of a characteristic.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Ordering {
    /// Values declared by the author, from one end of the scale to the other.
    Ordered(Vec<Value>),
    /// No declared order: the binary rule applies.
    Unordered,
}

impl Ordering {
    pub fn values(&self) -> Option<&[Value]> {
        match self {
            Ordering::Ordered(l) => Some(l),
            Ordering::Unordered => None,
        }
    }
}

/// The explicit orders of the characteristics.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct OrderRegistry {
    orders: HashMap<String, Ordering>,
}

static UNORDERED: Ordering = Ordering::Unordered;

impl OrderRegistry {
    /// Builds the registry from the `Order:` section (characteristic, comma separated values).
    ///
    /// Order strings are parsed with the declared type of the column, keeping
    /// the order in which the values are written.
    pub fn from_raw(pairs: &[(String, String)], types: &DataTypes) -> ModelResult<OrderRegistry> {
        let mut orders: HashMap<String, Ordering> = HashMap::new();
        for (column, raw) in pairs.iter() {
            let values =
                parse_order(raw, types.get(column)).context(InColumnSnafu { column })?;
            debug!("OrderRegistry: {:?} -> {:?}", column, values);
            if orders
                .insert(column.clone(), Ordering::Ordered(values))
                .is_some()
            {
                warn!("OrderRegistry: order of {:?} declared twice", column);
            }
        }
        Ok(OrderRegistry { orders })
    }

    pub fn get_order(&self, characteristic: &str) -> &Ordering {
        self.orders.get(characteristic).unwrap_or(&UNORDERED)
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
