// ********* Input data structures ***********

use snafu::prelude::*;
use std::cmp::Ordering as CmpOrdering;
use std::fmt::Display;

/// The declared parsing type of a column.
///
/// Columns without a declaration are kept as plain strings.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum DataType {
    Int,
    IntRange,
    StrList,
    LinkList,
}

impl DataType {
    /// Reads the keyword used in the `Data type:` section.
    ///
    /// Both the spreadsheet spelling (`int range`) and the dashed one
    /// (`int-range`) are accepted.
    pub fn from_keyword(column: &str, keyword: &str) -> ModelResult<DataType> {
        match keyword.trim().replace('-', " ").as_str() {
            "int" => Ok(DataType::Int),
            "int range" => Ok(DataType::IntRange),
            "str list" => Ok(DataType::StrList),
            "link list" => Ok(DataType::LinkList),
            _ => UnknownDataTypeSnafu {
                column,
                keyword: keyword.trim(),
            }
            .fail(),
        }
    }
}

/// How lists produced by the parser are ordered.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SortMode {
    /// `str list` is sorted, `link list` keeps the input order.
    Default,
    Sorted,
    /// Used for order definitions: the input order is the meaning.
    Preserve,
}

/// An atomic value of a cell.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Value {
    Int(i64),
    Str(String),
}

impl Value {
    pub fn str(s: &str) -> Value {
        Value::Str(s.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Str(s) if s.is_empty())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

// Integers sort numerically and before any string.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Int(_), Value::Str(_)) => CmpOrdering::Less,
            (Value::Str(_), Value::Int(_)) => CmpOrdering::Greater,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

/// The direct output of the value parser, before normalization.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ParsedValue {
    Single(Value),
    List(Vec<Value>),
}

impl ParsedValue {
    pub fn into_values(self) -> Vec<Value> {
        match self {
            ParsedValue::Single(v) => vec![v],
            ParsedValue::List(l) => l,
        }
    }
}

/// A table as handed over by the spreadsheet reader: a header and rows of raw strings.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Reads a two-column table (key, value) into pairs.
    ///
    /// Rows shorter than two cells get an empty value.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.rows
            .iter()
            .filter_map(|row| {
                let key = row.first()?;
                let value = row.get(1).cloned().unwrap_or_default();
                Some((key.clone(), value))
            })
            .collect()
    }
}

/// Everything needed to build a model.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawModel {
    pub data: RawTable,
    /// Column name -> type keyword.
    pub data_types: Vec<(String, String)>,
    /// Column name -> comma separated order.
    pub orders: Vec<(String, String)>,
    pub details: Option<RawTable>,
    /// Defaults to the first column when not set.
    pub answer_column: Option<String>,
}

// ********* Navigation options **********

/// How the per-characteristic scores of an answer are combined.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum RankingPolicy {
    /// Average of the scores. This is what the generated pages display (as a percentage).
    Mean,
    Product,
}

impl RankingPolicy {
    pub const DEFAULT: RankingPolicy = RankingPolicy::Mean;

    pub fn from_keyword(keyword: &str) -> Option<RankingPolicy> {
        match keyword.trim().to_lowercase().as_str() {
            "mean" | "sum" | "average" => Some(RankingPolicy::Mean),
            "product" => Some(RankingPolicy::Product),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            RankingPolicy::Mean => "mean",
            RankingPolicy::Product => "product",
        }
    }
}

impl Default for RankingPolicy {
    fn default() -> Self {
        RankingPolicy::DEFAULT
    }
}

// ******** Errors *********

/// Errors that prevent the model from being built.
#[derive(Debug, Snafu, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum ModelError {
    #[snafu(display("unknown data type '{keyword}' for column '{column}'"))]
    UnknownDataType { column: String, keyword: String },
    #[snafu(display("'{raw}' is not an integer"))]
    InvalidInt { raw: String },
    #[snafu(display("invalid range '{raw}'"))]
    InvalidRange { raw: String },
    #[snafu(display("'{raw}' does not contain any value"))]
    EmptyValue { raw: String },
    #[snafu(display("column '{column}': value '{value}' is missing from the order {order:?}"))]
    ValueNotInOrder {
        column: String,
        value: String,
        order: Vec<String>,
    },
    #[snafu(display("answer column '{column}' not found in the header"))]
    MissingAnswerColumn { column: String },
    #[snafu(display("row {row} has {found} cells, the header has {expected}"))]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[snafu(display("the model table has no columns"))]
    EmptyTable {},
    #[snafu(display("column '{column}': {source}"))]
    InColumn {
        column: String,
        #[snafu(source(from(ModelError, Box::new)))]
        source: Box<ModelError>,
    },
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised when applying a selection.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum NavigationError {
    #[snafu(display("unknown characteristic '{name}'"))]
    UnknownCharacteristic { name: String },
    #[snafu(display("characteristic '{name}' has no value '{value}'"))]
    UnknownValue { name: String, value: String },
    #[snafu(display("cannot read the selection '{raw}', expected 'characteristic=value'"))]
    MalformedPick { raw: String },
}
