pub use crate::config::*;
use crate::{load_model, Model};

/// A builder for assembling a model without a spreadsheet.
///
/// ```
/// pub use rank_model::builder::Builder;
/// pub use rank_model::{RankingPolicy, Selection};
/// # use rank_model::ModelError;
///
/// let mut builder = Builder::new(&["name", "color", "size"])
///     .data_type("color", "str list")?
///     .order("size", "small, medium, large");
///
/// builder.add_row(&["table", "red, blue", "large"]);
/// builder.add_row(&["stool", "red", "small"]);
///
/// let model = builder.build()?;
/// let res = model
///     .navigator()
///     .apply_selection(&Selection::new().pick("size", "small"), RankingPolicy::Mean)
///     .unwrap();
/// assert_eq!(res.ranked[0].answer.to_string(), "stool");
///
/// # Ok::<(), ModelError>(())
/// ```
pub struct Builder {
    pub(crate) _raw: RawModel,
}

impl Builder {
    pub fn new(columns: &[&str]) -> Builder {
        Builder {
            _raw: RawModel {
                data: RawTable {
                    header: columns.iter().map(|c| c.to_string()).collect(),
                    rows: Vec::new(),
                },
                ..RawModel::default()
            },
        }
    }

    /// Declares the type of a column. The keyword is checked right away.
    pub fn data_type(mut self, column: &str, keyword: &str) -> Result<Builder, ModelError> {
        DataType::from_keyword(column, keyword)?;
        self._raw
            .data_types
            .push((column.to_string(), keyword.to_string()));
        Ok(self)
    }

    /// Declares the order of the values of a characteristic, as a comma separated list.
    pub fn order(mut self, column: &str, values: &str) -> Builder {
        self._raw
            .orders
            .push((column.to_string(), values.to_string()));
        self
    }

    pub fn answer_column(mut self, column: &str) -> Builder {
        self._raw.answer_column = Some(column.to_string());
        self
    }

    /// Adds an answer. Cells are written as they would be in the spreadsheet.
    pub fn add_row(&mut self, cells: &[&str]) {
        self._raw
            .data
            .rows
            .push(cells.iter().map(|c| c.to_string()).collect());
    }

    /// Adds the details of an answer. The header is given by the first call.
    pub fn add_details(&mut self, header: &[&str], cells: &[&str]) {
        let details = self._raw.details.get_or_insert_with(|| RawTable {
            header: header.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        });
        details.rows.push(cells.iter().map(|c| c.to_string()).collect());
    }

    pub fn build(&self) -> ModelResult<Model> {
        load_model(&self._raw)
    }
}
