use log::{debug, info, warn};
use snafu::prelude::*;
use std::collections::HashMap;

use crate::config::*;
use crate::values::parse_cell;

/// The content of a cell: always at least one value.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Cell(Vec<Value>);

impl Cell {
    pub fn new(values: Vec<Value>) -> Option<Cell> {
        if values.is_empty() {
            None
        } else {
            Some(Cell(values))
        }
    }

    pub fn single(value: Value) -> Cell {
        Cell(vec![value])
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn first(&self) -> &Value {
        &self.0[0]
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }
}

/// One answer of the model, with its cells in column order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Row {
    pub cells: Vec<Cell>,
}

/// Column name -> declared type.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct DataTypes(HashMap<String, DataType>);

impl DataTypes {
    /// Reads the `Data type:` pairs. A column declared twice keeps its last declaration.
    pub fn from_raw(pairs: &[(String, String)]) -> ModelResult<DataTypes> {
        let mut res: HashMap<String, DataType> = HashMap::new();
        for (column, keyword) in pairs.iter() {
            let dt = DataType::from_keyword(column, keyword)?;
            if let Some(previous) = res.insert(column.clone(), dt) {
                warn!(
                    "DataTypes: column {:?} declared twice ({:?} then {:?})",
                    column, previous, dt
                );
            }
        }
        Ok(DataTypes(res))
    }

    pub fn get(&self, column: &str) -> Option<DataType> {
        self.0.get(column).cloned()
    }
}

/// The typed table of answers x characteristics.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ModelTable {
    columns: Vec<String>,
    answer_index: usize,
    rows: Vec<Row>,
}

impl ModelTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn answer_column(&self) -> &str {
        &self.columns[self.answer_index]
    }

    /// All the columns except the answer column, in table order.
    pub fn characteristics(&self) -> impl Iterator<Item = (usize, &String)> {
        let answer_index = self.answer_index;
        self.columns
            .iter()
            .enumerate()
            .filter(move |(idx, _)| *idx != answer_index)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The identifier of the given row.
    pub fn answer_of(&self, row: &Row) -> Value {
        row.cells[self.answer_index].first().clone()
    }

    /// Iterates over the cells of one column.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |r| &r.cells[index])
    }
}

/// Converts the raw data section into a typed table.
///
/// Short rows are padded with empty cells (the spreadsheet reader drops
/// trailing blanks), longer rows are an error.
pub fn parse_table(
    raw: &RawTable,
    types: &DataTypes,
    answer_column: Option<&str>,
) -> ModelResult<ModelTable> {
    ensure!(!raw.header.is_empty(), EmptyTableSnafu {});
    let columns: Vec<String> = raw.header.clone();
    let answer_index = match answer_column {
        Some(name) => columns
            .iter()
            .position(|c| c == name)
            .context(MissingAnswerColumnSnafu { column: name })?,
        None => 0,
    };
    info!(
        "parse_table: {} columns, {} rows, answer column {:?}",
        columns.len(),
        raw.rows.len(),
        columns[answer_index]
    );

    let column_types: Vec<Option<DataType>> = columns.iter().map(|c| types.get(c)).collect();

    let mut rows: Vec<Row> = Vec::new();
    for (row_idx, raw_row) in raw.rows.iter().enumerate() {
        ensure!(
            raw_row.len() <= columns.len(),
            RaggedRowSnafu {
                row: row_idx + 1,
                found: raw_row.len(),
                expected: columns.len(),
            }
        );
        let mut cells: Vec<Cell> = Vec::new();
        for (col_idx, column) in columns.iter().enumerate() {
            let content = raw_row.get(col_idx).map(|s| s.as_str()).unwrap_or("");
            let values =
                parse_cell(content, column_types[col_idx]).context(InColumnSnafu { column })?;
            // parse_cell never returns an empty list
            cells.push(Cell(values));
        }
        debug!("parse_table: row {}: {:?}", row_idx, cells);
        rows.push(Row { cells });
    }

    Ok(ModelTable {
        columns,
        answer_index,
        rows,
    })
}

/// The free-text details of one answer, in column order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Details {
    pub answer: Value,
    pub fields: Vec<(String, Cell)>,
}

/// Reads the details section. The first column is the answer identifier;
/// declared types apply to details columns as they do to the data.
pub fn parse_details(raw: &RawTable, types: &DataTypes) -> ModelResult<Vec<Details>> {
    if raw.header.is_empty() {
        return Ok(vec![]);
    }
    let table = parse_table(raw, types, None)?;
    let res = table
        .rows()
        .iter()
        .map(|row| Details {
            answer: table.answer_of(row),
            fields: table
                .characteristics()
                .map(|(idx, name)| (name.clone(), row.cells[idx].clone()))
                .collect(),
        })
        .collect();
    Ok(res)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn raw(header: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn types(pairs: &[(&str, &str)]) -> DataTypes {
        let p: Vec<(String, String)> = pairs
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        DataTypes::from_raw(&p).unwrap()
    }

    #[test]
    fn cells_are_lists() {
        let t = parse_table(
            &raw(
                &["name", "color", "legs"],
                &[&["table", "red, blue", "4"], &["stool", "red", "3"]],
            ),
            &types(&[("color", "str list"), ("legs", "int")]),
            None,
        )
        .unwrap();
        assert_eq!(t.answer_column(), "name");
        assert_eq!(
            t.rows()[0].cells[1].values(),
            &[Value::str("blue"), Value::str("red")]
        );
        assert_eq!(t.rows()[1].cells[1].values(), &[Value::str("red")]);
        assert_eq!(t.rows()[1].cells[2].values(), &[Value::Int(3)]);
        assert_eq!(t.answer_of(&t.rows()[1]), Value::str("stool"));
    }

    #[test]
    fn answer_column_override() {
        let t = parse_table(
            &raw(&["color", "name"], &[&["red", "table"]]),
            &DataTypes::default(),
            Some("name"),
        )
        .unwrap();
        assert_eq!(t.answer_column(), "name");
        let chars: Vec<&String> = t.characteristics().map(|(_, c)| c).collect();
        assert_eq!(chars, vec!["color"]);

        let e = parse_table(
            &raw(&["color"], &[&["red"]]),
            &DataTypes::default(),
            Some("name"),
        );
        assert!(matches!(e, Err(ModelError::MissingAnswerColumn { .. })));
    }

    #[test]
    fn short_rows_are_padded() {
        let t = parse_table(
            &raw(&["name", "color"], &[&["table"]]),
            &DataTypes::default(),
            None,
        )
        .unwrap();
        assert_eq!(t.rows()[0].cells[1].values(), &[Value::str("")]);
    }

    #[test]
    fn long_rows_fail() {
        let e = parse_table(
            &raw(&["name"], &[&["table", "red"]]),
            &DataTypes::default(),
            None,
        );
        assert!(matches!(e, Err(ModelError::RaggedRow { row: 1, .. })));
    }

    #[test]
    fn bad_cells_name_their_column() {
        let e = parse_table(
            &raw(&["name", "legs"], &[&["table", "four"]]),
            &types(&[("legs", "int")]),
            None,
        );
        match e {
            Err(ModelError::InColumn { column, source }) => {
                assert_eq!(column, "legs");
                assert!(matches!(*source, ModelError::InvalidInt { .. }));
            }
            x => panic!("unexpected {:?}", x),
        }
    }

    #[test]
    fn unknown_type_fails() {
        let p = vec![("legs".to_string(), "float".to_string())];
        assert!(matches!(
            DataTypes::from_raw(&p),
            Err(ModelError::UnknownDataType { .. })
        ));
    }

    #[test]
    fn details_keyed_by_first_column() {
        let d = parse_details(
            &raw(
                &["name", "notes", "links"],
                &[&["table", "sturdy", "http://a, http://b"]],
            ),
            &types(&[("links", "link list")]),
        )
        .unwrap();
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].answer, Value::str("table"));
        assert_eq!(d[0].fields[0].0, "notes");
        assert_eq!(
            d[0].fields[1].1.values(),
            &[Value::str("http://a"), Value::str("http://b")]
        );
    }
}
