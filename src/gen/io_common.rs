// Splitting a sheet into its marker sections.

use log::debug;
use std::path::Path;

use rank_model::RawTable;

pub const CONFIG_MARKER: &str = "Config:";
pub const DATA_TYPE_MARKER: &str = "Data type:";
pub const ORDER_MARKER: &str = "Order:";
pub const DATA_MARKER: &str = "Data:";
pub const DETAILS_MARKER: &str = "Details:";

const MARKERS: [&str; 5] = [
    CONFIG_MARKER,
    DATA_TYPE_MARKER,
    ORDER_MARKER,
    DATA_MARKER,
    DETAILS_MARKER,
];

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputKind {
    Excel,
    Csv,
}

pub fn input_kind(path: &str) -> Option<InputKind> {
    let ext = Path::new(path).extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "xlsx" | "xlsm" => Some(InputKind::Excel),
        "csv" => Some(InputKind::Csv),
        _ => None,
    }
}

/// The sections found in a sheet. Only the data section is mandatory.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SheetSections {
    pub config: Option<RawTable>,
    pub data_types: Option<RawTable>,
    pub orders: Option<RawTable>,
    pub data: RawTable,
    pub details: Option<RawTable>,
}

pub fn split_sections(grid: &[Vec<String>]) -> SheetSections {
    let data = match find_section(grid, DATA_MARKER) {
        Some(t) => t,
        None => {
            debug!("split_sections: no {:?} marker, using the whole sheet", DATA_MARKER);
            cut_table(grid)
        }
    };
    SheetSections {
        config: find_section(grid, CONFIG_MARKER),
        data_types: find_section(grid, DATA_TYPE_MARKER),
        orders: find_section(grid, ORDER_MARKER),
        data,
        details: find_section(grid, DETAILS_MARKER),
    }
}

/// The table following the first row whose first cell is the marker.
pub fn find_section(grid: &[Vec<String>], marker: &str) -> Option<RawTable> {
    let start = grid
        .iter()
        .position(|row| row.first().map(|c| c.trim()) == Some(marker))?;
    let table = cut_table(&grid[start + 1..]);
    debug!(
        "find_section: {:?} at row {}: header {:?}, {} rows",
        marker,
        start + 1,
        table.header,
        table.rows.len()
    );
    Some(table)
}

// The first row is the header. Columns stop at the first empty header cell,
// rows at the first empty first cell or at the next marker (CSV readers drop
// blank lines).
fn cut_table(rows: &[Vec<String>]) -> RawTable {
    let header: Vec<String> = match rows.first() {
        Some(r) => r
            .iter()
            .map(|c| c.trim().to_string())
            .take_while(|c| !c.is_empty())
            .collect(),
        None => return RawTable::default(),
    };
    let width = header.len();
    let body: Vec<Vec<String>> = rows[1..]
        .iter()
        .take_while(|r| match r.first().map(|c| c.trim()) {
            Some(c) => !c.is_empty() && !MARKERS.contains(&c),
            None => false,
        })
        .map(|r| r.iter().take(width).cloned().collect())
        .collect();
    RawTable { header, rows: body }
}
