// Reading the first worksheet of an Excel workbook.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::gen::*;

pub fn read_excel_grid(path: &str) -> BGenResult<Vec<Vec<String>>> {
    debug!("read_excel_grid: path: {:?}", path);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = workbook
        .worksheet_range_at(0)
        .context(EmptyExcelSnafu { path })?
        .context(OpeningExcelSnafu { path })?;
    debug!(
        "read_excel_grid: range start: {:?} size: {:?}",
        wrange.start(),
        wrange.get_size()
    );

    let grid: Vec<Vec<String>> = wrange
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    info!("read_excel_grid: {} rows read from {:?}", grid.len(), path);
    Ok(grid)
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => "".to_string(),
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        // Numbers typed in a sheet come back as floats.
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        other => {
            warn!("cell_to_string: unexpected cell {:?}", other);
            format!("{:?}", other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats() {
        assert_eq!(cell_to_string(&DataType::Float(4.0)), "4");
        assert_eq!(cell_to_string(&DataType::Float(-12.0)), "-12");
        assert_eq!(cell_to_string(&DataType::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&DataType::Int(7)), "7");
        assert_eq!(cell_to_string(&DataType::Empty), "");
        assert_eq!(
            cell_to_string(&DataType::String("red, blue".to_string())),
            "red, blue"
        );
    }

    #[test]
    fn missing_workbook() {
        let e = read_excel_grid("/nonexistent/model.xlsx");
        assert!(matches!(
            e.map_err(|e| *e),
            Err(GenError::OpeningExcel { .. })
        ));
    }
}
