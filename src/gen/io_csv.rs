// Primitives for reading CSV files.

use std::io::Read;

use crate::gen::*;

pub fn read_csv_grid(path: &str) -> BGenResult<Vec<Vec<String>>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let grid = read_records(rdr)?;
    info!("read_csv_grid: {} rows read from {:?}", grid.len(), path);
    Ok(grid)
}

fn read_records<R: Read>(rdr: csv::Reader<R>) -> BGenResult<Vec<Vec<String>>> {
    let mut grid: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_grid: lineno: {:?} row: {:?}", lineno, line);
        grid.push(line.iter().map(|s| s.to_string()).collect());
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_str(content: &str) -> Vec<Vec<String>> {
        let rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());
        read_records(rdr).unwrap()
    }

    #[test]
    fn ragged_lines() {
        let g = read_str("Data:\nname,color\ntable,\"red, blue\"\n\nstool\n");
        assert_eq!(g[0], vec!["Data:"]);
        assert_eq!(g[2], vec!["table", "red, blue"]);
        assert_eq!(g.last().unwrap(), &vec!["stool".to_string()]);
    }

    #[test]
    fn missing_file() {
        let e = read_csv_grid("/nonexistent/model.csv");
        assert!(matches!(e.map_err(|e| *e), Err(GenError::CsvOpen { .. })));
    }
}
