//! Workbook reader for the legacy inventory spreadsheet.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDateTime, Timelike};
use tracing::{debug, instrument};

use super::{Cell, ImportBatch, ImportError, MovementRow};

pub const MASTER_SHEET: &str = "FD NAME MASTER";
pub const INWARD_SHEET: &str = "Inward Qty";
pub const OUTWARD_SHEET: &str = "Despatch Qty";

/// Leading rows of each sheet that hold titles/headers, not data.
const MASTER_HEADER_ROWS: u32 = 1;
const MOVEMENT_HEADER_ROWS: u32 = 2;

const MOVEMENT_COLUMNS: u32 = 7;

/// Read the three sheets of the workbook at `path`.
///
/// Every sheet must be present; nothing is returned otherwise. Fully blank
/// rows are dropped.
#[instrument(skip(path), fields(path = %path.display()), err)]
pub fn read_workbook(path: &Path) -> Result<ImportBatch, ImportError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_names = workbook.sheet_names().to_vec();
    for required in [MASTER_SHEET, INWARD_SHEET, OUTWARD_SHEET] {
        if !sheet_names.iter().any(|name| name == required) {
            return Err(ImportError::MissingSheet(required.to_string()));
        }
    }

    let master = workbook.worksheet_range(MASTER_SHEET)?;
    let inward = workbook.worksheet_range(INWARD_SHEET)?;
    let outward = workbook.worksheet_range(OUTWARD_SHEET)?;

    let batch = ImportBatch {
        products: data_rows(&master, MASTER_HEADER_ROWS, 1)
            .map(|(_, mut cells)| cells.swap_remove(0))
            .collect(),
        inward: movement_rows(&inward),
        outward: movement_rows(&outward),
    };

    debug!(
        products = batch.products.len(),
        inward = batch.inward.len(),
        outward = batch.outward.len(),
        "workbook read"
    );
    Ok(batch)
}

fn movement_rows(range: &Range<Data>) -> Vec<MovementRow> {
    data_rows(range, MOVEMENT_HEADER_ROWS, MOVEMENT_COLUMNS)
        .map(|(line, cells)| {
            let mut cells = cells.into_iter();
            let mut next = || cells.next().unwrap_or_default();
            MovementRow {
                line,
                sequence_no: next(),
                timestamp: next(),
                product: next(),
                pouch_batch_date: next(),
                pouch_count: next(),
                weight_grams: next(),
                remarks: next(),
            }
        })
        .collect()
}

/// Non-blank rows below the header, as `(1-based line, first `columns` cells)`.
///
/// Positions are absolute sheet coordinates, so a range that does not start
/// at A1 still lines up with the fixed column layout.
fn data_rows(
    range: &Range<Data>,
    header_rows: u32,
    columns: u32,
) -> impl Iterator<Item = (u32, Vec<Cell>)> + '_ {
    let (first_row, last_row) = match (range.start(), range.end()) {
        (Some((start, _)), Some((end, _))) => (start.max(header_rows), end),
        // Empty range: yields nothing.
        _ => (1, 0),
    };

    (first_row..=last_row).filter_map(move |row| {
        let cells: Vec<Cell> = (0..columns)
            .map(|col| range.get_value((row, col)).map(cell_from_data).unwrap_or_default())
            .collect();
        if cells.iter().all(Cell::is_blank) {
            None
        } else {
            Some((row + 1, cells))
        }
    })
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Cell::Text(e.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => Cell::Text(format_datetime(dt)),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// `YYYY-MM-DD HH:MM:SS`, or `YYYY-MM-DD` when the time is exactly midnight.
pub fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.time().num_seconds_from_midnight() == 0 && dt.time().nanosecond() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn datetime(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 30)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_read_nonexistent_workbook() {
        let result = read_workbook(Path::new("/nonexistent/inventory_data.xlsx"));
        assert!(matches!(result, Err(ImportError::Workbook(_))));
    }

    #[test]
    fn midnight_dates_drop_the_time() {
        assert_eq!(format_datetime(datetime(0, 0, 0)), "2025-05-30");
        assert_eq!(format_datetime(datetime(11, 30, 0)), "2025-05-30 11:30:00");
    }

    #[test]
    fn cells_convert_by_type() {
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(cell_from_data(&Data::Int(12)), Cell::Number(12.0));
        assert_eq!(cell_from_data(&Data::Float(2.5)), Cell::Number(2.5));
        assert_eq!(
            cell_from_data(&Data::String("Amla".into())),
            Cell::Text("Amla".into())
        );
        assert_eq!(cell_from_data(&Data::Bool(true)), Cell::Text("TRUE".into()));
    }

    #[test]
    fn header_rows_and_blank_rows_are_dropped() {
        let mut range: Range<Data> = Range::new((0, 0), (5, 6));
        range.set_value((0, 0), Data::String("Inward Register".into()));
        range.set_value((1, 2), Data::String("FD_NAME".into()));
        range.set_value((2, 0), Data::Float(1.0));
        range.set_value((2, 2), Data::String("Amla".into()));
        range.set_value((2, 4), Data::Float(10.0));
        range.set_value((2, 5), Data::Float(1000.0));
        // Row 3 left blank.
        range.set_value((4, 2), Data::String("Bael".into()));
        range.set_value((5, 6), Data::String("late entry".into()));

        let rows = movement_rows(&range);
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].line, 3);
        assert_eq!(rows[0].sequence_no, Cell::Number(1.0));
        assert_eq!(rows[0].product, Cell::Text("Amla".into()));
        assert_eq!(rows[0].pouch_count, Cell::Number(10.0));
        assert_eq!(rows[0].weight_grams, Cell::Number(1000.0));

        assert_eq!(rows[1].line, 5);
        assert_eq!(rows[1].product, Cell::Text("Bael".into()));

        assert_eq!(rows[2].line, 6);
        assert_eq!(rows[2].product, Cell::Empty);
        assert_eq!(rows[2].remarks, Cell::Text("late entry".into()));
    }

    #[test]
    fn master_rows_skip_the_header() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 0));
        range.set_value((0, 0), Data::String("FD NAME".into()));
        range.set_value((1, 0), Data::String("Amla".into()));
        range.set_value((2, 0), Data::String("Bael".into()));

        let names: Vec<_> = data_rows(&range, MASTER_HEADER_ROWS, 1)
            .map(|(_, mut cells)| cells.swap_remove(0))
            .collect();
        assert_eq!(
            names,
            vec![Cell::Text("Amla".into()), Cell::Text("Bael".into())]
        );
    }

    #[test]
    fn empty_range_has_no_rows() {
        let range: Range<Data> = Range::empty();
        assert!(movement_rows(&range).is_empty());
    }
}
