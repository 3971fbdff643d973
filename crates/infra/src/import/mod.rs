//! Bulk import of a legacy inventory workbook.
//!
//! The workbook reader ([`xlsx::read_workbook`]) turns sheets into an
//! [`ImportBatch`] of loosely typed cells; the [`Importer`] coerces each row
//! into a movement and writes it through an [`InventoryStore`]. Bad rows are
//! counted and logged, storage failures abort the run.

pub mod xlsx;

use thiserror::Error;
use tracing::{info, instrument, warn};

use stockbook_catalog::ProductName;
use stockbook_core::DomainError;
use stockbook_ledger::{Direction, MovementDraft};

use crate::store::{InventoryStore, StoreError};

/// A spreadsheet cell as the importer sees it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Cell rendered as trimmed text; `None` when blank.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(n) if n.fract() == 0.0 && n.is_finite() => Some(format!("{n:.0}")),
            Cell::Number(n) => Some(n.to_string()),
        }
    }

    /// Numeric value. Blank cells are `Ok(None)`; text that does not parse
    /// is an error.
    fn to_number(&self) -> Result<Option<f64>, String> {
        match self {
            Cell::Empty => Ok(None),
            Cell::Number(n) => Ok(Some(*n)),
            Cell::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| format!("\"{trimmed}\" is not a number"))
            }
        }
    }
}

/// One data row of an inward or dispatch sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovementRow {
    /// 1-based sheet row, for diagnostics.
    pub line: u32,
    pub sequence_no: Cell,
    pub timestamp: Cell,
    pub product: Cell,
    pub pouch_batch_date: Cell,
    pub pouch_count: Cell,
    pub weight_grams: Cell,
    pub remarks: Cell,
}

impl MovementRow {
    /// Coerce the row into a draft.
    ///
    /// Blank numeric cells become 0. Anything that cannot be read as a
    /// non-negative whole pouch count or a non-negative weight is an error
    /// naming the offending column. The blank-product check is left to
    /// [`MovementDraft::validate`].
    pub fn to_draft(&self) -> Result<MovementDraft, String> {
        let pouch_count = match self.pouch_count.to_number()? {
            None => 0,
            Some(n) if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= i64::MAX as f64 => {
                n as i64
            }
            Some(n) => return Err(format!("Num_Pouches must be a whole number >= 0 (got {n})")),
        };
        let weight_grams = match self.weight_grams.to_number()? {
            None => 0.0,
            Some(n) if n.is_finite() && n >= 0.0 => n,
            Some(n) => return Err(format!("Qty_GM must be a number >= 0 (got {n})")),
        };

        let sequence_no = match &self.sequence_no {
            Cell::Number(n) if n.fract() == 0.0 && n.is_finite() => Some(*n as i64),
            other => other.to_text().and_then(|t| t.parse::<i64>().ok()),
        };

        Ok(MovementDraft {
            sequence_no,
            timestamp: self.timestamp.to_text(),
            product_name: self.product.to_text().unwrap_or_default(),
            pouch_batch_date: self.pouch_batch_date.to_text(),
            pouch_count,
            weight_grams,
            remarks: self.remarks.to_text(),
        })
    }
}

/// Everything read from a workbook, before any write.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportBatch {
    pub products: Vec<Cell>,
    pub inward: Vec<MovementRow>,
    pub outward: Vec<MovementRow>,
}

/// What to do with a movement whose product is not in the catalog.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum UnknownProductPolicy {
    /// Register the product on first reference.
    #[default]
    AutoRegister,
    /// Reject the row.
    Reject,
}

/// Outcome counts of one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportReport {
    pub products_registered: usize,
    pub products_already_present: usize,
    pub products_auto_registered: usize,
    pub inward_imported: usize,
    pub outward_imported: usize,
    pub blank_rows_skipped: usize,
    pub rows_rejected: usize,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("sheet \"{0}\" not found")]
    MissingSheet(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<StoreError> for ImportError {
    fn from(err: StoreError) -> Self {
        ImportError::Domain(err.into())
    }
}

/// Writes an [`ImportBatch`] through a store.
#[derive(Debug, Clone)]
pub struct Importer<S> {
    store: S,
    policy: UnknownProductPolicy,
}

impl<S: InventoryStore> Importer<S> {
    pub fn new(store: S, policy: UnknownProductPolicy) -> Self {
        Self { store, policy }
    }

    /// Register the master products, then append inward rows, then
    /// outward rows.
    #[instrument(skip(self, batch), fields(policy = ?self.policy), err)]
    pub async fn run(&self, batch: ImportBatch) -> Result<ImportReport, ImportError> {
        let mut report = ImportReport::default();

        for cell in &batch.products {
            let Some(name) = cell.to_text().and_then(|t| ProductName::try_trimmed(&t)) else {
                report.blank_rows_skipped += 1;
                continue;
            };
            match self.store.insert_product(&name).await {
                Ok(_) => report.products_registered += 1,
                Err(StoreError::DuplicateProduct(_)) => report.products_already_present += 1,
                Err(err) => return Err(err.into()),
            }
        }

        for (direction, rows) in [
            (Direction::Inward, &batch.inward),
            (Direction::Outward, &batch.outward),
        ] {
            for row in rows {
                self.import_row(direction, row, &mut report).await?;
            }
        }

        info!(
            products_registered = report.products_registered,
            products_already_present = report.products_already_present,
            products_auto_registered = report.products_auto_registered,
            inward_imported = report.inward_imported,
            outward_imported = report.outward_imported,
            blank_rows_skipped = report.blank_rows_skipped,
            rows_rejected = report.rows_rejected,
            "import finished"
        );
        Ok(report)
    }

    async fn import_row(
        &self,
        direction: Direction,
        row: &MovementRow,
        report: &mut ImportReport,
    ) -> Result<(), ImportError> {
        if row.product.is_blank() {
            report.blank_rows_skipped += 1;
            return Ok(());
        }

        let draft = match row.to_draft() {
            Ok(draft) => draft,
            Err(reason) => {
                warn!(%direction, line = row.line, %reason, "row rejected");
                report.rows_rejected += 1;
                return Ok(());
            }
        };

        let movement = match draft.validate(direction) {
            Ok(Some(movement)) => movement,
            Ok(None) => {
                report.blank_rows_skipped += 1;
                return Ok(());
            }
            Err(err) => {
                warn!(%direction, line = row.line, reason = %err, "row rejected");
                report.rows_rejected += 1;
                return Ok(());
            }
        };

        if self.policy == UnknownProductPolicy::AutoRegister
            && !self.store.product_exists(&movement.product_name).await?
        {
            match self.store.insert_product(&movement.product_name).await {
                Ok(_) => report.products_auto_registered += 1,
                Err(StoreError::DuplicateProduct(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }

        match self.store.append_movement(movement).await {
            Ok(_) => match direction {
                Direction::Inward => report.inward_imported += 1,
                Direction::Outward => report.outward_imported += 1,
            },
            Err(StoreError::UnknownProduct(name)) => {
                warn!(%direction, line = row.line, product = %name, "row rejected: unknown product");
                report.rows_rejected += 1;
            }
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::balances::BalanceAggregator;
    use crate::store::{InMemoryStore, SqliteStore};

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn row(line: u32, product: Cell, pouches: Cell, grams: Cell) -> MovementRow {
        MovementRow {
            line,
            product,
            pouch_count: pouches,
            weight_grams: grams,
            ..MovementRow::default()
        }
    }

    fn batch() -> ImportBatch {
        ImportBatch {
            products: vec![text("Amla"), text("  "), text("Bael"), text("Amla")],
            inward: vec![
                MovementRow {
                    line: 3,
                    sequence_no: Cell::Number(1.0),
                    timestamp: text("2025-05-30 11:30:00"),
                    product: text(" Amla "),
                    pouch_batch_date: text("2025-03-04"),
                    pouch_count: Cell::Number(10.0),
                    weight_grams: Cell::Number(1000.0),
                    remarks: text("opening stock"),
                },
                row(4, Cell::Empty, Cell::Number(5.0), Cell::Number(50.0)),
                row(5, text("Chikoo"), text("2"), Cell::Empty),
                row(6, text("Bael"), text("many"), Cell::Number(1.0)),
            ],
            outward: vec![
                row(3, text("Amla"), Cell::Number(3.0), text("300")),
                row(4, text("Amla"), Cell::Number(1.5), Cell::Number(10.0)),
                row(5, text("Bael"), Cell::Number(1.0), Cell::Number(-4.0)),
            ],
        }
    }

    #[test]
    fn blank_numeric_cells_become_zero() {
        let draft = row(1, text("Amla"), Cell::Empty, text(" ")).to_draft().unwrap();
        assert_eq!(draft.pouch_count, 0);
        assert_eq!(draft.weight_grams, 0.0);
    }

    #[test]
    fn fractional_pouches_are_rejected() {
        let err = row(1, text("Amla"), Cell::Number(2.5), Cell::Empty)
            .to_draft()
            .unwrap_err();
        assert!(err.contains("Num_Pouches"));
    }

    #[test]
    fn numeric_cells_render_as_text() {
        assert_eq!(Cell::Number(45.0).to_text().as_deref(), Some("45"));
        assert_eq!(Cell::Number(2.25).to_text().as_deref(), Some("2.25"));
        assert_eq!(text("  ").to_text(), None);
    }

    #[tokio::test]
    async fn auto_register_imports_every_valid_row() {
        let store = Arc::new(InMemoryStore::new());
        let report = Importer::new(store.clone(), UnknownProductPolicy::AutoRegister)
            .run(batch())
            .await
            .unwrap();

        assert_eq!(
            report,
            ImportReport {
                products_registered: 2,
                products_already_present: 1,
                products_auto_registered: 1,
                inward_imported: 2,
                outward_imported: 1,
                blank_rows_skipped: 2,
                rows_rejected: 3,
            }
        );

        let balances = BalanceAggregator::new(store).compute_all().await.unwrap();
        let names: Vec<_> = balances.iter().map(|b| b.product_name.as_str()).collect();
        assert_eq!(names, vec!["Amla", "Bael", "Chikoo"]);
        assert_eq!(balances[0].net_pouches, 7);
        assert_eq!(balances[0].net_grams, 700.0);
        assert_eq!(balances[2].inward_pouches, 2);
    }

    #[tokio::test]
    async fn reject_policy_counts_unknown_products() {
        let store = SqliteStore::in_memory().await.unwrap();
        let report = Importer::new(store.clone(), UnknownProductPolicy::Reject)
            .run(batch())
            .await
            .unwrap();

        assert_eq!(report.products_auto_registered, 0);
        assert_eq!(report.inward_imported, 1);
        assert_eq!(report.rows_rejected, 4);
        assert_eq!(store.list_products().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn blank_product_wins_over_bad_quantities() {
        let store = Arc::new(InMemoryStore::new());
        let batch = ImportBatch {
            products: vec![],
            inward: vec![row(3, Cell::Empty, text("ten"), Cell::Number(-1.0))],
            outward: vec![row(3, text(" "), Cell::Number(2.5), text("heavy"))],
        };

        let report = Importer::new(store, UnknownProductPolicy::default())
            .run(batch)
            .await
            .unwrap();

        assert_eq!(report.blank_rows_skipped, 2);
        assert_eq!(report.rows_rejected, 0);
    }

    #[tokio::test]
    async fn blank_rows_are_skipped_without_writes() {
        let store = Arc::new(InMemoryStore::new());
        let batch = ImportBatch {
            products: vec![Cell::Empty],
            inward: vec![row(3, text("   "), Cell::Number(1.0), Cell::Number(1.0))],
            outward: vec![row(3, Cell::Empty, Cell::Empty, Cell::Empty)],
        };

        let report = Importer::new(store.clone(), UnknownProductPolicy::default())
            .run(batch)
            .await
            .unwrap();

        assert_eq!(report.blank_rows_skipped, 3);
        let snapshot = store.snapshot().await.unwrap();
        assert!(snapshot.products.is_empty());
        assert!(snapshot.movements.is_empty());
    }
}
