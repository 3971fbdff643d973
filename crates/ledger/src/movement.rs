use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockbook_catalog::ProductName;
use stockbook_core::{DomainError, DomainResult, RecordId};

/// Whether a movement brings stock in or takes it out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Receipt of stock.
    Inward,
    /// Dispatch of stock.
    Outward,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Inward, Direction::Outward];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Inward => "inward",
            Direction::Outward => "outward",
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inward" => Ok(Direction::Inward),
            "outward" => Ok(Direction::Outward),
            other => Err(DomainError::invalid_input(format!(
                "direction must be one of: inward, outward (got \"{other}\")"
            ))),
        }
    }
}

/// Movement fields as submitted by a caller (API body, form, import row).
///
/// Nothing here is validated yet; see [`MovementDraft::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementDraft {
    pub sequence_no: Option<i64>,
    pub timestamp: Option<String>,
    pub product_name: String,
    pub pouch_batch_date: Option<String>,
    pub pouch_count: i64,
    pub weight_grams: f64,
    pub remarks: Option<String>,
}

impl MovementDraft {
    pub fn new(product_name: impl Into<String>, pouch_count: i64, weight_grams: f64) -> Self {
        Self {
            product_name: product_name.into(),
            pouch_count,
            weight_grams,
            ..Self::default()
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    /// Validate the draft for appending in `direction`.
    ///
    /// Returns `Ok(None)` when the product name is blank: such rows are
    /// dropped, not rejected.
    pub fn validate(self, direction: Direction) -> DomainResult<Option<NewMovement>> {
        let Some(product_name) = ProductName::try_trimmed(&self.product_name) else {
            return Ok(None);
        };

        if self.pouch_count < 0 {
            return Err(DomainError::invalid_input(format!(
                "pouch_count cannot be negative (got {})",
                self.pouch_count
            )));
        }
        if !self.weight_grams.is_finite() {
            return Err(DomainError::invalid_input("weight_grams must be a finite number"));
        }
        if self.weight_grams < 0.0 {
            return Err(DomainError::invalid_input(format!(
                "weight_grams cannot be negative (got {})",
                self.weight_grams
            )));
        }

        Ok(Some(NewMovement {
            direction,
            sequence_no: self.sequence_no,
            timestamp: non_blank(self.timestamp),
            product_name,
            pouch_batch_date: non_blank(self.pouch_batch_date),
            pouch_count: self.pouch_count,
            // Normalise -0.0 so it never shows up in sums or output.
            weight_grams: self.weight_grams + 0.0,
            remarks: non_blank(self.remarks),
        }))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// A validated movement waiting for the store to assign its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMovement {
    pub direction: Direction,
    pub sequence_no: Option<i64>,
    pub timestamp: Option<String>,
    pub product_name: ProductName,
    pub pouch_batch_date: Option<String>,
    pub pouch_count: i64,
    pub weight_grams: f64,
    pub remarks: Option<String>,
}

impl NewMovement {
    /// Attach the store-assigned id.
    pub fn into_record(self, id: RecordId) -> MovementRecord {
        MovementRecord {
            id,
            direction: self.direction,
            sequence_no: self.sequence_no,
            timestamp: self.timestamp,
            product_name: self.product_name.into_inner(),
            pouch_batch_date: self.pouch_batch_date,
            pouch_count: self.pouch_count,
            weight_grams: self.weight_grams,
            remarks: self.remarks,
        }
    }
}

/// One appended ledger record. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub id: RecordId,
    pub direction: Direction,
    pub sequence_no: Option<i64>,
    pub timestamp: Option<String>,
    pub product_name: String,
    pub pouch_batch_date: Option<String>,
    pub pouch_count: i64,
    pub weight_grams: f64,
    pub remarks: Option<String>,
}
