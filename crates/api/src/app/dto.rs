//! Wire shapes. Field names follow the legacy inventory front-end
//! (`FD_NAME`, `Num_Pouches`, ...), so existing clients keep working.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use stockbook_balance::Balance;
use stockbook_catalog::Product;
use stockbook_core::{DomainError, DomainResult, RecordId};
use stockbook_ledger::{MovementDraft, MovementRecord};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    #[serde(rename = "FD_NAME", default)]
    pub fd_name: Option<String>,
}

/// Body of `POST /inward` and `POST /dispatch`.
///
/// Numeric fields accept JSON numbers or numeric strings, since HTML forms
/// submit everything as text. Missing or empty quantities count as 0.
#[derive(Debug, Default, Deserialize)]
pub struct MovementRequest {
    #[serde(rename = "SR_No", default)]
    pub sr_no: Option<Value>,
    #[serde(rename = "DateTime", default)]
    pub date_time: Option<String>,
    #[serde(rename = "FD_NAME", default)]
    pub fd_name: Option<String>,
    #[serde(rename = "Pouch_Date", default)]
    pub pouch_date: Option<String>,
    #[serde(rename = "Num_Pouches", default)]
    pub num_pouches: Option<Value>,
    #[serde(rename = "Qty_GM", default)]
    pub qty_gm: Option<Value>,
    #[serde(rename = "Remarks", default)]
    pub remarks: Option<String>,
}

impl MovementRequest {
    pub fn into_draft(self) -> DomainResult<MovementDraft> {
        let pouch_count = match number("Num_Pouches", self.num_pouches.as_ref())? {
            None => 0,
            Some(n) if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 => n as i64,
            Some(n) => {
                return Err(DomainError::invalid_input(format!(
                    "Num_Pouches must be a whole number (got {n})"
                )));
            }
        };
        let weight_grams = number("Qty_GM", self.qty_gm.as_ref())?.unwrap_or(0.0);

        let sequence_no = match self.sr_no.as_ref() {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        Ok(MovementDraft {
            sequence_no,
            timestamp: self.date_time,
            product_name: self.fd_name.unwrap_or_default(),
            pouch_batch_date: self.pouch_date,
            pouch_count,
            weight_grams,
            remarks: self.remarks,
        })
    }
}

fn number(field: &str, value: Option<&Value>) -> DomainResult<Option<f64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| {
            DomainError::invalid_input(format!("{field} must be a number (got \"{s}\")"))
        }),
        Some(other) => Err(DomainError::invalid_input(format!(
            "{field} must be a number (got {other})"
        ))),
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ProductCreated {
    pub id: i64,
    #[serde(rename = "FD_NAME")]
    pub fd_name: String,
}

impl From<Product> for ProductCreated {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.get(),
            fd_name: product.name.into_inner(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovementAppended {
    pub success: bool,
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
}

impl From<Option<RecordId>> for MovementAppended {
    fn from(id: Option<RecordId>) -> Self {
        Self {
            success: true,
            id: id.map(RecordId::get),
            skipped: id.is_none(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovementView {
    pub id: i64,
    #[serde(rename = "SR_No")]
    pub sr_no: Option<i64>,
    #[serde(rename = "DateTime")]
    pub date_time: Option<String>,
    #[serde(rename = "FD_NAME")]
    pub fd_name: String,
    #[serde(rename = "Pouch_Date")]
    pub pouch_date: Option<String>,
    #[serde(rename = "Num_Pouches")]
    pub num_pouches: i64,
    #[serde(rename = "Qty_GM")]
    pub qty_gm: f64,
    #[serde(rename = "Remarks")]
    pub remarks: Option<String>,
}

impl From<MovementRecord> for MovementView {
    fn from(record: MovementRecord) -> Self {
        Self {
            id: record.id.get(),
            sr_no: record.sequence_no,
            date_time: record.timestamp,
            fd_name: record.product_name,
            pouch_date: record.pouch_batch_date,
            num_pouches: record.pouch_count,
            qty_gm: record.weight_grams,
            remarks: record.remarks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BalanceView {
    #[serde(rename = "FD_NAME")]
    pub fd_name: String,
    #[serde(rename = "Inward_Pouches")]
    pub inward_pouches: i64,
    #[serde(rename = "Inward_GM")]
    pub inward_gm: f64,
    #[serde(rename = "Used_Pouches")]
    pub used_pouches: i64,
    #[serde(rename = "Used_GM")]
    pub used_gm: f64,
    #[serde(rename = "Bal_Pouches")]
    pub bal_pouches: i64,
    #[serde(rename = "Bal_GM")]
    pub bal_gm: f64,
}

impl From<Balance> for BalanceView {
    fn from(b: Balance) -> Self {
        Self {
            fd_name: b.product_name,
            inward_pouches: b.inward_pouches,
            inward_gm: b.inward_grams,
            used_pouches: b.outward_pouches,
            used_gm: b.outward_grams,
            bal_pouches: b.net_pouches,
            bal_gm: b.net_grams,
        }
    }
}
