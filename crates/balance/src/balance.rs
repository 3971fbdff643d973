use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockbook_core::{DomainError, DomainResult};
use stockbook_ledger::{Direction, MovementRecord};

/// Derived stock position of one product.
///
/// `net_*` may be negative: a dispatch larger than the recorded receipts is a
/// data-entry discrepancy to surface, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub product_name: String,
    pub inward_pouches: i64,
    pub inward_grams: f64,
    pub outward_pouches: i64,
    pub outward_grams: f64,
    pub net_pouches: i64,
    pub net_grams: f64,
}

impl Balance {
    /// All-zero balance for a product without movements.
    pub fn zero(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            inward_pouches: 0,
            inward_grams: 0.0,
            outward_pouches: 0,
            outward_grams: 0.0,
            net_pouches: 0,
            net_grams: 0.0,
        }
    }

    fn record(&mut self, movement: &MovementRecord) -> DomainResult<()> {
        let (pouches, grams) = match movement.direction {
            Direction::Inward => (&mut self.inward_pouches, &mut self.inward_grams),
            Direction::Outward => (&mut self.outward_pouches, &mut self.outward_grams),
        };
        *pouches = pouches
            .checked_add(movement.pouch_count)
            .ok_or_else(|| out_of_range(&self.product_name, "pouch"))?;
        *grams += movement.weight_grams;
        if !grams.is_finite() {
            return Err(out_of_range(&self.product_name, "gram"));
        }

        self.net_pouches = self
            .inward_pouches
            .checked_sub(self.outward_pouches)
            .ok_or_else(|| out_of_range(&self.product_name, "pouch"))?;
        self.net_grams = self.inward_grams - self.outward_grams;
        if !self.net_grams.is_finite() {
            return Err(out_of_range(&self.product_name, "gram"));
        }
        Ok(())
    }
}

fn out_of_range(product_name: &str, unit: &str) -> DomainError {
    DomainError::invalid_input(format!(
        "{unit} total for \"{product_name}\" is out of range"
    ))
}

/// Fold the ledger into one balance per catalog product, sorted by name.
///
/// Outer-join semantics: every product appears, with zeros if it has no
/// movements. Movements naming a product outside `products` are ignored.
/// Sums are accumulated in input order, so identical inputs give identical
/// float results. A total that no longer fits (`i64` pouches, finite grams)
/// is `InvalidInput`.
pub fn compute_balances<'a, P, M>(products: P, movements: M) -> DomainResult<Vec<Balance>>
where
    P: IntoIterator,
    P::Item: AsRef<str>,
    M: IntoIterator<Item = &'a MovementRecord>,
{
    let mut balances: BTreeMap<String, Balance> = products
        .into_iter()
        .map(|name| {
            let name = name.as_ref().to_string();
            (name.clone(), Balance::zero(name))
        })
        .collect();

    for movement in movements {
        if let Some(balance) = balances.get_mut(&movement.product_name) {
            balance.record(movement)?;
        }
    }

    Ok(balances.into_values().collect())
}

/// Fold the ledger for a single product.
///
/// The caller is responsible for checking that `product_name` is in the
/// catalog.
pub fn compute_balance<'a, M>(product_name: &str, movements: M) -> DomainResult<Balance>
where
    M: IntoIterator<Item = &'a MovementRecord>,
{
    let mut balance = Balance::zero(product_name);
    for movement in movements {
        if movement.product_name == product_name {
            balance.record(movement)?;
        }
    }
    Ok(balance)
}
