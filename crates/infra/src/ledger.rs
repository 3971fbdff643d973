//! Movement ledger service.

use tracing::{debug, instrument};

use stockbook_core::{DomainResult, RecordId};
use stockbook_ledger::{Direction, MovementDraft, MovementRecord};

use crate::store::InventoryStore;

/// Appends and lists inward/outward movements.
///
/// Appends are strict: the product must already be in the catalog.
#[derive(Debug, Clone)]
pub struct Ledger<S> {
    store: S,
}

impl<S: InventoryStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate `draft` and append it in `direction`.
    ///
    /// Returns `Ok(None)` without touching storage when the product name is
    /// blank.
    #[instrument(
        skip(self, draft),
        fields(product = %draft.product_name.trim(), direction = %direction),
        err
    )]
    pub async fn append(
        &self,
        draft: MovementDraft,
        direction: Direction,
    ) -> DomainResult<Option<RecordId>> {
        let Some(movement) = draft.validate(direction)? else {
            debug!("blank product name, movement skipped");
            return Ok(None);
        };

        let record = self.store.append_movement(movement).await?;
        Ok(Some(record.id))
    }

    pub async fn record_inward(&self, draft: MovementDraft) -> DomainResult<Option<RecordId>> {
        self.append(draft, Direction::Inward).await
    }

    pub async fn record_outward(&self, draft: MovementDraft) -> DomainResult<Option<RecordId>> {
        self.append(draft, Direction::Outward).await
    }

    /// Movements of `direction`, newest first.
    #[instrument(skip(self), err)]
    pub async fn list(&self, direction: Direction) -> DomainResult<Vec<MovementRecord>> {
        Ok(self.store.list_movements(direction).await?)
    }

    pub async fn list_inward(&self) -> DomainResult<Vec<MovementRecord>> {
        self.list(Direction::Inward).await
    }

    pub async fn list_outward(&self) -> DomainResult<Vec<MovementRecord>> {
        self.list(Direction::Outward).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::store::{InMemoryStore, SqliteStore};
    use std::sync::Arc;
    use stockbook_core::DomainError;

    async fn exercise<S: InventoryStore + Clone>(store: S) {
        let catalog = Catalog::new(store.clone());
        let ledger = Ledger::new(store);
        catalog.register("Amla").await.unwrap();

        let first = ledger
            .record_inward(
                MovementDraft::new(" Amla ", 10, 1000.0).with_timestamp("2025-05-30 11:30:00"),
            )
            .await
            .unwrap()
            .unwrap();
        let second = ledger
            .record_outward(MovementDraft::new("Amla", 3, 300.0).with_remarks("  "))
            .await
            .unwrap()
            .unwrap();
        assert!(first < second);

        let inward = ledger.list_inward().await.unwrap();
        assert_eq!(inward.len(), 1);
        assert_eq!(inward[0].product_name, "Amla");
        assert_eq!(inward[0].timestamp.as_deref(), Some("2025-05-30 11:30:00"));

        let outward = ledger.list_outward().await.unwrap();
        assert_eq!(outward.len(), 1);
        assert_eq!(outward[0].remarks, None);

        let skipped = ledger
            .record_inward(MovementDraft::new("   ", 5, 50.0))
            .await
            .unwrap();
        assert_eq!(skipped, None);
        assert_eq!(ledger.list_inward().await.unwrap().len(), 1);

        let err = ledger
            .record_inward(MovementDraft::new("Ghost", 1, 1.0))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::unknown_product("Ghost"));

        let err = ledger
            .record_outward(MovementDraft::new("Amla", -1, 1.0))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_input");

        let err = ledger
            .record_outward(MovementDraft::new("Amla", 1, f64::NAN))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[tokio::test]
    async fn append_and_list_in_memory() {
        exercise(Arc::new(InMemoryStore::new())).await;
    }

    #[tokio::test]
    async fn append_and_list_sqlite() {
        exercise(SqliteStore::in_memory().await.unwrap()).await;
    }

    #[tokio::test]
    async fn identical_appends_are_not_deduplicated() {
        let store = Arc::new(InMemoryStore::new());
        Catalog::new(store.clone()).register("Amla").await.unwrap();
        let ledger = Ledger::new(store);

        let draft = MovementDraft::new("Amla", 1, 10.0).with_timestamp("2025-01-01");
        let a = ledger.record_inward(draft.clone()).await.unwrap();
        let b = ledger.record_inward(draft).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(ledger.list_inward().await.unwrap().len(), 2);
    }
}
