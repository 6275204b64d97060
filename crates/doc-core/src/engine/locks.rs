//! Exclusión mutua por tipo de documentación dentro del proceso.
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::model::DocumentationType;

#[derive(Clone, Default)]
pub struct TypeLocks {
    inner: Arc<DashMap<DocumentationType, Arc<Mutex<()>>>>,
}

impl TypeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Espera hasta obtener el lock del tipo. Se libera al soltar el guard.
    pub async fn acquire(&self, doc_type: DocumentationType) -> OwnedMutexGuard<()> {
        // el Arc se clona antes de esperar para no retener el shard del DashMap
        let lock = self.inner.entry(doc_type).or_default().clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_type_is_serialized_other_types_are_not() {
        let locks = TypeLocks::new();
        let held = locks.acquire(DocumentationType::MasterData).await;

        let other = tokio::time::timeout(Duration::from_millis(50), locks.acquire(DocumentationType::BusinessLogic)).await;
        assert!(other.is_ok());

        let same = tokio::time::timeout(Duration::from_millis(50), locks.acquire(DocumentationType::MasterData)).await;
        assert!(same.is_err());

        drop(held);
        let same = tokio::time::timeout(Duration::from_millis(50), locks.acquire(DocumentationType::MasterData)).await;
        assert!(same.is_ok());
    }
}
