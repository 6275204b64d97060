//! Agregación de cambios pendientes del change-log para un tipo.
use uuid::Uuid;

use crate::catalog::TypeEntry;
use crate::constants::CHANGES_SUMMARY_SEPARATOR;
use crate::errors::StoreError;
use crate::model::ChangeLogEntry;
use crate::repo::ChangeLogStore;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingChanges {
    /// `bereich` del tipo; `None` si el tipo no está mapeado.
    pub category: Option<String>,
    pub entries: Vec<ChangeLogEntry>,
}

impl PendingChanges {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descripciones unidas con `"; "`, o `None` si no hay cambios.
    pub fn summary(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let parts: Vec<&str> = self.entries.iter().map(|e| e.description.as_str()).collect();
        Some(parts.join(CHANGES_SUMMARY_SEPARATOR))
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.entries.iter().map(|e| e.id).collect()
    }
}

/// Lee los cambios pendientes de la categoría del tipo. Sin categoría no
/// se consulta el store.
pub async fn aggregate_changes(store: &dyn ChangeLogStore, entry: &TypeEntry) -> Result<PendingChanges, StoreError> {
    let Some(category) = entry.bereich.as_deref() else {
        return Ok(PendingChanges::default());
    };
    let entries = store.pending_for_category(category).await?;
    Ok(PendingChanges { category: Some(category.to_string()),
                        entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewChangeLogEntry;
    use crate::repo::InMemoryChangeLogStore;
    use async_trait::async_trait;

    fn entry(bereich: Option<&str>) -> TypeEntry {
        TypeEntry { title: "T".into(),
                    description: "D".into(),
                    bereich: bereich.map(str::to_string),
                    sections: vec![] }
    }

    struct PanickingStore;

    #[async_trait]
    impl ChangeLogStore for PanickingStore {
        async fn pending_for_category(&self, _category: &str) -> Result<Vec<ChangeLogEntry>, StoreError> {
            panic!("store must not be queried for unmapped types")
        }

        async fn mark_applied(&self, _ids: &[Uuid]) -> Result<usize, StoreError> {
            panic!("store must not be written for unmapped types")
        }
    }

    #[tokio::test]
    async fn unmapped_type_does_not_touch_store() {
        let pending = aggregate_changes(&PanickingStore, &entry(None)).await.unwrap();
        assert_eq!(pending, PendingChanges::default());
        assert_eq!(pending.summary(), None);
    }

    #[tokio::test]
    async fn summary_joins_descriptions_in_store_order() {
        let store = InMemoryChangeLogStore::new();
        store.record(NewChangeLogEntry::new("database", "Added zip_code field")).await;
        store.record(NewChangeLogEntry::new("modules", "Unrelated")).await;
        store.record(NewChangeLogEntry::new("database", "Renamed owner to company_name")).await;

        let pending = aggregate_changes(&store, &entry(Some("database"))).await.unwrap();
        assert_eq!(pending.category.as_deref(), Some("database"));
        assert_eq!(pending.ids().len(), 2);
        assert_eq!(pending.summary().as_deref(), Some("Added zip_code field; Renamed owner to company_name"));
    }

    #[tokio::test]
    async fn mapped_type_without_pending_entries_has_no_summary() {
        let store = InMemoryChangeLogStore::new();
        let pending = aggregate_changes(&store, &entry(Some("permissions"))).await.unwrap();
        assert!(pending.is_empty());
        assert_eq!(pending.summary(), None);
    }
}
