//! `RecordStore` implementation for the file store.

use async_trait::async_trait;

use kartotek_core::traits::RecordStore;
use kartotek_core::{CollectionName, FilterState, Record, RecordFields, RecordId, Result};

use crate::store::FileStore;

#[async_trait]
impl RecordStore for FileStore {
    async fn list(
        &self,
        collection: &CollectionName,
        filter: Option<&FilterState>,
    ) -> Result<Vec<Record>> {
        FileStore::list(self, collection, filter)
    }

    async fn get(&self, collection: &CollectionName, id: &RecordId) -> Result<Option<Record>> {
        FileStore::get(self, collection, id)
    }

    async fn create(&self, collection: &CollectionName, fields: RecordFields) -> Result<Record> {
        FileStore::create(self, collection, fields)
    }

    async fn update(
        &self,
        collection: &CollectionName,
        id: &RecordId,
        partial: RecordFields,
    ) -> Result<Record> {
        FileStore::update(self, collection, id, partial)
    }

    async fn delete(&self, collection: &CollectionName, id: &RecordId) -> Result<()> {
        FileStore::delete(self, collection, id)
    }
}

#[cfg(test)]
mod tests {
    use kartotek_core::{CollectionSchema, ListScreen, Phase, SchemaRegistry};
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new().register(
            CollectionSchema::new(CollectionName::new("invoices").unwrap())
                .require("number")
                .search_over(["number", "customer"])
                .status_in("status"),
        )
    }

    #[tokio::test]
    async fn list_screen_drives_file_store() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path(), registry());
        let schema = registry()
            .get(&CollectionName::new("invoices").unwrap())
            .unwrap()
            .clone();

        let mut screen = ListScreen::new(store.clone(), schema);

        let fields =
            RecordFields::new(json!({ "number": "INV-001", "status": "open" })).unwrap();
        screen.create(fields).await.unwrap();

        assert_eq!(screen.phase(), Phase::Loaded);
        assert_eq!(screen.items().len(), 1);
        assert_eq!(screen.items()[0].field_str("number"), Some("INV-001"));

        let id = screen.items()[0].id.clone();
        screen.delete(&id).await.unwrap();
        assert!(screen.items().is_empty());
    }
}
