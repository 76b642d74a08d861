use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
#[cfg(test)]
use chrono::DateTime;
use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use super::{
    helpers::{encode_document, parse_document},
    Database,
};
use crate::documents::{merge_document, DocumentStore, SetOptions};

impl Database {
    pub async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let collection = collection.to_string();
        let id = id.to_string();
        self.execute(move |conn| {
            let raw: Option<String> = conn
                .query_row(
                    "SELECT data FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection, id],
                    |row| row.get(0),
                )
                .optional()
                .with_context(|| format!("failed to read document {collection}/{id}"))?;

            raw.map(|raw| parse_document(&raw, &collection, &id))
                .transpose()
        })
        .await
    }

    /// Writes a document. With `merge`, the read-modify-write happens inside one
    /// transaction on the DB thread, so concurrent merges never lose fields.
    pub async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        options: SetOptions,
    ) -> Result<()> {
        let collection = collection.to_string();
        let id = id.to_string();
        self.execute(move |conn| {
            let now = Utc::now().to_rfc3339();
            let tx = conn.transaction()?;

            let existing: Option<String> = tx
                .query_row(
                    "SELECT data FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection, id],
                    |row| row.get(0),
                )
                .optional()?;

            let next = match (existing, options.merge) {
                (Some(raw), true) => {
                    let mut current = parse_document(&raw, &collection, &id)?;
                    merge_document(&mut current, data);
                    current
                }
                _ => data,
            };

            tx.execute(
                "INSERT INTO documents (collection, id, data, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(collection, id) DO UPDATE SET
                     data = excluded.data,
                     updated_at = excluded.updated_at",
                params![collection, id, encode_document(&next)?, now],
            )
            .with_context(|| format!("failed to write document {collection}/{id}"))?;

            tx.commit()?;
            Ok(())
        })
        .await
    }

    #[cfg(test)]
    async fn document_updated_at(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DateTime<Utc>>> {
        let collection = collection.to_string();
        let id = id.to_string();
        self.execute(move |conn| {
            let raw: Option<String> = conn
                .query_row(
                    "SELECT updated_at FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection, id],
                    |row| row.get(0),
                )
                .optional()?;

            raw.map(|raw| super::helpers::parse_datetime(&raw, "updated_at"))
                .transpose()
        })
        .await
    }

    #[cfg(test)]
    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        let collection = collection.to_string();
        let id = id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl DocumentStore for Database {
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        Database::get_document(self, collection, id).await
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        options: SetOptions,
    ) -> Result<()> {
        Database::set_document(self, collection, id, data, options).await
    }
}
