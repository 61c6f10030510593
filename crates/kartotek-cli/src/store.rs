//! Store resolution: pick a backend from flags, environment, and config.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use clap::Args;

use kartotek_core::traits::RecordStore;
use kartotek_core::{
    CollectionName, CollectionSchema, FilterState, Record, RecordFields, RecordId, SchemaRegistry,
    StoreUrl,
};
use kartotek_file::FileStore;
use kartotek_http::RemoteStore;

/// Environment variable naming the default store URL.
pub const STORE_ENV: &str = "KARTOTEK_STORE";

/// Store selection flags shared by record commands.
#[derive(Args, Debug)]
pub struct StoreOpts {
    /// Store URL (file:///path or https://host); defaults to
    /// $KARTOTEK_STORE, then the configured store
    #[arg(long)]
    pub store: Option<String>,

    /// Path of a JSON schema registry overriding the built-in collections
    #[arg(long)]
    pub schemas: Option<PathBuf>,

    /// Bearer token for network stores; defaults to the configured token
    #[arg(long)]
    pub token: Option<String>,
}

/// The backend a command talks to.
pub enum AnyStore {
    File(FileStore),
    Remote(RemoteStore),
}

#[async_trait]
impl RecordStore for AnyStore {
    async fn list(
        &self,
        collection: &CollectionName,
        filter: Option<&FilterState>,
    ) -> kartotek_core::Result<Vec<Record>> {
        match self {
            AnyStore::File(store) => RecordStore::list(store, collection, filter).await,
            AnyStore::Remote(store) => RecordStore::list(store, collection, filter).await,
        }
    }

    async fn get(
        &self,
        collection: &CollectionName,
        id: &RecordId,
    ) -> kartotek_core::Result<Option<Record>> {
        match self {
            AnyStore::File(store) => RecordStore::get(store, collection, id).await,
            AnyStore::Remote(store) => RecordStore::get(store, collection, id).await,
        }
    }

    async fn create(
        &self,
        collection: &CollectionName,
        fields: RecordFields,
    ) -> kartotek_core::Result<Record> {
        match self {
            AnyStore::File(store) => RecordStore::create(store, collection, fields).await,
            AnyStore::Remote(store) => RecordStore::create(store, collection, fields).await,
        }
    }

    async fn update(
        &self,
        collection: &CollectionName,
        id: &RecordId,
        partial: RecordFields,
    ) -> kartotek_core::Result<Record> {
        match self {
            AnyStore::File(store) => RecordStore::update(store, collection, id, partial).await,
            AnyStore::Remote(store) => RecordStore::update(store, collection, id, partial).await,
        }
    }

    async fn delete(
        &self,
        collection: &CollectionName,
        id: &RecordId,
    ) -> kartotek_core::Result<()> {
        match self {
            AnyStore::File(store) => RecordStore::delete(store, collection, id).await,
            AnyStore::Remote(store) => RecordStore::delete(store, collection, id).await,
        }
    }
}

/// The collections the console ships with.
pub fn default_registry() -> SchemaRegistry {
    let name = |s: &str| CollectionName::new(s).expect("valid builtin collection name");

    SchemaRegistry::new()
        .register(
            CollectionSchema::new(name("companies"))
                .require("name")
                .search_over(["name", "email", "phone"])
                .status_in("status")
                .category_in("industry")
                .date_in("createdDate"),
        )
        .register(
            CollectionSchema::new(name("contacts"))
                .require("firstName")
                .require("lastName")
                .search_over(["firstName", "lastName", "email", "phone"])
                .status_in("status")
                .date_in("createdDate"),
        )
        .register(
            CollectionSchema::new(name("invoices"))
                .require("number")
                .require("customer")
                .search_over(["number", "customer"])
                .status_in("status")
                .date_in("issuedDate"),
        )
        .register(
            CollectionSchema::new(name("shipments"))
                .require("reference")
                .search_over(["reference", "carrier", "origin", "destination"])
                .status_in("status")
                .category_in("mode")
                .date_in("departureDate"),
        )
}

/// Load the schema registry: explicit path, configured path, or built-in.
pub fn resolve_registry(opts: &StoreOpts) -> Result<SchemaRegistry> {
    let config = crate::config::load()?;
    let path = opts.schemas.as_ref().or(config.schemas.as_ref());

    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read schema registry {}", path.display()))?;
            serde_json::from_str(&json).context("Invalid schema registry")
        }
        None => Ok(default_registry()),
    }
}

/// Resolve the store URL and open the matching backend.
pub fn resolve_store(opts: &StoreOpts) -> Result<AnyStore> {
    let config = crate::config::load()?;

    let url = opts
        .store
        .clone()
        .or_else(|| std::env::var(STORE_ENV).ok())
        .or_else(|| config.store.clone());

    let Some(url) = url else {
        bail!(
            "No store configured. Pass --store, set {}, or run 'kartotek config set --store <url>'.",
            STORE_ENV
        );
    };

    let url = StoreUrl::new(&url).context("Invalid store URL")?;
    tracing::debug!(store = %url, "Resolved store");

    if url.is_local() {
        let path = url
            .to_file_path()
            .context("Failed to convert file:// URL to path")?;
        let registry = resolve_registry(opts)?;
        Ok(AnyStore::File(FileStore::new(path, registry)))
    } else {
        let token = opts.token.clone().or(config.token);
        let store = match token {
            Some(token) => RemoteStore::with_token(url, token),
            None => RemoteStore::new(url),
        };
        Ok(AnyStore::Remote(store))
    }
}
