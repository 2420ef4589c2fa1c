//! Read-only datastore over the code list graph.
//!
//! Every operation builds its statement, drives the executor with the mapper
//! for that query shape, and translates generic executor outcomes into the
//! not-found kind of the entity being fetched.

pub mod errors;
pub mod mapper;
pub mod queries;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ServerConfig;
use crate::graph::QueryExecutor;
use crate::models::{Code, CodeList, CodeLists, Codes, Edition, Editions, LinkBuilder, Page};

pub use errors::StoreError;
use errors::no_results_as;
use mapper::{
    CodeListMapper, CodeListsMapper, CodeMapper, CodeScope, CodesMapper, CountMapper,
    EditionMapper, EditionsMapper,
};

/// Read operations consumed by the HTTP layer
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn get_code_lists(&self) -> Result<CodeLists, StoreError>;

    async fn get_code_list(&self, code_list_id: &str) -> Result<CodeList, StoreError>;

    async fn get_editions(&self, code_list_id: &str) -> Result<Editions, StoreError>;

    async fn get_edition(&self, code_list_id: &str, edition_id: &str)
        -> Result<Edition, StoreError>;

    async fn get_codes(&self, code_list_id: &str, edition_id: &str) -> Result<Codes, StoreError>;

    async fn get_code(
        &self,
        code_list_id: &str,
        edition_id: &str,
        code: &str,
    ) -> Result<Code, StoreError>;

    /// True when exactly one edition node matches; more than one is an error
    async fn edition_exists(&self, code_list_id: &str, edition_id: &str)
        -> Result<bool, StoreError>;
}

/// [`DataStore`] backed by a neo4j [`QueryExecutor`]
pub struct NeoDataStore {
    db: Arc<dyn QueryExecutor>,
    code_list_label: String,
    prefix: String,
    links: LinkBuilder,
}

impl NeoDataStore {
    pub fn new(db: Arc<dyn QueryExecutor>, config: &ServerConfig) -> Self {
        NeoDataStore {
            db,
            prefix: queries::label_prefix(&config.code_list_label),
            code_list_label: config.code_list_label.clone(),
            links: LinkBuilder::new(config.code_list_api_url.as_str()),
        }
    }

    /// Fails with `EditionNotFound` unless the edition exists
    async fn require_edition(&self, code_list_id: &str, edition_id: &str) -> Result<(), StoreError> {
        if self.edition_exists(code_list_id, edition_id).await? {
            Ok(())
        } else {
            Err(StoreError::EditionNotFound)
        }
    }
}

#[async_trait]
impl DataStore for NeoDataStore {
    async fn get_code_lists(&self) -> Result<CodeLists, StoreError> {
        log::debug!("get_code_lists: label={}", self.code_list_label);

        let statement = queries::code_lists(&self.code_list_label);
        let mut mapper = CodeListsMapper::new(&self.links, &self.prefix);
        self.db.query_for_results(&statement, &mut mapper).await?;

        let mut items = mapper.items;
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items.dedup_by(|a, b| a.id == b.id);
        Ok(Page::complete(items))
    }

    async fn get_code_list(&self, code_list_id: &str) -> Result<CodeList, StoreError> {
        log::debug!("get_code_list: code_list_id={}", code_list_id);

        let statement = queries::code_list(&self.code_list_label, code_list_id);
        let mut mapper = CodeListMapper::new(&self.links, &self.prefix, code_list_id);
        self.db
            .query_for_result(&statement, &mut mapper)
            .await
            .map_err(no_results_as(StoreError::CodeListNotFound))?;

        match mapper.code_list {
            Some(code_list) if code_list.id.is_empty() => {
                Err(StoreError::MissingIdentifier { entity: "code list" })
            }
            Some(code_list) if code_list.id != code_list_id => Err(StoreError::IdentifierMismatch {
                requested: code_list_id.to_string(),
                found: code_list.id,
            }),
            Some(code_list) => Ok(code_list),
            None => Err(StoreError::MissingIdentifier { entity: "code list" }),
        }
    }

    async fn get_editions(&self, code_list_id: &str) -> Result<Editions, StoreError> {
        log::debug!("get_editions: code_list_id={}", code_list_id);

        let statement = queries::editions(&self.code_list_label, code_list_id);
        let mut mapper = EditionsMapper::new(&self.links, code_list_id);
        let rows = self
            .db
            .query_for_results(&statement, &mut mapper)
            .await
            .map_err(no_results_as(StoreError::CodeListNotFound))?;

        if rows == 0 {
            return Err(StoreError::CodeListNotFound);
        }
        if mapper.items.iter().any(|edition| edition.id.is_empty()) {
            return Err(StoreError::MissingIdentifier { entity: "edition" });
        }
        Ok(Page::complete(mapper.items))
    }

    async fn get_edition(
        &self,
        code_list_id: &str,
        edition_id: &str,
    ) -> Result<Edition, StoreError> {
        log::debug!(
            "get_edition: code_list_id={} edition_id={}",
            code_list_id,
            edition_id
        );

        let statement = queries::edition(&self.code_list_label, code_list_id, edition_id);
        let mut mapper = EditionMapper::new(&self.links, code_list_id);
        self.db
            .query_for_result(&statement, &mut mapper)
            .await
            .map_err(no_results_as(StoreError::EditionNotFound))?;

        match mapper.edition {
            Some(edition) if !edition.id.is_empty() => Ok(edition),
            _ => Err(StoreError::MissingIdentifier { entity: "edition" }),
        }
    }

    async fn get_codes(&self, code_list_id: &str, edition_id: &str) -> Result<Codes, StoreError> {
        log::debug!(
            "get_codes: code_list_id={} edition_id={}",
            code_list_id,
            edition_id
        );

        self.require_edition(code_list_id, edition_id).await?;

        let statement = queries::codes(&self.code_list_label, code_list_id, edition_id);
        let mut mapper = CodesMapper::new(CodeScope {
            links: &self.links,
            code_list_id,
            edition_id,
        });
        let rows = self
            .db
            .query_for_results(&statement, &mut mapper)
            .await
            .map_err(no_results_as(StoreError::CodesNotFound))?;

        if rows == 0 {
            return Err(StoreError::CodesNotFound);
        }
        if mapper.items.iter().any(|code| code.code.is_empty()) {
            return Err(StoreError::MissingIdentifier { entity: "code" });
        }
        Ok(Page::complete(mapper.items))
    }

    async fn get_code(
        &self,
        code_list_id: &str,
        edition_id: &str,
        code: &str,
    ) -> Result<Code, StoreError> {
        log::debug!(
            "get_code: code_list_id={} edition_id={} code={}",
            code_list_id,
            edition_id,
            code
        );

        self.require_edition(code_list_id, edition_id).await?;

        let statement = queries::code(&self.code_list_label, code_list_id, edition_id, code);
        let mut mapper = CodeMapper::new(CodeScope {
            links: &self.links,
            code_list_id,
            edition_id,
        });
        self.db
            .query_for_result(&statement, &mut mapper)
            .await
            .map_err(no_results_as(StoreError::CodeNotFound))?;

        match mapper.code {
            Some(found) if !found.code.is_empty() => Ok(found),
            _ => Err(StoreError::MissingIdentifier { entity: "code" }),
        }
    }

    async fn edition_exists(
        &self,
        code_list_id: &str,
        edition_id: &str,
    ) -> Result<bool, StoreError> {
        let statement = queries::count_editions(&self.code_list_label, code_list_id, edition_id);
        let mut mapper = CountMapper::default();
        self.db.query_for_result(&statement, &mut mapper).await?;

        match mapper.count {
            0 => Ok(false),
            1 => Ok(true),
            count => Err(StoreError::MultipleEditionsFound { count }),
        }
    }
}
