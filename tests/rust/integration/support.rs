//! In-memory datastore and request helpers shared by the API tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use codelist_graph::config::ServerConfig;
use codelist_graph::graph::{GraphError, QueryExecutor, ResultMapper, Row, Statement, Value as GraphValue};
use codelist_graph::models::{
    Code, CodeList, CodeLists, Codes, Edition, Editions, LinkBuilder, Page,
};
use codelist_graph::server::health::HealthChecker;
use codelist_graph::server::{AppState, build_router};
use codelist_graph::store::{DataStore, StoreError};

pub const BASE_URL: &str = "http://localhost:22400";

/// Two code lists; `abc` has editions 2016 and 2017, only 2016 carries codes.
/// Code list `broken` reports duplicate edition nodes.
#[derive(Default)]
pub struct MemoryStore {
    pub calls: AtomicUsize,
}

impl MemoryStore {
    fn links() -> LinkBuilder {
        LinkBuilder::new(BASE_URL)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn get_code_lists(&self) -> Result<CodeLists, StoreError> {
        self.record();
        let links = Self::links();
        Ok(Page::complete(vec![
            links.code_list("abc"),
            links.code_list("def"),
        ]))
    }

    async fn get_code_list(&self, code_list_id: &str) -> Result<CodeList, StoreError> {
        self.record();
        match code_list_id {
            "abc" | "def" => Ok(Self::links().code_list(code_list_id)),
            _ => Err(StoreError::CodeListNotFound),
        }
    }

    async fn get_editions(&self, code_list_id: &str) -> Result<Editions, StoreError> {
        self.record();
        if code_list_id != "abc" {
            return Err(StoreError::CodeListNotFound);
        }
        let links = Self::links();
        Ok(Page::complete(vec![
            links.edition("abc", "2016", "Twenty sixteen"),
            links.edition("abc", "2017", "Twenty seventeen"),
        ]))
    }

    async fn get_edition(
        &self,
        code_list_id: &str,
        edition_id: &str,
    ) -> Result<Edition, StoreError> {
        self.record();
        match (code_list_id, edition_id) {
            ("abc", "2016") => Ok(Self::links().edition("abc", "2016", "Twenty sixteen")),
            _ => Err(StoreError::EditionNotFound),
        }
    }

    async fn get_codes(&self, code_list_id: &str, edition_id: &str) -> Result<Codes, StoreError> {
        self.record();
        if code_list_id == "broken" {
            return Err(StoreError::MultipleEditionsFound { count: 2 });
        }
        if !self.edition_exists(code_list_id, edition_id).await? {
            return Err(StoreError::EditionNotFound);
        }
        if edition_id == "2017" {
            return Err(StoreError::CodesNotFound);
        }
        let links = Self::links();
        Ok(Page::complete(vec![
            links.code("abc", "2016", "1", "c1", "First"),
            links.code("abc", "2016", "2", "c2", "Second"),
            links.code("abc", "2016", "3", "c3", "Third"),
        ]))
    }

    async fn get_code(
        &self,
        code_list_id: &str,
        edition_id: &str,
        code: &str,
    ) -> Result<Code, StoreError> {
        self.record();
        if code_list_id == "broken" {
            return Err(StoreError::Graph(GraphError::NonUniqueResult));
        }
        match (code_list_id, edition_id, code) {
            ("abc", "2016", "c1") => Ok(Self::links().code("abc", "2016", "1", "c1", "First")),
            ("abc", "2016", _) => Err(StoreError::CodeNotFound),
            _ => Err(StoreError::EditionNotFound),
        }
    }

    async fn edition_exists(
        &self,
        code_list_id: &str,
        edition_id: &str,
    ) -> Result<bool, StoreError> {
        Ok(code_list_id == "abc" && (edition_id == "2016" || edition_id == "2017"))
    }
}

/// Graph that answers the health ping, or fails it when down
pub struct PingGraph {
    pub up: bool,
}

#[async_trait]
impl QueryExecutor for PingGraph {
    async fn query_for_result(
        &self,
        _statement: &Statement,
        mapper: &mut dyn ResultMapper,
    ) -> Result<(), GraphError> {
        if !self.up {
            return Err(GraphError::NoResults);
        }
        let row = Row {
            data: vec![GraphValue::Integer(1)],
            meta: None,
            index: 0,
        };
        mapper.map_row(&row).map_err(GraphError::Mapper)
    }

    async fn query_for_results(
        &self,
        _statement: &Statement,
        _mapper: &mut dyn ResultMapper,
    ) -> Result<usize, GraphError> {
        Ok(0)
    }
}

pub fn config() -> ServerConfig {
    ServerConfig {
        code_list_api_url: BASE_URL.to_string(),
        default_limit: 2,
        max_limit: 2,
        ..ServerConfig::default()
    }
}

pub fn app(store: Arc<MemoryStore>) -> Router {
    app_with_graph(store, true)
}

pub fn app_with_graph(store: Arc<MemoryStore>, graph_up: bool) -> Router {
    let health = HealthChecker::from_config(Arc::new(PingGraph { up: graph_up }), &config());
    build_router(AppState {
        store,
        health: Arc::new(health),
        config: config(),
    })
}

/// Issues a GET and returns the status with the decoded JSON body
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
