//! Graph health check with a cached result.
//!
//! The graph is pinged at most once per interval; callers in between get the
//! last report. A ping failure is `Unhealthy` until the last success is older
//! than the critical timeout, after which it is `Critical`.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::ServerConfig;
use crate::graph::properties::get_i64;
use crate::graph::{ColumnKind, GraphError, MapperError, QueryExecutor, Row, Statement};

pub const PING_QUERY: &str = "RETURN 1 AS ok";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub message: String,
}

impl HealthReport {
    fn healthy() -> Self {
        HealthReport {
            status: HealthStatus::Healthy,
            message: "neo4j is reachable".to_string(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

struct CheckState {
    last_checked: Option<Instant>,
    last_success: Instant,
    report: HealthReport,
}

pub struct HealthChecker {
    db: Arc<dyn QueryExecutor>,
    interval: Duration,
    critical_timeout: Duration,
    state: Mutex<CheckState>,
}

impl HealthChecker {
    pub fn new(db: Arc<dyn QueryExecutor>, interval: Duration, critical_timeout: Duration) -> Self {
        HealthChecker {
            db,
            interval,
            critical_timeout,
            state: Mutex::new(CheckState {
                last_checked: None,
                last_success: Instant::now(),
                report: HealthReport::healthy(),
            }),
        }
    }

    pub fn from_config(db: Arc<dyn QueryExecutor>, config: &ServerConfig) -> Self {
        Self::new(
            db,
            Duration::from_secs(config.health_check_interval_secs),
            Duration::from_secs(config.health_check_critical_timeout_secs),
        )
    }

    /// Current report, pinging the graph when the cached one has expired
    pub async fn check(&self) -> HealthReport {
        // Held across the ping so concurrent callers share one round trip
        let mut state = self.state.lock().await;
        let now = Instant::now();

        if state
            .last_checked
            .is_some_and(|last| now.duration_since(last) < self.interval)
        {
            return state.report.clone();
        }

        let report = match self.ping().await {
            Ok(()) => {
                state.last_success = now;
                HealthReport::healthy()
            }
            Err(e) => {
                let failing_for = now.duration_since(state.last_success);
                let status = if failing_for >= self.critical_timeout {
                    HealthStatus::Critical
                } else {
                    HealthStatus::Unhealthy
                };
                log::warn!(
                    "Health check failed ({:?}, failing for {}s): {}",
                    status,
                    failing_for.as_secs(),
                    e
                );
                HealthReport {
                    status,
                    message: e.to_string(),
                }
            }
        };

        state.last_checked = Some(now);
        state.report = report.clone();
        report
    }

    async fn ping(&self) -> Result<(), GraphError> {
        let statement = Statement::new(PING_QUERY).column("ok", ColumnKind::Integer);
        let mut mapper = |row: &Row| -> Result<(), MapperError> {
            get_i64(row.data.first())?;
            Ok(())
        };
        self.db.query_for_result(&statement, &mut mapper).await
    }
}
