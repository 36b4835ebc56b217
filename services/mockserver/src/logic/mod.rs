//! Authorization-aware operations over the mock store.
//!
//! # Purpose
//! Every public operation on [`Engine`] runs the same pipeline: authorize the
//! caller, check preconditions, resolve the target, mutate, apply integrity
//! rules, save, and reply with a status code plus an optional body.
//!
//! # Consistency
//! In [`ConsistencyMode::PerCollection`] each collection is locked on its own
//! and cascades such as "delete role, then fix users" are visible half-way to
//! concurrent readers. [`ConsistencyMode::Serialized`] wraps every mutation in
//! an engine-wide exclusive guard and every read in its shared side.
//!
//! # Durability
//! A failed save is reported as [`LogicError::Persistence`]; the in-memory
//! change it followed is kept.
use crate::auth::{AuthzError, Caller, Gate, Principal};
use crate::config::ConsistencyMode;
use crate::persist::Persister;
use crate::store::{MockStore, StoreError};
use axum::http::StatusCode;
use glmock_model::{Role, User};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::Instrument;

mod index_sets;
pub(crate) mod integrity;
mod inputs;
mod roles;
mod users;

pub const ADMIN_ROLE: &str = "Admin";
pub const READER_ROLE: &str = "Reader";
pub const ADMIN_USER: &str = "admin";

const READER_PERMISSIONS: [&str; 6] = [
    "indexsets:read",
    "inputs:read",
    "roles:read",
    "users:list",
    "messages:read",
    "metrics:read",
];

#[derive(Debug, Error)]
pub enum LogicError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("failed to save state: {0:#}")]
    Persistence(anyhow::Error),
    #[error("{0}")]
    Internal(String),
}

impl LogicError {
    pub fn status(&self) -> StatusCode {
        match self {
            LogicError::Validation(_) => StatusCode::BAD_REQUEST,
            LogicError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            LogicError::Forbidden(_) => StatusCode::FORBIDDEN,
            LogicError::NotFound(_) => StatusCode::NOT_FOUND,
            LogicError::Conflict(_) => StatusCode::CONFLICT,
            LogicError::Persistence(_) | LogicError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code used in error bodies and metric labels.
    pub fn code(&self) -> &'static str {
        match self {
            LogicError::Validation(_) => "validation_error",
            LogicError::Unauthorized(_) => "unauthorized",
            LogicError::Forbidden(_) => "forbidden",
            LogicError::NotFound(_) => "not_found",
            LogicError::Conflict(_) => "conflict",
            LogicError::Persistence(_) => "persistence_error",
            LogicError::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for LogicError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(message) => LogicError::NotFound(message),
            StoreError::Conflict(message) => LogicError::Conflict(message),
        }
    }
}

impl From<AuthzError> for LogicError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Unauthorized(message) => LogicError::Unauthorized(message),
            AuthzError::Forbidden(message) => LogicError::Forbidden(message),
        }
    }
}

/// Successful outcome of an operation: the status to report and, except for
/// `204 No Content`, a body.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub status: StatusCode,
    pub body: Option<T>,
}

impl<T> Reply<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(body),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }
}

pub type LogicResult<T> = Result<Reply<T>, LogicError>;

pub struct Engine {
    store: Arc<MockStore>,
    persister: Arc<dyn Persister>,
    gate: Gate,
    consistency: ConsistencyMode,
    serial: RwLock<()>,
    /// Held for a whole save so snapshots reach the persister in order.
    saving: Mutex<()>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("gate", &self.gate)
            .field("consistency", &self.consistency)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(
        store: Arc<MockStore>,
        persister: Arc<dyn Persister>,
        auth_enabled: bool,
        consistency: ConsistencyMode,
    ) -> Self {
        Self {
            store,
            persister,
            gate: Gate::new(auth_enabled),
            consistency,
            serial: RwLock::new(()),
            saving: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<MockStore> {
        &self.store
    }

    pub fn auth_enabled(&self) -> bool {
        self.gate.auth_enabled()
    }

    pub fn consistency(&self) -> ConsistencyMode {
        self.consistency
    }

    /// Install the built-in read-only `Admin` and `Reader` roles and an
    /// `admin` user holding `Admin`, skipping whatever already exists.
    pub async fn seed_defaults(&self) -> Result<(), LogicError> {
        let _guard = self.write_guard().await;
        if self.store.roles.get_by_key(ADMIN_ROLE).await.is_none() {
            let mut admin = Role::new(ADMIN_ROLE, vec!["*".to_string()]);
            admin.description = Some("Grants all permissions (built-in)".to_string());
            admin.read_only = true;
            insert_seed(self.store.roles.add(admin).await)?;
        }
        if self.store.roles.get_by_key(READER_ROLE).await.is_none() {
            let mut reader = Role::new(
                READER_ROLE,
                READER_PERMISSIONS.iter().map(|p| p.to_string()).collect(),
            );
            reader.description = Some("Grants basic read permissions (built-in)".to_string());
            reader.read_only = true;
            insert_seed(self.store.roles.add(reader).await)?;
        }
        if self.store.users.get_by_key(ADMIN_USER).await.is_none() {
            let mut admin = User::new(ADMIN_USER).with_roles([ADMIN_ROLE]);
            admin.full_name = "Administrator".to_string();
            admin.email = "admin@localhost".to_string();
            insert_seed(self.store.users.add(admin).await)?;
        }
        self.save().await
    }

    /// Flush the store through the persister if anything changed since the
    /// last successful save.
    ///
    /// Saves run one at a time. A caller whose change was already flushed by
    /// an earlier save returns after that save finishes, and a caller whose
    /// change is still pending after a failed save retries it.
    pub async fn save(&self) -> Result<(), LogicError> {
        let _saving = self.saving.lock().await;
        let flags = self.store.take_dirty();
        if !flags.contains(&true) {
            return Ok(());
        }
        let snapshot = self.store.snapshot().await;
        if let Err(err) = self.persister.save(&snapshot).await {
            self.store.restore_dirty(flags);
            return Err(LogicError::Persistence(err));
        }
        Ok(())
    }

    async fn authorize(
        &self,
        caller: &Caller,
        permission: &str,
        target: Option<&str>,
    ) -> Result<Option<Principal>, LogicError> {
        Ok(self
            .gate
            .authorize(&self.store, caller, permission, target)
            .await?)
    }

    async fn read_guard(&self) -> Option<RwLockReadGuard<'_, ()>> {
        match self.consistency {
            ConsistencyMode::PerCollection => None,
            ConsistencyMode::Serialized => Some(self.serial.read().await),
        }
    }

    async fn write_guard(&self) -> Option<RwLockWriteGuard<'_, ()>> {
        match self.consistency {
            ConsistencyMode::PerCollection => None,
            ConsistencyMode::Serialized => Some(self.serial.write().await),
        }
    }
}

fn insert_seed<T>(result: Result<T, StoreError>) -> Result<(), LogicError> {
    match result {
        Ok(_) | Err(StoreError::Conflict(_)) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Run one operation inside a span and count its outcome.
async fn observe<T, F>(op: &'static str, operation: F) -> LogicResult<T>
where
    F: Future<Output = LogicResult<T>>,
{
    let result = operation
        .instrument(tracing::info_span!("engine.op", op))
        .await;
    let outcome = match &result {
        Ok(_) => "ok",
        Err(err) => err.code(),
    };
    match &result {
        Err(err @ (LogicError::Persistence(_) | LogicError::Internal(_))) => {
            tracing::error!(op, error = %err, "operation failed");
        }
        Err(err) => tracing::debug!(op, outcome, error = %err, "operation rejected"),
        Ok(_) => tracing::debug!(op, "operation succeeded"),
    }
    metrics::counter!("glmock_operations_total", "op" => op, "outcome" => outcome).increment(1);
    result
}

fn require_non_empty(value: &str, field: &str) -> Result<(), LogicError> {
    if value.trim().is_empty() {
        return Err(LogicError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Names that end up as a permission target. A `:` would read as an extra
/// segment, so a grant scoped to `a` would also cover `a:b`.
fn require_target_name(value: &str, field: &str) -> Result<(), LogicError> {
    require_non_empty(value, field)?;
    if value.contains(':') {
        return Err(LogicError::Validation(format!(
            "{field} must not contain ':'"
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::persist::NoopPersister;
    use crate::store::StoreSnapshot;
    use async_trait::async_trait;

    pub(crate) struct FailingPersister;

    #[async_trait]
    impl Persister for FailingPersister {
        async fn save(&self, _snapshot: &StoreSnapshot) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    pub(crate) async fn seeded_engine() -> Engine {
        let engine = Engine::new(
            Arc::new(MockStore::new()),
            Arc::new(NoopPersister),
            true,
            ConsistencyMode::PerCollection,
        );
        engine.seed_defaults().await.expect("seed");
        engine
    }

    pub(crate) fn admin() -> Caller {
        Caller::user(ADMIN_USER)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::persist::NoopPersister;

    #[tokio::test]
    async fn seed_defaults_is_idempotent() {
        let engine = seeded_engine().await;
        engine.seed_defaults().await.expect("reseed");
        assert_eq!(engine.store().roles.len().await, 2);
        assert_eq!(engine.store().users.len().await, 1);
        let admin = engine.store().roles.get_by_key(ADMIN_ROLE).await.expect("admin");
        assert!(admin.read_only);
        assert!(!engine.store().is_dirty());
    }

    #[tokio::test]
    async fn failed_save_keeps_memory_and_dirty_flags() {
        let engine = Engine::new(
            Arc::new(MockStore::new()),
            Arc::new(FailingPersister),
            true,
            ConsistencyMode::PerCollection,
        );
        let err = engine.seed_defaults().await.expect_err("save fails");
        assert!(matches!(err, LogicError::Persistence(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(engine.store().roles.len().await, 2);
        assert!(engine.store().is_dirty());
    }

    #[tokio::test]
    async fn save_without_changes_skips_persister() {
        let engine = Engine::new(
            Arc::new(MockStore::new()),
            Arc::new(FailingPersister),
            true,
            ConsistencyMode::PerCollection,
        );
        engine.save().await.expect("nothing to save");
    }

    #[test]
    fn errors_map_to_status_and_code() {
        let cases = [
            (LogicError::Validation("x".into()), StatusCode::BAD_REQUEST, "validation_error"),
            (LogicError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "unauthorized"),
            (LogicError::Forbidden("x".into()), StatusCode::FORBIDDEN, "forbidden"),
            (LogicError::NotFound("x".into()), StatusCode::NOT_FOUND, "not_found"),
            (LogicError::Conflict("x".into()), StatusCode::CONFLICT, "conflict"),
            (LogicError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status(), status);
            assert_eq!(err.code(), code);
        }
        let err: LogicError = StoreError::Conflict("role Ops exists".into()).into();
        assert!(matches!(err, LogicError::Conflict(_)));
        let err: LogicError = AuthzError::Forbidden("no".into()).into();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn serialized_mode_runs_operations() {
        let engine = Engine::new(
            Arc::new(MockStore::new()),
            Arc::new(NoopPersister),
            true,
            ConsistencyMode::Serialized,
        );
        engine.seed_defaults().await.expect("seed");
        let reply = engine.list_roles(&admin()).await.expect("list");
        assert_eq!(reply.body.map(|body| body.total), Some(2));
    }
}
