use crate::agent::tools::Tool;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, Row, params};
use serde::Serialize;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// One stored service request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRow {
    pub id: i64,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub requested_service: String,
    pub created_at: String,
}

impl ClientRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            firstname: row.get(2)?,
            lastname: row.get(3)?,
            requested_service: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, email, firstname, lastname, requested_service, created_at FROM clients";

/// SQLite-backed store of client service requests.
///
/// The connection is guarded by a mutex; callers in async code go through
/// `spawn_blocking`.
pub struct ClientStore {
    conn: Mutex<Connection>,
}

impl ClientStore {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!(
                    "Failed to create database parent directory: {}",
                    parent.display()
                )
            })?;
        }
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database at: {}", db_path.display()))?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=3000;",
        )?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS clients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL,
                firstname TEXT NOT NULL,
                lastname TEXT NOT NULL,
                requested_service TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create clients table")?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_clients_email ON clients(email)",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))
    }

    pub fn rows_by_email(&self, email: &str) -> Result<Vec<ClientRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{} WHERE email = ?1 ORDER BY id", SELECT_COLUMNS))?;
        let rows = stmt
            .query_map(params![email], ClientRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn rows_by_email_and_service(&self, email: &str, service: &str) -> Result<Vec<ClientRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE email = ?1 AND requested_service = ?2 ORDER BY id",
            SELECT_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![email, service], ClientRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Insert a request and return its row id.
    pub fn insert_request(
        &self,
        email: &str,
        firstname: &str,
        lastname: &str,
        service: &str,
    ) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO clients (email, firstname, lastname, requested_service, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![email, firstname, lastname, service, Utc::now().to_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

fn required_str<'a>(params: &'a Value, field: &str) -> Result<&'a str> {
    params[field]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .with_context(|| format!("'{}' must be a non-empty string", field))
}

/// Run a blocking store operation off the async runtime.
async fn blocking<T, F>(store: &Arc<ClientStore>, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&ClientStore) -> Result<T> + Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .context("database task failed")?
}

pub struct RowsByEmailTool {
    store: Arc<ClientStore>,
}

impl RowsByEmailTool {
    pub fn new(store: Arc<ClientStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for RowsByEmailTool {
    fn name(&self) -> &str {
        "get_all_rows_by_client_email"
    }

    fn description(&self) -> &str {
        "Select all stored service requests for the client with the given email."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "email": {"type": "string", "description": "Client email address"}
            },
            "required": ["email"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let email = required_str(&params, "email")?.to_string();
        let rows = blocking(&self.store, move |s| s.rows_by_email(&email)).await?;
        Ok(serde_json::to_value(rows)?)
    }
}

pub struct RowsByEmailAndServiceTool {
    store: Arc<ClientStore>,
}

impl RowsByEmailAndServiceTool {
    pub fn new(store: Arc<ClientStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for RowsByEmailAndServiceTool {
    fn name(&self) -> &str {
        "get_all_rows_by_client_email_and_service"
    }

    fn description(&self) -> &str {
        "Select stored service requests matching both the client email and the service name."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "email": {"type": "string", "description": "Client email address"},
                "service_name": {"type": "string", "description": "Requested service"}
            },
            "required": ["email", "service_name"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let email = required_str(&params, "email")?.to_string();
        let service = required_str(&params, "service_name")?.to_string();
        let rows = blocking(&self.store, move |s| {
            s.rows_by_email_and_service(&email, &service)
        })
        .await?;
        Ok(serde_json::to_value(rows)?)
    }
}

pub struct InsertRequestTool {
    store: Arc<ClientStore>,
}

impl InsertRequestTool {
    pub fn new(store: Arc<ClientStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for InsertRequestTool {
    fn name(&self) -> &str {
        "insert_new_request"
    }

    fn description(&self) -> &str {
        "Store a new service request for a client. Check for an existing identical request first."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "email": {"type": "string"},
                "firstname": {"type": "string"},
                "lastname": {"type": "string"},
                "service_name": {"type": "string"}
            },
            "required": ["email", "firstname", "lastname", "service_name"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let email = required_str(&params, "email")?.to_string();
        let firstname = required_str(&params, "firstname")?.to_string();
        let lastname = required_str(&params, "lastname")?.to_string();
        let service = required_str(&params, "service_name")?.to_string();

        let message = format!(
            "Request for service {} inserted for user {} {} with email {}",
            service, firstname, lastname, email
        );
        let id = blocking(&self.store, move |s| {
            s.insert_request(&email, &firstname, &lastname, &service)
        })
        .await?;

        Ok(json!({"inserted_id": id, "message": message}))
    }
}

/// All client-request tools over one shared store.
pub fn client_tools(store: Arc<ClientStore>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(RowsByEmailTool::new(store.clone())),
        Arc::new(RowsByEmailAndServiceTool::new(store.clone())),
        Arc::new(InsertRequestTool::new(store)),
    ]
}
