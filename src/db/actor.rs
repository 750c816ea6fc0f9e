use crate::db::models::{PatientCreate, SqlValue};
use crate::db::rows::{JsonRow, row_to_json};
use crate::db::schema::SQLITE_INIT;
use crate::error::PatientsError;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::info;

#[derive(Debug)]
pub enum DbActorMessage {
    /// Insert a patient row and return its assigned id.
    InsertPatient(PatientCreate, RpcReplyPort<Result<i64, PatientsError>>),

    /// Execute client-supplied SQL verbatim and return the affected row count.
    ExecuteUnsafeStatement(String, RpcReplyPort<Result<u64, PatientsError>>),

    /// Run client-supplied SQL read-only and return every row as a JSON object.
    SelectRows(String, RpcReplyPort<Result<Vec<JsonRow>, PatientsError>>),
}

/// Cloneable handle to the store. Every request goes through this one actor,
/// so statements reach SQLite one at a time.
#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn insert_patient(&self, create: PatientCreate) -> Result<i64, PatientsError> {
        ractor::call!(self.actor, DbActorMessage::InsertPatient, create).map_err(|e| {
            PatientsError::RactorError(format!("DbActor InsertPatient RPC failed: {e}"))
        })?
    }

    /// Executes `sql` with no validation, parameterization or statement limit.
    ///
    /// Callers gate the verb (see [`crate::statement::StatementVerb`]); anything
    /// that gets here runs as-is, including trailing statements.
    pub async fn execute_unsafe_statement(&self, sql: String) -> Result<u64, PatientsError> {
        ractor::call!(self.actor, DbActorMessage::ExecuteUnsafeStatement, sql).map_err(|e| {
            PatientsError::RactorError(format!("DbActor ExecuteUnsafeStatement RPC failed: {e}"))
        })?
    }

    /// Runs `sql` read-only and returns its rows. A trailing statement that
    /// writes makes the whole call fail with nothing changed.
    pub async fn select_rows(&self, sql: String) -> Result<Vec<JsonRow>, PatientsError> {
        ractor::call!(self.actor, DbActorMessage::SelectRows, sql).map_err(|e| {
            PatientsError::RactorError(format!("DbActor SelectRows RPC failed: {e}"))
        })?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // The mailbox already serializes statements; a single connection also
        // keeps `sqlite::memory:` databases coherent.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!(database_url = %database_url, "DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::InsertPatient(create, reply) => {
                let res = self.insert_patient(&state.pool, create).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ExecuteUnsafeStatement(sql, reply) => {
                let res = self.execute_unsafe_statement(&state.pool, &sql).await;
                let _ = reply.send(res);
            }
            DbActorMessage::SelectRows(sql, reply) => {
                let res = self.select_rows(&state.pool, &sql).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn insert_patient(
        &self,
        pool: &SqlitePool,
        create: PatientCreate,
    ) -> Result<i64, PatientsError> {
        let mut query = sqlx::query_scalar::<_, i64>(
            r#"
        INSERT INTO patients (name, age, gender)
        VALUES (?, ?, ?)
        RETURNING id
        "#,
        );
        for value in [create.name, create.age, create.gender] {
            query = match value {
                SqlValue::Null => query.bind(None::<i64>),
                SqlValue::Integer(i) => query.bind(i),
                SqlValue::Real(f) => query.bind(f),
                SqlValue::Text(s) => query.bind(s),
            };
        }

        let id = query.fetch_one(pool).await?;
        Ok(id)
    }

    async fn execute_unsafe_statement(
        &self,
        pool: &SqlitePool,
        sql: &str,
    ) -> Result<u64, PatientsError> {
        // Client SQL is one-off text; keep it out of the statement cache.
        let result = sqlx::query(sql).persistent(false).execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Runs `sql` on a connection switched to `query_only`, so trailing
    /// statements that write fail instead of taking effect.
    async fn select_rows(&self, pool: &SqlitePool, sql: &str) -> Result<Vec<JsonRow>, PatientsError> {
        let mut conn = pool.acquire().await?;
        sqlx::query("PRAGMA query_only = ON")
            .execute(&mut *conn)
            .await?;

        let fetched = sqlx::query(sql)
            .persistent(false)
            .fetch_all(&mut *conn)
            .await;

        if let Err(e) = sqlx::query("PRAGMA query_only = OFF")
            .execute(&mut *conn)
            .await
        {
            // Never return a read-only connection to the pool.
            conn.close_on_drop();
            return Err(e.into());
        }

        let rows = fetched?
            .iter()
            .map(row_to_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Spawn the database actor and return a cloneable handle.
///
/// Fails if the store cannot be opened or the schema cannot be applied.
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, PatientsError> {
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .map_err(|e| PatientsError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), PatientsError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
