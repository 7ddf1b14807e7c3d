//! External-database-backed storage: one row per index.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;
use rusqlite::Connection;
use smallvec::{smallvec, SmallVec};

use crate::element::{Element, FixedPrimitive, Value};
use crate::error::StoreError;
use crate::source::{check_bounds, DataSource};

/// Rows written per zero-fill / copy statement, bounding statement size.
const FILL_BATCH_ROWS: u64 = 128;

/// Database-backed storage mapping index `i` to the row with primary key
/// `i` in a dynamically named table.
///
/// The table has one `v{c}` column per primitive component, typed from the
/// element codec's primitive kind (`DOUBLE`, `BIGINT`, `BIT`, ...). Every
/// database failure propagates as [`StoreError::Backing`]; concurrency
/// control is the database's own.
///
/// Duplicates share one connection; each store owns its table. [`close`]
/// drops the table and reports failures, while plain `Drop` only logs them.
///
/// [`close`]: RelationalStore::close
pub struct RelationalStore<E: Element>
where
    E::Primitive: FixedPrimitive,
{
    conn: Arc<Mutex<Connection>>,
    table: String,
    size: u64,
    released: bool,
    _marker: PhantomData<E>,
}

impl<E: Element> RelationalStore<E>
where
    E::Primitive: FixedPrimitive,
{
    /// Create a zero-filled store backed by a private in-memory database.
    pub fn open_in_memory(size: u64) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(Arc::new(Mutex::new(conn)), size)
    }

    /// Create a zero-filled store on an existing shared connection.
    ///
    /// Generates a collision-free table name, creates the table and fills
    /// all `size` rows with the zero slot in bounded batches.
    pub fn with_connection(conn: Arc<Mutex<Connection>>, size: u64) -> Result<Self, StoreError> {
        let table = {
            let guard = conn.lock();
            let table = claim_table_name(&guard)?;
            guard.execute_batch(&create_table_sql::<E>(&table))?;
            table
        };

        let store = Self {
            conn,
            table,
            size,
            released: false,
            _marker: PhantomData,
        };
        store.zero_fill()?;
        Ok(store)
    }

    fn zero_fill(&self) -> Result<(), StoreError> {
        let zero_slot = encoded_zero::<E>();
        let guard = self.conn.lock();
        let mut next = 0u64;
        while next < self.size {
            let rows = FILL_BATCH_ROWS.min(self.size - next);
            let sql = insert_batch_sql::<E>(&self.table, rows);
            let mut params: Vec<rusqlite::types::Value> = Vec::new();
            for row in 0..rows {
                params.push(rusqlite::types::Value::Integer((next + row) as i64));
                for part in zero_slot.iter() {
                    params.push(part.to_sql_value());
                }
            }
            guard.execute(&sql, rusqlite::params_from_iter(params))?;
            next += rows;
        }
        Ok(())
    }

    /// Name of the backing table.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Drop the backing table, surfacing any database failure.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.released = true;
        let guard = self.conn.lock();
        guard.execute_batch(&format!("DROP TABLE IF EXISTS {}", self.table))?;
        Ok(())
    }
}

/// `t_` + 9 random lowercase letters, verified free by a trial `SELECT`.
fn claim_table_name(conn: &Connection) -> Result<String, StoreError> {
    let mut rng = rand::rng();
    loop {
        let mut name = String::from("t_");
        for _ in 0..9 {
            name.push(rng.random_range(b'a'..=b'z') as char);
        }
        // A preparable SELECT means the table already exists.
        if conn.prepare(&format!("SELECT id FROM {name} LIMIT 1")).is_err() {
            return Ok(name);
        }
    }
}

fn create_table_sql<E: Element>(table: &str) -> String
where
    E::Primitive: FixedPrimitive,
{
    let mut columns = String::from("id BIGINT PRIMARY KEY");
    for component in 0..E::COMPONENTS {
        columns.push_str(&format!(
            ", v{component} {}",
            <E::Primitive as FixedPrimitive>::SQL_TYPE
        ));
    }
    format!("CREATE TABLE {table} ({columns})")
}

fn insert_batch_sql<E: Element>(table: &str, rows: u64) -> String {
    let row = format!("({})", vec!["?"; E::COMPONENTS + 1].join(", "));
    let values = vec![row; rows as usize].join(", ");
    format!("INSERT INTO {table} VALUES {values}")
}

fn encoded_zero<E: Element>() -> SmallVec<[E::Primitive; 4]> {
    let mut slot: SmallVec<[E::Primitive; 4]> =
        smallvec![<E::Primitive as Value>::zero(); E::COMPONENTS];
    E::zero().encode(&mut slot);
    slot
}

impl<E: Element> DataSource<E> for RelationalStore<E>
where
    E::Primitive: FixedPrimitive,
{
    fn size(&self) -> u64 {
        self.size
    }

    fn get(&self, index: u64, out: &mut E) -> Result<(), StoreError> {
        check_bounds(index, self.size)?;
        let columns: Vec<String> = (0..E::COMPONENTS).map(|c| format!("v{c}")).collect();
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            columns.join(", "),
            self.table
        );
        let guard = self.conn.lock();
        let mut stmt = guard.prepare(&sql)?;
        let slot: SmallVec<[E::Primitive; 4]> = stmt.query_row([index as i64], |row| {
            let mut slot: SmallVec<[E::Primitive; 4]> =
                smallvec![<E::Primitive as Value>::zero(); E::COMPONENTS];
            for (component, part) in slot.iter_mut().enumerate() {
                let raw = row.get_ref(component)?;
                *part = <E::Primitive as FixedPrimitive>::from_sql_value(raw).map_err(|err| {
                    rusqlite::Error::FromSqlConversionFailure(
                        component,
                        raw.data_type(),
                        Box::new(err),
                    )
                })?;
            }
            Ok(slot)
        })?;
        out.decode(&slot);
        Ok(())
    }

    fn set(&mut self, index: u64, value: &E) -> Result<(), StoreError> {
        check_bounds(index, self.size)?;
        let mut slot: SmallVec<[E::Primitive; 4]> =
            smallvec![<E::Primitive as Value>::zero(); E::COMPONENTS];
        value.encode(&mut slot);

        let assignments: Vec<String> = (0..E::COMPONENTS)
            .map(|c| format!("v{c} = ?{}", c + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            self.table,
            assignments.join(", "),
            E::COMPONENTS + 1
        );

        let mut params: Vec<rusqlite::types::Value> =
            slot.iter().map(|part| part.to_sql_value()).collect();
        params.push(rusqlite::types::Value::Integer(index as i64));

        let guard = self.conn.lock();
        guard.execute(&sql, rusqlite::params_from_iter(params))?;
        Ok(())
    }

    fn duplicate(&self) -> Result<Self, StoreError> {
        let table = {
            let guard = self.conn.lock();
            let table = claim_table_name(&guard)?;
            guard.execute_batch(&create_table_sql::<E>(&table))?;
            guard.execute(
                &format!("INSERT INTO {table} SELECT * FROM {}", self.table),
                [],
            )?;
            table
        };
        Ok(Self {
            conn: Arc::clone(&self.conn),
            table,
            size: self.size,
            released: false,
            _marker: PhantomData,
        })
    }
}

impl<E: Element> Drop for RelationalStore<E>
where
    E::Primitive: FixedPrimitive,
{
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let guard = self.conn.lock();
        if let Err(err) = guard.execute_batch(&format!("DROP TABLE IF EXISTS {}", self.table)) {
            tracing::warn!(table = %self.table, %err, "failed to drop backing table");
        }
    }
}

impl<E: Element> fmt::Debug for RelationalStore<E>
where
    E::Primitive: FixedPrimitive,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationalStore")
            .field("table", &self.table)
            .field("size", &self.size)
            .finish()
    }
}
