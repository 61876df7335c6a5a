//! redb-based persistence for orders
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` (JSON) | Order records with audit history |
//! | `tenant_active` | `order_id` | `tenant_id` | Index of orders holding a queue slot |
//! | `order_counters` | `tenant_id` | `u64` | Per-tenant order number counter |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate`: once `commit()` returns the
//! write is on disk and the file is in a consistent state, so a crash
//! between commits never leaves a half-written order. Status, queue fields
//! and audit entries of one order are always written in a single commit.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::Order;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for order records: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for queued-order membership: key = order_id, value = tenant_id
const ACTIVE_TABLE: TableDefinition<&str, &str> = TableDefinition::new("tenant_active");

/// Table for order number counters: key = tenant_id, value = last issued number
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("order_counters");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Order storage backed by redb
#[derive(Clone)]
pub struct OrderStore {
    db: Arc<Database>,
}

impl OrderStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;

        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Persist one order (insert or replace) in a single commit.
    ///
    /// The queued-order index is maintained in the same transaction, so a
    /// crash can never leave an order queued on disk but missing from the
    /// index or vice versa.
    pub fn save(&self, order: &Order) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut orders = write_txn.open_table(ORDERS_TABLE)?;
            let json = serde_json::to_vec(order)?;
            orders.insert(order.id.as_str(), json.as_slice())?;

            let mut active = write_txn.open_table(ACTIVE_TABLE)?;
            if order.is_queued() {
                active.insert(order.id.as_str(), order.tenant_id.as_str())?;
            } else {
                active.remove(order.id.as_str())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Persist a batch of orders in a single commit
    pub fn save_batch(&self, orders: &[Order]) -> StorageResult<()> {
        if orders.is_empty() {
            return Ok(());
        }

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ORDERS_TABLE)?;
            let mut active = write_txn.open_table(ACTIVE_TABLE)?;
            for order in orders {
                let json = serde_json::to_vec(order)?;
                table.insert(order.id.as_str(), json.as_slice())?;
                if order.is_queued() {
                    active.insert(order.id.as_str(), order.tenant_id.as_str())?;
                } else {
                    active.remove(order.id.as_str())?;
                }
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Load one order by id
    pub fn load(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => {
                let order: Order = serde_json::from_slice(value.value())?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// Load every order of a tenant that still holds a queue slot.
    ///
    /// Index entries pointing at missing or no-longer-queued orders are
    /// skipped with a warning; the next save of that order cleans them up.
    pub fn load_active(&self, tenant_id: &str) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let active = read_txn.open_table(ACTIVE_TABLE)?;
        let orders_table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for entry in active.iter()? {
            let (key, value) = entry?;
            if value.value() != tenant_id {
                continue;
            }
            let order_id = key.value();
            match orders_table.get(order_id)? {
                Some(raw) => {
                    let order: Order = serde_json::from_slice(raw.value())?;
                    if order.is_queued() {
                        orders.push(order);
                    } else {
                        tracing::warn!(
                            "Stale queue index entry for order {} (status {})",
                            order_id,
                            order.status
                        );
                    }
                }
                None => {
                    tracing::warn!("Queue index references missing order {}", order_id);
                }
            }
        }
        Ok(orders)
    }

    /// Load all queued orders grouped by tenant (startup rebuild)
    pub fn load_all_active(&self) -> StorageResult<HashMap<String, Vec<Order>>> {
        let read_txn = self.db.begin_read()?;
        let active = read_txn.open_table(ACTIVE_TABLE)?;
        let orders_table = read_txn.open_table(ORDERS_TABLE)?;

        let mut by_tenant: HashMap<String, Vec<Order>> = HashMap::new();
        for entry in active.iter()? {
            let (key, value) = entry?;
            let order_id = key.value();
            match orders_table.get(order_id)? {
                Some(raw) => {
                    let order: Order = serde_json::from_slice(raw.value())?;
                    if order.is_queued() {
                        by_tenant
                            .entry(value.value().to_string())
                            .or_default()
                            .push(order);
                    } else {
                        tracing::warn!(
                            "Stale queue index entry for order {} (status {})",
                            order_id,
                            order.status
                        );
                    }
                }
                None => {
                    tracing::warn!("Queue index references missing order {}", order_id);
                }
            }
        }
        Ok(by_tenant)
    }

    /// Increment and return a tenant's order number counter
    pub fn next_order_number(&self, tenant_id: &str) -> StorageResult<u64> {
        let write_txn = self.db.begin_write()?;
        let next = {
            let mut table = write_txn.open_table(COUNTERS_TABLE)?;
            let current = table.get(tenant_id)?.map(|g| g.value()).unwrap_or(0);
            let next = current + 1;
            table.insert(tenant_id, next)?;
            next
        };
        write_txn.commit()?;
        Ok(next)
    }
}
