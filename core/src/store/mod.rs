//! SQLite persistence layer.
//!
//! RULE: Only this module talks to the database. The engine and the
//! planner call store methods — they never execute SQL directly.
//!
//! The store exposes three families of operations:
//!   - row writes (insert/delete per tier, in the submodules),
//!   - the read-only inspector (`snapshot`, `counts`),
//!   - the run-scoped transaction boundary (`begin`/`commit`/`rollback`).

mod account;
mod customer;
mod transaction;

use crate::{
    error::{LoadError, LoadResult},
    shape::{AccountNode, CustomerNode, ShapeCounts, StoreSnapshot},
};
use anyhow::anyhow;
use rusqlite::Connection;
use std::collections::HashMap;

#[derive(Debug)]
pub struct DataStore {
    conn: Connection,
}

impl DataStore {
    /// Open (creating if needed) a file-backed store. Connection
    /// failure is the `StoreUnavailable` case: surfaced immediately,
    /// never retried here.
    pub fn open(path: &str) -> LoadResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| LoadError::StoreUnavailable(e.to_string()))?;
        // WAL mode only matters for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> LoadResult<Self> {
        let conn = Connection::open(":memory:")
            .map_err(|e| LoadError::StoreUnavailable(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order. Idempotent.
    pub fn migrate(&self) -> LoadResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_tables.sql"))?;
        Ok(())
    }

    // ── Transaction boundary ───────────────────────────────────────

    /// Open the single write transaction a run executes inside.
    /// IMMEDIATE so the write lock is taken up front and no other
    /// writer can interleave with the snapshot-plan-execute sequence.
    pub fn begin(&self) -> LoadResult<()> {
        self.conn.execute_batch("BEGIN IMMEDIATE;")?;
        Ok(())
    }

    pub fn commit(&self) -> LoadResult<()> {
        self.conn.execute_batch("COMMIT;")?;
        Ok(())
    }

    /// Roll back the in-progress run. Failure to roll back (e.g. no
    /// transaction is open) is ignored: the caller is already on an
    /// error path.
    pub fn rollback(&self) {
        let _ = self.conn.execute_batch("ROLLBACK;");
    }

    // ── Inspector ──────────────────────────────────────────────────

    /// Read the whole store as a creation-ordered tree. Three queries,
    /// assembled in memory; rowid order is insertion order, which the
    /// merge shrink rule depends on.
    pub fn snapshot(&self) -> LoadResult<StoreSnapshot> {
        let mut customers: Vec<CustomerNode> = Vec::new();
        let mut customer_index: HashMap<String, usize> = HashMap::new();

        let mut stmt = self
            .conn
            .prepare("SELECT customer_id FROM customers ORDER BY rowid ASC")?;
        let ids = stmt.query_map([], |row| row.get::<_, String>(0))?;
        for id in ids {
            let id = id?;
            customer_index.insert(id.clone(), customers.len());
            customers.push(CustomerNode {
                customer_id: id,
                accounts: Vec::new(),
            });
        }

        let mut account_index: HashMap<String, (usize, usize)> = HashMap::new();
        let mut stmt = self
            .conn
            .prepare("SELECT account_id, customer_id FROM accounts ORDER BY rowid ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (account_id, customer_id) = row?;
            let ci = *customer_index.get(&customer_id).ok_or_else(|| {
                anyhow!("account {account_id} references missing customer {customer_id}")
            })?;
            account_index.insert(account_id.clone(), (ci, customers[ci].accounts.len()));
            customers[ci].accounts.push(AccountNode {
                account_id,
                transaction_ids: Vec::new(),
            });
        }

        let mut stmt = self
            .conn
            .prepare("SELECT transaction_id, account_id FROM transactions ORDER BY rowid ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (transaction_id, account_id) = row?;
            let &(ci, ai) = account_index.get(&account_id).ok_or_else(|| {
                anyhow!("transaction {transaction_id} references missing account {account_id}")
            })?;
            customers[ci].accounts[ai].transaction_ids.push(transaction_id);
        }

        Ok(StoreSnapshot { customers })
    }

    /// Aggregate row counts per tier.
    pub fn counts(&self) -> LoadResult<ShapeCounts> {
        let count = |table: &str| -> LoadResult<u64> {
            let n: i64 = self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {table}"),
                [],
                |row| row.get(0),
            )?;
            Ok(n as u64)
        };
        Ok(ShapeCounts {
            customers: count("customers")?,
            accounts: count("accounts")?,
            transactions: count("transactions")?,
        })
    }

    /// Accounts whose customer no longer exists. Always zero after a
    /// committed run; used by the integrity tests.
    pub fn orphan_account_count(&self) -> LoadResult<u64> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM accounts a
             LEFT JOIN customers c ON a.customer_id = c.customer_id
             WHERE c.customer_id IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(n as u64)
    }

    /// Transactions whose account no longer exists.
    pub fn orphan_transaction_count(&self) -> LoadResult<u64> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions t
             LEFT JOIN accounts a ON t.account_id = a.account_id
             WHERE a.account_id IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(n as u64)
    }
}
