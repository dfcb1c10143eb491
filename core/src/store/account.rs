use super::DataStore;
use crate::{
    error::LoadResult,
    model::{Account, AccountType},
};
use anyhow::anyhow;
use rusqlite::params;

impl DataStore {
    // ── Account ───────────────────────────────────────────────────

    pub fn insert_account(&self, a: &Account) -> LoadResult<()> {
        self.conn.execute(
            "INSERT INTO accounts (
                account_id, customer_id, account_number, iban, account_type,
                currency, balance_cents, created_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &a.account_id,
                &a.customer_id,
                &a.account_number,
                &a.iban,
                a.account_type.as_str(),
                &a.currency,
                a.balance_cents,
                a.created_date,
            ],
        )?;
        Ok(())
    }

    pub fn delete_account(&self, account_id: &str) -> LoadResult<()> {
        let n = self.conn.execute(
            "DELETE FROM accounts WHERE account_id = ?1",
            params![account_id],
        )?;
        if n == 0 {
            return Err(anyhow!("delete_account: no row for {account_id}").into());
        }
        Ok(())
    }

    pub fn get_account(&self, account_id: &str) -> LoadResult<Option<Account>> {
        let mut stmt = self.conn.prepare(
            "SELECT account_id, customer_id, account_number, iban, account_type,
                    currency, balance_cents, created_date
             FROM accounts WHERE account_id = ?1",
        )?;
        let mut rows = stmt.query_map(params![account_id], |row| {
            let type_str: String = row.get(4)?;
            Ok(Account {
                account_id: row.get(0)?,
                customer_id: row.get(1)?,
                account_number: row.get(2)?,
                iban: row.get(3)?,
                account_type: AccountType::parse(&type_str).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        4,
                        rusqlite::types::Type::Text,
                        format!("unknown account_type '{type_str}'").into(),
                    )
                })?,
                currency: row.get(5)?,
                balance_cents: row.get(6)?,
                created_date: row.get(7)?,
            })
        })?;
        rows.next().transpose().map_err(Into::into)
    }

    /// All account identities in creation order.
    pub fn account_ids(&self) -> LoadResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT account_id FROM accounts ORDER BY rowid ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
