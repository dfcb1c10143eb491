use super::DataStore;
use crate::{
    error::LoadResult,
    model::{Customer, CustomerType},
};
use anyhow::anyhow;
use rusqlite::params;

impl DataStore {
    // ── Customer ──────────────────────────────────────────────────

    pub fn insert_customer(&self, c: &Customer) -> LoadResult<()> {
        self.conn.execute(
            "INSERT INTO customers (
                customer_id, name, email, phone, address, date_joined, customer_type
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &c.customer_id,
                &c.name,
                &c.email,
                &c.phone,
                &c.address,
                c.date_joined,
                c.customer_type.as_str(),
            ],
        )?;
        Ok(())
    }

    /// Delete one customer row. The plan has already deleted its
    /// accounts; a surviving child trips the FK constraint instead of
    /// silently orphaning.
    pub fn delete_customer(&self, customer_id: &str) -> LoadResult<()> {
        let n = self.conn.execute(
            "DELETE FROM customers WHERE customer_id = ?1",
            params![customer_id],
        )?;
        if n == 0 {
            return Err(anyhow!("delete_customer: no row for {customer_id}").into());
        }
        Ok(())
    }

    pub fn get_customer(&self, customer_id: &str) -> LoadResult<Option<Customer>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_id, name, email, phone, address, date_joined, customer_type
             FROM customers WHERE customer_id = ?1",
        )?;
        let mut rows = stmt.query_map(params![customer_id], |row| {
            let type_str: String = row.get(6)?;
            Ok(Customer {
                customer_id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                phone: row.get(3)?,
                address: row.get(4)?,
                date_joined: row.get(5)?,
                customer_type: CustomerType::parse(&type_str).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        6,
                        rusqlite::types::Type::Text,
                        format!("unknown customer_type '{type_str}'").into(),
                    )
                })?,
            })
        })?;
        rows.next().transpose().map_err(Into::into)
    }

    /// All customer identities in creation order.
    pub fn customer_ids(&self) -> LoadResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT customer_id FROM customers ORDER BY rowid ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
