//! Transactional storage for members and their skills.
//!
//! A `MemberTx` owns one pooled connection for its lifetime. Committing,
//! rolling back or dropping it hands the connection back to the pool.

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::models::{Member, MemberFields, ReadScope};

const MEMBER_COLUMNS: &str =
    "id, name, position, join_date, note, employee_number, deleted, updated_at";

/// Result of attempting to insert a brand-new member row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A row with this identifier already exists, active or soft-deleted.
    DuplicateId,
}

/// Entry point to member storage.
#[derive(Clone)]
pub struct MemberStore {
    pool: SqlitePool,
}

impl MemberStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a transaction on a connection taken from the pool.
    pub async fn begin(&self) -> Result<MemberTx, sqlx::Error> {
        Ok(MemberTx {
            tx: self.pool.begin().await?,
        })
    }

    /// Get a member by ID with its skills.
    pub async fn find(&self, id: &str, scope: ReadScope) -> Result<Option<Member>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        select_member(&mut conn, id, scope).await
    }

    /// List members ordered by ID, each with its skills in insertion order.
    pub async fn find_all(&self, scope: ReadScope) -> Result<Vec<Member>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE (? OR deleted = 0) ORDER BY id"
        ))
        .bind(scope == ReadScope::IncludeDeleted)
        .fetch_all(&mut *conn)
        .await?;

        let skill_rows = sqlx::query("SELECT member_id, skill_name FROM member_skills ORDER BY seq")
            .fetch_all(&mut *conn)
            .await?;

        let mut skills: HashMap<String, Vec<String>> = HashMap::new();
        for row in skill_rows {
            skills
                .entry(row.get("member_id"))
                .or_default()
                .push(row.get("skill_name"));
        }

        Ok(rows
            .iter()
            .map(|row| {
                let id: String = row.get("id");
                let member_skills = skills.remove(&id).unwrap_or_default();
                member_from_row(row, member_skills)
            })
            .collect())
    }

    /// Set the soft-delete marker. Returns whether a row was found.
    pub async fn mark_deleted(&self, id: &str, now: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE members SET deleted = 1, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// An open member transaction.
pub struct MemberTx {
    tx: Transaction<'static, Sqlite>,
}

impl MemberTx {
    /// Insert a new active member row.
    ///
    /// A primary-key collision is reported as `InsertOutcome::DuplicateId`
    /// rather than an error; every other failure is returned as-is.
    pub async fn insert_member(
        &mut self,
        id: &str,
        fields: &MemberFields,
        now: &str,
    ) -> Result<InsertOutcome, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO members (id, name, position, join_date, note, employee_number, deleted, updated_at) VALUES (?, ?, ?, ?, ?, ?, 0, ?)"
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.position)
        .bind(&fields.join_date)
        .bind(&fields.note)
        .bind(&fields.employee_number)
        .bind(now)
        .execute(&mut *self.tx)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(InsertOutcome::DuplicateId)
            }
            Err(e) => Err(e),
        }
    }

    /// Read a member row, soft-deleted or not, inside this transaction.
    pub async fn fetch_member(&mut self, id: &str) -> Result<Option<Member>, sqlx::Error> {
        select_member(&mut self.tx, id, ReadScope::IncludeDeleted).await
    }

    /// Overwrite the mutable columns. Returns whether a row was found.
    pub async fn update_fields(
        &mut self,
        id: &str,
        fields: &MemberFields,
        now: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE members SET name = ?, position = ?, join_date = ?, note = ?, employee_number = ?, updated_at = ? WHERE id = ?"
        )
        .bind(&fields.name)
        .bind(&fields.position)
        .bind(&fields.join_date)
        .bind(&fields.note)
        .bind(&fields.employee_number)
        .bind(now)
        .bind(id)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the mutable columns of a soft-deleted row and clear its marker.
    ///
    /// Returns `false` when the row is not (or no longer) soft-deleted.
    pub async fn revive(
        &mut self,
        id: &str,
        fields: &MemberFields,
        now: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE members SET name = ?, position = ?, join_date = ?, note = ?, employee_number = ?, deleted = 0, updated_at = ? WHERE id = ? AND deleted = 1"
        )
        .bind(&fields.name)
        .bind(&fields.position)
        .bind(&fields.join_date)
        .bind(&fields.note)
        .bind(&fields.employee_number)
        .bind(now)
        .bind(id)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every skill association of a member.
    pub async fn clear_skills(&mut self, id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM member_skills WHERE member_id = ?")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    /// Append skill associations in the given order.
    pub async fn insert_skills(&mut self, id: &str, skills: &[String]) -> Result<(), sqlx::Error> {
        for skill in skills {
            sqlx::query("INSERT INTO member_skills (member_id, skill_name) VALUES (?, ?)")
                .bind(id)
                .bind(skill)
                .execute(&mut *self.tx)
                .await?;
        }
        Ok(())
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }
}

async fn select_member(
    conn: &mut SqliteConnection,
    id: &str,
    scope: ReadScope,
) -> Result<Option<Member>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {MEMBER_COLUMNS} FROM members WHERE id = ? AND (? OR deleted = 0)"
    ))
    .bind(id)
    .bind(scope == ReadScope::IncludeDeleted)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let skills: Vec<String> =
        sqlx::query_scalar("SELECT skill_name FROM member_skills WHERE member_id = ? ORDER BY seq")
            .bind(id)
            .fetch_all(&mut *conn)
            .await?;

    Ok(Some(member_from_row(&row, skills)))
}

fn member_from_row(row: &SqliteRow, skills: Vec<String>) -> Member {
    let deleted: i64 = row.get("deleted");
    Member {
        id: row.get("id"),
        name: row.get("name"),
        position: row.get("position"),
        join_date: row.get("join_date"),
        note: row.get("note"),
        employee_number: row.get("employee_number"),
        skills,
        deleted: deleted != 0,
        updated_at: row.get("updated_at"),
    }
}
