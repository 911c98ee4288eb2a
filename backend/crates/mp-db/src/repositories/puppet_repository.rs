//! Puppet repository - durable storage of puppet records.
//!
//! Rows are keyed by the remote account ID. The `custom_mxid` column carries
//! the optional double-puppet binding and is unique when present, so a local
//! user can only ever be bound to one puppet.

use crate::{DbError, Result as DbErrorResult};

use std::panic::Location;

use mp_core::{CustomBinding, ErrorLocation, PuppetRecord};

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_COLUMNS: &str = r#"
    SELECT remote_id, username, name, name_set, avatar_id, avatar_set, avatar_url,
        contact_info_set, custom_mxid, access_token
    FROM puppets
"#;

#[derive(Clone)]
pub struct PuppetRepository {
    pool: SqlitePool,
}

impl PuppetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, puppet: &PuppetRecord) -> DbErrorResult<()> {
        let (custom_mxid, access_token) = binding_columns(puppet);

        sqlx::query(
            r#"
                INSERT INTO puppets (
                    remote_id, username, name, name_set, avatar_id, avatar_set, avatar_url,
                    contact_info_set, custom_mxid, access_token
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(puppet.remote_id)
        .bind(&puppet.username)
        .bind(&puppet.name)
        .bind(puppet.name_set)
        .bind(&puppet.avatar_id)
        .bind(puppet.avatar_set)
        .bind(&puppet.avatar_url)
        .bind(puppet.contact_info_set)
        .bind(custom_mxid)
        .bind(access_token)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, custom_mxid))?;

        Ok(())
    }

    /// Overwrite a stored record. Fails if the puppet was never created.
    pub async fn update(&self, puppet: &PuppetRecord) -> DbErrorResult<()> {
        let (custom_mxid, access_token) = binding_columns(puppet);

        let result = sqlx::query(
            r#"
                UPDATE puppets
                SET username = ?, name = ?, name_set = ?, avatar_id = ?, avatar_set = ?,
                    avatar_url = ?, contact_info_set = ?, custom_mxid = ?, access_token = ?
                WHERE remote_id = ?
            "#,
        )
        .bind(&puppet.username)
        .bind(&puppet.name)
        .bind(puppet.name_set)
        .bind(&puppet.avatar_id)
        .bind(puppet.avatar_set)
        .bind(&puppet.avatar_url)
        .bind(puppet.contact_info_set)
        .bind(custom_mxid)
        .bind(access_token)
        .bind(puppet.remote_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, custom_mxid))?;

        if result.rows_affected() == 0 {
            return Err(DbError::PuppetNotFound {
                remote_id: puppet.remote_id,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    pub async fn find_by_remote_id(&self, remote_id: i64) -> DbErrorResult<Option<PuppetRecord>> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE remote_id = ?"))
            .bind(remote_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_puppet).transpose()
    }

    pub async fn find_by_custom_identity(
        &self,
        identity: &str,
    ) -> DbErrorResult<Option<PuppetRecord>> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE custom_mxid = ?"))
            .bind(identity)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_puppet).transpose()
    }

    pub async fn find_all_with_custom_identity(&self) -> DbErrorResult<Vec<PuppetRecord>> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE custom_mxid IS NOT NULL ORDER BY remote_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_puppet).collect()
    }
}

fn binding_columns(puppet: &PuppetRecord) -> (Option<&str>, Option<&str>) {
    match &puppet.custom {
        Some(binding) => (
            Some(binding.identity.as_str()),
            binding.access_token.as_deref(),
        ),
        None => (None, None),
    }
}

fn row_to_puppet(row: &SqliteRow) -> DbErrorResult<PuppetRecord> {
    let custom_mxid: Option<String> = row.try_get("custom_mxid")?;
    let access_token: Option<String> = row.try_get("access_token")?;

    Ok(PuppetRecord {
        remote_id: row.try_get("remote_id")?,
        username: row.try_get("username")?,
        name: row.try_get("name")?,
        name_set: row.try_get("name_set")?,
        avatar_id: row.try_get("avatar_id")?,
        avatar_set: row.try_get("avatar_set")?,
        avatar_url: row.try_get("avatar_url")?,
        contact_info_set: row.try_get("contact_info_set")?,
        custom: custom_mxid.map(|identity| CustomBinding {
            identity,
            access_token,
        }),
    })
}
