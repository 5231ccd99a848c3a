//! Repository functions for manipulating rows in the `zones` table.
use chrono::{DateTime, Utc};
use sqlx::{Row, Sqlite};

/// Application-level representation of a stored zone.
#[derive(Debug, Clone)]
pub struct ZoneRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> ZoneRow {
    ZoneRow {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}

/// List zones newest-first, paged by offset/limit.
pub async fn list<'e, E>(db: E, offset: i64, size: i64) -> sqlx::Result<Vec<ZoneRow>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        r#"
        SELECT id, name, created_at
        FROM zones
        ORDER BY id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(size)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(rows.iter().map(map_row).collect())
}

/// Fetch a single zone, or `None` when no row matches.
pub async fn find_by_id<'e, E>(db: E, zone_id: i64) -> sqlx::Result<Option<ZoneRow>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r#"
        SELECT id, name, created_at
        FROM zones
        WHERE id = ?
        "#,
    )
    .bind(zone_id)
    .fetch_optional(db)
    .await?;

    Ok(row.as_ref().map(map_row))
}

/// Create a new zone row; the store assigns the id and we assign the timestamp.
pub async fn insert<'e, E>(db: E, name: &str) -> sqlx::Result<ZoneRow>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let now = Utc::now();

    let res = sqlx::query(
        r#"
        INSERT INTO zones (name, created_at)
        VALUES (?, ?)
        "#,
    )
    .bind(name)
    .bind(now)
    .execute(db)
    .await?;

    Ok(ZoneRow {
        id: res.last_insert_rowid(),
        name: name.to_string(),
        created_at: now,
    })
}

/// Rename a zone. Returns the number of rows affected (0 when the id is unknown).
pub async fn update_name<'e, E>(db: E, zone_id: i64, name: &str) -> sqlx::Result<u64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(
        r#"
        UPDATE zones
        SET name = ?
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(zone_id)
    .execute(db)
    .await?;

    Ok(res.rows_affected())
}

/// Delete a zone by id. Deleting an unknown id affects zero rows and is not an error.
pub async fn delete<'e, E>(db: E, zone_id: i64) -> sqlx::Result<u64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query("DELETE FROM zones WHERE id = ?")
        .bind(zone_id)
        .execute(db)
        .await?;

    Ok(res.rows_affected())
}
