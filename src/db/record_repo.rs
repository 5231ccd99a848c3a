//! Repository functions for manipulating rows in the `records` table.
use chrono::{DateTime, Utc};
use sqlx::{Row, Sqlite};

/// Application-level representation of a stored record. The `content` column
/// holds the JSON payload whose shape is selected by `record_type`.
#[derive(Debug, Clone)]
pub struct RecordRow {
    pub id: i64,
    pub zone: String,
    pub name: String,
    pub ttl: i32,
    pub content: String,
    pub record_type: String,
    pub zone_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Column values for a record about to be inserted.
pub struct NewRecordRow {
    pub zone: String,
    pub name: String,
    pub ttl: i32,
    pub content: String,
    pub record_type: String,
    pub zone_id: i64,
}

const COLUMNS: &str = "id, zone, name, ttl, content, record_type, zone_id, created_at";

fn map_row(row: &sqlx::sqlite::SqliteRow) -> RecordRow {
    RecordRow {
        id: row.get("id"),
        zone: row.get("zone"),
        name: row.get("name"),
        ttl: row.get("ttl"),
        content: row.get("content"),
        record_type: row.get("record_type"),
        zone_id: row.get("zone_id"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}

/// List every record, oldest-first.
pub async fn list_all<'e, E>(db: E) -> sqlx::Result<Vec<RecordRow>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM records ORDER BY id"))
        .fetch_all(db)
        .await?;

    Ok(rows.iter().map(map_row).collect())
}

/// List the records belonging to one zone.
pub async fn list_by_zone<'e, E>(db: E, zone_id: i64) -> sqlx::Result<Vec<RecordRow>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM records WHERE zone_id = ? ORDER BY id"
    ))
    .bind(zone_id)
    .fetch_all(db)
    .await?;

    Ok(rows.iter().map(map_row).collect())
}

/// Fetch one page of a zone's records. Requests one row beyond `size` so the
/// caller can tell whether another page exists; the extra row is trimmed here.
pub async fn page_by_zone<'e, E>(
    db: E,
    zone_id: i64,
    offset: i64,
    size: i64,
) -> sqlx::Result<(Vec<RecordRow>, bool)>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let mut rows: Vec<RecordRow> = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM records WHERE zone_id = ? ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(zone_id)
    .bind(size + 1)
    .bind(offset)
    .fetch_all(db)
    .await?
    .iter()
    .map(map_row)
    .collect();

    let has_next = rows.len() as i64 > size;
    rows.truncate(size.max(0) as usize);

    Ok((rows, has_next))
}

/// Fetch a single record, or `None` when no row matches.
pub async fn find_by_id<'e, E>(db: E, record_id: i64) -> sqlx::Result<Option<RecordRow>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM records WHERE id = ?"))
        .bind(record_id)
        .fetch_optional(db)
        .await?;

    Ok(row.as_ref().map(map_row))
}

/// Insert a record row and return it as persisted.
pub async fn insert<'e, E>(db: E, new: NewRecordRow) -> sqlx::Result<RecordRow>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let now = Utc::now();

    let res = sqlx::query(
        r#"
        INSERT INTO records (zone, name, ttl, content, record_type, zone_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.zone)
    .bind(&new.name)
    .bind(new.ttl)
    .bind(&new.content)
    .bind(&new.record_type)
    .bind(new.zone_id)
    .bind(now)
    .execute(db)
    .await?;

    Ok(RecordRow {
        id: res.last_insert_rowid(),
        zone: new.zone,
        name: new.name,
        ttl: new.ttl,
        content: new.content,
        record_type: new.record_type,
        zone_id: new.zone_id,
        created_at: now,
    })
}

/// Rename a record. Returns the number of rows affected.
pub async fn update_name<'e, E>(db: E, record_id: i64, name: &str) -> sqlx::Result<u64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query("UPDATE records SET name = ? WHERE id = ?")
        .bind(name)
        .bind(record_id)
        .execute(db)
        .await?;

    Ok(res.rows_affected())
}

/// Delete a record by id. Unknown ids affect zero rows and are not an error.
pub async fn delete<'e, E>(db: E, record_id: i64) -> sqlx::Result<u64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query("DELETE FROM records WHERE id = ?")
        .bind(record_id)
        .execute(db)
        .await?;

    Ok(res.rows_affected())
}

/// Delete every record belonging to a zone.
pub async fn delete_by_zone<'e, E>(db: E, zone_id: i64) -> sqlx::Result<u64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query("DELETE FROM records WHERE zone_id = ?")
        .bind(zone_id)
        .execute(db)
        .await?;

    Ok(res.rows_affected())
}
