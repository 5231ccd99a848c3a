//! GraphQL object types and the row-to-API conversions.
//!
//! The one non-obvious mapping here is record content: the store keeps a
//! generic JSON column plus a `record_type` discriminator, while the API
//! exposes a typed union. [`RecordContent::decode`] reconstructs the active
//! variant from the discriminator and fails loudly on anything it does not
//! recognize.

use async_graphql::{ComplexObject, Context, ErrorExtensions, Result, SimpleObject, Union};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::record_repo::RecordRow;
use crate::db::zone_repo::ZoneRow;
use crate::db::{Db, record_repo};
use crate::error::AppError;

/// Content of an address record.
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
pub struct RecordA {
    pub ip: String,
}

/// Content of a mail-exchange record.
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
pub struct RecordMx {
    pub host: String,
    pub priority: i32,
}

/// Content of an alias record.
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
pub struct RecordCname {
    pub target: String,
}

/// Typed record payload. The active variant is selected by the owning
/// record's `record_type` discriminator.
#[derive(Debug, Clone, Union)]
pub enum RecordContent {
    A(RecordA),
    Mx(RecordMx),
    Cname(RecordCname),
}

impl RecordContent {
    /// The `record_type` value this payload belongs to.
    pub fn discriminator(&self) -> &'static str {
        match self {
            RecordContent::A(_) => "A",
            RecordContent::Mx(_) => "MX",
            RecordContent::Cname(_) => "CNAME",
        }
    }

    /// Rebuild the typed payload from the discriminator plus the raw JSON
    /// column. An unknown discriminator or malformed payload is an
    /// `InvalidContent` error, never a silently absent field.
    pub fn decode(record_type: &str, raw: &str) -> Result<Self, AppError> {
        let invalid = |_| AppError::InvalidContent(record_type.to_string());
        match record_type {
            "A" => serde_json::from_str::<RecordA>(raw)
                .map(RecordContent::A)
                .map_err(invalid),
            "MX" => serde_json::from_str::<RecordMx>(raw)
                .map(RecordContent::Mx)
                .map_err(invalid),
            "CNAME" => serde_json::from_str::<RecordCname>(raw)
                .map(RecordContent::Cname)
                .map_err(invalid),
            other => Err(AppError::InvalidContent(other.to_string())),
        }
    }

    /// Serialize the payload into the generic content column.
    pub fn encode(&self) -> Result<String, AppError> {
        let raw = match self {
            RecordContent::A(a) => serde_json::to_string(a),
            RecordContent::Mx(mx) => serde_json::to_string(mx),
            RecordContent::Cname(cname) => serde_json::to_string(cname),
        };
        raw.map_err(|_| AppError::InvalidContent(self.discriminator().to_string()))
    }
}

/// A single DNS resource record belonging to one zone.
#[derive(Debug, Clone, SimpleObject)]
pub struct Record {
    pub id: i64,
    pub name: String,
    /// Name of the owning zone as it was when the record was created.
    pub zone: String,
    pub ttl: i32,
    pub content: RecordContent,
    pub record_type: String,
    pub zone_id: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<RecordRow> for Record {
    type Error = AppError;

    fn try_from(row: RecordRow) -> Result<Self, AppError> {
        let content = RecordContent::decode(&row.record_type, &row.content)?;
        Ok(Record {
            id: row.id,
            name: row.name,
            zone: row.zone,
            ttl: row.ttl,
            content,
            record_type: row.record_type,
            zone_id: row.zone_id,
            created_at: row.created_at,
        })
    }
}

/// A DNS zone, a named container for records.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Zone {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<ZoneRow> for Zone {
    fn from(row: ZoneRow) -> Self {
        Zone {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[ComplexObject]
impl Zone {
    /// Connection page of this zone's records, independent of the top-level
    /// `records` query.
    async fn records_connection(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 0)] offset: i64,
        #[graphql(default = 10)] size: i64,
    ) -> Result<ZoneRecordsConnection> {
        let db = ctx.data_unchecked::<Db>();

        let (rows, has_next) = record_repo::page_by_zone(db, self.id, offset, size.max(0))
            .await
            .map_err(|err| AppError::from(err).extend())?;

        let edges = rows
            .into_iter()
            .map(|row| {
                let node = Record::try_from(row)?;
                Ok(ZoneRecordsEdge {
                    cursor: cursor::encode(node.id),
                    node,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()
            .map_err(|err| err.extend())?;

        Ok(ZoneRecordsConnection {
            page_info: PageInfo {
                has_next_page: has_next,
            },
            edges,
        })
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct PageInfo {
    pub has_next_page: bool,
}

/// Edge type: one record plus its opaque position marker.
#[derive(Debug, Clone, SimpleObject)]
pub struct ZoneRecordsEdge {
    pub cursor: String,
    pub node: Record,
}

/// Connection type.
///
/// See: <https://www.apollographql.com/blog/graphql/explaining-graphql-connections>
#[derive(Debug, Clone, SimpleObject)]
pub struct ZoneRecordsConnection {
    pub page_info: PageInfo,
    pub edges: Vec<ZoneRecordsEdge>,
}

/// Result wrapper for delete mutations: the id that was targeted.
#[derive(Debug, Clone, SimpleObject)]
pub struct ObjectId {
    pub id: i64,
}

/// Opaque pagination cursors: record id as 4-byte little-endian, base64'd.
pub mod cursor {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    use crate::error::AppError;

    pub fn encode(id: i64) -> String {
        STANDARD.encode((id as u32).to_le_bytes())
    }

    pub fn decode(cursor: &str) -> Result<i64, AppError> {
        let bytes = STANDARD.decode(cursor).map_err(|_| AppError::InvalidCursor)?;
        let bytes: [u8; 4] = bytes.try_into().map_err(|_| AppError::InvalidCursor)?;
        Ok(u32::from_le_bytes(bytes) as i64)
    }
}
