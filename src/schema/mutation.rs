//! Write-side resolvers. Each mutation field runs in its own transaction;
//! any failure rolls the whole operation back, so a failed typed-record
//! insert never leaves a partial write behind.
use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result};
use tracing::debug;

use crate::db::record_repo::NewRecordRow;
use crate::db::{Db, record_repo, zone_repo};
use crate::error::AppError;
use crate::schema::types::{
    ObjectId, Record, RecordA, RecordCname, RecordContent, RecordMx, Zone,
};

/// Fields shared by every typed record creation.
#[derive(InputObject)]
pub struct NewRecord {
    pub name: String,
    pub zone_id: i64,
    pub ttl: i32,
}

#[derive(InputObject)]
pub struct NewARecord {
    pub common: NewRecord,
    pub ip: String,
}

#[derive(InputObject)]
pub struct NewMxRecord {
    pub common: NewRecord,
    pub host: String,
    pub priority: i32,
}

#[derive(InputObject)]
pub struct NewCnameRecord {
    pub common: NewRecord,
    pub target: String,
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a zone. The store assigns the id; the timestamp is set at insert.
    async fn add_zone(&self, ctx: &Context<'_>, name: String) -> Result<Zone> {
        let db = ctx.data_unchecked::<Db>();

        let row = zone_repo::insert(db, &name)
            .await
            .map_err(|err| AppError::from(err).extend())?;
        debug!(zone_id = row.id, name = %row.name, "zone created");

        Ok(Zone::from(row))
    }

    /// Rename a zone. Fails with a NotFound error when the id is unknown.
    async fn update_zone(&self, ctx: &Context<'_>, zone_id: i64, name: String) -> Result<Zone> {
        let db = ctx.data_unchecked::<Db>();
        update_zone_inner(db, zone_id, &name)
            .await
            .map_err(|err| err.extend())
    }

    /// Delete a zone and all of its records. Idempotent: deleting an unknown
    /// id is not an error, and the targeted id is returned either way.
    async fn delete_zone(&self, ctx: &Context<'_>, zone_id: i64) -> Result<ObjectId> {
        let db = ctx.data_unchecked::<Db>();
        delete_zone_inner(db, zone_id)
            .await
            .map_err(|err| err.extend())
    }

    /// Create an A record in the given zone.
    async fn add_a_record(&self, ctx: &Context<'_>, data: NewARecord) -> Result<Record> {
        let content = RecordContent::A(RecordA { ip: data.ip });
        insert_typed_record(ctx.data_unchecked::<Db>(), data.common, content)
            .await
            .map_err(|err| err.extend())
    }

    /// Create an MX record in the given zone.
    async fn add_mx_record(&self, ctx: &Context<'_>, data: NewMxRecord) -> Result<Record> {
        let content = RecordContent::Mx(RecordMx {
            host: data.host,
            priority: data.priority,
        });
        insert_typed_record(ctx.data_unchecked::<Db>(), data.common, content)
            .await
            .map_err(|err| err.extend())
    }

    /// Create a CNAME record in the given zone.
    async fn add_cname_record(&self, ctx: &Context<'_>, data: NewCnameRecord) -> Result<Record> {
        let content = RecordContent::Cname(RecordCname {
            target: data.target,
        });
        insert_typed_record(ctx.data_unchecked::<Db>(), data.common, content)
            .await
            .map_err(|err| err.extend())
    }

    /// Rename a record. Fails with a NotFound error when the id is unknown.
    async fn update_record(
        &self,
        ctx: &Context<'_>,
        record_id: i64,
        name: String,
    ) -> Result<Record> {
        let db = ctx.data_unchecked::<Db>();
        update_record_inner(db, record_id, &name)
            .await
            .map_err(|err| err.extend())
    }

    /// Delete a record by id. Idempotent, returns the targeted id.
    async fn delete_record(&self, ctx: &Context<'_>, record_id: i64) -> Result<ObjectId> {
        let db = ctx.data_unchecked::<Db>();

        record_repo::delete(db, record_id)
            .await
            .map_err(|err| AppError::from(err).extend())?;

        Ok(ObjectId { id: record_id })
    }
}

async fn update_zone_inner(db: &Db, zone_id: i64, name: &str) -> Result<Zone, AppError> {
    let mut tx = db.begin().await?;

    let affected = zone_repo::update_name(&mut *tx, zone_id, name).await?;
    if affected == 0 {
        return Err(AppError::zone_not_found(zone_id));
    }

    let row = zone_repo::find_by_id(&mut *tx, zone_id)
        .await?
        .ok_or_else(|| AppError::zone_not_found(zone_id))?;

    tx.commit().await?;
    Ok(Zone::from(row))
}

async fn delete_zone_inner(db: &Db, zone_id: i64) -> Result<ObjectId, AppError> {
    let mut tx = db.begin().await?;

    let records = record_repo::delete_by_zone(&mut *tx, zone_id).await?;
    let zones = zone_repo::delete(&mut *tx, zone_id).await?;

    tx.commit().await?;
    debug!(zone_id, zones, records, "zone deleted");

    Ok(ObjectId { id: zone_id })
}

async fn update_record_inner(db: &Db, record_id: i64, name: &str) -> Result<Record, AppError> {
    let mut tx = db.begin().await?;

    let affected = record_repo::update_name(&mut *tx, record_id, name).await?;
    if affected == 0 {
        return Err(AppError::record_not_found(record_id));
    }

    let row = record_repo::find_by_id(&mut *tx, record_id)
        .await?
        .ok_or_else(|| AppError::record_not_found(record_id))?;

    tx.commit().await?;
    Record::try_from(row)
}

/// Resolve the owning zone, snapshot its name, and persist the record with
/// the payload's discriminator and serialized content. One transaction: a
/// failing insert rolls back together with the zone lookup.
async fn insert_typed_record(
    db: &Db,
    common: NewRecord,
    content: RecordContent,
) -> Result<Record, AppError> {
    let mut tx = db.begin().await?;

    let zone = zone_repo::find_by_id(&mut *tx, common.zone_id)
        .await?
        .ok_or_else(|| AppError::zone_not_found(common.zone_id))?;

    let row = record_repo::insert(
        &mut *tx,
        NewRecordRow {
            zone: zone.name,
            name: common.name,
            ttl: common.ttl,
            content: content.encode()?,
            record_type: content.discriminator().to_string(),
            zone_id: common.zone_id,
        },
    )
    .await?;

    tx.commit().await?;
    debug!(
        record_id = row.id,
        record_type = %row.record_type,
        zone_id = row.zone_id,
        "record created"
    );

    Record::try_from(row)
}
