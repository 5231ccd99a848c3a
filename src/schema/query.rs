//! Read-side resolvers.
use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::db::{Db, record_repo, zone_repo};
use crate::error::AppError;
use crate::schema::types::{Record, Zone};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Zones ordered newest-first, paged by offset/limit.
    async fn zones(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 0)] offset: i64,
        #[graphql(default = 10)] size: i64,
    ) -> Result<Vec<Zone>> {
        let db = ctx.data_unchecked::<Db>();

        let rows = zone_repo::list(db, offset, size.max(0))
            .await
            .map_err(|err| AppError::from(err).extend())?;

        Ok(rows.into_iter().map(Zone::from).collect())
    }

    /// A single zone by id.
    async fn zone(&self, ctx: &Context<'_>, zone_id: i64) -> Result<Zone> {
        let db = ctx.data_unchecked::<Db>();

        let row = zone_repo::find_by_id(db, zone_id)
            .await
            .map_err(|err| AppError::from(err).extend())?
            .ok_or_else(|| AppError::zone_not_found(zone_id).extend())?;

        Ok(Zone::from(row))
    }

    /// All records, or only those of one zone when `zoneId` is positive.
    /// `zoneId: 0` (the default) means no filter.
    async fn records(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 0)] zone_id: i64,
    ) -> Result<Vec<Record>> {
        let db = ctx.data_unchecked::<Db>();

        let rows = if zone_id > 0 {
            record_repo::list_by_zone(db, zone_id).await
        } else {
            record_repo::list_all(db).await
        }
        .map_err(|err| AppError::from(err).extend())?;

        rows.into_iter()
            .map(|row| Record::try_from(row).map_err(|err| err.extend()))
            .collect()
    }

    /// A single record by id.
    async fn record(&self, ctx: &Context<'_>, record_id: i64) -> Result<Record> {
        let db = ctx.data_unchecked::<Db>();

        let row = record_repo::find_by_id(db, record_id)
            .await
            .map_err(|err| AppError::from(err).extend())?
            .ok_or_else(|| AppError::record_not_found(record_id).extend())?;

        Record::try_from(row).map_err(|err| err.extend())
    }
}
