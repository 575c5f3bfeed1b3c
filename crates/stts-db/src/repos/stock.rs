//! Seed stock repository.

use chrono::Utc;
use stts_core::entities::StockRecord;
use stts_core::enums::{AuditAction, EntityType, SeedClass};
use stts_core::ids::PREFIX_STOCK;
use stts_core::permissions::Permission;

use crate::error::DatabaseError;
use crate::helpers::{
    SetClauses, get_opt_string, opt_value, parse_datetime, parse_enum, require_positive,
    require_text,
};
use crate::service::SttsService;
use crate::updates::stock::StockUpdate;

const SELECT_COLS: &str = "id, owner_id, lot_number, crop_variety_id, seed_class, quantity, source, \
     created_at, updated_at";

fn row_to_stock(row: &libsql::Row) -> Result<StockRecord, DatabaseError> {
    Ok(StockRecord {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        lot_number: row.get(2)?,
        crop_variety_id: row.get(3)?,
        seed_class: parse_enum(&row.get::<String>(4)?)?,
        quantity: row.get(5)?,
        source: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

#[derive(Debug, Clone)]
pub struct NewStockRecord {
    pub lot_number: String,
    pub crop_variety_id: String,
    pub seed_class: SeedClass,
    pub quantity: f64,
    pub source: Option<String>,
}

impl SttsService {
    pub async fn create_stock_record(
        &self,
        new: NewStockRecord,
    ) -> Result<StockRecord, DatabaseError> {
        let owner_id = self.authorize(Permission::Apply)?.user_id.clone();
        let lot_number = require_text("lot number", &new.lot_number)?.to_string();
        require_positive("quantity", new.quantity)?;
        self.get_variety(&new.crop_variety_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_STOCK).await?;
        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO stock_records ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
            ),
            libsql::params![
                id.as_str(),
                owner_id.as_str(),
                lot_number.as_str(),
                new.crop_variety_id.as_str(),
                new.seed_class.as_str(),
                new.quantity,
                new.source.as_deref(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.record_audit(&tx, EntityType::StockRecord, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        Ok(StockRecord {
            id,
            owner_id,
            lot_number,
            crop_variety_id: new.crop_variety_id,
            seed_class: new.seed_class,
            quantity: new.quantity,
            source: new.source,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_stock_record(&self, id: &str) -> Result<StockRecord, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM stock_records WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::StockRecord, id))?;
        row_to_stock(&row)
    }

    pub async fn list_stock_records(
        &self,
        owner_id: Option<&str>,
        lot_number: Option<&str>,
        limit: u32,
    ) -> Result<Vec<StockRecord>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(owner_id) = owner_id {
            params.push(owner_id.into());
            conditions.push(format!("owner_id = ?{}", params.len()));
        }
        if let Some(lot) = lot_number {
            params.push(lot.trim().into());
            conditions.push(format!("lot_number = ?{}", params.len()));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM stock_records {where_clause} \
                     ORDER BY created_at DESC LIMIT {limit}"
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_stock(&row)?);
        }
        Ok(records)
    }

    pub async fn latest_stock_for_lot(
        &self,
        lot_number: &str,
    ) -> Result<Option<StockRecord>, DatabaseError> {
        let mut records = self.list_stock_records(None, Some(lot_number), 1).await?;
        Ok(records.pop())
    }

    pub async fn update_stock_record(
        &self,
        id: &str,
        update: StockUpdate,
    ) -> Result<StockRecord, DatabaseError> {
        let current = self.get_stock_record(id).await?;
        self.authorize_owner(&current.owner_id)?;

        let mut sets = SetClauses::new();
        if let Some(quantity) = update.quantity {
            if !quantity.is_finite() || quantity < 0.0 {
                return Err(DatabaseError::validation(format!(
                    "stock quantity cannot be {quantity}"
                )));
            }
            sets.push("quantity", quantity);
        }
        if let Some(ref source) = update.source {
            sets.push("source", opt_value(source.clone()));
        }
        if sets.is_empty() {
            return Ok(current);
        }

        let (sql, params) = sets.into_update("stock_records", id, Utc::now());
        let tx = self.db().conn().transaction().await?;
        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        self.record_audit(
            &tx,
            EntityType::StockRecord,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update)?),
        )
        .await?;
        tx.commit().await?;
        self.get_stock_record(id).await
    }

    pub async fn delete_stock_record(&self, id: &str) -> Result<(), DatabaseError> {
        let current = self.get_stock_record(id).await?;
        self.authorize_owner(&current.owner_id)?;

        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM stock_records WHERE id = ?1", [id])
            .await?;
        self.record_audit(&tx, EntityType::StockRecord, id, AuditAction::Deleted, None)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{Fixture, act_as, crop_with_stages, fixture};
    use pretty_assertions::assert_eq;

    fn new_stock(variety_id: &str, quantity: f64) -> NewStockRecord {
        NewStockRecord {
            lot_number: "LOT-S1".into(),
            crop_variety_id: variety_id.to_string(),
            seed_class: SeedClass::Basic,
            quantity,
            source: Some("Own production".into()),
        }
    }

    #[tokio::test]
    async fn owner_is_the_caller() {
        let mut fx = fixture().await;
        let crop = crop_with_stages(&fx.svc, &[]).await;
        act_as(&mut fx.svc, &fx.applicant).await;
        let record = fx
            .svc
            .create_stock_record(new_stock(&crop.varieties[0].id, 300.0))
            .await
            .unwrap();
        assert_eq!(record.owner_id, fx.applicant);

        let latest = fx.svc.latest_stock_for_lot("LOT-S1").await.unwrap();
        assert_eq!(latest.map(|r| r.id), Some(record.id));
    }

    #[tokio::test]
    async fn non_owner_cannot_update() {
        let mut fx = fixture().await;
        let crop = crop_with_stages(&fx.svc, &[]).await;
        let record = fx
            .svc
            .create_stock_record(new_stock(&crop.varieties[0].id, 300.0))
            .await
            .unwrap();
        act_as(&mut fx.svc, &fx.applicant).await;
        let result = fx
            .svc
            .update_stock_record(
                &record.id,
                StockUpdate {
                    quantity: Some(10.0),
                    ..StockUpdate::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::NotPermitted(_))));
    }

    #[tokio::test]
    async fn zero_quantity_rejected_on_create() {
        let fx = fixture().await;
        let crop = crop_with_stages(&fx.svc, &[]).await;
        let result = fx
            .svc
            .create_stock_record(new_stock(&crop.varieties[0].id, 0.0))
            .await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }
}
