//! Crop repository: crops with their varieties and inspection-stage templates.
//!
//! Varieties and stages are owned by the crop and deleted with it. When
//! `replace_children` is set on update, stages are replaced wholesale and
//! varieties are merged by name: surviving names keep their ids, so records
//! already pointing at them stay valid. A removed variety that is still
//! referenced blocks the update.

use chrono::Utc;
use stts_core::entities::{Crop, CropInspectionStage, CropVariety};
use stts_core::enums::{AuditAction, EntityType};
use stts_core::ids::{PREFIX_CROP, PREFIX_CROP_STAGE, PREFIX_VARIETY};
use stts_core::permissions::Permission;

use crate::error::DatabaseError;
use crate::helpers::{SetClauses, get_opt_u32, get_u32, parse_datetime, require_text};
use crate::service::SttsService;
use crate::updates::crop::{CropUpdate, StageTemplate};

fn row_to_variety(row: &libsql::Row) -> Result<CropVariety, DatabaseError> {
    Ok(CropVariety {
        id: row.get(0)?,
        crop_id: row.get(1)?,
        name: row.get(2)?,
    })
}

/// Tables whose rows point at a crop variety.
const VARIETY_REFERENCES: [&str; 5] = [
    "permit_items",
    "declared_crops",
    "planting_returns",
    "lab_inspections",
    "stock_records",
];

fn row_to_stage(row: &libsql::Row) -> Result<CropInspectionStage, DatabaseError> {
    Ok(CropInspectionStage {
        id: row.get(0)?,
        crop_id: row.get(1)?,
        position: get_u32(row, 2)?,
        name: row.get(3)?,
        period_after_planting_days: get_opt_u32(row, 4)?,
    })
}

impl SttsService {
    pub async fn create_crop(
        &self,
        name: &str,
        varieties: &[String],
        stages: Vec<StageTemplate>,
    ) -> Result<Crop, DatabaseError> {
        self.authorize(Permission::ManageCrops)?;
        let name = require_text("crop name", name)?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CROP).await?;

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "INSERT INTO crops (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![id.as_str(), name, now.to_rfc3339(), now.to_rfc3339()],
        )
        .await?;
        self.insert_crop_children(&tx, &id, varieties, &stages).await?;
        self.record_audit(&tx, EntityType::Crop, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        self.get_crop(&id).await
    }

    async fn insert_crop_children(
        &self,
        conn: &libsql::Connection,
        crop_id: &str,
        varieties: &[String],
        stages: &[StageTemplate],
    ) -> Result<(), DatabaseError> {
        for variety in varieties {
            self.insert_variety(conn, crop_id, require_text("variety name", variety)?)
                .await?;
        }
        self.insert_stage_templates(conn, crop_id, stages).await
    }

    async fn insert_variety(
        &self,
        conn: &libsql::Connection,
        crop_id: &str,
        name: &str,
    ) -> Result<(), DatabaseError> {
        let vid = self.db().generate_id(PREFIX_VARIETY).await?;
        conn.execute(
            "INSERT INTO crop_varieties (id, crop_id, name) VALUES (?1, ?2, ?3)",
            libsql::params![vid.as_str(), crop_id, name],
        )
        .await?;
        Ok(())
    }

    async fn insert_stage_templates(
        &self,
        conn: &libsql::Connection,
        crop_id: &str,
        stages: &[StageTemplate],
    ) -> Result<(), DatabaseError> {
        for (position, stage) in (1_i64..).zip(stages) {
            let stage_name = require_text("stage name", &stage.name)?;
            let sid = self.db().generate_id(PREFIX_CROP_STAGE).await?;
            conn.execute(
                "INSERT INTO crop_inspection_stages (id, crop_id, position, name, period_after_planting_days)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    sid.as_str(),
                    crop_id,
                    position,
                    stage_name,
                    stage.period_after_planting_days.map(i64::from)
                ],
            )
            .await?;
        }
        Ok(())
    }

    /// Whether any workflow or stock record points at the variety.
    async fn variety_in_use(
        &self,
        conn: &libsql::Connection,
        variety_id: &str,
    ) -> Result<bool, DatabaseError> {
        for table in VARIETY_REFERENCES {
            let mut rows = conn
                .query(
                    &format!("SELECT 1 FROM {table} WHERE crop_variety_id = ?1 LIMIT 1"),
                    [variety_id],
                )
                .await?;
            if rows.next().await?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Bring the crop's varieties in line with `names`, keeping the ids of
    /// names that survive.
    async fn merge_varieties(
        &self,
        conn: &libsql::Connection,
        crop_id: &str,
        existing: &[CropVariety],
        names: &[String],
    ) -> Result<(), DatabaseError> {
        let mut wanted: Vec<&str> = Vec::with_capacity(names.len());
        for name in names {
            let name = require_text("variety name", name)?;
            if !wanted.contains(&name) {
                wanted.push(name);
            }
        }

        for variety in existing {
            if wanted.contains(&variety.name.as_str()) {
                continue;
            }
            if self.variety_in_use(conn, &variety.id).await? {
                return Err(DatabaseError::validation(format!(
                    "crop variety '{}' ({}) is still used by existing records",
                    variety.name, variety.id
                )));
            }
            conn.execute("DELETE FROM crop_varieties WHERE id = ?1", [variety.id.as_str()])
                .await?;
        }

        for name in wanted {
            if !existing.iter().any(|v| v.name == name) {
                self.insert_variety(conn, crop_id, name).await?;
            }
        }
        Ok(())
    }

    pub async fn get_crop(&self, id: &str) -> Result<Crop, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, name, created_at, updated_at FROM crops WHERE id = ?1",
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Crop, id))?;
        Ok(Crop {
            id: row.get(0)?,
            name: row.get(1)?,
            varieties: self.varieties_for(id).await?,
            inspection_stages: self.stage_templates_for(id).await?,
            created_at: parse_datetime(&row.get::<String>(2)?)?,
            updated_at: parse_datetime(&row.get::<String>(3)?)?,
        })
    }

    pub async fn list_crops(&self, limit: u32) -> Result<Vec<Crop>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT id FROM crops ORDER BY name LIMIT {limit}"), ())
            .await?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<String>(0)?);
        }
        let mut crops = Vec::with_capacity(ids.len());
        for id in ids {
            crops.push(self.get_crop(&id).await?);
        }
        Ok(crops)
    }

    async fn varieties_for(&self, crop_id: &str) -> Result<Vec<CropVariety>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, crop_id, name FROM crop_varieties WHERE crop_id = ?1 ORDER BY name",
                [crop_id],
            )
            .await?;
        let mut varieties = Vec::new();
        while let Some(row) = rows.next().await? {
            varieties.push(row_to_variety(&row)?);
        }
        Ok(varieties)
    }

    async fn stage_templates_for(
        &self,
        crop_id: &str,
    ) -> Result<Vec<CropInspectionStage>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, crop_id, position, name, period_after_planting_days
                 FROM crop_inspection_stages WHERE crop_id = ?1 ORDER BY position",
                [crop_id],
            )
            .await?;
        let mut stages = Vec::new();
        while let Some(row) = rows.next().await? {
            stages.push(row_to_stage(&row)?);
        }
        Ok(stages)
    }

    pub async fn get_variety(&self, id: &str) -> Result<CropVariety, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, crop_id, name FROM crop_varieties WHERE id = ?1",
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::validation(format!("unknown crop variety {id}")))?;
        row_to_variety(&row)
    }

    /// Inspection-stage templates of the crop a variety belongs to.
    pub async fn stage_templates_for_variety(
        &self,
        variety_id: &str,
    ) -> Result<Vec<CropInspectionStage>, DatabaseError> {
        let variety = self.get_variety(variety_id).await?;
        self.stage_templates_for(&variety.crop_id).await
    }

    /// Update a crop. With `replace_children`, the varieties and stages given in
    /// `update` replace the existing ones (an absent list clears them).
    ///
    /// # Errors
    ///
    /// `DatabaseError::Validation` when a variety that records still point at
    /// would be removed.
    pub async fn update_crop(
        &self,
        id: &str,
        update: CropUpdate,
        replace_children: bool,
    ) -> Result<Crop, DatabaseError> {
        self.authorize(Permission::ManageCrops)?;
        let current = self.get_crop(id).await?;

        let mut sets = SetClauses::new();
        if let Some(ref name) = update.name {
            sets.push("name", require_text("crop name", name)?.to_string());
        }

        let now = Utc::now();
        let tx = self.db().conn().transaction().await?;
        if replace_children || !sets.is_empty() {
            let (sql, params) = sets.into_update("crops", id, now);
            tx.execute(&sql, libsql::params_from_iter(params)).await?;
        }
        if replace_children {
            self.merge_varieties(
                &tx,
                id,
                &current.varieties,
                update.varieties.as_deref().unwrap_or_default(),
            )
            .await?;
            tx.execute("DELETE FROM crop_inspection_stages WHERE crop_id = ?1", [id])
                .await?;
            self.insert_stage_templates(&tx, id, update.stages.as_deref().unwrap_or_default())
                .await?;
        }
        self.record_audit(
            &tx,
            EntityType::Crop,
            id,
            AuditAction::Updated,
            Some(serde_json::json!({
                "changes": serde_json::to_value(&update)?,
                "replace_children": replace_children,
            })),
        )
        .await?;
        tx.commit().await?;

        self.get_crop(id).await
    }

    pub async fn delete_crop(&self, id: &str) -> Result<(), DatabaseError> {
        self.authorize(Permission::ManageCrops)?;
        let tx = self.db().conn().transaction().await?;
        for variety in self.varieties_for(id).await? {
            if self.variety_in_use(&tx, &variety.id).await? {
                return Err(DatabaseError::validation(format!(
                    "crop variety '{}' ({}) is still used by existing records",
                    variety.name, variety.id
                )));
            }
        }
        let changed = tx.execute("DELETE FROM crops WHERE id = ?1", [id]).await?;
        if changed == 0 {
            return Err(DatabaseError::not_found(EntityType::Crop, id));
        }
        self.record_audit(&tx, EntityType::Crop, id, AuditAction::Deleted, None)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::planting_return::NewPlantingReturn;
    use crate::test_support::helpers::{Fixture, crop_with_stages, fixture};
    use crate::updates::crop::CropUpdateBuilder;
    use stts_core::enums::SeedClass;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_crop_with_children() {
        let Fixture { svc, .. } = fixture().await;
        let crop = crop_with_stages(&svc, &["Pre-flowering", "Flowering", "Pre-harvest"]).await;

        assert!(crop.id.starts_with("crp-"));
        assert_eq!(crop.varieties.len(), 1);
        let positions: Vec<u32> = crop.inspection_stages.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(crop.inspection_stages[1].name, "Flowering");
    }

    #[tokio::test]
    async fn update_without_replace_keeps_children() {
        let Fixture { svc, .. } = fixture().await;
        let crop = crop_with_stages(&svc, &["Flowering"]).await;

        let update = CropUpdateBuilder::new()
            .name("Hybrid maize")
            .varieties(vec!["Ignored".into()])
            .build();
        let updated = svc.update_crop(&crop.id, update, false).await.unwrap();
        assert_eq!(updated.name, "Hybrid maize");
        assert_eq!(updated.varieties, crop.varieties);
        assert_eq!(updated.inspection_stages, crop.inspection_stages);
    }

    #[tokio::test]
    async fn update_with_replace_swaps_children() {
        let Fixture { svc, .. } = fixture().await;
        let crop = crop_with_stages(&svc, &["Flowering"]).await;

        let update = CropUpdateBuilder::new()
            .varieties(vec!["Longe 10H".into(), "Bazooka".into()])
            .stages(vec![
                StageTemplate {
                    name: "Vegetative".into(),
                    period_after_planting_days: Some(30),
                },
                StageTemplate {
                    name: "Pre-harvest".into(),
                    period_after_planting_days: Some(90),
                },
            ])
            .build();
        let updated = svc.update_crop(&crop.id, update, true).await.unwrap();
        let names: Vec<&str> = updated.varieties.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Bazooka", "Longe 10H"]);
        assert_eq!(updated.inspection_stages.len(), 2);
        assert_eq!(updated.inspection_stages[0].period_after_planting_days, Some(30));
    }

    async fn planted(svc: &SttsService, variety_id: &str) -> String {
        svc.create_planting_return(NewPlantingReturn {
            crop_variety_id: variety_id.to_string(),
            seed_class: SeedClass::Certified,
            location: "Masaka".into(),
            area_planted: 1.0,
            quantity_planted: 20.0,
            date_planted: None,
            lot_number: None,
        })
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn replace_keeps_varieties_in_use() {
        let Fixture { svc, .. } = fixture().await;
        let crop = crop_with_stages(&svc, &["Flowering"]).await;
        let used = crop.varieties[0].clone();
        let return_id = planted(&svc, &used.id).await;

        let update = CropUpdateBuilder::new()
            .varieties(vec!["Longe 5".into(), "Longe 10".into()])
            .stages(vec![StageTemplate {
                name: "Pre-harvest".into(),
                period_after_planting_days: Some(90),
            }])
            .build();
        let updated = svc.update_crop(&crop.id, update, true).await.unwrap();

        let kept = updated
            .varieties
            .iter()
            .find(|v| v.name == "Longe 5")
            .expect("surviving variety");
        assert_eq!(kept.id, used.id);
        assert_eq!(updated.varieties.len(), 2);
        assert_eq!(updated.inspection_stages[0].name, "Pre-harvest");
        let stored = svc.get_planting_return(&return_id).await.unwrap();
        assert_eq!(stored.crop_variety_id, used.id);
    }

    #[tokio::test]
    async fn replace_refuses_to_drop_variety_in_use() {
        let Fixture { svc, .. } = fixture().await;
        let crop = crop_with_stages(&svc, &["Flowering"]).await;
        planted(&svc, &crop.varieties[0].id).await;

        let update = CropUpdateBuilder::new()
            .varieties(vec!["Longe 10".into()])
            .build();
        let result = svc.update_crop(&crop.id, update, true).await;
        match result {
            Err(DatabaseError::Validation(message)) => assert!(message.contains("Longe 5")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(svc.get_crop(&crop.id).await.unwrap().varieties, crop.varieties);
    }

    #[tokio::test]
    async fn delete_refuses_crop_in_use() {
        let Fixture { svc, .. } = fixture().await;
        let crop = crop_with_stages(&svc, &["Flowering"]).await;
        planted(&svc, &crop.varieties[0].id).await;

        let result = svc.delete_crop(&crop.id).await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
        assert!(svc.get_crop(&crop.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_cascades_children() {
        let Fixture { svc, .. } = fixture().await;
        let crop = crop_with_stages(&svc, &["Flowering"]).await;
        let variety_id = crop.varieties[0].id.clone();

        svc.delete_crop(&crop.id).await.unwrap();
        assert!(matches!(
            svc.get_crop(&crop.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(svc.get_variety(&variety_id).await.is_err());
    }
}
