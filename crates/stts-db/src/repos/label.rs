//! Seed label repository.

use chrono::Utc;
use stts_core::entities::SeedLabel;
use stts_core::enums::{AuditAction, EntityType, LabStatus, LabelStatus, WorkflowAction};
use stts_core::ids::PREFIX_LABEL;
use stts_core::permissions::Permission;

use crate::error::DatabaseError;
use crate::helpers::{SetClauses, get_opt_string, parse_datetime, parse_enum, require_positive};
use crate::service::SttsService;
use crate::updates::lab::SeedLabelUpdate;
use crate::workflow::StatusChange;

const SELECT_COLS: &str = "id, applicant_id, lab_inspection_id, lot_number, quantity, status, \
     status_comment, created_at, updated_at";

const EDITABLE: &[LabelStatus] = &[LabelStatus::Pending];

fn row_to_label(row: &libsql::Row) -> Result<SeedLabel, DatabaseError> {
    Ok(SeedLabel {
        id: row.get(0)?,
        applicant_id: row.get(1)?,
        lab_inspection_id: row.get(2)?,
        lot_number: row.get(3)?,
        quantity: row.get(4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        status_comment: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl SttsService {
    /// Request labels for a tested lot.
    ///
    /// The lab record must be marketable and the labelled quantity cannot
    /// exceed what the lab tested.
    pub async fn create_seed_label(
        &self,
        lab_inspection_id: &str,
        quantity: f64,
    ) -> Result<SeedLabel, DatabaseError> {
        let applicant_id = self.authorize(Permission::Apply)?.user_id.clone();
        require_positive("label quantity", quantity)?;
        let lab = self.get_lab_inspection(lab_inspection_id).await?;
        if lab.status != LabStatus::Marketable {
            return Err(DatabaseError::validation(format!(
                "lot {} is {}, labels need a marketable lab record",
                lab.lot_number, lab.status
            )));
        }
        if quantity > lab.quantity {
            return Err(DatabaseError::validation(format!(
                "label quantity {quantity} exceeds tested quantity {}",
                lab.quantity
            )));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_LABEL).await?;
        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO seed_labels ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, ?7, ?8)"
            ),
            libsql::params![
                id.as_str(),
                applicant_id.as_str(),
                lab.id.as_str(),
                lab.lot_number.as_str(),
                quantity,
                LabelStatus::Pending.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.record_audit(&tx, EntityType::SeedLabel, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        Ok(SeedLabel {
            id,
            applicant_id,
            lab_inspection_id: lab.id,
            lot_number: lab.lot_number,
            quantity,
            status: LabelStatus::Pending,
            status_comment: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_seed_label(&self, id: &str) -> Result<SeedLabel, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM seed_labels WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::SeedLabel, id))?;
        row_to_label(&row)
    }

    pub async fn list_seed_labels(
        &self,
        status: Option<LabelStatus>,
        lot_number: Option<&str>,
        limit: u32,
    ) -> Result<Vec<SeedLabel>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(status) = status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
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
                    "SELECT {SELECT_COLS} FROM seed_labels {where_clause} \
                     ORDER BY created_at DESC LIMIT {limit}"
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut labels = Vec::new();
        while let Some(row) = rows.next().await? {
            labels.push(row_to_label(&row)?);
        }
        Ok(labels)
    }

    /// Latest approved or printed label for a lot.
    pub async fn latest_issued_label_for_lot(
        &self,
        lot_number: &str,
    ) -> Result<Option<SeedLabel>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM seed_labels
                     WHERE lot_number = ?1 AND status IN (?2, ?3)
                     ORDER BY created_at DESC, rowid DESC LIMIT 1"
                ),
                libsql::params![
                    lot_number.trim(),
                    LabelStatus::Approved.as_str(),
                    LabelStatus::Printed.as_str()
                ],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_label(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_seed_label(
        &self,
        id: &str,
        update: SeedLabelUpdate,
    ) -> Result<SeedLabel, DatabaseError> {
        let current = self.get_seed_label(id).await?;
        self.authorize_owner(&current.applicant_id)?;
        Self::ensure_editable(EntityType::SeedLabel, id, current.status, EDITABLE)?;

        let mut sets = SetClauses::new();
        if let Some(quantity) = update.quantity {
            require_positive("label quantity", quantity)?;
            let lab = self.get_lab_inspection(&current.lab_inspection_id).await?;
            if quantity > lab.quantity {
                return Err(DatabaseError::validation(format!(
                    "label quantity {quantity} exceeds tested quantity {}",
                    lab.quantity
                )));
            }
            sets.push("quantity", quantity);
        }
        if sets.is_empty() {
            return Ok(current);
        }

        let (sql, params) = sets.into_update("seed_labels", id, Utc::now());
        let tx = self.db().conn().transaction().await?;
        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        self.record_audit(
            &tx,
            EntityType::SeedLabel,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update)?),
        )
        .await?;
        tx.commit().await?;
        self.get_seed_label(id).await
    }

    pub async fn delete_seed_label(&self, id: &str) -> Result<(), DatabaseError> {
        let current = self.get_seed_label(id).await?;
        self.authorize_owner(&current.applicant_id)?;
        Self::ensure_editable(EntityType::SeedLabel, id, current.status, EDITABLE)?;

        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM seed_labels WHERE id = ?1", [id]).await?;
        self.record_audit(&tx, EntityType::SeedLabel, id, AuditAction::Deleted, None)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn approve_seed_label(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<LabelStatus>, DatabaseError> {
        self.authorize(Permission::Approve)?;
        self.transition::<SeedLabel>(id, WorkflowAction::Approve, comment, Vec::new())
            .await
    }

    pub async fn reject_seed_label(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<LabelStatus>, DatabaseError> {
        self.authorize(Permission::Approve)?;
        self.transition::<SeedLabel>(id, WorkflowAction::Reject, comment, Vec::new())
            .await
    }

    pub async fn print_seed_label(
        &self,
        id: &str,
    ) -> Result<StatusChange<LabelStatus>, DatabaseError> {
        self.authorize(Permission::PrintLabels)?;
        self.transition::<SeedLabel>(id, WorkflowAction::Print, None, Vec::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::lab::NewLabInspection;
    use crate::test_support::helpers::{Fixture, crop_with_stages, fixture};
    use pretty_assertions::assert_eq;

    /// A lab record for `LOT-L1`, pushed to `marketable` when asked.
    async fn lab_record(fx: &Fixture, marketable: bool) -> String {
        let crop = crop_with_stages(&fx.svc, &[]).await;
        let lab = fx
            .svc
            .create_lab_inspection(NewLabInspection {
                lot_number: "LOT-L1".into(),
                mother_lot: None,
                crop_variety_id: crop.varieties[0].id.clone(),
                quantity: 100.0,
            })
            .await
            .unwrap();
        if marketable {
            let conn = fx.svc.db().conn();
            conn.execute(
                "UPDATE lab_inspections SET status = 'marketable' WHERE id = ?1",
                [lab.id.as_str()],
            )
            .await
            .unwrap();
        }
        lab.id
    }

    #[tokio::test]
    async fn label_requires_marketable_lab_record() {
        let fx = fixture().await;
        let lab_id = lab_record(&fx, false).await;
        let result = fx.svc.create_seed_label(&lab_id, 10.0).await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[tokio::test]
    async fn label_quantity_capped_by_lab_quantity() {
        let fx = fixture().await;
        let lab_id = lab_record(&fx, true).await;
        let result = fx.svc.create_seed_label(&lab_id, 100.5).await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[tokio::test]
    async fn approve_then_print() {
        let fx = fixture().await;
        let lab_id = lab_record(&fx, true).await;
        let label = fx.svc.create_seed_label(&lab_id, 50.0).await.unwrap();
        assert_eq!(label.lot_number, "LOT-L1");
        assert!(fx.svc.latest_issued_label_for_lot("LOT-L1").await.unwrap().is_none());

        // Printing needs an approved label.
        assert!(matches!(
            fx.svc.print_seed_label(&label.id).await,
            Err(DatabaseError::InvalidTransition { .. })
        ));

        fx.svc.approve_seed_label(&label.id, None).await.unwrap();
        let change = fx.svc.print_seed_label(&label.id).await.unwrap();
        assert_eq!(change.to, LabelStatus::Printed);

        let issued = fx
            .svc
            .latest_issued_label_for_lot("LOT-L1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(issued.id, label.id);
    }

    #[tokio::test]
    async fn approved_label_is_not_editable() {
        let fx = fixture().await;
        let lab_id = lab_record(&fx, true).await;
        let label = fx.svc.create_seed_label(&lab_id, 50.0).await.unwrap();
        fx.svc.approve_seed_label(&label.id, None).await.unwrap();
        let result = fx.svc.delete_seed_label(&label.id).await;
        assert!(matches!(result, Err(DatabaseError::InvalidTransition { .. })));
    }
}
