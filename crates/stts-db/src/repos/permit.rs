//! Import / export permit repository.

use chrono::Utc;
use stts_core::entities::{Permit, PermitItem};
use stts_core::enums::{AuditAction, EntityType, PermitType, ReviewStatus, WorkflowAction};
use stts_core::ids::{PREFIX_PERMIT, PREFIX_PERMIT_ITEM};
use stts_core::permissions::Permission;

use crate::error::DatabaseError;
use crate::helpers::{
    SetClauses, get_opt_string, opt_value, parse_datetime, parse_enum, require_positive,
    require_text,
};
use crate::service::SttsService;
use crate::updates::permit::{PermitItemInput, PermitUpdate};
use crate::workflow::StatusChange;

const SELECT_COLS: &str = "id, permit_type, applicant_id, country, purpose, status, inspector_id, \
     status_comment, created_at, updated_at";

const EDITABLE: &[ReviewStatus] = &[ReviewStatus::Pending, ReviewStatus::Halted];

fn row_to_permit(row: &libsql::Row) -> Result<Permit, DatabaseError> {
    Ok(Permit {
        id: row.get(0)?,
        permit_type: parse_enum(&row.get::<String>(1)?)?,
        applicant_id: row.get(2)?,
        country: row.get(3)?,
        purpose: get_opt_string(row, 4)?,
        items: Vec::new(),
        status: parse_enum(&row.get::<String>(5)?)?,
        inspector_id: get_opt_string(row, 6)?,
        status_comment: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl SttsService {
    pub async fn create_permit(
        &self,
        permit_type: PermitType,
        country: &str,
        purpose: Option<&str>,
        items: &[PermitItemInput],
    ) -> Result<Permit, DatabaseError> {
        let applicant_id = self.authorize(Permission::Apply)?.user_id.clone();
        let country = require_text("country", country)?;
        if items.is_empty() {
            return Err(DatabaseError::validation("a permit needs at least one item"));
        }
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PERMIT).await?;

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO permits ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, NULL, ?7, ?8)"
            ),
            libsql::params![
                id.as_str(),
                permit_type.as_str(),
                applicant_id.as_str(),
                country,
                purpose,
                ReviewStatus::Pending.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.insert_permit_items(&tx, &id, items).await?;
        self.record_audit(&tx, EntityType::Permit, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        self.get_permit(&id).await
    }

    async fn insert_permit_items(
        &self,
        conn: &libsql::Connection,
        permit_id: &str,
        items: &[PermitItemInput],
    ) -> Result<(), DatabaseError> {
        for item in items {
            self.get_variety(&item.crop_variety_id).await?;
            let quantity = require_positive("item quantity", item.quantity)?;
            let unit = require_text("item unit", &item.unit)?;
            let item_id = self.db().generate_id(PREFIX_PERMIT_ITEM).await?;
            conn.execute(
                "INSERT INTO permit_items (id, permit_id, crop_variety_id, quantity, unit)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    item_id.as_str(),
                    permit_id,
                    item.crop_variety_id.as_str(),
                    quantity,
                    unit
                ],
            )
            .await?;
        }
        Ok(())
    }

    async fn permit_items(&self, permit_id: &str) -> Result<Vec<PermitItem>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, permit_id, crop_variety_id, quantity, unit
                 FROM permit_items WHERE permit_id = ?1 ORDER BY rowid",
                [permit_id],
            )
            .await?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(PermitItem {
                id: row.get(0)?,
                permit_id: row.get(1)?,
                crop_variety_id: row.get(2)?,
                quantity: row.get(3)?,
                unit: row.get(4)?,
            });
        }
        Ok(items)
    }

    pub async fn get_permit(&self, id: &str) -> Result<Permit, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM permits WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Permit, id))?;
        let mut permit = row_to_permit(&row)?;
        permit.items = self.permit_items(id).await?;
        Ok(permit)
    }

    pub async fn list_permits(
        &self,
        permit_type: Option<PermitType>,
        status: Option<ReviewStatus>,
        limit: u32,
    ) -> Result<Vec<Permit>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(permit_type) = permit_type {
            params.push(permit_type.as_str().into());
            conditions.push(format!("permit_type = ?{}", params.len()));
        }
        if let Some(status) = status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
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
                    "SELECT {SELECT_COLS} FROM permits {where_clause} \
                     ORDER BY created_at DESC LIMIT {limit}"
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut permits = Vec::new();
        while let Some(row) = rows.next().await? {
            permits.push(row_to_permit(&row)?);
        }
        for permit in &mut permits {
            permit.items = self.permit_items(&permit.id).await?;
        }
        Ok(permits)
    }

    /// Update scalar fields; `items`, when given, replace every existing line.
    pub async fn update_permit(
        &self,
        id: &str,
        update: PermitUpdate,
    ) -> Result<Permit, DatabaseError> {
        let current = self.get_permit(id).await?;
        self.authorize_owner(&current.applicant_id)?;
        Self::ensure_editable(EntityType::Permit, id, current.status, EDITABLE)?;

        let mut sets = SetClauses::new();
        if let Some(ref country) = update.country {
            sets.push("country", require_text("country", country)?.to_string());
        }
        if let Some(ref purpose) = update.purpose {
            sets.push("purpose", opt_value(purpose.clone()));
        }
        if let Some(ref items) = update.items {
            if items.is_empty() {
                return Err(DatabaseError::validation("a permit needs at least one item"));
            }
        }
        if sets.is_empty() && update.items.is_none() {
            return Ok(current);
        }

        let (sql, params) = sets.into_update("permits", id, Utc::now());
        let tx = self.db().conn().transaction().await?;
        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        if let Some(ref items) = update.items {
            tx.execute("DELETE FROM permit_items WHERE permit_id = ?1", [id])
                .await?;
            self.insert_permit_items(&tx, id, items).await?;
        }
        self.record_audit(
            &tx,
            EntityType::Permit,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update)?),
        )
        .await?;
        tx.commit().await?;
        self.get_permit(id).await
    }

    pub async fn delete_permit(&self, id: &str) -> Result<(), DatabaseError> {
        let current = self.get_permit(id).await?;
        self.authorize_owner(&current.applicant_id)?;
        Self::ensure_editable(EntityType::Permit, id, current.status, EDITABLE)?;

        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM permits WHERE id = ?1", [id]).await?;
        self.record_audit(&tx, EntityType::Permit, id, AuditAction::Deleted, None)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn assign_permit_inspector(
        &self,
        ids: &[String],
        inspector_id: &str,
        comment: Option<&str>,
    ) -> Result<Vec<StatusChange<ReviewStatus>>, DatabaseError> {
        self.assign_inspectors::<Permit>(ids, inspector_id, comment)
            .await
    }

    async fn review_permit(
        &self,
        id: &str,
        action: WorkflowAction,
        comment: Option<&str>,
    ) -> Result<StatusChange<ReviewStatus>, DatabaseError> {
        let (_, inspector_id) = self
            .workflow_state::<Permit>(self.db().conn(), id)
            .await?;
        self.authorize_reviewer(inspector_id.as_deref())?;
        self.transition::<Permit>(id, action, comment, Vec::new())
            .await
    }

    pub async fn approve_permit(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<ReviewStatus>, DatabaseError> {
        self.review_permit(id, WorkflowAction::Approve, comment).await
    }

    pub async fn reject_permit(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<ReviewStatus>, DatabaseError> {
        self.review_permit(id, WorkflowAction::Reject, comment).await
    }

    pub async fn halt_permit(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<ReviewStatus>, DatabaseError> {
        self.review_permit(id, WorkflowAction::Halt, comment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{Fixture, crop_with_stages, fixture};
    use crate::updates::permit::PermitUpdateBuilder;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn item(variety: &str, quantity: f64) -> PermitItemInput {
        PermitItemInput {
            crop_variety_id: variety.to_string(),
            quantity,
            unit: "kg".into(),
        }
    }

    async fn pending_permit(svc: &SttsService) -> Permit {
        let crop = crop_with_stages(svc, &[]).await;
        svc.create_permit(
            PermitType::Import,
            "Kenya",
            Some("Commercial"),
            &[item(&crop.varieties[0].id, 500.0)],
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_permit_with_items() {
        let Fixture { svc, .. } = fixture().await;
        let permit = pending_permit(&svc).await;
        assert!(permit.id.starts_with("prm-"));
        assert_eq!(permit.items.len(), 1);
        assert!((permit.items[0].quantity - 500.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn items_replaced_on_update() {
        let Fixture { svc, .. } = fixture().await;
        let permit = pending_permit(&svc).await;
        let variety = permit.items[0].crop_variety_id.clone();

        let update = PermitUpdateBuilder::new()
            .country("Tanzania")
            .items(vec![item(&variety, 10.0), item(&variety, 20.0)])
            .build();
        let updated = svc.update_permit(&permit.id, update).await.unwrap();
        assert_eq!(updated.country, "Tanzania");
        assert_eq!(updated.items.len(), 2);
        assert!(updated.items.iter().all(|i| i.id != permit.items[0].id));
    }

    #[tokio::test]
    async fn unknown_variety_rejected() {
        let Fixture { svc, .. } = fixture().await;
        let result = svc
            .create_permit(PermitType::Export, "Kenya", None, &[item("var-nope", 1.0)])
            .await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[rstest]
    #[case::approve(WorkflowAction::Approve)]
    #[case::halt(WorkflowAction::Halt)]
    #[tokio::test]
    async fn pending_permit_needs_assignment_first(#[case] action: WorkflowAction) {
        let Fixture { svc, .. } = fixture().await;
        let permit = pending_permit(&svc).await;
        let result = svc.review_permit(&permit.id, action, None).await;
        assert!(matches!(result, Err(DatabaseError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn halt_then_reassign_then_approve() {
        let Fixture { svc, inspector, .. } = fixture().await;
        let permit = pending_permit(&svc).await;
        let ids = [permit.id.clone()];

        svc.assign_permit_inspector(&ids, &inspector, None).await.unwrap();
        svc.halt_permit(&permit.id, Some("Missing certificate"))
            .await
            .unwrap();
        let halted = svc.get_permit(&permit.id).await.unwrap();
        assert_eq!(halted.status, ReviewStatus::Halted);
        assert_eq!(halted.status_comment.as_deref(), Some("Missing certificate"));

        svc.assign_permit_inspector(&ids, &inspector, Some("Certificate received"))
            .await
            .unwrap();
        let change = svc.approve_permit(&permit.id, None).await.unwrap();
        assert_eq!(change.to, ReviewStatus::Approved);

        let approved_again = svc.approve_permit(&permit.id, None).await;
        assert!(matches!(
            approved_again,
            Err(DatabaseError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn missing_permit_is_not_found() {
        let Fixture { svc, .. } = fixture().await;
        assert!(matches!(
            svc.reject_permit("prm-00000000", None).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
