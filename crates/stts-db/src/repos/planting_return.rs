//! Planting return repository and staged field inspections.
//!
//! A return copies its crop's inspection-stage templates on creation. The
//! assigned inspector then submits the stages in position order; the final
//! approved stage accepts the return, a rejected or halted stage moves the
//! whole return with it.

use chrono::{DateTime, Utc};
use stts_core::audit_detail::StageSubmittedDetail;
use stts_core::entities::{InspectionStage, PlantingReturn};
use stts_core::enums::{
    AuditAction, Decision, EntityType, InspectionStatus, SeedClass, StageStatus, WorkflowAction,
    WorkflowStatus,
};
use stts_core::ids::{PREFIX_PLANTING_RETURN, PREFIX_STAGE};
use stts_core::permissions::Permission;

use crate::error::DatabaseError;
use crate::helpers::{
    SetClauses, get_opt_string, get_u32, json_value, opt_value, parse_datetime, parse_enum,
    parse_optional_datetime, parse_optional_json, require_positive, require_text,
};
use crate::service::SttsService;
use crate::updates::planting_return::PlantingReturnUpdate;
use crate::workflow::StatusChange;

const SELECT_COLS: &str = "id, applicant_id, crop_variety_id, seed_class, location, area_planted, \
     quantity_planted, date_planted, lot_number, status, inspector_id, status_comment, \
     created_at, updated_at";

const STAGE_COLS: &str =
    "id, planting_return_id, position, name, status, decision, report, comment, submitted_at";

const EDITABLE: &[InspectionStatus] = &[InspectionStatus::Pending, InspectionStatus::Halted];

fn row_to_return(row: &libsql::Row) -> Result<PlantingReturn, DatabaseError> {
    Ok(PlantingReturn {
        id: row.get(0)?,
        applicant_id: row.get(1)?,
        crop_variety_id: row.get(2)?,
        seed_class: parse_enum(&row.get::<String>(3)?)?,
        location: row.get(4)?,
        area_planted: row.get(5)?,
        quantity_planted: row.get(6)?,
        date_planted: parse_optional_datetime(get_opt_string(row, 7)?.as_deref())?,
        lot_number: get_opt_string(row, 8)?,
        status: parse_enum(&row.get::<String>(9)?)?,
        inspector_id: get_opt_string(row, 10)?,
        status_comment: get_opt_string(row, 11)?,
        stages: Vec::new(),
        created_at: parse_datetime(&row.get::<String>(12)?)?,
        updated_at: parse_datetime(&row.get::<String>(13)?)?,
    })
}

fn row_to_stage(row: &libsql::Row) -> Result<InspectionStage, DatabaseError> {
    Ok(InspectionStage {
        id: row.get(0)?,
        planting_return_id: row.get(1)?,
        position: get_u32(row, 2)?,
        name: row.get(3)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        decision: get_opt_string(row, 5)?
            .map(|d| parse_enum(&d))
            .transpose()?,
        report: parse_optional_json(get_opt_string(row, 6)?.as_deref())?,
        comment: get_opt_string(row, 7)?,
        submitted_at: parse_optional_datetime(get_opt_string(row, 8)?.as_deref())?,
    })
}

/// Input for a new planting return.
#[derive(Debug, Clone)]
pub struct NewPlantingReturn {
    pub crop_variety_id: String,
    pub seed_class: SeedClass,
    pub location: String,
    pub area_planted: f64,
    pub quantity_planted: f64,
    pub date_planted: Option<DateTime<Utc>>,
    pub lot_number: Option<String>,
}

/// Outcome of a stage submission: the stage as stored and, when the
/// decision moved the return, the return's status change.
#[derive(Debug, Clone)]
pub struct StageSubmission {
    pub stage: InspectionStage,
    pub return_change: Option<StatusChange<InspectionStatus>>,
}

impl StageSubmission {
    #[must_use]
    pub fn message(&self) -> String {
        let stage = format!("Stage '{}' {}", self.stage.name, self.stage.status);
        match self.return_change {
            Some(ref change) => format!("{stage}; {}", change.message()),
            None => stage,
        }
    }
}

/// Stage decisions are only taken while an inspector holds the return.
fn ensure_open_for_stages(id: &str, status: InspectionStatus) -> Result<(), DatabaseError> {
    if status == InspectionStatus::AssignedInspector {
        return Ok(());
    }
    Err(DatabaseError::InvalidTransition {
        entity_type: EntityType::PlantingReturn,
        id: id.to_string(),
        action: WorkflowAction::SubmitInspection.as_str().to_string(),
        from: status.as_str().to_string(),
    })
}

impl SttsService {
    pub async fn create_planting_return(
        &self,
        new: NewPlantingReturn,
    ) -> Result<PlantingReturn, DatabaseError> {
        let applicant_id = self.authorize(Permission::Apply)?.user_id.clone();
        let location = require_text("location", &new.location)?.to_string();
        require_positive("area planted", new.area_planted)?;
        require_positive("quantity planted", new.quantity_planted)?;
        let templates = self.stage_templates_for_variety(&new.crop_variety_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PLANTING_RETURN).await?;

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO planting_returns ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, NULL, NULL, ?11, ?12)"
            ),
            libsql::params![
                id.as_str(),
                applicant_id.as_str(),
                new.crop_variety_id.as_str(),
                new.seed_class.as_str(),
                location.as_str(),
                new.area_planted,
                new.quantity_planted,
                new.date_planted.map(|d| d.to_rfc3339()),
                new.lot_number.as_deref(),
                InspectionStatus::Pending.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        for template in &templates {
            let stage_id = self.db().generate_id(PREFIX_STAGE).await?;
            tx.execute(
                "INSERT INTO inspection_stages (id, planting_return_id, position, name, status)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    stage_id.as_str(),
                    id.as_str(),
                    template.position,
                    template.name.as_str(),
                    StageStatus::Pending.as_str()
                ],
            )
            .await?;
        }
        self.record_audit(
            &tx,
            EntityType::PlantingReturn,
            &id,
            AuditAction::Created,
            None,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(id, stages = templates.len(), "planting return created");
        self.get_planting_return(&id).await
    }

    async fn inspection_stages(
        &self,
        conn: &libsql::Connection,
        return_id: &str,
    ) -> Result<Vec<InspectionStage>, DatabaseError> {
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {STAGE_COLS} FROM inspection_stages
                     WHERE planting_return_id = ?1 ORDER BY position"
                ),
                [return_id],
            )
            .await?;
        let mut stages = Vec::new();
        while let Some(row) = rows.next().await? {
            stages.push(row_to_stage(&row)?);
        }
        Ok(stages)
    }

    async fn planting_return_on(
        &self,
        conn: &libsql::Connection,
        id: &str,
    ) -> Result<PlantingReturn, DatabaseError> {
        let mut rows = conn
            .query(
                &format!("SELECT {SELECT_COLS} FROM planting_returns WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::PlantingReturn, id))?;
        let mut planting_return = row_to_return(&row)?;
        planting_return.stages = self.inspection_stages(conn, id).await?;
        Ok(planting_return)
    }

    pub async fn get_planting_return(&self, id: &str) -> Result<PlantingReturn, DatabaseError> {
        self.planting_return_on(self.db().conn(), id).await
    }

    pub async fn list_planting_returns(
        &self,
        status: Option<InspectionStatus>,
        inspector_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<PlantingReturn>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(status) = status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(inspector_id) = inspector_id {
            params.push(inspector_id.into());
            conditions.push(format!("inspector_id = ?{}", params.len()));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let conn = self.db().conn();
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM planting_returns {where_clause} \
                     ORDER BY created_at DESC LIMIT {limit}"
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut returns = Vec::new();
        while let Some(row) = rows.next().await? {
            returns.push(row_to_return(&row)?);
        }
        for planting_return in &mut returns {
            planting_return.stages = self.inspection_stages(conn, &planting_return.id).await?;
        }
        Ok(returns)
    }

    pub async fn update_planting_return(
        &self,
        id: &str,
        update: PlantingReturnUpdate,
    ) -> Result<PlantingReturn, DatabaseError> {
        let current = self.get_planting_return(id).await?;
        self.authorize_owner(&current.applicant_id)?;
        Self::ensure_editable(EntityType::PlantingReturn, id, current.status, EDITABLE)?;

        let mut sets = SetClauses::new();
        if let Some(ref location) = update.location {
            sets.push("location", require_text("location", location)?.to_string());
        }
        if let Some(area) = update.area_planted {
            sets.push("area_planted", require_positive("area planted", area)?);
        }
        if let Some(quantity) = update.quantity_planted {
            sets.push(
                "quantity_planted",
                require_positive("quantity planted", quantity)?,
            );
        }
        if let Some(date) = update.date_planted {
            sets.push("date_planted", opt_value(date.map(|d| d.to_rfc3339())));
        }
        if let Some(ref lot_number) = update.lot_number {
            sets.push("lot_number", opt_value(lot_number.clone()));
        }
        if sets.is_empty() {
            return Ok(current);
        }

        let (sql, params) = sets.into_update("planting_returns", id, Utc::now());
        let tx = self.db().conn().transaction().await?;
        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        self.record_audit(
            &tx,
            EntityType::PlantingReturn,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update)?),
        )
        .await?;
        tx.commit().await?;
        self.get_planting_return(id).await
    }

    pub async fn delete_planting_return(&self, id: &str) -> Result<(), DatabaseError> {
        let current = self.get_planting_return(id).await?;
        self.authorize_owner(&current.applicant_id)?;
        Self::ensure_editable(EntityType::PlantingReturn, id, current.status, EDITABLE)?;

        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM planting_returns WHERE id = ?1", [id])
            .await?;
        self.record_audit(
            &tx,
            EntityType::PlantingReturn,
            id,
            AuditAction::Deleted,
            None,
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn assign_planting_return_inspector(
        &self,
        ids: &[String],
        inspector_id: &str,
        comment: Option<&str>,
    ) -> Result<Vec<StatusChange<InspectionStatus>>, DatabaseError> {
        self.assign_inspectors::<PlantingReturn>(ids, inspector_id, comment)
            .await
    }

    /// Record the assigned inspector's decision on one field-inspection stage.
    ///
    /// Stages are taken strictly in position order. The stage update, its
    /// audit row and any resulting status change of the return commit
    /// together.
    pub async fn submit_planting_return_stage(
        &self,
        id: &str,
        stage_id: &str,
        decision: Decision,
        report: Option<serde_json::Value>,
        comment: Option<&str>,
    ) -> Result<StageSubmission, DatabaseError> {
        let current = self.get_planting_return(id).await?;
        self.authorize_assigned_inspector(current.inspector_id.as_deref())?;
        ensure_open_for_stages(id, current.status)?;

        let stage = current
            .stages
            .iter()
            .find(|stage| stage.id == stage_id)
            .ok_or_else(|| {
                DatabaseError::validation(format!("stage {stage_id} does not belong to {id}"))
            })?;
        if current.next_open_stage().map(|next| next.id.as_str()) != Some(stage_id) {
            return Err(DatabaseError::validation(format!(
                "stage '{}' is not the next stage to inspect",
                stage.name
            )));
        }
        let target = StageStatus::from_decision(decision);
        if !stage.status.can_transition_to(target) {
            return Err(DatabaseError::InvalidState(format!(
                "stage '{}' cannot move from {} to {target}",
                stage.name, stage.status
            )));
        }

        let tx = self.db().conn().transaction().await?;
        let (status, _) = self.workflow_state::<PlantingReturn>(&tx, id).await?;
        ensure_open_for_stages(id, status)?;
        let changed = tx
            .execute(
                "UPDATE inspection_stages
                 SET status = ?1, decision = ?2, report = ?3, comment = ?4, submitted_at = ?5
                 WHERE id = ?6 AND status = ?7",
                libsql::params_from_iter(vec![
                    target.as_str().into(),
                    decision.as_str().into(),
                    json_value(report.as_ref()),
                    opt_value(comment),
                    Utc::now().to_rfc3339().into(),
                    stage_id.into(),
                    stage.status.as_str().into(),
                ]),
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::InvalidState(format!(
                "stage {stage_id} changed while being submitted"
            )));
        }
        let detail = StageSubmittedDetail {
            stage_id: stage_id.to_string(),
            stage_name: stage.name.clone(),
            decision,
            comment: comment.map(String::from),
        };
        self.record_audit(
            &tx,
            EntityType::PlantingReturn,
            id,
            AuditAction::StageSubmitted,
            Some(serde_json::to_value(&detail)?),
        )
        .await?;

        let updated = self.planting_return_on(&tx, id).await?;
        let return_change = match decision {
            Decision::Approved if !updated.all_stages_approved() => None,
            _ => Some(
                self.transition_on::<PlantingReturn>(
                    &tx,
                    id,
                    decision.as_action(),
                    comment,
                    Vec::new(),
                )
                .await?,
            ),
        };
        tx.commit().await?;

        let stage = self
            .planting_return_on(self.db().conn(), id)
            .await?
            .stages
            .into_iter()
            .find(|stage| stage.id == stage_id)
            .ok_or_else(|| DatabaseError::InvalidState(format!("stage {stage_id} vanished")))?;
        Ok(StageSubmission {
            stage,
            return_change,
        })
    }

    async fn review_planting_return(
        &self,
        id: &str,
        action: WorkflowAction,
        comment: Option<&str>,
    ) -> Result<StatusChange<InspectionStatus>, DatabaseError> {
        let current = self.get_planting_return(id).await?;
        self.authorize_reviewer(current.inspector_id.as_deref())?;
        if action == WorkflowAction::Approve && !current.all_stages_approved() {
            return Err(DatabaseError::validation(format!(
                "planting return {id} has stages still awaiting inspection"
            )));
        }
        self.transition::<PlantingReturn>(id, action, comment, Vec::new())
            .await
    }

    /// Accept a return outright. Only allowed once every stage is approved
    /// (or the crop defines no stages).
    pub async fn approve_planting_return(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<InspectionStatus>, DatabaseError> {
        self.review_planting_return(id, WorkflowAction::Approve, comment)
            .await
    }

    pub async fn reject_planting_return(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<InspectionStatus>, DatabaseError> {
        self.review_planting_return(id, WorkflowAction::Reject, comment)
            .await
    }

    pub async fn halt_planting_return(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<InspectionStatus>, DatabaseError> {
        self.review_planting_return(id, WorkflowAction::Halt, comment)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{Fixture, act_as, crop_with_stages, fixture};
    use pretty_assertions::assert_eq;

    fn new_return(variety_id: &str) -> NewPlantingReturn {
        NewPlantingReturn {
            crop_variety_id: variety_id.to_string(),
            seed_class: SeedClass::Certified,
            location: "Masaka".into(),
            area_planted: 2.5,
            quantity_planted: 40.0,
            date_planted: None,
            lot_number: Some("LOT-2024-001".into()),
        }
    }

    async fn assigned_return(stages: &[&str]) -> (Fixture, PlantingReturn) {
        let mut fx = fixture().await;
        let crop = crop_with_stages(&fx.svc, stages).await;
        act_as(&mut fx.svc, &fx.applicant).await;
        let created = fx
            .svc
            .create_planting_return(new_return(&crop.varieties[0].id))
            .await
            .unwrap();
        act_as(&mut fx.svc, &fx.admin).await;
        fx.svc
            .assign_planting_return_inspector(&[created.id.clone()], &fx.inspector, None)
            .await
            .unwrap();
        act_as(&mut fx.svc, &fx.inspector).await;
        (fx, created)
    }

    #[tokio::test]
    async fn create_copies_stage_templates() {
        let Fixture { svc, .. } = fixture().await;
        let crop = crop_with_stages(&svc, &["Pre-flowering", "Flowering", "Pre-harvest"]).await;
        let created = svc
            .create_planting_return(new_return(&crop.varieties[0].id))
            .await
            .unwrap();

        let names: Vec<_> = created.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Pre-flowering", "Flowering", "Pre-harvest"]);
        assert!(created.stages.iter().all(|s| s.status == StageStatus::Pending));
        assert_eq!(created.status, InspectionStatus::Pending);
    }

    #[tokio::test]
    async fn create_rejects_blank_location() {
        let Fixture { svc, .. } = fixture().await;
        let crop = crop_with_stages(&svc, &[]).await;
        let result = svc
            .create_planting_return(NewPlantingReturn {
                location: "  ".into(),
                ..new_return(&crop.varieties[0].id)
            })
            .await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[tokio::test]
    async fn approving_last_stage_accepts_return() {
        let (fx, created) = assigned_return(&["Pre-flowering", "Flowering"]).await;
        let first = &created.stages[0];
        let second = &created.stages[1];

        let submission = fx
            .svc
            .submit_planting_return_stage(
                &created.id,
                &first.id,
                Decision::Approved,
                Some(serde_json::json!({"off_types": 0})),
                None,
            )
            .await
            .unwrap();
        assert_eq!(submission.stage.status, StageStatus::Approved);
        assert!(submission.return_change.is_none());

        let submission = fx
            .svc
            .submit_planting_return_stage(&created.id, &second.id, Decision::Approved, None, None)
            .await
            .unwrap();
        let change = submission.return_change.unwrap();
        assert_eq!(change.to, InspectionStatus::Accepted);

        let audit = fx
            .svc
            .query_audit(&AuditFilter {
                entity_id: Some(created.id.clone()),
                action: Some(AuditAction::StageSubmitted),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(audit.len(), 2);
    }

    #[tokio::test]
    async fn rejected_return_takes_no_more_stages() {
        let (mut fx, created) = assigned_return(&["Pre-flowering", "Flowering"]).await;
        fx.svc
            .submit_planting_return_stage(
                &created.id,
                &created.stages[0].id,
                Decision::Rejected,
                None,
                Some("Heavy off-types"),
            )
            .await
            .unwrap();

        let result = fx
            .svc
            .submit_planting_return_stage(
                &created.id,
                &created.stages[1].id,
                Decision::Approved,
                None,
                None,
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::InvalidTransition { .. })));

        act_as(&mut fx.svc, &fx.admin).await;
        let halted = fx.svc.halt_planting_return(&created.id, None).await;
        assert!(matches!(halted, Err(DatabaseError::InvalidTransition { .. })));
        let stored = fx.svc.get_planting_return(&created.id).await.unwrap();
        assert_eq!(stored.status, InspectionStatus::Rejected);
        assert_eq!(stored.stages[1].status, StageStatus::Pending);
    }

    #[tokio::test]
    async fn accepted_return_cannot_be_halted_or_rejected() {
        let (mut fx, created) = assigned_return(&["Flowering"]).await;
        fx.svc
            .submit_planting_return_stage(
                &created.id,
                &created.stages[0].id,
                Decision::Approved,
                None,
                None,
            )
            .await
            .unwrap();

        act_as(&mut fx.svc, &fx.admin).await;
        let halted = fx.svc.halt_planting_return(&created.id, None).await;
        assert!(matches!(halted, Err(DatabaseError::InvalidTransition { .. })));
        let rejected = fx.svc.reject_planting_return(&created.id, None).await;
        assert!(matches!(rejected, Err(DatabaseError::InvalidTransition { .. })));
        let stored = fx.svc.get_planting_return(&created.id).await.unwrap();
        assert_eq!(stored.status, InspectionStatus::Accepted);
    }

    #[tokio::test]
    async fn stages_must_be_submitted_in_order() {
        let (fx, created) = assigned_return(&["Pre-flowering", "Flowering"]).await;
        let result = fx
            .svc
            .submit_planting_return_stage(
                &created.id,
                &created.stages[1].id,
                Decision::Approved,
                None,
                None,
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[tokio::test]
    async fn rejected_stage_rejects_return() {
        let (fx, created) = assigned_return(&["Pre-flowering", "Flowering"]).await;
        let submission = fx
            .svc
            .submit_planting_return_stage(
                &created.id,
                &created.stages[0].id,
                Decision::Rejected,
                None,
                Some("Off-types above tolerance"),
            )
            .await
            .unwrap();
        assert_eq!(
            submission.return_change.map(|c| c.to),
            Some(InspectionStatus::Rejected)
        );
    }

    #[tokio::test]
    async fn halted_stage_can_be_resubmitted_after_reassignment() {
        let (mut fx, created) = assigned_return(&["Flowering"]).await;
        let stage_id = created.stages[0].id.clone();
        fx.svc
            .submit_planting_return_stage(&created.id, &stage_id, Decision::Halted, None, None)
            .await
            .unwrap();

        act_as(&mut fx.svc, &fx.admin).await;
        fx.svc
            .assign_planting_return_inspector(&[created.id.clone()], &fx.inspector, None)
            .await
            .unwrap();
        act_as(&mut fx.svc, &fx.inspector).await;
        let submission = fx
            .svc
            .submit_planting_return_stage(&created.id, &stage_id, Decision::Approved, None, None)
            .await
            .unwrap();
        assert_eq!(
            submission.return_change.map(|c| c.to),
            Some(InspectionStatus::Accepted)
        );
    }

    #[tokio::test]
    async fn only_assigned_inspector_submits() {
        let (mut fx, created) = assigned_return(&["Flowering"]).await;
        act_as(&mut fx.svc, &fx.applicant).await;
        let result = fx
            .svc
            .submit_planting_return_stage(
                &created.id,
                &created.stages[0].id,
                Decision::Approved,
                None,
                None,
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::Forbidden(_))));
    }

    #[tokio::test]
    async fn approve_requires_every_stage() {
        let (mut fx, created) = assigned_return(&["Flowering"]).await;
        act_as(&mut fx.svc, &fx.admin).await;
        let result = fx.svc.approve_planting_return(&created.id, None).await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));

        let halted = fx.svc.halt_planting_return(&created.id, None).await.unwrap();
        assert_eq!(halted.to, InspectionStatus::Halted);
    }

    #[tokio::test]
    async fn edits_locked_once_assigned() {
        let (mut fx, created) = assigned_return(&[]).await;
        act_as(&mut fx.svc, &fx.applicant).await;
        let result = fx
            .svc
            .update_planting_return(
                &created.id,
                PlantingReturnUpdate {
                    location: Some("Mbarara".into()),
                    ..PlantingReturnUpdate::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::InvalidTransition { .. })));
    }
}
