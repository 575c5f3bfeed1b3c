//! Generic workflow transition engine.
//!
//! Every workflow entity maps to a table with `status`, `status_comment` and
//! `updated_at` columns. Assignable entities also carry `inspector_id`.
//! Transitions re-read the current status, check the edge against the
//! entity's state machine, and update with a compare-and-set on the old
//! status so a concurrent change surfaces as an error instead of being
//! overwritten. The audit row is written on the same transaction.

use std::collections::HashSet;

use chrono::Utc;
use serde::Serialize;
use stts_core::audit_detail::{InspectorAssignedDetail, StatusChangedDetail};
use stts_core::entities::{
    Application, CropDeclaration, LabInspection, Order, Permit, PlantingReturn, SeedLabel,
};
use stts_core::enums::{
    AuditAction, EntityType, InspectionStatus, LabStatus, LabelStatus, OrderStatus, ReviewStatus,
    WorkflowAction, WorkflowStatus,
};
use stts_core::permissions::Permission;

use crate::error::DatabaseError;
use crate::helpers::{entity_type_to_table, get_opt_string, opt_value, parse_enum};
use crate::service::SttsService;

/// A persisted entity driven by a status state machine.
pub trait WorkflowEntity {
    type Status: WorkflowStatus;
    const ENTITY: EntityType;

    #[must_use]
    fn table() -> &'static str {
        entity_type_to_table(Self::ENTITY)
    }
}

impl WorkflowEntity for Application {
    type Status = ReviewStatus;
    const ENTITY: EntityType = EntityType::Application;
}

impl WorkflowEntity for Permit {
    type Status = ReviewStatus;
    const ENTITY: EntityType = EntityType::Permit;
}

impl WorkflowEntity for CropDeclaration {
    type Status = InspectionStatus;
    const ENTITY: EntityType = EntityType::CropDeclaration;
}

impl WorkflowEntity for PlantingReturn {
    type Status = InspectionStatus;
    const ENTITY: EntityType = EntityType::PlantingReturn;
}

impl WorkflowEntity for LabInspection {
    type Status = LabStatus;
    const ENTITY: EntityType = EntityType::LabInspection;
}

impl WorkflowEntity for SeedLabel {
    type Status = LabelStatus;
    const ENTITY: EntityType = EntityType::SeedLabel;
}

impl WorkflowEntity for Order {
    type Status = OrderStatus;
    const ENTITY: EntityType = EntityType::Order;
}

/// Outcome of one status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange<S> {
    pub entity_type: EntityType,
    pub id: String,
    pub from: S,
    pub to: S,
}

impl<S: WorkflowStatus> StatusChange<S> {
    #[must_use]
    pub fn message(&self) -> String {
        if self.from == self.to {
            format!("{} {} updated ({})", self.entity_type, self.id, self.to)
        } else {
            format!(
                "{} {} moved from {} to {}",
                self.entity_type, self.id, self.from, self.to
            )
        }
    }
}

/// Human-readable summary of a batch of changes.
#[must_use]
pub fn summarize<S: WorkflowStatus>(changes: &[StatusChange<S>]) -> String {
    match changes {
        [single] => single.message(),
        _ => {
            let entity = changes.first().map_or("record", |c| c.entity_type.as_str());
            format!("{} {entity} records updated", changes.len())
        }
    }
}

/// Extra column written alongside a transition (e.g. a report or test results).
pub type ExtraColumn = (&'static str, libsql::Value);

impl SttsService {
    /// Read `(status, inspector_id)` for a workflow record.
    pub(crate) async fn workflow_state<E: WorkflowEntity>(
        &self,
        conn: &libsql::Connection,
        id: &str,
    ) -> Result<(E::Status, Option<String>), DatabaseError> {
        let inspector_col = if <E::Status as WorkflowStatus>::ASSIGNED.is_some() {
            "inspector_id"
        } else {
            "NULL"
        };
        let mut rows = conn
            .query(
                &format!("SELECT status, {inspector_col} FROM {} WHERE id = ?1", E::table()),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(E::ENTITY, id))?;
        Ok((parse_enum(&row.get::<String>(0)?)?, get_opt_string(&row, 1)?))
    }

    /// Apply `action` to one record on `conn` (caller owns the transaction).
    pub(crate) async fn transition_on<E: WorkflowEntity>(
        &self,
        conn: &libsql::Connection,
        id: &str,
        action: WorkflowAction,
        comment: Option<&str>,
        extra: Vec<ExtraColumn>,
    ) -> Result<StatusChange<E::Status>, DatabaseError> {
        self.guarded_transition_on::<E>(conn, id, action, comment, extra, |_| true)
            .await
    }

    /// Like [`Self::transition_on`], but only from a source status that
    /// `accepts` allows. The source is read on `conn` and pinned by the
    /// compare-and-set, so the check and the write see the same status.
    pub(crate) async fn guarded_transition_on<E: WorkflowEntity>(
        &self,
        conn: &libsql::Connection,
        id: &str,
        action: WorkflowAction,
        comment: Option<&str>,
        extra: Vec<ExtraColumn>,
        accepts: impl Fn(E::Status) -> bool,
    ) -> Result<StatusChange<E::Status>, DatabaseError> {
        let (from, _) = self.workflow_state::<E>(conn, id).await?;
        let to = Some(from)
            .filter(|from| accepts(*from))
            .and_then(|from| from.target_for(action))
            .filter(|to| from.can_transition_to(*to))
            .ok_or_else(|| DatabaseError::InvalidTransition {
                entity_type: E::ENTITY,
                id: id.to_string(),
                action: action.as_str().to_string(),
                from: from.as_str().to_string(),
            })?;

        let mut params: Vec<libsql::Value> = vec![to.as_str().into(), opt_value(comment)];
        let mut sets = vec!["status = ?1".to_string(), "status_comment = ?2".to_string()];
        for (column, value) in extra {
            params.push(value);
            sets.push(format!("{column} = ?{}", params.len()));
        }
        params.push(Utc::now().to_rfc3339().into());
        sets.push(format!("updated_at = ?{}", params.len()));
        params.push(id.into());
        let id_idx = params.len();
        params.push(from.as_str().into());
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{id_idx} AND status = ?{}",
            E::table(),
            sets.join(", "),
            params.len()
        );

        let changed = conn.execute(&sql, libsql::params_from_iter(params)).await?;
        if changed == 0 {
            return Err(DatabaseError::InvalidState(format!(
                "{} {id} changed while being updated",
                E::ENTITY
            )));
        }

        let detail = StatusChangedDetail {
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
            reason: comment.map(String::from),
        };
        self.record_audit(
            conn,
            E::ENTITY,
            id,
            AuditAction::StatusChanged,
            Some(serde_json::to_value(&detail)?),
        )
        .await?;

        tracing::debug!(entity = %E::ENTITY, id, %from, %to, %action, "status changed");
        Ok(StatusChange {
            entity_type: E::ENTITY,
            id: id.to_string(),
            from,
            to,
        })
    }

    /// Apply `action` to one record in its own transaction.
    ///
    /// Authorization is the caller's job: each entity names its own permission.
    pub(crate) async fn transition<E: WorkflowEntity>(
        &self,
        id: &str,
        action: WorkflowAction,
        comment: Option<&str>,
        extra: Vec<ExtraColumn>,
    ) -> Result<StatusChange<E::Status>, DatabaseError> {
        let tx = self.db().conn().transaction().await?;
        let change = self
            .transition_on::<E>(&tx, id, action, comment, extra)
            .await?;
        tx.commit().await?;
        Ok(change)
    }

    /// [`Self::guarded_transition_on`] in its own transaction.
    pub(crate) async fn guarded_transition<E: WorkflowEntity>(
        &self,
        id: &str,
        action: WorkflowAction,
        comment: Option<&str>,
        extra: Vec<ExtraColumn>,
        accepts: impl Fn(E::Status) -> bool,
    ) -> Result<StatusChange<E::Status>, DatabaseError> {
        let tx = self.db().conn().transaction().await?;
        let change = self
            .guarded_transition_on::<E>(&tx, id, action, comment, extra, accepts)
            .await?;
        tx.commit().await?;
        Ok(change)
    }

    /// Assign (or reassign) an inspector to every record in `ids`.
    ///
    /// All records are checked before anything is written; one failure
    /// leaves every record untouched. A record already assigned keeps its
    /// status and gets the new inspector.
    pub(crate) async fn assign_inspectors<E: WorkflowEntity>(
        &self,
        ids: &[String],
        inspector_id: &str,
        comment: Option<&str>,
    ) -> Result<Vec<StatusChange<E::Status>>, DatabaseError> {
        self.authorize(Permission::AssignInspector)?;
        let assigned = <E::Status as WorkflowStatus>::ASSIGNED.ok_or_else(|| {
            DatabaseError::InvalidState(format!("{} has no inspector assignment", E::ENTITY))
        })?;

        let mut seen = HashSet::new();
        let ids: Vec<&String> = ids.iter().filter(|id| seen.insert(id.as_str())).collect();
        if ids.is_empty() {
            return Err(DatabaseError::validation("no records given to assign"));
        }

        let inspector = self.get_user(inspector_id).await?;
        if !inspector.is_inspector {
            return Err(DatabaseError::validation(format!(
                "user {inspector_id} is not an inspector"
            )));
        }

        let tx = self.db().conn().transaction().await?;

        let mut plan = Vec::with_capacity(ids.len());
        for id in &ids {
            let (from, previous) = self.workflow_state::<E>(&tx, id).await?;
            if from != assigned && !from.can_transition_to(assigned) {
                return Err(DatabaseError::InvalidTransition {
                    entity_type: E::ENTITY,
                    id: (*id).clone(),
                    action: WorkflowAction::AssignInspector.as_str().to_string(),
                    from: from.as_str().to_string(),
                });
            }
            plan.push(((*id).clone(), from, previous));
        }

        let now = Utc::now().to_rfc3339();
        let mut changes = Vec::with_capacity(plan.len());
        for (id, from, previous) in plan {
            let changed = tx
                .execute(
                    &format!(
                        "UPDATE {} SET status = ?1, inspector_id = ?2, status_comment = ?3, updated_at = ?4
                         WHERE id = ?5 AND status = ?6",
                        E::table()
                    ),
                    libsql::params![
                        assigned.as_str(),
                        inspector_id,
                        comment,
                        now.as_str(),
                        id.as_str(),
                        from.as_str()
                    ],
                )
                .await?;
            if changed == 0 {
                return Err(DatabaseError::InvalidState(format!(
                    "{} {id} changed while being assigned",
                    E::ENTITY
                )));
            }

            let detail = InspectorAssignedDetail {
                inspector_id: inspector_id.to_string(),
                previous_inspector_id: previous,
                comment: comment.map(String::from),
            };
            self.record_audit(
                &tx,
                E::ENTITY,
                &id,
                AuditAction::InspectorAssigned,
                Some(serde_json::to_value(&detail)?),
            )
            .await?;

            if from != assigned {
                let detail = StatusChangedDetail {
                    from: from.as_str().to_string(),
                    to: assigned.as_str().to_string(),
                    reason: comment.map(String::from),
                };
                self.record_audit(
                    &tx,
                    E::ENTITY,
                    &id,
                    AuditAction::StatusChanged,
                    Some(serde_json::to_value(&detail)?),
                )
                .await?;
            }

            changes.push(StatusChange {
                entity_type: E::ENTITY,
                id,
                from,
                to: assigned,
            });
        }

        tx.commit().await?;
        tracing::debug!(entity = %E::ENTITY, count = changes.len(), inspector_id, "inspector assigned");
        Ok(changes)
    }

    /// Fail unless the record is in a status that still allows edits.
    pub(crate) fn ensure_editable<S: WorkflowStatus>(
        entity_type: EntityType,
        id: &str,
        status: S,
        editable: &[S],
    ) -> Result<(), DatabaseError> {
        if editable.contains(&status) {
            return Ok(());
        }
        Err(DatabaseError::InvalidTransition {
            entity_type,
            id: id.to_string(),
            action: "edit".to_string(),
            from: status.as_str().to_string(),
        })
    }
}
