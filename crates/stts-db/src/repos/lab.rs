//! Seed-lab request repository.
//!
//! Lifecycle: request → sampling inspection by the assigned inspector →
//! acceptance → sample received at the lab → test result (marketable or
//! not). The lab record of a lot is what labels, products and the
//! track-and-trace lookup rely on.

use chrono::Utc;
use stts_core::entities::LabInspection;
use stts_core::enums::{AuditAction, Decision, EntityType, LabStatus, WorkflowAction};
use stts_core::ids::PREFIX_LAB;
use stts_core::permissions::Permission;

use crate::error::DatabaseError;
use crate::helpers::{
    SetClauses, get_opt_string, json_value, opt_value, parse_datetime, parse_enum,
    parse_optional_json, require_positive, require_text,
};
use crate::service::SttsService;
use crate::updates::lab::LabInspectionUpdate;
use crate::workflow::StatusChange;

const SELECT_COLS: &str = "id, applicant_id, lot_number, mother_lot, crop_variety_id, \
     quantity, status, inspector_id, status_comment, inspection_report, test_results, \
     created_at, updated_at";

const EDITABLE: &[LabStatus] = &[LabStatus::Pending];

fn row_to_lab(row: &libsql::Row) -> Result<LabInspection, DatabaseError> {
    Ok(LabInspection {
        id: row.get(0)?,
        applicant_id: row.get(1)?,
        lot_number: row.get(2)?,
        mother_lot: get_opt_string(row, 3)?,
        crop_variety_id: row.get(4)?,
        quantity: row.get(5)?,
        status: parse_enum(&row.get::<String>(6)?)?,
        inspector_id: get_opt_string(row, 7)?,
        status_comment: get_opt_string(row, 8)?,
        inspection_report: parse_optional_json(get_opt_string(row, 9)?.as_deref())?,
        test_results: parse_optional_json(get_opt_string(row, 10)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
        updated_at: parse_datetime(&row.get::<String>(12)?)?,
    })
}

/// Input for a new seed-lab request.
#[derive(Debug, Clone)]
pub struct NewLabInspection {
    pub lot_number: String,
    pub mother_lot: Option<String>,
    pub crop_variety_id: String,
    pub quantity: f64,
}

impl SttsService {
    pub async fn create_lab_inspection(
        &self,
        new: NewLabInspection,
    ) -> Result<LabInspection, DatabaseError> {
        let applicant_id = self.authorize(Permission::Apply)?.user_id.clone();
        let lot_number = require_text("lot number", &new.lot_number)?.to_string();
        let mother_lot = new
            .mother_lot
            .as_deref()
            .map(str::trim)
            .filter(|lot| !lot.is_empty())
            .map(String::from);
        require_positive("quantity", new.quantity)?;
        self.get_variety(&new.crop_variety_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_LAB).await?;

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO lab_inspections ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, NULL, NULL, NULL, ?8, ?9)"
            ),
            libsql::params![
                id.as_str(),
                applicant_id.as_str(),
                lot_number.as_str(),
                mother_lot.as_deref(),
                new.crop_variety_id.as_str(),
                new.quantity,
                LabStatus::Pending.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.record_audit(&tx, EntityType::LabInspection, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        Ok(LabInspection {
            id,
            applicant_id,
            lot_number,
            mother_lot,
            crop_variety_id: new.crop_variety_id,
            quantity: new.quantity,
            status: LabStatus::Pending,
            inspector_id: None,
            status_comment: None,
            inspection_report: None,
            test_results: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_lab_inspection(&self, id: &str) -> Result<LabInspection, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM lab_inspections WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::LabInspection, id))?;
        row_to_lab(&row)
    }

    pub async fn list_lab_inspections(
        &self,
        status: Option<LabStatus>,
        lot_number: Option<&str>,
        limit: u32,
    ) -> Result<Vec<LabInspection>, DatabaseError> {
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
                    "SELECT {SELECT_COLS} FROM lab_inspections {where_clause} \
                     ORDER BY created_at DESC LIMIT {limit}"
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut labs = Vec::new();
        while let Some(row) = rows.next().await? {
            labs.push(row_to_lab(&row)?);
        }
        Ok(labs)
    }

    /// Most recent lab request for a lot, if any.
    pub async fn latest_lab_for_lot(
        &self,
        lot_number: &str,
    ) -> Result<Option<LabInspection>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM lab_inspections WHERE lot_number = ?1
                     ORDER BY created_at DESC, rowid DESC LIMIT 1"
                ),
                [lot_number.trim()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_lab(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_lab_inspection(
        &self,
        id: &str,
        update: LabInspectionUpdate,
    ) -> Result<LabInspection, DatabaseError> {
        let current = self.get_lab_inspection(id).await?;
        self.authorize_owner(&current.applicant_id)?;
        Self::ensure_editable(EntityType::LabInspection, id, current.status, EDITABLE)?;

        let mut sets = SetClauses::new();
        if let Some(ref lot) = update.lot_number {
            sets.push("lot_number", require_text("lot number", lot)?.to_string());
        }
        if let Some(ref mother_lot) = update.mother_lot {
            sets.push("mother_lot", opt_value(mother_lot.clone()));
        }
        if let Some(quantity) = update.quantity {
            sets.push("quantity", require_positive("quantity", quantity)?);
        }
        if sets.is_empty() {
            return Ok(current);
        }

        let (sql, params) = sets.into_update("lab_inspections", id, Utc::now());
        let tx = self.db().conn().transaction().await?;
        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        self.record_audit(
            &tx,
            EntityType::LabInspection,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update)?),
        )
        .await?;
        tx.commit().await?;
        self.get_lab_inspection(id).await
    }

    pub async fn delete_lab_inspection(&self, id: &str) -> Result<(), DatabaseError> {
        let current = self.get_lab_inspection(id).await?;
        self.authorize_owner(&current.applicant_id)?;
        Self::ensure_editable(EntityType::LabInspection, id, current.status, EDITABLE)?;

        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM lab_inspections WHERE id = ?1", [id])
            .await?;
        self.record_audit(&tx, EntityType::LabInspection, id, AuditAction::Deleted, None)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn assign_lab_inspector(
        &self,
        ids: &[String],
        inspector_id: &str,
        comment: Option<&str>,
    ) -> Result<Vec<StatusChange<LabStatus>>, DatabaseError> {
        self.assign_inspectors::<LabInspection>(ids, inspector_id, comment)
            .await
    }

    /// File the sampling inspection report. Only the assigned inspector may.
    pub async fn submit_lab_inspection(
        &self,
        id: &str,
        report: Option<serde_json::Value>,
        comment: Option<&str>,
    ) -> Result<StatusChange<LabStatus>, DatabaseError> {
        let current = self.get_lab_inspection(id).await?;
        self.authorize_assigned_inspector(current.inspector_id.as_deref())?;
        self.transition::<LabInspection>(
            id,
            WorkflowAction::SubmitInspection,
            comment,
            vec![("inspection_report", json_value(report.as_ref()))],
        )
        .await
    }

    /// Review the request itself. Once a sample is at the lab the outcome is
    /// a test result instead, see [`Self::record_lab_result`].
    async fn review_lab_inspection(
        &self,
        id: &str,
        action: WorkflowAction,
        comment: Option<&str>,
    ) -> Result<StatusChange<LabStatus>, DatabaseError> {
        self.authorize(Permission::Approve)?;
        self.guarded_transition::<LabInspection>(id, action, comment, Vec::new(), |from| {
            from != LabStatus::Received
        })
        .await
    }

    pub async fn approve_lab_inspection(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<LabStatus>, DatabaseError> {
        self.review_lab_inspection(id, WorkflowAction::Approve, comment)
            .await
    }

    pub async fn reject_lab_inspection(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<LabStatus>, DatabaseError> {
        self.review_lab_inspection(id, WorkflowAction::Reject, comment)
            .await
    }

    pub async fn receive_lab_sample(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<LabStatus>, DatabaseError> {
        self.authorize(Permission::TestSeed)?;
        self.transition::<LabInspection>(id, WorkflowAction::Receive, comment, Vec::new())
            .await
    }

    /// Record the lab's verdict on a received sample.
    ///
    /// `approved` makes the lot marketable, `rejected` not marketable. A
    /// halted verdict has no meaning for a test result.
    pub async fn record_lab_result(
        &self,
        id: &str,
        decision: Decision,
        results: Option<serde_json::Value>,
        comment: Option<&str>,
    ) -> Result<StatusChange<LabStatus>, DatabaseError> {
        self.authorize(Permission::TestSeed)?;
        if decision == Decision::Halted {
            return Err(DatabaseError::validation(
                "a lab result must be approved or rejected",
            ));
        }
        self.guarded_transition::<LabInspection>(
            id,
            decision.as_action(),
            comment,
            vec![("test_results", json_value(results.as_ref()))],
            |from| from == LabStatus::Received,
        )
        .await
    }
}
