//! SR4 / SR6 / QDS application repository.

use chrono::{DateTime, Utc};
use stts_core::entities::Application;
use stts_core::enums::{ApplicationForm, AuditAction, EntityType, ReviewStatus, WorkflowAction};
use stts_core::ids::PREFIX_APPLICATION;
use stts_core::permissions::Permission;

use crate::error::DatabaseError;
use crate::helpers::{
    SetClauses, get_opt_string, opt_value, parse_datetime, parse_enum, parse_optional_datetime,
};
use crate::service::SttsService;
use crate::updates::application::ApplicationUpdate;
use crate::workflow::StatusChange;

const SELECT_COLS: &str = "id, form, applicant_id, details, status, inspector_id, status_comment, \
     valid_until, created_at, updated_at";

const EDITABLE: &[ReviewStatus] = &[ReviewStatus::Pending, ReviewStatus::Halted];

fn row_to_application(row: &libsql::Row) -> Result<Application, DatabaseError> {
    Ok(Application {
        id: row.get(0)?,
        form: parse_enum(&row.get::<String>(1)?)?,
        applicant_id: row.get(2)?,
        details: serde_json::from_str(&row.get::<String>(3)?)
            .map_err(|e| DatabaseError::Query(format!("Invalid application details: {e}")))?,
        status: parse_enum(&row.get::<String>(4)?)?,
        inspector_id: get_opt_string(row, 5)?,
        status_comment: get_opt_string(row, 6)?,
        valid_until: parse_optional_datetime(get_opt_string(row, 7)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl SttsService {
    pub async fn create_application(
        &self,
        form: ApplicationForm,
        details: serde_json::Value,
        valid_until: Option<DateTime<Utc>>,
    ) -> Result<Application, DatabaseError> {
        let applicant_id = self.authorize(Permission::Apply)?.user_id.clone();
        if !details.is_object() {
            return Err(DatabaseError::validation("application details must be a JSON object"));
        }
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_APPLICATION).await?;

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO applications ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, NULL, NULL, ?6, ?7, ?8)"
            ),
            libsql::params![
                id.as_str(),
                form.as_str(),
                applicant_id.as_str(),
                details.to_string(),
                ReviewStatus::Pending.as_str(),
                valid_until.map(|d| d.to_rfc3339()),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.record_audit(&tx, EntityType::Application, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        Ok(Application {
            id,
            form,
            applicant_id,
            details,
            status: ReviewStatus::Pending,
            inspector_id: None,
            status_comment: None,
            valid_until,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_application(&self, id: &str) -> Result<Application, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM applications WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Application, id))?;
        row_to_application(&row)
    }

    pub async fn list_applications(
        &self,
        form: Option<ApplicationForm>,
        status: Option<ReviewStatus>,
        limit: u32,
    ) -> Result<Vec<Application>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(form) = form {
            params.push(form.as_str().into());
            conditions.push(format!("form = ?{}", params.len()));
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
                    "SELECT {SELECT_COLS} FROM applications {where_clause} \
                     ORDER BY created_at DESC LIMIT {limit}"
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut applications = Vec::new();
        while let Some(row) = rows.next().await? {
            applications.push(row_to_application(&row)?);
        }
        Ok(applications)
    }

    pub async fn update_application(
        &self,
        id: &str,
        update: ApplicationUpdate,
    ) -> Result<Application, DatabaseError> {
        let current = self.get_application(id).await?;
        self.authorize_owner(&current.applicant_id)?;
        Self::ensure_editable(EntityType::Application, id, current.status, EDITABLE)?;

        let mut sets = SetClauses::new();
        if let Some(ref details) = update.details {
            if !details.is_object() {
                return Err(DatabaseError::validation("application details must be a JSON object"));
            }
            sets.push("details", details.to_string());
        }
        if let Some(valid_until) = update.valid_until {
            sets.push("valid_until", opt_value(valid_until.map(|d| d.to_rfc3339())));
        }
        if sets.is_empty() {
            return Ok(current);
        }

        let (sql, params) = sets.into_update("applications", id, Utc::now());
        let tx = self.db().conn().transaction().await?;
        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        self.record_audit(
            &tx,
            EntityType::Application,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update)?),
        )
        .await?;
        tx.commit().await?;
        self.get_application(id).await
    }

    pub async fn delete_application(&self, id: &str) -> Result<(), DatabaseError> {
        let current = self.get_application(id).await?;
        self.authorize_owner(&current.applicant_id)?;
        Self::ensure_editable(EntityType::Application, id, current.status, EDITABLE)?;

        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM applications WHERE id = ?1", [id])
            .await?;
        self.record_audit(&tx, EntityType::Application, id, AuditAction::Deleted, None)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn assign_application_inspector(
        &self,
        ids: &[String],
        inspector_id: &str,
        comment: Option<&str>,
    ) -> Result<Vec<StatusChange<ReviewStatus>>, DatabaseError> {
        self.assign_inspectors::<Application>(ids, inspector_id, comment)
            .await
    }

    async fn review_application(
        &self,
        id: &str,
        action: WorkflowAction,
        comment: Option<&str>,
    ) -> Result<StatusChange<ReviewStatus>, DatabaseError> {
        let current = self.get_application(id).await?;
        self.authorize_reviewer(current.inspector_id.as_deref())?;
        self.transition::<Application>(id, action, comment, Vec::new())
            .await
    }

    pub async fn approve_application(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<ReviewStatus>, DatabaseError> {
        self.review_application(id, WorkflowAction::Approve, comment)
            .await
    }

    pub async fn reject_application(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<ReviewStatus>, DatabaseError> {
        self.review_application(id, WorkflowAction::Reject, comment)
            .await
    }

    pub async fn halt_application(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<ReviewStatus>, DatabaseError> {
        self.review_application(id, WorkflowAction::Halt, comment)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{Fixture, act_as, fixture};
    use crate::updates::application::ApplicationUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_and_review() {
        let Fixture {
            mut svc,
            applicant,
            inspector,
            admin,
        } = fixture().await;

        act_as(&mut svc, &applicant).await;
        let app = svc
            .create_application(
                ApplicationForm::Sr4,
                serde_json::json!({"business_name": "Agro Seeds Ltd"}),
                None,
            )
            .await
            .unwrap();
        assert_eq!(app.status, ReviewStatus::Pending);
        assert_eq!(app.applicant_id, applicant);

        act_as(&mut svc, &admin).await;
        svc.assign_application_inspector(&[app.id.clone()], &inspector, None)
            .await
            .unwrap();

        // The assigned inspector may decide with can_inspect alone.
        act_as(&mut svc, &inspector).await;
        let change = svc
            .approve_application(&app.id, Some("Premises inspected"))
            .await
            .unwrap();
        assert_eq!(change.from, ReviewStatus::AssignedInspector);
        assert_eq!(change.to, ReviewStatus::Approved);

        let stored = svc.get_application(&app.id).await.unwrap();
        assert_eq!(stored.status_comment.as_deref(), Some("Premises inspected"));

        let audit = svc
            .query_audit(&AuditFilter {
                entity_id: Some(app.id.clone()),
                action: Some(AuditAction::StatusChanged),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(audit[0].detail.as_ref().unwrap()["to"], "approved");
        assert_eq!(audit[0].actor_id.as_deref(), Some(inspector.as_str()));
    }

    #[tokio::test]
    async fn approve_from_pending_is_invalid() {
        let Fixture { svc, .. } = fixture().await;
        let app = svc
            .create_application(ApplicationForm::Qds, serde_json::json!({}), None)
            .await
            .unwrap();
        let result = svc.approve_application(&app.id, None).await;
        assert!(matches!(result, Err(DatabaseError::InvalidTransition { .. })));
        assert_eq!(
            svc.get_application(&app.id).await.unwrap().status,
            ReviewStatus::Pending
        );
    }

    #[tokio::test]
    async fn reject_directly_from_pending() {
        let Fixture { svc, .. } = fixture().await;
        let app = svc
            .create_application(ApplicationForm::Sr6, serde_json::json!({}), None)
            .await
            .unwrap();
        let change = svc
            .reject_application(&app.id, Some("Incomplete"))
            .await
            .unwrap();
        assert_eq!(change.to, ReviewStatus::Rejected);
    }

    #[tokio::test]
    async fn edits_locked_after_assignment() {
        let Fixture {
            mut svc,
            applicant,
            inspector,
            admin,
        } = fixture().await;
        act_as(&mut svc, &applicant).await;
        let app = svc
            .create_application(ApplicationForm::Sr4, serde_json::json!({"a": 1}), None)
            .await
            .unwrap();

        let update = ApplicationUpdateBuilder::new()
            .details(serde_json::json!({"a": 2}))
            .build();
        let updated = svc.update_application(&app.id, update.clone()).await.unwrap();
        assert_eq!(updated.details["a"], 2);

        act_as(&mut svc, &admin).await;
        svc.assign_application_inspector(&[app.id.clone()], &inspector, None)
            .await
            .unwrap();

        act_as(&mut svc, &applicant).await;
        assert!(matches!(
            svc.update_application(&app.id, update).await,
            Err(DatabaseError::InvalidTransition { .. })
        ));
        assert!(svc.delete_application(&app.id).await.is_err());
    }

    #[tokio::test]
    async fn other_applicant_cannot_edit() {
        let Fixture {
            mut svc,
            applicant,
            inspector,
            ..
        } = fixture().await;
        act_as(&mut svc, &applicant).await;
        let app = svc
            .create_application(ApplicationForm::Sr4, serde_json::json!({}), None)
            .await
            .unwrap();

        act_as(&mut svc, &inspector).await;
        assert!(matches!(
            svc.delete_application(&app.id).await,
            Err(DatabaseError::NotPermitted(_))
        ));
    }

    #[tokio::test]
    async fn details_must_be_object() {
        let Fixture { svc, .. } = fixture().await;
        let result = svc
            .create_application(ApplicationForm::Sr4, serde_json::json!([1, 2]), None)
            .await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }
}
