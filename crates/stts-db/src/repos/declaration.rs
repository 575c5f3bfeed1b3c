//! Crop declaration repository.

use chrono::Utc;
use stts_core::entities::{CropDeclaration, DeclaredCrop};
use stts_core::enums::{AuditAction, EntityType, InspectionStatus, WorkflowAction};
use stts_core::ids::{PREFIX_DECLARATION, PREFIX_DECLARED_CROP};
use stts_core::permissions::Permission;

use crate::error::DatabaseError;
use crate::helpers::{SetClauses, get_opt_string, opt_value, parse_datetime, parse_enum};
use crate::service::SttsService;
use crate::updates::declaration::DeclarationUpdate;
use crate::workflow::StatusChange;

const SELECT_COLS: &str = "id, applicant_id, source_of_seed, field_size, seed_quantity, status, \
     inspector_id, status_comment, created_at, updated_at";

const EDITABLE: &[InspectionStatus] = &[InspectionStatus::Pending, InspectionStatus::Halted];

fn row_to_declaration(row: &libsql::Row) -> Result<CropDeclaration, DatabaseError> {
    Ok(CropDeclaration {
        id: row.get(0)?,
        applicant_id: row.get(1)?,
        source_of_seed: get_opt_string(row, 2)?,
        field_size: row.get::<Option<f64>>(3)?,
        seed_quantity: row.get::<Option<f64>>(4)?,
        crops: Vec::new(),
        status: parse_enum(&row.get::<String>(5)?)?,
        inspector_id: get_opt_string(row, 6)?,
        status_comment: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

/// Input for a new crop declaration.
#[derive(Debug, Clone, Default)]
pub struct NewDeclaration {
    pub source_of_seed: Option<String>,
    pub field_size: Option<f64>,
    pub seed_quantity: Option<f64>,
    pub crop_variety_ids: Vec<String>,
}

impl SttsService {
    pub async fn create_declaration(
        &self,
        new: NewDeclaration,
    ) -> Result<CropDeclaration, DatabaseError> {
        let applicant_id = self.authorize(Permission::Apply)?.user_id.clone();
        if new.crop_variety_ids.is_empty() {
            return Err(DatabaseError::validation("declare at least one crop variety"));
        }
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_DECLARATION).await?;

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO crop_declarations ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, NULL, ?7, ?8)"
            ),
            libsql::params![
                id.as_str(),
                applicant_id.as_str(),
                new.source_of_seed.as_deref(),
                new.field_size,
                new.seed_quantity,
                InspectionStatus::Pending.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.insert_declared_crops(&tx, &id, &new.crop_variety_ids)
            .await?;
        self.record_audit(
            &tx,
            EntityType::CropDeclaration,
            &id,
            AuditAction::Created,
            None,
        )
        .await?;
        tx.commit().await?;

        self.get_declaration(&id).await
    }

    async fn insert_declared_crops(
        &self,
        conn: &libsql::Connection,
        declaration_id: &str,
        variety_ids: &[String],
    ) -> Result<(), DatabaseError> {
        for variety_id in variety_ids {
            self.get_variety(variety_id).await?;
            let child_id = self.db().generate_id(PREFIX_DECLARED_CROP).await?;
            conn.execute(
                "INSERT INTO declared_crops (id, declaration_id, crop_variety_id) VALUES (?1, ?2, ?3)",
                libsql::params![child_id.as_str(), declaration_id, variety_id.as_str()],
            )
            .await?;
        }
        Ok(())
    }

    async fn declared_crops(&self, declaration_id: &str) -> Result<Vec<DeclaredCrop>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, declaration_id, crop_variety_id FROM declared_crops
                 WHERE declaration_id = ?1 ORDER BY rowid",
                [declaration_id],
            )
            .await?;
        let mut crops = Vec::new();
        while let Some(row) = rows.next().await? {
            crops.push(DeclaredCrop {
                id: row.get(0)?,
                declaration_id: row.get(1)?,
                crop_variety_id: row.get(2)?,
            });
        }
        Ok(crops)
    }

    pub async fn get_declaration(&self, id: &str) -> Result<CropDeclaration, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM crop_declarations WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::CropDeclaration, id))?;
        let mut declaration = row_to_declaration(&row)?;
        declaration.crops = self.declared_crops(id).await?;
        Ok(declaration)
    }

    pub async fn list_declarations(
        &self,
        status: Option<InspectionStatus>,
        limit: u32,
    ) -> Result<Vec<CropDeclaration>, DatabaseError> {
        let (where_clause, params): (&str, Vec<libsql::Value>) = match status {
            Some(status) => ("WHERE status = ?1", vec![status.as_str().into()]),
            None => ("", Vec::new()),
        };
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM crop_declarations {where_clause} \
                     ORDER BY created_at DESC LIMIT {limit}"
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut declarations = Vec::new();
        while let Some(row) = rows.next().await? {
            declarations.push(row_to_declaration(&row)?);
        }
        for declaration in &mut declarations {
            declaration.crops = self.declared_crops(&declaration.id).await?;
        }
        Ok(declarations)
    }

    pub async fn update_declaration(
        &self,
        id: &str,
        update: DeclarationUpdate,
    ) -> Result<CropDeclaration, DatabaseError> {
        let current = self.get_declaration(id).await?;
        self.authorize_owner(&current.applicant_id)?;
        Self::ensure_editable(EntityType::CropDeclaration, id, current.status, EDITABLE)?;

        let mut sets = SetClauses::new();
        if let Some(ref source) = update.source_of_seed {
            sets.push("source_of_seed", opt_value(source.clone()));
        }
        if let Some(field_size) = update.field_size {
            sets.push("field_size", opt_value(field_size));
        }
        if let Some(seed_quantity) = update.seed_quantity {
            sets.push("seed_quantity", opt_value(seed_quantity));
        }
        if matches!(update.crop_variety_ids, Some(ref ids) if ids.is_empty()) {
            return Err(DatabaseError::validation("declare at least one crop variety"));
        }
        if sets.is_empty() && update.crop_variety_ids.is_none() {
            return Ok(current);
        }

        let (sql, params) = sets.into_update("crop_declarations", id, Utc::now());
        let tx = self.db().conn().transaction().await?;
        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        if let Some(ref ids) = update.crop_variety_ids {
            tx.execute("DELETE FROM declared_crops WHERE declaration_id = ?1", [id])
                .await?;
            self.insert_declared_crops(&tx, id, ids).await?;
        }
        self.record_audit(
            &tx,
            EntityType::CropDeclaration,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update)?),
        )
        .await?;
        tx.commit().await?;
        self.get_declaration(id).await
    }

    pub async fn delete_declaration(&self, id: &str) -> Result<(), DatabaseError> {
        let current = self.get_declaration(id).await?;
        self.authorize_owner(&current.applicant_id)?;
        Self::ensure_editable(EntityType::CropDeclaration, id, current.status, EDITABLE)?;

        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM crop_declarations WHERE id = ?1", [id])
            .await?;
        self.record_audit(
            &tx,
            EntityType::CropDeclaration,
            id,
            AuditAction::Deleted,
            None,
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn assign_declaration_inspector(
        &self,
        ids: &[String],
        inspector_id: &str,
        comment: Option<&str>,
    ) -> Result<Vec<StatusChange<InspectionStatus>>, DatabaseError> {
        self.assign_inspectors::<CropDeclaration>(ids, inspector_id, comment)
            .await
    }

    async fn review_declaration(
        &self,
        id: &str,
        action: WorkflowAction,
        comment: Option<&str>,
    ) -> Result<StatusChange<InspectionStatus>, DatabaseError> {
        let current = self.get_declaration(id).await?;
        self.authorize_reviewer(current.inspector_id.as_deref())?;
        self.transition::<CropDeclaration>(id, action, comment, Vec::new())
            .await
    }

    pub async fn approve_declaration(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<InspectionStatus>, DatabaseError> {
        self.review_declaration(id, WorkflowAction::Approve, comment)
            .await
    }

    pub async fn reject_declaration(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<InspectionStatus>, DatabaseError> {
        self.review_declaration(id, WorkflowAction::Reject, comment)
            .await
    }

    pub async fn halt_declaration(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<StatusChange<InspectionStatus>, DatabaseError> {
        self.review_declaration(id, WorkflowAction::Halt, comment)
            .await
    }
}
