//! End-to-end workflow tests over an in-memory database.
//!
//! - Field inspection: crop → planting return → assign → stage → accepted
//! - Bulk inspector assignment is all-or-nothing
//! - Seed lab → marketable → label → print → track-and-trace

use pretty_assertions::assert_eq;

use stts_core::enums::{
    AuditAction, Decision, EntityType, InspectionStatus, LabStatus, LabelStatus, PermitType,
    ReviewStatus, SeedClass,
};
use stts_db::error::DatabaseError;
use stts_db::repos::audit::AuditFilter;
use stts_db::repos::lab::NewLabInspection;
use stts_db::repos::planting_return::NewPlantingReturn;
use stts_db::repos::stock::NewStockRecord;
use stts_db::repos::user::NewUser;
use stts_db::service::SttsService;
use stts_db::updates::crop::StageTemplate;
use stts_db::updates::permit::PermitItemInput;

struct World {
    svc: SttsService,
    admin: String,
    grower: String,
    inspector: String,
    variety: String,
}

impl World {
    async fn act_as(&mut self, user_id: &str) {
        let actor = self.svc.actor_for_user(user_id).await.unwrap();
        self.svc.set_actor(Some(actor));
    }
}

async fn world(stages: &[&str]) -> World {
    let mut svc = SttsService::new_local(":memory:").await.unwrap();
    let admin = svc.bootstrap_admin("admin", "Administrator").await.unwrap();
    svc.set_actor(Some(svc.actor_for_user(&admin.id).await.unwrap()));

    let grower_role = svc
        .create_role("grower", &["can_apply".into(), "can_trade".into()])
        .await
        .unwrap();
    let inspector_role = svc
        .create_role("field inspector", &["can_inspect".into()])
        .await
        .unwrap();

    let grower = svc
        .create_user(NewUser {
            username: "grower".into(),
            name: "Seed Grower".into(),
            is_grower: true,
            ..NewUser::default()
        })
        .await
        .unwrap();
    svc.grant_role(&grower.id, &grower_role.id).await.unwrap();
    let inspector = svc
        .create_user(NewUser {
            username: "inspector".into(),
            name: "Field Inspector".into(),
            is_inspector: true,
            ..NewUser::default()
        })
        .await
        .unwrap();
    svc.grant_role(&inspector.id, &inspector_role.id).await.unwrap();

    let stages = stages
        .iter()
        .map(|name| StageTemplate {
            name: (*name).to_string(),
            period_after_planting_days: Some(45),
        })
        .collect();
    let crop = svc
        .create_crop("Beans", &["NABE 15".to_string()], stages)
        .await
        .unwrap();

    World {
        svc,
        admin: admin.id,
        grower: grower.id,
        inspector: inspector.id,
        variety: crop.varieties[0].id.clone(),
    }
}

// ---------------------------------------------------------------------------
// Field inspection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn planting_return_accepted_after_single_stage() {
    let mut w = world(&["Flowering"]).await;

    w.act_as(&w.grower.clone()).await;
    let created = w
        .svc
        .create_planting_return(NewPlantingReturn {
            crop_variety_id: w.variety.clone(),
            seed_class: SeedClass::Certified,
            location: "Gulu".into(),
            area_planted: 1.0,
            quantity_planted: 15.0,
            date_planted: None,
            lot_number: Some("LOT-E2E-1".into()),
        })
        .await
        .unwrap();
    assert_eq!(created.stages.len(), 1);

    w.act_as(&w.admin.clone()).await;
    w.svc
        .assign_planting_return_inspector(&[created.id.clone()], &w.inspector, Some("North region"))
        .await
        .unwrap();

    w.act_as(&w.inspector.clone()).await;
    let submission = w
        .svc
        .submit_planting_return_stage(
            &created.id,
            &created.stages[0].id,
            Decision::Approved,
            Some(serde_json::json!({"isolation_distance_m": 50})),
            Some("Healthy stand"),
        )
        .await
        .unwrap();
    assert!(submission.message().contains("accepted"));

    let stored = w.svc.get_planting_return(&created.id).await.unwrap();
    assert_eq!(stored.status, InspectionStatus::Accepted);
    assert_eq!(stored.stages[0].decision, Some(Decision::Approved));

    let history = w
        .svc
        .query_audit(&AuditFilter {
            entity_type: Some(EntityType::PlantingReturn),
            entity_id: Some(created.id.clone()),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    let actions: Vec<AuditAction> = history.iter().rev().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::Created,
            AuditAction::InspectorAssigned,
            AuditAction::StatusChanged,
            AuditAction::StageSubmitted,
            AuditAction::StatusChanged,
        ]
    );
}

// ---------------------------------------------------------------------------
// Bulk assignment
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bulk_assign_is_all_or_nothing() {
    let mut w = world(&[]).await;
    w.act_as(&w.grower.clone()).await;
    let item = PermitItemInput {
        crop_variety_id: w.variety.clone(),
        quantity: 200.0,
        unit: "kg".into(),
    };
    let first = w
        .svc
        .create_permit(PermitType::Import, "Kenya", None, &[item.clone()])
        .await
        .unwrap();
    let second = w
        .svc
        .create_permit(PermitType::Export, "Rwanda", Some("Trial"), &[item])
        .await
        .unwrap();

    w.act_as(&w.admin.clone()).await;
    let ids = vec![first.id.clone(), "prm-missing".to_string(), second.id.clone()];
    let result = w.svc.assign_permit_inspector(&ids, &w.inspector, None).await;
    assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

    for id in [&first.id, &second.id] {
        let permit = w.svc.get_permit(id).await.unwrap();
        assert_eq!(permit.status, ReviewStatus::Pending);
        assert_eq!(permit.inspector_id, None);
    }

    let changes = w
        .svc
        .assign_permit_inspector(&[first.id.clone(), second.id.clone()], &w.inspector, None)
        .await
        .unwrap();
    assert_eq!(changes.len(), 2);
    assert!(changes.iter().all(|c| c.to == ReviewStatus::AssignedInspector));
}

#[tokio::test]
async fn assignment_requires_an_inspector_account() {
    let mut w = world(&[]).await;
    w.act_as(&w.grower.clone()).await;
    let permit = w
        .svc
        .create_permit(
            PermitType::Import,
            "Tanzania",
            None,
            &[PermitItemInput {
                crop_variety_id: w.variety.clone(),
                quantity: 5.0,
                unit: "kg".into(),
            }],
        )
        .await
        .unwrap();

    w.act_as(&w.admin.clone()).await;
    let result = w
        .svc
        .assign_permit_inspector(&[permit.id.clone()], &w.grower, None)
        .await;
    assert!(matches!(result, Err(DatabaseError::Validation(_))));
}

// ---------------------------------------------------------------------------
// Seed lab, labels and traceability
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lab_to_label_to_trace() {
    let mut w = world(&[]).await;

    w.act_as(&w.grower.clone()).await;
    let mother = w
        .svc
        .create_lab_inspection(NewLabInspection {
            lot_number: "LOT-MOTHER".into(),
            mother_lot: None,
            crop_variety_id: w.variety.clone(),
            quantity: 50.0,
        })
        .await
        .unwrap();
    let lab = w
        .svc
        .create_lab_inspection(NewLabInspection {
            lot_number: "LOT-CHILD".into(),
            mother_lot: Some("LOT-MOTHER".into()),
            crop_variety_id: w.variety.clone(),
            quantity: 500.0,
        })
        .await
        .unwrap();

    w.act_as(&w.admin.clone()).await;
    w.svc
        .assign_lab_inspector(&[lab.id.clone()], &w.inspector, None)
        .await
        .unwrap();
    w.act_as(&w.inspector.clone()).await;
    w.svc
        .submit_lab_inspection(&lab.id, Some(serde_json::json!({"sampled_bags": 20})), None)
        .await
        .unwrap();

    w.act_as(&w.admin.clone()).await;
    w.svc.approve_lab_inspection(&lab.id, None).await.unwrap();
    w.svc.receive_lab_sample(&lab.id, Some("Sample 17")).await.unwrap();
    let change = w
        .svc
        .record_lab_result(
            &lab.id,
            Decision::Approved,
            Some(serde_json::json!({"germination": 91, "purity": 99.1})),
            None,
        )
        .await
        .unwrap();
    assert_eq!(change.to, LabStatus::Marketable);

    w.act_as(&w.grower.clone()).await;
    let label = w.svc.create_seed_label(&lab.id, 400.0).await.unwrap();
    w.svc
        .create_stock_record(NewStockRecord {
            lot_number: "LOT-CHILD".into(),
            crop_variety_id: w.variety.clone(),
            seed_class: SeedClass::Certified,
            quantity: 480.0,
            source: Some("Gulu farm".into()),
        })
        .await
        .unwrap();

    // Pending labels do not count as issued.
    let trace = w.svc.track_lot("LOT-CHILD").await.unwrap();
    assert!(trace.seed_details.as_ref().unwrap().label.is_none());

    w.act_as(&w.admin.clone()).await;
    w.svc.approve_seed_label(&label.id, None).await.unwrap();
    let printed = w.svc.print_seed_label(&label.id).await.unwrap();
    assert_eq!(printed.to, LabelStatus::Printed);

    w.svc.set_actor(None);
    let trace = w.svc.track_lot("LOT-CHILD").await.unwrap();
    let details = trace.seed_details.unwrap();
    assert_eq!(details.label.map(|l| l.id), Some(label.id));
    assert_eq!(details.stock.map(|s| s.quantity), Some(480.0));
    assert_eq!(trace.lab_record.map(|l| l.id), Some(lab.id));
    assert_eq!(trace.mother_lot.map(|l| l.id), Some(mother.id));
}

#[tokio::test]
async fn anonymous_caller_cannot_mutate() {
    let mut w = world(&[]).await;
    w.svc.set_actor(None);
    let result = w
        .svc
        .create_lab_inspection(NewLabInspection {
            lot_number: "LOT-X".into(),
            mother_lot: None,
            crop_variety_id: w.variety.clone(),
            quantity: 1.0,
        })
        .await;
    assert!(matches!(result, Err(DatabaseError::Unauthenticated)));
}
