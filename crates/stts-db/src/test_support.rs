//! Shared test utilities for stts-db tests.

pub(crate) mod helpers {
    use stts_core::entities::Crop;

    use crate::repos::user::NewUser;
    use crate::service::SttsService;
    use crate::updates::crop::StageTemplate;

    /// In-memory service acting as `admin`, plus an applicant and an inspector
    /// with their own roles.
    pub struct Fixture {
        pub svc: SttsService,
        pub admin: String,
        pub applicant: String,
        pub inspector: String,
    }

    pub async fn fixture() -> Fixture {
        let mut svc = SttsService::new_local(":memory:").await.unwrap();
        let admin = svc.bootstrap_admin("admin", "Administrator").await.unwrap();
        let admin_actor = svc.actor_for_user(&admin.id).await.unwrap();
        svc.set_actor(Some(admin_actor));

        let applicant_role = svc
            .create_role(
                "applicant",
                &["can_apply".into(), "can_trade".into()],
            )
            .await
            .unwrap();
        let inspector_role = svc
            .create_role("inspector", &["can_inspect".into()])
            .await
            .unwrap();

        let applicant = svc
            .create_user(NewUser {
                username: "grower".into(),
                name: "Seed Grower".into(),
                is_grower: true,
                ..NewUser::default()
            })
            .await
            .unwrap();
        svc.grant_role(&applicant.id, &applicant_role.id).await.unwrap();

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

        Fixture {
            svc,
            admin: admin.id,
            applicant: applicant.id,
            inspector: inspector.id,
        }
    }

    /// Switch the service's caller to a stored user.
    pub async fn act_as(svc: &mut SttsService, user_id: &str) {
        let actor = svc.actor_for_user(user_id).await.unwrap();
        svc.set_actor(Some(actor));
    }

    /// Create a crop with one variety and the named inspection stages.
    pub async fn crop_with_stages(svc: &SttsService, stages: &[&str]) -> Crop {
        let stages = stages
            .iter()
            .map(|name| StageTemplate {
                name: (*name).to_string(),
                period_after_planting_days: None,
            })
            .collect();
        svc.create_crop("Maize", &["Longe 5".to_string()], stages)
            .await
            .unwrap()
    }
}
