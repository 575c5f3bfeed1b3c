use std::path::Path;

use anyhow::Context;
use stts_config::SttsConfig;
use stts_core::identity::Actor;
use stts_db::service::SttsService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: SttsService,
    pub config: SttsConfig,
}

impl AppContext {
    /// Open the database and resolve who is calling.
    ///
    /// The caller comes from a bearer token when one is given, otherwise from
    /// a stored user id. A token caller must be a stored user and never gets
    /// more than that user's roles grant. With neither, the context is anonymous and only
    /// reads succeed.
    pub async fn init(config: SttsConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let mut ctx = Self::open(config, flags).await?;
        let actor = resolve_actor(&ctx.service, &ctx.config, flags).await?;
        if let Some(ref actor) = actor {
            tracing::debug!(user_id = %actor.user_id, permissions = actor.permissions.len(), "caller resolved");
        }
        ctx.service.set_actor(actor);
        Ok(ctx)
    }

    /// Open the database without a caller. `--db` overrides the configured path.
    pub async fn open(config: SttsConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let mut db_config = config.database.clone();
        if let Some(path) = &flags.db {
            db_config.path.clone_from(path);
        }
        ensure_parent_dir(&db_config.path)?;

        let service = SttsService::from_config(&db_config)
            .await
            .context("failed to open stts database")?;

        Ok(Self { service, config })
    }
}

async fn resolve_actor(
    service: &SttsService,
    config: &SttsConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<Option<Actor>> {
    let token = flags
        .token
        .clone()
        .or_else(|| config.auth.has_token().then(|| config.auth.token.clone()));
    if let Some(token) = token {
        let claimed = stts_auth::actor_from_token(&token, config.auth.expiry_buffer_secs)
            .context("bearer token rejected")?;
        let subject = claimed.user_id.clone();
        let actor = service
            .confirm_token_actor(claimed)
            .await
            .with_context(|| format!("bearer token subject '{subject}' is not a known user"))?;
        return Ok(Some(actor));
    }

    let user = flags
        .user
        .clone()
        .or_else(|| config.auth.has_user().then(|| config.auth.user_id.clone()));
    match user {
        Some(user_id) => {
            let actor = service
                .actor_for_user(&user_id)
                .await
                .with_context(|| format!("cannot act as user '{user_id}'"))?;
            Ok(Some(actor))
        }
        None => Ok(None),
    }
}

fn ensure_parent_dir(db_path: &str) -> anyhow::Result<()> {
    if db_path == ":memory:" {
        return Ok(());
    }
    let Some(parent) = Path::new(db_path).parent() else {
        return Ok(());
    };
    if !parent.as_os_str().is_empty() && !parent.exists() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create database directory {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn flags() -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            limit: None,
            quiet: true,
            verbose: false,
            token: None,
            user: None,
            db: None,
        }
    }

    #[tokio::test]
    async fn anonymous_without_token_or_user() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("stts.db");
        let flags = GlobalFlags {
            db: Some(path.to_string_lossy().into_owned()),
            ..flags()
        };

        let ctx = AppContext::init(SttsConfig::default(), &flags).await.unwrap();
        assert!(ctx.service.actor().is_none());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn unknown_user_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let flags = GlobalFlags {
            db: Some(dir.path().join("stts.db").to_string_lossy().into_owned()),
            user: Some("usr-nobody".into()),
            ..flags()
        };

        let err = AppContext::init(SttsConfig::default(), &flags)
            .await
            .err()
            .expect("unknown user must fail");
        assert!(format!("{err:#}").contains("usr-nobody"));
    }

    fn bearer(sub: &str, permissions: &[&str]) -> String {
        use base64::Engine as _;
        let enc = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let exp = chrono::Utc::now().timestamp() + 3600;
        let perms: Vec<serde_json::Value> = permissions
            .iter()
            .map(|p| {
                let mut entry = serde_json::Map::new();
                entry.insert((*p).to_string(), serde_json::Value::Bool(true));
                serde_json::Value::Object(entry)
            })
            .collect();
        let payload = serde_json::json!({ "sub": sub, "exp": exp, "permissions": perms });
        format!(
            "{}.{}.{}",
            enc.encode(r#"{"alg":"HS256"}"#),
            enc.encode(payload.to_string()),
            enc.encode("not-a-signature")
        )
    }

    #[tokio::test]
    async fn token_for_unknown_user_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let flags = GlobalFlags {
            db: Some(dir.path().join("stts.db").to_string_lossy().into_owned()),
            token: Some(bearer("usr-nobody", &["can_approve", "can_manage_users"])),
            ..flags()
        };

        let err = AppContext::init(SttsConfig::default(), &flags)
            .await
            .err()
            .expect("forged token must fail");
        assert!(format!("{err:#}").contains("usr-nobody"));
    }

    #[tokio::test]
    async fn token_permissions_are_capped_by_roles() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("stts.db").to_string_lossy().into_owned();
        let mut svc = SttsService::new_local(&db).await.unwrap();
        let admin = svc.bootstrap_admin("admin", "Administrator").await.unwrap();
        let admin_actor = svc.actor_for_user(&admin.id).await.unwrap();
        svc.set_actor(Some(admin_actor));
        let grower = svc
            .create_user(stts_db::repos::user::NewUser {
                username: "grower".into(),
                name: "Seed Grower".into(),
                is_grower: true,
                ..Default::default()
            })
            .await
            .unwrap();
        let role = svc.create_role("applicant", &["can_apply".into()]).await.unwrap();
        svc.grant_role(&grower.id, &role.id).await.unwrap();
        drop(svc);

        let flags = GlobalFlags {
            db: Some(db),
            token: Some(bearer(&grower.id, &["can_apply", "can_approve"])),
            ..flags()
        };
        let ctx = AppContext::init(SttsConfig::default(), &flags).await.unwrap();
        let actor = ctx.service.actor().expect("actor resolved");
        assert_eq!(actor.user_id, grower.id);
        assert!(actor.permissions.contains("can_apply"));
        assert!(!actor.permissions.contains("can_approve"));
    }

    #[tokio::test]
    async fn stored_user_becomes_actor() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("stts.db").to_string_lossy().into_owned();
        let admin = SttsService::new_local(&db)
            .await
            .unwrap()
            .bootstrap_admin("admin", "Administrator")
            .await
            .unwrap();

        let flags = GlobalFlags {
            db: Some(db),
            user: Some(admin.id.clone()),
            ..flags()
        };
        let ctx = AppContext::init(SttsConfig::default(), &flags).await.unwrap();
        let actor = ctx.service.actor().expect("actor resolved");
        assert_eq!(actor.user_id, admin.id);
        assert!(actor.permissions.contains("can_approve"));
    }
}
