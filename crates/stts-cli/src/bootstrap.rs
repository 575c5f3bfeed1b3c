use anyhow::Context;
use stts_config::SttsConfig;

/// Load `.env` from the working directory, then layered configuration.
pub fn load_config() -> anyhow::Result<SttsConfig> {
    load_dotenv()?;
    SttsConfig::load().context("failed to load stts configuration")
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}
