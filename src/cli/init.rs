use crate::Config;
use anyhow::Result;
use std::path::PathBuf;

pub async fn run(path: PathBuf) -> Result<()> {
    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(path.join("data"))?;

    let config_path = path.join("vault.toml");
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }
    std::fs::write(&config_path, Config::default_toml())?;

    tracing::info!("Created new vault at {:?}", path);
    tracing::info!("Run 'vault migrate' to set up the database");
    tracing::info!("Run 'vault serve' to start the server");

    Ok(())
}
