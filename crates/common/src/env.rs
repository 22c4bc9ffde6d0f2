//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

/// Ensure the directory holding the data file exists, creating it if needed.
///
/// The data file itself is created lazily on first save; only its parent
/// directory has to exist up front.
pub async fn ensure_data_dir(data_file: &str) -> anyhow::Result<()> {
    if let Some(parent) = std::path::Path::new(data_file).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_parent_dirs() -> anyhow::Result<()> {
        let base = std::env::temp_dir().join(format!("kvserve_env_{}", std::process::id()));
        let file = base.join("nested/data.json");
        ensure_data_dir(file.to_str().unwrap()).await?;
        assert!(file.parent().unwrap().is_dir());
        let _ = tokio::fs::remove_dir_all(&base).await;
        Ok(())
    }

    #[tokio::test]
    async fn bare_file_name_is_fine() -> anyhow::Result<()> {
        ensure_data_dir("data.json").await
    }
}
