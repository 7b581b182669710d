use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
};

use tokio::fs;

use crate::{error::Result, types::IngestionResult};

/// Get the cache directory for a given URL
pub fn get_cache_dir(url: &str) -> PathBuf {
    get_root_cache_dir().join(url_key(url))
}

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("remix")
}

fn url_key(url: &str) -> String {
    let mut hasher = DefaultHasher::new();
    url.trim().hash(&mut hasher);
    hasher.finish().to_string()
}

/// Get the path for a cached result file
pub fn get_result_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join("result.json")
}

/// Save a result, creating parent directories as needed
pub async fn save_result(result: &IngestionResult, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let pretty_json = serde_json::to_string_pretty(result)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

/// Load a result from a cached file
pub async fn load_result(path: &Path) -> Result<IngestionResult> {
    let json_content = fs::read_to_string(path).await?;
    let result: IngestionResult = serde_json::from_str(&json_content)?;
    Ok(result)
}
