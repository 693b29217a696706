use std::path::{Path, PathBuf};

use crate::techstack::tools::error::Result;
use crate::techstack::tools::publish::FsBlobStore;
use crate::techstack::tools::store::JsonFileStore;

/// Store document used when none is configured.
pub const DEFAULT_STORE_PATH: &str = "techstack-store.json";
/// Directory rendered roadmaps are published into when none is configured.
pub const DEFAULT_PUBLISH_DIR: &str = "public";

/// Resolved runtime settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store_path: PathBuf,
    pub publish_dir: PathBuf,
    pub public_url: String,
}

impl Settings {
    /// Builds settings; without a public URL, published files are addressed
    /// through a `file://` URL of the publish directory.
    pub fn new(store_path: PathBuf, publish_dir: PathBuf, public_url: Option<String>) -> Self {
        let public_url = public_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| file_url(&publish_dir));
        Self {
            store_path,
            publish_dir,
            public_url,
        }
    }

    /// Opens the configured document store. Failure here is fatal for a run.
    pub fn open_store(&self) -> Result<JsonFileStore> {
        Ok(JsonFileStore::open(&self.store_path)?)
    }

    pub fn blob_store(&self) -> FsBlobStore {
        FsBlobStore::new(&self.publish_dir, &self.public_url)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(
            PathBuf::from(DEFAULT_STORE_PATH),
            PathBuf::from(DEFAULT_PUBLISH_DIR),
            None,
        )
    }
}

fn file_url(dir: &Path) -> String {
    let absolute = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
    format!("file://{}", absolute.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_public_url_wins() {
        let settings = Settings::new(
            PathBuf::from("store.json"),
            PathBuf::from("public"),
            Some("https://cdn.example.com".to_string()),
        );
        assert_eq!(settings.public_url, "https://cdn.example.com");
    }

    #[test]
    fn falls_back_to_file_url() {
        let settings = Settings::default();
        assert!(settings.public_url.starts_with("file://"));
        assert!(settings.public_url.ends_with("public"));
    }
}
