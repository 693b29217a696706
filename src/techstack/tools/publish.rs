//! Publishing rendered roadmaps to static hosting.

use std::fs;
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::techstack::tools::error::{Result, ToolError};
use crate::techstack::tools::model::Roadmap;
use crate::techstack::tools::roadmaps::get_roadmap;
use crate::techstack::tools::store::Store;

/// Folder under which rendered roadmaps are uploaded.
pub const ROADMAP_PREFIX: &str = "roadmaps";

/// Receipt returned by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedBlob {
    pub path: String,
    /// Hex-encoded SHA-256 of the uploaded content.
    pub sha: String,
    pub url: String,
}

/// Remote file hosting addressed by relative path.
pub trait BlobStore {
    /// Uploads `content` at `path`, replacing any previous content.
    fn upload(&mut self, path: &str, content: &[u8]) -> Result<PublishedBlob>;
    /// Returns `None` when nothing is stored at `path`.
    fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>>;
}

/// Blob store backed by a local directory served at `public_base_url`.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let is_plain = !path.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !is_plain {
            return Err(ToolError::InvalidBlobPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), path)
    }
}

impl BlobStore for FsBlobStore {
    fn upload(&mut self, path: &str, content: &[u8]) -> Result<PublishedBlob> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content)?;
        Ok(PublishedBlob {
            path: path.to_string(),
            sha: content_hash(content),
            url: self.public_url(path),
        })
    }

    fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let target = self.resolve(path)?;
        match fs::read(&target) {
            Ok(content) => Ok(Some(content)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}

/// Hex-encoded SHA-256 digest.
pub fn content_hash(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// File name a roadmap is published under, e.g. `acme-frontend-engineer.html`.
pub fn roadmap_filename(roadmap: &Roadmap) -> String {
    format!("{}-{}.html", slugify(&roadmap.company), slugify(&roadmap.role))
}

/// Uploads a pre-rendered roadmap document and records where it now lives.
#[instrument(level = "info", skip(store, blobs, rendered), fields(bytes = rendered.len()))]
pub fn publish_roadmap<S, B>(store: &mut S, blobs: &mut B, id: Uuid, rendered: &[u8]) -> Result<Roadmap>
where
    S: Store + ?Sized,
    B: BlobStore + ?Sized,
{
    let mut roadmap = get_roadmap(store, id)?;
    let filename = roadmap_filename(&roadmap);
    let blob = blobs.upload(&format!("{ROADMAP_PREFIX}/{filename}"), rendered)?;
    info!(url = %blob.url, sha = %blob.sha, "roadmap uploaded");

    roadmap.url = Some(blob.url);
    roadmap.filename = Some(filename);
    roadmap.touch();
    Ok(store.replace_roadmap(roadmap)?)
}

fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for ch in value.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "roadmap".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn slugs_collapse_punctuation() {
        let roadmap = Roadmap::new("Acme, Inc.", "Front-end  Engineer");
        assert_eq!(roadmap_filename(&roadmap), "acme-inc-front-end-engineer.html");
        assert_eq!(slugify("***"), "roadmap");
    }

    #[test]
    fn fetch_of_absent_path_is_none() {
        let dir = tempdir().unwrap();
        let blobs = FsBlobStore::new(dir.path(), "https://cdn.example.com");
        assert_eq!(blobs.fetch("roadmaps/missing.html").unwrap(), None);
    }

    #[test]
    fn upload_returns_hash_and_public_url() {
        let dir = tempdir().unwrap();
        let mut blobs = FsBlobStore::new(dir.path(), "https://cdn.example.com/");
        let blob = blobs.upload("roadmaps/a.html", b"abc").unwrap();
        assert_eq!(blob.url, "https://cdn.example.com/roadmaps/a.html");
        assert_eq!(
            blob.sha,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(blobs.fetch("roadmaps/a.html").unwrap(), Some(b"abc".to_vec()));
    }

    #[test]
    fn traversal_is_rejected() {
        let dir = tempdir().unwrap();
        let mut blobs = FsBlobStore::new(dir.path(), "https://cdn.example.com");
        assert!(matches!(
            blobs.upload("../escape.html", b"x"),
            Err(ToolError::InvalidBlobPath(_))
        ));
    }
}
