//! Local persistence of edited snippet text.
//!
//! Each interactive code block is identified by a stable content id derived from its original
//! snippet. Edits are kept per `(content_id, language_id)` so that a reader who comes back to a
//! page finds their version of the snippet. Execution state is never persisted.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use codeplay_utils::{env, SOURCES_SUBDIR, SOURCE_FILE_EXTENSION};
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::CodeplayResult;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Number of hex characters kept from the snippet digest.
const CONTENT_ID_LEN: usize = 16;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Directory-backed store of edited snippets, one file per key.
#[derive(Debug, Clone)]
pub struct SourceStore {
    root: PathBuf,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl SourceStore {
    /// Create a store rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a store in the codeplay home directory.
    pub fn default_location() -> Self {
        Self::new(env::get_codeplay_home_path().join(SOURCES_SUBDIR))
    }

    /// Get the directory the store writes to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the edited text for a block, if the reader changed it.
    pub async fn load(&self, content_id: &str, language_id: &str) -> CodeplayResult<Option<String>> {
        match fs::read_to_string(self.path_for(content_id, language_id)).await {
            Ok(source) => Ok(Some(source)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Save the edited text for a block.
    pub async fn save(
        &self,
        content_id: &str,
        language_id: &str,
        source: &str,
    ) -> CodeplayResult<()> {
        fs::create_dir_all(&self.root).await?;
        fs::write(self.path_for(content_id, language_id), source).await?;
        tracing::debug!("saved {} bytes for {}/{}", source.len(), content_id, language_id);
        Ok(())
    }

    /// Forget the edited text for a block. Clearing a missing entry is not an error.
    pub async fn clear(&self, content_id: &str, language_id: &str) -> CodeplayResult<()> {
        match fs::remove_file(self.path_for(content_id, language_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn path_for(&self, content_id: &str, language_id: &str) -> PathBuf {
        let key = format!("{}-{}", sanitize(content_id), sanitize(language_id));
        self.root.join(key).with_extension(SOURCE_FILE_EXTENSION)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Derive a stable content id from a block's original snippet.
pub fn content_id(original_source: &str) -> String {
    let digest = Sha256::digest(original_source.as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(CONTENT_ID_LEN);
    id
}

fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_content_id_is_stable() {
        let id = content_id("print('hello')");
        assert_eq!(id.len(), CONTENT_ID_LEN);
        assert_eq!(id, content_id("print('hello')"));
        assert_ne!(id, content_id("print('hello!')"));
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_keys_cannot_escape_root() {
        let store = SourceStore::new("/tmp/codeplay-store");
        let path = store.path_for("../../etc", "passwd/x");
        assert_eq!(path.parent(), Some(Path::new("/tmp/codeplay-store")));
    }

    #[test_log::test(tokio::test)]
    async fn test_save_load_clear() -> CodeplayResult<()> {
        let temp_dir = TempDir::new()?;
        let store = SourceStore::new(temp_dir.path().join("sources"));
        let id = content_id("fn main() {}");

        assert_eq!(store.load(&id, "rust").await?, None);

        store.save(&id, "rust", "fn main() { println!(\"hi\"); }").await?;
        assert_eq!(
            store.load(&id, "rust").await?.as_deref(),
            Some("fn main() { println!(\"hi\"); }")
        );
        assert_eq!(store.load(&id, "go").await?, None);

        store.clear(&id, "rust").await?;
        assert_eq!(store.load(&id, "rust").await?, None);
        store.clear(&id, "rust").await?;

        Ok(())
    }
}
