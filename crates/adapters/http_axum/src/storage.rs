//! File-backed state documents: one `{name}.json` file per component.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use homepanel_app::ports::StateStore;
use homepanel_domain::error::{HomePanelError, NotFoundError};
use homepanel_domain::name::ComponentName;

/// Errors specific to the data directory.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// No document has been stored for this component yet.
    #[error("no document stored for {0}")]
    Missing(String),

    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but does not hold a JSON document.
    #[error("{} does not hold valid JSON", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode document")]
    Encode(#[source] serde_json::Error),
}

impl ResourceError {
    /// Convert into a [`HomePanelError`] for propagation across port
    /// boundaries.
    pub fn into_domain(self) -> HomePanelError {
        match self {
            Self::Missing(name) => NotFoundError {
                resource: "state",
                name,
            }
            .into(),
            other => HomePanelError::Transport(Box::new(other)),
        }
    }
}

impl From<ResourceError> for HomePanelError {
    fn from(err: ResourceError) -> Self {
        err.into_domain()
    }
}

/// Directory of component state documents.
#[derive(Debug)]
pub struct JsonDirectory {
    root: PathBuf,
    temp_counter: AtomicU64,
}

impl JsonDirectory {
    /// The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            temp_counter: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, name: &ComponentName) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    /// Read and parse a component's document.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Missing`] if no file exists, otherwise an I/O or
    /// parse failure.
    pub async fn read(&self, name: &ComponentName) -> Result<serde_json::Value, ResourceError> {
        let path = self.path_for(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ResourceError::Missing(name.to_string()));
            }
            Err(source) => return Err(ResourceError::Read { path, source }),
        };
        serde_json::from_slice(&bytes).map_err(|source| ResourceError::Corrupt { path, source })
    }

    /// Replace a component's document.
    ///
    /// The document is written to a temporary file then renamed over the
    /// previous one, so readers never observe a partial write.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn write(
        &self,
        name: &ComponentName,
        document: &serde_json::Value,
    ) -> Result<(), ResourceError> {
        let mut bytes = serde_json::to_vec_pretty(document).map_err(ResourceError::Encode)?;
        bytes.push(b'\n');

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| ResourceError::Write {
                path: self.root.clone(),
                source,
            })?;

        let seq = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        let temp = self.root.join(format!(".{name}.json.{seq}.tmp"));
        tokio::fs::write(&temp, &bytes)
            .await
            .map_err(|source| ResourceError::Write {
                path: temp.clone(),
                source,
            })?;

        let path = self.path_for(name);
        if let Err(source) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(ResourceError::Write { path, source });
        }
        tracing::debug!(path = %path.display(), "stored document");
        Ok(())
    }
}

impl StateStore for JsonDirectory {
    async fn fetch(&self, name: &ComponentName) -> Result<serde_json::Value, HomePanelError> {
        Ok(self.read(name).await?)
    }

    async fn store(
        &self,
        name: &ComponentName,
        body: serde_json::Value,
    ) -> Result<(), HomePanelError> {
        Ok(self.write(name, &body).await?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn name(raw: &str) -> ComponentName {
        ComponentName::new(raw).unwrap()
    }

    #[tokio::test]
    async fn should_read_back_written_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirectory::new(dir.path());

        store
            .write(&name("heating"), &json!({"temperature": 21}))
            .await
            .unwrap();

        let document = store.read(&name("heating")).await.unwrap();
        assert_eq!(document, json!({"temperature": 21}));
    }

    #[tokio::test]
    async fn should_write_pretty_printed_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirectory::new(dir.path());

        store
            .write(&name("lighting"), &json!({"lighting_state": true}))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("lighting.json")).unwrap();
        assert_eq!(raw, "{\n  \"lighting_state\": true\n}\n");
    }

    #[tokio::test]
    async fn should_leave_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirectory::new(dir.path());

        store.write(&name("heating"), &json!({"temperature": 20})).await.unwrap();
        store.write(&name("heating"), &json!({"temperature": 22})).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("heating.json")]);
    }

    #[tokio::test]
    async fn should_create_missing_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirectory::new(dir.path().join("www").join("data"));

        store.write(&name("heating"), &json!({"temperature": 20})).await.unwrap();

        assert!(dir.path().join("www/data/heating.json").is_file());
    }

    #[tokio::test]
    async fn should_report_missing_document_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirectory::new(dir.path());

        let err = store.fetch(&name("heating")).await.unwrap_err();

        assert!(matches!(err, HomePanelError::NotFound(_)));
    }

    #[tokio::test]
    async fn should_report_corrupt_document_as_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("heating.json"), "{not json").unwrap();
        let store = JsonDirectory::new(dir.path());

        let err = store.read(&name("heating")).await.unwrap_err();
        assert!(matches!(err, ResourceError::Corrupt { .. }));
        assert!(matches!(err.into_domain(), HomePanelError::Transport(_)));
    }
}
