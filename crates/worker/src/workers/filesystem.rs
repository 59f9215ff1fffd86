use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use omnihive_foundation::{
    check_metadata, FileSystemWorker, HiveError, HiveResult, HiveWorker, MetadataShape, Shape,
    WorkerBase,
};
use serde::Deserialize;
use serde_json::Value;
use tokio::fs;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileSystemMetadata {
    pub root_path: String,
}

impl MetadataShape for FileSystemMetadata {
    fn shape() -> Shape {
        Shape::new().string("rootPath", ".")
    }
}

/// Local disk access confined to `rootPath`.
pub struct LocalFileSystemWorker {
    base: WorkerBase,
    root: PathBuf,
}

impl LocalFileSystemWorker {
    pub fn new() -> Self {
        Self {
            base: WorkerBase::new(),
            root: PathBuf::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `path` onto the root. Absolute paths and `..` are refused.
    fn resolve(&self, path: &str) -> HiveResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(HiveError::capability_error(format!(
                "Path {path} is outside the root of hive worker {}",
                self.name()
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl Default for LocalFileSystemWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HiveWorker for LocalFileSystemWorker {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn metadata(&self) -> &Value {
        self.base.metadata()
    }

    async fn init(&mut self, name: &str, metadata: &Value) -> HiveResult<()> {
        let checked: FileSystemMetadata = check_metadata(metadata, name)?;
        fs::create_dir_all(&checked.root_path).await?;
        self.root = PathBuf::from(checked.root_path);
        self.base.set(name, metadata);
        Ok(())
    }
}

#[async_trait]
impl FileSystemWorker for LocalFileSystemWorker {
    async fn exists(&self, path: &str) -> HiveResult<bool> {
        Ok(fs::try_exists(self.resolve(path)?).await?)
    }

    async fn read_file(&self, path: &str) -> HiveResult<String> {
        Ok(fs::read_to_string(self.resolve(path)?).await?)
    }

    async fn write_file(&self, path: &str, contents: &str) -> HiveResult<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(target, contents).await?;
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> HiveResult<()> {
        fs::remove_file(self.resolve(path)?).await?;
        Ok(())
    }

    async fn ensure_folder(&self, path: &str) -> HiveResult<()> {
        fs::create_dir_all(self.resolve(path)?).await?;
        Ok(())
    }

    async fn read_dir(&self, path: &str) -> HiveResult<Vec<String>> {
        let mut entries = fs::read_dir(self.resolve(path)?).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    async fn worker(dir: &TempDir) -> LocalFileSystemWorker {
        let mut worker = LocalFileSystemWorker::new();
        worker
            .init(
                "fs",
                &json!({ "rootPath": dir.path().to_string_lossy() }),
            )
            .await
            .unwrap();
        worker
    }

    #[tokio::test]
    async fn test_write_read_remove() {
        let dir = TempDir::new().unwrap();
        let fs_worker = worker(&dir).await;

        fs_worker.write_file("a/b.txt", "hello").await.unwrap();
        assert!(fs_worker.exists("a/b.txt").await.unwrap());
        assert_eq!(fs_worker.read_file("a/b.txt").await.unwrap(), "hello");
        assert_eq!(fs_worker.read_dir("a").await.unwrap(), vec!["b.txt"]);

        fs_worker.remove_file("a/b.txt").await.unwrap();
        assert!(!fs_worker.exists("a/b.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_folder_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let fs_worker = worker(&dir).await;
        fs_worker.ensure_folder("x/y").await.unwrap();
        fs_worker.ensure_folder("x/y").await.unwrap();
        assert!(dir.path().join("x/y").is_dir());
    }

    #[tokio::test]
    async fn test_paths_outside_root_refused() {
        let dir = TempDir::new().unwrap();
        let fs_worker = worker(&dir).await;
        let err = fs_worker.read_file("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, HiveError::Capability(_)));
        assert!(!err.is_retryable());
        assert!(fs_worker.read_file("/etc/passwd").await.is_err());
    }
}
