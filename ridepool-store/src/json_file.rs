use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use ridepool_core::CoreResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// One collection persisted as a pretty-printed JSON array.
///
/// The file is read whole and rewritten whole. Writes land in a sibling temp file
/// first and are renamed into place, so readers never observe a half-written array.
#[derive(Debug)]
pub struct JsonFile<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> CoreResult<bool> {
        Ok(tokio::fs::try_exists(&self.path).await?)
    }

    /// Reads every record. A missing or blank file is an empty collection.
    pub async fn load(&self) -> CoreResult<Vec<T>> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    pub async fn save(&self, records: &[T]) -> CoreResult<()> {
        let data = serde_json::to_string_pretty(records)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), records = records.len(), "Collection written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
