use {
    crate::*,
    std::{
        fs,
        io::{self, Write},
        path::{Path, PathBuf},
    },
};

const RECORD_EXTENSION: &str = "item";
const TEMP_EXTENSION: &str = "tmp";

/// Store with one file per key in a dedicated directory.
///
/// Records are written to `<key>.tmp` and renamed to `<key>.item`, so a
/// crash mid-write leaves at most a stray temp file, never a torn record.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the store directory. Leftover temp files
    /// from an interrupted write are removed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == TEMP_EXTENSION) {
                log::warn!("removing interrupted write {}", path.display());
                fs::remove_file(&path)?;
            }
        }
        log::debug!("file store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{RECORD_EXTENSION}")))
    }
}

impl Store for FileStore {
    fn put(&self, key: &str, record: &[u8]) -> Result<(), StoreError> {
        let path = self.record_path(key)?;
        let tmp_path = path.with_extension(TEMP_EXTENSION);
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(record)?;
        file.sync_all()?;
        drop(file);
        if let Err(err) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.record_path(key)?) {
            Ok(record) => Ok(Some(record)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        match fs::remove_file(self.record_path(key)?) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == RECORD_EXTENSION) {
                continue;
            }
            if let Some(key) = path.file_stem().and_then(|stem| stem.to_str()) {
                if validate_key(key).is_ok() {
                    keys.push(key.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn used_bytes(&self) -> Result<u64, StoreError> {
        let mut used = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry
                .path()
                .extension()
                .is_some_and(|ext| ext == RECORD_EXTENSION)
            {
                used += entry.metadata()?.len();
            }
        }
        Ok(used)
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.record_path(key)?.is_file())
    }
}
