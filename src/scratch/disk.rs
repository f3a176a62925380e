use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::BufWriter;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::TempDir;

use super::{ScratchError, ScratchStore};

/// Disk-backed scratch store: one CSV file per key.
///
/// File names are `{index:05}_{sanitized key}.csv`, so distinct keys never
/// collide even when they sanitize to the same text.
#[derive(Debug)]
pub struct DiskScratch<T> {
    root: PathBuf,
    files: HashMap<String, PathBuf>,
    // held for its drop, which removes the directory
    _temp: Option<TempDir>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> DiskScratch<T> {
    /// Scratch store in a fresh temporary directory, removed on drop
    pub fn temporary() -> Result<Self, ScratchError> {
        let temp = tempfile::Builder::new().prefix("pepnorm-scratch-").tempdir()?;
        debug!("Scratch buffers in {}", temp.path().display());
        Ok(Self {
            root: temp.path().to_path_buf(),
            files: HashMap::new(),
            _temp: Some(temp),
            _marker: PhantomData,
        })
    }

    /// Scratch store in a caller-owned directory, kept after the run
    pub fn in_dir<P: AsRef<Path>>(root: P) -> Result<Self, ScratchError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            files: HashMap::new(),
            _temp: None,
            _marker: PhantomData,
        })
    }

    /// Directory holding the buffer files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the buffer file of `key`, if it was written
    pub fn path_of(&self, key: &str) -> Option<&Path> {
        self.files.get(key).map(PathBuf::as_path)
    }

    fn file_name(&self, key: &str) -> String {
        let sanitized: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
            .collect();
        format!("{:05}_{}.csv", self.files.len(), sanitized)
    }
}

impl<T: Serialize + DeserializeOwned> ScratchStore<T> for DiskScratch<T> {
    fn append(&mut self, key: &str, rows: &[T]) -> Result<(), ScratchError> {
        if rows.is_empty() {
            return Ok(());
        }
        let (path, first) = match self.files.get(key) {
            Some(path) => (path.clone(), false),
            None => {
                let path = self.root.join(self.file_name(key));
                self.files.insert(key.to_string(), path.clone());
                (path, true)
            }
        };

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(first)
            .from_writer(BufWriter::new(file));
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn read_all(&self, key: &str) -> Result<Vec<T>, ScratchError> {
        let Some(path) = self.files.get(key) else {
            return Ok(Vec::new());
        };
        let mut reader = csv::Reader::from_reader(File::open(path)?);
        reader
            .deserialize()
            .map(|row| row.map_err(ScratchError::from))
            .collect()
    }

    fn exists(&self, key: &str) -> bool {
        self.files.contains_key(key)
    }
}
