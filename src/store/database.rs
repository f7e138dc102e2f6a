//! One logical database: an ordered index bound to its dump file
//!
//! Records are one per line, `<key>:<value-dump>`. Keys are written raw, so
//! keys containing `:` or a newline are not representable in the file
//! format; the loader splits each line at the first `:`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use tracing::{debug, error, warn};

use super::files;
use super::skiplist::{Iter, SkipList};
use super::value::Value;

pub struct Database {
    index: SkipList,
    folder: PathBuf,
    file_stem: String,
    database_count: usize,
    database_index: usize,
}

impl Database {
    /// Opens database 0 under `folder`, creating the folder and the dump
    /// files for every database index if absent, then loading the bound
    /// file. Persistence problems are logged, never fatal.
    pub fn open(folder: impl Into<PathBuf>, file_stem: &str, database_count: usize) -> Self {
        let folder = folder.into();
        files::create_folder_and_files(&folder, file_stem, database_count);
        let mut database = Database {
            index: SkipList::new(),
            folder,
            file_stem: file_stem.to_owned(),
            database_count,
            database_index: 0,
        };
        database.load();
        database
    }

    pub fn database_index(&self) -> usize {
        self.database_index
    }

    pub fn database_count(&self) -> usize {
        self.database_count
    }

    fn file_path(&self) -> PathBuf {
        self.folder
            .join(format!("{}{}", self.file_stem, self.database_index))
    }

    /// Switches to database `index`: flushes the current one, swaps in a
    /// fresh index, and loads the file bound to the new slot.
    pub fn select(&mut self, index: i64) -> String {
        if index < 0 || index as usize >= self.database_count {
            return "database index out of range.".to_owned();
        }
        self.flush();
        self.index = SkipList::new();
        self.database_index = index as usize;
        self.load();
        "OK".to_owned()
    }

    /// Whole-file rewrite of the bound dump file. Empty keys are skipped.
    pub fn flush(&self) {
        let path = self.file_path();
        let file = match File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                error!("unable to open {} for flush: {}", path.display(), e);
                return;
            }
        };
        let mut writer = BufWriter::new(file);
        for (key, value) in self.index.iter() {
            if key.is_empty() {
                continue;
            }
            if let Err(e) = writeln!(writer, "{}:{}", key, value.dump_string()) {
                error!("flush to {} failed: {}", path.display(), e);
                return;
            }
        }
        if let Err(e) = writer.flush() {
            error!("flush to {} failed: {}", path.display(), e);
        }
        debug!("flushed {} entries to {}", self.index.len(), path.display());
    }

    /// Loads the bound dump file into the index. Blank lines are skipped;
    /// malformed records are logged and skipped.
    fn load(&mut self) {
        let path = self.file_path();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                error!("unable to open {} for load: {}", path.display(), e);
                return;
            }
        };
        let reader = BufReader::new(file);
        for (line_number, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    error!("read from {} failed: {}", path.display(), e);
                    return;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let Some((key, dump)) = line.split_once(':') else {
                warn!(
                    "skipping record without separator at {}:{}",
                    path.display(),
                    line_number + 1
                );
                continue;
            };
            match Value::parse(dump) {
                Ok(value) => {
                    self.index.insert(key, value);
                }
                Err(e) => warn!(
                    "skipping unparseable record at {}:{}: {}",
                    path.display(),
                    line_number + 1,
                    e
                ),
            }
        }
        debug!("loaded {} entries from {}", self.index.len(), path.display());
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> bool {
        self.index.insert(key, value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.index.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.index.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains(key)
    }

    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        self.index.rename(old, new)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        self.index.iter()
    }
}
