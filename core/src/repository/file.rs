use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::model::work_item::WorkItem;
use crate::repository::traits::WorkItemRepository;

const ITEMS_FILE_NAME: &str = "items.json";

/// A JSON array of records stored in one file, created empty on first use.
#[derive(Debug, Clone)]
pub struct JsonFile<T> {
    path: PathBuf,
    _records: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> JsonFile<T> {
    pub fn open(dir: &Path, file_name: &str) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Could not create data directory {}", dir.display()))?;
        let path = dir.join(file_name);
        let store = Self {
            path,
            _records: PhantomData,
        };
        if !store.path.exists() {
            store.write(&[])?;
        }
        Ok(store)
    }

    pub fn read(&self) -> Result<Vec<T>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Could not open {}", self.path.display()))?;
        let reader = BufReader::new(file);
        let records = serde_json::from_reader(reader)
            .with_context(|| format!("Could not parse {}", self.path.display()))?;
        Ok(records)
    }

    pub fn write(&self, records: &[T]) -> Result<()> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FileWorkItemRepository {
    store: JsonFile<WorkItem>,
}

impl FileWorkItemRepository {
    pub fn new(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            store: JsonFile::open(data_dir, ITEMS_FILE_NAME)?,
        })
    }
}

impl WorkItemRepository for FileWorkItemRepository {
    fn create(&self, item: WorkItem) -> Result<WorkItem> {
        let mut items = self.store.read()?;
        items.push(item.clone());
        self.store.write(&items)?;
        Ok(item)
    }

    fn get(&self, id: &Uuid) -> Result<WorkItem> {
        self.store
            .read()?
            .into_iter()
            .find(|i| i.id == *id)
            .ok_or_else(|| anyhow!("Work item with ID {} not found", id))
    }

    fn list(&self) -> Result<Vec<WorkItem>> {
        self.store.read()
    }

    fn update(&self, item: &WorkItem) -> Result<()> {
        let mut items = self.store.read()?;
        if let Some(pos) = items.iter().position(|i| i.id == item.id) {
            items[pos] = item.clone();
            self.store.write(&items)
        } else {
            Err(anyhow!("Work item with ID {} not found", item.id))
        }
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let mut items = self.store.read()?;
        let initial_len = items.len();
        items.retain(|i| i.id != *id);

        if items.len() == initial_len {
            return Err(anyhow!("Work item with ID {} not found", id));
        }

        self.store.write(&items)
    }
}
