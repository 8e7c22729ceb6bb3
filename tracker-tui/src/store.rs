//! Project store: the single owner of the project collection.
//!
//! The collection lives in one named slot holding a `{ "projects": [...] }`
//! document. Every mutation rewrites the whole slot. Loading never fails:
//! a missing or corrupt slot falls back to the seed document, and a failed
//! seed falls back to an empty collection.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{Project, ProjectsDocument};
use crate::seed::{SeedClient, SeedSource};

/// Name of the persisted slot
pub const SLOT_NAME: &str = "projectsData";

/// A named key-value slot holding the serialized document
pub trait Slot: Send {
    /// Current contents, `None` if the slot has never been written
    fn read(&self) -> StoreResult<Option<String>>;

    /// Replace the contents
    fn write(&mut self, contents: &str) -> StoreResult<()>;

    /// Move unreadable contents out of the way, keeping them intact.
    /// Afterwards the slot reads as empty.
    fn set_aside(&mut self) -> StoreResult<()>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Slot backed by a JSON file, `<dir>/projectsData.json`
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{}.json", SLOT_NAME)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where unreadable contents are moved, `<dir>/projectsData.json.corrupt`
    pub fn corrupt_path(&self) -> PathBuf {
        self.path.with_extension("json.corrupt")
    }
}

impl Slot for FileSlot {
    fn read(&self) -> StoreResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, contents: &str) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Temp file + rename so readers never see a partial document
        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn set_aside(&mut self) -> StoreResult<()> {
        fs::rename(&self.path, self.corrupt_path())?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-process slot
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    contents: Option<String>,
}

#[cfg(test)]
impl MemorySlot {
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
        }
    }
}

#[cfg(test)]
impl Slot for MemorySlot {
    fn read(&self) -> StoreResult<Option<String>> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> StoreResult<()> {
        self.contents = Some(contents.to_string());
        Ok(())
    }

    fn set_aside(&mut self) -> StoreResult<()> {
        self.contents = None;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory:{}", SLOT_NAME)
    }
}

pub struct Store {
    slot: Box<dyn Slot>,
    projects: Vec<Project>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("slot", &self.slot.describe())
            .field("projects", &self.projects.len())
            .finish()
    }
}

impl Store {
    /// Store over an already-known collection. Nothing is written until the
    /// first `persist`.
    pub fn new(slot: Box<dyn Slot>, projects: Vec<Project>) -> Self {
        Self { slot, projects }
    }

    /// Load the collection from `slot`, falling back to the seed document
    /// and then to an empty collection. Failures are logged, never returned.
    ///
    /// A seed is written back only when the slot was empty. Unreadable slot
    /// contents are set aside first; if that fails the slot is left
    /// untouched by loading.
    pub async fn load(slot: Box<dyn Slot>, seeds: &SeedClient, source: &SeedSource) -> Self {
        let mut store = Self::new(slot, Vec::new());
        let mut writable = true;

        let mut dirty = match store.read_slot() {
            Ok(Some(doc)) => {
                tracing::info!(
                    slot = %store.slot.describe(),
                    count = doc.projects.len(),
                    "loaded projects from slot"
                );
                store.projects = doc.projects;
                false
            }
            Ok(None) => {
                tracing::info!(slot = %store.slot.describe(), "slot empty, loading seed");
                store.load_seed(seeds, source).await
            }
            Err(error) => {
                tracing::warn!(slot = %store.slot.describe(), %error, "slot unreadable, loading seed");
                match store.slot.set_aside() {
                    Ok(()) => tracing::warn!(slot = %store.slot.describe(), "unreadable slot contents set aside"),
                    Err(error) => {
                        tracing::error!(slot = %store.slot.describe(), %error, "could not set slot contents aside");
                        writable = false;
                    }
                }
                store.load_seed(seeds, source).await;
                false
            }
        };

        dirty |= store.assign_missing_ids();

        if dirty && writable {
            if let Err(error) = store.persist() {
                tracing::warn!(%error, "failed to write loaded projects back to slot");
            }
        }

        store
    }

    fn read_slot(&self) -> StoreResult<Option<ProjectsDocument>> {
        match self.slot.read()? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Returns true when seed projects were loaded and need persisting
    async fn load_seed(&mut self, seeds: &SeedClient, source: &SeedSource) -> bool {
        match seeds.fetch(source).await {
            Ok(Some(doc)) => {
                tracing::info!(%source, count = doc.projects.len(), "loaded seed document");
                self.projects = doc.projects;
                true
            }
            Ok(None) => {
                tracing::info!("no seed configured, starting empty");
                false
            }
            Err(error) => {
                let error = StoreError::Seed(format!("{:#}", error));
                tracing::warn!(%source, %error, "seed unavailable, starting empty");
                false
            }
        }
    }

    /// Give every project without an id a fresh one
    fn assign_missing_ids(&mut self) -> bool {
        let mut assigned = false;
        for project in self.projects.iter_mut().filter(|p| p.id.is_nil()) {
            project.id = Uuid::new_v4();
            assigned = true;
        }
        assigned
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Append a project (insertion order is display order)
    pub fn push(&mut self, project: Project) {
        self.projects.push(project);
    }

    /// Remove a project by id. Unknown ids leave the collection untouched.
    pub fn remove(&mut self, id: Uuid) -> Option<Project> {
        let index = self.projects.iter().position(|p| p.id == id)?;
        Some(self.projects.remove(index))
    }

    /// Serialized form of the current collection
    pub fn to_json(&self) -> StoreResult<String> {
        let doc = ProjectsDocument {
            projects: self.projects.clone(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Overwrite the slot with the full collection
    pub fn persist(&mut self) -> StoreResult<()> {
        let json = self.to_json()?;
        self.slot.write(&json)?;
        tracing::debug!(slot = %self.slot.describe(), count = self.projects.len(), "persisted projects");
        Ok(())
    }

    /// Raw slot contents
    #[cfg(test)]
    pub fn slot_contents(&self) -> StoreResult<Option<String>> {
        self.slot.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SEED: &str = r#"{"projects":[
        {"name":"Alpha","status":"In Progress","start":"2024-01-01","end":"2024-01-10","tasks":[{"task":"Kickoff","date":"2024-01-02"}]},
        {"name":"Beta","status":"Completed","start":"2024-02-01","end":"2024-02-05","tasks":[]}
    ]}"#;

    fn seed_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_empty_without_seed() {
        let seeds = SeedClient::new().unwrap();
        let store = Store::load(Box::new(MemorySlot::default()), &seeds, &SeedSource::None).await;
        assert!(store.is_empty());
        assert!(store.slot_contents().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_seed_when_slot_missing_and_persist_it() {
        let seeds = SeedClient::new().unwrap();
        let file = seed_file();
        let source = SeedSource::File(file.path().to_path_buf());

        let store = Store::load(Box::new(MemorySlot::default()), &seeds, &source).await;
        assert_eq!(store.len(), 2);
        assert!(store.projects().iter().all(|p| !p.id.is_nil()));

        let written = store.slot_contents().unwrap().unwrap();
        let doc: ProjectsDocument = serde_json::from_str(&written).unwrap();
        assert_eq!(doc.projects, store.projects());
    }

    #[tokio::test]
    async fn test_corrupt_slot_falls_back_to_seed() {
        let seeds = SeedClient::new().unwrap();
        let file = seed_file();
        let source = SeedSource::File(file.path().to_path_buf());

        let slot = MemorySlot::with_contents("{ not json");
        let store = Store::load(Box::new(slot), &seeds, &source).await;
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_schema_invalid_slot_is_kept_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let seeds = SeedClient::new().unwrap();
        let file = seed_file();
        let source = SeedSource::File(file.path().to_path_buf());

        let user_data = r#"{"projects":[{"name":"MyPrecious","status":null,"start":"2024-01-01","end":"2024-01-05","tasks":[]}]}"#;
        let mut slot = FileSlot::new(dir.path());
        slot.write(user_data).unwrap();

        let store = Store::load(Box::new(slot.clone()), &seeds, &source).await;
        assert_eq!(store.len(), 2);
        assert!(store.get(store.projects()[0].id).is_some());

        let kept = fs::read_to_string(slot.corrupt_path()).unwrap();
        assert_eq!(kept, user_data);
        let current = fs::read_to_string(slot.path()).unwrap();
        assert!(!current.contains("MyPrecious"));
    }

    #[tokio::test]
    async fn test_seed_with_ids_is_not_written_over_unreadable_slot() {
        let seeds = SeedClient::new().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let id = Uuid::new_v4();
        write!(
            file,
            r#"{{"projects":[{{"id":"{}","name":"Seeded","status":"On Hold","start":"2024-01-01","end":"2024-01-02","tasks":[]}}]}}"#,
            id
        )
        .unwrap();
        let source = SeedSource::File(file.path().to_path_buf());

        let store = Store::load(Box::new(MemorySlot::with_contents("{ not json")), &seeds, &source).await;
        assert_eq!(store.projects()[0].id, id);
        assert!(store.slot_contents().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_seed_yields_empty_collection() {
        let seeds = SeedClient::new().unwrap();
        let source = SeedSource::File(PathBuf::from("/no/such/seed.json"));
        let store = Store::load(Box::new(MemorySlot::with_contents("garbage")), &seeds, &source).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_persist_load_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let seeds = SeedClient::new().unwrap();
        let file = seed_file();
        let source = SeedSource::File(file.path().to_path_buf());

        let mut first = Store::load(Box::new(FileSlot::new(dir.path())), &seeds, &source).await;
        first.persist().unwrap();
        let first_bytes = fs::read(FileSlot::new(dir.path()).path()).unwrap();

        let mut second = Store::load(Box::new(FileSlot::new(dir.path())), &seeds, &source).await;
        second.persist().unwrap();
        let second_bytes = fs::read(FileSlot::new(dir.path()).path()).unwrap();

        assert_eq!(first_bytes, second_bytes);
        assert_eq!(first.projects(), second.projects());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = Store::new(Box::new(MemorySlot::default()), Vec::new());
        assert!(store.remove(Uuid::new_v4()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_slot_missing_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(&dir.path().join("nested"));
        assert!(slot.read().unwrap().is_none());

        let mut slot = slot;
        slot.write("{\"projects\":[]}").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("{\"projects\":[]}"));
    }
}
