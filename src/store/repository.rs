//! Generic repository over one JSON collection.
//!
//! Collection-level rules (unique fields, exclusive flags) are declared on the
//! repository and enforced on every insert and update, so no handler carries
//! its own copy of the checks. A violation rejects the write before the file
//! is touched.

use std::path::Path;

use serde_json::Value;
use tokio::sync::Mutex;

use super::{JsonStore, Record};
use crate::errors::AppError;
use crate::models::{
    Advertiser, Event, Magazine, Member, NewsItem, Product, ReefClub, Sponsor, User,
};

enum ConstraintKind<T> {
    /// No two records may carry the same present value for the field.
    Unique { key: fn(&T) -> Option<Value> },
    /// At most one record may have the flag set. Saving a record with the
    /// flag set clears it on every other record in the same write.
    ExclusiveFlag {
        get: fn(&T) -> bool,
        clear: fn(&mut T),
    },
}

/// A collection-level rule checked on every insert and update.
pub struct Constraint<T> {
    field: &'static str,
    kind: ConstraintKind<T>,
}

impl<T> Constraint<T> {
    pub fn unique(field: &'static str, key: fn(&T) -> Option<Value>) -> Self {
        Self {
            field,
            kind: ConstraintKind::Unique { key },
        }
    }

    pub fn exclusive_flag(field: &'static str, get: fn(&T) -> bool, clear: fn(&mut T)) -> Self {
        Self {
            field,
            kind: ConstraintKind::ExclusiveFlag { get, clear },
        }
    }
}

/// Repository for one collection.
pub struct Repository<T: Record> {
    store: JsonStore,
    constraints: Vec<Constraint<T>>,
    /// Serializes read-modify-write cycles so concurrent mutations cannot
    /// drop each other's writes.
    write_lock: Mutex<()>,
}

impl<T: Record> Repository<T> {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            store: JsonStore::new(data_dir),
            constraints: Vec::new(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_constraint(mut self, constraint: Constraint<T>) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// List every record in the collection.
    pub async fn list(&self) -> Result<Vec<T>, AppError> {
        self.store.load::<T>().await
    }

    /// Fetch one record by id.
    pub async fn get(&self, id: &str) -> Result<Option<T>, AppError> {
        Ok(self.list().await?.into_iter().find(|r| r.id() == id))
    }

    /// Fetch the first record matching the predicate.
    pub async fn find(&self, predicate: impl Fn(&T) -> bool) -> Result<Option<T>, AppError> {
        Ok(self.list().await?.into_iter().find(|r| predicate(r)))
    }

    /// Insert a new record. Constraints are enforced before anything is
    /// written, so a rejected insert leaves the collection unchanged.
    pub async fn insert(&self, record: T) -> Result<T, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load::<T>().await?;
        records.push(record);
        let idx = records.len() - 1;
        self.enforce(&mut records, idx)?;
        let created = records[idx].clone();
        self.store.save(&records).await?;
        Ok(created)
    }

    /// Apply a merge to an existing record and persist the collection.
    /// Constraint violations leave the file untouched.
    pub async fn update(&self, id: &str, apply: impl FnOnce(&mut T)) -> Result<T, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load::<T>().await?;
        let idx = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", T::KIND, id)))?;
        apply(&mut records[idx]);
        self.enforce(&mut records, idx)?;
        let updated = records[idx].clone();
        self.store.save(&records).await?;
        Ok(updated)
    }

    /// Remove a record and return it so callers can release its files.
    pub async fn delete(&self, id: &str) -> Result<T, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load::<T>().await?;
        let idx = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", T::KIND, id)))?;
        let removed = records.remove(idx);
        self.store.save(&records).await?;
        Ok(removed)
    }

    fn enforce(&self, records: &mut [T], idx: usize) -> Result<(), AppError> {
        for constraint in &self.constraints {
            match &constraint.kind {
                ConstraintKind::Unique { key } => {
                    if let Some(candidate) = key(&records[idx]) {
                        let taken = records
                            .iter()
                            .enumerate()
                            .any(|(j, other)| j != idx && key(other).as_ref() == Some(&candidate));
                        if taken {
                            return Err(AppError::Conflict(format!(
                                "{} value already in use",
                                constraint.field
                            )));
                        }
                    }
                }
                ConstraintKind::ExclusiveFlag { get, clear } => {
                    if get(&records[idx]) {
                        for (j, other) in records.iter_mut().enumerate() {
                            if j != idx {
                                clear(other);
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// One repository per collection, sharing the data directory.
pub struct Repositories {
    pub magazines: Repository<Magazine>,
    pub advertisers: Repository<Advertiser>,
    pub sponsors: Repository<Sponsor>,
    pub reef_clubs: Repository<ReefClub>,
    pub events: Repository<Event>,
    pub news: Repository<NewsItem>,
    pub products: Repository<Product>,
    pub members: Repository<Member>,
    pub users: Repository<User>,
}

impl Repositories {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            magazines: Repository::new(data_dir).with_constraint(Constraint::exclusive_flag(
                "featured",
                |m: &Magazine| m.featured,
                |m: &mut Magazine| m.featured = false,
            )),
            advertisers: Repository::new(data_dir),
            sponsors: Repository::new(data_dir),
            reef_clubs: Repository::new(data_dir).with_constraint(Constraint::unique(
                "sort",
                |c: &ReefClub| Some(Value::from(c.sort)),
            )),
            events: Repository::new(data_dir)
                .with_constraint(Constraint::unique("sort", |e: &Event| {
                    Some(Value::from(e.sort))
                }))
                .with_constraint(Constraint::exclusive_flag(
                    "featured",
                    |e: &Event| e.featured,
                    |e: &mut Event| e.featured = false,
                )),
            news: Repository::new(data_dir),
            products: Repository::new(data_dir),
            members: Repository::new(data_dir),
            users: Repository::new(data_dir).with_constraint(Constraint::unique(
                "email",
                |u: &User| Some(Value::from(u.email.clone())),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct TestDoc {
        id: String,
        name: String,
        sort: i64,
        featured: bool,
    }

    impl Record for TestDoc {
        const COLLECTION: &'static str = "docs";
        const KIND: &'static str = "Doc";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn doc(id: &str, sort: i64, featured: bool) -> TestDoc {
        TestDoc {
            id: id.to_string(),
            name: format!("doc {}", id),
            sort,
            featured,
        }
    }

    fn repo(dir: &TempDir) -> Repository<TestDoc> {
        Repository::new(dir.path())
            .with_constraint(Constraint::unique("sort", |d: &TestDoc| {
                Some(Value::from(d.sort))
            }))
            .with_constraint(Constraint::exclusive_flag(
                "featured",
                |d: &TestDoc| d.featured,
                |d: &mut TestDoc| d.featured = false,
            ))
    }

    #[tokio::test]
    async fn test_missing_file_loads_as_empty_collection() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        let records = repo.list().await.unwrap();
        assert!(records.is_empty());
        assert!(dir.path().join("docs.json").exists());
    }

    #[tokio::test]
    async fn test_insert_get_delete_roundtrip() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        repo.insert(doc("a", 1, false)).await.unwrap();
        repo.insert(doc("b", 2, false)).await.unwrap();

        let fetched = repo.get("a").await.unwrap().unwrap();
        assert_eq!(fetched.name, "doc a");

        let removed = repo.delete("a").await.unwrap();
        assert_eq!(removed.id, "a");
        assert_eq!(repo.list().await.unwrap().len(), 1);

        let err = repo.delete("a").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_duplicate_unique_value_rejected_without_partial_write() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        repo.insert(doc("a", 7, false)).await.unwrap();
        let err = repo.insert(doc("b", 7, false)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let records = repo.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a");
    }

    #[tokio::test]
    async fn test_update_may_keep_its_own_unique_value() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        repo.insert(doc("a", 3, false)).await.unwrap();
        let updated = repo
            .update("a", |d| d.name = "renamed".to_string())
            .await
            .unwrap();
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.sort, 3);
    }

    #[tokio::test]
    async fn test_update_to_taken_unique_value_rejected() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        repo.insert(doc("a", 1, false)).await.unwrap();
        repo.insert(doc("b", 2, false)).await.unwrap();

        let err = repo.update("b", |d| d.sort = 1).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Rejected write left the file untouched
        let b = repo.get("b").await.unwrap().unwrap();
        assert_eq!(b.sort, 2);
    }

    #[tokio::test]
    async fn test_exclusive_flag_clears_other_records() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        repo.insert(doc("a", 1, true)).await.unwrap();
        repo.insert(doc("b", 2, false)).await.unwrap();
        repo.update("b", |d| d.featured = true).await.unwrap();

        let records = repo.list().await.unwrap();
        let flagged: Vec<&str> = records
            .iter()
            .filter(|d| d.featured)
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(flagged, vec!["b"]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_not_found() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        let err = repo
            .update("missing", |d| d.sort = 9)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
