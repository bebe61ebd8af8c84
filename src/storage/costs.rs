//! Cost repository for JSON storage
//!
//! Manages loading and saving cost records to costs.json, with a category
//! index backing the "is this category still referenced?" check.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::KnotbookError;
use crate::models::{CategoryId, Cost, CostId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable cost data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CostData {
    costs: Vec<Cost>,
}

/// Repository for cost persistence with indexing
pub struct CostRepository {
    path: PathBuf,
    data: RwLock<HashMap<CostId, Cost>>,
    /// Index: category_id -> cost_ids
    by_category: RwLock<HashMap<CategoryId, Vec<CostId>>>,
}

impl CostRepository {
    /// Create a new cost repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_category: RwLock::new(HashMap::new()),
        }
    }

    /// Load costs from disk and build indexes
    pub fn load(&self) -> Result<(), KnotbookError> {
        let file_data: CostData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_category = self
            .by_category
            .write()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_category.clear();

        for cost in file_data.costs {
            let id = cost.id;
            if let Some(cat_id) = cost.category_id {
                by_category.entry(cat_id).or_default().push(id);
            }
            data.insert(id, cost);
        }

        Ok(())
    }

    /// Save costs to disk
    pub fn save(&self) -> Result<(), KnotbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut costs: Vec<_> = data.values().cloned().collect();
        costs.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let file_data = CostData { costs };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a cost by ID
    pub fn get(&self, id: CostId) -> Result<Option<Cost>, KnotbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all costs, sorted by due date (costs without one last), then name
    pub fn get_all(&self) -> Result<Vec<Cost>, KnotbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut costs: Vec<_> = data.values().cloned().collect();
        costs.sort_by(|a, b| match (a.due_date, b.due_date) {
            (Some(da), Some(db)) => da.cmp(&db).then_with(|| a.name.cmp(&b.name)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        });
        Ok(costs)
    }

    /// Get costs referencing a category
    pub fn get_by_category(&self, category_id: CategoryId) -> Result<Vec<Cost>, KnotbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_category = self
            .by_category
            .read()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_category
            .get(&category_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut costs: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        costs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(costs)
    }

    /// Count costs referencing a category
    pub fn count_by_category(&self, category_id: CategoryId) -> Result<usize, KnotbookError> {
        let by_category = self
            .by_category
            .read()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(by_category.get(&category_id).map(|v| v.len()).unwrap_or(0))
    }

    /// Insert or update a cost
    pub fn upsert(&self, cost: Cost) -> Result<(), KnotbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_category = self
            .by_category
            .write()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // Remove from old index if updating
        if let Some(old) = data.get(&cost.id) {
            if let Some(cat_id) = old.category_id {
                if let Some(ids) = by_category.get_mut(&cat_id) {
                    ids.retain(|&id| id != cost.id);
                }
            }
        }

        // Add to new index
        if let Some(cat_id) = cost.category_id {
            by_category.entry(cat_id).or_default().push(cost.id);
        }

        data.insert(cost.id, cost);
        Ok(())
    }

    /// Delete a cost
    pub fn delete(&self, id: CostId) -> Result<bool, KnotbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_category = self
            .by_category
            .write()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(cost) = data.remove(&id) {
            if let Some(cat_id) = cost.category_id {
                if let Some(ids) = by_category.get_mut(&cat_id) {
                    ids.retain(|&cid| cid != id);
                }
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Count costs
    pub fn count(&self) -> Result<usize, KnotbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CostRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("costs.json");
        let repo = CostRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let cost = Cost::new("Venue deposit", Money::from_cents(100_000));
        let id = cost.id;

        repo.upsert(cost).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.value.cents(), 100_000);
    }

    #[test]
    fn test_category_index() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let cat1 = CategoryId::new();
        let cat2 = CategoryId::new();

        let mut cost1 = Cost::new("Venue", Money::from_cents(100));
        cost1.category_id = Some(cat1);
        let mut cost2 = Cost::new("Catering", Money::from_cents(200));
        cost2.category_id = Some(cat1);
        let mut cost3 = Cost::new("Flowers", Money::from_cents(300));
        cost3.category_id = Some(cat2);

        repo.upsert(cost1.clone()).unwrap();
        repo.upsert(cost2).unwrap();
        repo.upsert(cost3).unwrap();

        assert_eq!(repo.count_by_category(cat1).unwrap(), 2);
        assert_eq!(repo.count_by_category(cat2).unwrap(), 1);
        assert_eq!(repo.get_by_category(cat1).unwrap().len(), 2);

        // Moving a cost out of a category updates the index
        cost1.category_id = None;
        repo.upsert(cost1).unwrap();
        assert_eq!(repo.count_by_category(cat1).unwrap(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let cost = Cost::new("Photographer", Money::from_cents(40_000));
        let id = cost.id;

        repo.upsert(cost).unwrap();
        repo.save().unwrap();

        // Create new repo and load
        let path = temp_dir.path().join("costs.json");
        let repo2 = CostRepository::new(path);
        repo2.load().unwrap();

        assert_eq!(repo2.count().unwrap(), 1);
        let retrieved = repo2.get(id).unwrap().unwrap();
        assert_eq!(retrieved.value.cents(), 40_000);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let mut cost = Cost::new("Band", Money::from_cents(50_000));
        let cat_id = CategoryId::new();
        cost.category_id = Some(cat_id);
        let id = cost.id;

        repo.upsert(cost).unwrap();
        assert_eq!(repo.count().unwrap(), 1);

        assert!(repo.delete(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
        assert_eq!(repo.count_by_category(cat_id).unwrap(), 0);

        // Deleting again reports false
        assert!(!repo.delete(id).unwrap());
    }

    #[test]
    fn test_get_all_sorted_by_due_date() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let mut early = Cost::new("Early", Money::from_cents(100));
        early.due_date = chrono::NaiveDate::from_ymd_opt(2026, 3, 1);
        let mut late = Cost::new("Late", Money::from_cents(100));
        late.due_date = chrono::NaiveDate::from_ymd_opt(2026, 9, 1);
        let undated = Cost::new("Undated", Money::from_cents(100));

        repo.upsert(late).unwrap();
        repo.upsert(undated).unwrap();
        repo.upsert(early).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all[0].name, "Early");
        assert_eq!(all[1].name, "Late");
        assert_eq!(all[2].name, "Undated");
    }
}
