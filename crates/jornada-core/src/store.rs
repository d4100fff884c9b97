//! JSON state store
//!
//! One JSON file holding a `user_id -> UserState` map. Loading is tolerant:
//! a missing or unreadable file yields a fresh state, and every record goes
//! through [`UserState::migrate`] so legacy shapes are normalized on the way
//! in. Writes go through a temp file in the same directory and an atomic
//! rename so a crash never leaves a half-written store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::UserState;

/// File-backed store for per-user conversation state.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default store location: `<platform data dir>/jornada/state.json`,
    /// falling back to the current directory when no data dir exists.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("jornada")
            .join("state.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state for one user, migrating whatever shape is on disk.
    /// Missing or corrupt data yields a fresh state; never errors.
    pub fn load(&self, user_id: &str) -> UserState {
        match self.load_all().remove(user_id) {
            Some(value) => UserState::migrate(value, user_id),
            None => UserState::new(user_id),
        }
    }

    /// Persist the state for one user, bumping its `updated_at`.
    pub fn save(&self, state: &mut UserState) -> Result<()> {
        state.updated_at = Some(Utc::now());
        let mut all = self.load_all();
        all.insert(state.user_id.clone(), serde_json::to_value(&*state)?);
        self.write_atomic(&Value::Object(all))?;
        debug!(user_id = %state.user_id, path = %self.path.display(), "state saved");
        Ok(())
    }

    /// All user ids present in the store, in file order.
    pub fn user_ids(&self) -> Vec<String> {
        self.load_all().keys().cloned().collect()
    }

    fn load_all(&self) -> Map<String, Value> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!(path = %self.path.display(), "state file unreadable, starting fresh");
                Map::new()
            }
        }
    }

    fn write_atomic(&self, value: &Value) -> Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;
        let tmp = tempfile::NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(&tmp, value)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Goal, GoalStatus, Stage};
    use crate::simulation::compute_scenarios;
    use serde_json::json;

    fn goal(id: u32, name: &str) -> Goal {
        Goal {
            id,
            name: name.to_string(),
            target_amount: 35_000.0,
            term_months: 24,
            initial_amount: 5_000.0,
            monthly_income: 7_200.0,
            scenarios: compute_scenarios(35_000.0, 5_000.0, 24),
            status: GoalStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_round_trip_preserves_goals_and_stage() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));

        let mut state = UserState::new("u1");
        state.stage = Stage::CollectTerm;
        state.goals.push(goal(1, "Viagem no Japao"));
        state.goals.push(goal(2, "Casamento"));
        store.save(&mut state).unwrap();

        let loaded = store.load("u1");
        assert_eq!(loaded.stage, Stage::CollectTerm);
        assert_eq!(loaded.goals.len(), 2);
        assert_eq!(loaded.goals[0].name, "Viagem no Japao");
        assert_eq!(loaded.goals[1].name, "Casamento");
        assert_eq!(loaded.goals[0].scenarios, state.goals[0].scenarios);
        assert!(loaded.updated_at.is_some());
    }

    #[test]
    fn test_missing_file_yields_fresh_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("nope.json"));
        let state = store.load("u1");
        assert_eq!(state.user_id, "u1");
        assert_eq!(state.stage, Stage::Idle);
        assert!(state.goals.is_empty());
    }

    #[test]
    fn test_corrupt_file_yields_fresh_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        let store = StateStore::new(&path);
        assert!(store.load("u1").goals.is_empty());
    }

    #[test]
    fn test_legacy_record_migrated_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            json!({
                "u1": {
                    "stage": "idle",
                    "dream_name": "Casamento",
                    "target_amount": 40000.0,
                    "term_months": 36
                }
            })
            .to_string(),
        )
        .unwrap();

        let store = StateStore::new(&path);
        let state = store.load("u1");
        assert_eq!(state.goals.len(), 1);
        assert_eq!(state.goals[0].id, 1);
        assert_eq!(state.goals[0].name, "Casamento");
    }

    #[test]
    fn test_save_keeps_other_users() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));

        let mut a = UserState::new("a");
        a.goals.push(goal(1, "Meta A"));
        store.save(&mut a).unwrap();

        let mut b = UserState::new("b");
        store.save(&mut b).unwrap();

        assert_eq!(store.load("a").goals.len(), 1);
        let mut ids = store.user_ids();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
