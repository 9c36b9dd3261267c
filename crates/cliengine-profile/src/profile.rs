//! The player profile record and the profile workflows built on a
//! [`RecordStore`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cliengine_types::error::{EngineError, Result};

use crate::naming::to_snake_case;
use crate::store::{RecordStore, validate_identifier};

/// Type tag written into every serialized profile.
pub const PROFILE_RECORD_TYPE: &str = "player_profile";

/// Sentinel for a profile that has never been played.
pub const NEVER_UPDATED: f64 = -1.0;

/// An inventory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
}

fn default_record_type() -> String {
    PROFILE_RECORD_TYPE.to_string()
}

fn default_gamemode() -> String {
    "regular".to_string()
}

fn default_difficulty() -> String {
    "normal".to_string()
}

fn default_last_updated() -> f64 {
    NEVER_UPDATED
}

/// Persisted state of one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    #[serde(rename = "type")]
    pub record_type: String,
    pub id: String,
    pub name: String,
    #[serde(default = "default_gamemode")]
    pub gamemode: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default)]
    pub gamerules: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub character_xp: f64,
    #[serde(default)]
    pub skill_xp: BTreeMap<String, f64>,
    #[serde(default)]
    pub quest_stages: BTreeMap<String, i64>,
    #[serde(default)]
    pub achievements: BTreeMap<String, bool>,
    #[serde(default)]
    pub inventory: Vec<Item>,
    #[serde(default)]
    pub total_playtime: f64,
    #[serde(default = "default_last_updated")]
    pub last_updated: f64,
}

impl PlayerProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            record_type: default_record_type(),
            id: id.into(),
            name: name.into(),
            gamemode: default_gamemode(),
            difficulty: default_difficulty(),
            gamerules: serde_json::Map::new(),
            character_xp: 0.0,
            skill_xp: BTreeMap::new(),
            quest_stages: BTreeMap::new(),
            achievements: BTreeMap::new(),
            inventory: Vec::new(),
            total_playtime: 0.0,
            last_updated: NEVER_UPDATED,
        }
    }

    /// Record that the profile was active at `now` (seconds since the epoch).
    ///
    /// Time since the previous touch is added to `total_playtime`. The first
    /// touch, and any touch that would go backwards, adds nothing.
    pub fn touch(&mut self, now: f64) {
        if self.last_updated >= 0.0 && now > self.last_updated {
            self.total_playtime += now - self.last_updated;
        }
        self.last_updated = now;
    }

    /// Start a play session at `now` without crediting the time since the
    /// profile was last saved.
    pub fn resume(&mut self, now: f64) {
        self.last_updated = now;
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a profile record, rejecting records of another type.
    pub fn from_json(s: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(s)?;
        if profile.record_type != PROFILE_RECORD_TYPE {
            return Err(EngineError::Store(format!(
                "expected record type '{PROFILE_RECORD_TYPE}', got '{}'",
                profile.record_type
            )));
        }
        Ok(profile)
    }
}

/// Display name and identifier of a stored profile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
}

/// Default identifier for a profile named `name`: its snake_case form, made
/// unique against the store.
pub fn suggest_id<S: RecordStore + ?Sized>(store: &S, name: &str) -> Result<String> {
    store.allocate_identifier(&to_snake_case(name.trim()))
}

/// Create and persist a fresh profile. Fails if `id` is taken.
pub fn create<S: RecordStore + ?Sized>(store: &mut S, id: &str, name: &str) -> Result<PlayerProfile> {
    validate_identifier(id)?;
    if store.exists(id)? {
        return Err(EngineError::Store(format!("profile id taken: {id}")));
    }
    let profile = PlayerProfile::new(id, name);
    save(store, &profile)?;
    log::info!("created profile {id}");
    Ok(profile)
}

/// Read the profile stored under `id`. The store key wins over the `id`
/// written inside the record, so a copied record saves back to its own key.
pub fn load<S: RecordStore + ?Sized>(store: &S, id: &str) -> Result<PlayerProfile> {
    let mut profile = PlayerProfile::from_json(&store.read_record(id)?)?;
    if profile.id != id {
        log::warn!("record {id} carries profile id {}; using {id}", profile.id);
        profile.id = id.to_string();
    }
    Ok(profile)
}

pub fn save<S: RecordStore + ?Sized>(store: &mut S, profile: &PlayerProfile) -> Result<()> {
    store.write_record(&profile.id, &profile.to_json()?)
}

/// Give the profile stored under `old_id` a new name and identifier.
///
/// The new record is written before the old one is removed. Fails without
/// touching the store if `new_id` is taken by another profile.
pub fn rename<S: RecordStore + ?Sized>(
    store: &mut S,
    old_id: &str,
    new_id: &str,
    new_name: &str,
) -> Result<PlayerProfile> {
    validate_identifier(new_id)?;
    let mut profile = load(store, old_id)?;
    if new_id != old_id && store.exists(new_id)? {
        return Err(EngineError::Store(format!("profile id taken: {new_id}")));
    }
    profile.id = new_id.to_string();
    profile.name = new_name.to_string();
    save(store, &profile)?;
    if new_id != old_id {
        store.remove_record(old_id)?;
    }
    log::info!("renamed profile {old_id} to {new_id}");
    Ok(profile)
}

pub fn remove<S: RecordStore + ?Sized>(store: &mut S, id: &str) -> Result<()> {
    store.remove_record(id)?;
    log::info!("removed profile {id}");
    Ok(())
}

/// Every readable profile, sorted by identifier. Unreadable records are
/// skipped.
pub fn list<S: RecordStore + ?Sized>(store: &S) -> Result<Vec<ProfileSummary>> {
    let mut ids: Vec<String> = store.list_identifiers()?.into_iter().collect();
    ids.sort();
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        match load(store, &id) {
            Ok(profile) => out.push(ProfileSummary { id, name: profile.name }),
            Err(e) => log::warn!("skipping unreadable profile {id}: {e}"),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DirectoryStore, MemoryStore};

    #[test]
    fn new_profile_defaults() {
        let p = PlayerProfile::new("hero", "Hero");
        assert_eq!(p.record_type, "player_profile");
        assert_eq!(p.gamemode, "regular");
        assert_eq!(p.difficulty, "normal");
        assert_eq!(p.character_xp, 0.0);
        assert_eq!(p.last_updated, -1.0);
        assert!(p.inventory.is_empty());
    }

    #[test]
    fn json_carries_type_tag() {
        let json = PlayerProfile::new("hero", "Hero").to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["type"], "player_profile");
        assert_eq!(v["id"], "hero");
        assert_eq!(v["last_updated"], -1.0);
    }

    #[test]
    fn minimal_record_fills_defaults() {
        let p = PlayerProfile::from_json(r#"{"type":"player_profile","id":"a","name":"A"}"#)
            .unwrap();
        assert_eq!(p, PlayerProfile::new("a", "A"));
    }

    #[test]
    fn missing_or_wrong_type_tag_rejected() {
        assert!(PlayerProfile::from_json(r#"{"type":"item","id":"a","name":"A"}"#).is_err());
        assert!(PlayerProfile::from_json(r#"{"id":"a","name":"A"}"#).is_err());
        assert!(PlayerProfile::from_json("not json").is_err());
    }

    #[test]
    fn full_record_parses() {
        let json = r#"{
            "type": "player_profile",
            "id": "hero",
            "name": "Hero",
            "gamemode": "ironman",
            "difficulty": "hard",
            "gamerules": {"pvp": true},
            "character_xp": 120,
            "skill_xp": {"mining": 3.5},
            "quest_stages": {"intro": 2},
            "achievements": {"first_blood": true},
            "inventory": [{"id": "sword", "name": "Sword"}],
            "total_playtime": 60,
            "last_updated": 1700000000
        }"#;
        let p = PlayerProfile::from_json(json).unwrap();
        assert_eq!(p.gamemode, "ironman");
        assert_eq!(p.character_xp, 120.0);
        assert_eq!(p.skill_xp["mining"], 3.5);
        assert_eq!(p.quest_stages["intro"], 2);
        assert!(p.achievements["first_blood"]);
        assert_eq!(p.inventory[0].name, "Sword");
        assert_eq!(p.gamerules["pvp"], serde_json::Value::Bool(true));
    }

    #[test]
    fn touch_accumulates_playtime() {
        let mut p = PlayerProfile::new("a", "A");
        p.touch(100.0);
        assert_eq!(p.total_playtime, 0.0);
        assert_eq!(p.last_updated, 100.0);
        p.touch(130.0);
        assert_eq!(p.total_playtime, 30.0);
        p.touch(120.0);
        assert_eq!(p.total_playtime, 30.0);
        assert_eq!(p.last_updated, 120.0);
    }

    #[test]
    fn resume_skips_idle_time() {
        let mut p = PlayerProfile::new("a", "A");
        p.touch(100.0);
        p.resume(1000.0);
        p.touch(1010.0);
        assert_eq!(p.total_playtime, 10.0);
    }

    #[test]
    fn suggest_id_allocates_against_store() {
        let mut store = MemoryStore::new();
        assert_eq!(suggest_id(&store, "  My Hero ").unwrap(), "my_hero");
        create(&mut store, "my_hero", "My Hero").unwrap();
        assert_eq!(suggest_id(&store, "My Hero").unwrap(), "my_hero_1");
    }

    #[test]
    fn load_takes_id_from_store_key() {
        let mut store = MemoryStore::new();
        create(&mut store, "hero", "Hero").unwrap();
        let copy = store.read_record("hero").unwrap();
        store.write_record("backup", &copy).unwrap();

        let mut backup = load(&store, "backup").unwrap();
        assert_eq!(backup.id, "backup");
        backup.character_xp = 5.0;
        save(&mut store, &backup).unwrap();
        assert_eq!(load(&store, "hero").unwrap().character_xp, 0.0);
        assert_eq!(load(&store, "backup").unwrap().character_xp, 5.0);
    }

    #[test]
    fn create_rejects_taken_id() {
        let mut store = MemoryStore::new();
        create(&mut store, "a", "A").unwrap();
        assert!(create(&mut store, "a", "Other").is_err());
        assert_eq!(load(&store, "a").unwrap().name, "A");
    }

    #[test]
    fn rename_moves_record() {
        let mut store = MemoryStore::new();
        let mut p = create(&mut store, "a", "A").unwrap();
        p.character_xp = 5.0;
        save(&mut store, &p).unwrap();

        let renamed = rename(&mut store, "a", "b", "Bee").unwrap();
        assert_eq!(renamed.id, "b");
        assert!(!store.exists("a").unwrap());
        let loaded = load(&store, "b").unwrap();
        assert_eq!(loaded.name, "Bee");
        assert_eq!(loaded.character_xp, 5.0);
    }

    #[test]
    fn rename_in_place_keeps_record() {
        let mut store = MemoryStore::new();
        create(&mut store, "a", "A").unwrap();
        rename(&mut store, "a", "a", "Ay").unwrap();
        assert_eq!(load(&store, "a").unwrap().name, "Ay");
    }

    #[test]
    fn rename_onto_taken_id_fails_untouched() {
        let mut store = MemoryStore::new();
        create(&mut store, "a", "A").unwrap();
        create(&mut store, "b", "B").unwrap();
        assert!(rename(&mut store, "a", "b", "X").is_err());
        assert_eq!(load(&store, "a").unwrap().name, "A");
        assert_eq!(load(&store, "b").unwrap().name, "B");
    }

    #[test]
    fn list_sorted_and_skips_invalid() {
        let mut store = MemoryStore::new();
        create(&mut store, "zed", "Zed").unwrap();
        create(&mut store, "amy", "Amy").unwrap();
        store.write_record("broken", "{").unwrap();
        let listed = list(&store).unwrap();
        assert_eq!(
            listed,
            vec![
                ProfileSummary { id: "amy".into(), name: "Amy".into() },
                ProfileSummary { id: "zed".into(), name: "Zed".into() },
            ]
        );
    }

    #[test]
    fn remove_missing_fails() {
        let mut store = MemoryStore::new();
        assert!(remove(&mut store, "ghost").is_err());
    }

    #[test]
    fn directory_store_workflow() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = DirectoryStore::new(tmp.path().join("saves"), "json");
        create(&mut store, "hero", "Hero").unwrap();
        assert!(tmp.path().join("saves/hero.json").is_file());
        assert_eq!(suggest_id(&store, "Hero").unwrap(), "hero_1");
        remove(&mut store, "hero").unwrap();
        assert!(list(&store).unwrap().is_empty());
    }
}
