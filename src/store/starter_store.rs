//! Starter Store - repository implementation over a key-value adapter
//!
//! Collections live in memory and each one is written back as a JSON array
//! under its own key whenever it changes. Timestamps are stored as RFC 3339.
//!
//! Mutations work on copies of the affected collections. The copies replace
//! the live ones only after every changed key has been written, so a failed
//! write leaves both memory and the adapter as they were.

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::domain::{
    feed_ratio, generate_id, ChatMessage, Feeding, NewChatMessage, NewFeeding, NewPhotoAnalysis,
    NewStarter, PhotoAnalysis, Starter, StarterUpdate,
};
use crate::errors::{StoreError, StoreResult};
use crate::store::kv::KeyValueStore;
use crate::store::repository::StarterRepository;

const STARTERS_KEY: &str = "starters";
const FEEDINGS_KEY: &str = "feedings";
const ANALYSES_KEY: &str = "photoAnalyses";
const CHAT_KEY: &str = "chatMessages";
const API_KEY_KEY: &str = "dev_api_key";

/// Longest chat message accepted, in characters.
pub const MAX_CHAT_MESSAGE_CHARS: usize = 500;

/// Replacement collections staged by one mutation; `None` leaves one untouched.
#[derive(Default)]
struct Changes {
    starters: Option<Vec<Starter>>,
    feedings: Option<Vec<Feeding>>,
    analyses: Option<Vec<PhotoAnalysis>>,
    chat_messages: Option<Vec<ChatMessage>>,
}

pub struct StarterStore<K: KeyValueStore> {
    kv: K,
    starters: Vec<Starter>,
    feedings: Vec<Feeding>,
    analyses: Vec<PhotoAnalysis>,
    chat_messages: Vec<ChatMessage>,
}

impl<K: KeyValueStore> StarterStore<K> {
    /// Load every collection from `kv`; missing keys start empty.
    pub fn open(kv: K) -> StoreResult<Self> {
        let starters = load_collection(&kv, STARTERS_KEY)?;
        let feedings = load_collection(&kv, FEEDINGS_KEY)?;
        let analyses = load_collection(&kv, ANALYSES_KEY)?;
        let chat_messages = load_collection(&kv, CHAT_KEY)?;

        let store = Self { kv, starters, feedings, analyses, chat_messages };
        tracing::info!(
            "Loaded store: {} starters, {} feedings, {} analyses, {} chat messages",
            store.starters.len(),
            store.feedings.len(),
            store.analyses.len(),
            store.chat_messages.len()
        );
        Ok(store)
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Provider API key saved from the settings screen.
    pub fn api_key(&self) -> StoreResult<Option<String>> {
        Ok(self.kv.get(API_KEY_KEY)?.filter(|k| !k.trim().is_empty()))
    }

    pub fn set_api_key(&mut self, key: &str) -> StoreResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(StoreError::Validation("API key must not be empty".into()));
        }
        self.kv.set(API_KEY_KEY, key.to_string())
    }

    pub fn clear_api_key(&mut self) -> StoreResult<()> {
        self.kv.remove(API_KEY_KEY)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Write every staged collection in one batch, then swap them in.
    fn commit(&mut self, changes: Changes) -> StoreResult<()> {
        let mut entries = Vec::with_capacity(4);
        if let Some(starters) = &changes.starters {
            entries.push((STARTERS_KEY, serde_json::to_string(starters)?));
        }
        if let Some(feedings) = &changes.feedings {
            entries.push((FEEDINGS_KEY, serde_json::to_string(feedings)?));
        }
        if let Some(analyses) = &changes.analyses {
            entries.push((ANALYSES_KEY, serde_json::to_string(analyses)?));
        }
        if let Some(messages) = &changes.chat_messages {
            entries.push((CHAT_KEY, serde_json::to_string(messages)?));
        }

        if let Err(err) = self.kv.set_many(entries) {
            tracing::error!("Store write failed, changes discarded: {}", err);
            return Err(err);
        }

        if let Some(starters) = changes.starters {
            self.starters = starters;
        }
        if let Some(feedings) = changes.feedings {
            self.feedings = feedings;
        }
        if let Some(analyses) = changes.analyses {
            self.analyses = analyses;
        }
        if let Some(messages) = changes.chat_messages {
            self.chat_messages = messages;
        }
        Ok(())
    }

    /// Copy of the starters with `edit` applied to the one with `id`.
    fn edited_starters<F>(&self, id: &str, edit: F) -> StoreResult<(Vec<Starter>, Starter)>
    where
        F: FnOnce(&mut Starter),
    {
        let mut starters = self.starters.clone();
        let starter = starters
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("Starter", id))?;
        edit(starter);
        let edited = starter.clone();
        Ok((starters, edited))
    }

    fn require_starter(&self, id: &str) -> StoreResult<()> {
        if self.starters.iter().any(|s| s.id == id) {
            Ok(())
        } else {
            Err(StoreError::not_found("Starter", id))
        }
    }
}

fn load_collection<K: KeyValueStore, T: DeserializeOwned>(kv: &K, key: &str) -> StoreResult<Vec<T>> {
    match kv.get(key)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

fn sorted_by<T: Clone, F, O>(items: impl Iterator<Item = T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> O,
    O: Ord,
{
    let mut out: Vec<T> = items.collect();
    out.sort_by_key(|item| key(item));
    out
}

fn validate_new_starter(starter: &NewStarter) -> StoreResult<()> {
    if starter.name.trim().is_empty() {
        return Err(StoreError::Validation("Starter name must not be empty".into()));
    }
    if !(starter.hydration_pct.is_finite() && starter.hydration_pct > 0.0) {
        return Err(StoreError::Validation(format!(
            "Hydration must be a positive percentage, got {}",
            starter.hydration_pct
        )));
    }
    Ok(())
}

fn validate_feeding(feeding: &NewFeeding) -> StoreResult<()> {
    for (name, weight) in [
        ("starter", feeding.starter_weight),
        ("flour", feeding.flour_weight),
        ("water", feeding.water_weight),
    ] {
        if !(weight.is_finite() && weight >= 0.0) {
            return Err(StoreError::Validation(format!(
                "{} weight must be a non-negative number, got {}",
                name, weight
            )));
        }
    }
    Ok(())
}

impl<K: KeyValueStore> StarterRepository for StarterStore<K> {
    fn add_starter(&mut self, starter: NewStarter) -> StoreResult<Starter> {
        validate_new_starter(&starter)?;

        let starter = Starter {
            id: generate_id(),
            name: starter.name.trim().to_string(),
            flour_type: starter.flour_type,
            hydration_pct: starter.hydration_pct,
            default_ratio: starter.default_ratio,
            created_at: Utc::now(),
            last_fed_at: starter.last_fed_at,
            image_uri: starter.image_uri,
            health_status: starter.health_status,
        };
        let mut starters = self.starters.clone();
        starters.push(starter.clone());
        self.commit(Changes { starters: Some(starters), ..Default::default() })?;

        tracing::info!("Added starter {} ({})", starter.name, starter.id);
        Ok(starter)
    }

    fn update_starter(&mut self, id: &str, update: StarterUpdate) -> StoreResult<Starter> {
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(StoreError::Validation("Starter name must not be empty".into()));
        }
        if update.hydration_pct.is_some_and(|h| !(h.is_finite() && h > 0.0)) {
            return Err(StoreError::Validation("Hydration must be a positive percentage".into()));
        }

        let (starters, updated) = self.edited_starters(id, |s| update.apply(s))?;
        self.commit(Changes { starters: Some(starters), ..Default::default() })?;
        Ok(updated)
    }

    fn delete_starter(&mut self, id: &str) -> StoreResult<()> {
        self.require_starter(id)?;

        let removed_analyses: Vec<String> = self
            .analyses
            .iter()
            .filter(|a| a.starter_id == id)
            .map(|a| a.id.clone())
            .collect();

        let changes = Changes {
            starters: Some(self.starters.iter().filter(|s| s.id != id).cloned().collect()),
            feedings: Some(self.feedings.iter().filter(|f| f.starter_id != id).cloned().collect()),
            analyses: Some(self.analyses.iter().filter(|a| a.starter_id != id).cloned().collect()),
            chat_messages: Some(
                self.chat_messages
                    .iter()
                    .filter(|m| !removed_analyses.contains(&m.analysis_id))
                    .cloned()
                    .collect(),
            ),
        };
        self.commit(changes)?;

        tracing::info!(
            "Deleted starter {} with {} analyses",
            id,
            removed_analyses.len()
        );
        Ok(())
    }

    fn get_starter(&self, id: &str) -> Option<Starter> {
        self.starters.iter().find(|s| s.id == id).cloned()
    }

    fn list_starters(&self) -> Vec<Starter> {
        self.starters.clone()
    }

    fn add_feeding(&mut self, feeding: NewFeeding) -> StoreResult<Feeding> {
        validate_feeding(&feeding)?;

        let fed_at = feeding.fed_at.unwrap_or_else(Utc::now);
        let (starters, _) = self.edited_starters(&feeding.starter_id, |s| s.last_fed_at = Some(fed_at))?;

        let ratio = feeding.ratio.unwrap_or_else(|| {
            feed_ratio(feeding.starter_weight, feeding.flour_weight, feeding.water_weight)
        });
        let feeding = Feeding {
            id: generate_id(),
            starter_id: feeding.starter_id,
            fed_at,
            ratio,
            starter_weight: feeding.starter_weight,
            flour_weight: feeding.flour_weight,
            water_weight: feeding.water_weight,
            temp_c: feeding.temp_c,
            notes: feeding.notes,
        };
        let mut feedings = self.feedings.clone();
        feedings.push(feeding.clone());
        self.commit(Changes {
            starters: Some(starters),
            feedings: Some(feedings),
            ..Default::default()
        })?;

        tracing::debug!("Logged feeding {} for starter {}", feeding.id, feeding.starter_id);
        Ok(feeding)
    }

    fn feedings_for_starter(&self, starter_id: &str) -> Vec<Feeding> {
        let mut feedings = sorted_by(
            self.feedings.iter().filter(|f| f.starter_id == starter_id).cloned(),
            |f| f.fed_at,
        );
        feedings.reverse();
        feedings
    }

    fn add_photo_analysis(&mut self, analysis: NewPhotoAnalysis) -> StoreResult<PhotoAnalysis> {
        let status = analysis.record.health_status();
        let (starters, _) = self.edited_starters(&analysis.starter_id, |s| s.health_status = status)?;

        let analysis = PhotoAnalysis {
            id: generate_id(),
            starter_id: analysis.starter_id,
            taken_at: analysis.taken_at.unwrap_or_else(Utc::now),
            image_uri: analysis.image_uri,
            record: analysis.record,
        };
        let mut analyses = self.analyses.clone();
        analyses.push(analysis.clone());
        self.commit(Changes {
            starters: Some(starters),
            analyses: Some(analyses),
            ..Default::default()
        })?;

        tracing::info!(
            "Stored analysis {} for starter {} (status {})",
            analysis.id,
            analysis.starter_id,
            status.as_str()
        );
        Ok(analysis)
    }

    fn photo_analyses_for_starter(&self, starter_id: &str) -> Vec<PhotoAnalysis> {
        let mut analyses = sorted_by(
            self.analyses.iter().filter(|a| a.starter_id == starter_id).cloned(),
            |a| a.taken_at,
        );
        analyses.reverse();
        analyses
    }

    fn get_photo_analysis(&self, id: &str) -> Option<PhotoAnalysis> {
        self.analyses.iter().find(|a| a.id == id).cloned()
    }

    fn add_chat_message(&mut self, message: NewChatMessage) -> StoreResult<ChatMessage> {
        if !self.analyses.iter().any(|a| a.id == message.analysis_id) {
            return Err(StoreError::not_found("Analysis", message.analysis_id));
        }

        let content = message.content.trim();
        if content.is_empty() {
            return Err(StoreError::Validation("Message must not be empty".into()));
        }
        if content.chars().count() > MAX_CHAT_MESSAGE_CHARS {
            return Err(StoreError::Validation(format!(
                "Message exceeds {} characters",
                MAX_CHAT_MESSAGE_CHARS
            )));
        }

        let message = ChatMessage {
            id: generate_id(),
            analysis_id: message.analysis_id,
            role: message.role,
            content: content.to_string(),
            timestamp: message.timestamp.unwrap_or_else(Utc::now),
        };
        let mut messages = self.chat_messages.clone();
        messages.push(message.clone());
        self.commit(Changes { chat_messages: Some(messages), ..Default::default() })?;
        Ok(message)
    }

    fn chat_messages_for_analysis(&self, analysis_id: &str) -> Vec<ChatMessage> {
        sorted_by(
            self.chat_messages.iter().filter(|m| m.analysis_id == analysis_id).cloned(),
            |m| m.timestamp,
        )
    }

    fn clear_all(&mut self) -> StoreResult<()> {
        self.commit(Changes {
            starters: Some(Vec::new()),
            feedings: Some(Vec::new()),
            analyses: Some(Vec::new()),
            chat_messages: Some(Vec::new()),
        })?;

        tracing::warn!("Cleared all starter data");
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RawAiAnalysis;
    use crate::domain::{AnalysisContext, AnalysisRecord, ChatRole, HealthStatus};
    use crate::store::kv::{JsonFileStore, MemoryKv};
    use chrono::{Duration, TimeZone};
    use tempfile::tempdir;

    fn new_starter(name: &str) -> NewStarter {
        NewStarter {
            name: name.to_string(),
            flour_type: "Rye flour".into(),
            hydration_pct: 75.0,
            default_ratio: "1:1:1".into(),
            last_fed_at: None,
            image_uri: None,
            health_status: HealthStatus::Healthy,
        }
    }

    fn new_feeding(starter_id: &str, hours_ago: i64) -> NewFeeding {
        NewFeeding {
            starter_id: starter_id.to_string(),
            fed_at: Some(Utc::now() - Duration::hours(hours_ago)),
            ratio: None,
            starter_weight: 50.0,
            flour_weight: 50.0,
            water_weight: 50.0,
            temp_c: 22.0,
            notes: None,
        }
    }

    fn ai_analysis(starter_id: &str, rating: &str, hours_ago: i64) -> NewPhotoAnalysis {
        NewPhotoAnalysis {
            starter_id: starter_id.to_string(),
            taken_at: Some(Utc::now() - Duration::hours(hours_ago)),
            image_uri: "file:///photo.jpg".into(),
            record: AnalysisRecord::Ai {
                analysis: RawAiAnalysis {
                    health_rating: Some(rating.to_string()),
                    ..Default::default()
                },
                context: AnalysisContext {
                    time_since_feed: "6 hours".into(),
                    last_feed_ratio: "1:1:1".into(),
                    flour_type: "Rye".into(),
                    room_temp_f: 75.0,
                    goal: "maintenance".into(),
                },
            },
        }
    }

    fn store() -> StarterStore<MemoryKv> {
        StarterStore::open(MemoryKv::new()).unwrap()
    }

    /// Memory adapter that refuses writes to one key, or to every key with `"*"`.
    #[derive(Default)]
    struct FailingKv {
        inner: MemoryKv,
        fail_key: Option<&'static str>,
    }

    impl KeyValueStore for FailingKv {
        fn get(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> StoreResult<()> {
            if self.fail_key.is_some_and(|f| f == "*" || f == key) {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> StoreResult<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_add_and_get_starter() {
        let mut store = store();
        let starter = store.add_starter(new_starter("  Rustic Rye ")).unwrap();

        assert_eq!(starter.name, "Rustic Rye");
        assert_eq!(store.get_starter(&starter.id), Some(starter.clone()));
        assert_eq!(store.list_starters().len(), 1);
        assert!(store.get_starter("missing").is_none());
    }

    #[test]
    fn test_add_starter_validation() {
        let mut store = store();
        assert!(matches!(
            store.add_starter(new_starter("  ")),
            Err(StoreError::Validation(_))
        ));

        let mut bad = new_starter("Wet");
        bad.hydration_pct = f64::NAN;
        assert!(store.add_starter(bad).is_err());
    }

    #[test]
    fn test_update_missing_starter() {
        let mut store = store();
        let err = store.update_starter("nope", StarterUpdate::default()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "Starter", .. }));
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let mut store = store();
        let starter = store.add_starter(new_starter("Rye")).unwrap();
        let update = StarterUpdate { name: Some(" ".into()), ..Default::default() };
        assert!(matches!(store.update_starter(&starter.id, update), Err(StoreError::Validation(_))));
        assert_eq!(store.get_starter(&starter.id).unwrap().name, "Rye");
    }

    #[test]
    fn test_feeding_updates_last_fed_and_sorts_newest_first() {
        let mut store = store();
        let starter = store.add_starter(new_starter("Classic White")).unwrap();

        let older = store.add_feeding(new_feeding(&starter.id, 24)).unwrap();
        let newer = store.add_feeding(new_feeding(&starter.id, 6)).unwrap();

        assert_eq!(newer.ratio, "50:50:50");
        let feedings = store.feedings_for_starter(&starter.id);
        assert_eq!(feedings.iter().map(|f| f.id.as_str()).collect::<Vec<_>>(), vec![newer.id.as_str(), older.id.as_str()]);

        // last_fed_at follows the most recently logged feeding, not the newest timestamp
        let reloaded = store.get_starter(&starter.id).unwrap();
        assert_eq!(reloaded.last_fed_at, Some(newer.fed_at));
    }

    #[test]
    fn test_feeding_requires_starter() {
        let mut store = store();
        assert!(store.add_feeding(new_feeding("ghost", 1)).is_err());
    }

    #[test]
    fn test_analysis_sets_health_status() {
        let mut store = store();
        let starter = store.add_starter(new_starter("Whole Wheat")).unwrap();

        store.add_photo_analysis(ai_analysis(&starter.id, "1", 2)).unwrap();
        assert_eq!(store.get_starter(&starter.id).unwrap().health_status, HealthStatus::Unhealthy);

        let latest = store.add_photo_analysis(ai_analysis(&starter.id, "5", 1)).unwrap();
        assert_eq!(store.get_starter(&starter.id).unwrap().health_status, HealthStatus::Healthy);

        let analyses = store.photo_analyses_for_starter(&starter.id);
        assert_eq!(analyses.len(), 2);
        assert_eq!(analyses[0].id, latest.id);
        assert_eq!(store.get_photo_analysis(&latest.id), Some(latest));
    }

    #[test]
    fn test_chat_messages_validation_and_order() {
        let mut store = store();
        let starter = store.add_starter(new_starter("Rye")).unwrap();
        let analysis = store.add_photo_analysis(ai_analysis(&starter.id, "4", 1)).unwrap();

        let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        for (offset, content) in [(2, "second"), (1, "  first  ")] {
            store
                .add_chat_message(NewChatMessage {
                    analysis_id: analysis.id.clone(),
                    role: ChatRole::User,
                    content: content.to_string(),
                    timestamp: Some(base + Duration::minutes(offset)),
                })
                .unwrap();
        }

        let messages = store.chat_messages_for_analysis(&analysis.id);
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[1].content, "second");

        let empty = NewChatMessage {
            analysis_id: analysis.id.clone(),
            role: ChatRole::User,
            content: "   ".into(),
            timestamp: None,
        };
        assert!(matches!(store.add_chat_message(empty), Err(StoreError::Validation(_))));

        let long = NewChatMessage {
            analysis_id: analysis.id.clone(),
            role: ChatRole::User,
            content: "a".repeat(MAX_CHAT_MESSAGE_CHARS + 1),
            timestamp: None,
        };
        assert!(store.add_chat_message(long).is_err());

        let orphan = NewChatMessage {
            analysis_id: "missing".into(),
            role: ChatRole::Assistant,
            content: "hello".into(),
            timestamp: None,
        };
        assert!(matches!(store.add_chat_message(orphan), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_delete_cascades() {
        let mut store = store();
        let keep = store.add_starter(new_starter("Keep")).unwrap();
        let doomed = store.add_starter(new_starter("Doomed")).unwrap();

        store.add_feeding(new_feeding(&doomed.id, 1)).unwrap();
        store.add_feeding(new_feeding(&keep.id, 1)).unwrap();
        let analysis = store.add_photo_analysis(ai_analysis(&doomed.id, "3", 1)).unwrap();
        store
            .add_chat_message(NewChatMessage {
                analysis_id: analysis.id.clone(),
                role: ChatRole::User,
                content: "Is it ready?".into(),
                timestamp: None,
            })
            .unwrap();

        store.delete_starter(&doomed.id).unwrap();

        assert!(store.get_starter(&doomed.id).is_none());
        assert!(store.feedings_for_starter(&doomed.id).is_empty());
        assert!(store.get_photo_analysis(&analysis.id).is_none());
        assert!(store.chat_messages_for_analysis(&analysis.id).is_empty());
        assert_eq!(store.feedings_for_starter(&keep.id).len(), 1);

        assert!(store.delete_starter(&doomed.id).is_err());
    }

    #[test]
    fn test_failed_add_leaves_store_empty() {
        let mut store = StarterStore::open(FailingKv { fail_key: Some("*"), ..Default::default() }).unwrap();

        assert!(matches!(store.add_starter(new_starter("Rye")), Err(StoreError::Io(_))));
        assert!(store.list_starters().is_empty());
        assert!(store.kv.inner.is_empty());
    }

    #[test]
    fn test_failed_feeding_keeps_last_fed_at() {
        let mut store = StarterStore::open(FailingKv::default()).unwrap();
        let starter = store.add_starter(new_starter("Rye")).unwrap();

        store.kv.fail_key = Some(FEEDINGS_KEY);
        assert!(store.add_feeding(new_feeding(&starter.id, 1)).is_err());

        assert_eq!(store.get_starter(&starter.id).unwrap().last_fed_at, None);
        assert!(store.feedings_for_starter(&starter.id).is_empty());

        let reopened = StarterStore::open(store.kv.inner.clone()).unwrap();
        assert_eq!(reopened.get_starter(&starter.id).unwrap().last_fed_at, None);
    }

    #[test]
    fn test_failed_delete_keeps_cascade_intact() {
        let mut store = StarterStore::open(FailingKv::default()).unwrap();
        let starter = store.add_starter(new_starter("Doomed")).unwrap();
        store.add_feeding(new_feeding(&starter.id, 2)).unwrap();
        let analysis = store.add_photo_analysis(ai_analysis(&starter.id, "4", 1)).unwrap();

        // starters is written before feedings, so this fails part-way through
        store.kv.fail_key = Some(FEEDINGS_KEY);
        assert!(store.delete_starter(&starter.id).is_err());

        assert!(store.get_starter(&starter.id).is_some());
        assert_eq!(store.feedings_for_starter(&starter.id).len(), 1);
        assert!(store.get_photo_analysis(&analysis.id).is_some());

        let reopened = StarterStore::open(store.kv.inner.clone()).unwrap();
        assert!(reopened.get_starter(&starter.id).is_some());
        assert_eq!(reopened.feedings_for_starter(&starter.id).len(), 1);
        assert!(reopened.get_photo_analysis(&analysis.id).is_some());

        store.kv.fail_key = None;
        store.delete_starter(&starter.id).unwrap();
        assert!(store.list_starters().is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut store = store();
        let starter = store.add_starter(new_starter("Rye")).unwrap();
        store.add_feeding(new_feeding(&starter.id, 1)).unwrap();
        store.clear_all().unwrap();

        assert!(store.list_starters().is_empty());
        assert!(store.feedings_for_starter(&starter.id).is_empty());
    }

    #[test]
    fn test_api_key_settings() {
        let mut store = store();
        assert_eq!(store.api_key().unwrap(), None);
        assert!(store.set_api_key("  ").is_err());
        store.set_api_key(" sk-123 ").unwrap();
        assert_eq!(store.api_key().unwrap().as_deref(), Some("sk-123"));
        store.clear_api_key().unwrap();
        assert_eq!(store.api_key().unwrap(), None);
    }

    #[test]
    fn test_reopen_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("starters.json");

        let (starter_id, analysis_id) = {
            let mut store = StarterStore::open(JsonFileStore::open(&path).unwrap()).unwrap();
            let starter = store.add_starter(new_starter("Persistent")).unwrap();
            store.add_feeding(new_feeding(&starter.id, 3)).unwrap();
            let analysis = store.add_photo_analysis(ai_analysis(&starter.id, "2", 1)).unwrap();
            (starter.id, analysis.id)
        };

        let store = StarterStore::open(JsonFileStore::open(&path).unwrap()).unwrap();
        let starter = store.get_starter(&starter_id).unwrap();
        assert_eq!(starter.name, "Persistent");
        assert_eq!(starter.health_status, HealthStatus::Attention);
        assert!(starter.last_fed_at.is_some());
        assert_eq!(store.feedings_for_starter(&starter_id).len(), 1);

        let analysis = store.get_photo_analysis(&analysis_id).unwrap();
        assert_eq!(analysis.record.view_model().unwrap().rating, 2);
    }
}
