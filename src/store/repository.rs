//! Repository interface for starter-tracking entities.

use crate::domain::{
    ChatMessage, Feeding, NewChatMessage, NewFeeding, NewPhotoAnalysis, NewStarter,
    PhotoAnalysis, Starter, StarterUpdate,
};
use crate::errors::StoreResult;

/// CRUD over starters and everything hanging off them.
///
/// Mutators persist before returning. Listing methods return owned, sorted
/// snapshots.
pub trait StarterRepository: Send + Sync {
    // Starters
    fn add_starter(&mut self, starter: NewStarter) -> StoreResult<Starter>;
    fn update_starter(&mut self, id: &str, update: StarterUpdate) -> StoreResult<Starter>;
    /// Removes the starter with its feedings, analyses and their chat messages.
    fn delete_starter(&mut self, id: &str) -> StoreResult<()>;
    fn get_starter(&self, id: &str) -> Option<Starter>;
    fn list_starters(&self) -> Vec<Starter>;

    // Feedings
    /// Also moves the starter's `last_fed_at` to the feeding time.
    fn add_feeding(&mut self, feeding: NewFeeding) -> StoreResult<Feeding>;
    /// Newest first.
    fn feedings_for_starter(&self, starter_id: &str) -> Vec<Feeding>;

    // Photo analyses
    /// Also sets the starter's health status from the analysis.
    fn add_photo_analysis(&mut self, analysis: NewPhotoAnalysis) -> StoreResult<PhotoAnalysis>;
    /// Newest first.
    fn photo_analyses_for_starter(&self, starter_id: &str) -> Vec<PhotoAnalysis>;
    fn get_photo_analysis(&self, id: &str) -> Option<PhotoAnalysis>;

    // Chat
    fn add_chat_message(&mut self, message: NewChatMessage) -> StoreResult<ChatMessage>;
    /// Oldest first.
    fn chat_messages_for_analysis(&self, analysis_id: &str) -> Vec<ChatMessage>;

    fn clear_all(&mut self) -> StoreResult<()>;
}
