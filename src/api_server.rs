// Axum API Server
//
// Purpose: REST API over the starter store, with image analysis and chat
// routed through the configured provider. Analysis view-models are cached.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::ai::client::normalize_image_base64;
use crate::ai::{analysis_chat_context, initial_assistant_message, resolve_api_key, AnalysisProvider, OpenAiClient};
use crate::analysis::UiAnalysisViewModel;
use crate::config::ServerConfig;
use crate::domain::{
    AnalysisContext, AnalysisRecord, ChatMessage, ChatRole, Feeding, NewChatMessage, NewFeeding,
    NewPhotoAnalysis, NewStarter, PhotoAnalysis, Starter, StarterUpdate,
};
use crate::errors::{AiError, StoreError};
use crate::store::{JsonFileStore, KeyValueStore, StarterRepository, StarterStore};

/// Store over whichever adapter the server was started with
pub type SharedStore = Arc<RwLock<StarterStore<Box<dyn KeyValueStore>>>>;

const VIEW_CACHE_CAPACITY: u64 = 10_000;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub provider: Arc<dyn AnalysisProvider>,
    /// analysis id -> view-model
    pub view_cache: Cache<String, UiAnalysisViewModel>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Open the JSON store under `config.data_dir` and the HTTP provider.
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        tracing::info!("Opening store at {}...", config.store_path().display());
        let kv = JsonFileStore::open(config.store_path())?;
        let store = StarterStore::open(Box::new(kv) as Box<dyn KeyValueStore>)?;

        tracing::info!("Initializing provider client...");
        let provider = Arc::new(OpenAiClient::from_config(&config));

        Ok(Self::with_parts(store, provider, config))
    }

    pub fn with_parts(
        store: StarterStore<Box<dyn KeyValueStore>>,
        provider: Arc<dyn AnalysisProvider>,
        config: ServerConfig,
    ) -> Self {
        tracing::info!("Initializing Moka cache...");
        let view_cache = Cache::builder()
            .max_capacity(VIEW_CACHE_CAPACITY)
            .time_to_live(config.view_cache_ttl)
            .build();

        Self {
            store: Arc::new(RwLock::new(store)),
            provider,
            view_cache,
            config: Arc::new(config),
        }
    }

    async fn api_key(&self) -> Result<String, AppError> {
        let stored = self.store.read().await.api_key()?;
        Ok(resolve_api_key(self.config.api_key.as_deref(), stored)?)
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Starters
        .route("/api/starters", get(list_starters).post(create_starter))
        .route(
            "/api/starters/:id",
            get(get_starter).patch(update_starter).delete(delete_starter),
        )
        .route("/api/starters/:id/feedings", get(list_feedings).post(add_feeding))
        .route("/api/starters/:id/analyses", get(list_analyses).post(add_analysis))
        .route("/api/starters/:id/analyze", post(analyze_photo))

        // Analyses and chat
        .route("/api/analyses/:id", get(get_analysis))
        .route("/api/analyses/:id/view", get(get_analysis_view))
        .route("/api/analyses/:id/chat", get(get_chat).post(send_chat))

        // Settings and maintenance
        .route(
            "/api/settings/api-key",
            get(get_api_key_status).put(set_api_key).delete(clear_api_key),
        )
        .route("/api/data", axum::routing::delete(clear_all_data))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Request Bodies
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Bare base64 or a data URI
    pub image_base64: String,
    #[serde(default)]
    pub image_uri: Option<String>,
    pub context: AnalysisContext,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRequest {
    pub api_key: String,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_starters(State(state): State<AppState>) -> Json<Vec<Starter>> {
    Json(state.store.read().await.list_starters())
}

async fn create_starter(
    State(state): State<AppState>,
    Json(body): Json<NewStarter>,
) -> Result<(StatusCode, Json<Starter>), AppError> {
    let starter = state.store.write().await.add_starter(body)?;
    Ok((StatusCode::CREATED, Json(starter)))
}

async fn get_starter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Starter>, AppError> {
    state
        .store
        .read()
        .await
        .get_starter(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Starter {} not found", id)))
}

async fn update_starter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StarterUpdate>,
) -> Result<Json<Starter>, AppError> {
    Ok(Json(state.store.write().await.update_starter(&id, update)?))
}

async fn delete_starter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed: Vec<String> = {
        let mut store = state.store.write().await;
        let ids = store
            .photo_analyses_for_starter(&id)
            .into_iter()
            .map(|a| a.id)
            .collect();
        store.delete_starter(&id)?;
        ids
    };

    for analysis_id in &removed {
        state.view_cache.invalidate(analysis_id).await;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_feedings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Feeding>>, AppError> {
    let store = state.store.read().await;
    require_starter(&*store, &id)?;
    Ok(Json(store.feedings_for_starter(&id)))
}

async fn add_feeding(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut feeding): Json<NewFeeding>,
) -> Result<(StatusCode, Json<Feeding>), AppError> {
    feeding.starter_id = id;
    let feeding = state.store.write().await.add_feeding(feeding)?;
    Ok((StatusCode::CREATED, Json(feeding)))
}

async fn list_analyses(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PhotoAnalysis>>, AppError> {
    let store = state.store.read().await;
    require_starter(&*store, &id)?;
    Ok(Json(store.photo_analyses_for_starter(&id)))
}

async fn add_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut analysis): Json<NewPhotoAnalysis>,
) -> Result<(StatusCode, Json<PhotoAnalysis>), AppError> {
    analysis.starter_id = id;
    let analysis = state.store.write().await.add_photo_analysis(analysis)?;
    Ok((StatusCode::CREATED, Json(analysis)))
}

/// Photo -> provider -> stored AI analysis, returned with its view-model.
async fn analyze_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    require_starter(&*state.store.read().await, &id)?;
    let api_key = state.api_key().await?;
    let image = normalize_image_base64(&body.image_base64)?;

    // Lock is not held across the provider call
    let raw = state
        .provider
        .analyze_image(&api_key, &image, &body.context)
        .await?;

    let analysis = state.store.write().await.add_photo_analysis(NewPhotoAnalysis {
        starter_id: id,
        taken_at: None,
        image_uri: body.image_uri.unwrap_or_default(),
        record: AnalysisRecord::Ai { analysis: raw, context: body.context },
    })?;

    let view = analysis.record.view_model();
    if let Some(vm) = &view {
        state.view_cache.insert(analysis.id.clone(), vm.clone()).await;
    }

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "analysis": analysis, "view": view })),
    ))
}

async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PhotoAnalysis>, AppError> {
    let store = state.store.read().await;
    Ok(Json(require_analysis(&*store, &id)?))
}

async fn get_analysis_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UiAnalysisViewModel>, AppError> {
    if let Some(cached) = state.view_cache.get(&id).await {
        return Ok(Json(cached));
    }

    // Held across the insert so a deleted analysis is never cached.
    let store = state.store.read().await;
    let analysis = require_analysis(&*store, &id)?;
    let vm = analysis.record.view_model().ok_or_else(|| {
        AppError::BadRequest(format!("Analysis {} has no AI result to render", id))
    })?;

    state.view_cache.insert(id, vm.clone()).await;
    drop(store);
    Ok(Json(vm))
}

/// Conversation for an analysis; an empty one is seeded with a greeting.
async fn get_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let mut store = state.store.write().await;
    let analysis = require_analysis(&*store, &id)?;

    let messages = store.chat_messages_for_analysis(&id);
    if !messages.is_empty() {
        return Ok(Json(messages));
    }

    let starter_name = store
        .get_starter(&analysis.starter_id)
        .map(|s| s.name)
        .unwrap_or_else(|| "sourdough".to_string());
    let greeting = store.add_chat_message(NewChatMessage {
        analysis_id: id,
        role: ChatRole::Assistant,
        content: initial_assistant_message(&starter_name, analysis.record.health_status()),
        timestamp: None,
    })?;
    Ok(Json(vec![greeting]))
}

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let api_key = state.api_key().await?;

    let (user_message, context) = {
        let mut store = state.store.write().await;
        let analysis = require_analysis(&*store, &id)?;
        let message = store.add_chat_message(NewChatMessage {
            analysis_id: id.clone(),
            role: ChatRole::User,
            content: body.message,
            timestamp: None,
        })?;
        let context = analysis.record.view_model().map(|vm| analysis_chat_context(&vm));
        (message, context)
    };

    let reply = state
        .provider
        .chat(&api_key, &user_message.content, context.as_deref())
        .await?;

    let assistant_message = state.store.write().await.add_chat_message(NewChatMessage {
        analysis_id: id,
        role: ChatRole::Assistant,
        content: truncate_reply(&reply),
        timestamp: None,
    })?;

    Ok(Json(serde_json::json!({
        "userMessage": user_message,
        "assistantMessage": assistant_message
    })))
}

async fn get_api_key_status(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let stored = state.store.read().await.api_key()?.is_some();
    let source = match (state.config.api_key.is_some(), stored) {
        (true, _) => "environment",
        (false, true) => "settings",
        (false, false) => "none",
    };
    Ok(Json(serde_json::json!({
        "configured": source != "none",
        "source": source
    })))
}

async fn set_api_key(
    State(state): State<AppState>,
    Json(body): Json<ApiKeyRequest>,
) -> Result<StatusCode, AppError> {
    state.store.write().await.set_api_key(&body.api_key)?;
    tracing::info!("API key updated from settings");
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_api_key(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.write().await.clear_api_key()?;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_all_data(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.write().await.clear_all()?;
    state.view_cache.invalidate_all();
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Helper Functions
// ============================================================================

fn require_starter<R: StarterRepository + ?Sized>(store: &R, id: &str) -> Result<Starter, AppError> {
    store
        .get_starter(id)
        .ok_or_else(|| AppError::NotFound(format!("Starter {} not found", id)))
}

fn require_analysis<R: StarterRepository + ?Sized>(
    store: &R,
    id: &str,
) -> Result<PhotoAnalysis, AppError> {
    store
        .get_photo_analysis(id)
        .ok_or_else(|| AppError::NotFound(format!("Analysis {} not found", id)))
}

/// Provider replies may exceed the stored message limit.
fn truncate_reply(reply: &str) -> String {
    let trimmed = reply.trim();
    match trimmed.char_indices().nth(crate::store::MAX_CHAT_MESSAGE_CHARS) {
        Some((cut, _)) => trimmed[..cut].to_string(),
        None => trimmed.to_string(),
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Upstream(String),
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::Validation(msg) => AppError::BadRequest(msg),
            other => {
                tracing::error!("Store failure: {}", other);
                AppError::Internal(other.to_string())
            }
        }
    }
}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::MissingApiKey | AiError::Image(_) => AppError::BadRequest(err.to_string()),
            other => {
                tracing::warn!("Provider failure: {}", other);
                AppError::Upstream(other.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AnalysisProvider;
    use crate::analysis::RawAiAnalysis;
    use crate::errors::AiResult;
    use crate::store::MemoryKv;

    struct UnusedProvider;

    #[async_trait::async_trait]
    impl AnalysisProvider for UnusedProvider {
        async fn analyze_image(&self, _: &str, _: &str, _: &AnalysisContext) -> AiResult<RawAiAnalysis> {
            Err(AiError::EmptyContent)
        }

        async fn chat(&self, _: &str, _: &str, _: Option<&str>) -> AiResult<String> {
            Err(AiError::EmptyContent)
        }
    }

    /// State holding one starter with one AI analysis; returns (state, starter id, analysis id).
    fn state_with_analysis() -> (AppState, String, String) {
        let mut store = StarterStore::open(Box::new(MemoryKv::new()) as Box<dyn KeyValueStore>).unwrap();
        let starter = store
            .add_starter(NewStarter {
                name: "Rye".into(),
                flour_type: "Rye flour".into(),
                hydration_pct: 100.0,
                default_ratio: "1:1:1".into(),
                last_fed_at: None,
                image_uri: None,
                health_status: Default::default(),
            })
            .unwrap();
        let analysis = store
            .add_photo_analysis(NewPhotoAnalysis {
                starter_id: starter.id.clone(),
                taken_at: None,
                image_uri: "file:///photo.jpg".into(),
                record: AnalysisRecord::Ai {
                    analysis: RawAiAnalysis { health_rating: Some("4".into()), ..Default::default() },
                    context: AnalysisContext {
                        time_since_feed: "4 hours".into(),
                        last_feed_ratio: "1:1:1".into(),
                        flour_type: "Rye".into(),
                        room_temp_f: 74.0,
                        goal: "baking".into(),
                    },
                },
            })
            .unwrap();
        let state = AppState::with_parts(store, Arc::new(UnusedProvider), ServerConfig::default());
        (state, starter.id, analysis.id)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_view_cache_empty_after_concurrent_delete() {
        for _ in 0..20 {
            let (state, starter_id, analysis_id) = state_with_analysis();

            let views: Vec<_> = (0..8)
                .map(|_| {
                    let state = state.clone();
                    let id = analysis_id.clone();
                    tokio::spawn(async move { get_analysis_view(State(state), Path(id)).await.is_ok() })
                })
                .collect();
            delete_starter(State(state.clone()), Path(starter_id)).await.unwrap();
            for view in views {
                view.await.unwrap();
            }

            assert!(state.view_cache.get(&analysis_id).await.is_none());
            assert!(get_analysis_view(State(state.clone()), Path(analysis_id)).await.is_err());
        }
    }

    #[test]
    fn test_truncate_reply() {
        assert_eq!(truncate_reply("  short  "), "short");
        let long = "é".repeat(crate::store::MAX_CHAT_MESSAGE_CHARS + 20);
        assert_eq!(
            truncate_reply(&long).chars().count(),
            crate::store::MAX_CHAT_MESSAGE_CHARS
        );
    }

    #[test]
    fn test_error_mapping() {
        let not_found: AppError = StoreError::not_found("Starter", "42").into();
        assert!(matches!(not_found, AppError::NotFound(ref m) if m == "Starter not found: 42"));

        let invalid: AppError = StoreError::Validation("Message must not be empty".into()).into();
        assert!(matches!(invalid, AppError::BadRequest(_)));

        assert!(matches!(AppError::from(AiError::MissingApiKey), AppError::BadRequest(_)));
        assert!(matches!(AppError::from(AiError::EmptyContent), AppError::Upstream(_)));
        assert!(matches!(
            AppError::from(AiError::Api { status: 429, body: "rate limited".into() }),
            AppError::Upstream(_)
        ));
    }
}
