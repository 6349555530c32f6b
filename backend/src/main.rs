//! PHARMADICES Backend
//!
//! Medicine information service: an immutable catalog with Tantivy full-text
//! search, plus per-user state (favorites, schedules, reviews, activity)
//! persisted in SQLite.

mod api;
mod auth;
mod autocomplete;
mod catalog;
mod comparison;
mod config;
mod dashboard;
mod db;
mod dosage;
mod errors;
mod export;
mod interactions;
mod models;
mod reviews;
mod search;
mod stores;
mod tracker;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autocomplete::AutocompleteIndex;
use catalog::Catalog;
use config::Config;
use db::Repository;
use search::SearchIndex;
use tracker::ReminderBuffer;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub search: Arc<SearchIndex>,
    pub catalog: Arc<Catalog>,
    pub autocomplete: Arc<AutocompleteIndex>,
    pub reminders: ReminderBuffer,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PHARMADICES Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Index path: {:?}", config.index_path);
    tracing::info!("Dataset path: {:?}", config.dataset_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (PHARMADICES_API_PSK). Authentication is disabled!");
    }

    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let catalog = Arc::new(Catalog::load_or_sample(&config.dataset_path).await);
    if catalog.is_sample() {
        tracing::warn!("Serving the built-in sample catalog");
    }

    tracing::info!("Building search index...");
    let search = Arc::new(SearchIndex::open(&config.index_path)?);
    search.rebuild(catalog.all()).await?;
    tracing::info!("Search index built with {} medicines", catalog.len());

    let autocomplete = Arc::new(AutocompleteIndex::build(catalog.all()));

    let seeded = repo
        .seed_reviews_if_empty(&reviews::sample_reviews(Utc::now()))
        .await?;
    if seeded > 0 {
        tracing::info!("Seeded {} sample reviews", seeded);
    }

    let reminders = ReminderBuffer::new();
    let shutdown = CancellationToken::new();
    let reminder_task = tracker::spawn_reminder_task(
        repo.clone(),
        catalog.clone(),
        reminders.clone(),
        config.reminder_interval,
        shutdown.clone(),
    );

    let state = AppState {
        repo,
        search,
        catalog,
        autocomplete,
        reminders,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    let signal_token = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
            signal_token.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Err(e) = reminder_task.await {
        tracing::warn!("Reminder task ended abnormally: {}", e);
    }

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();

    // Static segments are registered before `{id}` captures for readability;
    // axum's router prefers them regardless of order.
    let api_routes = Router::new()
        // Catalog
        .route("/medicines", get(api::list_medicines))
        .route("/medicines/advanced", get(api::advanced_search))
        .route("/medicines/drug-classes", get(api::list_drug_classes))
        .route("/medicines/types", get(api::list_types))
        .route("/medicines/random", get(api::random_medicine))
        .route("/medicines/{id}", get(api::get_medicine))
        .route("/medicines/{id}/print", get(api::print_medicine))
        .route(
            "/medicines/{id}/reviews",
            get(api::list_reviews)
                .put(api::submit_review)
                .delete(api::delete_review),
        )
        // Search
        .route("/search", get(api::search_medicines))
        .route("/autocomplete", get(api::autocomplete))
        .route("/autocomplete/navigate", post(api::navigate_suggestions))
        .route(
            "/recent-searches",
            get(api::list_recent_searches).post(api::add_recent_search),
        )
        .route(
            "/saved-searches",
            get(api::list_saved_searches).post(api::save_search),
        )
        // Favorites
        .route("/favorites", get(api::list_favorites))
        .route(
            "/favorites/{id}",
            get(api::get_favorite).post(api::toggle_favorite),
        )
        // Comparison and interaction selections
        .route(
            "/comparison",
            get(api::list_comparison).delete(api::clear_comparison),
        )
        .route("/comparison/table", get(api::comparison_table))
        .route("/comparison/{id}", post(api::toggle_comparison))
        .route(
            "/interactions/selection",
            get(api::list_interaction_selection).delete(api::clear_interaction_selection),
        )
        .route(
            "/interactions/selection/{id}",
            post(api::toggle_interaction_selection),
        )
        .route("/interactions/check", post(api::check_selected_interactions))
        .route("/interactions/analyze", post(api::analyze_interactions))
        // Tools
        .route("/dosage", post(api::calculate_dosage))
        // Tracker
        .route(
            "/schedules",
            get(api::list_schedules).put(api::save_schedule),
        )
        .route("/schedules/today", get(api::today_schedule))
        .route(
            "/schedules/{id}",
            get(api::get_schedule).delete(api::delete_schedule),
        )
        .route("/schedules/{id}/doses", post(api::take_dose))
        .route(
            "/reminders",
            get(api::list_reminders).delete(api::clear_reminders),
        )
        // Stores
        .route("/stores", get(api::list_stores))
        .route("/stores/nearest", get(api::nearest_stores))
        .route("/stores/cities", get(api::list_cities))
        .route("/stores/{id}", get(api::get_store))
        // Export
        .route("/export", get(api::export_medicines))
        .route("/export/print", get(api::print_medicine_list))
        // Dashboard and user state
        .route("/dashboard", get(api::get_dashboard))
        .route("/dashboard/export", get(api::export_user_data))
        .route("/dashboard/backup", post(api::backup))
        .route(
            "/activity",
            get(api::list_activity).delete(api::clear_activity),
        )
        .route("/health-tips/{index}", get(api::health_tip))
        .route(
            "/preferences",
            get(api::get_preferences).put(api::update_preferences),
        )
        .route("/revision", get(api::get_revision))
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
