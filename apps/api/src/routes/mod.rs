pub mod health;
pub mod uploads;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::processes::handlers as processes;
use crate::state::AppState;
use crate::stats;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Candidate API
        .route(
            "/api/v1/candidates",
            post(candidates::handle_create_candidate).get(candidates::handle_list_candidates),
        )
        .route(
            "/api/v1/candidates/:id",
            get(candidates::handle_get_candidate)
                .put(candidates::handle_update_candidate)
                .delete(candidates::handle_delete_candidate),
        )
        .route(
            "/api/v1/candidates/:id/cv",
            put(candidates::handle_replace_cv),
        )
        // Selection process API
        .route(
            "/api/v1/processes",
            post(processes::handle_create_process).get(processes::handle_list_processes),
        )
        .route(
            "/api/v1/processes/:id/stage",
            patch(processes::handle_update_stage),
        )
        .route(
            "/api/v1/processes/:id",
            delete(processes::handle_delete_process),
        )
        // Statistics
        .route("/api/v1/stats", get(stats::handle_stats))
        // Stored CVs
        .route("/uploads/:name", get(uploads::handle_download))
        .with_state(state)
}
