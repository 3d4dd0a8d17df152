pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::state::AppState;
use crate::{auth, chat, directory, documents, registration, tracker};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/login", post(auth::handlers::handle_login))
        .route("/api/v1/auth/logout", post(auth::handlers::handle_logout))
        .route("/api/v1/auth/me", get(auth::handlers::handle_me))
        // Registration
        .route(
            "/api/v1/registrations",
            post(registration::handlers::handle_register),
        )
        .route(
            "/api/v1/registrations/validate-step",
            post(registration::handlers::handle_validate_step),
        )
        // Profile
        .route(
            "/api/v1/profile",
            get(directory::handlers::handle_get_profile)
                .put(directory::handlers::handle_update_profile),
        )
        // Health tracker
        .route(
            "/api/v1/tracker/entries",
            get(tracker::handlers::handle_list_entries).post(tracker::handlers::handle_add_entry),
        )
        .route(
            "/api/v1/tracker/entries/:id",
            delete(tracker::handlers::handle_delete_entry),
        )
        .route("/api/v1/tracker/score", post(tracker::handlers::handle_score))
        .route(
            "/api/v1/tracker/summary.pdf",
            get(tracker::handlers::handle_summary),
        )
        // Patients and diet charts
        .route(
            "/api/v1/patients",
            get(directory::handlers::handle_list_patients),
        )
        .route(
            "/api/v1/patients/:id",
            get(directory::handlers::handle_get_patient)
                .put(directory::handlers::handle_update_patient),
        )
        .route(
            "/api/v1/patients/:id/diet-chart",
            get(documents::handlers::handle_get_draft),
        )
        .route(
            "/api/v1/patients/:id/diet-chart/edits",
            post(documents::handlers::handle_apply_edits),
        )
        .route(
            "/api/v1/patients/:id/diet-chart/pdf",
            post(documents::handlers::handle_render_chart),
        )
        // Consultation requests
        .route(
            "/api/v1/requests",
            get(directory::handlers::handle_list_requests)
                .post(directory::handlers::handle_create_request),
        )
        .route(
            "/api/v1/requests/:id/status",
            patch(directory::handlers::handle_set_status),
        )
        .route(
            "/api/v1/requests/:id/response",
            post(directory::handlers::handle_respond),
        )
        .route("/api/v1/dashboard", get(directory::handlers::handle_dashboard))
        // Assistant
        .route(
            "/api/v1/chat",
            get(chat::handlers::handle_transcript).post(chat::handlers::handle_send),
        )
        .with_state(state)
}
