//! # Router
//!
//! Builds the single application router. Routes are grouped by the gate
//! they sit behind; groups that share a path (e.g. `GET /session` behind
//! `require_auth` and `POST /session` behind `require_tutor`) are merged
//! into one method router per path.

use crate::config::Config;
use crate::handlers::{auth, bookings, health, materials, notes, sessions, users};
use crate::middleware::auth::{require_admin, require_auth, require_student, require_tutor};
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState, config: &Config) -> Router {
    let public = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/jwt", post(auth::issue_token))
        .route("/logout", get(auth::logout))
        .route("/user", put(users::upsert_user))
        .route("/approved", get(sessions::list_approved))
        .route("/commonSession", get(sessions::list_approved));

    let signed_in = Router::new()
        .route("/user/:email", get(users::get_user))
        .route("/session", get(sessions::list_sessions))
        .route("/getToID/:id", get(sessions::get_session))
        .route("/sessionBookingInfo/:email", get(bookings::list_student_bookings))
        .route("/getBookingToID/:id", get(bookings::get_booking))
        .route("/materials", get(materials::list_materials))
        .route("/materialToID/:id", get(materials::get_material))
        .route("/allMaterials/:session_id", get(materials::list_session_materials))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), require_auth));

    let admin = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/update/:email", patch(users::update_role))
        .route("/manageSession", get(sessions::list_manageable))
        .route("/manageAdmin/update/:id", patch(sessions::change_status))
        .route("/rejectSession/update/:id", patch(sessions::change_status))
        .route("/rejectedAdmin/:id", put(sessions::reject_session))
        .route("/updateAdminSession/update/:id", put(sessions::edit_session))
        .route("/deleteSession/:id", delete(sessions::delete_session))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), require_admin));

    let tutor = Router::new()
        .route("/session", post(sessions::create_session))
        .route("/materials", post(materials::create_material))
        .route("/updateMaterial/:id", put(materials::update_material))
        .route("/deleteMaterial/:id", delete(materials::delete_material))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), require_tutor));

    let student = Router::new()
        .route("/sessionBookingInfo", post(bookings::create_booking))
        .route("/updateBooked/:id", put(bookings::update_booking))
        .route("/createNote", post(notes::create_note))
        .route("/studentNote", get(notes::list_my_notes))
        .route("/noteToID/:id", get(notes::get_note))
        .route("/updateNote/:id", put(notes::update_note))
        .route("/deleteNote/:id", delete(notes::delete_note))
        .route("/studentMaterials/:session_id", get(notes::list_my_session_notes))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), require_student));

    Router::new()
        .merge(public)
        .merge(signed_in)
        .merge(admin)
        .merge(tutor)
        .merge(student)
        // Layers run bottom-up: trace wraps everything, then CORS, then the timeout
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(allowed))
}
