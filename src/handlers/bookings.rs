use crate::auth::token::Identity;
use crate::db::bookings;
use crate::db::models::{Booking, User};
use crate::db::users::normalize_email;
use crate::error::{AppError, AppResult};
use crate::handlers::types::{CreateBookingRequest, UpdateBookingRequest};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::json;

/// POST /sessionBookingInfo (student)
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(student): Extension<User>,
    Json(req): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let booking = bookings::create(
        &state.db,
        &student.email,
        &req.session_id,
        req.material.unwrap_or_else(|| json!({})),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /sessionBookingInfo/:email; students only see their own bookings.
pub async fn list_student_bookings(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(email): Path<String>,
) -> AppResult<Json<Vec<Booking>>> {
    let email = normalize_email(&email);
    if email != normalize_email(&identity.email) {
        return Err(AppError::Forbidden(
            "Bookings of another student are not visible".to_string(),
        ));
    }

    Ok(Json(bookings::list_by_student(&state.db, &email).await?))
}

/// GET /getBookingToID/:id (owner only)
pub async fn get_booking(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let email = normalize_email(&identity.email);

    Ok(Json(owned_booking(&state, &email, &id).await?))
}

/// PUT /updateBooked/:id (student, owner only)
pub async fn update_booking(
    State(state): State<AppState>,
    Extension(student): Extension<User>,
    Path(id): Path<String>,
    Json(req): Json<UpdateBookingRequest>,
) -> AppResult<Json<Booking>> {
    owned_booking(&state, &student.email, &id).await?;

    Ok(Json(
        bookings::update_material(&state.db, &id, req.material).await?,
    ))
}

async fn owned_booking(state: &AppState, email: &str, id: &str) -> AppResult<Booking> {
    let booking = bookings::find_by_id(&state.db, id).await?;
    if booking.student_email != email {
        return Err(AppError::Forbidden(
            "This booking belongs to another student".to_string(),
        ));
    }
    Ok(booking)
}
