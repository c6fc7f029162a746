use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde_json::json;
use std::path::Path;
use tracing::{error, info};
use uuid::Uuid;

use crate::db::Hotel;
use crate::error::DatabaseError;
use crate::hotels::upload::{read_hotel_form, remove_upload};
use crate::{AppState, Result};

pub async fn create_hotel(payload: Multipart, state: web::Data<AppState>) -> Result<HttpResponse> {
    let form = read_hotel_form(payload, Path::new(&state.config.uploads.dir)).await?;
    let hotel = Hotel::new(form.hotel.clone());

    match state.hotels.insert_hotel(&hotel).await {
        Ok(saved) => {
            info!("Hotel created: {} ({})", saved.name, saved.id);
            Ok(HttpResponse::Created().json(saved))
        }
        Err(e) => {
            error!("Failed to save hotel {}: {}", hotel.name, e);
            form.discard().await;
            Err(e)
        }
    }
}

pub async fn list_hotels(state: web::Data<AppState>) -> Result<HttpResponse> {
    let hotels = state.hotels.list_hotels().await?;
    Ok(HttpResponse::Ok().json(hotels))
}

pub async fn count_hotels(state: web::Data<AppState>) -> Result<HttpResponse> {
    let count = state.hotels.count_hotels().await?;
    Ok(HttpResponse::Ok().json(json!({ "count": count })))
}

pub async fn delete_hotel(path: web::Path<Uuid>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let hotel = state
        .hotels
        .delete_hotel(id)
        .await?
        .ok_or(DatabaseError::NotFound)?;

    if !hotel.image.is_empty() {
        remove_upload(Some(Path::new(&state.config.uploads.dir).join(&hotel.image))).await;
    }

    info!("Hotel deleted: {}", id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Hotel deleted successfully" })))
}
