use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use labregister_core::{Entity, ItemId};
use labregister_items::{ItemDraft, ItemStore};

use crate::app::errors;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item))
        .route("/:id/versions", get(list_item_versions))
}

/// Location of an item resource.
pub fn item_location(id: &ItemId) -> String {
    format!("/items/{id}")
}

pub async fn list_items(Extension(store): Extension<Arc<ItemStore>>) -> axum::response::Response {
    (StatusCode::OK, Json(store.list())).into_response()
}

pub async fn create_item(
    Extension(store): Extension<Arc<ItemStore>>,
    Json(body): Json<ItemDraft>,
) -> axum::response::Response {
    let created = match store.create(body) {
        Ok(item) => item,
        Err(e) => return errors::register_error_to_response(e),
    };

    (
        StatusCode::CREATED,
        [(header::LOCATION, item_location(created.id()))],
        Json(created),
    )
        .into_response()
}

pub async fn get_item(
    Extension(store): Extension<Arc<ItemStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match store.get(&ItemId::from(id)) {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => errors::register_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(store): Extension<Arc<ItemStore>>,
    Path(id): Path<String>,
    Json(body): Json<ItemDraft>,
) -> axum::response::Response {
    match store.update(&ItemId::from(id), body) {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => errors::register_error_to_response(e),
    }
}

pub async fn list_item_versions(
    Extension(store): Extension<Arc<ItemStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match store.history(&ItemId::from(id)) {
        Ok(versions) => (StatusCode::OK, Json(versions)).into_response(),
        Err(e) => errors::register_error_to_response(e),
    }
}
