// --------------------------------------------------
// Handles API endpoints for the settings singleton
// and task category management.
//
// Responsibilities:
// - Get / update tolerance thresholds and the admin code
// - Create / read / update / delete task categories
// -------------------------------------------------

use axum::{extract::Path, Json};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Category, Settings};
use crate::store;

// -----------------------------
// GET /api/settings
// Returns the singleton, or defaults before the first save
// -----------------------------
pub async fn get_settings() -> Result<Json<Settings>, ApiError> {
    let db = store::load_db()?;
    Ok(Json(db.settings.unwrap_or_default()))
}

#[derive(Debug, Deserialize)]
pub struct SettingsInput {
    pub pending_before_hours: i64,
    pub pending_after_hours: i64,
    pub master_admin_code: String,
}

// -----------------------------
// PUT /api/settings
// Upserts the singleton (created lazily on first save)
// -----------------------------
pub async fn put_settings(Json(input): Json<SettingsInput>) -> Result<Json<Settings>, ApiError> {
    if input.pending_before_hours < 0 || input.pending_after_hours < 0 {
        return Err(ApiError::Validation(
            "tolerance thresholds must be zero or positive".into(),
        ));
    }

    let mut db = store::load_db()?;

    let settings = Settings {
        pending_before_hours: input.pending_before_hours,
        pending_after_hours: input.pending_after_hours,
        master_admin_code: input.master_admin_code,
        updated_at: Utc::now(),
    };
    db.settings = Some(settings.clone());

    store::save_db(&db)?;
    tracing::debug!(
        before = settings.pending_before_hours,
        after = settings.pending_after_hours,
        "settings saved"
    );
    Ok(Json(settings))
}

fn default_color() -> String {
    "#64748b".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
}

// -----------------------------
// GET /api/categories
// Returns all categories sorted by name
// -----------------------------
pub async fn list_categories() -> Result<Json<Vec<Category>>, ApiError> {
    let mut db = store::load_db()?;
    db.categories
        .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(Json(db.categories))
}

// -----------------------------
// POST /api/categories
// -----------------------------
pub async fn create_category(
    Json(input): Json<CategoryInput>,
) -> Result<Json<Category>, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::Validation("category name required".into()));
    }

    let mut db = store::load_db()?;

    let category = Category {
        id: Uuid::new_v4(),
        name: input.name,
        description: input.description,
        color: input.color,
    };
    db.categories.push(category.clone());

    store::save_db(&db)?;
    Ok(Json(category))
}

// -----------------------------
// PUT /api/categories/:id
// -----------------------------
pub async fn update_category(
    Path(id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<Category>, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::Validation("category name required".into()));
    }

    let mut db = store::load_db()?;

    let Some(c) = db.categories.iter_mut().find(|c| c.id == id) else {
        return Err(ApiError::NotFound("category"));
    };
    c.name = input.name;
    c.description = input.description;
    c.color = input.color;
    let updated = c.clone();

    store::save_db(&db)?;
    Ok(Json(updated))
}

// -----------------------------
// DELETE /api/categories/:id
// Referencing tasks become uncategorized, never deleted
// -----------------------------
pub async fn delete_category(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let mut db = store::load_db()?;

    if !db.remove_category(id) {
        return Err(ApiError::NotFound("category"));
    }

    store::save_db(&db)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
