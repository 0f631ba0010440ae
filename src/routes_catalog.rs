// --------------------------------------------------
// Handles API endpoints for the service catalog:
// task definitions and interval presets.
//
// Responsibilities:
// - Create / read / update / delete service tasks
// - Create / read / update / delete interval presets
// -------------------------------------------------

use axum::{extract::Path, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::logic;
use crate::models::{Category, Db, IntervalPreset, Task};
use crate::store;

#[derive(Debug, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub category: Option<Category>,
}

#[derive(Debug, Deserialize)]
pub struct TaskInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub estimated_duration: i64,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub auto_apply: bool,
}

fn validate_task_input(input: &TaskInput, db: &Db) -> Result<(), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::Validation("task name required".into()));
    }
    if input.estimated_duration < 0 {
        return Err(ApiError::Validation(
            "estimated duration must be zero or positive".into(),
        ));
    }
    if let Some(category_id) = input.category_id {
        if !db.categories.iter().any(|c| c.id == category_id) {
            return Err(ApiError::Validation("unknown category".into()));
        }
    }
    Ok(())
}

// -----------------------------
// GET /api/tasks
// Returns all tasks sorted by category name then task name,
// uncategorized tasks last
// -----------------------------
pub async fn list_tasks() -> Result<Json<Vec<TaskView>>, ApiError> {
    let db = store::load_db()?;

    let mut views: Vec<TaskView> = db
        .tasks
        .iter()
        .map(|t| TaskView {
            task: t.clone(),
            category: t
                .category_id
                .and_then(|id| db.categories.iter().find(|c| c.id == id).cloned()),
        })
        .collect();

    views.sort_by(|a, b| {
        let key = |v: &TaskView| {
            (
                v.category.is_none(),
                v.category
                    .as_ref()
                    .map(|c| c.name.to_lowercase())
                    .unwrap_or_default(),
                v.task.name.to_lowercase(),
            )
        };
        key(a).cmp(&key(b))
    });

    Ok(Json(views))
}

// -----------------------------
// POST /api/tasks
// -----------------------------
pub async fn create_task(Json(input): Json<TaskInput>) -> Result<Json<Task>, ApiError> {
    let mut db = store::load_db()?;
    validate_task_input(&input, &db)?;

    let task = Task {
        id: Uuid::new_v4(),
        name: input.name,
        description: input.description,
        estimated_duration: input.estimated_duration,
        category_id: input.category_id,
        auto_apply: input.auto_apply,
    };
    db.tasks.push(task.clone());

    store::save_db(&db)?;
    Ok(Json(task))
}

// -----------------------------
// PUT /api/tasks/:id
// -----------------------------
pub async fn update_task(
    Path(id): Path<Uuid>,
    Json(input): Json<TaskInput>,
) -> Result<Json<Task>, ApiError> {
    let mut db = store::load_db()?;
    validate_task_input(&input, &db)?;

    let Some(t) = db.tasks.iter_mut().find(|t| t.id == id) else {
        return Err(ApiError::NotFound("task"));
    };
    t.name = input.name;
    t.description = input.description;
    t.estimated_duration = input.estimated_duration;
    t.category_id = input.category_id;
    t.auto_apply = input.auto_apply;
    let updated = t.clone();

    store::save_db(&db)?;
    Ok(Json(updated))
}

// -----------------------------
// DELETE /api/tasks/:id
// Removes the task and its schedule entries; service history
// is retained
// -----------------------------
pub async fn delete_task(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let mut db = store::load_db()?;

    if !db.remove_task(id) {
        return Err(ApiError::NotFound("task"));
    }

    store::save_db(&db)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

// Ladders arrive either as structured hours or as the wizard's
// free-text comma list ("50, 100, 250").
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LadderInput {
    Values(Vec<i64>),
    Text(String),
}

impl LadderInput {
    fn into_ladder(self) -> Result<Vec<i64>, ApiError> {
        let ladder = match self {
            LadderInput::Values(values) => {
                if values.iter().any(|&v| v <= 0) {
                    return Err(ApiError::Validation(
                        "intervals must be positive hours".into(),
                    ));
                }
                logic::normalize_ladder(values)
            }
            LadderInput::Text(text) => logic::parse_interval_ladder(&text),
        };
        if ladder.is_empty() {
            return Err(ApiError::Validation("at least one interval required".into()));
        }
        Ok(ladder)
    }
}

#[derive(Debug, Deserialize)]
pub struct PresetInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub intervals: LadderInput,
}

// -----------------------------
// GET /api/presets
// Returns all interval presets sorted by name
// -----------------------------
pub async fn list_presets() -> Result<Json<Vec<IntervalPreset>>, ApiError> {
    let mut db = store::load_db()?;
    db.presets
        .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(Json(db.presets))
}

// -----------------------------
// POST /api/presets
// -----------------------------
pub async fn create_preset(Json(input): Json<PresetInput>) -> Result<Json<IntervalPreset>, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::Validation("preset name required".into()));
    }
    let intervals = input.intervals.into_ladder()?;

    let mut db = store::load_db()?;

    let preset = IntervalPreset {
        id: Uuid::new_v4(),
        name: input.name,
        description: input.description,
        intervals,
    };
    db.presets.push(preset.clone());

    store::save_db(&db)?;
    Ok(Json(preset))
}

// -----------------------------
// PUT /api/presets/:id
// Editing the ladder prunes assignment intervals that fell off it;
// assignments left empty are deleted
// -----------------------------
pub async fn update_preset(
    Path(id): Path<Uuid>,
    Json(input): Json<PresetInput>,
) -> Result<Json<IntervalPreset>, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::Validation("preset name required".into()));
    }
    let intervals = input.intervals.into_ladder()?;

    let mut db = store::load_db()?;

    let Some(p) = db.presets.iter_mut().find(|p| p.id == id) else {
        return Err(ApiError::NotFound("preset"));
    };
    p.name = input.name;
    p.description = input.description;
    p.intervals = intervals.clone();
    let updated = p.clone();

    db.apply_ladder(id, &intervals);

    store::save_db(&db)?;
    Ok(Json(updated))
}

// -----------------------------
// DELETE /api/presets/:id
// Refused while any template references the preset
// -----------------------------
pub async fn delete_preset(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let mut db = store::load_db()?;

    if !db.presets.iter().any(|p| p.id == id) {
        return Err(ApiError::NotFound("preset"));
    }
    if db.preset_in_use(id) {
        return Err(ApiError::Conflict(
            "preset is referenced by a template".into(),
        ));
    }
    db.presets.retain(|p| p.id != id);

    store::save_db(&db)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
