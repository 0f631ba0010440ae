// --------------------------------------------------
// Handles API endpoints for service templates and their
// task assignments (the schedule definition).
//
// Responsibilities:
// - Create / read / update / delete templates
// - Wizard commit: template plus assignments in one write
// - Add tasks to a template (auto-apply seeding)
// - Toggle per-task intervals, upholding the non-empty
//   subset invariant
// -------------------------------------------------

use axum::{extract::Path, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::logic;
use crate::models::{IntervalPreset, Task, Template, TemplateTask};
use crate::store;

#[derive(Debug, Serialize)]
pub struct TemplateSummary {
    #[serde(flatten)]
    pub template: Template,
    pub preset: Option<IntervalPreset>,
}

#[derive(Debug, Serialize)]
pub struct AssignmentView {
    pub id: Uuid,
    pub task: Task,
    pub intervals: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct TemplateDetail {
    #[serde(flatten)]
    pub template: Template,
    pub preset: Option<IntervalPreset>,
    pub tasks: Vec<AssignmentView>,
}

fn ensure_subset(intervals: &[i64], ladder: &[i64]) -> Result<(), ApiError> {
    if let Some(bad) = intervals.iter().find(|i| !ladder.contains(i)) {
        return Err(ApiError::Validation(format!(
            "interval {bad} is not on the template's preset ladder"
        )));
    }
    Ok(())
}

// -----------------------------
// GET /api/templates
// Returns all templates sorted by name, each with its preset
// -----------------------------
pub async fn list_templates() -> Result<Json<Vec<TemplateSummary>>, ApiError> {
    let db = store::load_db()?;

    let mut summaries: Vec<TemplateSummary> = db
        .templates
        .iter()
        .map(|t| TemplateSummary {
            template: t.clone(),
            preset: t
                .preset_id
                .and_then(|id| db.presets.iter().find(|p| p.id == id).cloned()),
        })
        .collect();
    summaries.sort_by(|a, b| {
        a.template
            .name
            .to_lowercase()
            .cmp(&b.template.name.to_lowercase())
    });

    Ok(Json(summaries))
}

#[derive(Debug, Deserialize)]
pub struct TaskSelection {
    pub task_id: Uuid,
    pub intervals: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTemplateInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub preset_id: Option<Uuid>,
    #[serde(default)]
    pub tasks: Vec<TaskSelection>,
}

// -----------------------------
// POST /api/templates
// Final commit of the creation wizard: the template row and one
// assignment per task with a non-empty interval selection are
// written in a single save, so no partial template can persist
// -----------------------------
pub async fn create_template(
    Json(input): Json<CreateTemplateInput>,
) -> Result<Json<Template>, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::Validation("template name required".into()));
    }

    let mut db = store::load_db()?;

    if let Some(preset_id) = input.preset_id {
        if !db.presets.iter().any(|p| p.id == preset_id) {
            return Err(ApiError::Validation("unknown interval preset".into()));
        }
    }
    let ladder = db.preset_ladder(input.preset_id);

    let mut seen = Vec::new();
    for selection in &input.tasks {
        if !db.tasks.iter().any(|t| t.id == selection.task_id) {
            return Err(ApiError::Validation("unknown task".into()));
        }
        if seen.contains(&selection.task_id) {
            return Err(ApiError::Validation("duplicate task in selection".into()));
        }
        seen.push(selection.task_id);
        ensure_subset(&selection.intervals, &ladder)?;
    }

    let template = Template {
        id: Uuid::new_v4(),
        name: input.name,
        description: input.description,
        preset_id: input.preset_id,
    };
    db.templates.push(template.clone());

    // Tasks where no interval ended up selected are silently dropped.
    for selection in input.tasks {
        if selection.intervals.is_empty() {
            continue;
        }
        db.template_tasks.push(TemplateTask {
            id: Uuid::new_v4(),
            template_id: template.id,
            task_id: selection.task_id,
            intervals: logic::normalize_ladder(selection.intervals),
        });
    }

    store::save_db(&db)?;
    tracing::info!(template = %template.name, "template created");
    Ok(Json(template))
}

// -----------------------------
// GET /api/templates/:id
// Template with its preset and assignments, sorted by task name
// -----------------------------
pub async fn get_template(Path(id): Path<Uuid>) -> Result<Json<TemplateDetail>, ApiError> {
    let db = store::load_db()?;

    let Some(template) = db.templates.iter().find(|t| t.id == id).cloned() else {
        return Err(ApiError::NotFound("template"));
    };
    let preset = template
        .preset_id
        .and_then(|pid| db.presets.iter().find(|p| p.id == pid).cloned());

    let mut tasks: Vec<AssignmentView> = db
        .template_tasks
        .iter()
        .filter(|tt| tt.template_id == id)
        .filter_map(|tt| {
            db.tasks.iter().find(|t| t.id == tt.task_id).map(|task| AssignmentView {
                id: tt.id,
                task: task.clone(),
                intervals: tt.intervals.clone(),
            })
        })
        .collect();
    tasks.sort_by(|a, b| a.task.name.to_lowercase().cmp(&b.task.name.to_lowercase()));

    Ok(Json(TemplateDetail {
        template,
        preset,
        tasks,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTemplateInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// -----------------------------
// PUT /api/templates/:id
// Name and description only; the preset cannot be swapped once
// assignments depend on its ladder
// -----------------------------
pub async fn update_template(
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTemplateInput>,
) -> Result<Json<Template>, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::Validation("template name required".into()));
    }

    let mut db = store::load_db()?;

    let Some(t) = db.templates.iter_mut().find(|t| t.id == id) else {
        return Err(ApiError::NotFound("template"));
    };
    t.name = input.name;
    t.description = input.description;
    let updated = t.clone();

    store::save_db(&db)?;
    Ok(Json(updated))
}

// -----------------------------
// DELETE /api/templates/:id
// Cascades to assignments; equipment is detached, not deleted
// -----------------------------
pub async fn delete_template(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let mut db = store::load_db()?;

    if !db.remove_template(id) {
        return Err(ApiError::NotFound("template"));
    }

    store::save_db(&db)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct AddTaskInput {
    pub task_id: Uuid,
    // Explicit selection; auto-apply tasks may omit it to receive
    // the entire ladder.
    pub intervals: Option<Vec<i64>>,
}

// -----------------------------
// POST /api/templates/:id/tasks
// Adds a task to the template. Auto-apply tasks are pre-scheduled
// at every rung of the preset ladder; other tasks must name at
// least one interval (no assignment may exist with zero intervals)
// -----------------------------
pub async fn add_template_task(
    Path(id): Path<Uuid>,
    Json(input): Json<AddTaskInput>,
) -> Result<Json<TemplateTask>, ApiError> {
    let mut db = store::load_db()?;

    let Some(template) = db.templates.iter().find(|t| t.id == id) else {
        return Err(ApiError::NotFound("template"));
    };
    let ladder = db.preset_ladder(template.preset_id);
    if ladder.is_empty() {
        return Err(ApiError::Validation(
            "template has no interval preset".into(),
        ));
    }

    let Some(task) = db.tasks.iter().find(|t| t.id == input.task_id) else {
        return Err(ApiError::NotFound("task"));
    };
    if db.assignment_exists(id, input.task_id) {
        return Err(ApiError::Conflict(
            "task is already assigned to this template".into(),
        ));
    }

    let intervals = match input.intervals {
        Some(values) => logic::normalize_ladder(values),
        None => logic::initial_intervals(task.auto_apply, &ladder),
    };
    ensure_subset(&intervals, &ladder)?;
    if intervals.is_empty() {
        return Err(ApiError::Validation(
            "task requires at least one interval".into(),
        ));
    }

    let assignment = TemplateTask {
        id: Uuid::new_v4(),
        template_id: id,
        task_id: input.task_id,
        intervals,
    };
    db.template_tasks.push(assignment.clone());

    store::save_db(&db)?;
    Ok(Json(assignment))
}

#[derive(Debug, Deserialize)]
pub struct ToggleInput {
    pub interval: i64,
}

// -----------------------------
// POST /api/templates/:id/tasks/:task_id/toggle
// Flips one interval on the assignment. Toggling the last interval
// off removes the assignment row entirely
// -----------------------------
pub async fn toggle_template_interval(
    Path((id, task_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<ToggleInput>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut db = store::load_db()?;

    let Some(template) = db.templates.iter().find(|t| t.id == id) else {
        return Err(ApiError::NotFound("template"));
    };
    let ladder = db.preset_ladder(template.preset_id);
    if !ladder.contains(&input.interval) {
        return Err(ApiError::Validation(format!(
            "interval {} is not on the template's preset ladder",
            input.interval
        )));
    }

    let Some(pos) = db
        .template_tasks
        .iter()
        .position(|tt| tt.template_id == id && tt.task_id == task_id)
    else {
        return Err(ApiError::NotFound("assignment"));
    };

    let next = logic::toggle_interval(&db.template_tasks[pos].intervals, input.interval);
    let removed = next.is_empty();
    if removed {
        db.template_tasks.remove(pos);
    } else {
        db.template_tasks[pos].intervals = next.clone();
    }

    store::save_db(&db)?;
    Ok(Json(serde_json::json!({
        "intervals": next,
        "removed": removed,
    })))
}

// -----------------------------
// DELETE /api/templates/:id/tasks/:task_id
// Removes a task from the template's schedule
// -----------------------------
pub async fn delete_template_task(
    Path((id, task_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut db = store::load_db()?;

    let before = db.template_tasks.len();
    db.template_tasks
        .retain(|tt| !(tt.template_id == id && tt.task_id == task_id));
    if db.template_tasks.len() == before {
        return Err(ApiError::NotFound("assignment"));
    }

    store::save_db(&db)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
