// --------------------------------------------------
// Handles API endpoints for equipment, the per-equipment
// service schedule (status grid), and service records.
//
// Responsibilities:
// - Create / read / update / delete equipment
// - Derive the status grid from schedule + hours + records
// - Record completed services (one record per cell)
// - Gate edits of completed records behind the admin code
// -------------------------------------------------

use axum::{extract::Path, Json};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::logic;
use crate::models::{Equipment, ServiceRecord, ServiceStatus, Task, TemplateTask};
use crate::store;

#[derive(Debug, Serialize)]
pub struct TemplateRef {
    pub id: Uuid,
    pub name: String,
    pub intervals: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct EquipmentView {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub template: Option<TemplateRef>,
}

#[derive(Debug, Deserialize)]
pub struct EquipmentInput {
    pub name: String,
    pub serial_number: String,
    #[serde(default)]
    pub current_hours: i64,
    pub template_id: Option<Uuid>,
}

fn template_ref(db: &crate::models::Db, template_id: Option<Uuid>) -> Option<TemplateRef> {
    let template = template_id.and_then(|id| db.templates.iter().find(|t| t.id == id))?;
    Some(TemplateRef {
        id: template.id,
        name: template.name.clone(),
        intervals: db.preset_ladder(template.preset_id),
    })
}

fn validate_equipment_input(
    input: &EquipmentInput,
    db: &crate::models::Db,
) -> Result<(), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::Validation("equipment name required".into()));
    }
    if input.serial_number.trim().is_empty() {
        return Err(ApiError::Validation("serial number required".into()));
    }
    if input.current_hours < 0 {
        return Err(ApiError::Validation(
            "current hours must be zero or positive".into(),
        ));
    }
    if let Some(template_id) = input.template_id {
        if !db.templates.iter().any(|t| t.id == template_id) {
            return Err(ApiError::Validation("unknown template".into()));
        }
    }
    Ok(())
}

// -----------------------------
// GET /api/equipment
// Returns all equipment sorted by name, with the assigned
// template and its interval ladder
// -----------------------------
pub async fn list_equipment() -> Result<Json<Vec<EquipmentView>>, ApiError> {
    let db = store::load_db()?;

    let mut views: Vec<EquipmentView> = db
        .equipment
        .iter()
        .map(|e| EquipmentView {
            equipment: e.clone(),
            template: template_ref(&db, e.template_id),
        })
        .collect();
    views.sort_by(|a, b| {
        a.equipment
            .name
            .to_lowercase()
            .cmp(&b.equipment.name.to_lowercase())
    });

    Ok(Json(views))
}

// -----------------------------
// POST /api/equipment
// -----------------------------
pub async fn create_equipment(
    Json(input): Json<EquipmentInput>,
) -> Result<Json<Equipment>, ApiError> {
    let mut db = store::load_db()?;
    validate_equipment_input(&input, &db)?;

    let equipment = Equipment {
        id: Uuid::new_v4(),
        name: input.name,
        serial_number: input.serial_number,
        current_hours: input.current_hours,
        template_id: input.template_id,
    };
    db.equipment.push(equipment.clone());

    store::save_db(&db)?;
    Ok(Json(equipment))
}

// -----------------------------
// PUT /api/equipment/:id
// Hours are taken as given; monotonicity is not enforced
// -----------------------------
pub async fn update_equipment(
    Path(id): Path<Uuid>,
    Json(input): Json<EquipmentInput>,
) -> Result<Json<Equipment>, ApiError> {
    let mut db = store::load_db()?;
    validate_equipment_input(&input, &db)?;

    let Some(e) = db.equipment.iter_mut().find(|e| e.id == id) else {
        return Err(ApiError::NotFound("equipment"));
    };
    e.name = input.name;
    e.serial_number = input.serial_number;
    e.current_hours = input.current_hours;
    e.template_id = input.template_id;
    let updated = e.clone();

    store::save_db(&db)?;
    Ok(Json(updated))
}

// -----------------------------
// DELETE /api/equipment/:id
// Service history is removed with the machine
// -----------------------------
pub async fn delete_equipment(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let mut db = store::load_db()?;

    if !db.remove_equipment(id) {
        return Err(ApiError::NotFound("equipment"));
    }

    store::save_db(&db)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Debug, Serialize)]
pub struct ScheduleCell {
    pub task_id: Uuid,
    pub task_name: String,
    pub interval: i64,
    pub status: ServiceStatus,
    pub last_service: Option<ServiceRecord>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub equipment_id: Uuid,
    pub current_hours: i64,
    pub template: Option<TemplateRef>,
    pub intervals: Vec<i64>,
    pub tasks: Vec<Task>,
    pub cells: Vec<ScheduleCell>,
}

// -----------------------------
// GET /api/equipment/:id/schedule
// The status grid: one cell per (task, interval) on the assigned
// template, recomputed from a fresh load on every request
// -----------------------------
pub async fn get_schedule(Path(id): Path<Uuid>) -> Result<Json<ScheduleResponse>, ApiError> {
    let db = store::load_db()?;

    let Some(equipment) = db.equipment.iter().find(|e| e.id == id).cloned() else {
        return Err(ApiError::NotFound("equipment"));
    };
    let settings = db.settings.clone().unwrap_or_default();
    let template = template_ref(&db, equipment.template_id);

    let assignments: Vec<TemplateTask> = match equipment.template_id {
        Some(template_id) => db
            .template_tasks
            .iter()
            .filter(|tt| tt.template_id == template_id)
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    let records: Vec<ServiceRecord> = db
        .service_records
        .iter()
        .filter(|r| r.equipment_id == id)
        .cloned()
        .collect();

    let cells: Vec<ScheduleCell> = logic::schedule_statuses(
        &assignments,
        equipment.current_hours,
        &records,
        &settings,
    )
    .into_iter()
    .filter_map(|cell| {
        db.tasks.iter().find(|t| t.id == cell.task_id).map(|task| ScheduleCell {
            task_id: cell.task_id,
            task_name: task.name.clone(),
            interval: cell.interval,
            status: cell.status,
            last_service: cell.last_service,
        })
    })
    .collect();

    let mut tasks: Vec<Task> = db
        .tasks
        .iter()
        .filter(|t| assignments.iter().any(|a| a.task_id == t.id))
        .cloned()
        .collect();
    tasks.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let intervals = template.as_ref().map(|t| t.intervals.clone()).unwrap_or_default();

    Ok(Json(ScheduleResponse {
        equipment_id: id,
        current_hours: equipment.current_hours,
        template,
        intervals,
        tasks,
        cells,
    }))
}

// -----------------------------
// GET /api/equipment/:id/records
// Service history, most recent hours reading first
// -----------------------------
pub async fn list_records(Path(id): Path<Uuid>) -> Result<Json<Vec<ServiceRecord>>, ApiError> {
    let db = store::load_db()?;

    if !db.equipment.iter().any(|e| e.id == id) {
        return Err(ApiError::NotFound("equipment"));
    }
    let mut records: Vec<ServiceRecord> = db
        .service_records
        .iter()
        .filter(|r| r.equipment_id == id)
        .cloned()
        .collect();
    records.sort_by(|a, b| b.actual_hours.cmp(&a.actual_hours));

    Ok(Json(records))
}

#[derive(Debug, Deserialize)]
pub struct RecordInput {
    pub task_id: Uuid,
    pub scheduled_interval: i64,
    pub performed_by: String,
    pub service_date: NaiveDate,
    pub actual_hours: i64,
    #[serde(default)]
    pub notes: String,
}

// -----------------------------
// POST /api/equipment/:id/records
// Marks a non-completed cell as serviced. Creating a record never
// requires authorization; a duplicate (task, interval) is refused
// and must go through the gated edit path instead
// -----------------------------
pub async fn create_record(
    Path(id): Path<Uuid>,
    Json(input): Json<RecordInput>,
) -> Result<Json<ServiceRecord>, ApiError> {
    if input.performed_by.trim().is_empty() {
        return Err(ApiError::Validation("performed by required".into()));
    }

    let mut db = store::load_db()?;

    let Some(equipment) = db.equipment.iter().find(|e| e.id == id) else {
        return Err(ApiError::NotFound("equipment"));
    };

    // The record must land on an actual cell of the assigned schedule.
    let scheduled = equipment.template_id.is_some_and(|template_id| {
        db.template_tasks.iter().any(|tt| {
            tt.template_id == template_id
                && tt.task_id == input.task_id
                && tt.intervals.contains(&input.scheduled_interval)
        })
    });
    if !scheduled {
        return Err(ApiError::Validation(
            "no such scheduled service for this equipment".into(),
        ));
    }

    if db.record_exists(id, input.task_id, input.scheduled_interval) {
        return Err(ApiError::Conflict(
            "service already recorded for this task and interval".into(),
        ));
    }

    let record = ServiceRecord {
        id: Uuid::new_v4(),
        equipment_id: id,
        task_id: input.task_id,
        scheduled_interval: input.scheduled_interval,
        performed_by: input.performed_by,
        service_date: input.service_date,
        actual_hours: input.actual_hours,
        notes: input.notes,
        created_at: Utc::now(),
    };
    db.service_records.push(record.clone());

    store::save_db(&db)?;
    tracing::info!(
        equipment = %id,
        task = %record.task_id,
        interval = record.scheduled_interval,
        "service recorded"
    );
    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecordInput {
    // Checked on every edit attempt; never cached as a session.
    pub admin_code: String,
    pub performed_by: String,
    pub service_date: NaiveDate,
    pub actual_hours: i64,
    #[serde(default)]
    pub notes: String,
}

// -----------------------------
// PUT /api/equipment/:id/records/:record_id
// Edits a completed record. The (equipment, task, interval) triple
// is immutable; only the service details can change
// -----------------------------
pub async fn update_record(
    Path((id, record_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateRecordInput>,
) -> Result<Json<ServiceRecord>, ApiError> {
    if input.performed_by.trim().is_empty() {
        return Err(ApiError::Validation("performed by required".into()));
    }

    let mut db = store::load_db()?;

    let settings = db.settings.clone().unwrap_or_default();
    logic::authorize(&input.admin_code, &settings)?;

    let Some(r) = db
        .service_records
        .iter_mut()
        .find(|r| r.id == record_id && r.equipment_id == id)
    else {
        return Err(ApiError::NotFound("service record"));
    };
    r.performed_by = input.performed_by;
    r.service_date = input.service_date;
    r.actual_hours = input.actual_hours;
    r.notes = input.notes;
    let updated = r.clone();

    store::save_db(&db)?;
    tracing::info!(record = %record_id, "completed service record edited");
    Ok(Json(updated))
}
