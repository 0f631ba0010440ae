use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use fleet_maintenance::models::{
    Category, Db, Equipment, IntervalPreset, ServiceRecord, Task, Template, TemplateTask,
};
use fleet_maintenance::store::{load_db_from, save_db_to};

fn task(name: &str, category_id: Option<Uuid>) -> Task {
    Task {
        id: Uuid::new_v4(),
        name: name.into(),
        description: String::new(),
        estimated_duration: 30,
        category_id,
        auto_apply: false,
    }
}

fn sample_db() -> Db {
    let category = Category {
        id: Uuid::new_v4(),
        name: "Engine".into(),
        description: String::new(),
        color: "#64748b".into(),
    };
    let oil = task("Oil change", Some(category.id));
    let preset = IntervalPreset {
        id: Uuid::new_v4(),
        name: "Standard".into(),
        description: String::new(),
        intervals: vec![50, 100, 250, 500],
    };
    let template = Template {
        id: Uuid::new_v4(),
        name: "Boom Lifts".into(),
        description: String::new(),
        preset_id: Some(preset.id),
    };
    let assignment = TemplateTask {
        id: Uuid::new_v4(),
        template_id: template.id,
        task_id: oil.id,
        intervals: vec![50, 250],
    };
    let equipment = Equipment {
        id: Uuid::new_v4(),
        name: "Lift 3".into(),
        serial_number: "SN-003".into(),
        current_hours: 245,
        template_id: Some(template.id),
    };
    let record = ServiceRecord {
        id: Uuid::new_v4(),
        equipment_id: equipment.id,
        task_id: oil.id,
        scheduled_interval: 50,
        performed_by: "Jane Smith".into(),
        service_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        actual_hours: 52,
        notes: String::new(),
        created_at: Utc::now(),
    };

    Db {
        settings: None,
        categories: vec![category],
        tasks: vec![oil],
        presets: vec![preset],
        templates: vec![template],
        template_tasks: vec![assignment],
        equipment: vec![equipment],
        service_records: vec![record],
    }
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");
    let db = sample_db();

    save_db_to(&path, &db).unwrap();
    let loaded = load_db_from(&path).unwrap();

    assert_eq!(loaded.tasks.len(), 1);
    assert_eq!(loaded.tasks[0].id, db.tasks[0].id);
    assert_eq!(loaded.template_tasks[0].intervals, vec![50, 250]);
    assert_eq!(loaded.service_records[0].performed_by, "Jane Smith");
}

#[test]
fn missing_file_loads_as_empty_datastore() {
    let dir = tempfile::tempdir().unwrap();
    let db = load_db_from(&dir.path().join("absent.json")).unwrap();
    assert!(db.settings.is_none());
    assert!(db.tasks.is_empty());
}

#[test]
fn deleting_category_uncategorizes_tasks() {
    let mut db = sample_db();
    let category_id = db.categories[0].id;

    assert!(db.remove_category(category_id));
    assert!(db.categories.is_empty());
    assert_eq!(db.tasks[0].category_id, None);
}

#[test]
fn deleting_task_removes_schedule_entries_but_keeps_history() {
    let mut db = sample_db();
    let task_id = db.tasks[0].id;

    assert!(db.remove_task(task_id));
    assert!(db.template_tasks.is_empty());
    assert_eq!(db.service_records.len(), 1);
    assert_eq!(db.service_records[0].task_id, task_id);
}

#[test]
fn deleting_template_detaches_equipment_and_drops_assignments() {
    let mut db = sample_db();
    let template_id = db.templates[0].id;

    assert!(db.remove_template(template_id));
    assert!(db.template_tasks.is_empty());
    assert_eq!(db.equipment[0].template_id, None);
}

#[test]
fn deleting_equipment_removes_its_service_history() {
    let mut db = sample_db();
    let equipment_id = db.equipment[0].id;

    assert!(db.remove_equipment(equipment_id));
    assert!(db.service_records.is_empty());
}

#[test]
fn removals_report_missing_rows() {
    let mut db = sample_db();
    assert!(!db.remove_task(Uuid::new_v4()));
    assert!(!db.remove_template(Uuid::new_v4()));
    assert!(!db.remove_equipment(Uuid::new_v4()));
    assert!(!db.remove_category(Uuid::new_v4()));
}

#[test]
fn preset_in_use_tracks_template_references() {
    let mut db = sample_db();
    let preset_id = db.presets[0].id;

    assert!(db.preset_in_use(preset_id));
    let template_id = db.templates[0].id;
    db.remove_template(template_id);
    assert!(!db.preset_in_use(preset_id));
}

#[test]
fn editing_ladder_prunes_assignments_and_deletes_emptied_ones() {
    let mut db = sample_db();
    let preset_id = db.presets[0].id;

    // 250 falls off the ladder; the assignment keeps 50.
    db.apply_ladder(preset_id, &[50, 100]);
    assert_eq!(db.template_tasks[0].intervals, vec![50]);

    // 50 falls off as well; the emptied assignment is deleted.
    db.apply_ladder(preset_id, &[100]);
    assert!(db.template_tasks.is_empty());
}

#[test]
fn record_exists_matches_the_exact_triple() {
    let db = sample_db();
    let equipment_id = db.equipment[0].id;
    let task_id = db.tasks[0].id;

    assert!(db.record_exists(equipment_id, task_id, 50));
    assert!(!db.record_exists(equipment_id, task_id, 250));
    assert!(!db.record_exists(Uuid::new_v4(), task_id, 50));
}
