use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use fleet_maintenance::logic::{compute_cell_status, schedule_statuses};
use fleet_maintenance::models::{ServiceRecord, ServiceStatus, Settings, TemplateTask};

fn settings(before: i64, after: i64) -> Settings {
    Settings {
        pending_before_hours: before,
        pending_after_hours: after,
        master_admin_code: String::new(),
        updated_at: Utc::now(),
    }
}

fn record(equipment_id: Uuid, task_id: Uuid, interval: i64, performed_by: &str) -> ServiceRecord {
    ServiceRecord {
        id: Uuid::new_v4(),
        equipment_id,
        task_id,
        scheduled_interval: interval,
        performed_by: performed_by.into(),
        service_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        actual_hours: interval,
        notes: String::new(),
        created_at: Utc::now(),
    }
}

#[test]
fn completed_record_wins_regardless_of_hours() {
    let equipment_id = Uuid::new_v4();
    let task_id = Uuid::new_v4();
    let records = vec![record(equipment_id, task_id, 250, "John Doe")];
    let settings = settings(20, 15);

    for hours in [0, 230, 250, 265, 10_000] {
        let cell = compute_cell_status(task_id, 250, hours, &records, &settings);
        assert_eq!(cell.status, ServiceStatus::Completed);
        assert!(cell.last_service.is_some());
    }
}

#[test]
fn record_for_other_interval_does_not_complete_cell() {
    let equipment_id = Uuid::new_v4();
    let task_id = Uuid::new_v4();
    let records = vec![record(equipment_id, task_id, 100, "John Doe")];

    let cell = compute_cell_status(task_id, 250, 245, &records, &settings(20, 15));
    assert_eq!(cell.status, ServiceStatus::Pending);
    assert!(cell.last_service.is_none());
}

#[test]
fn delta_equal_to_before_threshold_is_not_due() {
    // B=20, interval=250, hours=230 -> delta=20 -> NotDue (strict >)
    let cell = compute_cell_status(Uuid::new_v4(), 250, 230, &[], &settings(20, 15));
    assert_eq!(cell.status, ServiceStatus::NotDue);
}

#[test]
fn delta_just_inside_before_threshold_is_pending() {
    let cell = compute_cell_status(Uuid::new_v4(), 250, 231, &[], &settings(20, 15));
    assert_eq!(cell.status, ServiceStatus::Pending);
}

#[test]
fn delta_equal_to_negative_after_threshold_is_pending() {
    // A=15, interval=250, hours=265 -> delta=-15 -> Pending (inclusive >=)
    let cell = compute_cell_status(Uuid::new_v4(), 250, 265, &[], &settings(20, 15));
    assert_eq!(cell.status, ServiceStatus::Pending);
}

#[test]
fn delta_past_after_threshold_is_overdue() {
    let cell = compute_cell_status(Uuid::new_v4(), 250, 266, &[], &settings(20, 15));
    assert_eq!(cell.status, ServiceStatus::Overdue);
}

#[test]
fn equipment_at_245_hours_with_250_interval_is_pending() {
    let cell = compute_cell_status(Uuid::new_v4(), 250, 245, &[], &settings(20, 15));
    assert_eq!(cell.status, ServiceStatus::Pending);
}

#[test]
fn statuses_partition_all_deltas_with_no_gap_or_overlap() {
    let task_id = Uuid::new_v4();
    let s = settings(20, 15);

    for hours in 0..=600 {
        let delta = 250 - hours;
        let expected = if delta > 20 {
            ServiceStatus::NotDue
        } else if delta >= -15 {
            ServiceStatus::Pending
        } else {
            ServiceStatus::Overdue
        };
        let cell = compute_cell_status(task_id, 250, hours, &[], &s);
        assert_eq!(cell.status, expected, "hours={hours} delta={delta}");
    }
}

#[test]
fn zero_thresholds_leave_pending_only_at_exact_interval() {
    let s = settings(0, 0);
    assert_eq!(
        compute_cell_status(Uuid::new_v4(), 100, 99, &[], &s).status,
        ServiceStatus::NotDue
    );
    assert_eq!(
        compute_cell_status(Uuid::new_v4(), 100, 100, &[], &s).status,
        ServiceStatus::Pending
    );
    assert_eq!(
        compute_cell_status(Uuid::new_v4(), 100, 101, &[], &s).status,
        ServiceStatus::Overdue
    );
}

#[test]
fn duplicate_records_resolve_to_first_match() {
    let equipment_id = Uuid::new_v4();
    let task_id = Uuid::new_v4();
    let first = record(equipment_id, task_id, 250, "Jane Smith");
    let second = record(equipment_id, task_id, 250, "Mike Johnson");
    let records = vec![first.clone(), second];

    let cell = compute_cell_status(task_id, 250, 300, &records, &settings(20, 15));
    assert_eq!(cell.status, ServiceStatus::Completed);
    assert_eq!(cell.last_service.unwrap().id, first.id);
}

#[test]
fn schedule_yields_one_cell_per_task_interval_pair() {
    let template_id = Uuid::new_v4();
    let oil_task = Uuid::new_v4();
    let filter_task = Uuid::new_v4();
    let assignments = vec![
        TemplateTask {
            id: Uuid::new_v4(),
            template_id,
            task_id: oil_task,
            intervals: vec![50, 100, 250, 500],
        },
        TemplateTask {
            id: Uuid::new_v4(),
            template_id,
            task_id: filter_task,
            intervals: vec![250],
        },
    ];

    let cells = schedule_statuses(&assignments, 245, &[], &settings(20, 15));
    assert_eq!(cells.len(), 5);

    // Cells are independent: same equipment hours, different intervals.
    let oil_50 = cells
        .iter()
        .find(|c| c.task_id == oil_task && c.interval == 50)
        .unwrap();
    assert_eq!(oil_50.status, ServiceStatus::Overdue);
    let oil_500 = cells
        .iter()
        .find(|c| c.task_id == oil_task && c.interval == 500)
        .unwrap();
    assert_eq!(oil_500.status, ServiceStatus::NotDue);
    let filter_250 = cells
        .iter()
        .find(|c| c.task_id == filter_task && c.interval == 250)
        .unwrap();
    assert_eq!(filter_250.status, ServiceStatus::Pending);
}

#[test]
fn empty_schedule_produces_no_cells() {
    let cells = schedule_statuses(&[], 245, &[], &settings(20, 15));
    assert!(cells.is_empty());
}
