use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Service status of one (task, interval) cell on the schedule grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceStatus {
    NotDue,
    Pending,
    Overdue,
    Completed,
}

// Process-wide tolerance thresholds and the shared admin passphrase.
// Stored as a singleton; defaults apply until the first explicit save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub pending_before_hours: i64,
    pub pending_after_hours: i64,
    pub master_admin_code: String, // empty = not configured
    pub updated_at: DateTime<Utc>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            pending_before_hours: 20,
            pending_after_hours: 15,
            master_admin_code: String::new(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub color: String, // hex, e.g. "#64748b"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub estimated_duration: i64, // minutes
    pub category_id: Option<Uuid>,
    pub auto_apply: bool,
}

// A named ladder of equipment-hour thresholds, e.g. {50, 100, 250, 500}.
// Intervals are strictly positive, distinct, sorted ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalPreset {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub intervals: Vec<i64>,
}

// Maintenance plan for one equipment class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub preset_id: Option<Uuid>,
}

// One task scheduled on a template, with the specific hour intervals at
// which it must be performed. The interval set is a non-empty sorted
// subset of the template's preset ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateTask {
    pub id: Uuid,
    pub template_id: Uuid,
    pub task_id: Uuid,
    pub intervals: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    pub serial_number: String,
    pub current_hours: i64,
    pub template_id: Option<Uuid>,
}

// Evidence that a scheduled service was performed. At most one record
// exists per (equipment, task, scheduled_interval) triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub task_id: Uuid,
    pub scheduled_interval: i64,
    pub performed_by: String,
    pub service_date: NaiveDate,
    pub actual_hours: i64,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Db {
    pub settings: Option<Settings>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub presets: Vec<IntervalPreset>,
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub template_tasks: Vec<TemplateTask>,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub service_records: Vec<ServiceRecord>,
}

impl Db {
    // Removals below return false when the row does not exist, so route
    // handlers can answer 404 without a second lookup.

    // Tasks referencing the category become uncategorized.
    pub fn remove_category(&mut self, id: Uuid) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        if self.categories.len() == before {
            return false;
        }
        for task in self.tasks.iter_mut() {
            if task.category_id == Some(id) {
                task.category_id = None;
            }
        }
        true
    }

    // Schedule entries go with the task; service history is kept.
    pub fn remove_task(&mut self, id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.template_tasks.retain(|tt| tt.task_id != id);
        true
    }

    // Cascades to assignments and detaches equipment from the plan.
    pub fn remove_template(&mut self, id: Uuid) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != id);
        if self.templates.len() == before {
            return false;
        }
        self.template_tasks.retain(|tt| tt.template_id != id);
        for eq in self.equipment.iter_mut() {
            if eq.template_id == Some(id) {
                eq.template_id = None;
            }
        }
        true
    }

    // Service history belongs to the machine and is removed with it.
    pub fn remove_equipment(&mut self, id: Uuid) -> bool {
        let before = self.equipment.len();
        self.equipment.retain(|e| e.id != id);
        if self.equipment.len() == before {
            return false;
        }
        self.service_records.retain(|r| r.equipment_id != id);
        true
    }

    pub fn preset_in_use(&self, id: Uuid) -> bool {
        self.templates.iter().any(|t| t.preset_id == Some(id))
    }

    // Re-applies an edited ladder to every assignment under templates that
    // reference the preset: intervals no longer on the ladder are pruned,
    // and assignments left empty are deleted.
    pub fn apply_ladder(&mut self, preset_id: Uuid, ladder: &[i64]) {
        let template_ids: Vec<Uuid> = self
            .templates
            .iter()
            .filter(|t| t.preset_id == Some(preset_id))
            .map(|t| t.id)
            .collect();

        for tt in self.template_tasks.iter_mut() {
            if template_ids.contains(&tt.template_id) {
                tt.intervals.retain(|i| ladder.contains(i));
            }
        }
        self.template_tasks
            .retain(|tt| !template_ids.contains(&tt.template_id) || !tt.intervals.is_empty());
    }

    pub fn assignment_exists(&self, template_id: Uuid, task_id: Uuid) -> bool {
        self.template_tasks
            .iter()
            .any(|tt| tt.template_id == template_id && tt.task_id == task_id)
    }

    pub fn record_exists(&self, equipment_id: Uuid, task_id: Uuid, interval: i64) -> bool {
        self.service_records.iter().any(|r| {
            r.equipment_id == equipment_id
                && r.task_id == task_id
                && r.scheduled_interval == interval
        })
    }

    pub fn preset_ladder(&self, preset_id: Option<Uuid>) -> Vec<i64> {
        preset_id
            .and_then(|id| self.presets.iter().find(|p| p.id == id))
            .map(|p| p.intervals.clone())
            .unwrap_or_default()
    }
}
