// Fleet maintenance tracker: catalog, templates, equipment schedules,
// service records, and the status derivation engine behind them.

pub mod error; // Error taxonomy mapped to HTTP responses
pub mod logic; // Core status derivation and schedule composition
pub mod models; // Data structures (Task, Template, Equipment, Db, etc.)
pub mod routes_catalog; // HTTP handlers for tasks & interval presets
pub mod routes_equipment; // HTTP handlers for equipment, schedule & records
pub mod routes_settings; // HTTP handlers for settings & categories
pub mod routes_templates; // HTTP handlers for templates & assignments
pub mod store; // Persistent storage (load/save db.json)
