// Import axum routing utilities and Router
use axum::{
    routing::{delete, get, post, put}, // HTTP method helpers
    Router,                            // Main router type
};
use std::net::SocketAddr;
use tower_http::services::ServeDir; // Used to serve static files (HTML/CSS/JS)
use tracing_subscriber::EnvFilter;

use fleet_maintenance::{routes_catalog, routes_equipment, routes_settings, routes_templates};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let api = Router::new()
        // settings & categories
        .route(
            "/settings",
            get(routes_settings::get_settings).put(routes_settings::put_settings),
        )
        .route(
            "/categories",
            get(routes_settings::list_categories).post(routes_settings::create_category),
        )
        .route(
            "/categories/:id",
            put(routes_settings::update_category).delete(routes_settings::delete_category),
        )
        // catalog
        .route(
            "/tasks",
            get(routes_catalog::list_tasks).post(routes_catalog::create_task),
        )
        .route(
            "/tasks/:id",
            put(routes_catalog::update_task).delete(routes_catalog::delete_task),
        )
        .route(
            "/presets",
            get(routes_catalog::list_presets).post(routes_catalog::create_preset),
        )
        .route(
            "/presets/:id",
            put(routes_catalog::update_preset).delete(routes_catalog::delete_preset),
        )
        // templates & assignments
        .route(
            "/templates",
            get(routes_templates::list_templates).post(routes_templates::create_template),
        )
        .route(
            "/templates/:id",
            get(routes_templates::get_template)
                .put(routes_templates::update_template)
                .delete(routes_templates::delete_template),
        )
        .route(
            "/templates/:id/tasks",
            post(routes_templates::add_template_task),
        )
        .route(
            "/templates/:id/tasks/:task_id",
            delete(routes_templates::delete_template_task),
        )
        .route(
            "/templates/:id/tasks/:task_id/toggle",
            post(routes_templates::toggle_template_interval),
        )
        // equipment, schedule & service records
        .route(
            "/equipment",
            get(routes_equipment::list_equipment).post(routes_equipment::create_equipment),
        )
        .route(
            "/equipment/:id",
            put(routes_equipment::update_equipment).delete(routes_equipment::delete_equipment),
        )
        .route("/equipment/:id/schedule", get(routes_equipment::get_schedule))
        .route(
            "/equipment/:id/records",
            get(routes_equipment::list_records).post(routes_equipment::create_record),
        )
        .route(
            "/equipment/:id/records/:record_id",
            put(routes_equipment::update_record),
        );

    let app = Router::new()
        .nest("/api", api)
        .nest_service("/", ServeDir::new("static"));

    let addr: SocketAddr = "127.0.0.1:3000".parse().expect("valid address");

    tracing::info!("server running at http://{addr}");
    tracing::info!("API base: http://{addr}/api");

    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind failed");

    axum::serve(listener, app).await.expect("server error");
}
