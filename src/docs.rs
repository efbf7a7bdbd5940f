// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Utilization Backend", description = "Attendance, project hours and utilization"),
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Resources ---
        handlers::resources::list_resources,
        handlers::resources::create_resource,
        handlers::resources::get_resource,
        handlers::resources::update_resource,
        handlers::resources::delete_resource,
        handlers::resources::working_days,

        // --- Projects ---
        handlers::projects::list_projects,
        handlers::projects::create_project,
        handlers::projects::get_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,

        // --- Allocations ---
        handlers::projects::list_allocations,
        handlers::projects::add_allocation,
        handlers::projects::update_allocation,
        handlers::projects::remove_allocation,
        handlers::projects::resource_utilization,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_periods,
    ),
    components(
        schemas(
            // --- Resources ---
            models::resource::Resource,
            models::resource::ResourceInput,

            // --- Projects ---
            models::project::ProjectType,
            models::project::Project,
            models::project::ProjectInput,
            models::project::ProjectMetrics,
            models::project::ProjectDetail,

            // --- Allocations ---
            models::allocation::Allocation,
            models::allocation::AllocationInput,
            models::allocation::ResourceUtilization,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::MonthChoice,
            models::dashboard::PeriodOptions,
            models::dashboard::WorkingDaysHint,
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Resources", description = "Monthly attendance per person"),
        (name = "Projects", description = "Projects and their booked days"),
        (name = "Allocations", description = "Days a resource spends on a project"),
        (name = "Dashboard", description = "Totals and period pickers")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/health",
            "/api/resources",
            "/api/resources/{id}",
            "/api/calendar/working-days",
            "/api/projects",
            "/api/projects/{id}",
            "/api/projects/{id}/allocations",
            "/api/allocations/{id}",
            "/api/projects/{id}/resources/{resource_id}/utilization",
            "/api/dashboard/summary",
            "/api/dashboard/periods",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} is missing");
        }
    }
}
