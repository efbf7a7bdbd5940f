pub mod dashboard_service;
pub mod project_service;
pub mod resource_service;

pub use dashboard_service::DashboardService;
pub use project_service::{ProjectDeleteMode, ProjectService};
pub use resource_service::ResourceService;
