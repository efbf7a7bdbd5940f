pub mod memory_store;
pub mod postgres_store;

pub use memory_store::MemoryStore;
pub use postgres_store::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{allocation::Allocation, project::Project, resource::Resource},
};

/// A project row plus the allocation changes that go with it.
/// Stores apply it all-or-nothing.
#[derive(Debug, Clone)]
pub struct ProjectWrite {
    pub project: Project,
    /// Insert when set, update otherwise.
    pub is_new: bool,
    pub removed_allocations: Vec<Uuid>,
    pub added_allocations: Vec<Allocation>,
}

impl ProjectWrite {
    pub fn new(project: Project, is_new: bool) -> Self {
        Self {
            project,
            is_new,
            removed_allocations: Vec::new(),
            added_allocations: Vec::new(),
        }
    }
}

/// Durable storage for resources, projects and allocations.
///
/// Implementations enforce the uniqueness rules and return
/// `AppError::UniquenessConflict` when a write would break them:
/// - resources: (name, year, month)
/// - projects: (name, year, month) when the project has a period
/// - allocations: (project, resource) while both references are set
///
/// Allocations must point at existing rows and book no more days than are
/// present. Hard deletes of a project or resource null the matching
/// reference on its allocations instead of removing them.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    // --- Resources ---
    async fn insert_resource(&self, resource: &Resource) -> Result<(), AppError>;
    async fn find_resource(&self, id: Uuid) -> Result<Option<Resource>, AppError>;
    /// Ordered by name.
    async fn list_resources(&self) -> Result<Vec<Resource>, AppError>;
    /// `NotFound` when the row is gone.
    async fn update_resource(&self, resource: &Resource) -> Result<(), AppError>;
    async fn delete_resource(&self, id: Uuid) -> Result<bool, AppError>;

    // --- Projects ---
    async fn insert_project(&self, project: &Project) -> Result<(), AppError>;
    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, AppError>;
    /// Most recently updated first.
    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;
    async fn update_project(&self, project: &Project) -> Result<(), AppError>;
    async fn delete_project(&self, id: Uuid) -> Result<bool, AppError>;
    /// Writes the project and its allocation changes in one transaction.
    async fn save_project(&self, write: &ProjectWrite) -> Result<(), AppError>;

    // --- Allocations ---
    async fn insert_allocation(&self, allocation: &Allocation) -> Result<(), AppError>;
    async fn find_allocation(&self, id: Uuid) -> Result<Option<Allocation>, AppError>;
    async fn find_allocation_for(
        &self,
        project_id: Uuid,
        resource_id: Uuid,
    ) -> Result<Option<Allocation>, AppError>;
    /// Newest first.
    async fn list_project_allocations(&self, project_id: Uuid) -> Result<Vec<Allocation>, AppError>;
    async fn list_allocations(&self) -> Result<Vec<Allocation>, AppError>;
    async fn update_allocation(&self, allocation: &Allocation) -> Result<(), AppError>;
    async fn delete_allocation(&self, id: Uuid) -> Result<bool, AppError>;
}
