// src/db/memory_store.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        validation::{check_days_within_present, rule_violation},
    },
    db::{ProjectWrite, TrackingStore},
    models::{allocation::Allocation, project::Project, resource::Resource},
};

#[derive(Default, Clone)]
struct Tables {
    resources: HashMap<Uuid, Resource>,
    projects: HashMap<Uuid, Project>,
    allocations: HashMap<Uuid, Allocation>,
}

// Each method checks the same constraints as the SQL schema before touching
// anything, so a failed call leaves the tables as they were.
impl Tables {
    fn insert_project(&mut self, project: &Project) -> Result<(), AppError> {
        if self.projects.contains_key(&project.id) {
            return Err(AppError::conflict("Project"));
        }
        if self.projects.values().any(|p| p.same_key(project)) {
            return Err(AppError::conflict("Project for this period"));
        }
        self.projects.insert(project.id, project.clone());
        Ok(())
    }

    fn update_project(&mut self, project: &Project) -> Result<(), AppError> {
        if !self.projects.contains_key(&project.id) {
            return Err(AppError::not_found("Project"));
        }
        if self.projects.values().any(|p| p.same_key(project)) {
            return Err(AppError::conflict("Project for this period"));
        }
        self.projects.insert(project.id, project.clone());
        Ok(())
    }

    // Foreign keys, `booked_within_present` and the (project, resource) key.
    fn check_allocation(&self, allocation: &Allocation) -> Result<(), AppError> {
        if allocation.project_id.is_some_and(|id| !self.projects.contains_key(&id)) {
            return Err(AppError::not_found("Project"));
        }
        if allocation.resource_id.is_some_and(|id| !self.resources.contains_key(&id)) {
            return Err(AppError::not_found("Resource"));
        }
        check_days_within_present(
            allocation.present_day,
            allocation.billable_days,
            allocation.non_billable_days,
        )
        .map_err(|e| rule_violation("billable_days", e))?;
        if self.allocations.values().any(|a| a.same_key(allocation)) {
            return Err(AppError::conflict("Allocation for this resource"));
        }
        Ok(())
    }

    fn insert_allocation(&mut self, allocation: &Allocation) -> Result<(), AppError> {
        if self.allocations.contains_key(&allocation.id) {
            return Err(AppError::conflict("Allocation"));
        }
        self.check_allocation(allocation)?;
        self.allocations.insert(allocation.id, allocation.clone());
        Ok(())
    }

    fn update_allocation(&mut self, allocation: &Allocation) -> Result<(), AppError> {
        if !self.allocations.contains_key(&allocation.id) {
            return Err(AppError::not_found("Allocation"));
        }
        self.check_allocation(allocation)?;
        self.allocations.insert(allocation.id, allocation.clone());
        Ok(())
    }

    fn apply(&mut self, write: &ProjectWrite) -> Result<(), AppError> {
        if write.is_new {
            self.insert_project(&write.project)?;
        } else {
            self.update_project(&write.project)?;
        }
        for id in &write.removed_allocations {
            self.allocations.remove(id);
        }
        for allocation in &write.added_allocations {
            self.insert_allocation(allocation)?;
        }
        Ok(())
    }
}

/// Process-local store with the same constraints as the SQL schema.
///
/// Used by the test suite and by `STORAGE=memory` deployments; the data is
/// gone when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrackingStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    // --- Resources ---

    async fn insert_resource(&self, resource: &Resource) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if tables.resources.values().any(|r| r.same_key(resource)) {
            return Err(AppError::conflict("Resource for this period"));
        }
        tables.resources.insert(resource.id, resource.clone());
        Ok(())
    }

    async fn find_resource(&self, id: Uuid) -> Result<Option<Resource>, AppError> {
        Ok(self.tables.read().await.resources.get(&id).cloned())
    }

    async fn list_resources(&self) -> Result<Vec<Resource>, AppError> {
        let mut resources: Vec<Resource> = self.tables.read().await.resources.values().cloned().collect();
        resources.sort_by(|a, b| {
            a.resource_name
                .cmp(&b.resource_name)
                .then(a.year.cmp(&b.year))
                .then(a.month.cmp(&b.month))
        });
        Ok(resources)
    }

    async fn update_resource(&self, resource: &Resource) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if !tables.resources.contains_key(&resource.id) {
            return Err(AppError::not_found("Resource"));
        }
        if tables.resources.values().any(|r| r.same_key(resource)) {
            return Err(AppError::conflict("Resource for this period"));
        }
        tables.resources.insert(resource.id, resource.clone());
        Ok(())
    }

    async fn delete_resource(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.resources.remove(&id).is_none() {
            return Ok(false);
        }
        // ON DELETE SET NULL
        for allocation in tables.allocations.values_mut() {
            if allocation.resource_id == Some(id) {
                allocation.resource_id = None;
            }
        }
        Ok(true)
    }

    // --- Projects ---

    async fn insert_project(&self, project: &Project) -> Result<(), AppError> {
        self.tables.write().await.insert_project(project)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let mut projects: Vec<Project> = self.tables.read().await.projects.values().cloned().collect();
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(projects)
    }

    async fn update_project(&self, project: &Project) -> Result<(), AppError> {
        self.tables.write().await.update_project(project)
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.projects.remove(&id).is_none() {
            return Ok(false);
        }
        for allocation in tables.allocations.values_mut() {
            if allocation.project_id == Some(id) {
                allocation.project_id = None;
            }
        }
        Ok(true)
    }

    async fn save_project(&self, write: &ProjectWrite) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();
        staged.apply(write)?;
        *tables = staged;
        Ok(())
    }

    // --- Allocations ---

    async fn insert_allocation(&self, allocation: &Allocation) -> Result<(), AppError> {
        self.tables.write().await.insert_allocation(allocation)
    }

    async fn find_allocation(&self, id: Uuid) -> Result<Option<Allocation>, AppError> {
        Ok(self.tables.read().await.allocations.get(&id).cloned())
    }

    async fn find_allocation_for(
        &self,
        project_id: Uuid,
        resource_id: Uuid,
    ) -> Result<Option<Allocation>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .allocations
            .values()
            .find(|a| a.project_id == Some(project_id) && a.resource_id == Some(resource_id))
            .cloned())
    }

    async fn list_project_allocations(&self, project_id: Uuid) -> Result<Vec<Allocation>, AppError> {
        let mut allocations: Vec<Allocation> = self
            .tables
            .read()
            .await
            .allocations
            .values()
            .filter(|a| a.project_id == Some(project_id))
            .cloned()
            .collect();
        allocations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(allocations)
    }

    async fn list_allocations(&self) -> Result<Vec<Allocation>, AppError> {
        let mut allocations: Vec<Allocation> =
            self.tables.read().await.allocations.values().cloned().collect();
        allocations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(allocations)
    }

    async fn update_allocation(&self, allocation: &Allocation) -> Result<(), AppError> {
        self.tables.write().await.update_allocation(allocation)
    }

    async fn delete_allocation(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.allocations.remove(&id).is_some())
    }
}
