// src/services/project_service.rs

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{clock::Clock, error::AppError, validation::rule_violation},
    db::{ProjectWrite, TrackingStore},
    models::{
        allocation::{Allocation, AllocationInput, ResourceUtilization},
        project::{Project, ProjectDetail, ProjectFilter, ProjectInput, UtilizationRule},
    },
};

/// What `DELETE /projects/{id}` does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectDeleteMode {
    /// Flip `is_active` off; the row and its allocations stay.
    #[default]
    Soft,
    /// Remove the row; allocations keep existing with `project_id = NULL`.
    Hard,
}

impl FromStr for ProjectDeleteMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soft" => Ok(Self::Soft),
            "hard" => Ok(Self::Hard),
            other => anyhow::bail!("unknown project delete mode '{other}'"),
        }
    }
}

#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn TrackingStore>,
    clock: Arc<dyn Clock>,
    delete_mode: ProjectDeleteMode,
    utilization_rule: UtilizationRule,
}

impl ProjectService {
    pub fn new(
        store: Arc<dyn TrackingStore>,
        clock: Arc<dyn Clock>,
        delete_mode: ProjectDeleteMode,
        utilization_rule: UtilizationRule,
    ) -> Self {
        Self { store, clock, delete_mode, utilization_rule }
    }

    fn check_project_input(input: &ProjectInput) -> Result<(), AppError> {
        input.validate()?;
        input
            .validate_consistency()
            .map_err(|(field, e)| rule_violation(field, e))
    }

    fn check_allocation_input(input: &AllocationInput) -> Result<(), AppError> {
        input.validate()?;
        input
            .validate_consistency()
            .map_err(|(field, e)| rule_violation(field, e))
    }

    async fn ensure_resources_exist(&self, ids: &[Uuid]) -> Result<(), AppError> {
        for id in ids {
            if self.store.find_resource(*id).await?.is_none() {
                return Err(AppError::not_found(format!("Resource {id}")));
            }
        }
        Ok(())
    }

    // --- Projects ---

    pub async fn create(&self, input: ProjectInput) -> Result<ProjectDetail, AppError> {
        Self::check_project_input(&input)?;
        if let Some(ids) = &input.resource_ids {
            self.ensure_resources_exist(ids).await?;
        }

        let project = Project::new(Uuid::new_v4(), &input, self.clock.now());
        let mut write = ProjectWrite::new(project.clone(), true);
        if let Some(ids) = &input.resource_ids {
            self.plan_resources(&mut write, ids).await?;
        }
        self.store.save_project(&write).await?;

        tracing::info!(
            project_id = %project.id,
            name = %project.project_name,
            "project created"
        );
        self.detail(project).await
    }

    pub async fn update(&self, id: Uuid, input: ProjectInput) -> Result<ProjectDetail, AppError> {
        Self::check_project_input(&input)?;

        let mut project = self.find(id).await?;
        if let Some(ids) = &input.resource_ids {
            self.ensure_resources_exist(ids).await?;
        }

        project.apply(&input, self.clock.now());
        let mut write = ProjectWrite::new(project.clone(), false);
        if let Some(ids) = &input.resource_ids {
            self.plan_resources(&mut write, ids).await?;
        }
        self.store.save_project(&write).await?;

        tracing::info!(project_id = %id, "project updated");
        self.detail(project).await
    }

    pub async fn get(&self, id: Uuid) -> Result<ProjectDetail, AppError> {
        let project = self.find(id).await?;
        self.detail(project).await
    }

    /// Newest first, with metrics. Inactive projects only when asked for.
    pub async fn list(&self, filter: &ProjectFilter) -> Result<Vec<ProjectDetail>, AppError> {
        let projects = self.store.list_projects().await?;
        let mut by_project: HashMap<Uuid, Vec<Allocation>> = HashMap::new();
        for allocation in self.store.list_allocations().await? {
            if let Some(project_id) = allocation.project_id {
                by_project.entry(project_id).or_default().push(allocation);
            }
        }

        Ok(projects
            .into_iter()
            .filter(|p| filter.matches(p))
            .map(|project| {
                let allocations = by_project.remove(&project.id).unwrap_or_default();
                self.assemble(project, allocations)
            })
            .collect())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        match self.delete_mode {
            ProjectDeleteMode::Soft => {
                let mut project = self.find(id).await?;
                project.is_active = false;
                project.updated_at = self.clock.now();
                self.store.update_project(&project).await?;
                tracing::info!(project_id = %id, "project deactivated");
            }
            ProjectDeleteMode::Hard => {
                if !self.store.delete_project(id).await? {
                    return Err(AppError::not_found("Project"));
                }
                tracing::info!(project_id = %id, "project deleted");
            }
        }
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Project, AppError> {
        self.store
            .find_project(id)
            .await?
            .ok_or_else(|| AppError::not_found("Project"))
    }

    async fn detail(&self, project: Project) -> Result<ProjectDetail, AppError> {
        let allocations = self.store.list_project_allocations(project.id).await?;
        Ok(self.assemble(project, allocations))
    }

    fn assemble(&self, project: Project, allocations: Vec<Allocation>) -> ProjectDetail {
        let resource_count = allocations.iter().filter(|a| a.resource_id.is_some()).count();
        ProjectDetail {
            metrics: project.metrics(resource_count, self.utilization_rule),
            project,
            allocations,
        }
    }

    /// Adds to `write` the allocation changes that make the project's
    /// allocations match `resource_ids`: new resources get an empty
    /// allocation, dropped ones lose theirs.
    async fn plan_resources(&self, write: &mut ProjectWrite, resource_ids: &[Uuid]) -> Result<(), AppError> {
        let wanted: HashSet<Uuid> = resource_ids.iter().copied().collect();
        let existing = if write.is_new {
            Vec::new()
        } else {
            self.store.list_project_allocations(write.project.id).await?
        };

        let mut linked = HashSet::new();
        for allocation in existing {
            match allocation.resource_id {
                Some(resource_id) if wanted.contains(&resource_id) => {
                    linked.insert(resource_id);
                }
                Some(_) => write.removed_allocations.push(allocation.id),
                None => {}
            }
        }

        let now = self.clock.now();
        for resource_id in wanted.difference(&linked) {
            write.added_allocations.push(Allocation::new(
                Uuid::new_v4(),
                write.project.id,
                &AllocationInput::empty(*resource_id),
                now,
            ));
        }
        Ok(())
    }

    // --- Allocations ---

    pub async fn add_allocation(
        &self,
        project_id: Uuid,
        input: AllocationInput,
    ) -> Result<Allocation, AppError> {
        Self::check_allocation_input(&input)?;
        self.find(project_id).await?;
        self.ensure_resources_exist(&[input.resource_id]).await?;

        let allocation = Allocation::new(Uuid::new_v4(), project_id, &input, self.clock.now());
        self.store.insert_allocation(&allocation).await?;

        tracing::info!(
            allocation_id = %allocation.id,
            project_id = %project_id,
            resource_id = %input.resource_id,
            "allocation added"
        );
        Ok(allocation)
    }

    pub async fn update_allocation(
        &self,
        id: Uuid,
        input: AllocationInput,
    ) -> Result<Allocation, AppError> {
        Self::check_allocation_input(&input)?;

        let mut allocation = self
            .store
            .find_allocation(id)
            .await?
            .ok_or_else(|| AppError::not_found("Allocation"))?;
        self.ensure_resources_exist(&[input.resource_id]).await?;

        allocation.apply(&input, self.clock.now());
        self.store.update_allocation(&allocation).await?;

        tracing::info!(allocation_id = %id, "allocation updated");
        Ok(allocation)
    }

    pub async fn remove_allocation(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_allocation(id).await? {
            return Err(AppError::not_found("Allocation"));
        }
        tracing::info!(allocation_id = %id, "allocation removed");
        Ok(())
    }

    pub async fn list_allocations(&self, project_id: Uuid) -> Result<Vec<Allocation>, AppError> {
        self.find(project_id).await?;
        self.store.list_project_allocations(project_id).await
    }

    /// `None` when the resource has no allocation on the project.
    pub async fn resource_utilization(
        &self,
        project_id: Uuid,
        resource_id: Uuid,
    ) -> Result<Option<ResourceUtilization>, AppError> {
        let allocation = self.store.find_allocation_for(project_id, resource_id).await?;
        Ok(allocation.map(|a| a.utilization()))
    }
}
