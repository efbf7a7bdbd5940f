// src/services/resource_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::{
        calendar,
        clock::Clock,
        error::AppError,
        validation::rule_violation,
    },
    db::TrackingStore,
    models::{
        dashboard::WorkingDaysHint,
        resource::{Resource, ResourceFilter, ResourceInput},
    },
};

#[derive(Clone)]
pub struct ResourceService {
    store: Arc<dyn TrackingStore>,
    clock: Arc<dyn Clock>,
}

impl ResourceService {
    pub fn new(store: Arc<dyn TrackingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn create(&self, input: ResourceInput) -> Result<Resource, AppError> {
        input.validate()?;

        let resource = Resource::new(Uuid::new_v4(), input, self.clock.today(), self.clock.now());
        self.store.insert_resource(&resource).await?;

        tracing::info!(
            resource_id = %resource.id,
            name = %resource.resource_name,
            year = resource.year,
            month = resource.month,
            "resource created"
        );
        Ok(resource)
    }

    pub async fn update(&self, id: Uuid, input: ResourceInput) -> Result<Resource, AppError> {
        input.validate()?;

        let mut resource = self.get(id).await?;
        resource.apply(input, self.clock.now());
        self.store.update_resource(&resource).await?;

        tracing::info!(resource_id = %id, "resource updated");
        Ok(resource)
    }

    pub async fn get(&self, id: Uuid) -> Result<Resource, AppError> {
        self.store
            .find_resource(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource"))
    }

    pub async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, AppError> {
        let resources = self.store.list_resources().await?;
        Ok(resources.into_iter().filter(|r| filter.matches(r)).collect())
    }

    /// Hard delete. Allocations of the resource stay, with the reference cleared.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_resource(id).await? {
            return Err(AppError::not_found("Resource"));
        }
        tracing::info!(resource_id = %id, "resource deleted");
        Ok(())
    }

    /// What the working-days field falls back to when left blank.
    /// Missing parts default to the current month.
    pub fn working_days_hint(
        &self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<WorkingDaysHint, AppError> {
        let year = year.unwrap_or_else(|| self.clock.current_year());
        let month = month.unwrap_or_else(|| self.clock.current_month());

        if calendar::month_name(month).is_none() {
            let mut err = ValidationError::new("range");
            err.message = Some("The month must be between 1 and 12.".into());
            return Err(rule_violation("month", err));
        }

        Ok(WorkingDaysHint {
            year,
            month,
            working_days: calendar::working_days(year, month),
            display: calendar::describe_working_days(year, month),
        })
    }
}
