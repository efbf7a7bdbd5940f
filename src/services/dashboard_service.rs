// src/services/dashboard_service.rs

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{calendar::MONTH_CHOICES, clock::Clock, error::AppError},
    db::TrackingStore,
    models::{
        dashboard::{DashboardFilter, DashboardSummary, MonthChoice, PeriodOptions},
        project::UtilizationRule,
    },
};

/// Years offered by the period pickers.
pub const FIRST_PICKER_YEAR: i32 = 2020;
pub const LAST_PICKER_YEAR: i32 = 2030;

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn TrackingStore>,
    clock: Arc<dyn Clock>,
    utilization_rule: UtilizationRule,
}

impl DashboardService {
    pub fn new(
        store: Arc<dyn TrackingStore>,
        clock: Arc<dyn Clock>,
        utilization_rule: UtilizationRule,
    ) -> Self {
        Self { store, clock, utilization_rule }
    }

    pub async fn summary(&self, filter: &DashboardFilter) -> Result<DashboardSummary, AppError> {
        let resources: Vec<_> = self
            .store
            .list_resources()
            .await?
            .into_iter()
            .filter(|r| filter.year.is_none_or(|y| y == r.year))
            .filter(|r| filter.month.is_none_or(|m| m == r.month))
            .collect();

        let mut linked: HashMap<Uuid, usize> = HashMap::new();
        for allocation in self.store.list_allocations().await? {
            if let (Some(project_id), Some(_)) = (allocation.project_id, allocation.resource_id) {
                *linked.entry(project_id).or_default() += 1;
            }
        }

        let projects: Vec<_> = self
            .store
            .list_projects()
            .await?
            .into_iter()
            .filter(|p| p.is_active)
            .map(|p| {
                let count = linked.get(&p.id).copied().unwrap_or(0);
                p.metrics(count, self.utilization_rule)
            })
            .collect();

        let average_utilization = if projects.is_empty() {
            0.0
        } else {
            projects.iter().map(|m| m.utilization_percentage).sum::<f64>() / projects.len() as f64
        };

        Ok(DashboardSummary {
            resource_count: resources.len(),
            active_project_count: projects.len(),
            total_present_days: resources.iter().map(|r| r.present_day).sum(),
            total_present_hours: resources.iter().map(|r| r.present_hours).sum(),
            total_billable_hours: projects.iter().map(|m| m.billable_hours).sum(),
            total_non_billable_hours: projects.iter().map(|m| m.non_billable_hours).sum(),
            average_utilization,
            projects,
        })
    }

    pub fn period_options(&self) -> PeriodOptions {
        PeriodOptions {
            years: (FIRST_PICKER_YEAR..=LAST_PICKER_YEAR).collect(),
            months: MONTH_CHOICES
                .iter()
                .map(|(number, name)| MonthChoice { number: *number, name: name.to_string() })
                .collect(),
            current_year: self.clock.current_year(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::clock::FixedClock;
    use crate::db::MemoryStore;
    use crate::models::allocation::{Allocation, AllocationInput};
    use crate::models::project::{Project, ProjectInput};
    use crate::models::resource::{Resource, ResourceInput};
    use chrono::{NaiveDate, Utc};

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()))
    }

    async fn seed(store: &MemoryStore) {
        let today = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let now = Utc::now();
        let mut ids = Vec::new();
        for (name, month, days) in [("Alice", 2, 10.0), ("Bob", 2, 5.0), ("Alice", 3, 4.0)] {
            let input = ResourceInput {
                name: name.into(),
                year: Some(2025),
                month: Some(month),
                present_day: days,
                ..Default::default()
            };
            let r = Resource::new(Uuid::new_v4(), input, today, now);
            store.insert_resource(&r).await.unwrap();
            ids.push(r.id);
        }

        let website = Project::new(
            Uuid::new_v4(),
            &ProjectInput { name: "Website".into(), billable_days: 11.0, ..Default::default() },
            now,
        );
        store.insert_project(&website).await.unwrap();
        let a = Allocation::new(Uuid::new_v4(), website.id, &AllocationInput::empty(ids[0]), now);
        store.insert_allocation(&a).await.unwrap();

        // No resources linked: 0% under the default rule.
        let idle = Project::new(
            Uuid::new_v4(),
            &ProjectInput { name: "Idle".into(), non_billable_days: 2.0, ..Default::default() },
            now,
        );
        store.insert_project(&idle).await.unwrap();

        let mut closed = Project::new(
            Uuid::new_v4(),
            &ProjectInput { name: "Closed".into(), billable_days: 20.0, ..Default::default() },
            now,
        );
        closed.is_active = false;
        store.insert_project(&closed).await.unwrap();
    }

    #[tokio::test]
    async fn summary_totals_active_projects_only() {
        let store = Arc::new(MemoryStore::new());
        seed(&store).await;
        let svc = DashboardService::new(store, clock(), UtilizationRule::RequireResources);

        let summary = svc.summary(&DashboardFilter::default()).await.unwrap();
        assert_eq!(summary.resource_count, 3);
        assert_eq!(summary.active_project_count, 2);
        assert_eq!(summary.total_present_days, 19.0);
        assert_eq!(summary.total_present_hours, 152.0);
        assert_eq!(summary.total_billable_hours, 88.0);
        assert_eq!(summary.total_non_billable_hours, 16.0);
        assert_eq!(summary.average_utilization, 25.0);
    }

    #[tokio::test]
    async fn summary_filters_resources_by_period() {
        let store = Arc::new(MemoryStore::new());
        seed(&store).await;
        let svc = DashboardService::new(store, clock(), UtilizationRule::HoursOnly);

        let filter = DashboardFilter { year: Some(2025), month: Some(2) };
        let summary = svc.summary(&filter).await.unwrap();
        assert_eq!(summary.resource_count, 2);
        assert_eq!(summary.total_present_days, 15.0);

        let idle = summary.projects.iter().find(|m| m.project_name == "Idle").unwrap();
        assert_eq!(idle.resource_count, 0);
        assert!(idle.utilization_percentage > 0.0);
    }

    #[tokio::test]
    async fn empty_store_gives_zeroes() {
        let svc = DashboardService::new(
            Arc::new(MemoryStore::new()),
            clock(),
            UtilizationRule::RequireResources,
        );
        let summary = svc.summary(&DashboardFilter::default()).await.unwrap();
        assert_eq!(summary.resource_count, 0);
        assert_eq!(summary.average_utilization, 0.0);
        assert!(summary.projects.is_empty());
    }

    #[test]
    fn period_options_cover_pickers() {
        let svc = DashboardService::new(
            Arc::new(MemoryStore::new()),
            clock(),
            UtilizationRule::RequireResources,
        );
        let options = svc.period_options();
        assert_eq!(options.years.first(), Some(&2020));
        assert_eq!(options.years.last(), Some(&2030));
        assert_eq!(options.months.len(), 12);
        assert_eq!(options.months[1].name, "February");
        assert_eq!(options.current_year, 2025);
    }
}
