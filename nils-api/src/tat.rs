//! Tank Allocation Tool (TAT) triggers.
//!
//! The allocation endpoint binds a tank (unit) to a job in one of six
//! [`AllocationMode`]s; the `syn-*` endpoints push job overviews,
//! equipment, labels, service requirements and logistic rules to the
//! external tank-allocation system. All answer with bare acknowledgements.

use crate::client::NilsClient;
use crate::error::Result;
use crate::types::{AllocationMode, DateRange};
use reqwest::Method;

impl NilsClient {
    /// Allocate, reserve or release a tank for a job.
    pub fn tat_allocate_tank_to_job(
        &self,
        job_no: &str,
        unit_number: &str,
        mode: AllocationMode,
        user_id: &str,
    ) -> Result<bool> {
        self.trigger(
            Method::PUT,
            "/moonshot/as/tat/alloc-tank-to-job",
            &[
                ("jobId", job_no.to_string()),
                ("unitNumber", unit_number.to_string()),
                ("mode", mode.as_str().to_string()),
                ("userId", user_id.to_string()),
            ],
        )
    }

    /// Sync all job overviews, optionally limited to a date range.
    pub fn tat_sync_all_job_overviews(&self, range: DateRange) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tat/syn-all-job-overview",
            &range.query(),
        )
    }

    /// Sync one job overview.
    pub fn tat_sync_job_overview(&self, job_no: &str) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tat/syn-job-overview",
            &[("jobNo", job_no.to_string())],
        )
    }

    /// Sync all equipment, optionally limited to a date range.
    pub fn tat_sync_all_equipment(&self, range: DateRange) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tat/syn-all-equipment",
            &range.query(),
        )
    }

    /// Sync one tank.
    pub fn tat_sync_equipment(&self, tank_id: &str) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tat/syn-equipment",
            &[("tankId", tank_id.to_string())],
        )
    }

    /// Sync all labels, optionally limited to a date range.
    pub fn tat_sync_all_labels(&self, range: DateRange) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tat/syn-all-label",
            &range.query(),
        )
    }

    /// Sync one label.
    pub fn tat_sync_label(&self, label_id: &str) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tat/syn-label",
            &[("labelId", label_id.to_string())],
        )
    }

    /// Sync all job service requirements, optionally limited to a date range.
    pub fn tat_sync_all_job_service_requirements(&self, range: DateRange) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tat/syn-all-job-services-requirement",
            &range.query(),
        )
    }

    /// Sync one job service requirement.
    pub fn tat_sync_job_service_requirement(&self, requirement_no: &str) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tat/syn-job-services-requirement",
            &[("jobServiceRequirementNo", requirement_no.to_string())],
        )
    }

    /// Sync all logistic rules, optionally limited to a date range.
    pub fn tat_sync_all_logistic_rules(&self, range: DateRange) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tat/syn-all-logistic-rules",
            &range.query(),
        )
    }

    /// Sync one logistic rule.
    pub fn tat_sync_logistic_rule(&self, rule_id: &str) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tat/syn-logistic-rules",
            &[("logisticRuleId", rule_id.to_string())],
        )
    }
}
