//! Truck Planning Tool (TPT) sync triggers.
//!
//! These endpoints push NILS master data into the external truck-planning
//! system. Each trigger answers with a bare acknowledgement; the bulk
//! variants accept an optional epoch-millisecond [`DateRange`] limiting the
//! window of records to sync.
//!
//! The paths really are spelled `syn-*` on the server.

use crate::client::NilsClient;
use crate::error::Result;
use crate::types::DateRange;
use reqwest::Method;

impl NilsClient {
    /// Sync all jobs, optionally limited to a date range.
    pub fn tpt_sync_all_jobs(&self, range: DateRange) -> Result<bool> {
        self.trigger(Method::POST, "/moonshot/as/tpt/syn-all-job", &range.query())
    }

    /// Sync one job.
    pub fn tpt_sync_job(&self, job_no: &str) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tpt/syn-job",
            &[("jobNo", job_no.to_string())],
        )
    }

    /// Sync all vendors, optionally limited to a date range.
    pub fn tpt_sync_all_vendors(&self, range: DateRange) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tpt/syn-all-vendor",
            &range.query(),
        )
    }

    /// Sync one vendor.
    pub fn tpt_sync_vendor(&self, vendor_id: &str) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tpt/syn-vendor",
            &[("vendorId", vendor_id.to_string())],
        )
    }

    /// Sync all rates, optionally limited to a date range.
    pub fn tpt_sync_all_rates(&self, range: DateRange) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tpt/syn-all-rate",
            &range.query(),
        )
    }

    /// Sync one rate.
    pub fn tpt_sync_rate(&self, rate_id: &str) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tpt/syn-rate",
            &[("rateId", rate_id.to_string())],
        )
    }

    /// Sync all currencies, optionally limited to a date range.
    pub fn tpt_sync_all_currencies(&self, range: DateRange) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tpt/syn-all-currency",
            &range.query(),
        )
    }

    /// Sync one currency.
    pub fn tpt_sync_currency(&self, currency_code: &str) -> Result<bool> {
        self.trigger(
            Method::POST,
            "/moonshot/as/tpt/syn-currency",
            &[("currencyCode", currency_code.to_string())],
        )
    }
}
