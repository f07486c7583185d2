//! Job mutation: trucking-vendor assignment.
//!
//! Endpoint: `PUT /moonshot/as/op-job/update-trucking-vendor-for-job-route`
//! with a JSON body; the server acknowledges with an empty/boolean body.

use crate::client::NilsClient;
use crate::error::Result;
use serde::Serialize;

/// Vendor assignment for one job-route activity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorAssignment {
    pub job_route_activity_no: String,
    pub job_activity_service_no: i64,
    pub vendor_code: String,
    /// Mark the assignment as planned.
    pub planned: bool,
    /// Mark the assignment as confirmed with the vendor.
    pub confirmed: bool,
    /// Acting user, recorded in the NILS change log.
    pub user_id: String,
}

impl NilsClient {
    /// Assign a trucking vendor to a job route.
    pub fn update_trucking_vendor_for_job(&self, assignment: &VendorAssignment) -> Result<bool> {
        self.ensure_login()?;
        let req = self
            .http
            .put(self.url("/moonshot/as/op-job/update-trucking-vendor-for-job-route"))
            .json(assignment);
        self.send(req)?;
        Ok(true)
    }
}
