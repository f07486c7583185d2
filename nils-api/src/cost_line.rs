//! Cost-line listing.
//!
//! Endpoint: `POST /moonshot/as/operationcostline/list-cost-line`
//!
//! The request is a URL-encoded form in the DataTables style, with the
//! actual filter JSON-stringified into `search[value]`:
//!
//! ```text
//! start=0&length=1500&responseFieldsRequired=true
//! &search[value]={"JCL_job_no":123,"JCL_consignment_no":null,
//!                 "JCL_service":"(\"RAIL\",\"BRGE\")",...}
//! ```
//!
//! List-valued filter fields use the server's quoted-tuple syntax
//! `("A","B")` rather than JSON arrays.

use crate::client::NilsClient;
use crate::error::Result;
use crate::types::CostLine;
use serde_json::{json, Map, Value};

const DEFAULT_SERVICES: [&str; 4] = ["RAIL", "BRGE", "SHNT", "TRCK"];

/// Filter for [`NilsClient::cost_lines`].
#[derive(Debug, Clone)]
pub struct CostLineQuery {
    /// Job number (`JCL_job_no`), required.
    pub job_no: i64,
    /// Consignment number; sent as JSON `null` when absent.
    pub consignment_no: Option<i64>,
    /// Service codes; an empty list omits the filter.
    pub service: Vec<String>,
    /// Cost codes; an empty list omits the filter.
    pub cost_code: Vec<String>,
    /// Page offset.
    pub start: u32,
    /// Page size.
    pub length: u32,
}

impl CostLineQuery {
    /// Query for one job with the standard trucking-related service and
    /// cost codes (RAIL, BRGE, SHNT, TRCK) and a 1500-row page.
    pub fn new(job_no: i64) -> Self {
        let codes: Vec<String> = DEFAULT_SERVICES.iter().map(ToString::to_string).collect();
        Self {
            job_no,
            consignment_no: None,
            service: codes.clone(),
            cost_code: codes,
            start: 0,
            length: 1500,
        }
    }
}

/// `("A","B")` — the tuple syntax NILS search filters use for lists.
fn quoted_list(items: &[String]) -> String {
    format!("(\"{}\")", items.join("\",\""))
}

pub(crate) fn search_filter(query: &CostLineQuery) -> Value {
    let mut search = Map::new();
    search.insert("JCL_job_no".into(), json!(query.job_no));
    search.insert("JCL_consignment_no".into(), json!(query.consignment_no));
    if !query.service.is_empty() {
        search.insert("JCL_service".into(), json!(quoted_list(&query.service)));
    }
    if !query.cost_code.is_empty() {
        search.insert("JCL_cost_code".into(), json!(quoted_list(&query.cost_code)));
    }
    Value::Object(search)
}

impl NilsClient {
    /// List the cost lines of a job.
    ///
    /// Returns `None` when the response has no `data` array.
    pub fn cost_lines(&self, query: &CostLineQuery) -> Result<Option<Vec<CostLine>>> {
        self.ensure_login()?;
        let form = [
            ("start", query.start.to_string()),
            ("length", query.length.to_string()),
            ("responseFieldsRequired", "true".to_string()),
            ("search[value]", search_filter(query).to_string()),
        ];
        let req = self
            .http
            .post(self.url("/moonshot/as/operationcostline/list-cost-line"))
            .form(&form);

        match self.send(req)? {
            Some(body) => match body.get("data") {
                Some(Value::Array(_)) => Ok(Some(self.parse(body["data"].clone())?)),
                _ => Ok(None),
            },
            None => Ok(None),
        }
    }
}
