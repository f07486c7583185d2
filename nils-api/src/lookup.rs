//! Reference-data listings: locations, geographic codes, commodities,
//! activities and code tables (types).
//!
//! All list endpoints speak the same protocol: a `{start, length}` form
//! POST answered with a DataTables envelope ([`Page`]). The lookup by type
//! name is the one GET in the API.

use crate::client::NilsClient;
use crate::error::Result;
use crate::types::{Activity, Commodity, G1Code, G2Code, G3Code, G4Code, Location, Page, TypeGroup};
use serde::de::DeserializeOwned;

impl NilsClient {
    fn list_page<T: DeserializeOwned>(
        &self,
        path: &str,
        start: u32,
        length: u32,
    ) -> Result<Option<Page<T>>> {
        self.ensure_login()?;
        let req = self
            .http
            .post(self.url(path))
            .form(&[("start", start.to_string()), ("length", length.to_string())]);
        match self.send(req)? {
            Some(body) => Ok(Some(self.parse(body)?)),
            None => Ok(None),
        }
    }

    /// List locations.
    pub fn list_locations(&self, start: u32, length: u32) -> Result<Option<Page<Location>>> {
        self.list_page("/moonshot/as/locations/list-locations", start, length)
    }

    /// List G1 (top-level geographic) codes.
    pub fn list_g1_codes(&self, start: u32, length: u32) -> Result<Option<Page<G1Code>>> {
        self.list_page("/moonshot/as/g1-codes/list-g1-codes", start, length)
    }

    /// List G2 codes.
    pub fn list_g2_codes(&self, start: u32, length: u32) -> Result<Option<Page<G2Code>>> {
        self.list_page("/moonshot/as/g2-codes/list-g2-codes", start, length)
    }

    /// List G3 codes.
    pub fn list_g3_codes(&self, start: u32, length: u32) -> Result<Option<Page<G3Code>>> {
        self.list_page("/moonshot/as/g3-codes/list-g3-codes", start, length)
    }

    /// List G4 (leaf geographic) codes.
    pub fn list_g4_codes(&self, start: u32, length: u32) -> Result<Option<Page<G4Code>>> {
        self.list_page("/moonshot/as/g4-codes/list-g4-codes", start, length)
    }

    /// List commodity codes.
    pub fn list_commodities(&self, start: u32, length: u32) -> Result<Option<Page<Commodity>>> {
        self.list_page("/moonshot/as/commodities/list-commodities", start, length)
    }

    /// List activity codes.
    pub fn list_activities(&self, start: u32, length: u32) -> Result<Option<Page<Activity>>> {
        self.list_page("/moonshot/as/activities/list-activities", start, length)
    }

    /// List all code tables with their values.
    pub fn list_all_types(&self, start: u32, length: u32) -> Result<Option<Page<TypeGroup>>> {
        self.list_page("/moonshot/as/type/list-all-types", start, length)
    }

    /// Look up one code table by name.
    pub fn type_by_name(&self, type_name: &str) -> Result<Option<TypeGroup>> {
        self.ensure_login()?;
        let req = self
            .http
            .get(self.url("/moonshot/as/type/list-types"))
            .query(&[("typeName", type_name)]);
        match self.send(req)? {
            Some(body) => Ok(Some(self.parse(body)?)),
            None => Ok(None),
        }
    }
}
