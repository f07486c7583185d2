//! NILS back-office API client library.
//!
//! Provides authenticated access to a NILS logistics installation: cost
//! lines, reference data (locations, geographic codes, commodities,
//! activities, code tables), vendor assignment and the Truck Planning /
//! Tank Allocation sync triggers.
//!
//! # Authentication
//!
//! The client logs in with email + SHA-1-hashed password, keeps the
//! returned session cookie in memory and replays it on every call. A
//! 401/403 from any endpoint drops the session; the next call logs in
//! again transparently.
//!
//! ```no_run
//! use nils_api::{NilsClient, NilsOptions, Password};
//!
//! let options = NilsOptions::new(
//!     "https://nils-tst.example.com",
//!     "sa_tpt@example.com",
//!     Password::Raw("secret".into()),
//! );
//! let client = NilsClient::new(options).unwrap();
//! let user = client.login(false).unwrap();
//! println!("welcome {}", user.full_name.unwrap_or(user.email));
//! ```
//!
//! # Endpoint mapping
//!
//! | Method                                      | Endpoint                                            |
//! |---------------------------------------------|-----------------------------------------------------|
//! | [`NilsClient::login`]                       | `POST /moonshot/as/auth/login`                      |
//! | [`NilsClient::cost_lines`]                  | `POST /moonshot/as/operationcostline/list-cost-line`|
//! | [`NilsClient::update_trucking_vendor_for_job`] | `PUT /moonshot/as/op-job/update-trucking-vendor-for-job-route` |
//! | [`NilsClient::list_locations`]              | `POST /moonshot/as/locations/list-locations`        |
//! | [`NilsClient::list_g1_codes`] … `list_g4_codes` | `POST /moonshot/as/g{1..4}-codes/list-g{1..4}-codes` |
//! | [`NilsClient::list_commodities`]            | `POST /moonshot/as/commodities/list-commodities`    |
//! | [`NilsClient::list_activities`]             | `POST /moonshot/as/activities/list-activities`      |
//! | [`NilsClient::list_all_types`]              | `POST /moonshot/as/type/list-all-types`             |
//! | [`NilsClient::type_by_name`]                | `GET /moonshot/as/type/list-types`                  |
//! | `NilsClient::tpt_sync_*`                    | `POST /moonshot/as/tpt/syn-*`                       |
//! | [`NilsClient::tat_allocate_tank_to_job`]    | `PUT /moonshot/as/tat/alloc-tank-to-job`            |
//! | `NilsClient::tat_sync_*`                    | `POST /moonshot/as/tat/syn-*`                       |
//!
//! # Error handling
//!
//! 401/403/500 bodies are normalized into [`ErrorBody`] regardless of how
//! inconsistently the server encodes them; see [`error`]. An optional
//! [`ErrorSink`] observes every produced error without affecting control
//! flow.

pub mod auth;
pub mod client;
mod cost_line;
pub mod error;
mod job;
mod lookup;
mod tat;
mod tpt;
pub mod types;

pub use auth::{hash_password, Password};
pub use client::{NilsClient, NilsOptions};
pub use cost_line::CostLineQuery;
pub use error::{ErrorBody, ErrorSink, NilsError, Result};
pub use job::VendorAssignment;
