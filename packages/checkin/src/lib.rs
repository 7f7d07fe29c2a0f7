#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Station selection and check-in submission.
//!
//! The flow runs leaf-first: a [`selector::StationSelector`] resolves
//! search text or a position fix into one station, the
//! [`form::CheckinFormController`] turns the selection and the user's
//! input into a tagged report and posts it, and a [`toast::Toaster`]
//! tells the user how it went.

pub mod form;
pub mod geolocation;
pub mod reporter;
pub mod selector;
pub mod stalls;
pub mod toast;

pub use form::{CarryOverPolicy, CheckinFormController, CheckinRecord, FormConfig, FormError};
pub use selector::{SelectorError, StationSelector};
pub use stalls::{StallLabeling, StallsSelector};
pub use toast::{ToastPositionResolver, ToastSink, Toaster};
