//! Static reference tables used by the classifier.
//!
//! Each table is an immutable map built once on first use. Lookups never
//! fail; a miss is reported as `None` (or a formatted fallback label) and the
//! classifier decides what to do with it.

pub mod company;
pub mod oui;
pub mod service;

pub use company::{company_name, lookup_company};
pub use oui::lookup_oui;
pub use service::{UNKNOWN_SERVICE, service_name};
