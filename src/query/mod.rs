pub mod filters;
pub mod service;

pub use filters::{ObservationFilter, Predicate, StatsFilter};
pub use service::{Page, PageRequest, QueryService};
