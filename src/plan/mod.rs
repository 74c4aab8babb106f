//! setup-time breadcrumb and future planning

pub mod planner;

pub use planner::{plan, Future};
