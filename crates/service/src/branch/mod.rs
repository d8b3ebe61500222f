//! Branch aggregate: domain types, persistence port, and the service that
//! owns every business rule about branches and their holiday calendars.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{Branch, BranchRequest, BranchState, BranchView, Holiday, HolidayDto};
pub use repository::BranchRepository;
pub use service::BranchService;
