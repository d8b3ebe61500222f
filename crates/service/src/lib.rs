//! Service layer for branch records and their holiday calendars.
//! - `branch`: aggregate, persistence port and business rules.
//! - `storage`: file-backed document collection used by the default backend.
//! - `errors`: the error taxonomy surfaced to the HTTP layer.

pub mod errors;
pub mod branch;
pub mod storage;
#[cfg(test)]
pub mod test_support;
