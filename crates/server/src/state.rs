use std::sync::Arc;

use mockable::Clock;
use service::branch::{BranchRepository, BranchService};

/// Branch service behind a type-erased repository so the router does not
/// depend on which backend was configured.
pub type DynBranchService = BranchService<dyn BranchRepository>;

#[derive(Clone)]
pub struct ServerState {
    pub branches: Arc<DynBranchService>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn BranchRepository>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { branches: Arc::new(BranchService::new(repo, clock)) }
    }
}
