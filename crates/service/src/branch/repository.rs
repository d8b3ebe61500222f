use async_trait::async_trait;

use super::domain::Branch;
use crate::errors::ServiceError;

/// Persistence port for branch documents.
///
/// Implementations own identifier generation: `save` inserts a branch whose
/// `id` is `None` under a fresh id and fully replaces the stored document
/// otherwise. Each `save` is atomic for one document; nothing more.
#[async_trait]
pub trait BranchRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Branch>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<Branch>, ServiceError>;
    async fn save(&self, branch: Branch) -> Result<Branch, ServiceError>;
    async fn delete(&self, branch: &Branch) -> Result<(), ServiceError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};

    use uuid::Uuid;

    /// Keeps documents in insertion order. `find_all` returns them in that order.
    #[derive(Default)]
    pub struct MockBranchRepository {
        docs: Mutex<Vec<Branch>>,
        fail_writes: AtomicBool,
    }

    impl MockBranchRepository {
        /// Make every subsequent `save`/`delete` fail with a repository error.
        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Number of stored documents.
        pub fn len(&self) -> usize {
            self.docs().map(|d| d.len()).unwrap_or_default()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn docs(&self) -> Result<MutexGuard<'_, Vec<Branch>>, ServiceError> {
            self.docs.lock().map_err(|_| ServiceError::repository("mock store lock poisoned"))
        }

        fn check_writable(&self) -> Result<(), ServiceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ServiceError::repository("simulated write failure"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl BranchRepository for MockBranchRepository {
        async fn find_by_id(&self, id: &str) -> Result<Option<Branch>, ServiceError> {
            let docs = self.docs()?;
            Ok(docs.iter().find(|b| b.id.as_deref() == Some(id)).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Branch>, ServiceError> {
            Ok(self.docs()?.clone())
        }

        async fn save(&self, mut branch: Branch) -> Result<Branch, ServiceError> {
            self.check_writable()?;
            let mut docs = self.docs()?;
            match branch.id.as_deref() {
                Some(id) => match docs.iter_mut().find(|b| b.id.as_deref() == Some(id)) {
                    Some(slot) => *slot = branch.clone(),
                    None => docs.push(branch.clone()),
                },
                None => {
                    branch.id = Some(Uuid::new_v4().to_string());
                    docs.push(branch.clone());
                }
            }
            Ok(branch)
        }

        async fn delete(&self, branch: &Branch) -> Result<(), ServiceError> {
            self.check_writable()?;
            let mut docs = self.docs()?;
            docs.retain(|b| b.id != branch.id);
            Ok(())
        }
    }
}
