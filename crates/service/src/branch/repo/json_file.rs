use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use uuid::Uuid;

use crate::branch::domain::Branch;
use crate::branch::repository::BranchRepository;
use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

/// Branch documents kept in a single JSON file, keyed by a UUID v4 string.
#[derive(Clone)]
pub struct JsonFileBranchRepository {
    store: Arc<JsonMapStore<Branch>>,
}

impl JsonFileBranchRepository {
    /// Open (or create) the document file at `path`.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let store = JsonMapStore::<Branch>::open(path).await?;
        Ok(Self { store })
    }
}

#[async_trait]
impl BranchRepository for JsonFileBranchRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Branch>, ServiceError> {
        Ok(self.store.get(id).await)
    }

    async fn find_all(&self) -> Result<Vec<Branch>, ServiceError> {
        Ok(self.store.list().await)
    }

    async fn save(&self, mut branch: Branch) -> Result<Branch, ServiceError> {
        let id = match &branch.id {
            Some(id) => id.clone(),
            None => {
                let id = Uuid::new_v4().to_string();
                branch.id = Some(id.clone());
                id
            }
        };
        self.store.upsert(id, branch.clone()).await?;
        Ok(branch)
    }

    async fn delete(&self, branch: &Branch) -> Result<(), ServiceError> {
        if let Some(id) = &branch.id {
            self.store.remove(id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::domain::{BranchState, Holiday};
    use chrono::{NaiveDate, Utc};

    fn new_branch(name: &str) -> Branch {
        let now = Utc::now().fixed_offset();
        Branch {
            id: None,
            email_address: "sucursal@banco.ec".into(),
            name: name.into(),
            phone_number: "022000000".into(),
            state: BranchState::Active,
            creation_date: now,
            last_modified_date: now,
            branch_holidays: vec![Holiday {
                date: NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(),
                name: "Christmas".into(),
            }],
        }
    }

    #[tokio::test]
    async fn save_assigns_id_and_survives_reopen() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("branches_{}.json", Uuid::new_v4()));
        let repo = JsonFileBranchRepository::open(&tmp).await?;

        let saved = repo.save(new_branch("Norte")).await?;
        let id = saved.id.clone().expect("id assigned");
        assert!(!id.is_empty());

        let mut changed = saved.clone();
        changed.phone_number = "099999999".into();
        repo.save(changed).await?;

        let reopened = JsonFileBranchRepository::open(&tmp).await?;
        let found = reopened.find_by_id(&id).await?.expect("persisted");
        assert_eq!(found.phone_number, "099999999");
        assert_eq!(found.branch_holidays, saved.branch_holidays);
        assert_eq!(reopened.find_all().await?.len(), 1);

        reopened.delete(&found).await?;
        assert!(reopened.find_by_id(&id).await?.is_none());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
