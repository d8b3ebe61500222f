use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate};
use mockable::Clock;
use tracing::{debug, info, instrument};

use super::domain::{Branch, BranchRequest, BranchState, BranchView, Holiday, HolidayDto};
use super::repository::BranchRepository;
use crate::errors::ServiceError;

/// Application service owning the branch and holiday rules.
///
/// Every mutation is load → change → save of one whole document. There is
/// no version check between the load and the save, so two concurrent
/// mutations of the same branch race and the last save wins.
pub struct BranchService<R: BranchRepository + ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl<R: BranchRepository + ?Sized> BranchService<R> {
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use mockable::DefaultClock;
    /// use service::branch::{BranchRequest, BranchService, repository::mock::MockBranchRepository};
    ///
    /// let svc = BranchService::new(Arc::new(MockBranchRepository::default()), Arc::new(DefaultClock));
    /// let req = BranchRequest {
    ///     email_address: "matriz@banco.ec".into(),
    ///     name: "Matriz".into(),
    ///     phone_number: "022000000".into(),
    ///     state: Some(" active ".into()),
    ///     branch_holidays: None,
    /// };
    /// let created = tokio_test::block_on(svc.create_branch(req)).unwrap();
    /// assert_eq!(created.state, "ACTIVE");
    /// assert_eq!(created.creation_date, created.last_modified_date);
    /// ```
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock + Send + Sync>) -> Self { Self { repo, clock } }

    fn now(&self) -> DateTime<FixedOffset> {
        self.clock.utc().fixed_offset()
    }

    async fn find_branch(&self, id: &str) -> Result<Branch, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Branch not found"))
    }

    async fn persist(&self, branch: Branch) -> Result<BranchView, ServiceError> {
        let saved = self.repo.save(branch).await?;
        Ok(BranchView::from(&saved))
    }

    #[instrument(skip(self, req), fields(name = %req.name))]
    pub async fn create_branch(&self, req: BranchRequest) -> Result<BranchView, ServiceError> {
        let state = BranchState::parse(req.state.as_deref())?;
        let now = self.now();
        let mut branch = Branch {
            id: None,
            email_address: req.email_address,
            name: req.name,
            phone_number: req.phone_number,
            state,
            creation_date: now,
            last_modified_date: now,
            branch_holidays: Vec::new(),
        };
        if let Some(holidays) = req.branch_holidays {
            branch.replace_holidays(holidays.into_iter().map(Holiday::from).collect())?;
        }
        let view = self.persist(branch).await?;
        info!(branch_id = %view.id, state = %view.state, holidays = view.branch_holidays.len(), "branch_created");
        Ok(view)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<BranchView, ServiceError> {
        Ok(BranchView::from(&self.find_branch(id).await?))
    }

    pub async fn get_all(&self) -> Result<Vec<BranchView>, ServiceError> {
        let all = self.repo.find_all().await?;
        debug!(count = all.len(), "branches listed");
        Ok(all.iter().map(BranchView::from).collect())
    }

    /// Replace contact fields and state; the holiday calendar is replaced
    /// only when the request carries one.
    #[instrument(skip(self, req))]
    pub async fn update(&self, id: &str, req: BranchRequest) -> Result<BranchView, ServiceError> {
        let mut branch = self.find_branch(id).await?;
        let state = BranchState::parse(req.state.as_deref())?;

        branch.email_address = req.email_address;
        branch.name = req.name;
        branch.phone_number = req.phone_number;
        branch.state = state;
        if let Some(holidays) = req.branch_holidays {
            branch.replace_holidays(holidays.into_iter().map(Holiday::from).collect())?;
        }
        branch.touch(self.now());

        let view = self.persist(branch).await?;
        info!(branch_id = %id, state = %view.state, "branch_updated");
        Ok(view)
    }

    #[instrument(skip(self, phone_number))]
    pub async fn update_phone_number(&self, id: &str, phone_number: &str) -> Result<BranchView, ServiceError> {
        if phone_number.trim().is_empty() {
            return Err(ServiceError::invalid("Phone number is required"));
        }
        let mut branch = self.find_branch(id).await?;
        branch.phone_number = phone_number.to_string();
        branch.touch(self.now());

        let view = self.persist(branch).await?;
        info!(branch_id = %id, "branch_phone_updated");
        Ok(view)
    }

    #[instrument(skip(self, holiday), fields(date = %holiday.date))]
    pub async fn add_holiday(&self, id: &str, holiday: HolidayDto) -> Result<BranchView, ServiceError> {
        let mut branch = self.find_branch(id).await?;
        branch.add_holiday(Holiday::from(holiday))?;
        branch.touch(self.now());

        let view = self.persist(branch).await?;
        info!(branch_id = %id, holidays = view.branch_holidays.len(), "holiday_added");
        Ok(view)
    }

    #[instrument(skip(self))]
    pub async fn delete_holiday(&self, id: &str, date: NaiveDate) -> Result<(), ServiceError> {
        let mut branch = self.find_branch(id).await?;
        branch.remove_holiday(date)?;
        branch.touch(self.now());

        self.repo.save(branch).await?;
        info!(branch_id = %id, %date, "holiday_deleted");
        Ok(())
    }

    pub async fn list_holidays(&self, id: &str) -> Result<Vec<HolidayDto>, ServiceError> {
        Ok(self.get_by_id(id).await?.branch_holidays)
    }

    pub async fn is_holiday(&self, id: &str, date: NaiveDate) -> Result<bool, ServiceError> {
        Ok(self.find_branch(id).await?.has_holiday(date))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let branch = self.find_branch(id).await?;
        self.repo.delete(&branch).await?;
        info!(branch_id = %id, "branch_deleted");
        Ok(())
    }
}
