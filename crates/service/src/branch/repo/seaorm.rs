use async_trait::async_trait;
use models::branch;
use sea_orm::{sea_query::OnConflict, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use crate::branch::domain::{Branch, BranchState, Holiday};
use crate::branch::repository::BranchRepository;
use crate::errors::ServiceError;

/// PostgreSQL-backed repository. One `branch` row per document with the
/// holiday calendar stored as a jsonb array.
pub struct SeaOrmBranchRepository {
    pub db: DatabaseConnection,
}

fn to_domain(row: branch::Model) -> Result<Branch, ServiceError> {
    let state = row
        .state
        .parse::<BranchState>()
        .map_err(|_| ServiceError::Repository(format!("branch {} has unknown state {:?}", row.id, row.state)))?;
    let branch_holidays: Vec<Holiday> = serde_json::from_value(row.branch_holidays)
        .map_err(|e| ServiceError::Repository(format!("branch {} has malformed holidays: {e}", row.id)))?;
    Ok(Branch {
        id: Some(row.id),
        email_address: row.email_address,
        name: row.name,
        phone_number: row.phone_number,
        state,
        creation_date: row.creation_date,
        last_modified_date: row.last_modified_date,
        branch_holidays,
    })
}

fn to_active_model(id: &str, b: &Branch) -> Result<branch::ActiveModel, ServiceError> {
    let holidays = serde_json::to_value(&b.branch_holidays).map_err(ServiceError::repository)?;
    Ok(branch::ActiveModel {
        id: Set(id.to_string()),
        email_address: Set(b.email_address.clone()),
        name: Set(b.name.clone()),
        phone_number: Set(b.phone_number.clone()),
        state: Set(b.state.as_str().to_string()),
        creation_date: Set(b.creation_date),
        last_modified_date: Set(b.last_modified_date),
        branch_holidays: Set(holidays),
    })
}

#[async_trait]
impl BranchRepository for SeaOrmBranchRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Branch>, ServiceError> {
        let row = branch::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(ServiceError::repository)?;
        row.map(to_domain).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Branch>, ServiceError> {
        let rows = branch::Entity::find().all(&self.db).await.map_err(ServiceError::repository)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn save(&self, mut doc: Branch) -> Result<Branch, ServiceError> {
        let id = doc.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
        let am = to_active_model(&id, &doc)?;
        branch::Entity::insert(am)
            .on_conflict(
                OnConflict::column(branch::Column::Id)
                    .update_columns([
                        branch::Column::EmailAddress,
                        branch::Column::Name,
                        branch::Column::PhoneNumber,
                        branch::Column::State,
                        branch::Column::LastModifiedDate,
                        branch::Column::BranchHolidays,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(ServiceError::repository)?;
        doc.id = Some(id);
        Ok(doc)
    }

    async fn delete(&self, doc: &Branch) -> Result<(), ServiceError> {
        let Some(id) = &doc.id else { return Ok(()) };
        branch::Entity::delete_by_id(id.clone())
            .exec(&self.db)
            .await
            .map_err(ServiceError::repository)?;
        Ok(())
    }
}
