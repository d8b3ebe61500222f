//! `branch` table. One row per branch document; the holiday calendar is
//! embedded as a jsonb array of `{date, name}` objects.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "branch")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email_address: String,
    pub name: String,
    pub phone_number: String,
    pub state: String,
    pub creation_date: DateTimeWithTimeZone,
    pub last_modified_date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "JsonBinary")]
    pub branch_holidays: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Reject empty or whitespace-only values for a required text field.
pub fn validate_required(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Shape check only: `local@domain.tld`, no whitespace, one `@`.
pub fn validate_email(email: &str) -> Result<(), ModelError> {
    validate_required("Email", email)?;
    let invalid = || ModelError::Validation("Invalid email format".into());
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}
