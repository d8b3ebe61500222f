use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use service::branch::{BranchRequest, BranchView, HolidayDto};
use tracing::info;

use models::branch::{validate_email, validate_required};

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhoneQuery {
    /// New phone number
    #[serde(rename = "phoneNumber", default)]
    #[param(example = "0999999999")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HolidayCheckQuery {
    /// Date to check (ISO-8601)
    #[serde(default)]
    #[param(example = "2025-01-01")]
    pub date: Option<String>,
}

/// Structural checks done before the service sees the request.
fn validate_branch_request(req: &BranchRequest) -> Result<(), JsonApiError> {
    validate_email(&req.email_address)?;
    validate_required("Branch name", &req.name)?;
    validate_required("Phone number", &req.phone_number)?;
    if req.state.is_none() {
        return Err(JsonApiError::bad_request("State is required"));
    }
    for h in req.branch_holidays.iter().flatten() {
        validate_holiday(h)?;
    }
    Ok(())
}

fn validate_holiday(h: &HolidayDto) -> Result<(), JsonApiError> {
    validate_required("Holiday name", &h.name)?;
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate, JsonApiError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| JsonApiError::bad_request(format!("Invalid date '{raw}', expected YYYY-MM-DD")))
}

#[utoipa::path(
    get, path = "/api/v1/branches", tag = "branches",
    responses((status = 200, description = "OK", body = [crate::openapi::BranchViewDoc]))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<BranchView>>, JsonApiError> {
    let all = state.branches.get_all().await?;
    info!(count = all.len(), "list branches");
    Ok(Json(all))
}

#[utoipa::path(
    post, path = "/api/v1/branches", tag = "branches",
    request_body = crate::openapi::BranchRequestDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::BranchViewDoc),
        (status = 400, description = "Bad Request", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<BranchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BranchView>), JsonApiError> {
    let Json(input) = payload?;
    validate_branch_request(&input)?;
    let created = state.branches.create_branch(input).await?;
    info!(id = %created.id, "created branch");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/v1/branches/{id}", tag = "branches",
    params(("id" = String, Path, description = "Branch ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::BranchViewDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<BranchView>, JsonApiError> {
    Ok(Json(state.branches.get_by_id(&id).await?))
}

#[utoipa::path(
    put, path = "/api/v1/branches/{id}", tag = "branches",
    params(("id" = String, Path, description = "Branch ID")),
    request_body = crate::openapi::BranchRequestDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::BranchViewDoc),
        (status = 400, description = "Bad Request", body = crate::openapi::ApiErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<BranchRequest>, JsonRejection>,
) -> Result<Json<BranchView>, JsonApiError> {
    let Json(input) = payload?;
    validate_branch_request(&input)?;
    let updated = state.branches.update(&id, input).await?;
    info!(id = %updated.id, "updated branch");
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/api/v1/branches/{id}", tag = "branches",
    params(("id" = String, Path, description = "Branch ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<StatusCode, JsonApiError> {
    state.branches.delete(&id).await?;
    info!(id = %id, "deleted branch");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch, path = "/api/v1/branches/{id}/phone", tag = "branches",
    params(("id" = String, Path, description = "Branch ID"), PhoneQuery),
    responses(
        (status = 200, description = "OK", body = crate::openapi::BranchViewDoc),
        (status = 400, description = "Bad Request", body = crate::openapi::ApiErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn update_phone(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    query: Result<Query<PhoneQuery>, QueryRejection>,
) -> Result<Json<BranchView>, JsonApiError> {
    let Query(q) = query?;
    let phone = q.phone_number.unwrap_or_default();
    Ok(Json(state.branches.update_phone_number(&id, &phone).await?))
}

#[utoipa::path(
    post, path = "/api/v1/branches/{id}/holidays", tag = "holidays",
    params(("id" = String, Path, description = "Branch ID")),
    request_body = crate::openapi::HolidayDoc,
    responses(
        (status = 200, description = "OK", body = crate::openapi::BranchViewDoc),
        (status = 400, description = "Bad Request", body = crate::openapi::ApiErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn add_holiday(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<HolidayDto>, JsonRejection>,
) -> Result<Json<BranchView>, JsonApiError> {
    let Json(holiday) = payload?;
    validate_holiday(&holiday)?;
    Ok(Json(state.branches.add_holiday(&id, holiday).await?))
}

#[utoipa::path(
    delete, path = "/api/v1/branches/{id}/holidays/{date}", tag = "holidays",
    params(
        ("id" = String, Path, description = "Branch ID"),
        ("date" = String, Path, description = "Holiday date (ISO-8601)", example = "2025-12-25")
    ),
    responses(
        (status = 204, description = "No Content"),
        (status = 400, description = "Bad Request", body = crate::openapi::ApiErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn delete_holiday(
    State(state): State<ServerState>,
    Path((id, date)): Path<(String, String)>,
) -> Result<StatusCode, JsonApiError> {
    let date = parse_date(&date)?;
    state.branches.delete_holiday(&id, date).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE .../holidays/check` lands on the static route; answer it as the
/// date-shaped route would.
pub async fn delete_holiday_check(Path(_id): Path<String>) -> Result<StatusCode, JsonApiError> {
    parse_date("check")?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/api/v1/branches/{id}/holidays", tag = "holidays",
    params(("id" = String, Path, description = "Branch ID")),
    responses(
        (status = 200, description = "OK", body = [crate::openapi::HolidayDoc]),
        (status = 404, description = "Not Found", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn list_holidays(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HolidayDto>>, JsonApiError> {
    Ok(Json(state.branches.list_holidays(&id).await?))
}

#[utoipa::path(
    get, path = "/api/v1/branches/{id}/holidays/check", tag = "holidays",
    params(("id" = String, Path, description = "Branch ID"), HolidayCheckQuery),
    responses(
        (status = 200, description = "OK", body = bool),
        (status = 400, description = "Bad Request", body = crate::openapi::ApiErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn check_holiday(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    query: Result<Query<HolidayCheckQuery>, QueryRejection>,
) -> Result<Json<bool>, JsonApiError> {
    let Query(q) = query?;
    let raw = q.date.ok_or_else(|| JsonApiError::bad_request("date is required"))?;
    let date = parse_date(&raw)?;
    Ok(Json(state.branches.is_holiday(&id, date).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req() -> BranchRequest {
        BranchRequest {
            email_address: "matriz@banco.ec".into(),
            name: "Matriz".into(),
            phone_number: "022000000".into(),
            state: Some("ACTIVE".into()),
            branch_holidays: None,
        }
    }

    #[test]
    fn structural_validation_names_the_missing_field() {
        let mut r = req();
        r.name = " ".into();
        assert_eq!(validate_branch_request(&r).unwrap_err().message, "Branch name is required");

        let mut r = req();
        r.email_address = "not-an-email".into();
        assert_eq!(validate_branch_request(&r).unwrap_err().message, "Invalid email format");

        let mut r = req();
        r.state = None;
        assert_eq!(validate_branch_request(&r).unwrap_err().status, StatusCode::BAD_REQUEST);

        let mut r = req();
        r.branch_holidays = Some(vec![HolidayDto { date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), name: "".into() }]);
        assert_eq!(validate_branch_request(&r).unwrap_err().message, "Holiday name is required");

        assert!(validate_branch_request(&req()).is_ok());
    }

    #[test]
    fn dates_are_iso_only() {
        assert_eq!(parse_date("2025-12-25").unwrap(), NaiveDate::from_ymd_opt(2025, 12, 25).unwrap());
        assert!(parse_date("25/12/2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
    }
}
