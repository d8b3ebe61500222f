//! OpenAPI document served at `/api-docs/openapi.json`.
//! Doc-only schema mirrors keep utoipa out of the service crate.

use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct HolidayDoc {
    /// ISO-8601 calendar date
    #[schema(example = "2025-12-25")]
    pub date: String,
    #[schema(example = "Christmas")]
    pub name: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchRequestDoc {
    #[schema(example = "matriz@banco.ec")]
    pub email_address: String,
    pub name: String,
    pub phone_number: String,
    /// ACTIVE or INACTIVE, case-insensitive
    #[schema(example = "ACTIVE")]
    pub state: String,
    pub branch_holidays: Option<Vec<HolidayDoc>>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchViewDoc {
    pub id: String,
    pub email_address: String,
    pub name: String,
    pub phone_number: String,
    pub state: String,
    pub creation_date: String,
    pub last_modified_date: String,
    pub branch_holidays: Vec<HolidayDoc>,
}

#[derive(ToSchema)]
pub struct ApiErrorDoc {
    pub status: u16,
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::branches::list,
        crate::routes::branches::create,
        crate::routes::branches::get,
        crate::routes::branches::update,
        crate::routes::branches::delete,
        crate::routes::branches::update_phone,
        crate::routes::branches::add_holiday,
        crate::routes::branches::delete_holiday,
        crate::routes::branches::list_holidays,
        crate::routes::branches::check_holiday,
    ),
    components(
        schemas(
            HealthResponse,
            HolidayDoc,
            BranchRequestDoc,
            BranchViewDoc,
            ApiErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "branches", description = "Branch records"),
        (name = "holidays", description = "Branch holiday calendars")
    )
)]
pub struct ApiDoc;
