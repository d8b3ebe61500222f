use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Lifecycle status of a branch. Any state may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BranchState {
    Active,
    Inactive,
}

impl BranchState {
    pub const ALL: [BranchState; 2] = [BranchState::Active, BranchState::Inactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            BranchState::Active => "ACTIVE",
            BranchState::Inactive => "INACTIVE",
        }
    }

    /// Parse a wire value: trimmed, case-insensitive. Missing and blank
    /// values are rejected separately from unknown ones.
    pub fn parse(raw: Option<&str>) -> Result<Self, ServiceError> {
        match raw.map(str::trim) {
            None | Some("") => Err(ServiceError::invalid("State is required")),
            Some(s) => s.parse(),
        }
    }

    fn allowed() -> String {
        Self::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for BranchState {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ServiceError::invalid(format!("Invalid state. Allowed: {}", Self::allowed())))
    }
}

impl fmt::Display for BranchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored holiday entry, embedded in its branch document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

/// Stored branch document. `id` is `None` until the repository assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: Option<String>,
    pub email_address: String,
    pub name: String,
    pub phone_number: String,
    pub state: BranchState,
    pub creation_date: DateTime<FixedOffset>,
    pub last_modified_date: DateTime<FixedOffset>,
    #[serde(default)]
    pub branch_holidays: Vec<Holiday>,
}

impl Branch {
    pub fn has_holiday(&self, date: NaiveDate) -> bool {
        self.branch_holidays.iter().any(|h| h.date == date)
    }

    /// Append a holiday, keeping dates unique.
    pub fn add_holiday(&mut self, holiday: Holiday) -> Result<(), ServiceError> {
        if self.has_holiday(holiday.date) {
            return Err(ServiceError::invalid("Holiday already exists"));
        }
        self.branch_holidays.push(holiday);
        Ok(())
    }

    /// Remove the entry for `date`; other entries keep their order.
    pub fn remove_holiday(&mut self, date: NaiveDate) -> Result<(), ServiceError> {
        if self.branch_holidays.is_empty() {
            return Err(ServiceError::not_found("No holidays found for branch"));
        }
        let pos = self
            .branch_holidays
            .iter()
            .position(|h| h.date == date)
            .ok_or_else(|| ServiceError::not_found(format!("Holiday not found for date: {date}")))?;
        self.branch_holidays.remove(pos);
        Ok(())
    }

    /// Replace the whole calendar. Duplicate dates in `holidays` are rejected
    /// and leave the current calendar untouched.
    pub fn replace_holidays(&mut self, holidays: Vec<Holiday>) -> Result<(), ServiceError> {
        let mut seen = std::collections::HashSet::with_capacity(holidays.len());
        if let Some(dup) = holidays.iter().find(|h| !seen.insert(h.date)) {
            return Err(ServiceError::invalid(format!("Duplicate holiday date: {}", dup.date)));
        }
        self.branch_holidays = holidays;
        Ok(())
    }

    /// Stamp a mutation. Never moves `last_modified_date` before `creation_date`.
    pub fn touch(&mut self, now: DateTime<FixedOffset>) {
        self.last_modified_date = now.max(self.creation_date);
    }
}

/// Holiday as it travels over the wire, both in requests and responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayDto {
    pub date: NaiveDate,
    #[serde(default)]
    pub name: String,
}

impl From<HolidayDto> for Holiday {
    fn from(dto: HolidayDto) -> Self {
        Holiday { date: dto.date, name: dto.name }
    }
}

impl From<&Holiday> for HolidayDto {
    fn from(h: &Holiday) -> Self {
        HolidayDto { date: h.date, name: h.name.clone() }
    }
}

/// Body of create and full-update requests.
///
/// Text fields default to empty so that a missing field surfaces as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRequest {
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub branch_holidays: Option<Vec<HolidayDto>>,
}

/// Response shape for a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchView {
    pub id: String,
    pub email_address: String,
    pub name: String,
    pub phone_number: String,
    pub state: String,
    pub creation_date: DateTime<FixedOffset>,
    pub last_modified_date: DateTime<FixedOffset>,
    pub branch_holidays: Vec<HolidayDto>,
}

impl From<&Branch> for BranchView {
    fn from(b: &Branch) -> Self {
        BranchView {
            id: b.id.clone().unwrap_or_default(),
            email_address: b.email_address.clone(),
            name: b.name.clone(),
            phone_number: b.phone_number.clone(),
            state: b.state.as_str().to_string(),
            creation_date: b.creation_date,
            last_modified_date: b.last_modified_date,
            branch_holidays: b.branch_holidays.iter().map(HolidayDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn branch() -> Branch {
        let t = FixedOffset::west_opt(5 * 3600).unwrap().with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap();
        Branch {
            id: Some("b1".into()),
            email_address: "matriz@banco.ec".into(),
            name: "Matriz".into(),
            phone_number: "022000000".into(),
            state: BranchState::Active,
            creation_date: t,
            last_modified_date: t,
            branch_holidays: vec![],
        }
    }

    #[test]
    fn state_parse_is_trimmed_and_case_insensitive() {
        for raw in ["active", " ACTIVE ", "Active", "\tactive\n"] {
            assert_eq!(BranchState::parse(Some(raw)).unwrap(), BranchState::Active);
        }
        assert_eq!(BranchState::parse(Some("inActive")).unwrap(), BranchState::Inactive);
    }

    #[test]
    fn state_parse_reports_allowed_values() {
        let err = BranchState::parse(Some("closed")).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "Invalid state. Allowed: ACTIVE, INACTIVE");
    }

    #[test]
    fn state_parse_rejects_missing_and_blank() {
        for raw in [None, Some(""), Some("   ")] {
            let err = BranchState::parse(raw).unwrap_err();
            assert_eq!(err.to_string(), "State is required");
        }
    }

    #[test]
    fn state_serializes_uppercase() {
        assert_eq!(serde_json::to_value(BranchState::Inactive).unwrap(), "INACTIVE");
    }

    #[test]
    fn remove_keeps_order_of_remaining_entries() {
        let mut b = branch();
        for (d, n) in [(1, "A"), (2, "B"), (3, "C")] {
            b.add_holiday(Holiday { date: day(2025, 5, d), name: n.into() }).unwrap();
        }
        b.remove_holiday(day(2025, 5, 2)).unwrap();
        let names: Vec<_> = b.branch_holidays.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
    }

    #[test]
    fn replace_rejects_duplicate_dates() {
        let mut b = branch();
        b.add_holiday(Holiday { date: day(2025, 1, 1), name: "Año Nuevo".into() }).unwrap();
        let dup = vec![
            Holiday { date: day(2025, 12, 25), name: "Navidad".into() },
            Holiday { date: day(2025, 12, 25), name: "Christmas".into() },
        ];
        let err = b.replace_holidays(dup).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate holiday date: 2025-12-25");
        assert_eq!(b.branch_holidays.len(), 1);
    }

    #[test]
    fn touch_never_precedes_creation() {
        let mut b = branch();
        let earlier = b.creation_date - chrono::Duration::hours(1);
        b.touch(earlier);
        assert_eq!(b.last_modified_date, b.creation_date);
    }

    #[test]
    fn view_uses_wire_names() {
        let mut b = branch();
        b.add_holiday(Holiday { date: day(2025, 12, 25), name: "Christmas".into() }).unwrap();
        let v = serde_json::to_value(BranchView::from(&b)).unwrap();
        assert_eq!(v["emailAddress"], "matriz@banco.ec");
        assert_eq!(v["state"], "ACTIVE");
        assert_eq!(v["branchHolidays"][0]["date"], "2025-12-25");
        assert_eq!(v["creationDate"], "2025-01-02T09:00:00-05:00");
    }
}
