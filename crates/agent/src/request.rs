//! Typed per-intent requests
//!
//! Slots accumulate as loosely-typed strings; at the validation boundary
//! they are parsed into one of these records. All field-format errors
//! surface here, so downstream nodes and the executor adapter work with
//! real dates and times.

use chrono::{NaiveDate, NaiveTime};
use hr_agent_core::slots::keys;
use hr_agent_core::{Intent, SlotMap};
use serde_json::{json, Value};

/// A field that failed to parse; recoverable by re-asking the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn require<'a>(slots: &'a SlotMap, field: &'static str) -> Result<&'a str, FieldError> {
    slots
        .get(field)
        .map(|s| s.as_str())
        .ok_or_else(|| FieldError::new(field, format!("{} is required", field.replace('_', " "))))
}

fn parse_date(slots: &SlotMap, field: &'static str) -> Result<NaiveDate, FieldError> {
    let raw = require(slots, field)?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| FieldError::new(field, format!("'{}' is not a valid date", raw)))
}

fn parse_time(slots: &SlotMap, field: &'static str) -> Result<NaiveTime, FieldError> {
    let raw = require(slots, field)?;
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| FieldError::new(field, format!("'{}' is not a valid time", raw)))
}

/// Leave application
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRequest {
    pub leave_type: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub reason: String,
}

impl LeaveRequest {
    pub fn from_slots(slots: &SlotMap) -> Result<Self, FieldError> {
        let from_date = parse_date(slots, keys::FROM_DATE)?;
        let to_date = match slots.get(keys::TO_DATE) {
            Some(_) => parse_date(slots, keys::TO_DATE)?,
            None => from_date,
        };
        Ok(Self {
            leave_type: require(slots, keys::LEAVE_TYPE)?.to_string(),
            from_date,
            to_date,
            reason: require(slots, keys::REASON)?.to_string(),
        })
    }

    pub fn duration_days(&self) -> i64 {
        (self.to_date - self.from_date).num_days() + 1
    }
}

/// Attendance regularization
#[derive(Debug, Clone, PartialEq)]
pub struct RegularizationRequest {
    pub date: NaiveDate,
    pub from_time: NaiveTime,
    pub to_time: NaiveTime,
    pub reason: String,
}

impl RegularizationRequest {
    pub fn from_slots(slots: &SlotMap) -> Result<Self, FieldError> {
        Ok(Self {
            date: parse_date(slots, keys::DATE)?,
            from_time: parse_time(slots, keys::FROM_TIME)?,
            to_time: parse_time(slots, keys::TO_TIME)?,
            reason: require(slots, keys::REASON)?.to_string(),
        })
    }
}

/// On-duty application
#[derive(Debug, Clone, PartialEq)]
pub struct OnDutyRequest {
    pub date: NaiveDate,
    pub from_time: NaiveTime,
    pub to_time: NaiveTime,
    pub reason: String,
}

impl OnDutyRequest {
    pub fn from_slots(slots: &SlotMap) -> Result<Self, FieldError> {
        Ok(Self {
            date: parse_date(slots, keys::DATE)?,
            from_time: parse_time(slots, keys::FROM_TIME)?,
            to_time: parse_time(slots, keys::TO_TIME)?,
            reason: require(slots, keys::REASON)?.to_string(),
        })
    }

    /// Worked duration in `HH:MM:SS` form, as the back end expects
    pub fn total_hours(&self) -> String {
        let minutes = (self.to_time - self.from_time).num_minutes().max(0);
        format!("{:02}:{:02}:00", minutes / 60, minutes % 60)
    }
}

/// Attendance action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceAction {
    CheckIn,
    CheckOut,
}

impl AttendanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceAction::CheckIn => "check_in",
            AttendanceAction::CheckOut => "check_out",
        }
    }
}

/// Attendance marking
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRequest {
    pub action: AttendanceAction,
    pub location: Option<String>,
}

impl AttendanceRequest {
    pub fn from_slots(slots: &SlotMap) -> Result<Self, FieldError> {
        let action = match require(slots, keys::ACTION)? {
            "check_in" => AttendanceAction::CheckIn,
            "check_out" => AttendanceAction::CheckOut,
            other => {
                return Err(FieldError::new(
                    keys::ACTION,
                    format!("'{}' is not a valid attendance action", other),
                ))
            }
        };
        Ok(Self {
            action,
            location: slots.get(keys::LOCATION).cloned(),
        })
    }
}

/// Salary slip fetch
#[derive(Debug, Clone, PartialEq)]
pub struct SalarySlipRequest {
    pub month: u32,
    pub year: i32,
}

impl SalarySlipRequest {
    pub fn from_slots(slots: &SlotMap) -> Result<Self, FieldError> {
        let month: u32 = require(slots, keys::MONTH)?
            .parse()
            .map_err(|_| FieldError::new(keys::MONTH, "month must be a number"))?;
        if !(1..=12).contains(&month) {
            return Err(FieldError::new(keys::MONTH, "month must be between 1 and 12"));
        }
        let year: i32 = require(slots, keys::YEAR)?
            .parse()
            .map_err(|_| FieldError::new(keys::YEAR, "year must be a number"))?;
        Ok(Self { month, year })
    }
}

/// Validated, executable action
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRequest {
    Leave(LeaveRequest),
    Regularization(RegularizationRequest),
    OnDuty(OnDutyRequest),
    Attendance(AttendanceRequest),
    SalarySlip(SalarySlipRequest),
    BalanceQuery,
    HolidayQuery,
}

impl ActionRequest {
    /// Build the typed request for an intent from its merged slots.
    pub fn from_slots(intent: Intent, slots: &SlotMap) -> Result<Self, FieldError> {
        match intent {
            Intent::ApplyLeave => LeaveRequest::from_slots(slots).map(ActionRequest::Leave),
            Intent::ApplyRegularization => {
                RegularizationRequest::from_slots(slots).map(ActionRequest::Regularization)
            }
            Intent::ApplyOnDuty => OnDutyRequest::from_slots(slots).map(ActionRequest::OnDuty),
            Intent::MarkAttendance => {
                AttendanceRequest::from_slots(slots).map(ActionRequest::Attendance)
            }
            Intent::GetSalarySlip => {
                SalarySlipRequest::from_slots(slots).map(ActionRequest::SalarySlip)
            }
            Intent::CheckLeaveBalance => Ok(ActionRequest::BalanceQuery),
            Intent::GetHolidays => Ok(ActionRequest::HolidayQuery),
            Intent::PolicyQuestion | Intent::Unknown => Err(FieldError::new(
                "intent",
                format!("intent '{}' has no executable action", intent),
            )),
        }
    }

    /// Executor tool name for this action
    pub fn tool_name(&self) -> &'static str {
        match self {
            ActionRequest::Leave(_) => "apply_leave",
            ActionRequest::Regularization(_) => "apply_regularization",
            ActionRequest::OnDuty(_) => "apply_onduty",
            ActionRequest::Attendance(_) => "mark_attendance",
            ActionRequest::SalarySlip(_) => "get_salary_slip",
            ActionRequest::BalanceQuery => "get_leave_balance",
            ActionRequest::HolidayQuery => "get_holidays",
        }
    }

    /// Executor arguments for this action
    pub fn arguments(&self, user_id: &str) -> Value {
        match self {
            ActionRequest::Leave(r) => json!({
                "user_id": user_id,
                "leave_type_name": r.leave_type,
                "from_date": r.from_date.to_string(),
                "to_date": r.to_date.to_string(),
                "reasons": r.reason,
            }),
            ActionRequest::Regularization(r) => json!({
                "user_id": user_id,
                "date": r.date.to_string(),
                "from_time": r.from_time.format("%H:%M").to_string(),
                "to_time": r.to_time.format("%H:%M").to_string(),
                "reason": r.reason,
            }),
            ActionRequest::OnDuty(r) => json!({
                "user_id": user_id,
                "from_datetime": format!("{} {}:00", r.date, r.from_time.format("%H:%M")),
                "to_datetime": format!("{} {}:00", r.date, r.to_time.format("%H:%M")),
                "total_hours": r.total_hours(),
                "reason": r.reason,
            }),
            ActionRequest::Attendance(r) => json!({
                "user_id": user_id,
                "action": r.action.as_str(),
                "location": r.location,
            }),
            ActionRequest::SalarySlip(r) => json!({
                "user_id": user_id,
                "month": r.month,
                "year": r.year,
            }),
            ActionRequest::BalanceQuery | ActionRequest::HolidayQuery => json!({
                "user_id": user_id,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(pairs: &[(&str, &str)]) -> SlotMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_leave_request_defaults_to_date() {
        let request = LeaveRequest::from_slots(&slots(&[
            ("leave_type", "Sick Leave"),
            ("from_date", "2025-11-04"),
            ("reason", "health issues"),
        ]))
        .unwrap();
        assert_eq!(request.to_date, request.from_date);
        assert_eq!(request.duration_days(), 1);
    }

    #[test]
    fn test_leave_request_duration() {
        let request = LeaveRequest::from_slots(&slots(&[
            ("leave_type", "Sick Leave"),
            ("from_date", "2025-11-04"),
            ("to_date", "2025-11-06"),
            ("reason", "health issues"),
        ]))
        .unwrap();
        assert_eq!(request.duration_days(), 3);
    }

    #[test]
    fn test_missing_field_is_error() {
        let err = LeaveRequest::from_slots(&slots(&[("leave_type", "Sick Leave")])).unwrap_err();
        assert_eq!(err.field, "from_date");
    }

    #[test]
    fn test_bad_date_is_error() {
        let err = LeaveRequest::from_slots(&slots(&[
            ("leave_type", "Sick Leave"),
            ("from_date", "6 nov"),
            ("reason", "x"),
        ]))
        .unwrap_err();
        assert_eq!(err.field, "from_date");
    }

    #[test]
    fn test_onduty_total_hours() {
        let request = OnDutyRequest::from_slots(&slots(&[
            ("date", "2025-11-03"),
            ("from_time", "09:30"),
            ("to_time", "18:30"),
            ("reason", "WFH"),
        ]))
        .unwrap();
        assert_eq!(request.total_hours(), "09:00:00");
    }

    #[test]
    fn test_attendance_action_parsing() {
        let request =
            AttendanceRequest::from_slots(&slots(&[("action", "check_in")])).unwrap();
        assert_eq!(request.action, AttendanceAction::CheckIn);

        let err = AttendanceRequest::from_slots(&slots(&[("action", "sleep")])).unwrap_err();
        assert_eq!(err.field, "action");
    }

    #[test]
    fn test_salary_slip_bounds() {
        assert!(SalarySlipRequest::from_slots(&slots(&[("month", "13"), ("year", "2025")])).is_err());
        let request =
            SalarySlipRequest::from_slots(&slots(&[("month", "10"), ("year", "2025")])).unwrap();
        assert_eq!(request.month, 10);
    }

    #[test]
    fn test_executor_arguments_shape() {
        let request = ActionRequest::Leave(
            LeaveRequest::from_slots(&slots(&[
                ("leave_type", "Sick Leave"),
                ("from_date", "2025-11-04"),
                ("reason", "health issues"),
            ]))
            .unwrap(),
        );
        assert_eq!(request.tool_name(), "apply_leave");
        let args = request.arguments("240611");
        assert_eq!(args["user_id"], "240611");
        assert_eq!(args["leave_type_name"], "Sick Leave");
        assert_eq!(args["from_date"], "2025-11-04");
    }
}
