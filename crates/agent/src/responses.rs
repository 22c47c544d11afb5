//! User-facing response templates
//!
//! Bilingual (Hindi + English), matching the assistant's user base. Every
//! turn ends with one of these; raw errors never reach the user.

use crate::request::{LeaveRequest, OnDutyRequest, RegularizationRequest};

/// Generic clarification when no layer could resolve an intent
pub fn clarify_unknown() -> String {
    "मुझे समझ नहीं आया। क्या आप स्पष्ट कर सकते हैं? I didn't understand. Could you clarify what \
     you want to do? (e.g., apply leave, check attendance, view balance)"
        .to_string()
}

/// Generic fallback when a turn produced no response
pub fn fallback() -> String {
    "कृपया अधिक जानकारी दें। Please provide more details.".to_string()
}

/// Internal fault converted at the turn boundary
pub fn turn_error() -> String {
    "कुछ गड़बड़ हो गई। Something went wrong, please try again.".to_string()
}

pub fn leave_success(request: &LeaveRequest, days: i64) -> String {
    format!(
        "✅ छुट्टी सफलतापूर्वक लागू हो गई! Leave applied successfully!\n\n\
         📋 Type: {}\n📅 Dates: {} to {} ({} days)\n📝 Reason: {}",
        request.leave_type, request.from_date, request.to_date, days, request.reason
    )
}

pub fn leave_pending_approval(request: &LeaveRequest, days: i64) -> String {
    format!(
        "⏳ आपकी छुट्टी मैनेजर की मंज़ूरी के लिए भेज दी गई है। Your leave request needs manager \
         approval and has been submitted.\n\n\
         📋 Type: {}\n📅 Dates: {} to {} ({} days)",
        request.leave_type, request.from_date, request.to_date, days
    )
}

pub fn onduty_success(request: &OnDutyRequest) -> String {
    format!(
        "⏳ ऑन-ड्यूटी मंज़ूरी के लिए भेज दी गई। On-duty submitted for manager approval.\n\n\
         📅 Date: {}\n⏰ Time: {} - {}\n📝 Reason: {}",
        request.date, request.from_time, request.to_time, request.reason
    )
}

pub fn regularization_success(request: &RegularizationRequest, pending: bool) -> String {
    let header = if pending {
        "⏳ पुरानी तारीख की regularization मैनेजर की मंज़ूरी के लिए भेजी गई। Regularization for \
         older dates needs manager approval and has been submitted."
    } else {
        "✅ Attendance regularization submitted!"
    };
    format!(
        "{}\n\n📅 Date: {}\n⏰ Time: {} - {}\n📝 Reason: {}",
        header, request.date, request.from_time, request.to_time, request.reason
    )
}

pub fn attendance_success(action: &str, location: Option<&str>) -> String {
    let action_display = if action == "check_out" { "Check-out" } else { "Check-in" };
    let mut response = format!("✅ {} marked successfully.", action_display);
    if let Some(location) = location {
        response.push_str(&format!(" 📍 Location: {}", location));
    }
    response
}

pub fn balance_summary(balances: &[(String, f64)]) -> String {
    if balances.is_empty() {
        return "❌ No leave balance information found.".to_string();
    }
    let mut response =
        "📊 आपका वर्तमान छुट्टी शेष। Your current leave balance:\n".to_string();
    for (leave_type, days) in balances {
        response.push_str(&format!("• {}: {} days\n", leave_type, days));
    }
    response.trim_end().to_string()
}

pub fn holidays_summary(holidays: &[(String, String)]) -> String {
    if holidays.is_empty() {
        return "❌ No upcoming holidays found.".to_string();
    }
    let mut response = "📅 आने वाली छुट्टियाँ। Upcoming holidays:\n".to_string();
    for (name, date) in holidays {
        response.push_str(&format!("• {} - {}\n", date, name));
    }
    response.trim_end().to_string()
}

pub fn salary_slip_ready(month: u32, year: i32) -> String {
    format!(
        "📄 आपकी वेतन पर्ची तैयार है। Your salary slip for {:02}/{} is ready.",
        month, year
    )
}

pub fn insufficient_balance(leave_type: &str, balance: f64, alternatives: &[String]) -> String {
    let mut response = format!(
        "⚠️ {} balance is not enough. Current balance: {} days.\n\n**Alternative options:**\n",
        leave_type, balance
    );
    if alternatives.is_empty() {
        response.push_str("• 💬 Contact HR for more options\n");
    } else {
        for alternative in alternatives {
            response.push_str(&format!("• {}\n", alternative));
        }
    }
    response.push_str("\nWould you like to try a different leave type?");
    response
}

pub fn validation_error(message: &str) -> String {
    format!("❌ {}", message)
}

pub fn execution_failed(message: &str) -> String {
    format!(
        "❌ कुछ गड़बड़ हो गई। Something went wrong.\n\nError: {}\n\nYour details are saved, \
         fix the issue and try again.",
        message
    )
}
