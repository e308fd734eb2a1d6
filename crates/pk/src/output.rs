use owo_colors::{OwoColorize, Stream, Style};
use pk_core::types::{PickupRequest, PickupStatus, User, UserRole};
use serde_json::json;

use crate::commands::CommandResult;

pub fn render_json(result: &CommandResult) -> serde_json::Value {
    match result {
        CommandResult::User(user) => json!({ "user": user }),
        CommandResult::SignedOut => json!({ "user": null }),
        CommandResult::Slots(slots) => json!({ "slots": slots }),
        CommandResult::Request { request, viewer } => json!(redact(request, viewer)),
        CommandResult::Requests { requests, viewer } => json!(
            requests
                .iter()
                .map(|request| redact(request, viewer))
                .collect::<Vec<_>>()
        ),
    }
}

pub fn render_human(result: &CommandResult) -> String {
    match result {
        CommandResult::User(Some(user)) => {
            format!("{} ({}, {})", user.name, user.role, user.phone)
        }
        CommandResult::User(None) => "not signed in".to_string(),
        CommandResult::SignedOut => "signed out".to_string(),
        CommandResult::Slots(slots) => slots.join("\n"),
        CommandResult::Request { request, viewer } => detail(&redact(request, viewer)),
        CommandResult::Requests { requests, .. } if requests.is_empty() => {
            "no pickup requests".to_string()
        }
        CommandResult::Requests { requests, .. } => requests
            .iter()
            .map(summary_line)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// The pickup code is the customer's secret to read out; partners never see it.
fn redact(request: &PickupRequest, viewer: &User) -> PickupRequest {
    let mut request = request.clone();
    if viewer.role == UserRole::Partner {
        request.pickup_code = None;
    }
    request
}

fn status_style(status: PickupStatus) -> Style {
    match status {
        PickupStatus::Pending => Style::new().yellow(),
        PickupStatus::Accepted => Style::new().blue(),
        PickupStatus::InProcess => Style::new().magenta(),
        PickupStatus::PendingApproval => Style::new().red(),
        PickupStatus::Completed => Style::new().green(),
    }
}

fn status_badge(status: PickupStatus) -> String {
    let label = format!("{:<16}", status.label());
    label
        .if_supports_color(Stream::Stdout, |text| text.style(status_style(status)))
        .to_string()
}

fn summary_line(request: &PickupRequest) -> String {
    format!(
        "{}  {}  {} {}  {}",
        request.id,
        status_badge(request.status),
        request.pickup_date.format("%Y-%m-%d"),
        request.time_slot,
        request.address,
    )
}

fn tracker(status: PickupStatus) -> String {
    PickupStatus::ALL
        .iter()
        .map(|step| {
            let mark = if step.step() <= status.step() { "●" } else { "○" };
            format!("{mark} {}", step.label())
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn detail(request: &PickupRequest) -> String {
    let mut lines = vec![
        format!("{}  {}", request.id, status_badge(request.status)),
        tracker(request.status),
        format!(
            "customer   {} ({})",
            request.customer_name, request.customer_phone
        ),
        format!("address    {}", request.address),
    ];
    if let Some(link) = &request.google_map_link {
        lines.push(format!("map        {link}"));
    }
    lines.push(format!(
        "when       {} {}",
        request.pickup_date.format("%Y-%m-%d"),
        request.time_slot
    ));
    if let Some(name) = &request.partner_name {
        lines.push(format!("partner    {name}"));
    }
    if let Some(code) = &request.pickup_code {
        lines.push(format!(
            "code       {}",
            code.if_supports_color(Stream::Stdout, |text| text.bold())
        ));
    }
    if let Some(items) = &request.items {
        lines.push("items".to_string());
        for item in items {
            let line_total = item
                .line_total()
                .map_or_else(|| "overflow".to_string(), |total| total.to_string());
            lines.push(format!(
                "  {:<20} {:>4} x {:>8} = {:>10}",
                item.name, item.quantity, item.price, line_total
            ));
        }
    }
    if let Some(total) = request.total_amount {
        lines.push(format!("total      {total}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request() -> PickupRequest {
        let now = Utc::now();
        PickupRequest {
            id: "pk_1".parse().unwrap(),
            customer_id: "usr_1".parse().unwrap(),
            customer_name: "Customer User".to_string(),
            customer_phone: "9876543210".to_string(),
            address: "12 Market Road".to_string(),
            google_map_link: None,
            pickup_date: now,
            time_slot: "09:00 - 10:00".to_string(),
            status: PickupStatus::Accepted,
            pickup_code: Some("482913".parse().unwrap()),
            partner_id: Some("usr_2".parse().unwrap()),
            partner_name: Some("Partner User".to_string()),
            items: None,
            total_amount: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn viewer(role: UserRole) -> User {
        User {
            id: "usr_1".parse().unwrap(),
            phone: "9876543210".to_string(),
            name: "Someone".to_string(),
            role,
        }
    }

    #[test]
    fn partners_never_see_the_code() {
        let partner = CommandResult::Request {
            request: request(),
            viewer: viewer(UserRole::Partner),
        };
        assert!(render_json(&partner).get("pickupCode").is_none());
        assert!(!render_human(&partner).contains("482913"));

        let customer = CommandResult::Request {
            request: request(),
            viewer: viewer(UserRole::Customer),
        };
        assert_eq!(render_json(&customer)["pickupCode"], "482913");
        assert!(render_human(&customer).contains("482913"));
    }

    #[test]
    fn tracker_marks_reached_steps() {
        let line = tracker(PickupStatus::InProcess);
        assert!(line.starts_with("● Pending  ● Accepted  ● In Process  ○"));
    }
}
