use askama::Template;
use time::{macros::format_description, OffsetDateTime};

use crate::bookings::repo_types::Booking;

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn display_time(t: OffsetDateTime) -> String {
    t.format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_else(|_| t.to_string())
}

#[derive(Clone, Debug)]
struct BookingRow {
    id: i32,
    created_at: String,
    booked_time: String,
    name: String,
    trainer: String,
    class: String,
    price: String,
}

impl From<&Booking> for BookingRow {
    fn from(b: &Booking) -> Self {
        Self {
            id: b.id,
            created_at: display_time(b.created_at),
            booked_time: display_time(b.booked_time),
            name: b.name.clone(),
            trainer: b.trainer.clone(),
            class: b.class.clone(),
            price: group_thousands(i64::from(b.price)),
        }
    }
}

#[derive(Template)]
#[template(path = "admin_bookings.html")]
struct AdminBookingsTemplate {
    rows: Vec<BookingRow>,
    dashboard_link: String,
    has_dashboard: bool,
}

/// Full admin page: every booking plus a button to the external dashboard.
pub fn bookings_report(
    bookings: &[Booking],
    dashboard_link: Option<&str>,
) -> Result<String, askama::Error> {
    AdminBookingsTemplate {
        rows: bookings.iter().map(BookingRow::from).collect(),
        dashboard_link: dashboard_link.unwrap_or_default().to_owned(),
        has_dashboard: dashboard_link.is_some(),
    }
    .render()
}
