//! Plain-text views for the terminal

use std::fmt::Write;

use chrono::NaiveDate;
use fact_calendar::CalendarGrid;
use fact_core::{Competition, CompetitionDetail, RequestView, TeamMessage};

const CELL: usize = 4;

/// Month grid followed by the events of each day and the flexible list.
///
/// Days with events carry a `*`; today is wrapped in brackets.
pub fn calendar(grid: &CalendarGrid<'_, Competition>, today: NaiveDate) -> String {
    let mut out = String::new();
    let title = grid.view.to_string();
    let width = CELL * 7;

    let _ = writeln!(out, "{:^width$}", title);
    for day in ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"] {
        let _ = write!(out, "{:>w$}", day, w = CELL);
    }
    out.push('\n');

    let marker = grid.today_marker(today);
    for week in grid.weeks() {
        for cell in week {
            let text = match cell {
                None => String::new(),
                Some(day) if marker == Some(day) => format!("[{}]", day),
                Some(day) if !grid.events_on(day).is_empty() => format!("{}*", day),
                Some(day) => day.to_string(),
            };
            let _ = write!(out, "{:>w$}", text, w = CELL);
        }
        out.push('\n');
    }

    if grid.is_empty() {
        out.push_str("\nNo competitions this month.\n");
        return out;
    }

    out.push('\n');
    for (day, comps) in &grid.days {
        for comp in comps {
            let _ = writeln!(
                out,
                "{} {:>2}  {} ({})",
                grid.view.abbreviation(),
                day,
                comp.label(),
                comp.category
            );
        }
    }

    if !grid.flexible.is_empty() {
        out.push_str("\nFlexible dates:\n");
        for comp in &grid.flexible {
            let _ = writeln!(out, "  {}  {}", comp.label(), comp.date);
        }
    }

    out
}

/// One line per competition
pub fn competition_list(comps: &[&Competition]) -> String {
    if comps.is_empty() {
        return "No competitions match your search.\n".to_string();
    }
    let mut out = String::new();
    for comp in comps {
        let _ = writeln!(
            out,
            "{:<8} {:<12} {}  [{}]",
            comp.id,
            comp.category.as_str(),
            comp.name,
            comp.date
        );
    }
    out
}

pub fn competition_detail(detail: &CompetitionDetail) -> String {
    let c = &detail.competition;
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", c.name, c.id);
    let _ = writeln!(out, "{}", c.category);
    let _ = writeln!(out, "\n{}\n", c.description);
    let _ = writeln!(out, "Date:         {}", c.date);

    let optional = [
        ("Format", &c.format),
        ("Participation", &c.participation),
        ("Duration", &c.duration),
        ("Location", &c.location),
        ("Organizer", &c.organizer),
        ("Registration", &c.registration_deadline),
        ("Results", &c.result_date),
        ("Website", &c.website),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            let _ = writeln!(out, "{:<13} {}", format!("{}:", label), value);
        }
    }

    if !c.materials.is_empty() {
        out.push_str("\nMaterials:\n");
        for m in &c.materials {
            let _ = writeln!(out, "  {} - {}", m.title, m.url);
        }
    }

    if detail.requests.is_empty() {
        out.push_str("\nNo team requests yet. Use /team to post one.\n");
    } else {
        let _ = writeln!(out, "\nTeam requests ({}):", detail.requests.len());
        for r in &detail.requests {
            let _ = writeln!(out, "  {}  {} (grade {}, {})", r.id, r.student_name, r.grade, r.curriculum);
        }
    }
    out
}

pub fn request_list(views: &[RequestView]) -> String {
    if views.is_empty() {
        return "No team requests yet.\n".to_string();
    }
    let mut out = String::new();
    for v in views {
        let r = &v.request;
        let _ = writeln!(
            out,
            "{}  {} | grade {} | {} | {}",
            r.id, r.student_name, r.grade, r.curriculum, v.competition_name
        );
    }
    out
}

pub fn request_detail(view: &RequestView) -> String {
    let r = &view.request;
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", r.student_name, r.id);
    let _ = writeln!(out, "Competition: {}", view.competition_name);
    let _ = writeln!(out, "Grade {} | {}", r.grade, r.curriculum);
    let _ = writeln!(out, "Posted {}", r.timestamp.format("%Y-%m-%d"));
    let _ = writeln!(out, "\n\"{}\"", r.bio);
    if let Some(contact) = &r.contact {
        let _ = writeln!(out, "Contact: {}", contact);
    }
    out
}

/// `name: text` with the teammate shown by name
pub fn team_message(message: &TeamMessage, teammate: &str) -> String {
    use fact_core::Sender;

    match message.sender {
        Sender::Me => format!("you: {}", message.text),
        Sender::Teammate => format!("{}: {}", teammate, message.text),
        Sender::System => format!("* {}", message.text),
    }
}
