//! HTML rendering for the dashboard page.

use std::fmt::Write;

use crate::agenda::AgendaItem;
use crate::config::DateEntry;
use crate::pregnancy::PregnancyProgress;

/// Everything the index page shows.
pub struct IndexView<'a> {
    pub baby: &'a PregnancyProgress,
    pub dates: &'a [DateEntry],
    pub agenda: &'a [AgendaItem],
}

/// Escape text for use inside HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_index(view: &IndexView<'_>) -> String {
    let baby = view.baby;
    let name = escape_html(baby.name.as_deref().unwrap_or("Baby"));
    let bar_trimester = baby.progress.trimester.clamp(0, 100);
    let bar_pregnancy = baby.progress.pregnancy.clamp(0, 100);

    let mut html = String::with_capacity(4096);
    // Writing to a String cannot fail.
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{name}</title>
<link rel="stylesheet" href="/style.css">
</head>
<body>
<main class="dashboard">
<header>
<img id="avatar" src="/boss-baby.png" alt="{name}">
<h1>{name}</h1>
</header>
<section class="summary">
<p class="age"><span class="number">{weeks}</span> weeks and <span class="number">{days}</span> days</p>
<p class="due">Due date: <time datetime="{due}">{due_long}</time> ({days_left} days left)</p>
<p class="trimester">Trimester {trimester}</p>
</section>
<section class="progress">
<h2>Trimester</h2>
<div class="progress_bar"><div class="progress_bar_fill" data-percentage="{bar_trimester}"></div></div>
<h2>Pregnancy</h2>
<div class="progress_bar"><div class="progress_bar_fill" data-percentage="{bar_pregnancy}"></div></div>
</section>
"#,
        weeks = baby.weeks,
        days = baby.days,
        due = baby.due.format("%Y-%m-%d"),
        due_long = baby.due.format("%-d %B %Y"),
        days_left = baby.days_left,
        trimester = baby.trimester,
    );

    if !view.dates.is_empty() {
        html.push_str("<section class=\"dates\">\n<h2>Dates</h2>\n<ul>\n");
        for entry in view.dates {
            let _ = writeln!(
                html,
                "<li><span class=\"date\">{}</span> {}</li>",
                escape_html(&entry.date),
                escape_html(&entry.description)
            );
        }
        html.push_str("</ul>\n</section>\n");
    }

    html.push_str("<section class=\"agenda\">\n<h2>Agenda</h2>\n");
    if view.agenda.is_empty() {
        html.push_str("<p class=\"empty\">Nothing planned.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for item in view.agenda {
            let when = if item.all_day {
                item.datetime.format("%Y-%m-%d").to_string()
            } else {
                item.datetime.format("%Y-%m-%d %H:%M").to_string()
            };
            let _ = writeln!(
                html,
                "<li><span class=\"date\">{}</span> {}</li>",
                when,
                escape_html(&item.description)
            );
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n</main>\n<script src=\"/script.js\"></script>\n</body>\n</html>\n");
    html
}
