//! Quick-add line parsing: `Pay rent tomorrow #home`

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use regex::{Captures, Regex};
use serde::Serialize;

use crate::domain::{require_text, DomainResult, Snapshot, Tag};
use super::tasks::{View, ViewContext};

/// Everything needed to call `add_task`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAdd {
    pub title: String,
    pub due_date: Option<DateTime<Utc>>,
    pub list_id: Option<String>,
    pub tags: Vec<String>,
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#(\w+)").expect("valid tag pattern"))
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:today|tomorrow|next week|in (\d+) days?|(?:on )?(monday|tuesday|wednesday|thursday|friday|saturday|sunday))\b",
        )
        .expect("valid date pattern")
    })
}

fn weekday(name: &str) -> Option<Weekday> {
    name.to_lowercase().parse::<Weekday>().ok()
}

/// Days from `today` to the next `target`, never zero
fn days_until(today: Weekday, target: Weekday) -> i64 {
    let diff = (target.num_days_from_monday() as i64 - today.num_days_from_monday() as i64).rem_euclid(7);
    if diff == 0 {
        7
    } else {
        diff
    }
}

fn phrase_date(caps: &Captures<'_>, ctx: &ViewContext) -> Option<DateTime<Utc>> {
    let phrase = caps.get(0)?.as_str().to_lowercase();
    let days = if phrase == "today" {
        0
    } else if phrase == "tomorrow" {
        1
    } else if phrase == "next week" {
        7
    } else if let Some(n) = caps.get(1) {
        n.as_str().parse::<i64>().ok()?
    } else {
        let target = weekday(caps.get(2)?.as_str())?;
        days_until(ctx.today().weekday(), target)
    };
    ctx.now.checked_add_signed(Duration::try_days(days)?)
}

fn tidy(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a quick-add line in the context of the active view.
///
/// `#word` tokens become tags. The first date phrase (`today`, `tomorrow`,
/// `next week`, `in N days`, a weekday) sets the due date. Both are removed
/// from the title. Without a phrase, Today and Tomorrow views supply the
/// date; list and filter views supply the list and an extra tag.
pub fn quick_add(input: &str, view: &View, snapshot: &Snapshot, ctx: &ViewContext) -> DomainResult<QuickAdd> {
    let mut tags: Vec<String> = Vec::new();
    for caps in tag_re().captures_iter(input) {
        if let Ok(name) = Tag::normalize_name(&caps[1]) {
            if !tags.contains(&name) {
                tags.push(name);
            }
        }
    }
    let mut title = tag_re().replace_all(input, " ").into_owned();

    let phrase = date_re()
        .captures(&title)
        .and_then(|caps| Some((phrase_date(&caps, ctx)?, caps.get(0)?.range())));
    let mut due_date = None;
    if let Some((date, range)) = phrase {
        title.replace_range(range, " ");
        due_date = Some(date);
    }
    let title = require_text("title", &tidy(&title))?;

    let criteria = match view {
        View::Custom(criteria) => Some(criteria.clone()),
        View::SavedFilter(id) => snapshot.filter(id).map(|f| f.criteria.clone()),
        _ => None,
    };

    if due_date.is_none() {
        due_date = match view {
            View::Today => Some(ctx.now),
            View::Tomorrow => Some(ctx.now + Duration::days(1)),
            _ => None,
        };
    }

    let list_id = match view {
        View::List(id) => Some(id.clone()),
        _ => criteria.as_ref().and_then(|c| c.list_id.clone()),
    };

    if let Some(tag) = criteria.and_then(|c| c.tag) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    Ok(QuickAdd { title, due_date, list_id, tags })
}
