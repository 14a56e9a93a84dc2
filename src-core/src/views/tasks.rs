//! Smart lists, folder/tag views and saved-filter evaluation

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, FilterCriteria, Snapshot, Task};

/// What the task pane is showing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum View {
    All,
    /// Tasks without a list
    #[default]
    Inbox,
    Today,
    Tomorrow,
    Next7Days,
    List(String),
    /// By tag name
    Tag(String),
    SavedFilter(String),
    /// Unsaved criteria, as shown while building a filter
    Custom(FilterCriteria),
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::All => write!(f, "all"),
            View::Inbox => write!(f, "inbox"),
            View::Today => write!(f, "today"),
            View::Tomorrow => write!(f, "tomorrow"),
            View::Next7Days => write!(f, "next7"),
            View::List(id) => write!(f, "list:{}", id),
            View::Tag(name) => write!(f, "tag:{}", name),
            View::SavedFilter(id) => write!(f, "filter:{}", id),
            View::Custom(_) => write!(f, "custom"),
        }
    }
}

/// Parses `all`, `inbox`, `today`, `tomorrow`, `next7`, `list:<id>`,
/// `tag:<name>` and `filter:<id>`
impl FromStr for View {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((kind, arg)) = s.split_once(':') {
            let arg = arg.trim();
            if arg.is_empty() {
                return Err(DomainError::InvalidInput(format!("View '{}' needs a value", kind)));
            }
            return match kind.to_ascii_lowercase().as_str() {
                "list" => Ok(View::List(arg.to_string())),
                "tag" => Ok(View::Tag(arg.trim_start_matches('#').to_string())),
                "filter" => Ok(View::SavedFilter(arg.to_string())),
                other => Err(DomainError::InvalidInput(format!("Unknown view '{}'", other))),
            };
        }
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(View::All),
            "inbox" => Ok(View::Inbox),
            "today" => Ok(View::Today),
            "tomorrow" => Ok(View::Tomorrow),
            "next7" | "next-7-days" | "week" => Ok(View::Next7Days),
            other => Err(DomainError::InvalidInput(format!("Unknown view '{}'", other))),
        }
    }
}

/// The clock and time zone that date buckets are computed against
#[derive(Debug, Clone, Copy)]
pub struct ViewContext {
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl ViewContext {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Current time in the machine's local zone
    pub fn local() -> Self {
        let now = Local::now();
        Self { now: now.with_timezone(&Utc), offset: now.offset().fix() }
    }

    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now)
    }
}

fn due_on(task: &Task, ctx: &ViewContext, day: Option<NaiveDate>) -> bool {
    match (task.due_date, day) {
        (Some(due), Some(day)) => ctx.local_date(due) == day,
        _ => false,
    }
}

/// Tasks visible in `view`, in snapshot order
pub fn filter_tasks(snapshot: &Snapshot, view: &View, ctx: &ViewContext) -> Vec<Task> {
    let today = ctx.today();
    let keep = |task: &Task| -> bool {
        match view {
            View::All => true,
            View::Inbox => task.list_id.is_none(),
            View::Today => due_on(task, ctx, Some(today)),
            View::Tomorrow => due_on(task, ctx, today.succ_opt()),
            View::Next7Days => match task.due_date {
                Some(due) => due >= ctx.now && due <= ctx.now + Duration::days(7),
                None => false,
            },
            View::List(id) => task.list_id.as_deref() == Some(id.as_str()),
            View::Tag(name) => task.has_tag(name),
            View::SavedFilter(id) => match snapshot.filter(id) {
                Some(filter) => filter.criteria.matches(task),
                None => true,
            },
            View::Custom(criteria) => criteria.matches(task),
        }
    };

    if let View::SavedFilter(id) = view {
        if snapshot.filter(id).is_none() {
            log::debug!("Saved filter {} not found, showing every task", id);
        }
    }
    snapshot.tasks.iter().filter(|t| keep(t)).cloned().collect()
}

/// Newest first; with `by_priority`, higher priority first and newest among equals
pub fn sort_tasks(tasks: &mut [Task], by_priority: bool) {
    tasks.sort_by(|a, b| {
        let newest = b.created_at.cmp(&a.created_at);
        if by_priority {
            b.priority.cmp(&a.priority).then(newest)
        } else {
            newest
        }
    });
}

/// [`filter_tasks`] followed by [`sort_tasks`]
pub fn task_view(snapshot: &Snapshot, view: &View, ctx: &ViewContext, by_priority: bool) -> Vec<Task> {
    let mut tasks = filter_tasks(snapshot, view, ctx);
    sort_tasks(&mut tasks, by_priority);
    tasks
}

pub fn view_title(view: &View, snapshot: &Snapshot) -> String {
    match view {
        View::All => "All Tasks".to_string(),
        View::Inbox => "Inbox".to_string(),
        View::Today => "Today".to_string(),
        View::Tomorrow => "Tomorrow".to_string(),
        View::Next7Days => "Next 7 Days".to_string(),
        View::List(id) => snapshot
            .list(id)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| "Custom List".to_string()),
        View::Tag(name) => format!("#{}", name),
        View::SavedFilter(id) => snapshot
            .filter(id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| "Saved Filter".to_string()),
        View::Custom(_) => "Create Filter".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{List, ListKind, Priority, SavedFilter, StatusFilter};
    use chrono::TimeZone;

    fn ctx() -> ViewContext {
        // 2024-05-10 10:00 at UTC+2
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        ViewContext::new(Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap(), offset)
    }

    fn task(title: &str, created_hour: u32) -> Task {
        let mut t = Task::new(title.to_string());
        t.created_at = Utc.with_ymd_and_hms(2024, 5, 1, created_hour, 0, 0).unwrap();
        t
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_date_buckets_use_local_calendar_day() {
        let mut late_today = task("late today", 1);
        // 23:30 local on the 10th is 21:30 UTC
        late_today.due_date = Some(Utc.with_ymd_and_hms(2024, 5, 10, 21, 30, 0).unwrap());
        let mut early_tomorrow = task("early tomorrow", 2);
        // 00:30 local on the 11th is still the 10th in UTC
        early_tomorrow.due_date = Some(Utc.with_ymd_and_hms(2024, 5, 10, 22, 30, 0).unwrap());
        let undated = task("undated", 3);

        let snapshot = Snapshot {
            tasks: vec![late_today, early_tomorrow, undated],
            ..Default::default()
        };

        assert_eq!(titles(&filter_tasks(&snapshot, &View::Today, &ctx())), vec!["late today"]);
        assert_eq!(titles(&filter_tasks(&snapshot, &View::Tomorrow, &ctx())), vec!["early tomorrow"]);
    }

    #[test]
    fn test_next_seven_days_window() {
        let c = ctx();
        let mut past = task("past", 1);
        past.due_date = Some(c.now - Duration::hours(1));
        let mut soon = task("soon", 2);
        soon.due_date = Some(c.now + Duration::days(3));
        let mut edge = task("edge", 3);
        edge.due_date = Some(c.now + Duration::days(7));
        let mut far = task("far", 4);
        far.due_date = Some(c.now + Duration::days(8));

        let snapshot = Snapshot { tasks: vec![past, soon, edge, far], ..Default::default() };
        assert_eq!(titles(&filter_tasks(&snapshot, &View::Next7Days, &c)), vec!["soon", "edge"]);
    }

    #[test]
    fn test_completed_tasks_stay_in_date_buckets() {
        let c = ctx();
        let mut done = task("done", 1);
        done.due_date = Some(c.now);
        done.is_completed = true;
        let snapshot = Snapshot { tasks: vec![done], ..Default::default() };
        assert_eq!(filter_tasks(&snapshot, &View::Today, &c).len(), 1);
    }

    #[test]
    fn test_inbox_list_and_tag_views() {
        let list = List::new("Work".to_string(), ListKind::Task);
        let mut filed = task("filed", 1);
        filed.list_id = Some(list.id.clone());
        let mut tagged = task("tagged", 2);
        tagged.tags = vec!["home".to_string()];

        let snapshot = Snapshot {
            lists: vec![list.clone()],
            tasks: vec![filed, tagged],
            ..Default::default()
        };
        let c = ctx();
        assert_eq!(titles(&filter_tasks(&snapshot, &View::Inbox, &c)), vec!["tagged"]);
        assert_eq!(titles(&filter_tasks(&snapshot, &View::List(list.id.clone()), &c)), vec!["filed"]);
        assert_eq!(titles(&filter_tasks(&snapshot, &View::Tag("home".to_string()), &c)), vec!["tagged"]);
        assert_eq!(filter_tasks(&snapshot, &View::All, &c).len(), 2);
        assert_eq!(view_title(&View::List(list.id), &snapshot), "Work");
        assert_eq!(view_title(&View::Tag("home".to_string()), &snapshot), "#home");
    }

    #[test]
    fn test_saved_filter_evaluation() {
        let mut hot = task("hot", 1);
        hot.priority = Priority::High;
        let mut hot_done = task("hot done", 2);
        hot_done.priority = Priority::High;
        hot_done.is_completed = true;
        let cold = task("cold", 3);

        let filter = SavedFilter::new(
            "Hot".to_string(),
            FilterCriteria {
                status: StatusFilter::Active,
                priority: Some(Priority::High),
                ..Default::default()
            },
        );
        let snapshot = Snapshot {
            tasks: vec![hot, hot_done, cold],
            filters: vec![filter.clone()],
            ..Default::default()
        };
        let c = ctx();

        let shown = filter_tasks(&snapshot, &View::SavedFilter(filter.id.clone()), &c);
        assert_eq!(titles(&shown), vec!["hot"]);
        assert_eq!(view_title(&View::SavedFilter(filter.id), &snapshot), "Hot");

        // An unknown filter shows everything
        let shown = filter_tasks(&snapshot, &View::SavedFilter("gone".to_string()), &c);
        assert_eq!(shown.len(), 3);
    }

    #[test]
    fn test_sorting() {
        let mut old_high = task("old high", 1);
        old_high.priority = Priority::High;
        let new_low = task("new low", 5);
        let mut mid_high = task("mid high", 3);
        mid_high.priority = Priority::High;

        let mut tasks = vec![old_high.clone(), new_low.clone(), mid_high.clone()];
        sort_tasks(&mut tasks, false);
        assert_eq!(titles(&tasks), vec!["new low", "mid high", "old high"]);

        sort_tasks(&mut tasks, true);
        assert_eq!(titles(&tasks), vec!["mid high", "old high", "new low"]);
    }

    #[test]
    fn test_parse_view() {
        assert_eq!("today".parse::<View>().unwrap(), View::Today);
        assert_eq!("Next7".parse::<View>().unwrap(), View::Next7Days);
        assert_eq!("tag:#home".parse::<View>().unwrap(), View::Tag("home".to_string()));
        assert_eq!("list:abc".parse::<View>().unwrap(), View::List("abc".to_string()));
        assert!("list:".parse::<View>().is_err());
        assert!("someday".parse::<View>().is_err());
        assert_eq!(View::SavedFilter("x".to_string()).to_string(), "filter:x");
    }
}
