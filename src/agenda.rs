//! Task agenda
//!
//! Groups tasks by due date at day granularity: overdue, today, upcoming,
//! and undated. Day boundaries are taken in the caller's timezone.

use crate::item::Item;
use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::Serialize;

/// Tasks bucketed by the calendar day of `remindAt`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agenda {
    pub overdue: Vec<Item>,
    pub today: Vec<Item>,
    pub upcoming: Vec<Item>,
    pub no_date: Vec<Item>,
}

impl Agenda {
    pub fn len(&self) -> usize {
        self.overdue.len() + self.today.len() + self.upcoming.len() + self.no_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bucket `tasks` relative to `today`. Order inside each bucket is kept.
pub fn build<Tz: TimeZone>(tasks: Vec<Item>, today: NaiveDate, tz: &Tz) -> Agenda {
    let mut agenda = Agenda::default();
    for task in tasks {
        let due = task.remind_at.map(|at| at.with_timezone(tz).date_naive());
        match due {
            None => agenda.no_date.push(task),
            Some(day) if day < today => agenda.overdue.push(task),
            Some(day) if day == today => agenda.today.push(task),
            Some(_) => agenda.upcoming.push(task),
        }
    }
    agenda
}

/// Midnight at the start of `date` in `tz`, as UTC
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a `YYYY-MM-DD` due date into local midnight. Invalid input is `None`.
pub fn parse_due_date<Tz: TimeZone>(input: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()?;
    start_of_day(date, tz)
}

/// Local midnight `offset_days` after `today`
pub fn due_in_days<Tz: TimeZone>(offset_days: u64, today: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    start_of_day(today.checked_add_days(Days::new(offset_days))?, tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemType, Source, Status};
    use chrono::FixedOffset;

    fn task(title: &str, remind_at: Option<DateTime<Utc>>) -> Item {
        let now = crate::clock::now();
        Item {
            id: format!("item-{}", title),
            item_type: ItemType::Task,
            project_id: None,
            parent_id: None,
            title: title.into(),
            body: None,
            tags: Vec::new(),
            links: Vec::new(),
            status: Status::Inbox,
            priority: None,
            energy: None,
            time_estimate_min: None,
            remind_at,
            source: Source::Text,
            created_at: now,
            updated_at: now,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_buckets_by_day() {
        let today = day(2024, 3, 10);
        let late_today = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 0).unwrap();
        let tasks = vec![
            task("old", parse_due_date("2024-03-09", &Utc)),
            task("now", Some(late_today)),
            task("soon", due_in_days(1, today, &Utc)),
            task("someday", None),
            task("also-old", parse_due_date("2023-12-31", &Utc)),
        ];

        let agenda = build(tasks, today, &Utc);
        let titles = |items: &[Item]| items.iter().map(|i| i.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(&agenda.overdue), vec!["old", "also-old"]);
        assert_eq!(titles(&agenda.today), vec!["now"]);
        assert_eq!(titles(&agenda.upcoming), vec!["soon"]);
        assert_eq!(titles(&agenda.no_date), vec!["someday"]);
        assert_eq!(agenda.len(), 5);
    }

    #[test]
    fn test_day_boundary_follows_timezone() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        // 20:00 UTC on the 9th is already the 10th in UTC+9
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 20, 0, 0).unwrap();
        let agenda = build(vec![task("t", Some(at))], day(2024, 3, 10), &tz);
        assert_eq!(agenda.today.len(), 1);

        let agenda = build(vec![task("t", Some(at))], day(2024, 3, 10), &Utc);
        assert_eq!(agenda.overdue.len(), 1);
    }

    #[test]
    fn test_parse_due_date() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let parsed = parse_due_date("2024-02-29", &tz).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 2, 29, 5, 0, 0).unwrap());

        assert!(parse_due_date("2023-02-29", &tz).is_none());
        assert!(parse_due_date("tomorrow", &tz).is_none());
    }
}
