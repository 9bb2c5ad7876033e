use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::ids::ChildId;

/// Consecutive-day activity record for a learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub child_id: ChildId,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
}

/// Result of recording a day of activity against a streak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreakChange {
    /// Already active today; nothing to write.
    Unchanged,
    /// First activity ever; a new record must be created.
    Started(Streak),
    /// Active yesterday; the streak grew by one.
    Extended(Streak),
    /// Gap of two or more days (or no recorded date); the streak restarted at 1.
    Reset(Streak),
}

impl StreakChange {
    /// The record to persist, if any.
    #[must_use]
    pub fn updated(&self) -> Option<&Streak> {
        match self {
            StreakChange::Unchanged => None,
            StreakChange::Started(s) | StreakChange::Extended(s) | StreakChange::Reset(s) => {
                Some(s)
            }
        }
    }
}

impl Streak {
    #[must_use]
    pub fn first_day(child_id: ChildId, today: NaiveDate) -> Self {
        Self {
            child_id,
            current_streak: 1,
            longest_streak: 1,
            last_activity_date: Some(today),
        }
    }

    /// Apply one day of activity to an optional existing streak.
    #[must_use]
    pub fn record_activity(existing: Option<&Streak>, child_id: ChildId, today: NaiveDate) -> StreakChange {
        let Some(streak) = existing else {
            return StreakChange::Started(Self::first_day(child_id, today));
        };

        let yesterday = today.checked_sub_days(Days::new(1));
        match streak.last_activity_date {
            Some(last) if last == today => StreakChange::Unchanged,
            Some(last) if Some(last) == yesterday => {
                let current = streak.current_streak.saturating_add(1);
                StreakChange::Extended(Self {
                    child_id: streak.child_id,
                    current_streak: current,
                    longest_streak: current.max(streak.longest_streak),
                    last_activity_date: Some(today),
                })
            }
            _ => StreakChange::Reset(Self {
                child_id: streak.child_id,
                current_streak: 1,
                longest_streak: streak.longest_streak.max(1),
                last_activity_date: Some(today),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn child() -> ChildId {
        ChildId::new(Uuid::nil())
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn streak(current: u32, longest: u32, last: NaiveDate) -> Streak {
        Streak {
            child_id: child(),
            current_streak: current,
            longest_streak: longest,
            last_activity_date: Some(last),
        }
    }

    #[test]
    fn yesterday_extends_streak() {
        let change = Streak::record_activity(Some(&streak(3, 3, day(9))), child(), day(10));
        let StreakChange::Extended(s) = change else {
            panic!("expected extension, got {change:?}");
        };
        assert_eq!(s.current_streak, 4);
        assert_eq!(s.longest_streak, 4);
        assert_eq!(s.last_activity_date, Some(day(10)));
    }

    #[test]
    fn extension_keeps_larger_longest() {
        let change = Streak::record_activity(Some(&streak(3, 12, day(9))), child(), day(10));
        assert_eq!(change.updated().unwrap().longest_streak, 12);
        assert_eq!(change.updated().unwrap().current_streak, 4);
    }

    #[test]
    fn same_day_is_unchanged() {
        let change = Streak::record_activity(Some(&streak(3, 5, day(10))), child(), day(10));
        assert_eq!(change, StreakChange::Unchanged);
        assert!(change.updated().is_none());
    }

    #[test]
    fn gap_resets_to_one() {
        let change = Streak::record_activity(Some(&streak(6, 6, day(7))), child(), day(10));
        let StreakChange::Reset(s) = change else {
            panic!("expected reset, got {change:?}");
        };
        assert_eq!(s.current_streak, 1);
        assert_eq!(s.longest_streak, 6);
    }

    #[test]
    fn two_days_ago_resets() {
        let change = Streak::record_activity(Some(&streak(2, 2, day(8))), child(), day(10));
        assert!(matches!(change, StreakChange::Reset(_)));
    }

    #[test]
    fn missing_record_starts_at_one() {
        let change = Streak::record_activity(None, child(), day(10));
        assert_eq!(change, StreakChange::Started(Streak::first_day(child(), day(10))));
    }

    #[test]
    fn month_boundary_counts_as_yesterday() {
        let feb_end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let change = Streak::record_activity(Some(&streak(1, 1, feb_end)), child(), day(1));
        assert!(matches!(change, StreakChange::Extended(ref s) if s.current_streak == 2));
    }
}
