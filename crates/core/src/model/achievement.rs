use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{BadgeId, ChildId, ModuleId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown achievement type: {0}")]
pub struct AchievementParseError(String);

/// Kinds of achievement a learner can earn.
///
/// The string encoding matches the `achievement_type` column of the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AchievementKind {
    Streak3,
    Streak7,
    Streak30,
    ModuleComplete(u32),
    PerfectQuiz,
    AllComplete,
    Badge(BadgeId),
}

impl AchievementKind {
    /// Streak milestone reached at exactly `current` consecutive days.
    #[must_use]
    pub fn for_streak(current: u32) -> Option<Self> {
        match current {
            3 => Some(Self::Streak3),
            7 => Some(Self::Streak7),
            30 => Some(Self::Streak30),
            _ => None,
        }
    }

    #[must_use]
    pub fn module_complete(module: &ModuleId) -> Option<Self> {
        module.ordinal().map(Self::ModuleComplete)
    }

    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::Streak3 => "3-Day Streak".into(),
            Self::Streak7 => "Week Warrior".into(),
            Self::Streak30 => "Monthly Master".into(),
            Self::ModuleComplete(n) => format!("Module {n} Complete"),
            Self::PerfectQuiz => "Perfect Score".into(),
            Self::AllComplete => "AI Graduate".into(),
            Self::Badge(badge) => format!("Badge: {badge}"),
        }
    }
}

impl fmt::Display for AchievementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Streak3 => f.write_str("streak_3"),
            Self::Streak7 => f.write_str("streak_7"),
            Self::Streak30 => f.write_str("streak_30"),
            Self::ModuleComplete(n) => write!(f, "module_{n}_complete"),
            Self::PerfectQuiz => f.write_str("perfect_quiz"),
            Self::AllComplete => f.write_str("all_complete"),
            Self::Badge(badge) => write!(f, "badge:{badge}"),
        }
    }
}

impl FromStr for AchievementKind {
    type Err = AchievementParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "streak_3" => return Ok(Self::Streak3),
            "streak_7" => return Ok(Self::Streak7),
            "streak_30" => return Ok(Self::Streak30),
            "perfect_quiz" => return Ok(Self::PerfectQuiz),
            "all_complete" => return Ok(Self::AllComplete),
            _ => {}
        }
        if let Some(badge) = s.strip_prefix("badge:").filter(|b| !b.is_empty()) {
            return Ok(Self::Badge(BadgeId::new(badge)));
        }
        s.strip_prefix("module_")
            .and_then(|rest| rest.strip_suffix("_complete"))
            .and_then(|n| n.parse().ok())
            .map(Self::ModuleComplete)
            .ok_or_else(|| AchievementParseError(s.to_owned()))
    }
}

/// An achievement earned by a learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub child_id: ChildId,
    pub kind: AchievementKind,
    pub earned_at: DateTime<Utc>,
}

impl Achievement {
    #[must_use]
    pub fn new(child_id: ChildId, kind: AchievementKind, earned_at: DateTime<Utc>) -> Self {
        Self {
            child_id,
            kind,
            earned_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streak_milestones() {
        assert_eq!(AchievementKind::for_streak(3), Some(AchievementKind::Streak3));
        assert_eq!(AchievementKind::for_streak(7), Some(AchievementKind::Streak7));
        assert_eq!(AchievementKind::for_streak(30), Some(AchievementKind::Streak30));
        assert_eq!(AchievementKind::for_streak(4), None);
    }

    #[test]
    fn encoding_round_trips() {
        let kinds = [
            AchievementKind::Streak7,
            AchievementKind::ModuleComplete(2),
            AchievementKind::PerfectQuiz,
            AchievementKind::AllComplete,
            AchievementKind::Badge(BadgeId::new("ai-detective")),
        ];
        for kind in kinds {
            let parsed: AchievementKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn rejects_unknown_encoding() {
        assert!("first_project".parse::<AchievementKind>().is_err());
        assert!("module_x_complete".parse::<AchievementKind>().is_err());
        assert!("badge:".parse::<AchievementKind>().is_err());
    }

    #[test]
    fn module_complete_uses_module_ordinal() {
        let kind = AchievementKind::module_complete(&ModuleId::new("module-1"));
        assert_eq!(kind, Some(AchievementKind::ModuleComplete(1)));
        assert_eq!(kind.unwrap().to_string(), "module_1_complete");
    }
}
