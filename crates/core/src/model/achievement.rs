use crate::model::progress::ProgressRecord;

/// Milestones shown on the learner profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Achievement {
    /// Complete the first lesson.
    FirstSteps,
    /// Keep a 7-day streak.
    WeekWarrior,
    /// Earn 100 XP.
    CenturyClub,
    /// Complete 10 lessons.
    DedicatedLearner,
}

impl Achievement {
    pub const ALL: [Achievement; 4] = [
        Achievement::FirstSteps,
        Achievement::WeekWarrior,
        Achievement::CenturyClub,
        Achievement::DedicatedLearner,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Achievement::FirstSteps => "First Steps",
            Achievement::WeekWarrior => "Week Warrior",
            Achievement::CenturyClub => "Century Club",
            Achievement::DedicatedLearner => "Dedicated Learner",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Achievement::FirstSteps => "Complete your first lesson",
            Achievement::WeekWarrior => "Maintain a 7-day streak",
            Achievement::CenturyClub => "Earn 100 XP",
            Achievement::DedicatedLearner => "Complete 10 lessons",
        }
    }

    #[must_use]
    pub fn is_earned(self, progress: &ProgressRecord) -> bool {
        match self {
            Achievement::FirstSteps => !progress.completed_lessons().is_empty(),
            Achievement::WeekWarrior => progress.streak() >= 7,
            Achievement::CenturyClub => progress.xp() >= 100,
            Achievement::DedicatedLearner => progress.completed_lessons().len() >= 10,
        }
    }

    #[must_use]
    pub fn earned(progress: &ProgressRecord) -> Vec<Achievement> {
        Self::ALL
            .into_iter()
            .filter(|a| a.is_earned(progress))
            .collect()
    }
}
