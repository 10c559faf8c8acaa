use std::collections::BTreeSet;
use std::fmt;

use chrono::{Days, NaiveDate};

use crate::evaluator::{normalize_english, normalize_translation};
use crate::model::ids::LessonId;
use crate::model::phrase::VocabPair;
use crate::model::placement::Level;

//
// ─── WORD KEY ──────────────────────────────────────────────────────────────────
//

/// Normalized `(english, translation)` identity of a learned word.
///
/// English is trimmed and lower-cased; the translation is trimmed only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordKey {
    english: String,
    translation: String,
}

impl WordKey {
    #[must_use]
    pub fn new(english: &str, translation: &str) -> Self {
        Self {
            english: normalize_english(english),
            translation: normalize_translation(translation).to_owned(),
        }
    }

    #[must_use]
    pub fn from_pair(pair: &VocabPair) -> Self {
        Self::new(&pair.english, &pair.translation)
    }

    #[must_use]
    pub fn english(&self) -> &str {
        &self.english
    }

    #[must_use]
    pub fn translation(&self) -> &str {
        &self.translation
    }
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.english, self.translation)
    }
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// What crediting a completed lesson changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCredit {
    pub lesson_id: LessonId,
    pub newly_completed: bool,
    pub xp_awarded: u32,
    pub total_xp: u32,
    pub new_words: Vec<WordKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// Practice was already recorded for this day.
    Unchanged,
    /// First ever practice day.
    Started,
    /// Practiced yesterday, streak continues.
    Extended,
    /// A day or more was skipped, streak restarts at 1.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub change: StreakChange,
    pub streak: u32,
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Everything persisted about a learner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressRecord {
    level: Level,
    placement_completed: bool,
    completed_lessons: Vec<LessonId>,
    xp: u32,
    streak: u32,
    last_practice: Option<NaiveDate>,
    learned_words: BTreeSet<WordKey>,
}

impl ProgressRecord {
    /// Fresh progress for a new learner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate progress from persisted storage.
    ///
    /// Duplicate lesson ids keep their first position.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_persisted(
        level: Level,
        placement_completed: bool,
        completed_lessons: Vec<LessonId>,
        xp: u32,
        streak: u32,
        last_practice: Option<NaiveDate>,
        learned_words: impl IntoIterator<Item = WordKey>,
    ) -> Self {
        let mut ordered = Vec::with_capacity(completed_lessons.len());
        for id in completed_lessons {
            if !ordered.contains(&id) {
                ordered.push(id);
            }
        }
        Self {
            level,
            placement_completed,
            completed_lessons: ordered,
            xp,
            streak,
            last_practice,
            learned_words: learned_words.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn placement_completed(&self) -> bool {
        self.placement_completed
    }

    /// Completed lessons in the order they were first completed.
    #[must_use]
    pub fn completed_lessons(&self) -> &[LessonId] {
        &self.completed_lessons
    }

    #[must_use]
    pub fn is_completed(&self, lesson_id: LessonId) -> bool {
        self.completed_lessons.contains(&lesson_id)
    }

    /// Most recently completed lessons first.
    #[must_use]
    pub fn recent_lessons(&self, limit: usize) -> Vec<LessonId> {
        self.completed_lessons.iter().rev().take(limit).copied().collect()
    }

    #[must_use]
    pub fn xp(&self) -> u32 {
        self.xp
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn last_practice(&self) -> Option<NaiveDate> {
        self.last_practice
    }

    #[must_use]
    pub fn learned_words(&self) -> &BTreeSet<WordKey> {
        &self.learned_words
    }

    #[must_use]
    pub fn learned_word_count(&self) -> usize {
        self.learned_words.len()
    }

    /// Record the placement result.
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
        self.placement_completed = true;
    }

    /// Credit a completed lesson.
    ///
    /// Only the first completion of a lesson awards XP and folds in its words;
    /// replays leave the record untouched.
    pub fn credit_lesson<'a>(
        &mut self,
        lesson_id: LessonId,
        xp_delta: u32,
        vocab: impl IntoIterator<Item = &'a VocabPair>,
    ) -> LessonCredit {
        if self.is_completed(lesson_id) {
            return LessonCredit {
                lesson_id,
                newly_completed: false,
                xp_awarded: 0,
                total_xp: self.xp,
                new_words: Vec::new(),
            };
        }

        let mut new_words = Vec::new();
        for pair in vocab {
            let key = WordKey::from_pair(pair);
            if self.learned_words.insert(key.clone()) {
                new_words.push(key);
            }
        }

        self.completed_lessons.push(lesson_id);
        self.xp = self.xp.saturating_add(xp_delta);

        LessonCredit {
            lesson_id,
            newly_completed: true,
            xp_awarded: xp_delta,
            total_xp: self.xp,
            new_words,
        }
    }

    /// Update the day streak for practice on `today`.
    pub fn record_practice_on(&mut self, today: NaiveDate) -> StreakUpdate {
        let change = match self.last_practice {
            Some(last) if last == today => StreakChange::Unchanged,
            None => StreakChange::Started,
            Some(last) if today.checked_sub_days(Days::new(1)) == Some(last) => {
                StreakChange::Extended
            }
            Some(_) => StreakChange::Reset,
        };

        match change {
            StreakChange::Unchanged => {}
            StreakChange::Started | StreakChange::Extended => {
                self.streak = self.streak.saturating_add(1);
            }
            StreakChange::Reset => self.streak = 1,
        }
        self.last_practice = Some(today);

        StreakUpdate {
            change,
            streak: self.streak,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn lesson(s: u32, u: u32) -> LessonId {
        LessonId::new(s, u).unwrap()
    }

    #[test]
    fn word_key_normalizes_english_only() {
        let a = WordKey::new("  Good Morning ", "Өглөөний мэнд");
        let b = WordKey::new("good morning", " Өглөөний мэнд ");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "good morning|Өглөөний мэнд");
        assert_ne!(WordKey::new("hey", "сайн уу"), WordKey::new("hey", "Сайн уу"));
    }

    #[test]
    fn first_completion_awards_xp_and_words() {
        let mut progress = ProgressRecord::new();
        let vocab = [VocabPair::new("Hey", "Сайн уу"), VocabPair::new("hey", "Сайн уу")];
        let credit = progress.credit_lesson(lesson(1, 1), 10, vocab.iter());

        assert!(credit.newly_completed);
        assert_eq!(credit.xp_awarded, 10);
        assert_eq!(credit.total_xp, 10);
        assert_eq!(credit.new_words.len(), 1);
        assert_eq!(progress.learned_word_count(), 1);
        assert!(progress.is_completed(lesson(1, 1)));
    }

    #[test]
    fn replay_awards_nothing() {
        let mut progress = ProgressRecord::new();
        let vocab = [VocabPair::new("Hey", "Сайн уу")];
        progress.credit_lesson(lesson(1, 1), 10, vocab.iter());
        let again = progress.credit_lesson(lesson(1, 1), 10, vocab.iter());

        assert!(!again.newly_completed);
        assert_eq!(again.xp_awarded, 0);
        assert_eq!(progress.xp(), 10);
        assert_eq!(progress.completed_lessons().len(), 1);
    }

    #[test]
    fn recent_lessons_are_newest_first() {
        let mut progress = ProgressRecord::new();
        for unit in 1..=4 {
            progress.credit_lesson(lesson(1, unit), 10, std::iter::empty());
        }
        assert_eq!(progress.recent_lessons(3), vec![lesson(1, 4), lesson(1, 3), lesson(1, 2)]);
    }

    #[test]
    fn streak_starts_extends_and_resets() {
        let mut progress = ProgressRecord::new();

        let first = progress.record_practice_on(day(1));
        assert_eq!(first.change, StreakChange::Started);
        assert_eq!(first.streak, 1);

        let same_day = progress.record_practice_on(day(1));
        assert_eq!(same_day.change, StreakChange::Unchanged);
        assert_eq!(same_day.streak, 1);

        let next = progress.record_practice_on(day(2));
        assert_eq!(next.change, StreakChange::Extended);
        assert_eq!(next.streak, 2);

        let gap = progress.record_practice_on(day(5));
        assert_eq!(gap.change, StreakChange::Reset);
        assert_eq!(gap.streak, 1);
        assert_eq!(progress.last_practice(), Some(day(5)));
    }

    #[test]
    fn set_level_marks_placement_done() {
        let mut progress = ProgressRecord::new();
        assert!(!progress.placement_completed());
        progress.set_level(Level::new(3).unwrap());
        assert!(progress.placement_completed());
        assert_eq!(progress.level().value(), 3);
    }

    #[test]
    fn from_persisted_dedupes_lessons() {
        let progress = ProgressRecord::from_persisted(
            Level::beginner(),
            false,
            vec![lesson(1, 1), lesson(1, 2), lesson(1, 1)],
            20,
            2,
            Some(day(3)),
            vec![WordKey::new("hey", "Сайн уу")],
        );
        assert_eq!(progress.completed_lessons(), &[lesson(1, 1), lesson(1, 2)]);
        assert_eq!(progress.learned_word_count(), 1);
    }
}
