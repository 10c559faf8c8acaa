//! Static curriculum: sections, lessons and the placement test.
//!
//! The built-in curriculum is compiled in from `data/curriculum.json` and
//! validated through the core constructors on load.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use lesson_core::model::{
    BreakdownEntry, ConversationLine, Lesson, LessonError, LessonId, LessonIdError,
    MultipleChoice, PhraseDraft, PhraseError, PhraseId, PlacementError, PlacementKind,
    PlacementQuestion, PlacementTest, Speaker, VocabPair,
};

const BUILTIN_CURRICULUM: &str = include_str!("../data/curriculum.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CurriculumError {
    #[error("invalid curriculum json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    LessonId(#[from] LessonIdError),

    #[error("lesson {lesson}, phrase {phrase}: {source}")]
    Phrase {
        lesson: LessonId,
        phrase: u32,
        #[source]
        source: PhraseError,
    },

    #[error(transparent)]
    Lesson(#[from] LessonError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error("lesson {0} is defined more than once")]
    DuplicateLesson(LessonId),
}

//
// ─── CATALOG TYPES ─────────────────────────────────────────────────────────────
//

/// A unit is one lesson slot in a section, whether or not content exists for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub lesson_id: LessonId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: u32,
    pub title: String,
    pub units: Vec<Unit>,
}

//
// ─── REPOSITORY ────────────────────────────────────────────────────────────────
//

/// Read-only lookup of curriculum content.
pub trait CurriculumRepository: Send + Sync {
    /// Lesson content for `id`, or `None` if the curriculum has none.
    fn get_lesson(&self, id: &LessonId) -> Option<Arc<Lesson>>;

    fn sections(&self) -> &[Section];

    fn placement(&self) -> &PlacementTest;

    fn has_lesson(&self, id: &LessonId) -> bool {
        self.get_lesson(id).is_some()
    }
}

/// In-memory curriculum.
#[derive(Debug, Clone)]
pub struct Curriculum {
    lessons: HashMap<LessonId, Arc<Lesson>>,
    sections: Vec<Section>,
    placement: PlacementTest,
}

impl Curriculum {
    /// Load the curriculum bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` if the bundled data fails validation.
    pub fn builtin() -> Result<Self, CurriculumError> {
        Self::from_json(BUILTIN_CURRICULUM)
    }

    /// Parse and validate a curriculum document.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` on malformed JSON, invalid lesson or phrase
    /// data, an invalid placement test, or a duplicated lesson id.
    pub fn from_json(json: &str) -> Result<Self, CurriculumError> {
        let file: CurriculumFile = serde_json::from_str(json)?;

        let sections = file
            .sections
            .into_iter()
            .map(SectionDto::into_section)
            .collect::<Result<Vec<_>, _>>()?;

        let mut lessons = HashMap::with_capacity(file.lessons.len());
        for dto in file.lessons {
            let lesson = dto.into_lesson()?;
            let id = lesson.id();
            if lessons.insert(id, Arc::new(lesson)).is_some() {
                return Err(CurriculumError::DuplicateLesson(id));
            }
            debug!(lesson = %id, "loaded lesson");
        }

        let placement = PlacementTest::new(
            file.placement
                .into_iter()
                .map(PlacementDto::into_question)
                .collect(),
        )?;

        info!(
            sections = sections.len(),
            lessons = lessons.len(),
            placement_questions = placement.len(),
            "curriculum loaded"
        );

        Ok(Self {
            lessons,
            sections,
            placement,
        })
    }

    /// Lesson ids with content, in id order.
    #[must_use]
    pub fn lesson_ids(&self) -> Vec<LessonId> {
        let mut ids: Vec<LessonId> = self.lessons.keys().copied().collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn unit_title(&self, id: &LessonId) -> Option<&str> {
        self.sections
            .iter()
            .flat_map(|section| section.units.iter())
            .find(|unit| unit.lesson_id == *id)
            .map(|unit| unit.title.as_str())
    }
}

impl CurriculumRepository for Curriculum {
    fn get_lesson(&self, id: &LessonId) -> Option<Arc<Lesson>> {
        self.lessons.get(id).cloned()
    }

    fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn placement(&self) -> &PlacementTest {
        &self.placement
    }
}

//
// ─── JSON SHAPE ────────────────────────────────────────────────────────────────
//

#[derive(Deserialize)]
struct CurriculumFile {
    sections: Vec<SectionDto>,
    placement: Vec<PlacementDto>,
    lessons: Vec<LessonDto>,
}

#[derive(Deserialize)]
struct SectionDto {
    id: u32,
    title: String,
    units: Vec<UnitDto>,
}

#[derive(Deserialize)]
struct UnitDto {
    id: u32,
    title: String,
}

impl SectionDto {
    fn into_section(self) -> Result<Section, CurriculumError> {
        let units = self
            .units
            .into_iter()
            .map(|unit| {
                Ok(Unit {
                    lesson_id: LessonId::new(self.id, unit.id)?,
                    title: unit.title,
                })
            })
            .collect::<Result<Vec<_>, CurriculumError>>()?;
        Ok(Section {
            id: self.id,
            title: self.title,
            units,
        })
    }
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum PlacementDto {
    Choice {
        prompt: String,
        hint: Option<String>,
        options: Vec<String>,
        correct: usize,
    },
    WordBank {
        prompt: String,
        hint: Option<String>,
        words: Vec<String>,
        answer: String,
    },
}

impl PlacementDto {
    fn into_question(self) -> PlacementQuestion {
        match self {
            PlacementDto::Choice {
                prompt,
                hint,
                options,
                correct,
            } => PlacementQuestion {
                prompt,
                hint,
                kind: PlacementKind::Choice { options, correct },
            },
            PlacementDto::WordBank {
                prompt,
                hint,
                words,
                answer,
            } => PlacementQuestion {
                prompt,
                hint,
                kind: PlacementKind::WordBank { words, answer },
            },
        }
    }
}

#[derive(Deserialize)]
enum SpeakerDto {
    A,
    B,
}

#[derive(Deserialize)]
struct LineDto {
    speaker: SpeakerDto,
    text: String,
}

#[derive(Deserialize)]
struct LessonDto {
    id: String,
    conversation: Vec<LineDto>,
    phrases: Vec<PhraseDto>,
}

#[derive(Deserialize)]
struct BreakdownDto {
    word: String,
    meaning: String,
}

#[derive(Deserialize)]
struct VocabDto {
    english: String,
    translation: String,
}

#[derive(Deserialize)]
struct QuestionDto {
    prompt: String,
    options: Vec<String>,
    correct: usize,
}

#[derive(Deserialize)]
struct PhraseDto {
    id: u32,
    text: String,
    translation: String,
    #[serde(default)]
    breakdown: Vec<BreakdownDto>,
    words: Vec<String>,
    #[serde(default)]
    extra_words: Vec<String>,
    vocab_pairs: Vec<VocabDto>,
    questions: Vec<QuestionDto>,
}

impl LessonDto {
    fn into_lesson(self) -> Result<Lesson, CurriculumError> {
        let id: LessonId = self.id.parse()?;

        let conversation = self
            .conversation
            .into_iter()
            .map(|line| {
                let speaker = match line.speaker {
                    SpeakerDto::A => Speaker::A,
                    SpeakerDto::B => Speaker::B,
                };
                ConversationLine::new(speaker, line.text)
            })
            .collect();

        let phrases = self
            .phrases
            .into_iter()
            .map(|phrase| {
                let phrase_id = phrase.id;
                phrase
                    .into_draft()
                    .and_then(PhraseDraft::validate)
                    .map_err(|source| CurriculumError::Phrase {
                        lesson: id,
                        phrase: phrase_id,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Lesson::new(id, conversation, phrases)?)
    }
}

impl PhraseDto {
    fn into_draft(self) -> Result<PhraseDraft, PhraseError> {
        let questions = self
            .questions
            .into_iter()
            .map(|q| MultipleChoice::new(q.prompt, q.options, q.correct))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PhraseDraft {
            id: PhraseId::new(self.id),
            text: self.text,
            translation: self.translation,
            breakdown: self
                .breakdown
                .into_iter()
                .map(|b| BreakdownEntry::new(b.word, b.meaning))
                .collect(),
            words: self.words,
            extra_words: self.extra_words,
            vocab_pairs: self
                .vocab_pairs
                .into_iter()
                .map(|v| VocabPair::new(v.english, v.translation))
                .collect(),
            questions,
        })
    }
}
