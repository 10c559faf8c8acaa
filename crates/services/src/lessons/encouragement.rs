use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use lesson_core::sequencer::{SequencerObserver, Step, Transition};

pub const ENCOURAGEMENTS: [&str; 8] = [
    "Wow, you're amazing!",
    "Incredible work! You're a star!",
    "Perfect! You're doing great!",
    "Excellent! Keep it up!",
    "Outstanding! You're a natural!",
    "Fantastic! You're on fire!",
    "Brilliant! You're unstoppable!",
    "Superb! You're incredible!",
];

pub const LESSON_COMPLETE: &str = "Lesson complete!";

/// Shared queue of messages waiting to be shown.
#[derive(Clone, Default)]
pub struct Encouragements {
    queue: Arc<Mutex<VecDeque<String>>>,
}

impl Encouragements {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending message, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<String> {
        match self.queue.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn push(&self, message: impl Into<String>) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(message.into());
        }
    }
}

/// Sequencer observer that cheers on correct answers and on finishing the lesson.
pub struct EncouragementFeed {
    rng: StdRng,
    out: Encouragements,
}

impl EncouragementFeed {
    #[must_use]
    pub fn new(rng: StdRng, out: Encouragements) -> Self {
        Self { rng, out }
    }
}

impl SequencerObserver for EncouragementFeed {
    fn on_answer(&mut self, _step: Step, correct: bool) {
        if !correct {
            return;
        }
        if let Some(message) = ENCOURAGEMENTS.choose(&mut self.rng) {
            self.out.push(*message);
        }
    }

    fn on_transition(&mut self, transition: &Transition) {
        if transition.to.step == Step::Completion {
            self.out.push(LESSON_COMPLETE);
        }
    }
}
