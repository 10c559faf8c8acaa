#![forbid(unsafe_code)]

pub mod curriculum;
pub mod repository;
pub mod sqlite;

pub use curriculum::{Curriculum, CurriculumError, CurriculumRepository, Section, Unit};
pub use repository::{InMemoryRepository, ProgressRepository, Storage, StorageError};
