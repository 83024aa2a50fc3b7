//! Label persistence and unlabelled-document selection

mod entity;
mod repository;
mod selector;

pub use entity::LabelledDocument;
pub use repository::{LabelStore, in_memory::InMemoryLabelStore};
pub use selector::{random_unlabelled_document, unlabelled_documents};
