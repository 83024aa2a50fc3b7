//! Domain layer: learning model definitions, documents and label records

pub mod document;
pub mod error;
pub mod label;
pub mod learning;

pub use error::DomainError;
