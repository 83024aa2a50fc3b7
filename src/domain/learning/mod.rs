//! Learning model definitions, capabilities and the model registry

mod classifier;
mod model;
mod ner;
mod registry;

pub use classifier::{ClassDef, ClassifierSpec, DEFAULT_CLASS_COLORS};
pub use model::{LearningModel, ModelTask};
pub use ner::{
    DEFAULT_OUTSIDE_CLASS, DEFAULT_OUTSIDE_DISPLAY, NerSpec, Tokenizer, WordTokenizer,
};
pub use registry::{LearningModelProvider, ModelLibrary, ModelRegistry, discover};
