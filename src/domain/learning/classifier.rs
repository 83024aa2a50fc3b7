//! Classifier capability

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Default colors cycled over classes that declare none
pub const DEFAULT_CLASS_COLORS: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

/// One classifier output class: key, display label and optional color
///
/// Keys are coerced to strings at definition time so numeric class sets and
/// submitted form values compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    key: String,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

impl ClassDef {
    pub fn new(key: impl ToString, label: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            label: label.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }
}

/// Assigns default colors to classes without an explicit one.
///
/// Explicit colors pass through unchanged; the palette advances only when a
/// default is consumed, cycling past eight assignments.
pub(crate) fn assign_colors(classes: &[ClassDef]) -> Vec<ClassDef> {
    let mut palette = DEFAULT_CLASS_COLORS.iter().cycle();

    classes
        .iter()
        .map(|class| {
            let mut class = class.clone();
            if class.color.is_none() {
                class.color = palette.next().map(|color| (*color).to_string());
            }
            class
        })
        .collect()
}

/// Output schema for plain and multi-label classification
#[derive(Debug, Clone, Default)]
pub struct ClassifierSpec {
    classes: Vec<ClassDef>,
    multilabel: bool,
}

impl ClassifierSpec {
    pub fn new(classes: Vec<ClassDef>) -> Self {
        Self {
            classes,
            multilabel: false,
        }
    }

    pub fn with_multilabel(mut self, multilabel: bool) -> Self {
        self.multilabel = multilabel;
        self
    }

    pub fn is_multilabel(&self) -> bool {
        self.multilabel
    }

    /// The declared classes. Configuration error when empty.
    pub fn classes(&self) -> Result<&[ClassDef], DomainError> {
        if self.classes.is_empty() {
            return Err(DomainError::configuration(
                "classifier model is missing classes",
            ));
        }

        Ok(&self.classes)
    }

    /// The declared classes with a color assigned to every entry
    pub fn classes_with_colors(&self) -> Result<Vec<ClassDef>, DomainError> {
        Ok(assign_colors(self.classes()?))
    }

    /// Maps a class key to its display label, falling back to the key itself
    pub fn display_label(&self, key: &str) -> String {
        self.classes
            .iter()
            .find(|class| class.key() == key)
            .map(|class| class.label().to_string())
            .unwrap_or_else(|| key.to_string())
    }
}
