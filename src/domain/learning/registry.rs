//! Learning model registry and startup discovery
//!
//! Each host component registers its definitions in a [`ModelLibrary`] and
//! exposes it through a [`LearningModelProvider`]. At startup [`discover`]
//! merges every contributed library into one immutable [`ModelRegistry`],
//! which is then shared read-only for the process lifetime.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::model::LearningModel;
use crate::domain::DomainError;

/// Per-component learning model registry
///
/// Append-only: names are unique and there is no removal operation.
#[derive(Debug, Default)]
pub struct ModelLibrary {
    models: HashMap<String, Arc<LearningModel>>,
}

impl ModelLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model under its validated name.
    ///
    /// Fails with a configuration error when the model has no usable name and
    /// with a duplicate-name error when the name is already taken.
    pub fn register(&mut self, model: LearningModel) -> Result<(), DomainError> {
        let name = model.name()?.to_string();

        if self.models.contains_key(&name) {
            return Err(DomainError::duplicate_model_name(name));
        }

        self.models.insert(name, Arc::new(model));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn into_models(self) -> HashMap<String, Arc<LearningModel>> {
        self.models
    }
}

/// Registration entry point implemented by host components
///
/// Absence of models is not an error; a provider may return an empty library.
pub trait LearningModelProvider: Send + Sync {
    fn learning_models(&self) -> Result<ModelLibrary, DomainError>;
}

/// Process-wide immutable table of registered learning models
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<String, Arc<LearningModel>>,
}

impl ModelRegistry {
    /// Merges component libraries into one flat name-to-definition table.
    ///
    /// A name collision across two libraries fails with the same
    /// duplicate-name error as a collision within one.
    pub fn from_libraries(
        libraries: impl IntoIterator<Item = ModelLibrary>,
    ) -> Result<Self, DomainError> {
        let mut models = HashMap::new();

        for library in libraries {
            for (name, model) in library.into_models() {
                if models.contains_key(&name) {
                    return Err(DomainError::duplicate_model_name(name));
                }
                models.insert(name, model);
            }
        }

        Ok(Self { models })
    }

    /// Pure read; unknown names are the caller's 404 to decide on
    pub fn lookup(&self, name: &str) -> Option<Arc<LearningModel>> {
        self.models.get(name).cloned()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<LearningModel>)> {
        self.models
            .iter()
            .map(|(name, model)| (name.as_str(), model))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Collects every provider's library and merges them (startup discovery).
///
/// Any error here is fatal to startup: a half-discovered registry must not
/// silently shadow definitions.
pub fn discover(
    providers: &[Arc<dyn LearningModelProvider>],
) -> Result<ModelRegistry, DomainError> {
    let mut libraries = Vec::with_capacity(providers.len());

    for provider in providers {
        let library = provider.learning_models()?;
        libraries.push(library);
    }

    let registry = ModelRegistry::from_libraries(libraries)?;
    info!(models = registry.len(), "learning model discovery complete");

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::learning::{ClassDef, ClassifierSpec, ModelTask};

    fn model(name: &str) -> LearningModel {
        LearningModel::new(
            name,
            ModelTask::Classifier(ClassifierSpec::new(vec![
                ClassDef::new(0, "No"),
                ClassDef::new(1, "Yes"),
            ])),
        )
        .with_document_source("documents")
    }

    #[test]
    fn test_register() {
        let mut library = ModelLibrary::new();

        library.register(model("first")).unwrap();
        library.register(model("second")).unwrap();

        assert_eq!(library.len(), 2);
    }

    #[test]
    fn test_register_duplicate_name() {
        let mut library = ModelLibrary::new();
        library.register(model("testmodel")).unwrap();

        let result = library.register(model("testmodel"));
        assert!(matches!(
            result,
            Err(DomainError::DuplicateModelName { .. })
        ));
    }

    #[test]
    fn test_register_unnamed_model_is_configuration_error() {
        let mut library = ModelLibrary::new();

        let result = library.register(model(" "));
        assert!(matches!(
            result,
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_merge_libraries() {
        let mut first = ModelLibrary::new();
        first.register(model("one")).unwrap();

        let mut second = ModelLibrary::new();
        second.register(model("two")).unwrap();

        let registry = ModelRegistry::from_libraries([first, second]).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.lookup("one").is_some());
        assert!(registry.lookup("two").is_some());
    }

    #[test]
    fn test_merge_duplicate_across_libraries() {
        let mut first = ModelLibrary::new();
        first.register(model("shared")).unwrap();

        let mut second = ModelLibrary::new();
        second.register(model("shared")).unwrap();

        let result = ModelRegistry::from_libraries([first, second]);
        assert!(matches!(
            result,
            Err(DomainError::DuplicateModelName { .. })
        ));
    }

    #[test]
    fn test_lookup_unknown_name_is_none() {
        let registry = ModelRegistry::default();
        assert!(registry.lookup("iamnotregistered").is_none());
    }

    #[test]
    fn test_discover() {
        struct Provider(&'static str);

        impl LearningModelProvider for Provider {
            fn learning_models(&self) -> Result<ModelLibrary, DomainError> {
                let mut library = ModelLibrary::new();
                library.register(model(self.0))?;
                Ok(library)
            }
        }

        let providers: Vec<Arc<dyn LearningModelProvider>> =
            vec![Arc::new(Provider("alpha")), Arc::new(Provider("beta"))];

        let registry = discover(&providers).unwrap();
        assert_eq!(registry.names(), vec!["alpha", "beta"]);
    }
}
