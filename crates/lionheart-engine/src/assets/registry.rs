use std::collections::HashMap;
use std::rc::Rc;

use crate::api::error::{ConfigError, ConfigResult};
use crate::api::feature::{Blueprint, Feature, FeatureRegistry};
use crate::assets::setup::{EntityPrototype, Setup};

/// A loaded template: parsed setup, spawn prototype and one blueprint per feature.
#[derive(Debug)]
pub struct Template {
    pub setup: Setup,
    pub prototype: EntityPrototype,
    blueprints: Vec<Blueprint>,
}

impl Template {
    pub fn name(&self) -> &str {
        &self.setup.name
    }

    /// Fresh feature instances in attachment order.
    pub fn build_features(&self) -> Vec<Box<dyn Feature>> {
        self.blueprints.iter().map(Blueprint::build).collect()
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.blueprints.iter().map(Blueprint::name)
    }
}

/// Registry of entity templates, each parsed and validated once.
pub struct TemplateRegistry {
    features: FeatureRegistry,
    templates: HashMap<String, Rc<Template>>,
}

impl TemplateRegistry {
    pub fn new(features: FeatureRegistry) -> Self {
        Self {
            features,
            templates: HashMap::new(),
        }
    }

    /// Parse a template and build its feature blueprints.
    /// Any configuration problem is returned here, never at spawn time.
    pub fn load(&mut self, json: &str) -> ConfigResult<Rc<Template>> {
        let setup = Setup::from_json(json)?;
        if self.templates.contains_key(&setup.name) {
            return Err(ConfigError::DuplicateTemplate(setup.name));
        }
        let blueprints = setup
            .features
            .iter()
            .map(|name| self.features.blueprint(&setup, name))
            .collect::<ConfigResult<Vec<_>>>()?;

        log::info!(
            "loaded template `{}` with features {:?}",
            setup.name,
            setup.features
        );
        let template = Rc::new(Template {
            prototype: setup.prototype(),
            setup,
            blueprints,
        });
        self.templates
            .insert(template.setup.name.clone(), Rc::clone(&template));
        Ok(template)
    }

    /// Load several templates, stopping at the first error.
    pub fn load_all<'a>(&mut self, sources: impl IntoIterator<Item = &'a str>) -> ConfigResult<()> {
        for json in sources {
            self.load(json)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Rc<Template>> {
        self.templates.get(name).cloned()
    }

    pub fn require(&self, name: &str) -> ConfigResult<Rc<Template>> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownTemplate(name.to_string()))
    }

    pub fn features(&self) -> &FeatureRegistry {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    thread_local! {
        static PARSED: Cell<u32> = const { Cell::new(0) };
    }

    struct Marker;

    impl Feature for Marker {
        fn name(&self) -> &'static str {
            "marker"
        }
    }

    fn marker(setup: &Setup) -> ConfigResult<Blueprint> {
        PARSED.with(|count| count.set(count.get() + 1));
        if setup.has_node("broken") {
            return Err(setup.invalid("broken", "value", "must not be present"));
        }
        Ok(Blueprint::new("marker", || Box::new(Marker)))
    }

    fn registry() -> TemplateRegistry {
        let mut features = FeatureRegistry::new();
        features.register("marker", marker);
        TemplateRegistry::new(features)
    }

    #[test]
    fn parses_once_and_builds_many() {
        let mut registry = registry();
        PARSED.with(|count| count.set(0));
        registry
            .load(r#"{ "name": "Thing", "features": ["marker", "marker"] }"#)
            .unwrap();
        let template = registry.get("Thing").unwrap();
        for _ in 0..5 {
            assert_eq!(template.build_features().len(), 2);
        }
        assert_eq!(PARSED.with(Cell::get), 2);
        assert_eq!(template.feature_names().collect::<Vec<_>>(), vec!["marker", "marker"]);
    }

    #[test]
    fn duplicate_template_is_rejected() {
        let mut registry = registry();
        registry.load(r#"{ "name": "Thing" }"#).unwrap();
        assert!(matches!(
            registry.load(r#"{ "name": "Thing" }"#),
            Err(ConfigError::DuplicateTemplate(name)) if name == "Thing"
        ));
    }

    #[test]
    fn feature_errors_fail_the_load() {
        let mut registry = registry();
        let err = registry
            .load(r#"{ "name": "Bad", "features": ["marker"], "broken": {} }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(registry.get("Bad").is_none());

        let err = registry
            .load(r#"{ "name": "Worse", "features": ["missing"] }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFeature { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn inverted_animation_fails_the_load() {
        let mut registry = registry();
        let err = registry
            .load(r#"{ "name": "Bad", "animations": { "idle": { "first": 5, "last": 2 } } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref attribute, .. } if attribute == "first"));
        assert!(registry.get("Bad").is_none());
    }

    #[test]
    fn require_reports_unknown_template() {
        let registry = registry();
        assert!(matches!(registry.require("Ghost"), Err(ConfigError::UnknownTemplate(_))));
    }
}
