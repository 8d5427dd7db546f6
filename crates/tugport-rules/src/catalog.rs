//! The rule catalog and pipeline assembly from configuration.

use tracing::debug;
use tugport_core::config::Config;
use tugport_core::output::RuleInfo;

use crate::engine::{Pipeline, Stage};
use crate::error::RuleError;
use crate::rule::Rule;
use crate::rules::{
    AnnotationToAttribute, CollectUnderscoredMethods, DowngradeMatchToSwitch,
    ExtractRouteNameConstants,
};

type Factory = fn() -> Box<dyn Rule>;

fn boxed<R: Rule + Default + 'static>() -> Box<dyn Rule> {
    Box::new(R::default())
}

/// Named rule constructors.
pub struct RuleSet {
    entries: Vec<(&'static str, Factory)>,
}

impl RuleSet {
    /// Every built-in rule, in default run order.
    pub fn standard() -> Self {
        RuleSet {
            entries: vec![
                ("downgrade_match_to_switch", boxed::<DowngradeMatchToSwitch> as Factory),
                ("annotation_to_attribute", boxed::<AnnotationToAttribute>),
                ("extract_route_name_constants", boxed::<ExtractRouteNameConstants>),
                ("collect_underscored_methods", boxed::<CollectUnderscoredMethods>),
            ],
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == name)
    }

    /// A fresh instance of the named rule.
    pub fn create(&self, name: &str) -> Option<Box<dyn Rule>> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, factory)| factory())
    }

    /// Catalog entries; `enabled` lists the configured rules (empty = all).
    pub fn info(&self, enabled: &[String]) -> Vec<RuleInfo> {
        self.entries
            .iter()
            .map(|(name, factory)| {
                let rule = factory();
                RuleInfo {
                    name: name.to_string(),
                    description: rule.description().to_string(),
                    node_kinds: rule.node_kinds().to_vec(),
                    enabled: enabled.is_empty() || enabled.iter().any(|e| e == name),
                }
            })
            .collect()
    }

    /// One stage per configured rule, in configuration order, configured
    /// from `config`.
    pub fn pipeline(&self, config: &Config) -> Result<Pipeline, RuleError> {
        let selected: Vec<&str> = if config.tugport.rules.is_empty() {
            self.names().collect()
        } else {
            config.tugport.rules.iter().map(String::as_str).collect()
        };

        let mut pipeline = Pipeline::new();
        for name in selected {
            let rule = self.create(name).ok_or_else(|| {
                RuleError::invalid_configuration(
                    name,
                    format!(
                        "unknown rule (available: {})",
                        self.names().collect::<Vec<_>>().join(", ")
                    ),
                )
            })?;
            pipeline = pipeline.with_stage(Stage::new().with_rule(rule));
        }
        pipeline.configure(&config.rule_config())?;
        debug!(stages = pipeline.stages().len(), "assembled pipeline");
        Ok(pipeline)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_names() {
        let rules = RuleSet::standard();
        let names: Vec<_> = rules.names().collect();
        assert_eq!(
            names,
            vec![
                "downgrade_match_to_switch",
                "annotation_to_attribute",
                "extract_route_name_constants",
                "collect_underscored_methods",
            ]
        );
        for name in names {
            assert_eq!(rules.create(name).unwrap().name(), name);
        }
        assert!(rules.create("nope").is_none());
    }

    #[test]
    fn test_empty_rule_list_runs_everything() {
        let pipeline = RuleSet::standard().pipeline(&Config::default()).unwrap();
        assert_eq!(pipeline.stages().len(), 4);
    }

    #[test]
    fn test_configured_order_is_kept() {
        let config = Config::from_toml_str(
            r#"
[tugport]
rules = ["collect_underscored_methods", "downgrade_match_to_switch"]
"#,
        )
        .unwrap();
        let pipeline = RuleSet::standard().pipeline(&config).unwrap();
        let names: Vec<&str> = pipeline
            .stages()
            .iter()
            .flat_map(|stage| stage.rules().map(|rule| rule.name()))
            .collect();
        assert_eq!(
            names,
            vec!["collect_underscored_methods", "downgrade_match_to_switch"]
        );
    }

    #[test]
    fn test_unknown_rule_is_invalid_configuration() {
        let config = Config::from_toml_str("[tugport]\nrules = [\"bogus\"]\n").unwrap();
        let err = RuleSet::standard().pipeline(&config).err().unwrap();
        assert!(matches!(err, RuleError::InvalidConfiguration { ref rule, .. } if rule == "bogus"));
    }

    #[test]
    fn test_info_marks_enabled_rules() {
        let info = RuleSet::standard().info(&["annotation_to_attribute".to_string()]);
        let enabled: Vec<&str> = info
            .iter()
            .filter(|rule| rule.enabled)
            .map(|rule| rule.name.as_str())
            .collect();
        assert_eq!(enabled, vec!["annotation_to_attribute"]);
        let match_rule = &info[0];
        assert!(match_rule.node_kinds.contains(&tugport_ast::NodeKind::Return));
    }
}
