//! Engine options derived from `testport.toml` and the command line.

use std::collections::BTreeSet;

use testport_core::config::{Config, ConfigError};

use crate::rules::RuleId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Rules that are neither reported nor fixed.
    pub disabled: BTreeSet<RuleId>,
    /// When set, only these rules are fixed.
    pub only: Option<BTreeSet<RuleId>>,
    /// Write target type names as short as the using directives allow.
    pub simplify_type_names: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        MigrationOptions {
            disabled: BTreeSet::new(),
            only: None,
            simplify_type_names: true,
        }
    }
}

impl MigrationOptions {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.check_rule_ids(|id| id.parse::<RuleId>().is_ok())?;
        let disabled = config
            .rules
            .disabled
            .iter()
            .filter_map(|id| id.parse().ok())
            .collect();
        Ok(MigrationOptions {
            disabled,
            only: None,
            simplify_type_names: config.rewrite.simplify_type_names,
        })
    }

    /// Restrict fixing to `rules`. An empty list means no restriction.
    pub fn with_only(mut self, rules: impl IntoIterator<Item = RuleId>) -> Self {
        let rules: BTreeSet<RuleId> = rules.into_iter().collect();
        self.only = (!rules.is_empty()).then_some(rules);
        self
    }

    /// Whether findings of `rule` are reported.
    pub fn is_enabled(&self, rule: RuleId) -> bool {
        !self.disabled.contains(&rule)
    }

    /// Whether findings of `rule` are fixed by fix-all.
    pub fn is_selected_for_fix(&self, rule: RuleId) -> bool {
        self.is_enabled(rule)
            && rule.has_fix()
            && self.only.as_ref().is_none_or(|only| only.contains(&rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_everything() {
        let options = MigrationOptions::default();
        assert!(RuleId::ALL.iter().all(|id| options.is_enabled(*id)));
        assert!(options.simplify_type_names);
        assert!(options.is_selected_for_fix(RuleId::Msx100));
        assert!(!options.is_selected_for_fix(RuleId::Msx000));
    }

    #[test]
    fn from_config_reads_disabled_rules() {
        let config = Config::parse(
            "[rules]\ndisabled = [\"MSX100\"]\n[rewrite]\nsimplify_type_names = false\n",
        )
        .unwrap();
        let options = MigrationOptions::from_config(&config).unwrap();
        assert!(!options.is_enabled(RuleId::Msx100));
        assert!(options.is_enabled(RuleId::Msx200));
        assert!(!options.simplify_type_names);
    }

    #[test]
    fn from_config_rejects_unknown_ids() {
        let config = Config::parse("[rules]\ndisabled = [\"MSX999\"]\n").unwrap();
        assert!(matches!(
            MigrationOptions::from_config(&config),
            Err(ConfigError::UnknownRule { id }) if id == "MSX999"
        ));
    }

    #[test]
    fn only_restricts_fixing() {
        let options = MigrationOptions::default().with_only([RuleId::Msx201]);
        assert!(options.is_selected_for_fix(RuleId::Msx201));
        assert!(!options.is_selected_for_fix(RuleId::Msx100));
        // reporting is unaffected
        assert!(options.is_enabled(RuleId::Msx100));

        let unrestricted = MigrationOptions::default().with_only([]);
        assert_eq!(unrestricted.only, None);
    }
}
