//! Rule presets for common configurations.

use crate::{
    CrossRoleCalls, ExternalCalls, FieldRules, LifecycleRoutines, LocalCalls, LocalVariableTypes,
    NoConstructors, NoInnerTypes, NoRecursion, NoThrownErrors, NoTryBlocks, RequireRoleTags,
    SketchDeclaration, UserRoutines,
};
use sketch_lint_core::{Config, RuleBox};

/// Preset configurations for sketch-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every rule with its default options.
    Recommended,
    /// Every rule; static calls on library types are rejected.
    Strict,
    /// Every rule; fields need no role tag.
    Relaxed,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Relaxed => relaxed_rules(),
        }
    }

    /// Preset name as accepted on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Relaxed => "relaxed",
        }
    }
}

fn rule_set(tag_fields: bool, allow_static_library_calls: bool) -> Vec<RuleBox> {
    vec![
        Box::new(SketchDeclaration::new()),
        Box::new(NoInnerTypes::new()),
        Box::new(NoConstructors::new()),
        Box::new(NoTryBlocks::new()),
        Box::new(NoThrownErrors::new()),
        Box::new(RequireRoleTags::new().tag_fields(tag_fields)),
        Box::new(FieldRules::new()),
        Box::new(LifecycleRoutines::new()),
        Box::new(UserRoutines::new()),
        Box::new(LocalCalls::new()),
        Box::new(NoRecursion::new()),
        Box::new(CrossRoleCalls::new()),
        Box::new(ExternalCalls::new().allow_static_library_calls(allow_static_library_calls)),
        Box::new(LocalVariableTypes::new()),
    ]
}

/// Returns the recommended set of rules.
///
/// All sketch rules (SK010 to SK024) with default options.
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    rule_set(true, true)
}

/// Returns the strict set of rules.
///
/// Like [`recommended_rules`], but `external-calls` also rejects
/// `Type.call()` on library types.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    rule_set(true, false)
}

/// Returns the relaxed set of rules.
///
/// Like [`recommended_rules`], but `require-role-tags` only looks at routines.
#[must_use]
pub fn relaxed_rules() -> Vec<RuleBox> {
    rule_set(false, true)
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    recommended_rules()
}

/// Returns all rules with options read from `[rules.<name>]` tables.
///
/// Enablement and severity overrides are applied by the analyzer.
#[must_use]
pub fn configured_rules(config: &Config) -> Vec<RuleBox> {
    rule_set(
        config.rule_bool(crate::require_role_tags::NAME, "tag_fields", true),
        config.rule_bool(
            crate::external_calls::NAME,
            "allow_static_library_calls",
            true,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_preset_rules() {
        for preset in [Preset::Recommended, Preset::Strict, Preset::Relaxed] {
            assert_eq!(preset.rules().len(), 14, "{}", preset.name());
        }
    }

    #[test]
    fn test_codes_and_names_are_unique() {
        let rules = all_rules();
        let codes: BTreeSet<&str> = rules.iter().map(|r| r.code()).collect();
        let names: BTreeSet<&str> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(codes.len(), rules.len());
        assert_eq!(names.len(), rules.len());
        assert!(rules.iter().all(|r| !r.description().is_empty()));
    }

    #[test]
    fn test_configured_rules_read_options() {
        let config = Config::parse(
            r#"
[rules.external-calls]
allow_static_library_calls = false
"#,
        )
        .unwrap();
        assert_eq!(configured_rules(&config).len(), 14);
    }
}
