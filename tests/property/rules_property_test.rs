// tests/property/rules_property_test.rs

//! Property-based tests for rule evaluation

use davgate::core::acl::enforcer::RuleSet;
use davgate::core::acl::parsed_rules::Rule;
use proptest::prelude::*;

fn arb_path() -> impl Strategy<Value = String> {
    "(/[a-y0-9._-]{1,12}){0,5}"
}

fn arb_rule() -> impl Strategy<Value = Rule> {
    prop_oneof![
        (arb_path(), any::<bool>()).prop_map(|(p, allow)| Rule::prefix(p, allow)),
        ("[a-y]{1,4}", any::<bool>())
            .prop_map(|(p, allow)| Rule::regex(&p, allow).expect("literal regex compiles")),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_empty_rule_set_allows_any_path(path in ".{0,64}") {
        prop_assert!(RuleSet::new().allowed(&path));
    }

    #[test]
    fn test_non_matching_rules_allow(
        path in arb_path(),
        allows in prop::collection::vec(any::<bool>(), 1..=10)
    ) {
        // Generated paths never contain 'z', so none of these match.
        let rules: RuleSet = allows
            .iter()
            .enumerate()
            .map(|(i, allow)| Rule::prefix(format!("/z{i}"), *allow))
            .collect::<Vec<_>>()
            .into();
        prop_assert!(rules.allowed(&path));
    }

    #[test]
    fn test_last_matching_rule_decides(
        earlier in prop::collection::vec(arb_rule(), 0..=20),
        path in arb_path(),
        allow in any::<bool>()
    ) {
        let mut rules = RuleSet::from(earlier);
        rules.push(Rule::prefix(path.clone(), allow));
        prop_assert_eq!(rules.allowed(&path), allow);
    }

    #[test]
    fn test_trailing_non_matching_rules_do_not_change_verdict(
        rules in prop::collection::vec(arb_rule(), 0..=20),
        path in arb_path(),
        padding in 1usize..=5
    ) {
        let base = RuleSet::from(rules.clone());
        let mut padded = RuleSet::from(rules);
        for i in 0..padding {
            padded.push(Rule::prefix(format!("/z{i}"), i % 2 == 0));
        }
        prop_assert_eq!(base.allowed(&path), padded.allowed(&path));
    }

    #[test]
    fn test_verdict_matches_reverse_scan_model(
        rules in prop::collection::vec(arb_rule(), 0..=20),
        path in arb_path()
    ) {
        let expected = rules
            .iter()
            .rev()
            .find(|rule| rule.matches(&path))
            .is_none_or(|rule| rule.allow);
        prop_assert_eq!(RuleSet::from(rules).allowed(&path), expected);
    }
}
