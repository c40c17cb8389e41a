//! Template condition expressions.
//!
//! # Responsibility
//! - Parse catalog `condition_code` strings into a tagged union once.
//! - Evaluate parsed expressions against an active condition set.
//!
//! # Invariants
//! - `None`/empty expressions are universal.
//! - `pas_`-prefixed expressions test membership of the literal negative code;
//!   the evaluator never inverts a positive code.
//! - `+` and `|` cannot be mixed in one expression; such input is malformed.
//! - Malformed expressions never match (fail closed).

use crate::engine::conditions::{is_known_condition_code, ConditionSet};
use once_cell::sync::Lazy;
use regex::Regex;

const NEGATED_PREFIX: &str = "pas_";
const AND_SEPARATOR: char = '+';
const OR_SEPARATOR: char = '|';

static CONDITION_OPERAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid condition operand regex"));

/// Parsed form of a template condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionExpr {
    /// No condition: applies to every household.
    Universal,
    /// One code must be active.
    Simple(String),
    /// Every code must be active (`a+b`).
    All(Vec<String>),
    /// At least one code must be active (`a|b`).
    Any(Vec<String>),
    /// The literal `pas_*` code must be active.
    Negated(String),
    /// Unparseable input, kept verbatim for diagnostics.
    Malformed(String),
}

impl ConditionExpr {
    /// Parses a raw catalog expression.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Universal;
        };
        if raw.is_empty() {
            return Self::Universal;
        }

        if raw.starts_with(NEGATED_PREFIX) {
            return match literal(raw) {
                Some(code) => Self::Negated(code),
                None => Self::Malformed(raw.to_string()),
            };
        }

        if raw.contains(AND_SEPARATOR) {
            return match operands(raw, AND_SEPARATOR) {
                Some(codes) => Self::All(codes),
                None => Self::Malformed(raw.to_string()),
            };
        }

        if raw.contains(OR_SEPARATOR) {
            return match operands(raw, OR_SEPARATOR) {
                Some(codes) => Self::Any(codes),
                None => Self::Malformed(raw.to_string()),
            };
        }

        match literal(raw) {
            Some(code) => Self::Simple(code),
            None => Self::Malformed(raw.to_string()),
        }
    }

    /// Evaluates this expression against active conditions.
    pub fn evaluate(&self, active: &ConditionSet) -> bool {
        match self {
            Self::Universal => true,
            Self::Simple(code) | Self::Negated(code) => active.contains(code.as_str()),
            Self::All(codes) => codes.iter().all(|code| active.contains(code.as_str())),
            Self::Any(codes) => codes.iter().any(|code| active.contains(code.as_str())),
            Self::Malformed(_) => false,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    /// Codes referenced by this expression, in declaration order.
    pub fn operands(&self) -> Vec<&str> {
        match self {
            Self::Universal | Self::Malformed(_) => Vec::new(),
            Self::Simple(code) | Self::Negated(code) => vec![code.as_str()],
            Self::All(codes) | Self::Any(codes) => codes.iter().map(String::as_str).collect(),
        }
    }

    /// Referenced codes that the deriver can never emit.
    ///
    /// Such expressions are legal but can only match through other operands.
    pub fn unknown_operands(&self) -> Vec<&str> {
        self.operands()
            .into_iter()
            .filter(|code| !is_known_condition_code(code))
            .collect()
    }
}

/// Returns whether a template with `condition_code` applies to `active`.
pub fn should_assign_task(condition_code: Option<&str>, active: &ConditionSet) -> bool {
    ConditionExpr::parse(condition_code).evaluate(active)
}

/// Whole-expression codes are matched verbatim; padding is malformed.
fn literal(value: &str) -> Option<String> {
    if CONDITION_OPERAND_RE.is_match(value) {
        Some(value.to_string())
    } else {
        None
    }
}

/// Grouped operands tolerate spaces around separators.
fn operand(value: &str) -> Option<String> {
    literal(value.trim())
}

fn operands(raw: &str, separator: char) -> Option<Vec<String>> {
    raw.split(separator).map(operand).collect()
}

#[cfg(test)]
mod tests {
    use super::{should_assign_task, ConditionExpr};
    use crate::engine::conditions::ConditionSet;

    fn set(codes: &[&'static str]) -> ConditionSet {
        codes.iter().copied().collect()
    }

    #[test]
    fn null_expression_is_always_assigned() {
        assert!(should_assign_task(None, &set(&[])));
        assert!(should_assign_task(None, &set(&["maison", "chat"])));
        assert!(should_assign_task(Some(""), &set(&[])));
    }

    #[test]
    fn and_group_requires_every_operand() {
        assert!(!should_assign_task(Some("a+b"), &set(&["a"])));
        assert!(should_assign_task(Some("a+b"), &set(&["a", "b"])));
        assert!(should_assign_task(Some("a + b"), &set(&["a", "b"])));
    }

    #[test]
    fn or_group_requires_any_operand() {
        assert!(should_assign_task(Some("a|b"), &set(&["a"])));
        assert!(should_assign_task(Some("a|b"), &set(&["b"])));
        assert!(!should_assign_task(Some("a|b"), &set(&["c"])));
    }

    #[test]
    fn negated_code_is_literal_membership() {
        assert!(should_assign_task(
            Some("pas_robot_aspirateur"),
            &set(&["pas_robot_aspirateur"])
        ));
        assert!(!should_assign_task(Some("pas_robot_aspirateur"), &set(&[])));
        assert!(!should_assign_task(
            Some("pas_robot_aspirateur"),
            &set(&["robot_laveur"])
        ));
    }

    #[test]
    fn simple_expression_is_membership() {
        assert!(should_assign_task(Some("chat"), &set(&["chat"])));
        assert!(!should_assign_task(Some("chat"), &set(&["chien"])));
    }

    #[test]
    fn parse_builds_expected_variants() {
        assert_eq!(ConditionExpr::parse(None), ConditionExpr::Universal);
        assert_eq!(
            ConditionExpr::parse(Some("jardin+pelouse")),
            ConditionExpr::All(vec!["jardin".to_string(), "pelouse".to_string()])
        );
        assert_eq!(
            ConditionExpr::parse(Some("chat|chien")),
            ConditionExpr::Any(vec!["chat".to_string(), "chien".to_string()])
        );
        assert_eq!(
            ConditionExpr::parse(Some("pas_robot_aspirateur")),
            ConditionExpr::Negated("pas_robot_aspirateur".to_string())
        );
    }

    #[test]
    fn mixed_or_garbled_expressions_fail_closed() {
        let all = set(&["a", "b", "c"]);
        for raw in ["a+b|c", "a+", "|a", "A", "a b", "pas_a+b", "  "] {
            let expr = ConditionExpr::parse(Some(raw));
            assert!(expr.is_malformed(), "{raw} should be malformed");
            assert!(!expr.evaluate(&all), "{raw} should not match");
        }
    }

    #[test]
    fn padded_single_codes_fail_closed() {
        let active = set(&["chat", "pas_robot_aspirateur"]);
        for raw in [" chat ", "chat ", "pas_robot_aspirateur ", " pas_robot_aspirateur"] {
            assert!(ConditionExpr::parse(Some(raw)).is_malformed(), "{raw:?}");
            assert!(!should_assign_task(Some(raw), &active), "{raw:?}");
        }
        assert!(should_assign_task(Some("chat"), &active));
        assert!(should_assign_task(Some("pas_robot_aspirateur"), &active));
    }

    #[test]
    fn unknown_operands_are_reported() {
        let expr = ConditionExpr::parse(Some("chat|licorne"));
        assert_eq!(expr.unknown_operands(), vec!["licorne"]);
        assert!(ConditionExpr::parse(Some("lave_vaisselle"))
            .unknown_operands()
            .is_empty());
    }
}
