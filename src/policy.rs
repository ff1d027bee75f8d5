//! Policy resolution: entry override -> database default -> built-in rules.
//!
//! Resolution is kept free of any printing so the same fallback chain drives
//! both what the shell displays and what the generator receives.

use crate::models::PasswordPolicy;

/// Which policy layer a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Override,
    Default,
    BuiltIn,
}

/// A resolved field value with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: Source,
}

/// Every field of a policy resolved against its fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPolicy {
    pub length: Resolved<u32>,
    pub lowercase: Resolved<bool>,
    pub uppercase: Resolved<bool>,
    pub numbers: Resolved<bool>,
    pub special: Resolved<bool>,
}

fn pick<T: Copy>(over: Option<T>, default: Option<T>, builtin: Option<T>, last: T) -> Resolved<T> {
    match (over, default) {
        (Some(value), _) => Resolved {
            value,
            source: Source::Override,
        },
        (None, Some(value)) => Resolved {
            value,
            source: Source::Default,
        },
        (None, None) => Resolved {
            value: builtin.unwrap_or(last),
            source: Source::BuiltIn,
        },
    }
}

/// Resolve an entry override against the database default, field by field.
pub fn resolve(over: &PasswordPolicy, default: &PasswordPolicy) -> ResolvedPolicy {
    let builtin = PasswordPolicy::builtin();
    ResolvedPolicy {
        length: pick(over.length, default.length, builtin.length, 0),
        lowercase: pick(over.use_lowercase, default.use_lowercase, builtin.use_lowercase, true),
        uppercase: pick(over.use_uppercase, default.use_uppercase, builtin.use_uppercase, true),
        numbers: pick(over.use_numbers, default.use_numbers, builtin.use_numbers, true),
        special: pick(over.use_special, default.use_special, builtin.use_special, true),
    }
}

/// The fully-set policy used for generation.
pub fn effective(over: &PasswordPolicy, default: &PasswordPolicy) -> PasswordPolicy {
    over.or(*default).or(PasswordPolicy::builtin())
}

impl ResolvedPolicy {
    /// Character classes in display order. The order is user-visible output.
    pub fn characters(&self) -> [(&'static str, Resolved<bool>); 4] {
        [
            ("lowercase", self.lowercase),
            ("uppercase", self.uppercase),
            ("numbers", self.numbers),
            ("special characters", self.special),
        ]
    }

    fn render(&self, annotation: fn(Source) -> Option<&'static str>) -> Vec<String> {
        let label = |text: String, source: Source| match annotation(source) {
            Some(note) => format!("{text} ({note})"),
            None => text,
        };

        let length = label(self.length.value.to_string(), self.length.source);

        let enabled: Vec<String> = self
            .characters()
            .iter()
            .filter(|(_, field)| field.value)
            .map(|(name, field)| label(name.to_string(), field.source))
            .collect();
        vec![
            format!("Length: {length}"),
            format!("Characters: {}", enabled.join(", ")),
        ]
    }
}

/// Lines describing an entry's effective policy. Values not set on the entry
/// are annotated "(default)".
pub fn describe_entry_policy(over: &PasswordPolicy, default: &PasswordPolicy) -> Vec<String> {
    resolve(over, default).render(|source| match source {
        Source::Override => None,
        Source::Default | Source::BuiltIn => Some("default"),
    })
}

/// Lines describing the database default policy. Fields the default leaves
/// unset show the built-in value without annotation.
pub fn describe_default_policy(default: &PasswordPolicy) -> Vec<String> {
    resolve(&PasswordPolicy::default(), default).render(|_| None)
}
