/// Severity of a named invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintLevel {
    /// Blocks construction when violated.
    Rule,
    /// Reported, never blocks.
    Warning,
}

/// A named invariant declared on a type, e.g. `prr-1`.
///
/// The predicate itself lives next to the type that declares it; this is the
/// metadata reported when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub key: &'static str,
    pub level: ConstraintLevel,
    pub location: &'static str,
    pub description: &'static str,
    pub expression: &'static str,
}

impl Constraint {
    pub const fn rule(
        key: &'static str,
        location: &'static str,
        description: &'static str,
        expression: &'static str,
    ) -> Self {
        Self {
            key,
            level: ConstraintLevel::Rule,
            location,
            description,
            expression,
        }
    }

    pub const fn warning(
        key: &'static str,
        location: &'static str,
        description: &'static str,
        expression: &'static str,
    ) -> Self {
        Self {
            key,
            level: ConstraintLevel::Warning,
            location,
            description,
            expression,
        }
    }

    pub fn is_rule(&self) -> bool {
        self.level == ConstraintLevel::Rule
    }
}
