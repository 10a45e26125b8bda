use crate::error::ConfigError;

/// A named cardinality constraint over the options which declare membership in it.
///
/// The constraint is expressed as `(min, max)` specified members:
/// * `min = None`: all-or-none; either every member is specified, or none are.
/// * `max = None`: at least `min` members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionGroup {
    name: String,
    min: Option<usize>,
    max: Option<usize>,
}

impl OptionGroup {
    /// Create a group expecting between `min` and `max` of its members.
    pub fn new(name: impl Into<String>, min: Option<usize>, max: Option<usize>) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }

    /// At most one member may be specified.
    pub fn at_most_one(name: impl Into<String>) -> Self {
        Self::new(name, Some(0), Some(1))
    }

    /// Precisely one member must be specified.
    pub fn exactly_one(name: impl Into<String>) -> Self {
        Self::new(name, Some(1), Some(1))
    }

    /// At least one member must be specified.
    pub fn at_least_one(name: impl Into<String>) -> Self {
        Self::new(name, Some(1), None)
    }

    /// Either all members are specified, or none are.
    pub fn all_or_none(name: impl Into<String>) -> Self {
        Self::new(name, None, None)
    }

    /// The group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The minimum number of specified members (`None` means all).
    pub fn min(&self) -> Option<usize> {
        self.min
    }

    /// The maximum number of specified members (`None` means unbounded).
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Whether members exclude each other.
    pub fn is_mutually_exclusive(&self) -> bool {
        self.max == Some(1)
    }

    /// Whether at least one member is required.
    pub fn is_required(&self) -> bool {
        self.min == Some(1)
    }

    /// Whether `actual` specified members (out of `total`) satisfy this group.
    pub fn matches_count(&self, actual: usize, total: usize) -> bool {
        match self.min {
            None => actual == 0 || actual == total,
            Some(min) => actual >= min && self.max.map_or(true, |max| actual <= max),
        }
    }

    /// Check the structural invariants of this declaration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidGroup {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.is_empty() {
            return Err(invalid("the name must not be empty."));
        }

        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => {
                Err(invalid("the minimum exceeds the maximum."))
            }
            (None, Some(_)) => Err(invalid(
                "an all-or-none group (no minimum) cannot declare a maximum.",
            )),
            (_, Some(0)) => Err(invalid("the maximum must be at least 1.")),
            _ => Ok(()),
        }
    }
}
