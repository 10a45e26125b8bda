use crate::error::ConfigError;

/// A positional value declaration, bound to the inclusive index range `[start, end]` of positional tokens.
///
/// An `end` of `None` makes the value absorb every positional token from `start` onwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueConfig {
    name: String,
    start_index: usize,
    end_index: Option<usize>,
}

impl ValueConfig {
    /// Create a value bound to the property `name`, covering positions `[start, end]`.
    pub fn new(name: impl Into<String>, start_index: usize, end_index: Option<usize>) -> Self {
        Self {
            name: name.into(),
            start_index,
            end_index,
        }
    }

    /// A value covering the single position `index`.
    pub fn at(name: impl Into<String>, index: usize) -> Self {
        Self::new(name, index, Some(index))
    }

    /// A value covering every position from `start` onwards.
    pub fn starting_at(name: impl Into<String>, start_index: usize) -> Self {
        Self::new(name, start_index, None)
    }

    /// The property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The first covered position.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// The last covered position, if bounded.
    pub fn end_index(&self) -> Option<usize> {
        self.end_index
    }

    /// Whether the positional `index` is covered.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && self.end_index.map_or(true, |end| index <= end)
    }

    /// Whether any position is covered by both `self` and `other`.
    pub fn overlaps(&self, other: &ValueConfig) -> bool {
        let (lower, upper) = if self.start_index <= other.start_index {
            (self, other)
        } else {
            (other, self)
        };
        lower.contains(upper.start_index)
    }

    /// Check the structural invariants of this declaration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: self.name.clone(),
                reason: "the name must not be empty.".to_string(),
            });
        }

        if let Some(end) = self.end_index {
            if self.start_index > end {
                return Err(ConfigError::InvalidValue {
                    name: self.name.clone(),
                    reason: format!(
                        "the start index {} exceeds the end index {end}.",
                        self.start_index
                    ),
                });
            }
        }

        Ok(())
    }
}
