//! Attribute tests of the form `[name op value]`.

/// How an attribute value is compared. Mirrors the CSS attribute
/// selector operators (`=`, `~=`, `|=`, `^=`, `$=`, `*=`), plus
/// `Whatever` for a bare presence test and `Invalid` for a matcher that
/// failed validation and can never match.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AttrPattern {
    Invalid,
    Whatever,
    Exact,
    Include,
    Dash,
    Prefix,
    Suffix,
    Substring,
}

/// One `[name op value]` test against a candidate attribute value.
///
/// Validation runs once, in [`AttributeMatcher::new`]: an `Include`
/// matcher whose value is empty or contains whitespace, or a
/// `Prefix`/`Suffix`/`Substring` matcher with an empty value, degrades
/// to `Invalid` instead of erroring. Per-call matching never validates.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeMatcher {
    pub name: String,
    pattern: AttrPattern,
    pub value: String,
}

impl AttributeMatcher {
    pub fn new(
        name: impl Into<String>,
        pattern: AttrPattern,
        value: impl Into<String>,
    ) -> Self {
        let value = value.into();
        let pattern = validate(pattern, &value);
        Self {
            name: name.into(),
            pattern,
            value,
        }
    }

    /// The pattern after validation; may be `Invalid` even if the
    /// matcher was constructed with another pattern.
    pub fn pattern(&self) -> AttrPattern {
        self.pattern
    }

    /// Test one candidate attribute value. Attribute presence is the
    /// caller's concern: a `Whatever` matcher returns true for any
    /// candidate, but only gets called when the attribute exists.
    pub fn matches(&self, candidate: &str) -> bool {
        match self.pattern {
            AttrPattern::Invalid => false,
            AttrPattern::Whatever => true,
            AttrPattern::Exact => candidate == self.value,
            AttrPattern::Include => candidate
                .split_ascii_whitespace()
                .any(|token| token == self.value),
            AttrPattern::Dash => {
                candidate == self.value
                    || candidate
                        .strip_prefix(self.value.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            AttrPattern::Prefix => candidate.starts_with(self.value.as_str()),
            AttrPattern::Suffix => candidate.ends_with(self.value.as_str()),
            AttrPattern::Substring => candidate.contains(self.value.as_str()),
        }
    }
}

fn validate(pattern: AttrPattern, value: &str) -> AttrPattern {
    match pattern {
        AttrPattern::Include => {
            if value.is_empty() || value.contains(char::is_whitespace) {
                AttrPattern::Invalid
            } else {
                pattern
            }
        }
        AttrPattern::Prefix | AttrPattern::Suffix | AttrPattern::Substring => {
            if value.is_empty() {
                AttrPattern::Invalid
            } else {
                pattern
            }
        }
        _ => pattern,
    }
}
