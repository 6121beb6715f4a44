//! Validated text primitives.

/// A string that contains at least one non-whitespace character.
///
/// The input is trimmed of leading and trailing whitespace during construction, so
/// `"  Sam "` is stored as `"Sam"` and `"   "` is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredText(String);

impl RequiredText {
    /// Returns `None` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Option<Self> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    /// Builds from an optional payload field; absent and blank are treated alike.
    pub fn from_field(field: Option<&str>) -> Option<Self> {
        field.and_then(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RequiredText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RequiredText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// True when `field` is absent or only whitespace.
pub(crate) fn is_blank(field: Option<&str>) -> bool {
    field.map_or(true, |s| s.trim().is_empty())
}
