use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::SortError;

/// Locale used for String collation.
///
/// The `C` and `POSIX` locales compare bytes. Any other tag selects Unicode collation
/// where base letters dominate, then accents, then case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locale {
    tag: String,
}

impl Locale {
    pub fn new(tag: &str) -> Locale {
        Locale {
            tag: tag.trim().to_string(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_posix(&self) -> bool {
        let base = self.tag.split('.').next().unwrap_or_default();
        base.eq_ignore_ascii_case("C") || base.eq_ignore_ascii_case("POSIX")
    }

    /// Create a [Collator] for this locale
    pub fn collator(&self, strength: Strength) -> Collator {
        Collator {
            posix: self.is_posix(),
            strength,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::new("en-US")
    }
}

impl FromStr for Locale {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        let valid = !tag.is_empty()
            && tag.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'));
        if valid {
            Ok(Locale::new(tag))
        } else {
            Err(SortError::invalid_rule(format!("invalid locale: {s}")))
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag)
    }
}

/// Collation strength
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strength {
    /// Only base letters are significant
    Primary,
    /// Base letters, then accents, then case
    Tertiary,
}

#[derive(Clone, Debug)]
pub struct Collator {
    posix: bool,
    strength: Strength,
}

impl Collator {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        if self.posix {
            return match self.strength {
                Strength::Primary => {
                    a.bytes().map(|c| c.to_ascii_lowercase())
                        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
                }
                Strength::Tertiary => { a.as_bytes().cmp(b.as_bytes()) }
            };
        }

        let primary = primary_key(a).cmp(primary_key(b));
        if primary != Ordering::Equal || self.strength == Strength::Primary {
            return primary;
        }

        secondary_key(a).cmp(secondary_key(b))
            .then_with(|| tertiary_key(a).cmp(tertiary_key(b)))
    }
}

fn primary_key(s: &str) -> impl Iterator<Item=char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn secondary_key(s: &str) -> impl Iterator<Item=char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

// lowercase sorts before uppercase
fn tertiary_key(s: &str) -> impl Iterator<Item=bool> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
}
