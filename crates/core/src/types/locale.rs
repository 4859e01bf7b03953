//! Locales supported by the storefront.

use serde::{Deserialize, Serialize};

/// Language a user interacts with the bot in.
///
/// Controls status labels and notification templates only; catalog text is
/// stored as entered by the shop owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Uzbek (default for new users).
    #[default]
    Uz,
    /// Russian.
    Ru,
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uz => write!(f, "uz"),
            Self::Ru => write!(f, "ru"),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uz" => Ok(Self::Uz),
            "ru" => Ok(Self::Ru),
            _ => Err(format!("unknown locale: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_roundtrip() {
        for locale in [Locale::Uz, Locale::Ru] {
            let parsed: Locale = locale.to_string().parse().expect("roundtrip");
            assert_eq!(parsed, locale);
        }
    }

    #[test]
    fn test_unknown_locale_rejected() {
        assert!("en".parse::<Locale>().is_err());
    }

    #[test]
    fn test_default_is_uzbek() {
        assert_eq!(Locale::default(), Locale::Uz);
    }
}
