use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A layer of the token hierarchy. Also the namespace prefix of references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Base,
    Brand,
    Sys,
}

impl Tier {
    /// All tiers in build order.
    pub const ALL: [Tier; 3] = [Tier::Base, Tier::Brand, Tier::Sys];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Brand => "brand",
            Self::Sys => "sys",
        }
    }

    /// Source folder of the tier, relative to the tokens root.
    pub fn folder(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Brand => "sys/brand",
            Self::Sys => "sys",
        }
    }

    /// Parse a reference namespace (the first path segment).
    pub fn from_namespace(segment: &str) -> Option<Self> {
        match segment {
            "base" => Some(Self::Base),
            "brand" => Some(Self::Brand),
            "sys" => Some(Self::Sys),
            _ => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_namespace(s).ok_or_else(|| TypeError::UnknownTier(s.to_string()))
    }
}

/// Main or deprecated copy of a tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Main,
    Deprecated,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Main, Variant::Deprecated];

    pub fn is_deprecated(&self) -> bool {
        matches!(self, Self::Deprecated)
    }

    /// Source folder of a tier for this variant, relative to the tokens root.
    pub fn source_folder(&self, tier: Tier) -> String {
        match self {
            Self::Main => tier.folder().to_string(),
            Self::Deprecated => format!("deprecated/{}", tier.folder()),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("main"),
            Self::Deprecated => f.write_str("deprecated"),
        }
    }
}

/// An export target platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Web,
}

impl Platform {
    pub const ALL: [Platform; 1] = [Platform::Web];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(Self::Web),
            other => Err(TypeError::UnknownPlatform(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_round_trips_through_str() {
        for tier in Tier::ALL {
            assert_eq!(tier.as_str().parse::<Tier>().unwrap(), tier);
        }
        assert!("palette".parse::<Tier>().is_err());
    }

    #[test]
    fn brand_lives_under_sys() {
        assert_eq!(Tier::Brand.folder(), "sys/brand");
        assert_eq!(Variant::Deprecated.source_folder(Tier::Brand), "deprecated/sys/brand");
        assert_eq!(Variant::Main.source_folder(Tier::Base), "base");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Tier::Sys).unwrap(), "\"sys\"");
        let platform: Platform = serde_json::from_str("\"web\"").unwrap();
        assert_eq!(platform, Platform::Web);
    }
}
