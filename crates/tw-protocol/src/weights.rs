use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Weight every parameter starts from when the user did not mention it.
pub const DEFAULT_WEIGHT: f64 = 0.1;

/// One of the four parameters the optimizer services accept.
///
/// Declaration order is the canonical key order used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeightKey {
    PublicTransport,
    Congestion,
    Emissions,
    OperationalCost,
}

impl WeightKey {
    pub const ALL: [WeightKey; 4] = [
        WeightKey::PublicTransport,
        WeightKey::Congestion,
        WeightKey::Emissions,
        WeightKey::OperationalCost,
    ];

    /// Canonical wire name (`weight_<Param>`), case-sensitive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PublicTransport => "weight_PublicTransport",
            Self::Congestion => "weight_Congestion",
            Self::Emissions => "weight_Emissions",
            Self::OperationalCost => "weight_OperationalCost",
        }
    }

    /// Human-friendly label ("Public Transport").
    pub fn label(&self) -> &'static str {
        match self {
            Self::PublicTransport => "Public Transport",
            Self::Congestion => "Congestion",
            Self::Emissions => "Emissions",
            Self::OperationalCost => "Operational Cost",
        }
    }

    /// All canonical wire names, in order.
    pub fn canonical_names() -> Vec<&'static str> {
        Self::ALL.iter().map(WeightKey::as_str).collect()
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for WeightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key outside the four canonical weight names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weight key: {0}")]
pub struct UnknownWeightKey(pub String);

impl FromStr for WeightKey {
    type Err = UnknownWeightKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownWeightKey(s.to_string()))
    }
}

impl Serialize for WeightKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WeightKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Ordered mapping from the four canonical keys to a weight.
///
/// Serializes as a JSON object in canonical key order. Deserializing fills
/// keys that are absent with [`DEFAULT_WEIGHT`] and rejects unknown keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightVector {
    values: [f64; 4],
}

impl WeightVector {
    /// Every key set to the same value.
    pub fn uniform(value: f64) -> Self {
        Self { values: [value; 4] }
    }

    pub fn get(&self, key: WeightKey) -> f64 {
        self.values[key.index()]
    }

    pub fn set(&mut self, key: WeightKey, value: f64) {
        self.values[key.index()] = value;
    }

    /// Builder-style `set`.
    pub fn with(mut self, key: WeightKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (WeightKey, f64)> + '_ {
        WeightKey::ALL.into_iter().map(|k| (k, self.get(k)))
    }

    /// Apply `f` to each value, keeping the key order.
    pub fn map(&self, mut f: impl FnMut(WeightKey, f64) -> f64) -> Self {
        let mut out = *self;
        for key in WeightKey::ALL {
            out.set(key, f(key, self.get(key)));
        }
        out
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Build a vector from `(name, value)` pairs, starting from the defaults.
    ///
    /// Fails on the first name that is not a canonical key.
    pub fn from_named<'a>(
        entries: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Result<Self, UnknownWeightKey> {
        let mut vector = Self::default();
        for (name, value) in entries {
            vector.set(name.parse()?, value);
        }
        Ok(vector)
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::uniform(DEFAULT_WEIGHT)
    }
}

impl Serialize for WeightVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(WeightKey::ALL.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.as_str(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WeightVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        Self::from_named(raw.iter().map(|(k, v)| (k.as_str(), *v))).map_err(de::Error::custom)
    }
}

/// Round the exact binary value to two decimals, so `0.595` (stored as
/// `0.59499…`) gives `0.59`. Non-finite input passes through.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Render a float the way user-facing sentences show it: integral values
/// keep one decimal (`10.0`), everything else uses the shortest form (`4.21`).
pub fn fmt_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
