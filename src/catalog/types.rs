use std::fmt;

use serde::{Deserialize, Serialize};

/// Attributes of one known piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    /// Category label, e.g. "Cruise Missile"
    #[serde(rename = "type")]
    pub kind: String,
    /// Country or coalition of origin
    pub origin: String,
    #[serde(default)]
    pub range_km: RangeKm,
    /// Free-form: a Mach number, km/h, or "N/A"
    pub speed: String,
    /// Operators, in display order
    pub used_by: Vec<String>,
}

impl EquipmentRecord {
    pub fn new(
        kind: impl Into<String>,
        origin: impl Into<String>,
        range_km: RangeKm,
        speed: impl Into<String>,
        used_by: &[&str],
    ) -> Self {
        Self {
            kind: kind.into(),
            origin: origin.into(),
            range_km,
            speed: speed.into(),
            used_by: used_by.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Operational range in kilometres.
///
/// Serialized as a bare integer, or the string `"N/A"` for equipment that has
/// no meaningful range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeKm {
    Km(u32),
    #[default]
    NotApplicable,
}

const NOT_APPLICABLE: &str = "N/A";

impl fmt::Display for RangeKm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeKm::Km(km) => write!(f, "{km}"),
            RangeKm::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl Serialize for RangeKm {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RangeKm::Km(km) => serializer.serialize_u32(*km),
            RangeKm::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

impl<'de> Deserialize<'de> for RangeKm {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::{self, Visitor};

        struct RangeKmVisitor;

        impl<'de> Visitor<'de> for RangeKmVisitor {
            type Value = RangeKm;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a non-negative integer number of km, \"N/A\", or null")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(RangeKm::Km)
                    .map_err(|_| E::custom(format!("range_km {v} is out of range")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                if v < 0 {
                    return Err(E::custom(format!("range_km must not be negative, got {v}")));
                }
                self.visit_u64(v as u64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v.trim().eq_ignore_ascii_case(NOT_APPLICABLE) {
                    Ok(RangeKm::NotApplicable)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(RangeKm::NotApplicable)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(RangeKm::NotApplicable)
            }
        }

        deserializer.deserialize_any(RangeKmVisitor)
    }
}
