//! Equipment table and category index compiled into the binary.

use std::collections::BTreeMap;

use super::types::{EquipmentRecord, RangeKm};

pub(super) fn equipment() -> BTreeMap<String, EquipmentRecord> {
    [
        (
            "BrahMos",
            EquipmentRecord::new(
                "Cruise Missile",
                "India-Russia",
                RangeKm::Km(500),
                "Mach 3",
                &["India", "Philippines"],
            ),
        ),
        (
            "Agni-V",
            EquipmentRecord::new(
                "Ballistic Missile",
                "India",
                RangeKm::Km(5000),
                "Mach 24",
                &["India"],
            ),
        ),
        (
            "MQ-9 Reaper",
            EquipmentRecord::new(
                "Drone",
                "USA",
                RangeKm::Km(1850),
                "482 km/h",
                &["USA", "UK", "Italy"],
            ),
        ),
        (
            "T-90",
            EquipmentRecord::new(
                "Tank",
                "Russia",
                RangeKm::Km(550),
                "60 km/h",
                &["Russia", "India", "Algeria"],
            ),
        ),
        (
            "Green Pine",
            EquipmentRecord::new(
                "Radar",
                "Israel",
                RangeKm::Km(500),
                "N/A",
                &["Israel", "India", "South Korea"],
            ),
        ),
    ]
    .into_iter()
    .map(|(name, record)| (name.to_string(), record))
    .collect()
}

pub(super) fn categories() -> BTreeMap<String, Vec<String>> {
    [
        ("missile", &["BrahMos", "Agni-V"][..]),
        ("drone", &["MQ-9 Reaper"][..]),
        ("tank", &["T-90"][..]),
        ("radar", &["Green Pine"][..]),
    ]
    .into_iter()
    .map(|(category, members)| {
        (
            category.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        )
    })
    .collect()
}
