//! Resource categories and their category-specific amount schedules.

use serde::{Deserialize, Serialize};

use super::population::group_thousands;

/// One of the six relief resource categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    /// Food and drinking water
    Food,
    /// Medical supplies and staff
    Medical,
    /// Tents and bedding
    Shelter,
    /// Search and rescue teams and heavy equipment
    Rescue,
    /// Phones, radios and power
    Communication,
    /// Transport and fuel
    Logistics,
}

impl ResourceCategory {
    /// All categories in reporting order
    pub const ALL: [ResourceCategory; 6] = [
        ResourceCategory::Food,
        ResourceCategory::Medical,
        ResourceCategory::Shelter,
        ResourceCategory::Rescue,
        ResourceCategory::Communication,
        ResourceCategory::Logistics,
    ];

    /// Lower-case key
    pub fn key(&self) -> &'static str {
        match self {
            ResourceCategory::Food => "food",
            ResourceCategory::Medical => "medical",
            ResourceCategory::Shelter => "shelter",
            ResourceCategory::Rescue => "rescue",
            ResourceCategory::Communication => "communication",
            ResourceCategory::Logistics => "logistics",
        }
    }

    /// Title-cased name for reports
    pub fn title(&self) -> &'static str {
        match self {
            ResourceCategory::Food => "Food",
            ResourceCategory::Medical => "Medical",
            ResourceCategory::Shelter => "Shelter",
            ResourceCategory::Rescue => "Rescue",
            ResourceCategory::Communication => "Communication",
            ResourceCategory::Logistics => "Logistics",
        }
    }

    /// Short description of what the category covers
    pub fn description(&self) -> &'static str {
        match self {
            ResourceCategory::Food => "Emergency food and water supplies",
            ResourceCategory::Medical => "Medical supplies and emergency care",
            ResourceCategory::Shelter => "Emergency shelter and bedding",
            ResourceCategory::Rescue => "Search and rescue equipment",
            ResourceCategory::Communication => "Communication and power equipment",
            ResourceCategory::Logistics => "Transportation and logistics",
        }
    }

    /// How urgently the category must be deployed
    pub fn deployment_priority(&self) -> DeploymentPriority {
        match self {
            ResourceCategory::Medical | ResourceCategory::Rescue => DeploymentPriority::Immediate,
            ResourceCategory::Food | ResourceCategory::Shelter => DeploymentPriority::Within2To4Hours,
            ResourceCategory::Communication | ResourceCategory::Logistics => {
                DeploymentPriority::Within6To8Hours
            }
        }
    }
}

impl std::fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Deployment urgency tag attached to every resource requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentPriority {
    /// Deploy immediately
    Immediate,
    /// Deploy within two to four hours
    Within2To4Hours,
    /// Deploy within six to eight hours
    Within6To8Hours,
}

impl DeploymentPriority {
    /// Instruction text used in summaries
    pub fn instruction(&self) -> &'static str {
        match self {
            DeploymentPriority::Immediate => "Immediate deployment required",
            DeploymentPriority::Within2To4Hours => "Deploy within 2-4 hours",
            DeploymentPriority::Within6To8Hours => "Deploy within 6-8 hours",
        }
    }
}

/// Ordering hint for the whole deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStrategy {
    /// Medical and rescue teams first, then shelter and food
    MedicalAndRescueFirst,
    /// Shelter and rescue equipment first, then medical and food
    ShelterAndRescueFirst,
    /// Everything at once by priority tag
    Simultaneous,
}

impl DeploymentStrategy {
    /// Human-readable strategy line
    pub fn describe(&self) -> &'static str {
        match self {
            DeploymentStrategy::MedicalAndRescueFirst => {
                "Immediate deployment: Medical and rescue teams first, followed by shelter and food"
            }
            DeploymentStrategy::ShelterAndRescueFirst => {
                "Rapid deployment: Shelter and rescue equipment first, followed by medical and food"
            }
            DeploymentStrategy::Simultaneous => {
                "Standard deployment: All resources deployed simultaneously based on priority"
            }
        }
    }
}

/// Food and water quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FoodSupplies {
    /// Meal packets
    pub food_packets: u64,
    /// Drinking water (litres)
    pub water_liters: u64,
}

/// Medical quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MedicalSupplies {
    /// First aid kits
    pub first_aid_kits: u64,
    /// Medicine units
    pub medicines: u64,
    /// Doctors, nurses and paramedics
    pub medical_staff: u64,
    /// Ambulances
    pub ambulances: u64,
}

/// Shelter quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShelterSupplies {
    /// Family tents
    pub tents: u64,
    /// Blankets
    pub blankets: u64,
    /// Sleeping bags
    pub sleeping_bags: u64,
}

/// Search and rescue quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RescueEquipment {
    /// Rescue teams
    pub rescue_teams: u64,
    /// Boats
    pub boats: u64,
    /// Helicopters
    pub helicopters: u64,
    /// Bulldozers
    pub bulldozers: u64,
}

/// Communication quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommunicationEquipment {
    /// Satellite phones
    pub satellite_phones: u64,
    /// Walkie talkies
    pub walkie_talkies: u64,
    /// Generators
    pub generators: u64,
}

/// Logistics quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogisticsSupport {
    /// Distribution trucks
    pub trucks: u64,
    /// Fuel (litres)
    pub fuel_liters: u64,
}

/// Category-specific resource quantities.
///
/// Serialized with a `category` tag so every variant has a fixed schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ResourceAmount {
    /// Food schedule
    Food(FoodSupplies),
    /// Medical schedule
    Medical(MedicalSupplies),
    /// Shelter schedule
    Shelter(ShelterSupplies),
    /// Rescue schedule
    Rescue(RescueEquipment),
    /// Communication schedule
    Communication(CommunicationEquipment),
    /// Logistics schedule
    Logistics(LogisticsSupport),
}

/// `floor(value × multiplier)`
fn scale(value: u64, multiplier: f64) -> u64 {
    let scaled = (value as f64 * multiplier).floor();
    if scaled <= 0.0 {
        0
    } else {
        scaled as u64
    }
}

impl ResourceAmount {
    /// Category this amount belongs to
    pub fn category(&self) -> ResourceCategory {
        match self {
            ResourceAmount::Food(_) => ResourceCategory::Food,
            ResourceAmount::Medical(_) => ResourceCategory::Medical,
            ResourceAmount::Shelter(_) => ResourceCategory::Shelter,
            ResourceAmount::Rescue(_) => ResourceCategory::Rescue,
            ResourceAmount::Communication(_) => ResourceCategory::Communication,
            ResourceAmount::Logistics(_) => ResourceCategory::Logistics,
        }
    }

    /// Apply a multiplier to every field, truncating toward zero
    pub fn scaled(&self, m: f64) -> Self {
        match *self {
            ResourceAmount::Food(a) => ResourceAmount::Food(FoodSupplies {
                food_packets: scale(a.food_packets, m),
                water_liters: scale(a.water_liters, m),
            }),
            ResourceAmount::Medical(a) => ResourceAmount::Medical(MedicalSupplies {
                first_aid_kits: scale(a.first_aid_kits, m),
                medicines: scale(a.medicines, m),
                medical_staff: scale(a.medical_staff, m),
                ambulances: scale(a.ambulances, m),
            }),
            ResourceAmount::Shelter(a) => ResourceAmount::Shelter(ShelterSupplies {
                tents: scale(a.tents, m),
                blankets: scale(a.blankets, m),
                sleeping_bags: scale(a.sleeping_bags, m),
            }),
            ResourceAmount::Rescue(a) => ResourceAmount::Rescue(RescueEquipment {
                rescue_teams: scale(a.rescue_teams, m),
                boats: scale(a.boats, m),
                helicopters: scale(a.helicopters, m),
                bulldozers: scale(a.bulldozers, m),
            }),
            ResourceAmount::Communication(a) => ResourceAmount::Communication(CommunicationEquipment {
                satellite_phones: scale(a.satellite_phones, m),
                walkie_talkies: scale(a.walkie_talkies, m),
                generators: scale(a.generators, m),
            }),
            ResourceAmount::Logistics(a) => ResourceAmount::Logistics(LogisticsSupport {
                trucks: scale(a.trucks, m),
                fuel_liters: scale(a.fuel_liters, m),
            }),
        }
    }

    /// Human-readable breakdown lines for an affected population
    pub fn describe(&self, population: u64) -> Vec<String> {
        let people = group_thousands(population);
        match self {
            ResourceAmount::Food(a) => vec![
                format!("{} food packets for {people} people", group_thousands(a.food_packets)),
                format!("{} liters of water for {people} people", group_thousands(a.water_liters)),
            ],
            ResourceAmount::Medical(a) => vec![
                format!(
                    "{} first aid kits, {} medicine units",
                    a.first_aid_kits,
                    group_thousands(a.medicines)
                ),
                format!("{} medical staff, {} ambulances", a.medical_staff, a.ambulances),
            ],
            ResourceAmount::Shelter(a) => vec![
                format!("{} family tents, {} blankets", a.tents, group_thousands(a.blankets)),
                format!(
                    "{} sleeping bags for {people} people",
                    group_thousands(a.sleeping_bags)
                ),
            ],
            ResourceAmount::Rescue(a) => vec![
                format!("{} rescue teams, {} boats", a.rescue_teams, a.boats),
                format!("{} helicopters, {} bulldozers", a.helicopters, a.bulldozers),
            ],
            ResourceAmount::Communication(a) => vec![
                format!(
                    "{} satellite phones, {} walkie talkies",
                    a.satellite_phones, a.walkie_talkies
                ),
                format!("{} generators for communication equipment", a.generators),
            ],
            ResourceAmount::Logistics(a) => vec![
                format!("{} trucks for resource distribution", a.trucks),
                format!(
                    "{} liters of fuel for {} trucks",
                    group_thousands(a.fuel_liters),
                    a.trucks
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_tags() {
        assert_eq!(ResourceCategory::Medical.deployment_priority(), DeploymentPriority::Immediate);
        assert_eq!(ResourceCategory::Rescue.deployment_priority(), DeploymentPriority::Immediate);
        assert_eq!(ResourceCategory::Food.deployment_priority(), DeploymentPriority::Within2To4Hours);
        assert_eq!(ResourceCategory::Shelter.deployment_priority(), DeploymentPriority::Within2To4Hours);
        assert_eq!(
            ResourceCategory::Logistics.deployment_priority(),
            DeploymentPriority::Within6To8Hours
        );
    }

    #[test]
    fn test_scaled_truncates() {
        let amount = ResourceAmount::Rescue(RescueEquipment {
            rescue_teams: 3,
            boats: 1,
            helicopters: 0,
            bulldozers: 0,
        });
        match amount.scaled(1.8) {
            ResourceAmount::Rescue(r) => {
                assert_eq!(r.rescue_teams, 5);
                assert_eq!(r.boats, 1);
                assert_eq!(r.helicopters, 0);
            }
            other => panic!("unexpected variant {other:?}"),
        }
        assert_eq!(amount.scaled(1.8).category(), ResourceCategory::Rescue);
    }

    #[test]
    fn test_tagged_serialization() {
        let amount = ResourceAmount::Logistics(LogisticsSupport {
            trucks: 2,
            fuel_liters: 700,
        });
        let json = serde_json::to_value(amount).unwrap();
        assert_eq!(json["category"], "logistics");
        assert_eq!(json["fuel_liters"], 700);
    }

    #[test]
    fn test_describe_groups_thousands() {
        let amount = ResourceAmount::Food(FoodSupplies {
            food_packets: 21_000,
            water_liters: 35_000,
        });
        let lines = amount.describe(1000);
        assert_eq!(lines[0], "21,000 food packets for 1,000 people");
        assert_eq!(lines[1], "35,000 liters of water for 1,000 people");
    }
}
