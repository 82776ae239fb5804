//! Fixed per-population resource standards and per-disaster multipliers.

use crate::domain::{
    CommunicationEquipment, DisasterKind, FoodSupplies, LogisticsSupport, MedicalSupplies,
    RescueEquipment, ResourceAmount, ResourceCategory, ShelterSupplies,
};

/// People per family tent
pub const FAMILY_SIZE: u64 = 5;
/// Meal packets per person per day
pub const FOOD_PACKETS_PER_DAY: u64 = 3;
/// Drinking water per person per day (litres)
pub const WATER_LITERS_PER_DAY: u64 = 5;
/// Fuel per day for the whole operation (litres)
pub const FUEL_LITERS_PER_DAY: u64 = 100;

/// Base (unmultiplied) amount for one category.
///
/// Every rate is applied as an integer ratio so the results equal the
/// truncated real-valued schedule exactly.
pub fn base_amount(category: ResourceCategory, population: u64, days: u32) -> ResourceAmount {
    let p = population;
    let d = u64::from(days);
    match category {
        ResourceCategory::Food => ResourceAmount::Food(FoodSupplies {
            food_packets: FOOD_PACKETS_PER_DAY.saturating_mul(p).saturating_mul(d),
            water_liters: WATER_LITERS_PER_DAY.saturating_mul(p).saturating_mul(d),
        }),
        ResourceCategory::Medical => ResourceAmount::Medical(MedicalSupplies {
            first_aid_kits: per(p, 2, 100),
            medicines: p,
            medical_staff: per(p, 5, 1000),
            ambulances: per(p, 2, 1000),
        }),
        ResourceCategory::Shelter => ResourceAmount::Shelter(ShelterSupplies {
            tents: p / FAMILY_SIZE,
            blankets: p.saturating_mul(2),
            sleeping_bags: p,
        }),
        ResourceCategory::Rescue => ResourceAmount::Rescue(RescueEquipment {
            rescue_teams: per(p, 3, 1000),
            boats: per(p, 1, 1000),
            // 0.5 and 0.3 per thousand
            helicopters: per(p, 1, 2000),
            bulldozers: per(p, 3, 10_000),
        }),
        ResourceCategory::Communication => ResourceAmount::Communication(CommunicationEquipment {
            satellite_phones: per(p, 2, 1000),
            walkie_talkies: per(p, 10, 1000),
            generators: per(p, 1, 1000),
        }),
        ResourceCategory::Logistics => ResourceAmount::Logistics(LogisticsSupport {
            trucks: per(p, 2, 1000),
            fuel_liters: FUEL_LITERS_PER_DAY.saturating_mul(d),
        }),
    }
}

/// `floor(population × rate / per)` without overflow
fn per(population: u64, rate: u64, per: u64) -> u64 {
    ((u128::from(population) * u128::from(rate)) / u128::from(per)) as u64
}

/// Multiplier for a category under a disaster kind
pub fn multiplier(kind: DisasterKind, category: ResourceCategory) -> f64 {
    use ResourceCategory::*;
    // [food, medical, shelter, rescue, communication, logistics]
    let row: [f64; 6] = match kind {
        DisasterKind::Flood => [1.2, 1.3, 1.5, 1.8, 1.2, 1.4],
        DisasterKind::Landslide => [1.1, 1.4, 1.3, 1.6, 1.3, 1.5],
        DisasterKind::Earthquake => [1.0, 1.8, 1.7, 2.0, 1.5, 1.6],
        DisasterKind::FlashFlood => [1.3, 1.4, 1.6, 1.9, 1.4, 1.5],
        DisasterKind::Cloudburst => [1.2, 1.2, 1.4, 1.7, 1.3, 1.4],
        DisasterKind::Avalanche => [1.1, 1.5, 1.2, 1.8, 1.4, 1.3],
    };
    let column = match category {
        Food => 0,
        Medical => 1,
        Shelter => 2,
        Rescue => 3,
        Communication => 4,
        Logistics => 5,
    };
    row[column]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_base_schedule_for_ten_thousand() {
        let p = 10_000;
        match base_amount(ResourceCategory::Food, p, 7) {
            ResourceAmount::Food(f) => {
                assert_eq!(f.food_packets, 210_000);
                assert_eq!(f.water_liters, 350_000);
            }
            other => panic!("unexpected {other:?}"),
        }
        match base_amount(ResourceCategory::Medical, p, 7) {
            ResourceAmount::Medical(m) => {
                assert_eq!(m.first_aid_kits, 200);
                assert_eq!(m.medicines, 10_000);
                assert_eq!(m.medical_staff, 50);
                assert_eq!(m.ambulances, 20);
            }
            other => panic!("unexpected {other:?}"),
        }
        match base_amount(ResourceCategory::Rescue, p, 7) {
            ResourceAmount::Rescue(r) => {
                assert_eq!(r.rescue_teams, 30);
                assert_eq!(r.boats, 10);
                assert_eq!(r.helicopters, 5);
                assert_eq!(r.bulldozers, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
        match base_amount(ResourceCategory::Logistics, p, 7) {
            ResourceAmount::Logistics(l) => {
                assert_eq!(l.trucks, 20);
                assert_eq!(l.fuel_liters, 700);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_small_population_truncates() {
        match base_amount(ResourceCategory::Shelter, 14, 1) {
            ResourceAmount::Shelter(s) => {
                assert_eq!(s.tents, 2);
                assert_eq!(s.blankets, 28);
            }
            other => panic!("unexpected {other:?}"),
        }
        match base_amount(ResourceCategory::Rescue, 1999, 1) {
            ResourceAmount::Rescue(r) => {
                assert_eq!(r.rescue_teams, 5);
                assert_eq!(r.helicopters, 0);
                assert_eq!(r.bulldozers, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_multiplier_table() {
        assert_relative_eq!(multiplier(DisasterKind::Earthquake, ResourceCategory::Rescue), 2.0);
        assert_relative_eq!(multiplier(DisasterKind::Flood, ResourceCategory::Shelter), 1.5);
        assert_relative_eq!(multiplier(DisasterKind::FlashFlood, ResourceCategory::Food), 1.3);
        assert_relative_eq!(multiplier(DisasterKind::Avalanche, ResourceCategory::Logistics), 1.3);
        for kind in DisasterKind::ALL {
            for category in ResourceCategory::ALL {
                assert!(multiplier(kind, category) >= 1.0);
            }
        }
    }
}
