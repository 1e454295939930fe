//! Fixtures shared by unit tests.

use super::models::{
    Company, CompanyId, Group, GroupId, Town, TownId, TrainCache, Vehicle, VehicleId, VehiclePart,
    VehicleType,
};
use super::WorldSnapshot;

pub const LOCAL: CompanyId = 0;
pub const RIVAL: CompanyId = 1;

/// Empty world with two companies, the first one local.
pub fn world() -> WorldSnapshot {
    let mut world = WorldSnapshot::default();
    world.local_company = Some(LOCAL);
    world.companies = vec![
        Company {
            id: LOCAL,
            name: "Acme Transport".to_string(),
            service_interval_percent: false,
        },
        Company {
            id: RIVAL,
            name: "Rival Haulage".to_string(),
            service_interval_percent: false,
        },
    ];
    world
}

pub fn vehicle(id: VehicleId, unit: u32, vehicle_type: VehicleType) -> Vehicle {
    let mut vehicle = Vehicle::new(id, unit, vehicle_type, LOCAL);
    vehicle.parts = vec![VehiclePart {
        id,
        engine: true,
        articulated: false,
        cargo: String::new(),
        capacity: 0,
        max_speed: 0,
    }];
    vehicle
}

/// Single-engine train owned by the local company.
pub fn train(id: VehicleId, unit: u32) -> Vehicle {
    let mut train = vehicle(id, unit, VehicleType::Train);
    train.train = Some(TrainCache {
        total_length: 8,
        max_speed: 100,
        ..TrainCache::default()
    });
    train
}

/// Consecutively numbered parts starting at `first`, the head being an engine.
pub fn consist(first: VehicleId, articulated: &[bool]) -> Vec<VehiclePart> {
    articulated
        .iter()
        .enumerate()
        .map(|(offset, &articulated)| VehiclePart {
            id: first + offset as VehicleId,
            engine: offset == 0,
            articulated,
            cargo: "Coal".to_string(),
            capacity: 30,
            max_speed: 0,
        })
        .collect()
}

pub fn town(id: TownId, name: &str, population: u32) -> Town {
    let mut town = Town::new(id, name);
    town.population = population;
    town
}

pub fn group(id: GroupId, owner: CompanyId, name: &str) -> Group {
    Group {
        id,
        owner,
        name: Some(name.to_string()),
    }
}
