#![allow(missing_docs)]

//! Serialized world entities.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

pub type CompanyId = u8;
pub type VehicleId = u32;
pub type TownId = u32;
pub type IndustryId = u32;
pub type GroupId = u32;

/// Rating a town assigns to a company it has never rated.
pub const RATING_INITIAL: i32 = 500;

/// Company owning vehicles and groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    /// Service intervals are expressed in percent of reliability rather than days.
    #[serde(default)]
    pub service_interval_percent: bool,
}

/// Named vehicle group owned by a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub owner: CompanyId,
    #[serde(default)]
    pub name: Option<String>,
}

impl Group {
    /// Name shown to the player; unnamed groups fall back to a numbered label.
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Group {}", self.id),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub z: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Train,
    Road,
    Ship,
    Aircraft,
}

/// What the vehicle is currently doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderKind {
    #[default]
    Nothing,
    GotoStation,
    Loading,
    GotoDepot {
        /// Stop inside the depot instead of only servicing there.
        #[serde(default)]
        halt: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentOrder {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub kind: OrderKind,
}

/// One linked segment of a consist (engine, wagon or articulated part).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehiclePart {
    pub id: VehicleId,
    #[serde(default)]
    pub engine: bool,
    #[serde(default)]
    pub articulated: bool,
    #[serde(default)]
    pub cargo: String,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub max_speed: u32,
}

/// Cached consist properties kept for trains.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TrainCache {
    /// Total length in sixteenths of a tile.
    pub total_length: u32,
    pub max_speed: u32,
    #[serde(default)]
    pub power: u32,
    #[serde(default)]
    pub weight: u32,
}

/// Primary vehicle as seen by the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub unit_number: u32,
    pub vehicle_type: VehicleType,
    pub owner: CompanyId,
    #[serde(default)]
    pub group: Option<GroupId>,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub stopped: bool,
    #[serde(default)]
    pub crashed: bool,
    #[serde(default)]
    pub in_depot: bool,
    /// Non-zero while a breakdown is pending or in progress.
    #[serde(default)]
    pub breakdown_ctr: u8,
    #[serde(default)]
    pub age_days: u32,
    #[serde(default)]
    pub max_age_days: u32,
    #[serde(default)]
    pub cur_speed: u32,
    /// Cached maximum speed for non-train vehicles.
    #[serde(default)]
    pub max_speed: u32,
    #[serde(default)]
    pub service_interval: u32,
    #[serde(default)]
    pub breakdowns_since_service: u32,
    /// Reliability scaled to `0..=u16::MAX`.
    #[serde(default)]
    pub reliability: u16,
    #[serde(default)]
    pub profit_this_year: i64,
    #[serde(default)]
    pub profit_last_year: i64,
    #[serde(default)]
    pub order_count: u32,
    #[serde(default)]
    pub current_order: CurrentOrder,
    /// Every linked segment of the consist, head first.
    #[serde(default)]
    pub parts: Vec<VehiclePart>,
    #[serde(default)]
    pub train: Option<TrainCache>,
}

impl Vehicle {
    pub fn new(id: VehicleId, unit_number: u32, vehicle_type: VehicleType, owner: CompanyId) -> Self {
        Self {
            id,
            unit_number,
            vehicle_type,
            owner,
            group: None,
            position: Position::default(),
            stopped: false,
            crashed: false,
            in_depot: false,
            breakdown_ctr: 0,
            age_days: 0,
            max_age_days: 0,
            cur_speed: 0,
            max_speed: 0,
            service_interval: 150,
            breakdowns_since_service: 0,
            reliability: u16::MAX,
            profit_this_year: 0,
            profit_last_year: 0,
            order_count: 0,
            current_order: CurrentOrder::default(),
            parts: Vec::new(),
            train: None,
        }
    }

    pub fn is_broken_down(&self) -> bool {
        self.breakdown_ctr != 0
    }

    pub fn age_years(&self) -> u32 {
        self.age_days / 365
    }

    /// Maximum speed as cached for the consist; trains keep theirs in the train cache.
    pub fn cached_max_speed(&self) -> u32 {
        match (self.vehicle_type, self.train.as_ref()) {
            (VehicleType::Train, Some(cache)) => cache.max_speed,
            _ => self.max_speed,
        }
    }

    /// Train length in whole tiles.
    pub fn length_tiles(&self) -> u32 {
        self.train
            .as_ref()
            .map(|cache| (cache.total_length + 15) / 16)
            .unwrap_or(0)
    }

    /// Number of linked segments, the head included.
    pub fn segment_count(&self) -> u32 {
        self.parts.len().max(1) as u32
    }

    pub fn heading_to_depot(&self) -> Option<bool> {
        match self.current_order.kind {
            OrderKind::GotoDepot { halt } => Some(halt),
            _ => None,
        }
    }

    pub fn reliability_percent(&self) -> u32 {
        (100 * (u32::from(self.reliability) >> 8)) >> 8
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadLayout {
    #[default]
    Original,
    BetterRoads,
    Grid2x2,
    Grid3x3,
    Random,
}

impl RoadLayout {
    pub fn label(self) -> &'static str {
        match self {
            RoadLayout::Original => "original",
            RoadLayout::BetterRoads => "better roads",
            RoadLayout::Grid2x2 => "2x2",
            RoadLayout::Grid3x3 => "3x3",
            RoadLayout::Random => "random",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Town {
    pub id: TownId,
    pub name: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub population: u32,
    #[serde(default)]
    pub houses: u32,
    #[serde(default)]
    pub larger_town: bool,
    #[serde(default)]
    pub layout: RoadLayout,
    #[serde(default)]
    pub noise_reached: u32,
    #[serde(default)]
    pub max_noise: u32,
    #[serde(default)]
    pub fund_buildings_months: u32,
    #[serde(default)]
    pub road_build_months: u32,
    #[serde(default)]
    pub exclusivity: Option<CompanyId>,
    #[serde(default)]
    pub exclusive_counter: u32,
    /// Ratings of companies the town has an opinion about.
    #[serde(default)]
    pub ratings: BTreeMap<CompanyId, i32>,
    #[serde(default)]
    pub statues: BTreeSet<CompanyId>,
    /// Months a company remains unwanted after a failed bribe.
    #[serde(default)]
    pub unwanted: BTreeMap<CompanyId, u32>,
}

impl Town {
    pub fn new(id: TownId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            position: Position::default(),
            population: 0,
            houses: 0,
            larger_town: false,
            layout: RoadLayout::default(),
            noise_reached: 0,
            max_noise: 0,
            fund_buildings_months: 0,
            road_build_months: 0,
            exclusivity: None,
            exclusive_counter: 0,
            ratings: BTreeMap::new(),
            statues: BTreeSet::new(),
            unwanted: BTreeMap::new(),
        }
    }

    pub fn rating_of(&self, company: CompanyId) -> i32 {
        self.ratings
            .get(&company)
            .copied()
            .unwrap_or(RATING_INITIAL)
    }

    pub fn unwanted_months(&self, company: CompanyId) -> u32 {
        self.unwanted.get(&company).copied().unwrap_or(0)
    }

    pub fn noise_remaining(&self) -> i64 {
        i64::from(self.max_noise) - i64::from(self.noise_reached)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProducedCargo {
    pub cargo: String,
    #[serde(default)]
    pub rate: u32,
    #[serde(default)]
    pub waiting: u32,
    #[serde(default)]
    pub this_month_production: u32,
    #[serde(default)]
    pub this_month_transported: u32,
    #[serde(default)]
    pub last_month_production: u32,
    #[serde(default)]
    pub last_month_transported: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcceptedCargo {
    pub cargo: String,
    #[serde(default)]
    pub waiting: u32,
}

/// Month an industry statistic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Month {
    Last,
    This,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Industry {
    pub id: IndustryId,
    pub town: TownId,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub production_level: u32,
    /// At most two produced cargo slots are tracked.
    #[serde(default)]
    pub produced: Vec<ProducedCargo>,
    #[serde(default)]
    pub accepted: Vec<AcceptedCargo>,
}

impl Industry {
    pub fn new(id: IndustryId, town: TownId, kind: impl Into<String>) -> Self {
        Self {
            id,
            town,
            kind: kind.into(),
            position: Position::default(),
            width: 0,
            height: 0,
            production_level: 0,
            produced: Vec::new(),
            accepted: Vec::new(),
        }
    }

    fn slots(&self) -> impl Iterator<Item = &ProducedCargo> {
        self.produced.iter().take(2)
    }

    pub fn production(&self, month: Month) -> u32 {
        self.slots()
            .map(|slot| match month {
                Month::Last => slot.last_month_production,
                Month::This => slot.this_month_production,
            })
            .sum()
    }

    pub fn transported(&self, month: Month) -> u32 {
        self.slots()
            .map(|slot| match month {
                Month::Last => slot.last_month_transported,
                Month::This => slot.this_month_transported,
            })
            .sum()
    }

    /// Share of production transported, 0 when nothing was produced.
    pub fn percent_transported(&self, month: Month) -> u32 {
        percent(self.transported(month), self.production(month))
    }
}

pub(crate) fn percent(transported: u32, produced: u32) -> u32 {
    if produced == 0 {
        0
    } else {
        (u64::from(transported) * 100 / u64::from(produced)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn train_length_rounds_up_to_tiles() {
        let mut train = Vehicle::new(1, 1, VehicleType::Train, 0);
        train.train = Some(TrainCache {
            total_length: 17,
            max_speed: 120,
            ..TrainCache::default()
        });
        assert_eq!(train.length_tiles(), 2);
        train.train.as_mut().unwrap().total_length = 32;
        assert_eq!(train.length_tiles(), 2);
    }

    #[test]
    fn train_max_speed_comes_from_consist_cache() {
        let mut train = Vehicle::new(1, 1, VehicleType::Train, 0);
        train.max_speed = 40;
        train.train = Some(TrainCache {
            total_length: 16,
            max_speed: 160,
            ..TrainCache::default()
        });
        assert_eq!(train.cached_max_speed(), 160);

        let mut bus = Vehicle::new(2, 1, VehicleType::Road, 0);
        bus.max_speed = 88;
        assert_eq!(bus.cached_max_speed(), 88);
    }

    #[test]
    fn industry_percent_is_zero_without_production() {
        let mut mine = Industry::new(3, 1, "Coal Mine");
        assert_eq!(mine.percent_transported(Month::Last), 0);

        mine.produced.push(ProducedCargo {
            cargo: "Coal".to_string(),
            last_month_production: 120,
            last_month_transported: 90,
            ..ProducedCargo::default()
        });
        mine.produced.push(ProducedCargo {
            cargo: "Stone".to_string(),
            last_month_production: 80,
            last_month_transported: 10,
            ..ProducedCargo::default()
        });
        assert_eq!(mine.production(Month::Last), 200);
        assert_eq!(mine.percent_transported(Month::Last), 50);
    }
}
