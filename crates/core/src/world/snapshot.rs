use std::{fs, path::Path};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    gateway::{CommandGateway, GameCommand, GatewayError, TownAction, ViewRequest},
    models::{Company, CompanyId, Group, Industry, OrderKind, Town, TownId, Vehicle, VehicleId},
    World,
};

/// Months of effect bought by the timed town actions.
const FUND_BUILDINGS_MONTHS: u32 = 3;
const ROAD_RECONSTRUCTION_MONTHS: u32 = 6;
const EXCLUSIVITY_MONTHS: u32 = 12;

/// In-memory world that applies gateway commands to itself and journals them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Company the operator plays as, if any.
    #[serde(default)]
    pub local_company: Option<CompanyId>,
    /// Companies in the game.
    #[serde(default)]
    pub companies: Vec<Company>,
    /// Primary vehicles.
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    /// Towns.
    #[serde(default)]
    pub towns: Vec<Town>,
    /// Industries.
    #[serde(default)]
    pub industries: Vec<Industry>,
    /// Vehicle groups.
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(skip)]
    journal: Vec<GameCommand>,
    #[serde(skip)]
    views: Vec<ViewRequest>,
    #[serde(skip, default = "Utc::now")]
    loaded_at: DateTime<Utc>,
}

impl Default for WorldSnapshot {
    fn default() -> Self {
        Self {
            local_company: None,
            companies: Vec::new(),
            vehicles: Vec::new(),
            towns: Vec::new(),
            industries: Vec::new(),
            groups: Vec::new(),
            journal: Vec::new(),
            views: Vec::new(),
            loaded_at: Utc::now(),
        }
    }
}

impl WorldSnapshot {
    /// Read a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read world snapshot {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("failed to parse world snapshot {}", path.display()))
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json(contents: &str) -> Result<Self> {
        let snapshot = serde_json::from_str(contents).context("invalid world snapshot")?;
        Ok(snapshot)
    }

    /// Commands issued so far, oldest first.
    pub fn journal(&self) -> &[GameCommand] {
        &self.journal
    }

    /// View requests issued so far, oldest first.
    pub fn views(&self) -> &[ViewRequest] {
        &self.views
    }

    /// Drain the view requests, leaving the journal untouched.
    pub fn take_views(&mut self) -> Vec<ViewRequest> {
        std::mem::take(&mut self.views)
    }

    /// Drain the command journal, leaving the view requests untouched.
    pub fn take_journal(&mut self) -> Vec<GameCommand> {
        std::mem::take(&mut self.journal)
    }

    /// When the snapshot was loaded.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    fn vehicle_mut(&mut self, id: VehicleId) -> Result<&mut Vehicle, GatewayError> {
        self.vehicles
            .iter_mut()
            .find(|vehicle| vehicle.id == id)
            .ok_or(GatewayError::UnknownEntity { kind: "vehicle", id })
    }

    fn town_mut(&mut self, id: TownId) -> Result<&mut Town, GatewayError> {
        self.towns
            .iter_mut()
            .find(|town| town.id == id)
            .ok_or(GatewayError::UnknownEntity { kind: "town", id })
    }

    fn next_vehicle_id(&self) -> VehicleId {
        self.vehicles
            .iter()
            .flat_map(|vehicle| {
                std::iter::once(vehicle.id).chain(vehicle.parts.iter().map(|part| part.id))
            })
            .max()
            .map_or(0, |id| id + 1)
    }

    fn clone_vehicle(&mut self, id: VehicleId) -> Result<(), GatewayError> {
        let mut copy = self
            .vehicle(id)
            .cloned()
            .ok_or(GatewayError::UnknownEntity { kind: "vehicle", id })?;
        if !copy.in_depot {
            return Err(GatewayError::Rejected("vehicle must be in a depot".to_string()));
        }

        let mut next_id = self.next_vehicle_id();
        copy.id = next_id;
        for part in copy.parts.iter_mut() {
            part.id = next_id;
            next_id += 1;
        }
        if let Some(head) = copy.parts.first() {
            copy.id = head.id;
        }
        copy.unit_number = self
            .vehicles
            .iter()
            .filter(|vehicle| {
                vehicle.owner == copy.owner && vehicle.vehicle_type == copy.vehicle_type
            })
            .map(|vehicle| vehicle.unit_number)
            .max()
            .unwrap_or(0)
            + 1;
        copy.stopped = true;
        copy.age_days = 0;
        copy.profit_this_year = 0;
        copy.profit_last_year = 0;
        copy.breakdowns_since_service = 0;
        copy.current_order = Default::default();
        self.vehicles.push(copy);
        Ok(())
    }

    fn sell_vehicle(&mut self, id: VehicleId) -> Result<(), GatewayError> {
        let vehicle = self.vehicle_mut(id)?;
        if !(vehicle.stopped && vehicle.in_depot) {
            return Err(GatewayError::Rejected(
                "vehicle must be stopped inside a depot".to_string(),
            ));
        }
        self.vehicles.retain(|vehicle| vehicle.id != id);
        Ok(())
    }

    fn sell_wagon(&mut self, part: VehicleId) -> Result<(), GatewayError> {
        let owner_index = self
            .vehicles
            .iter()
            .position(|vehicle| vehicle.parts.iter().any(|segment| segment.id == part))
            .ok_or(GatewayError::UnknownEntity {
                kind: "wagon",
                id: part,
            })?;

        let vehicle = &mut self.vehicles[owner_index];
        if !(vehicle.stopped && vehicle.in_depot) {
            return Err(GatewayError::Rejected(
                "train must be stopped inside a depot".to_string(),
            ));
        }
        // The sold segment takes its trailing articulated parts along.
        if let Some(start) = vehicle.parts.iter().position(|segment| segment.id == part) {
            let end = vehicle.parts[start + 1..]
                .iter()
                .position(|segment| !segment.articulated)
                .map_or(vehicle.parts.len(), |offset| start + 1 + offset);
            vehicle.parts.drain(start..end);
        }
        if vehicle.parts.is_empty() {
            self.vehicles.remove(owner_index);
        }
        Ok(())
    }

    fn apply_town_action(
        &mut self,
        town: TownId,
        action: TownAction,
        company: Option<CompanyId>,
    ) -> Result<(), GatewayError> {
        let company = company.ok_or_else(|| {
            GatewayError::Rejected("town actions require a company".to_string())
        })?;
        let town = self.town_mut(town)?;
        match action {
            TownAction::BuildStatue => {
                if !town.statues.insert(company) {
                    return Err(GatewayError::Rejected("statue already built".to_string()));
                }
            }
            TownAction::FundBuildings => town.fund_buildings_months = FUND_BUILDINGS_MONTHS,
            TownAction::RoadReconstruction => {
                town.road_build_months = ROAD_RECONSTRUCTION_MONTHS
            }
            TownAction::BuyExclusivity => {
                town.exclusivity = Some(company);
                town.exclusive_counter = EXCLUSIVITY_MONTHS;
            }
            TownAction::AdvertiseSmall
            | TownAction::AdvertiseMedium
            | TownAction::AdvertiseLarge
            | TownAction::Bribe => {}
        }
        Ok(())
    }

    fn apply(&mut self, command: &GameCommand) -> Result<(), GatewayError> {
        match *command {
            GameCommand::ChangeServiceInterval { vehicle, interval } => {
                self.vehicle_mut(vehicle)?.service_interval = interval;
            }
            GameCommand::SkipToOrder { vehicle, order } => {
                let vehicle = self.vehicle_mut(vehicle)?;
                if order >= vehicle.order_count {
                    return Err(GatewayError::Rejected(format!("no order {order}")));
                }
                vehicle.current_order.index = order;
                vehicle.current_order.kind = OrderKind::GotoStation;
            }
            GameCommand::ForceProceed { vehicle }
            | GameCommand::ReverseTrain { vehicle }
            | GameCommand::TurnRoadVehicle { vehicle } => {
                self.vehicle_mut(vehicle)?;
            }
            GameCommand::StartStop { vehicle } => {
                let vehicle = self.vehicle_mut(vehicle)?;
                if vehicle.crashed {
                    return Err(GatewayError::Rejected("vehicle is crashed".to_string()));
                }
                vehicle.stopped = !vehicle.stopped;
            }
            GameCommand::SendToDepot {
                vehicle,
                service_only,
            } => {
                let vehicle = self.vehicle_mut(vehicle)?;
                vehicle.current_order.kind = match vehicle.current_order.kind {
                    OrderKind::GotoDepot { .. } => OrderKind::Nothing,
                    _ => OrderKind::GotoDepot {
                        halt: !service_only,
                    },
                };
            }
            GameCommand::CloneVehicle { vehicle, .. } => self.clone_vehicle(vehicle)?,
            GameCommand::SellVehicle { vehicle, .. } => self.sell_vehicle(vehicle)?,
            GameCommand::SellWagon { part } => self.sell_wagon(part)?,
            GameCommand::TownAction {
                town,
                action,
                company,
            } => self.apply_town_action(town, action, company)?,
            GameCommand::ExpandTown { town } => {
                self.town_mut(town)?.houses += 1;
            }
            GameCommand::DeleteTown { town } => {
                self.town_mut(town)?;
                self.towns.retain(|candidate| candidate.id != town);
                self.industries.retain(|industry| industry.town != town);
            }
            GameCommand::DeleteIndustry { industry } => {
                if self.industry(industry).is_none() {
                    return Err(GatewayError::UnknownEntity {
                        kind: "industry",
                        id: industry,
                    });
                }
                self.industries.retain(|candidate| candidate.id != industry);
            }
        }
        Ok(())
    }
}

impl World for WorldSnapshot {
    fn companies(&self) -> &[Company] {
        &self.companies
    }

    fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    fn towns(&self) -> &[Town] {
        &self.towns
    }

    fn industries(&self) -> &[Industry] {
        &self.industries
    }

    fn groups(&self) -> &[Group] {
        &self.groups
    }
}

impl CommandGateway for WorldSnapshot {
    fn issue(&mut self, command: GameCommand) -> Result<(), GatewayError> {
        debug!(?command, "applying game command");
        let result = self.apply(&command);
        self.journal.push(command);
        result
    }

    fn focus(&mut self, request: ViewRequest) {
        self.views.push(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{models::VehicleType, testing};
    use tempfile::tempdir;

    #[test]
    fn loads_snapshot_from_disk() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("world.json");
        fs::write(
            &path,
            r#"{
                "local_company": 0,
                "companies": [{ "id": 0, "name": "Acme Transport" }],
                "vehicles": [{
                    "id": 10, "unit_number": 1, "vehicle_type": "train", "owner": 0,
                    "current_order": { "index": 1, "kind": { "type": "goto_depot", "halt": true } }
                }],
                "towns": [{ "id": 0, "name": "Fort Brook", "population": 900,
                            "ratings": { "0": 620 } }],
                "industries": [{ "id": 4, "town": 0, "kind": "Coal Mine" }]
            }"#,
        )?;

        let world = WorldSnapshot::load(&path)?;
        assert_eq!(world.local_company, Some(0));
        assert_eq!(world.vehicles.len(), 1);
        assert_eq!(world.vehicles[0].vehicle_type, VehicleType::Train);
        assert_eq!(world.vehicles[0].heading_to_depot(), Some(true));
        assert_eq!(world.towns[0].rating_of(0), 620);
        assert_eq!(world.industry(4).map(|i| i.town), Some(0));
        Ok(())
    }

    #[test]
    fn rejects_malformed_snapshot() {
        let err = WorldSnapshot::from_json("{ \"vehicles\": 3 }").unwrap_err();
        assert!(err.to_string().contains("invalid world snapshot"));
    }

    #[test]
    fn depot_command_toggles_pending_order() {
        let mut world = testing::world();
        world.vehicles.push(testing::train(1, 1));

        let send = GameCommand::SendToDepot {
            vehicle: 1,
            service_only: true,
        };
        world.issue(send.clone()).unwrap();
        assert_eq!(world.vehicles[0].heading_to_depot(), Some(false));
        world.issue(send).unwrap();
        assert_eq!(world.vehicles[0].heading_to_depot(), None);
        assert_eq!(world.journal().len(), 2);
    }

    #[test]
    fn draining_the_journal_keeps_views() {
        let mut world = testing::world();
        world.vehicles.push(testing::train(1, 1));
        world.issue(GameCommand::StartStop { vehicle: 1 }).unwrap();
        world.focus(ViewRequest::VehicleWindow(1));

        assert_eq!(world.take_journal(), vec![GameCommand::StartStop { vehicle: 1 }]);
        assert!(world.journal().is_empty());
        assert_eq!(world.views().len(), 1);
    }

    #[test]
    fn deleting_town_removes_its_industries() {
        let mut world = testing::world();
        world.towns.push(testing::town(1, "Ashby", 100));
        world.towns.push(testing::town(2, "Bexley", 200));
        world.industries.push(Industry::new(7, 1, "Sawmill"));
        world.industries.push(Industry::new(8, 2, "Farm"));

        world.issue(GameCommand::DeleteTown { town: 1 }).unwrap();
        assert_eq!(world.towns.len(), 1);
        assert_eq!(world.industries.len(), 1);
        assert_eq!(world.industries[0].id, 8);
    }

    #[test]
    fn selling_wagon_drops_articulated_tail() {
        let mut world = testing::world();
        let mut train = testing::train(1, 1);
        train.stopped = true;
        train.in_depot = true;
        train.parts = testing::consist(1, &[false, false, true, true, false]);
        world.vehicles.push(train);

        world.issue(GameCommand::SellWagon { part: 2 }).unwrap();
        let ids: Vec<_> = world.vehicles[0].parts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn clone_requires_depot_and_assigns_fresh_unit_number() {
        let mut world = testing::world();
        world.vehicles.push(testing::train(1, 4));

        let clone = GameCommand::CloneVehicle {
            vehicle: 1,
            share_orders: false,
        };
        assert!(world.issue(clone.clone()).is_err());

        world.vehicles[0].in_depot = true;
        world.issue(clone).unwrap();
        assert_eq!(world.vehicles.len(), 2);
        assert_eq!(world.vehicles[1].unit_number, 5);
        assert!(world.vehicles[1].stopped);
        assert_ne!(world.vehicles[1].id, 1);
    }
}
