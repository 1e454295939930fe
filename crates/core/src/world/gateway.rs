#![allow(missing_docs)]

//! Commands and view requests issued by queries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::{CompanyId, IndustryId, Position, TownId, VehicleId};

/// Town authority actions a company can buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TownAction {
    AdvertiseSmall,
    AdvertiseMedium,
    AdvertiseLarge,
    RoadReconstruction,
    BuildStatue,
    FundBuildings,
    BuyExclusivity,
    Bribe,
}

/// Mutation requests handed to the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum GameCommand {
    ChangeServiceInterval {
        vehicle: VehicleId,
        interval: u32,
    },
    SkipToOrder {
        vehicle: VehicleId,
        order: u32,
    },
    ForceProceed {
        vehicle: VehicleId,
    },
    ReverseTrain {
        vehicle: VehicleId,
    },
    TurnRoadVehicle {
        vehicle: VehicleId,
    },
    StartStop {
        vehicle: VehicleId,
    },
    /// Toggles a depot order: sends the vehicle, or cancels one already pending.
    SendToDepot {
        vehicle: VehicleId,
        service_only: bool,
    },
    CloneVehicle {
        vehicle: VehicleId,
        share_orders: bool,
    },
    SellVehicle {
        vehicle: VehicleId,
        sell_chain: bool,
    },
    /// Sells one segment of a train consist.
    SellWagon {
        part: VehicleId,
    },
    TownAction {
        town: TownId,
        action: TownAction,
        company: Option<CompanyId>,
    },
    ExpandTown {
        town: TownId,
    },
    DeleteTown {
        town: TownId,
    },
    DeleteIndustry {
        industry: IndustryId,
    },
}

/// Non-mutating requests for the user interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewRequest {
    ScrollTo(Position),
    VehicleWindow(VehicleId),
    TownWindow(TownId),
    TownAuthority(TownId),
    IndustryWindow(IndustryId),
}

/// Reasons the simulation refuses a command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("unknown {kind} {id}")]
    UnknownEntity { kind: &'static str, id: u32 },
    #[error("command rejected: {0}")]
    Rejected(String),
}

/// Entry point through which every simulation change is issued.
pub trait CommandGateway {
    /// Issue a command; the result is advisory and callers may ignore it.
    fn issue(&mut self, command: GameCommand) -> Result<(), GatewayError>;

    /// Ask the front-end to show something.
    fn focus(&mut self, request: ViewRequest);
}
