//! Read access to simulation entities and the command gateway.
//!
//! The interpreter never owns entities. It reads them through [`World`] and
//! requests every change through [`CommandGateway`]. [`WorldSnapshot`] is an
//! in-memory implementation of both, loaded from JSON.

pub mod gateway;
pub mod models;
mod snapshot;

#[cfg(test)]
pub(crate) mod testing;

pub use gateway::{CommandGateway, GameCommand, GatewayError, TownAction, ViewRequest};
pub use models::{
    AcceptedCargo, Company, CompanyId, CurrentOrder, Group, GroupId, Industry, IndustryId, Month,
    OrderKind, Position, ProducedCargo, RoadLayout, Town, TownId, TrainCache, Vehicle, VehicleId,
    VehiclePart, VehicleType,
};
pub use snapshot::WorldSnapshot;

/// Read-only view of the live entity collections.
pub trait World {
    /// All companies.
    fn companies(&self) -> &[Company];
    /// All primary vehicles of every company.
    fn vehicles(&self) -> &[Vehicle];
    /// All towns.
    fn towns(&self) -> &[Town];
    /// All industries.
    fn industries(&self) -> &[Industry];
    /// All vehicle groups.
    fn groups(&self) -> &[Group];

    /// Look up a company by id.
    fn company(&self, id: CompanyId) -> Option<&Company> {
        self.companies().iter().find(|company| company.id == id)
    }

    /// Look up a vehicle by id.
    fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles().iter().find(|vehicle| vehicle.id == id)
    }

    /// Look up a town by id.
    fn town(&self, id: TownId) -> Option<&Town> {
        self.towns().iter().find(|town| town.id == id)
    }

    /// Look up an industry by id.
    fn industry(&self, id: IndustryId) -> Option<&Industry> {
        self.industries().iter().find(|industry| industry.id == id)
    }

    /// Display name of a group, if the group exists.
    fn group_name(&self, id: GroupId) -> Option<String> {
        self.groups()
            .iter()
            .find(|group| group.id == id)
            .map(Group::display_name)
    }
}
