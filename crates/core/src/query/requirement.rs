//! Applicability and precondition flags shared by commands and criteria.

use bitflags::bitflags;

use crate::world::VehicleType;

bitflags! {
    /// Applicability of a command or match, plus per-entity preconditions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Requirement: u16 {
        const TRAIN = 0x01;
        const ROAD = 0x02;
        const SHIP = 0x04;
        const AIRCRAFT = 0x08;
        /// Target vehicle must not be crashed.
        const NOT_CRASHED = 0x10;
        /// Target vehicle must be in a depot.
        const IN_DEPOT = 0x20;
        /// Target vehicle must be stopped.
        const STOPPED = 0x40;
        /// Table entry is an alias of the next canonical entry.
        const ALIAS = 0x80;
        const TOWN = 0x100;
        const INDUSTRY = 0x200;
        /// Help text carries one `%s` replaced by the target noun.
        const PRINTF = 0x400;
        /// Usable only in the scenario editor.
        const EDITOR = 0x800;

        const VEHICLE = Self::TRAIN.bits()
            | Self::ROAD.bits()
            | Self::SHIP.bits()
            | Self::AIRCRAFT.bits();
    }
}

impl From<VehicleType> for Requirement {
    fn from(vehicle_type: VehicleType) -> Self {
        match vehicle_type {
            VehicleType::Train => Requirement::TRAIN,
            VehicleType::Road => Requirement::ROAD,
            VehicleType::Ship => Requirement::SHIP,
            VehicleType::Aircraft => Requirement::AIRCRAFT,
        }
    }
}
