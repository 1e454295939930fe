//! Chained-criteria console queries over vehicles, towns and industries.
//!
//! An invocation is a list of criteria joined by `and`/`&`, a command name
//! and the command's parameters:
//!
//! ```text
//! train age<5 & profit_last<0 depot
//! town population>=500 info
//! industry percent<40 center
//! ```
//!
//! Criteria and commands resolve by case-insensitive unique prefix. Every
//! entity satisfying the whole chain is counted as matched; those the command
//! acts on are counted as affected.

pub mod chain;
pub mod compare;
pub mod descriptor;
pub mod error;
pub mod expr;
mod help;
pub mod industry;
pub mod requirement;
pub mod resolve;
mod runner;
pub mod session;
pub mod target;
pub mod town;
pub mod vehicle;

pub use chain::{build_chain, Chain};
pub use compare::CompareOp;
pub use descriptor::{Descriptor, IndustryCommand, MatchField, TownCommand, VehicleCommand};
pub use error::QueryError;
pub use expr::Predicate;
pub use help::print_target_usage;
pub use industry::IndustryTarget;
pub use requirement::Requirement;
pub use runner::{run, Invocation, Summary};
pub use session::{GameMode, Session};
pub use target::QueryTarget;
pub use town::TownTarget;
pub use vehicle::VehicleTarget;

use crate::{
    console::ConsoleOutput,
    world::{CommandGateway, VehicleType, World},
};

/// Entity kind selected by the first console word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// One vehicle type, or every type for `None`.
    Vehicle(Option<VehicleType>),
    /// `town`.
    Town,
    /// `industry`.
    Industry,
}

impl TargetKind {
    /// Every console keyword, in help order.
    pub const KEYWORDS: [&'static str; 7] = [
        "train", "road", "ship", "aircraft", "vehicle", "town", "industry",
    ];

    /// Map a console keyword to its kind. Keywords match exactly.
    pub fn from_keyword(keyword: &str) -> Result<Self, QueryError> {
        let kind = match keyword {
            "train" => TargetKind::Vehicle(Some(VehicleType::Train)),
            "road" => TargetKind::Vehicle(Some(VehicleType::Road)),
            "ship" => TargetKind::Vehicle(Some(VehicleType::Ship)),
            "aircraft" => TargetKind::Vehicle(Some(VehicleType::Aircraft)),
            "vehicle" => TargetKind::Vehicle(None),
            "town" => TargetKind::Town,
            "industry" => TargetKind::Industry,
            other => return Err(QueryError::UnknownTarget(other.to_string())),
        };
        Ok(kind)
    }
}

/// Run one invocation of `kind` with the words after the keyword.
pub fn run_query<W: World + CommandGateway>(
    kind: TargetKind,
    args: &[&str],
    world: &mut W,
    session: &mut Session,
    out: &mut ConsoleOutput,
) -> Result<Invocation, QueryError> {
    match kind {
        TargetKind::Vehicle(vehicle_type) => {
            run(&VehicleTarget::new(vehicle_type), args, world, session, out)
        }
        TargetKind::Town => run(&TownTarget, args, world, session, out),
        TargetKind::Industry => run(&IndustryTarget, args, world, session, out),
    }
}

/// Print the usage of `kind` at help level.
pub fn print_usage(kind: TargetKind, out: &mut ConsoleOutput) {
    match kind {
        TargetKind::Vehicle(vehicle_type) => {
            print_target_usage(&VehicleTarget::new(vehicle_type), out)
        }
        TargetKind::Town => print_target_usage(&TownTarget, out),
        TargetKind::Industry => print_target_usage(&IndustryTarget, out),
    }
}
