#![allow(missing_docs)]

//! Static command and match tables.
//!
//! Aliases are listed immediately before the entry they stand for; the
//! resolver maps an alias onto the next canonical entry of the table.

use super::requirement::Requirement;

/// One named table entry. `id` is `None` for aliases.
#[derive(Debug)]
pub struct Descriptor<T> {
    pub id: Option<T>,
    pub name: &'static str,
    /// Parameters the command needs after its name.
    pub params: usize,
    pub req: Requirement,
    pub help: &'static str,
}

impl<T> Descriptor<T> {
    const fn new(
        id: T,
        name: &'static str,
        params: usize,
        req: Requirement,
        help: &'static str,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            params,
            req,
            help,
        }
    }

    const fn alias(name: &'static str) -> Self {
        Self {
            id: None,
            name,
            params: 0,
            req: Requirement::ALIAS,
            help: "",
        }
    }

    pub fn is_alias(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleCommand {
    Center,
    Clone,
    CloneShared,
    Count,
    Depot,
    Ignore,
    Info,
    Interval,
    Leave,
    Open,
    Sell,
    Service,
    Skip,
    Start,
    Stop,
    Turn,
    Unservice,
    Undepot,
    WagonInfo,
    SellWagon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TownCommand {
    Center,
    Count,
    Info,
    Print,
    Open,
    Authority,
    AdSmall,
    AdMedium,
    AdLarge,
    Road,
    Statue,
    Fund,
    Exclusive,
    Bribe,
    Expand,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndustryCommand {
    Center,
    Count,
    Info,
    Open,
    Delete,
}

/// Field a criterion tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchField {
    /// Bare identifier: unit number, town name/id or industry town/id.
    Generic,
    All,
    /// Membership in a group picked by name shortcut; the operand is the group id.
    InGroup,

    Group,
    Crashed,
    Length,
    Wagons,
    Orders,
    Speed,
    Age,
    Breakdowns,
    MaxSpeed,
    Profit,
    ProfitThis,
    ProfitLast,
    Service,
    InDepot,
    Broken,

    Population,
    Houses,
    Rating,
    Statue,
    NoStatue,
    Funding,
    Roadworks,
    ExclusiveCompany,
    ExclusiveMonths,
    MyExclusiveMonths,
    OtherExclusiveMonths,
    UnwantedMonths,
    Noise,
    NoiseRemaining,
    NoiseMax,

    Production,
    ProductionThis,
    Percent,
    PercentThis,
}

const VEHICLE: Requirement = Requirement::VEHICLE;
const TRAIN: Requirement = Requirement::TRAIN;
const TOWN: Requirement = Requirement::TOWN;
const INDUSTRY: Requirement = Requirement::INDUSTRY;
const NOT_CRASHED: Requirement = Requirement::NOT_CRASHED;
const EVERYTHING: Requirement = VEHICLE.union(TOWN).union(INDUSTRY);

pub static VEHICLE_COMMANDS: &[Descriptor<VehicleCommand>] = &[
    Descriptor::alias("centre"),
    Descriptor::new(
        VehicleCommand::Center,
        "center",
        0,
        VEHICLE,
        "Center main view on vehicle's location",
    ),
    Descriptor::new(
        VehicleCommand::Clone,
        "clone",
        0,
        VEHICLE.union(Requirement::IN_DEPOT),
        "Clone vehicle, if it is in depot. Parameter specifies number of created clones (default 1)",
    ),
    Descriptor::new(
        VehicleCommand::CloneShared,
        "clone_shared",
        0,
        VEHICLE.union(Requirement::IN_DEPOT),
        "Same as clone, but with shared orders",
    ),
    Descriptor::new(
        VehicleCommand::Count,
        "count",
        0,
        VEHICLE,
        "Count vehicles matching given criteria",
    ),
    Descriptor::new(
        VehicleCommand::Depot,
        "depot",
        0,
        VEHICLE.union(NOT_CRASHED),
        "Send to depot",
    ),
    Descriptor::new(
        VehicleCommand::Ignore,
        "ignore",
        0,
        TRAIN.union(NOT_CRASHED),
        "Ignore signals",
    ),
    Descriptor::new(
        VehicleCommand::Info,
        "info",
        0,
        VEHICLE,
        "Show vehicle info in console",
    ),
    Descriptor::new(
        VehicleCommand::Interval,
        "interval",
        1,
        VEHICLE.union(NOT_CRASHED),
        "Set servicing interval. Parameter specifies new interval in days/percent",
    ),
    Descriptor::new(
        VehicleCommand::Leave,
        "leave",
        0,
        VEHICLE.union(NOT_CRASHED),
        "Leave station by skipping to next order",
    ),
    Descriptor::alias("show"),
    Descriptor::new(
        VehicleCommand::Open,
        "open",
        0,
        VEHICLE,
        "Open vehicle window",
    ),
    Descriptor::new(
        VehicleCommand::Sell,
        "sell",
        0,
        VEHICLE
            .union(Requirement::STOPPED)
            .union(Requirement::IN_DEPOT),
        "Sell vehicle, if it is stopped in depot",
    ),
    Descriptor::new(
        VehicleCommand::Service,
        "service",
        0,
        VEHICLE.union(NOT_CRASHED),
        "Send for servicing",
    ),
    Descriptor::new(
        VehicleCommand::Skip,
        "skip",
        0,
        VEHICLE.union(NOT_CRASHED),
        "Skip to next order. Optional parameter specifies how many orders to skip ('r' = skip to random order, default is 1)",
    ),
    Descriptor::alias("go"),
    Descriptor::new(
        VehicleCommand::Start,
        "start",
        0,
        VEHICLE.union(NOT_CRASHED),
        "Start vehicle",
    ),
    Descriptor::new(
        VehicleCommand::Stop,
        "stop",
        0,
        VEHICLE.union(NOT_CRASHED),
        "Stop vehicle",
    ),
    Descriptor::alias("reverse"),
    Descriptor::new(
        VehicleCommand::Turn,
        "turn",
        0,
        TRAIN.union(Requirement::ROAD).union(NOT_CRASHED),
        "Turn around",
    ),
    Descriptor::new(
        VehicleCommand::Unservice,
        "unservice",
        0,
        VEHICLE.union(NOT_CRASHED),
        "Cancel order to be sent for servicing",
    ),
    Descriptor::new(
        VehicleCommand::Undepot,
        "undepot",
        0,
        VEHICLE.union(NOT_CRASHED),
        "Cancel order to be sent to depot",
    ),
    Descriptor::new(
        VehicleCommand::WagonInfo,
        "winfo",
        0,
        TRAIN,
        "Show info about train wagons in console",
    ),
    Descriptor::new(
        VehicleCommand::SellWagon,
        "wsell",
        1,
        TRAIN
            .union(Requirement::STOPPED)
            .union(Requirement::IN_DEPOT),
        "Sell train wagons(s). If one parameter is given, single wagon will be sold. If two parameters are given, they will specify range of wagons to sell.",
    ),
];

pub static TOWN_COMMANDS: &[Descriptor<TownCommand>] = &[
    Descriptor::alias("centre"),
    Descriptor::new(
        TownCommand::Center,
        "center",
        0,
        TOWN,
        "Center main view on town location",
    ),
    Descriptor::new(
        TownCommand::Count,
        "count",
        0,
        TOWN,
        "Count towns matching given criteria",
    ),
    Descriptor::new(TownCommand::Info, "info", 0, TOWN, "Show town info in console"),
    Descriptor::new(
        TownCommand::Print,
        "print",
        0,
        TOWN,
        "Print town name in console",
    ),
    Descriptor::alias("show"),
    Descriptor::new(TownCommand::Open, "open", 0, TOWN, "Open town window"),
    Descriptor::new(
        TownCommand::Authority,
        "auth",
        0,
        TOWN,
        "Open town authority window",
    ),
    Descriptor::alias("small_ad"),
    Descriptor::new(
        TownCommand::AdSmall,
        "ad_small",
        0,
        TOWN,
        "Launch small advertising campaign in the town",
    ),
    Descriptor::alias("medium_ad"),
    Descriptor::new(
        TownCommand::AdMedium,
        "ad_medium",
        0,
        TOWN,
        "Launch medium advertising campaign in the town",
    ),
    Descriptor::alias("large_ad"),
    Descriptor::new(
        TownCommand::AdLarge,
        "ad_large",
        0,
        TOWN,
        "Launch large advertising campaign in the town",
    ),
    Descriptor::alias("reconstruction"),
    Descriptor::new(
        TownCommand::Road,
        "road",
        0,
        TOWN,
        "Fund road reconstruction in town",
    ),
    Descriptor::new(TownCommand::Statue, "statue", 0, TOWN, "Build statue in town"),
    Descriptor::alias("building"),
    Descriptor::new(
        TownCommand::Fund,
        "fund",
        0,
        TOWN,
        "Fund construction of new buildings",
    ),
    Descriptor::new(
        TownCommand::Exclusive,
        "exclusive",
        0,
        TOWN,
        "Buy exclusive rights in town",
    ),
    Descriptor::new(TownCommand::Bribe, "bribe", 0, TOWN, "Bribe town authority"),
    Descriptor::new(
        TownCommand::Expand,
        "expand",
        0,
        TOWN.union(Requirement::EDITOR),
        "Expand town (scenario editor only) Parameter specifies number of repetitions (default 1)",
    ),
    Descriptor::new(
        TownCommand::Delete,
        "delete",
        0,
        TOWN.union(Requirement::EDITOR),
        "Delete the town (scenario editor only)",
    ),
];

pub static INDUSTRY_COMMANDS: &[Descriptor<IndustryCommand>] = &[
    Descriptor::alias("centre"),
    Descriptor::new(
        IndustryCommand::Center,
        "center",
        0,
        INDUSTRY,
        "Center main view on industry location",
    ),
    Descriptor::new(
        IndustryCommand::Count,
        "count",
        0,
        INDUSTRY,
        "Count industries matching given criteria",
    ),
    Descriptor::new(
        IndustryCommand::Info,
        "info",
        0,
        INDUSTRY,
        "Show industry info in console",
    ),
    Descriptor::alias("show"),
    Descriptor::new(
        IndustryCommand::Open,
        "open",
        0,
        INDUSTRY,
        "Open industry window",
    ),
    Descriptor::new(
        IndustryCommand::Delete,
        "delete",
        0,
        INDUSTRY,
        "Delete the industry",
    ),
];

/// Whole-token flags such as `all` or `crashed`.
pub static BOOLEAN_MATCHES: &[Descriptor<MatchField>] = &[
    Descriptor::new(
        MatchField::All,
        "all",
        0,
        EVERYTHING.union(Requirement::PRINTF),
        " for all %ss",
    ),
    Descriptor::new(
        MatchField::All,
        "*",
        0,
        EVERYTHING.union(Requirement::PRINTF),
        " for all %ss",
    ),
    Descriptor::new(
        MatchField::Broken,
        "broken",
        0,
        VEHICLE.union(Requirement::PRINTF),
        " for all broken down %ss",
    ),
    Descriptor::new(
        MatchField::Crashed,
        "crashed",
        0,
        VEHICLE.union(Requirement::PRINTF),
        " for all crashed %ss",
    ),
    Descriptor::new(
        MatchField::InDepot,
        "depot",
        0,
        VEHICLE.union(Requirement::PRINTF),
        " for all %ss in depot",
    ),
    Descriptor::new(
        MatchField::Statue,
        "statue",
        0,
        TOWN,
        " for all towns where you have a statue",
    ),
    Descriptor::new(
        MatchField::NoStatue,
        "no_statue",
        0,
        TOWN,
        " for all towns where you don't have a statue",
    ),
];

/// Keys usable on the left of a comparison operator.
pub static NUMERIC_MATCHES: &[Descriptor<MatchField>] = &[
    Descriptor::new(
        MatchField::Age,
        "age",
        0,
        VEHICLE,
        "=[value] for matching age (in years)",
    ),
    Descriptor::new(
        MatchField::Breakdowns,
        "breakdowns",
        0,
        VEHICLE,
        "=[value] for matching breakdowns since last service",
    ),
    Descriptor::new(
        MatchField::Length,
        "len",
        0,
        TRAIN,
        "=[value] for matching train length (in tiles)",
    ),
    Descriptor::new(
        MatchField::MaxSpeed,
        "maxspeed",
        0,
        VEHICLE,
        "=[value] for matching maximum speed (in km/h)",
    ),
    Descriptor::new(
        MatchField::Orders,
        "orders",
        0,
        VEHICLE,
        "=[value] for matching number of orders",
    ),
    Descriptor::new(
        MatchField::Group,
        "group",
        0,
        VEHICLE,
        "=[name] for matching group by name",
    ),
    Descriptor::new(
        MatchField::Profit,
        "profit",
        0,
        VEHICLE,
        "=[value] for matching sum of this and last year's profit (in pounds)",
    ),
    Descriptor::new(
        MatchField::ProfitThis,
        "profit_this",
        0,
        VEHICLE,
        "=[value] for matching this year's profit (in pounds)",
    ),
    Descriptor::new(
        MatchField::ProfitLast,
        "profit_last",
        0,
        VEHICLE,
        "=[value] for matching last year's profit (in pounds)",
    ),
    Descriptor::new(
        MatchField::Service,
        "service",
        0,
        VEHICLE,
        "=[value] for matching service interval (in days/percent)",
    ),
    Descriptor::new(
        MatchField::Speed,
        "speed",
        0,
        VEHICLE,
        "=[value] for matching current speed (in km/h)",
    ),
    Descriptor::new(
        MatchField::Wagons,
        "wagons",
        0,
        TRAIN,
        "=[value] for matching number of train wagons",
    ),
    Descriptor::new(
        MatchField::Population,
        "population",
        0,
        TOWN,
        "=[value] for matching town population",
    ),
    Descriptor::new(
        MatchField::Houses,
        "houses",
        0,
        TOWN,
        "=[value] for matching number of town houses",
    ),
    Descriptor::new(
        MatchField::Rating,
        "rating",
        0,
        TOWN,
        "=[value] for matching your rating in town",
    ),
    Descriptor::new(
        MatchField::Noise,
        "currnoise",
        0,
        TOWN,
        "=[value] for matching currently used noise level",
    ),
    Descriptor::new(
        MatchField::NoiseRemaining,
        "noise",
        0,
        TOWN,
        "=[value] for matching remaining (usable by you) noise level",
    ),
    Descriptor::new(
        MatchField::NoiseMax,
        "maxnoise",
        0,
        TOWN,
        "=[value] for matching maximal noise level",
    ),
    Descriptor::new(
        MatchField::Funding,
        "fund",
        0,
        TOWN,
        "=[value] for matching months remaining in building funding",
    ),
    Descriptor::new(
        MatchField::Roadworks,
        "roadworks",
        0,
        TOWN,
        "=[value] for matching months remaining in road reconstructions",
    ),
    Descriptor::new(
        MatchField::ExclusiveCompany,
        "exclusive",
        0,
        TOWN,
        "=[value] for matching company having exclusive rights",
    ),
    Descriptor::new(
        MatchField::ExclusiveMonths,
        "any_exclusive",
        0,
        TOWN,
        "=[value] for matching months of remaining exclusive rights for any company",
    ),
    Descriptor::new(
        MatchField::MyExclusiveMonths,
        "my_exclusive",
        0,
        TOWN,
        "=[value] for matching months of remaining exclusive rights for your company",
    ),
    Descriptor::new(
        MatchField::OtherExclusiveMonths,
        "other_exclusive",
        0,
        TOWN,
        "=[value] for matching months of remaining exclusive rights for any competitor company",
    ),
    Descriptor::new(
        MatchField::UnwantedMonths,
        "unwanted",
        0,
        TOWN,
        "=[value] for matching months you are unwanted in town due to bribe",
    ),
    Descriptor::new(
        MatchField::Production,
        "production",
        0,
        INDUSTRY,
        "=[value] for matching industry production last month",
    ),
    Descriptor::new(
        MatchField::ProductionThis,
        "thisproduction",
        0,
        INDUSTRY,
        "=[value] for matching industry production this month",
    ),
    Descriptor::new(
        MatchField::Percent,
        "percent",
        0,
        INDUSTRY,
        "=[value] for percent transported last month",
    ),
    Descriptor::new(
        MatchField::PercentThis,
        "thispercent",
        0,
        INDUSTRY,
        "=[value] for percent transported this month",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn check_aliases<T>(table: &[Descriptor<T>]) {
        for (index, entry) in table.iter().enumerate() {
            if entry.is_alias() {
                assert_eq!(entry.req, Requirement::ALIAS, "alias {} carries flags", entry.name);
                let next = table
                    .get(index + 1)
                    .unwrap_or_else(|| panic!("alias {} ends the table", entry.name));
                assert!(!next.is_alias(), "alias {} is chained", entry.name);
            } else {
                assert!(!entry.req.contains(Requirement::ALIAS), "{}", entry.name);
            }
        }
    }

    #[test]
    fn aliases_point_directly_at_a_canonical_entry() {
        check_aliases(VEHICLE_COMMANDS);
        check_aliases(TOWN_COMMANDS);
        check_aliases(INDUSTRY_COMMANDS);
        check_aliases(BOOLEAN_MATCHES);
        check_aliases(NUMERIC_MATCHES);
    }

    #[test]
    fn every_entry_applies_to_some_target() {
        let targets = Requirement::VEHICLE | Requirement::TOWN | Requirement::INDUSTRY;
        let canonical = VEHICLE_COMMANDS
            .iter()
            .map(|d| (d.name, d.req))
            .chain(TOWN_COMMANDS.iter().map(|d| (d.name, d.req)))
            .chain(INDUSTRY_COMMANDS.iter().map(|d| (d.name, d.req)))
            .chain(NUMERIC_MATCHES.iter().map(|d| (d.name, d.req)))
            .filter(|(_, req)| *req != Requirement::ALIAS);
        for (name, req) in canonical {
            assert!(req.intersects(targets), "{name} applies to nothing");
        }
    }

    #[test]
    fn only_required_parameter_commands_declare_them() {
        let with_params: Vec<_> = VEHICLE_COMMANDS
            .iter()
            .filter(|d| d.params > 0)
            .map(|d| d.name)
            .collect();
        assert_eq!(with_params, vec!["interval", "wsell"]);
    }
}
