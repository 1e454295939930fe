//! Vehicle queries: `train`, `road`, `ship`, `aircraft` and `vehicle`.

use super::{
    chain::Chain,
    compare::{compare_integer, compare_money, compare_text, parse_integer},
    descriptor::{Descriptor, MatchField, VehicleCommand, VEHICLE_COMMANDS},
    error::QueryError,
    expr::Predicate,
    requirement::Requirement,
    resolve::resolve_group,
    session::Session,
    target::{dispatch, QueryTarget},
};
use crate::{
    console::ConsoleOutput,
    world::{
        CommandGateway, GameCommand, OrderKind, Vehicle, VehicleId, VehicleType, ViewRequest,
        World,
    },
};

/// Upper bound on wagons sold by one `wsell`.
const MAX_WAGON_BATCH: usize = 100;
/// Upper bound on copies made by one `clone` or expansions by one `expand`.
pub(crate) const MAX_REPETITIONS: u32 = 100;

const SERVICE_PERCENT_RANGE: (i64, i64) = (5, 90);
const SERVICE_DAYS_RANGE: (i64, i64) = (30, 800);

/// Vehicles of one type, or of every type when `vehicle_type` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleTarget {
    /// Visited type, or every type.
    pub vehicle_type: Option<VehicleType>,
}

impl VehicleTarget {
    /// Target for `vehicle_type`, or for every type when `None`.
    pub fn new(vehicle_type: Option<VehicleType>) -> Self {
        Self { vehicle_type }
    }

    fn numeric_value(vehicle: &Vehicle, field: MatchField) -> Option<i64> {
        let value = match field {
            MatchField::Service => vehicle.service_interval,
            MatchField::Speed => vehicle.cur_speed,
            MatchField::Orders => vehicle.order_count,
            MatchField::Age => vehicle.age_years(),
            MatchField::Breakdowns => vehicle.breakdowns_since_service,
            MatchField::MaxSpeed => vehicle.cached_max_speed(),
            MatchField::Length => vehicle.length_tiles(),
            MatchField::Wagons => vehicle.segment_count(),
            _ => return None,
        };
        Some(i64::from(value))
    }

    fn profit_value(vehicle: &Vehicle, field: MatchField) -> Option<i64> {
        match field {
            MatchField::Profit => Some(vehicle.profit_this_year + vehicle.profit_last_year),
            MatchField::ProfitThis => Some(vehicle.profit_this_year),
            MatchField::ProfitLast => Some(vehicle.profit_last_year),
            _ => None,
        }
    }
}

impl QueryTarget for VehicleTarget {
    type Command = VehicleCommand;
    type Entity = Vehicle;
    type Id = VehicleId;

    fn noun(&self) -> &'static str {
        match self.vehicle_type {
            Some(VehicleType::Train) => "train",
            Some(VehicleType::Road) => "road vehicle",
            Some(VehicleType::Ship) => "ship",
            Some(VehicleType::Aircraft) => "aircraft",
            None => "vehicle",
        }
    }

    fn plural(&self) -> &'static str {
        match self.vehicle_type {
            Some(VehicleType::Train) => "trains",
            Some(VehicleType::Road) => "road vehicles",
            Some(VehicleType::Ship) => "ships",
            Some(VehicleType::Aircraft) => "aircraft",
            None => "vehicles",
        }
    }

    fn keyword(&self) -> &'static str {
        match self.vehicle_type {
            Some(VehicleType::Train) => "train",
            Some(VehicleType::Road) => "road",
            Some(VehicleType::Ship) => "ship",
            Some(VehicleType::Aircraft) => "aircraft",
            None => "vehicle",
        }
    }

    fn mask(&self) -> Requirement {
        self.vehicle_type
            .map(Requirement::from)
            .unwrap_or(Requirement::VEHICLE)
    }

    fn commands(&self) -> &'static [Descriptor<VehicleCommand>] {
        VEHICLE_COMMANDS
    }

    fn help_hints(&self) -> Vec<String> {
        let noun = self.noun();
        vec![
            format!(
                " name of group for all {noun}s from specified group. Can accept unique prefix of group name"
            ),
            format!(" {noun} number for specific {noun}"),
        ]
    }

    fn check_session(&self, world: &dyn World, session: &Session) -> Result<(), QueryError> {
        match session.company(world) {
            Some(_) => Ok(()),
            None => Err(QueryError::NoCompany),
        }
    }

    /// Bare identifiers naming one of the operator's groups select that group.
    fn prepare(&self, chain: &mut Chain<'_>, world: &dyn World, session: &Session) {
        let company = session.company(world);
        let own_groups: Vec<_> = world
            .groups()
            .iter()
            .filter(|group| Some(group.owner) == company)
            .collect();

        for predicate in chain.predicates_mut() {
            if predicate.field != MatchField::Generic {
                continue;
            }
            if let Some(group) = resolve_group(own_groups.iter().copied(), &predicate.operand) {
                *predicate = Predicate::new(MatchField::InGroup, None, group.to_string());
            }
        }
    }

    fn candidates(&self, world: &dyn World, session: &Session) -> Vec<VehicleId> {
        let company = session.company(world);
        world
            .vehicles()
            .iter()
            .filter(|vehicle| Some(vehicle.owner) == company)
            .filter(|vehicle| {
                self.vehicle_type
                    .map_or(true, |wanted| vehicle.vehicle_type == wanted)
            })
            .map(|vehicle| vehicle.id)
            .collect()
    }

    fn lookup<'w>(&self, world: &'w dyn World, id: VehicleId) -> Option<&'w Vehicle> {
        world.vehicle(id)
    }

    fn evaluate(
        &self,
        vehicle: &Vehicle,
        predicate: &Predicate<'_>,
        world: &dyn World,
        _session: &Session,
    ) -> bool {
        let operand = predicate.operand.as_ref();
        match predicate.field {
            MatchField::All => true,
            MatchField::Crashed => vehicle.crashed,
            MatchField::Broken => vehicle.is_broken_down(),
            MatchField::InDepot => vehicle.in_depot,
            MatchField::Generic => parse_integer(operand) == Some(i64::from(vehicle.unit_number)),
            MatchField::InGroup => vehicle
                .group
                .is_some_and(|group| parse_integer(operand) == Some(i64::from(group))),
            MatchField::Group => {
                let (Some(op), Some(group)) = (predicate.op, vehicle.group) else {
                    return false;
                };
                world
                    .group_name(group)
                    .is_some_and(|name| compare_text(&name, op, operand))
            }
            field => {
                let Some(op) = predicate.op else {
                    return false;
                };
                if let Some(value) = Self::numeric_value(vehicle, field) {
                    compare_integer(value, op, operand)
                } else if let Some(profit) = Self::profit_value(vehicle, field) {
                    compare_money(profit, op, operand)
                } else {
                    false
                }
            }
        }
    }

    fn accepts(&self, vehicle: &Vehicle, command: &Descriptor<VehicleCommand>) -> bool {
        let req = command.req;
        if req.contains(Requirement::NOT_CRASHED) && vehicle.crashed {
            return false;
        }
        if req.contains(Requirement::STOPPED) && !vehicle.stopped {
            return false;
        }
        if req.contains(Requirement::IN_DEPOT) && !vehicle.in_depot {
            return false;
        }
        req.contains(Requirement::from(vehicle.vehicle_type))
    }

    fn execute<G: World + CommandGateway>(
        &self,
        vehicle: &Vehicle,
        command: VehicleCommand,
        params: &[&str],
        world: &mut G,
        session: &mut Session,
        out: &mut ConsoleOutput,
    ) -> u32 {
        let id = vehicle.id;
        match command {
            VehicleCommand::Count => 1,
            VehicleCommand::Open => {
                world.focus(ViewRequest::VehicleWindow(id));
                1
            }
            VehicleCommand::Center => {
                world.focus(ViewRequest::ScrollTo(vehicle.position));
                1
            }
            VehicleCommand::Info => {
                print_info(vehicle, out);
                1
            }
            VehicleCommand::WagonInfo => {
                print_wagons(vehicle, out);
                1
            }
            VehicleCommand::Interval => change_interval(vehicle, params, world),
            VehicleCommand::Skip => {
                let offset = match params.first() {
                    None => Some(1),
                    Some(param) if param.starts_with(&['r', 'R'][..]) => {
                        Some(session.random_offset())
                    }
                    Some(param) => parse_integer(param),
                };
                offset.map_or(0, |offset| skip_orders(vehicle, offset, world))
            }
            VehicleCommand::Leave => {
                if vehicle.current_order.kind == OrderKind::Loading {
                    skip_orders(vehicle, 1, world)
                } else {
                    0
                }
            }
            VehicleCommand::Ignore => {
                dispatch(world, GameCommand::ForceProceed { vehicle: id });
                1
            }
            VehicleCommand::Turn => {
                let command = match vehicle.vehicle_type {
                    VehicleType::Train => GameCommand::ReverseTrain { vehicle: id },
                    VehicleType::Road => GameCommand::TurnRoadVehicle { vehicle: id },
                    VehicleType::Ship | VehicleType::Aircraft => return 0,
                };
                dispatch(world, command);
                1
            }
            VehicleCommand::Start | VehicleCommand::Stop => {
                let wants_stopped = command == VehicleCommand::Stop;
                if vehicle.stopped == wants_stopped {
                    return 0;
                }
                dispatch(world, GameCommand::StartStop { vehicle: id });
                1
            }
            VehicleCommand::Depot
            | VehicleCommand::Service
            | VehicleCommand::Undepot
            | VehicleCommand::Unservice => depot_order(vehicle, command, world),
            VehicleCommand::Clone | VehicleCommand::CloneShared => {
                let Some(copies) = repetitions(params) else {
                    return 0;
                };
                let share_orders = command == VehicleCommand::CloneShared;
                for _ in 0..copies {
                    dispatch(
                        world,
                        GameCommand::CloneVehicle {
                            vehicle: id,
                            share_orders,
                        },
                    );
                }
                u32::from(copies > 0)
            }
            VehicleCommand::Sell => {
                dispatch(
                    world,
                    GameCommand::SellVehicle {
                        vehicle: id,
                        sell_chain: vehicle.vehicle_type == VehicleType::Train,
                    },
                );
                1
            }
            VehicleCommand::SellWagon => sell_wagons(vehicle, params, world),
        }
    }
}

/// Optional repetition count: 1 when absent, `None` when malformed, and at
/// most [`MAX_REPETITIONS`].
pub(crate) fn repetitions(params: &[&str]) -> Option<u32> {
    match params.first() {
        None => Some(1),
        Some(param) => {
            parse_integer(param).map(|count| count.clamp(0, i64::from(MAX_REPETITIONS)) as u32)
        }
    }
}

fn clamp_service_interval(requested: i64, percent: bool) -> u32 {
    let (min, max) = if percent {
        SERVICE_PERCENT_RANGE
    } else {
        SERVICE_DAYS_RANGE
    };
    requested.clamp(min, max) as u32
}

fn change_interval<G: World + CommandGateway>(
    vehicle: &Vehicle,
    params: &[&str],
    world: &mut G,
) -> u32 {
    let Some(requested) = params.first().and_then(|param| parse_integer(param)) else {
        return 0;
    };
    let percent = world
        .company(vehicle.owner)
        .is_some_and(|company| company.service_interval_percent);
    let interval = clamp_service_interval(requested, percent);
    if interval == vehicle.service_interval {
        return 0;
    }
    dispatch(
        world,
        GameCommand::ChangeServiceInterval {
            vehicle: vehicle.id,
            interval,
        },
    );
    1
}

/// Skip `offset` orders ahead, wrapping on the order count; targets before
/// the first order land on the last one. Offsets that overflow do nothing.
fn skip_orders<G: CommandGateway>(vehicle: &Vehicle, offset: i64, gateway: &mut G) -> u32 {
    if offset == 0 || vehicle.order_count == 0 {
        return 0;
    }
    let count = i64::from(vehicle.order_count);
    let Some(target) = i64::from(vehicle.current_order.index).checked_add(offset) else {
        return 0;
    };
    let mut order = target % count;
    if order < 0 {
        order = count - 1;
    }
    dispatch(
        gateway,
        GameCommand::SkipToOrder {
            vehicle: vehicle.id,
            order: order as u32,
        },
    );
    1
}

fn depot_order<G: CommandGateway>(
    vehicle: &Vehicle,
    command: VehicleCommand,
    gateway: &mut G,
) -> u32 {
    if vehicle.stopped && vehicle.in_depot {
        return 0;
    }
    let blocked = match vehicle.heading_to_depot() {
        Some(true) => matches!(command, VehicleCommand::Depot | VehicleCommand::Unservice),
        Some(false) => matches!(command, VehicleCommand::Undepot | VehicleCommand::Service),
        None => matches!(command, VehicleCommand::Undepot | VehicleCommand::Unservice),
    };
    if blocked {
        return 0;
    }
    dispatch(
        gateway,
        GameCommand::SendToDepot {
            vehicle: vehicle.id,
            service_only: matches!(command, VehicleCommand::Service | VehicleCommand::Unservice),
        },
    );
    1
}

/// Sell wagons `min..=max`, counting from the head engine at 0 and skipping
/// articulated parts.
fn sell_wagons<G: CommandGateway>(vehicle: &Vehicle, params: &[&str], gateway: &mut G) -> u32 {
    let parse_index = |param: &&str| {
        parse_integer(param).and_then(|index| usize::try_from(index).ok())
    };
    let Some(min) = params.first().and_then(parse_index) else {
        return 0;
    };
    let max = match params.get(1) {
        Some(param) => match parse_index(param) {
            Some(max) => max,
            None => return 0,
        },
        None => min,
    };
    if max < min {
        return 0;
    }

    let batch: Vec<VehicleId> = vehicle
        .parts
        .iter()
        .filter(|part| !part.articulated)
        .enumerate()
        .skip(min)
        .take_while(|(index, _)| *index <= max)
        .map(|(_, part)| part.id)
        .take(MAX_WAGON_BATCH)
        .collect();
    if batch.is_empty() {
        return 0;
    }
    for part in batch {
        dispatch(gateway, GameCommand::SellWagon { part });
    }
    1
}

fn print_info(vehicle: &Vehicle, out: &mut ConsoleOutput) {
    let flag = |set: bool, text: &'static str| if set { text } else { "" };
    out.print(format!(
        "#{:>4}, Location: [{}, {}, {}]{}{}{}{}",
        vehicle.unit_number,
        vehicle.position.x,
        vehicle.position.y,
        vehicle.position.z,
        flag(vehicle.stopped, " (STOPPED)"),
        flag(vehicle.crashed, " (CRASHED)"),
        flag(vehicle.is_broken_down(), " (BROKEN)"),
        flag(vehicle.in_depot, " (IN DEPOT)"),
    ));
    out.print(format!(
        "      Age: {}/{} years",
        vehicle.age_years(),
        vehicle.max_age_days / 365
    ));
    match (vehicle.vehicle_type, vehicle.train.as_ref()) {
        (VehicleType::Train, Some(cache)) => {
            out.print(format!(
                "      Speed: {}/{} km/h, Orders: {}",
                vehicle.cur_speed, cache.max_speed, vehicle.order_count
            ));
            out.print(format!(
                "      Length: {} tiles, Power: {} hp,  Weight: {} t",
                vehicle.length_tiles(),
                cache.power,
                cache.weight
            ));
        }
        (vehicle_type, _) => {
            // Road vehicles and ships keep speeds in half km/h.
            let factor = match vehicle_type {
                VehicleType::Road | VehicleType::Ship => 2,
                VehicleType::Train | VehicleType::Aircraft => 1,
            };
            out.print(format!(
                "      Speed: {}/{} km/h, Orders: {}",
                vehicle.cur_speed / factor,
                vehicle.cached_max_speed() / factor,
                vehicle.order_count
            ));
        }
    }
    out.print(format!(
        "      Service interval: {} days/%, Breakdowns: {} (reliability {}%)",
        vehicle.service_interval,
        vehicle.breakdowns_since_service,
        vehicle.reliability_percent()
    ));
}

fn print_wagons(vehicle: &Vehicle, out: &mut ConsoleOutput) {
    out.print(format!("Train #{:>4} wagons", vehicle.unit_number));
    for (index, part) in vehicle.parts.iter().enumerate() {
        out.print(format!(
            "{:>2},  Cargo capacity: {} ({}),  Max speed: {} km/h {}",
            index + 1,
            part.capacity,
            part.cargo,
            part.max_speed,
            if part.engine { " (engine)" } else { "" }
        ));
    }
}
