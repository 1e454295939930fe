//! Town queries.

use super::{
    compare::{compare_integer, eq_ignore_case, parse_integer},
    descriptor::{Descriptor, MatchField, TownCommand, TOWN_COMMANDS},
    error::QueryError,
    expr::Predicate,
    requirement::Requirement,
    resolve::Resolved,
    session::Session,
    target::{dispatch, QueryTarget},
    vehicle::repetitions,
};
use crate::{
    console::ConsoleOutput,
    world::{CommandGateway, GameCommand, Town, TownAction, TownId, ViewRequest, World},
};

/// Towns, visited in world order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TownTarget;

impl TownTarget {
    fn numeric_value(town: &Town, field: MatchField, company: Option<u8>) -> Option<i64> {
        let value = match field {
            MatchField::Population => i64::from(town.population),
            MatchField::Houses => i64::from(town.houses),
            MatchField::Rating => i64::from(town.rating_of(company?)),
            MatchField::Noise => i64::from(town.noise_reached),
            MatchField::NoiseRemaining => town.noise_remaining(),
            MatchField::NoiseMax => i64::from(town.max_noise),
            MatchField::Funding => i64::from(town.fund_buildings_months),
            MatchField::Roadworks => i64::from(town.road_build_months),
            MatchField::ExclusiveCompany => {
                if town.exclusive_counter == 0 {
                    return None;
                }
                i64::from(town.exclusivity?)
            }
            MatchField::ExclusiveMonths => i64::from(town.exclusive_counter),
            MatchField::MyExclusiveMonths => {
                let company = company?;
                if town.exclusivity != Some(company) {
                    return None;
                }
                i64::from(town.exclusive_counter)
            }
            MatchField::OtherExclusiveMonths => {
                let company = company?;
                match town.exclusivity {
                    Some(holder) if holder != company => i64::from(town.exclusive_counter),
                    _ => return None,
                }
            }
            MatchField::UnwantedMonths => i64::from(town.unwanted_months(company?)),
            _ => return None,
        };
        Some(value)
    }

    fn action(command: TownCommand) -> Option<TownAction> {
        let action = match command {
            TownCommand::AdSmall => TownAction::AdvertiseSmall,
            TownCommand::AdMedium => TownAction::AdvertiseMedium,
            TownCommand::AdLarge => TownAction::AdvertiseLarge,
            TownCommand::Road => TownAction::RoadReconstruction,
            TownCommand::Statue => TownAction::BuildStatue,
            TownCommand::Fund => TownAction::FundBuildings,
            TownCommand::Exclusive => TownAction::BuyExclusivity,
            TownCommand::Bribe => TownAction::Bribe,
            _ => return None,
        };
        Some(action)
    }
}

impl QueryTarget for TownTarget {
    type Command = TownCommand;
    type Entity = Town;
    type Id = TownId;

    fn noun(&self) -> &'static str {
        "town"
    }

    fn plural(&self) -> &'static str {
        "towns"
    }

    fn keyword(&self) -> &'static str {
        "town"
    }

    fn mask(&self) -> Requirement {
        Requirement::TOWN
    }

    fn commands(&self) -> &'static [Descriptor<TownCommand>] {
        TOWN_COMMANDS
    }

    fn help_hints(&self) -> Vec<String> {
        vec![" name of town or ID of town".to_string()]
    }

    fn check_command(
        &self,
        command: &Resolved<'static, TownCommand>,
        session: &Session,
    ) -> Result<(), QueryError> {
        if command.id == TownCommand::Delete && session.networked {
            return Err(QueryError::NetworkedDelete(self.noun()));
        }
        Ok(())
    }

    fn candidates(&self, world: &dyn World, _session: &Session) -> Vec<TownId> {
        world.towns().iter().map(|town| town.id).collect()
    }

    fn lookup<'w>(&self, world: &'w dyn World, id: TownId) -> Option<&'w Town> {
        world.town(id)
    }

    fn evaluate(
        &self,
        town: &Town,
        predicate: &Predicate<'_>,
        world: &dyn World,
        session: &Session,
    ) -> bool {
        let operand = predicate.operand.as_ref();
        let company = session.company(world);
        match predicate.field {
            MatchField::All => true,
            MatchField::Generic => {
                eq_ignore_case(&town.name, operand)
                    || parse_integer(operand) == Some(i64::from(town.id))
            }
            MatchField::Statue => company.is_some_and(|company| town.statues.contains(&company)),
            MatchField::NoStatue => company.is_some_and(|company| !town.statues.contains(&company)),
            field => match (predicate.op, Self::numeric_value(town, field, company)) {
                (Some(op), Some(value)) => compare_integer(value, op, operand),
                _ => false,
            },
        }
    }

    fn execute<G: World + CommandGateway>(
        &self,
        town: &Town,
        command: TownCommand,
        params: &[&str],
        world: &mut G,
        session: &mut Session,
        out: &mut ConsoleOutput,
    ) -> u32 {
        let id = town.id;
        match command {
            TownCommand::Count => 1,
            TownCommand::Center => {
                world.focus(ViewRequest::ScrollTo(town.position));
                1
            }
            TownCommand::Print => {
                out.print(format!("{:<20}  ({})", town.name, town.population));
                1
            }
            TownCommand::Info => {
                print_info(town, &*world, out);
                1
            }
            TownCommand::Open => {
                world.focus(ViewRequest::TownWindow(id));
                1
            }
            TownCommand::Authority => {
                world.focus(ViewRequest::TownAuthority(id));
                1
            }
            TownCommand::Expand => {
                let Some(times) = repetitions(params) else {
                    return 0;
                };
                for _ in 0..times {
                    dispatch(world, GameCommand::ExpandTown { town: id });
                }
                u32::from(times > 0)
            }
            TownCommand::Delete => {
                dispatch(world, GameCommand::DeleteTown { town: id });
                1
            }
            TownCommand::AdSmall
            | TownCommand::AdMedium
            | TownCommand::AdLarge
            | TownCommand::Road
            | TownCommand::Statue
            | TownCommand::Fund
            | TownCommand::Exclusive
            | TownCommand::Bribe => {
                let Some(action) = Self::action(command) else {
                    return 0;
                };
                let company = session.company(&*world);
                dispatch(
                    world,
                    GameCommand::TownAction {
                        town: id,
                        action,
                        company,
                    },
                );
                1
            }
        }
    }
}

fn print_info(town: &Town, world: &dyn World, out: &mut ConsoleOutput) {
    out.print(format!(
        "ID: {:>4} {:<20}, population: {:>4} houses: {:>4}{}",
        town.id,
        town.name,
        town.population,
        town.houses,
        if town.larger_town { " (Larger town)" } else { "" }
    ));
    out.print(format!(
        "  Noise: {}/{}, Road layout: {}",
        town.noise_reached,
        town.max_noise,
        town.layout.label()
    ));
    if town.fund_buildings_months > 0 {
        out.print(format!(
            "  Fund buildings : {} months.",
            town.fund_buildings_months
        ));
    }
    if town.road_build_months > 0 {
        out.print(format!(
            " Road reconstruction : {} months.",
            town.road_build_months
        ));
    }

    for company in world.companies() {
        let id = company.id;
        let exclusive = town.exclusivity == Some(id);
        let statue = town.statues.contains(&id);
        if !(town.ratings.contains_key(&id) || exclusive || statue) {
            continue;
        }
        let unwanted = town.unwanted_months(id);
        out.print(format!(
            " Company {:>2} : rating {}{}{}{}",
            id,
            town.rating_of(id),
            if exclusive { " (EXCLUSIVE)" } else { "" },
            if unwanted > 0 { " (UNWANTED)" } else { "" },
            if statue { " (STATUE)" } else { "" }
        ));
        if exclusive {
            out.print(format!(
                "  Exclusivity expires in {} months",
                town.exclusive_counter
            ));
        }
        if unwanted > 0 {
            out.print(format!("  Unwanted for {unwanted} months"));
        }
    }
}
