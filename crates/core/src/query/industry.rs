//! Industry queries.

use super::{
    compare::{compare_integer, eq_ignore_case, parse_integer},
    descriptor::{Descriptor, IndustryCommand, MatchField, INDUSTRY_COMMANDS},
    error::QueryError,
    expr::Predicate,
    requirement::Requirement,
    resolve::Resolved,
    session::Session,
    target::{dispatch, QueryTarget},
};
use crate::{
    console::ConsoleOutput,
    world::{
        models::percent, CommandGateway, GameCommand, Industry, IndustryId, Month, ViewRequest,
        World,
    },
};

const PRODUCED_SLOTS: usize = 2;
const ACCEPTED_SLOTS: usize = 3;

/// Industries, visited in world order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndustryTarget;

impl IndustryTarget {
    fn numeric_value(industry: &Industry, field: MatchField) -> Option<i64> {
        let value = match field {
            MatchField::Production => industry.production(Month::Last),
            MatchField::ProductionThis => industry.production(Month::This),
            MatchField::Percent => industry.percent_transported(Month::Last),
            MatchField::PercentThis => industry.percent_transported(Month::This),
            _ => return None,
        };
        Some(i64::from(value))
    }
}

fn town_name<'w>(world: &'w dyn World, industry: &Industry) -> &'w str {
    world
        .town(industry.town)
        .map(|town| town.name.as_str())
        .unwrap_or("?")
}

impl QueryTarget for IndustryTarget {
    type Command = IndustryCommand;
    type Entity = Industry;
    type Id = IndustryId;

    fn noun(&self) -> &'static str {
        "industry"
    }

    fn plural(&self) -> &'static str {
        "industries"
    }

    fn keyword(&self) -> &'static str {
        "industry"
    }

    fn mask(&self) -> Requirement {
        Requirement::INDUSTRY
    }

    fn commands(&self) -> &'static [Descriptor<IndustryCommand>] {
        INDUSTRY_COMMANDS
    }

    fn help_hints(&self) -> Vec<String> {
        vec![" name of town, to which the industry belongs, or ID of industry".to_string()]
    }

    fn check_command(
        &self,
        command: &Resolved<'static, IndustryCommand>,
        session: &Session,
    ) -> Result<(), QueryError> {
        if command.id == IndustryCommand::Delete && session.networked {
            return Err(QueryError::NetworkedDelete(self.noun()));
        }
        Ok(())
    }

    fn candidates(&self, world: &dyn World, _session: &Session) -> Vec<IndustryId> {
        world.industries().iter().map(|industry| industry.id).collect()
    }

    fn lookup<'w>(&self, world: &'w dyn World, id: IndustryId) -> Option<&'w Industry> {
        world.industry(id)
    }

    fn evaluate(
        &self,
        industry: &Industry,
        predicate: &Predicate<'_>,
        world: &dyn World,
        _session: &Session,
    ) -> bool {
        let operand = predicate.operand.as_ref();
        match predicate.field {
            MatchField::All => true,
            MatchField::Generic => {
                world
                    .town(industry.town)
                    .is_some_and(|town| eq_ignore_case(&town.name, operand))
                    || parse_integer(operand) == Some(i64::from(industry.id))
            }
            field => match (predicate.op, Self::numeric_value(industry, field)) {
                (Some(op), Some(value)) => compare_integer(value, op, operand),
                _ => false,
            },
        }
    }

    fn execute<G: World + CommandGateway>(
        &self,
        industry: &Industry,
        command: IndustryCommand,
        _params: &[&str],
        world: &mut G,
        _session: &mut Session,
        out: &mut ConsoleOutput,
    ) -> u32 {
        match command {
            IndustryCommand::Count => {}
            IndustryCommand::Center => world.focus(ViewRequest::ScrollTo(industry.position)),
            IndustryCommand::Info => print_info(industry, &*world, out),
            IndustryCommand::Open => world.focus(ViewRequest::IndustryWindow(industry.id)),
            IndustryCommand::Delete => {
                print_header(industry, &*world, out);
                dispatch(
                    world,
                    GameCommand::DeleteIndustry {
                        industry: industry.id,
                    },
                );
            }
        }
        1
    }
}

fn print_header(industry: &Industry, world: &dyn World, out: &mut ConsoleOutput) {
    out.print(format!(
        "ID: {} Town: {:<20}",
        industry.id,
        town_name(world, industry)
    ));
    out.print(format!("  Size: {} x {}", industry.width, industry.height));
}

fn print_info(industry: &Industry, world: &dyn World, out: &mut ConsoleOutput) {
    print_header(industry, world, out);
    for slot in industry.produced.iter().take(PRODUCED_SLOTS) {
        out.print(format!(
            "  Cargo produced: {} ({} per month, {} waiting)",
            slot.cargo, slot.rate, slot.waiting
        ));
        out.print(format!(
            "    This month transported/produced: {}/{} ({}%)",
            slot.this_month_transported,
            slot.this_month_production,
            percent(slot.this_month_transported, slot.this_month_production)
        ));
        out.print(format!(
            "    Last month transported/produced: {}/{} ({}%)",
            slot.last_month_transported,
            slot.last_month_production,
            percent(slot.last_month_transported, slot.last_month_production)
        ));
    }
    out.print(format!(
        "  General production level: {}",
        industry.production_level
    ));
    for slot in industry.accepted.iter().take(ACCEPTED_SLOTS) {
        out.print(format!(
            "  Cargo accepted: {} (waiting {})",
            slot.cargo, slot.waiting
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{run_query, Invocation, TargetKind};
    use crate::world::{testing, AcceptedCargo, ProducedCargo, WorldSnapshot};

    fn mine(id: IndustryId, town: u32, last_production: u32, last_transported: u32) -> Industry {
        let mut industry = Industry::new(id, town, "Coal Mine");
        industry.width = 4;
        industry.height = 4;
        industry.production_level = 16;
        industry.produced.push(ProducedCargo {
            cargo: "Coal".to_string(),
            rate: 90,
            waiting: 12,
            last_month_production: last_production,
            last_month_transported: last_transported,
            ..ProducedCargo::default()
        });
        industry
    }

    fn world() -> WorldSnapshot {
        let mut world = testing::world();
        world.towns.push(testing::town(0, "Ashby", 400));
        world.towns.push(testing::town(1, "Fort Brook", 900));
        world.industries.push(mine(10, 0, 100, 80));
        world.industries.push(mine(11, 1, 200, 20));
        world.industries.push(mine(12, 1, 0, 0));
        world
    }

    fn run_with(
        world: &mut WorldSnapshot,
        session: &mut Session,
        line: &str,
    ) -> Result<(u32, u32, Vec<String>), QueryError> {
        let mut out = ConsoleOutput::new();
        let args: Vec<&str> = line.split_whitespace().collect();
        match run_query(TargetKind::Industry, &args, world, session, &mut out)? {
            Invocation::Completed(summary) => Ok((
                summary.matched,
                summary.affected,
                out.texts().map(str::to_string).collect(),
            )),
            Invocation::Usage => panic!("usage printed for {line}"),
        }
    }

    fn run(world: &mut WorldSnapshot, line: &str) -> (u32, u32, Vec<String>) {
        run_with(world, &mut Session::new(), line).unwrap()
    }

    #[test]
    fn generic_matches_parent_town_or_id() {
        let mut world = world();
        assert_eq!(run(&mut world, "ashby count").0, 1);
        assert_eq!(run(&mut world, "11 count").0, 1);
        assert_eq!(run(&mut world, "fort count").0, 0);
        let lines = run(&mut world, "ashby count").2;
        assert_eq!(lines, vec!["Number of industries matched: 1, affected: 1"]);
    }

    #[test]
    fn production_and_percent_matches() {
        let mut world = world();
        assert_eq!(run(&mut world, "production>=100 count").0, 2);
        assert_eq!(run(&mut world, "percent>50 count").0, 1);
        // No production reads as zero percent.
        assert_eq!(run(&mut world, "percent=0 count").0, 1);
        assert_eq!(run(&mut world, "thisproduction=0 count").0, 3);
        assert_eq!(run(&mut world, "thispercent>0 count").0, 0);
    }

    #[test]
    fn vehicle_matches_are_rejected() {
        let mut world = world();
        assert_eq!(
            run_with(&mut world, &mut Session::new(), "speed>3 count"),
            Err(QueryError::InapplicableMatch("speed".to_string()))
        );
    }

    #[test]
    fn info_prints_cargo_slots() {
        let mut world = world();
        let industry = &mut world.industries[0];
        industry.produced[0].this_month_production = 40;
        industry.produced[0].this_month_transported = 10;
        industry.accepted.push(AcceptedCargo {
            cargo: "Goods".to_string(),
            waiting: 3,
        });

        let lines = run(&mut world, "10 info").2;
        assert_eq!(
            lines,
            vec![
                "ID: 10 Town: Ashby               ",
                "  Size: 4 x 4",
                "  Cargo produced: Coal (90 per month, 12 waiting)",
                "    This month transported/produced: 10/40 (25%)",
                "    Last month transported/produced: 80/100 (80%)",
                "  General production level: 16",
                "  Cargo accepted: Goods (waiting 3)",
                "Number of industries matched: 1, affected: 1",
            ]
        );
    }

    #[test]
    fn delete_prints_header_and_removes() {
        let mut world = world();
        let (matched, affected, lines) = run(&mut world, "fort delete");
        assert_eq!((matched, affected), (0, 0));
        assert!(lines.len() == 1);

        let (matched, affected, lines) = run(&mut world, "production<150 delete");
        assert_eq!((matched, affected), (2, 2));
        assert_eq!(lines[0], "ID: 10 Town: Ashby               ");
        assert_eq!(world.industries.len(), 1);
        assert_eq!(world.industries[0].id, 11);
    }

    #[test]
    fn delete_is_refused_in_networked_session() {
        let mut world = world();
        let mut session = Session::new().networked(true);
        assert_eq!(
            run_with(&mut world, &mut session, "all delete"),
            Err(QueryError::NetworkedDelete("industry"))
        );
        assert_eq!(world.industries.len(), 3);
    }

    #[test]
    fn view_commands_only_focus() {
        let mut world = world();
        run(&mut world, "all open");
        assert_eq!(world.views().len(), 3);
        assert!(world.journal().is_empty());
    }
}
