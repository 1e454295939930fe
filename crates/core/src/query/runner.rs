use std::fmt;

use tracing::{debug, info};

use super::{
    chain::build_chain,
    error::QueryError,
    help::print_target_usage,
    requirement::Requirement,
    resolve::resolve,
    session::Session,
    target::QueryTarget,
};
use crate::{
    console::ConsoleOutput,
    world::{CommandGateway, World},
};

/// Tally printed after every completed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Plural noun of the visited kind.
    pub plural: &'static str,
    /// Entities satisfying every criterion.
    pub matched: u32,
    /// Entities the command actually acted on.
    pub affected: u32,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Number of {} matched: {}, affected: {}",
            self.plural, self.matched, self.affected
        )
    }
}

/// What an accepted invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    /// No arguments were given; usage was printed.
    Usage,
    /// Entities were visited and tallied.
    Completed(Summary),
}

/// Parse `args`, select matching entities and apply the command to each.
///
/// Matching ids are collected before any command runs, so commands that
/// remove entities never disturb the visit of the remaining ones.
pub fn run<T, W>(
    target: &T,
    args: &[&str],
    world: &mut W,
    session: &mut Session,
    out: &mut ConsoleOutput,
) -> Result<Invocation, QueryError>
where
    T: QueryTarget,
    W: World + CommandGateway,
{
    if args.is_empty() {
        print_target_usage(target, out);
        return Ok(Invocation::Usage);
    }
    target.check_session(&*world, session)?;
    if args.len() < 2 {
        return Err(QueryError::NotEnoughArguments);
    }

    let mask = target.mask();
    let (mut chain, rest) = build_chain(args, mask)?;
    let Some((&name, params)) = rest.split_first() else {
        return Err(QueryError::MissingCommand);
    };
    let command = resolve(name, target.commands())
        .ok_or_else(|| QueryError::UnknownCommand(name.to_string()))?;
    let descriptor = command.descriptor;

    if params.len() < descriptor.params {
        return Err(QueryError::MissingParameters {
            command: descriptor.name,
            required: descriptor.params,
        });
    }
    if !descriptor.req.intersects(mask) {
        return Err(QueryError::InapplicableCommand {
            command: descriptor.name,
            noun: target.noun(),
        });
    }
    if descriptor.req.contains(Requirement::EDITOR) && !session.in_editor() {
        return Err(QueryError::EditorOnly(descriptor.name));
    }
    target.check_command(&command, session)?;
    target.prepare(&mut chain, &*world, session);
    debug!(
        kind = target.keyword(),
        command = descriptor.name,
        criteria = chain.len(),
        "query parsed"
    );

    let selected: Vec<T::Id> = {
        let view: &dyn World = &*world;
        let session: &Session = session;
        target
            .candidates(view, session)
            .into_iter()
            .filter(|&id| {
                target.lookup(view, id).is_some_and(|entity| {
                    chain.matches(|predicate| target.evaluate(entity, predicate, view, session))
                })
            })
            .collect()
    };

    let mut summary = Summary {
        plural: target.plural(),
        matched: selected.len() as u32,
        affected: 0,
    };
    for id in selected {
        let Some(entity) = target.lookup(&*world, id).cloned() else {
            debug!(?id, "matched entity vanished before its turn");
            continue;
        };
        if !target.accepts(&entity, descriptor) {
            continue;
        }
        summary.affected += target.execute(&entity, command.id, params, world, session, out);
    }

    info!(
        kind = target.keyword(),
        command = descriptor.name,
        matched = summary.matched,
        affected = summary.affected,
        "query completed"
    );
    out.print(summary.to_string());
    Ok(Invocation::Completed(summary))
}
