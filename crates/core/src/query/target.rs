//! Capability interface implemented once per entity kind.

use tracing::debug;

use super::{
    chain::Chain,
    descriptor::Descriptor,
    error::QueryError,
    expr::Predicate,
    requirement::Requirement,
    resolve::Resolved,
    session::Session,
};
use crate::{
    console::ConsoleOutput,
    world::{CommandGateway, GameCommand, World},
};

/// What the shared runner needs to know about one kind of entity.
pub trait QueryTarget {
    /// Command identifiers of this kind.
    type Command: Copy + PartialEq + std::fmt::Debug + 'static;
    /// Entity visited by queries.
    type Entity: Clone;
    /// Entity identifier collected before commands run.
    type Id: Copy + std::fmt::Debug;

    /// Singular noun used in messages, e.g. `road vehicle`.
    fn noun(&self) -> &'static str;

    /// Plural noun used in the summary line.
    fn plural(&self) -> &'static str;

    /// Console keyword that invokes this target.
    fn keyword(&self) -> &'static str;

    /// Applicability bits of this target.
    fn mask(&self) -> Requirement;

    /// Command table of this kind.
    fn commands(&self) -> &'static [Descriptor<Self::Command>];

    /// Extra identifier forms listed at the end of the usage text.
    fn help_hints(&self) -> Vec<String>;

    /// Session preconditions checked before anything is parsed.
    fn check_session(&self, _world: &dyn World, _session: &Session) -> Result<(), QueryError> {
        Ok(())
    }

    /// Target-specific refusals for a resolved command.
    fn check_command(
        &self,
        _command: &Resolved<'static, Self::Command>,
        _session: &Session,
    ) -> Result<(), QueryError> {
        Ok(())
    }

    /// Rewrite the chain once per invocation before evaluation.
    fn prepare(&self, _chain: &mut Chain<'_>, _world: &dyn World, _session: &Session) {}

    /// Ids of the entities a query may visit, in visiting order.
    fn candidates(&self, world: &dyn World, session: &Session) -> Vec<Self::Id>;

    /// Current state of entity `id`, if it still exists.
    fn lookup<'w>(&self, world: &'w dyn World, id: Self::Id) -> Option<&'w Self::Entity>;

    /// Evaluate one predicate against one entity.
    fn evaluate(
        &self,
        entity: &Self::Entity,
        predicate: &Predicate<'_>,
        world: &dyn World,
        session: &Session,
    ) -> bool;

    /// Per-entity gate applied after a match; rejected entities count as
    /// matched but not affected.
    fn accepts(&self, _entity: &Self::Entity, _command: &Descriptor<Self::Command>) -> bool {
        true
    }

    /// Apply `command` to `entity`, returning 1 if it was affected.
    #[allow(clippy::too_many_arguments)]
    fn execute<G: World + CommandGateway>(
        &self,
        entity: &Self::Entity,
        command: Self::Command,
        params: &[&str],
        world: &mut G,
        session: &mut Session,
        out: &mut ConsoleOutput,
    ) -> u32;
}

/// Issue a command, logging refusals. Outcomes do not feed the affected count.
pub(crate) fn dispatch<G: CommandGateway + ?Sized>(gateway: &mut G, command: GameCommand) {
    if let Err(err) = gateway.issue(command.clone()) {
        debug!(?command, %err, "game command refused");
    }
}
