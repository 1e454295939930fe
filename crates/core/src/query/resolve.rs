//! Name resolution against descriptor tables and group names.

use super::{compare::eq_ignore_case, descriptor::Descriptor};
use crate::world::{Group, GroupId};

/// Canonical table entry a name resolved to.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'t, T> {
    /// Identifier of the canonical entry.
    pub id: T,
    /// The canonical entry itself.
    pub descriptor: &'t Descriptor<T>,
}

/// Resolve `name` against `table`.
///
/// An exact case-insensitive match wins immediately, aliases included.
/// Otherwise `name` must be a prefix of entries that all share one
/// canonical entry; an alias never makes its own target ambiguous.
pub fn resolve<'t, T: Copy + PartialEq>(
    name: &str,
    table: &'t [Descriptor<T>],
) -> Option<Resolved<'t, T>> {
    let mut found: Option<Resolved<'t, T>> = None;
    let mut ambiguous = false;

    for (index, entry) in table.iter().enumerate() {
        let Some(canonical) = canonical_at(table, index) else {
            continue;
        };
        if eq_ignore_case(entry.name, name) {
            return Some(canonical);
        }
        if is_prefix_ignore_case(name, entry.name)
            && found.map(|current| current.id) != Some(canonical.id)
        {
            if found.is_some() {
                ambiguous = true;
            }
            found = Some(canonical);
        }
    }

    found.filter(|_| !ambiguous)
}

fn canonical_at<T: Copy>(table: &[Descriptor<T>], index: usize) -> Option<Resolved<'_, T>> {
    table[index..].iter().find_map(|entry| {
        entry.id.map(|id| Resolved {
            id,
            descriptor: entry,
        })
    })
}

/// `prefix` is non-empty and starts `text`, ignoring case.
pub(crate) fn is_prefix_ignore_case(prefix: &str, text: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    let mut text = text.chars().flat_map(char::to_lowercase);
    prefix
        .chars()
        .flat_map(char::to_lowercase)
        .all(|c| text.next() == Some(c))
}

#[derive(Debug, Clone, Copy)]
enum Candidate {
    None,
    One(GroupId),
    Many,
}

impl Candidate {
    fn offer(&mut self, id: GroupId) {
        *self = match *self {
            Candidate::None => Candidate::One(id),
            _ => Candidate::Many,
        };
    }

    fn unique(self) -> Option<GroupId> {
        match self {
            Candidate::One(id) => Some(id),
            _ => None,
        }
    }
}

/// Find a group by display name: exact, then unique case-insensitive, then
/// unique case-insensitive prefix.
pub fn resolve_group<'g>(groups: impl IntoIterator<Item = &'g Group>, name: &str) -> Option<GroupId> {
    let mut nocase = Candidate::None;
    let mut prefix = Candidate::None;

    for group in groups {
        let display = group.display_name();
        if display == name {
            return Some(group.id);
        }
        if eq_ignore_case(&display, name) {
            nocase.offer(group.id);
        } else if is_prefix_ignore_case(name, &display) {
            prefix.offer(group.id);
        }
    }

    nocase.unique().or_else(|| prefix.unique())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{
        descriptor::{VehicleCommand, TOWN_COMMANDS, VEHICLE_COMMANDS},
        requirement::Requirement,
    };
    use crate::world::testing;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Cmd {
        Center,
        Service,
        Servicing,
        Stop,
    }

    fn entry(id: Cmd, name: &'static str) -> Descriptor<Cmd> {
        Descriptor {
            id: Some(id),
            name,
            params: 0,
            req: Requirement::VEHICLE,
            help: "",
        }
    }

    fn alias(name: &'static str) -> Descriptor<Cmd> {
        Descriptor {
            id: None,
            name,
            params: 0,
            req: Requirement::ALIAS,
            help: "",
        }
    }

    fn table() -> Vec<Descriptor<Cmd>> {
        vec![
            alias("centre"),
            entry(Cmd::Center, "center"),
            entry(Cmd::Service, "service"),
            entry(Cmd::Servicing, "servicing"),
            entry(Cmd::Stop, "stop"),
        ]
    }

    fn id_of(name: &str, table: &[Descriptor<Cmd>]) -> Option<Cmd> {
        resolve(name, table).map(|resolved| resolved.id)
    }

    #[test]
    fn exact_match_beats_prefix_and_follows_alias() {
        let table = table();
        assert_eq!(id_of("CENTER", &table), Some(Cmd::Center));
        assert_eq!(id_of("Centre", &table), Some(Cmd::Center));
        assert_eq!(id_of("service", &table), Some(Cmd::Service));
        assert_eq!(resolve("centre", &table).map(|r| r.descriptor.name), Some("center"));
    }

    #[test]
    fn alias_does_not_make_its_target_ambiguous() {
        let table = table();
        assert_eq!(id_of("cent", &table), Some(Cmd::Center));
        assert_eq!(id_of("c", &table), Some(Cmd::Center));
    }

    #[test]
    fn ambiguous_prefix_is_rejected() {
        let table = table();
        assert_eq!(id_of("servi", &table), None);
        assert_eq!(id_of("serv", &table), None);
        assert_eq!(id_of("s", &table), None);
        assert_eq!(id_of("servici", &table), Some(Cmd::Servicing));
        assert_eq!(id_of("st", &table), Some(Cmd::Stop));
    }

    #[test]
    fn empty_and_unknown_names_do_not_resolve() {
        let table = table();
        assert_eq!(id_of("", &table), None);
        assert_eq!(id_of("launch", &table), None);
        assert_eq!(id_of("stopped", &table), None);
    }

    #[test]
    fn vehicle_table_resolution() {
        let id = |name| resolve(name, VEHICLE_COMMANDS).map(|r| r.id);
        assert_eq!(id("sh"), Some(VehicleCommand::Open));
        assert_eq!(id("go"), Some(VehicleCommand::Start));
        assert_eq!(id("rev"), Some(VehicleCommand::Turn));
        assert_eq!(id("wi"), Some(VehicleCommand::WagonInfo));
        assert_eq!(id("w"), None);
        assert_eq!(id("c"), None);
        assert_eq!(id("clone"), Some(VehicleCommand::Clone));
    }

    #[test]
    fn town_aliases_resolve_to_actions() {
        let name = |input| resolve(input, TOWN_COMMANDS).map(|r| r.descriptor.name);
        assert_eq!(name("small_ad"), Some("ad_small"));
        assert_eq!(name("building"), Some("fund"));
        assert_eq!(name("recon"), Some("road"));
        assert_eq!(name("ad"), None);
    }

    #[test]
    fn group_lookup_prefers_case_sensitive_then_unique() {
        let groups = vec![
            testing::group(1, testing::LOCAL, "Coal Trains"),
            testing::group(2, testing::LOCAL, "coal trains"),
            testing::group(3, testing::LOCAL, "Mail"),
            testing::group(4, testing::LOCAL, "Mail Express"),
        ];
        assert_eq!(resolve_group(&groups, "coal trains"), Some(2));
        assert_eq!(resolve_group(&groups, "COAL TRAINS"), None);
        assert_eq!(resolve_group(&groups, "mail"), Some(3));
        assert_eq!(resolve_group(&groups, "mail ex"), Some(4));
        assert_eq!(resolve_group(&groups, "ma"), None);
        assert_eq!(resolve_group(&groups, "Bus"), None);
    }
}
