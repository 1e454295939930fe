//! Usage text printed for a bare query keyword or after a refused invocation.

use super::{
    descriptor::{Descriptor, MatchField, BOOLEAN_MATCHES, NUMERIC_MATCHES},
    requirement::Requirement,
    target::QueryTarget,
};
use crate::console::ConsoleOutput;

/// Print the full usage of `target` at help level.
pub fn print_target_usage<T: QueryTarget>(target: &T, out: &mut ConsoleOutput) {
    let noun = target.noun();
    let mask = target.mask();

    out.help(format!(
        "Invoke command on specified {noun}(s). Usage: '{} <identifier> <command> [<optional command parameters...>]'",
        target.keyword()
    ));
    out.help("Command can be:");
    for line in command_lines(target.commands(), mask) {
        out.help(line);
    }

    out.help("Identifier can be:");
    for line in match_lines(BOOLEAN_MATCHES, noun, mask) {
        out.help(line);
    }
    out.help("Operators < > <= >= and <> can be also used instead of = for following matches:");
    for line in match_lines(NUMERIC_MATCHES, noun, mask) {
        out.help(line);
    }
    out.help("You can specify multiple match conditions before the command.");
    out.help(
        "If you use more than one match condition, you have to separate them by 'and' or '&' parameter. Number of match conditions is not limited.",
    );

    out.help("You can also use:");
    for hint in target.help_hints() {
        out.help(hint);
    }
}

/// One line per applicable command, aliases appended to their canonical entry.
fn command_lines<T>(table: &[Descriptor<T>], mask: Requirement) -> Vec<String> {
    let mut lines = Vec::new();
    let mut aliases: Vec<&str> = Vec::new();

    for entry in table {
        if entry.is_alias() {
            aliases.push(entry.name);
            continue;
        }
        if !entry.req.intersects(mask) {
            aliases.clear();
            continue;
        }
        let suffix = if aliases.is_empty() {
            String::new()
        } else {
            format!(" (Aliases: {})", aliases.join(", "))
        };
        lines.push(format!("  {:<15} {}{}", entry.name, entry.help, suffix));
        aliases.clear();
    }
    lines
}

fn match_lines(table: &[Descriptor<MatchField>], noun: &str, mask: Requirement) -> Vec<String> {
    table
        .iter()
        .filter(|entry| entry.req.intersects(mask))
        .map(|entry| {
            if entry.req.contains(Requirement::PRINTF) {
                format!("  {}{}", entry.name, entry.help.replacen("%s", noun, 1))
            } else {
                format!("  {}{}", entry.name, entry.help)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{town::TownTarget, vehicle::VehicleTarget};
    use crate::world::VehicleType;

    fn usage<T: QueryTarget>(target: &T) -> Vec<String> {
        let mut out = ConsoleOutput::new();
        print_target_usage(target, &mut out);
        out.texts().map(str::to_string).collect()
    }

    #[test]
    fn ship_usage_omits_train_only_commands() {
        let lines = usage(&VehicleTarget::new(Some(VehicleType::Ship)));
        assert_eq!(
            lines[0],
            "Invoke command on specified ship(s). Usage: 'ship <identifier> <command> [<optional command parameters...>]'"
        );
        assert!(lines.iter().all(|line| !line.starts_with("  winfo")));
        assert!(lines.iter().all(|line| !line.starts_with("  ignore")));
        assert!(lines.iter().all(|line| !line.starts_with("  len=")));
        // `reverse` precedes `turn`, which ships cannot do; it must not leak onto the next entry.
        assert!(lines
            .iter()
            .any(|line| line == "  unservice       Cancel order to be sent for servicing"));
        assert!(lines.contains(&"  all for all ships".to_string()));
    }

    #[test]
    fn aliases_are_listed_with_their_command() {
        let lines = usage(&VehicleTarget::new(Some(VehicleType::Train)));
        assert!(lines.contains(
            &"  center          Center main view on vehicle's location (Aliases: centre)".to_string()
        ));
        assert!(lines.contains(&"  turn            Turn around (Aliases: reverse)".to_string()));
    }

    #[test]
    fn town_usage_lists_town_matches_and_hints() {
        let lines = usage(&TownTarget);
        assert!(lines.contains(&"  population=[value] for matching town population".to_string()));
        assert!(lines.contains(&"  statue for all towns where you have a statue".to_string()));
        assert!(!lines.iter().any(|line| line.starts_with("  speed")));
        assert_eq!(lines.last().unwrap(), " name of town or ID of town");
        assert!(lines.iter().all(|line| !line.contains("%s")));
    }
}
