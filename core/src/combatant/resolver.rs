//! Party member name substitution
//!
//! Rewrites party member names inside telop messages according to the
//! configured display style. Replacement is a plain sequential substring
//! pass in party order; when two members' name forms collide, the earlier
//! party slot wins. That ordering is the defined tie-break.

use telop_types::NameStyle;

use crate::combatant::model::Combatant;

/// Replace every occurrence of a party member's name in `text` with the
/// configured display form.
///
/// `FullName` rewrites any abbreviated form back to the full name; the other
/// styles rewrite the full name to the selected abbreviation.
pub fn replace_party_member_names(text: &str, party: &[Combatant], style: NameStyle) -> String {
    let mut result = text.to_string();

    for member in party {
        match style {
            NameStyle::FullName => {
                result = result.replace(&member.name_fi, &member.name);
                result = result.replace(&member.name_if, &member.name);
                result = result.replace(&member.name_ii, &member.name);
            }
            NameStyle::FullInitial => {
                result = result.replace(&member.name, &member.name_fi);
            }
            NameStyle::InitialFull => {
                result = result.replace(&member.name, &member.name_if);
            }
            NameStyle::InitialInitial => {
                result = result.replace(&member.name, &member.name_ii);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::RawCombatant;

    fn member(name: &str) -> Combatant {
        Combatant::from_raw(RawCombatant {
            id: 1,
            kind: 1,
            name: name.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn full_initial_abbreviates_full_name() {
        let party = vec![member("Alice Wonder")];
        let out = replace_party_member_names("Alice Wonder did 100 damage", &party, NameStyle::FullInitial);
        assert_eq!(out, "Alice W. did 100 damage");
    }

    #[test]
    fn initial_full_and_initial_initial() {
        let party = vec![member("Alice Wonder")];
        assert_eq!(
            replace_party_member_names("Alice Wonder casts", &party, NameStyle::InitialFull),
            "A. Wonder casts"
        );
        assert_eq!(
            replace_party_member_names("Alice Wonder casts", &party, NameStyle::InitialInitial),
            "A. W. casts"
        );
    }

    #[test]
    fn full_name_reverses_all_three_abbreviations() {
        let party = vec![member("Alice Wonder")];
        for abbreviated in ["Alice W. falls", "A. Wonder falls", "A. W. falls"] {
            assert_eq!(
                replace_party_member_names(abbreviated, &party, NameStyle::FullName),
                "Alice Wonder falls"
            );
        }
    }

    #[test]
    fn replacement_applies_to_every_occurrence() {
        let party = vec![member("Alice Wonder")];
        let out = replace_party_member_names(
            "Alice Wonder heals Alice Wonder",
            &party,
            NameStyle::InitialInitial,
        );
        assert_eq!(out, "A. W. heals A. W.");
    }

    #[test]
    fn colliding_members_resolve_in_party_order() {
        // Both members abbreviate to forms containing "A."; the first party
        // slot rewrites first and is not re-scanned by the second.
        let party = vec![member("Alice Wonder"), member("Alfred Wintry")];
        let out = replace_party_member_names(
            "Alice Wonder and Alfred Wintry",
            &party,
            NameStyle::FullInitial,
        );
        assert_eq!(out, "Alice W. and Alfred W.");
    }

    #[test]
    fn empty_party_leaves_text_alone() {
        let out = replace_party_member_names("The BOSS appears.", &[], NameStyle::FullInitial);
        assert_eq!(out, "The BOSS appears.");
    }
}
