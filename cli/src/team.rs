//! Apple team selection logic.
//!
//! Deciding how a team gets picked is a small decision tree: an explicit
//! identifier skips everything, a single candidate is taken as-is, and two or
//! more candidates need an interactive prompt. The decision is kept pure here;
//! the blocking prompt itself lives in the terminal frontend.

use crate::api::AppleTeam;

/// Outcome of planning a team selection over a fetched candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamSelection {
    /// The account has no Apple teams; the command ends cleanly.
    NoTeams,
    /// Exactly one candidate existed and was auto-selected.
    Resolved(String),
    /// Two or more candidates; the user has to pick one.
    NeedsPrompt(Vec<AppleTeam>),
}

/// Plan how to select a team from the candidates, preserving source order.
#[must_use]
pub fn plan_selection(mut teams: Vec<AppleTeam>) -> TeamSelection {
    match teams.len() {
        0 => TeamSelection::NoTeams,
        1 => TeamSelection::Resolved(teams.remove(0).apple_team_identifier),
        _ => TeamSelection::NeedsPrompt(teams),
    }
}

/// Normalize an explicit `--apple-team-id` value.
///
/// Empty and whitespace-only values count as absent so they fall through to
/// the interactive resolution path instead of tripping the non-empty
/// invariant later on.
#[must_use]
pub fn explicit_identifier(flag: Option<String>) -> Option<String> {
    flag.map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
}

/// Label shown for a team in the selection prompt.
///
/// Teams without a display name fall back to the bare identifier, never a
/// blank label.
#[must_use]
pub fn choice_label(team: &AppleTeam) -> String {
    match team.apple_team_name.as_deref() {
        Some(name) if !name.is_empty() => {
            format!("{name} (ID: {})", team.apple_team_identifier)
        }
        _ => team.apple_team_identifier.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str, name: Option<&str>) -> AppleTeam {
        AppleTeam {
            apple_team_identifier: id.to_string(),
            apple_team_name: name.map(str::to_string),
        }
    }

    #[test]
    fn empty_candidate_list_yields_no_teams() {
        assert_eq!(plan_selection(Vec::new()), TeamSelection::NoTeams);
    }

    #[test]
    fn single_candidate_auto_selects_without_prompting() {
        let plan = plan_selection(vec![team("T1", None)]);
        assert_eq!(plan, TeamSelection::Resolved("T1".to_string()));
    }

    #[test]
    fn multiple_candidates_need_a_prompt_in_source_order() {
        let teams = vec![team("T2", Some("Beta")), team("T1", Some("Alpha"))];
        let plan = plan_selection(teams.clone());
        assert_eq!(plan, TeamSelection::NeedsPrompt(teams));
    }

    #[test]
    fn prompt_labels_match_source_order_and_fall_back_to_ids() {
        let teams = vec![team("T1", Some("Alpha")), team("T2", None)];
        let labels: Vec<String> = teams.iter().map(choice_label).collect();
        assert_eq!(labels, vec!["Alpha (ID: T1)", "T2"]);
    }

    #[test]
    fn empty_display_name_falls_back_to_identifier() {
        assert_eq!(choice_label(&team("T9", Some(""))), "T9");
    }

    #[test]
    fn explicit_identifier_passes_through_unchanged() {
        assert_eq!(
            explicit_identifier(Some("ABC123".to_string())),
            Some("ABC123".to_string())
        );
    }

    #[test]
    fn explicit_identifier_discards_blank_values() {
        assert_eq!(explicit_identifier(Some(String::new())), None);
        assert_eq!(explicit_identifier(Some("   ".to_string())), None);
        assert_eq!(explicit_identifier(None), None);
    }

    #[test]
    fn explicit_identifier_trims_surrounding_whitespace() {
        assert_eq!(
            explicit_identifier(Some(" ABC123 ".to_string())),
            Some("ABC123".to_string())
        );
    }
}
