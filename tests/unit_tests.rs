// Unit tests for Mentor Match

use mentor_match::core::{
    filters::{normalize_preferences, preference_catalog},
    scoring::{match_score, shared_preferences},
    Matcher,
};
use mentor_match::models::{Participant, Role};
use std::collections::HashSet;

fn prefs(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_score_ignores_multiplicity() {
    let mentor = Participant::mentor("m1", ["rust", "rust", "rust"]);
    let mentee = Participant::mentee("e1", ["rust", "rust"]);
    assert_eq!(match_score(&mentor.preferences, &mentee.preferences), 1);
}

#[test]
fn test_score_of_disjoint_sets_is_zero() {
    assert_eq!(match_score(&prefs(&["a", "b"]), &prefs(&["c", "d"])), 0);
    assert!(shared_preferences(&prefs(&["a", "b"]), &prefs(&["c", "d"])).is_empty());
}

#[test]
fn test_normalized_preferences_score_case_insensitively() {
    let mentor = Participant::mentor("m1", normalize_preferences(["React", "NODE "]));
    let mentee = Participant::mentee("e1", normalize_preferences(["react", "node"]));
    assert_eq!(match_score(&mentor.preferences, &mentee.preferences), 2);
}

#[test]
fn test_catalog_of_empty_input() {
    let lists: Vec<Vec<String>> = vec![];
    assert!(preference_catalog(lists.iter().map(Vec::as_slice)).is_empty());
}

#[test]
fn test_participant_roles() {
    assert_eq!(Participant::mentor("m", ["a"]).role, Role::Mentor);
    assert_eq!(Participant::mentee("e", ["a"]).role, Role::Mentee);
}

#[test]
fn test_mentee_with_empty_preferences_is_a_candidate() {
    let result = Matcher::new().match_pairs(
        vec![Participant::mentor("m1", ["go"])],
        vec![Participant::mentee("e1", Vec::<String>::new())],
    );
    assert_eq!(result.pairs.len(), 1);
    assert_eq!(result.pairs[0].mentee.id, "e1");
    assert_eq!(result.pairs[0].score, 0);
}

#[test]
fn test_empty_mentors_returns_mentees_untouched() {
    let mentees = vec![
        Participant::mentee("e1", ["a"]),
        Participant::mentee("e2", ["b"]),
    ];
    let result = Matcher::new().match_pairs(vec![], mentees.clone());
    assert!(result.pairs.is_empty());
    assert!(result.unmatched_mentors.is_empty());
    assert_eq!(result.unmatched_mentees, mentees);
}

#[test]
fn test_later_higher_score_beats_earlier_lower_score() {
    let result = Matcher::new().match_pairs(
        vec![Participant::mentor("m1", ["a", "b", "c"])],
        vec![
            Participant::mentee("e1", Vec::<String>::new()),
            Participant::mentee("e2", ["a"]),
            Participant::mentee("e3", ["a", "b"]),
            Participant::mentee("e4", ["b"]),
        ],
    );
    assert_eq!(result.pairs[0].mentee.id, "e3");
    assert_eq!(result.pairs[0].score, 2);
    let left: Vec<&str> = result.unmatched_mentees.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(left, vec!["e1", "e2", "e4"]);
}

/// Deterministic pseudo-random preference sets
fn generate(role: Role, count: usize, seed: u64) -> Vec<Participant> {
    const TAGS: &[&str] = &["rust", "go", "react", "node", "sql", "python", "ml", "devops"];
    let mut state = seed;
    (0..count)
        .map(|i| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let mask = (state >> 33) as usize;
            let prefs: Vec<&str> = TAGS
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, tag)| *tag)
                .collect();
            Participant::new(format!("{}{}", role, i), role, prefs)
        })
        .collect()
}

#[test]
fn test_pairing_invariants_over_many_inputs() {
    let matcher = Matcher::new();

    for seed in 0..40u64 {
        let mentors = generate(Role::Mentor, (seed % 9) as usize, seed);
        let mentees = generate(Role::Mentee, ((seed * 7) % 11) as usize, seed + 1000);
        let (m, n) = (mentors.len(), mentees.len());

        let result = matcher.match_pairs(mentors.clone(), mentees.clone());

        assert_eq!(result.pairs.len(), m.min(n), "seed {}", seed);

        let mentor_ids: HashSet<&str> = result.pairs.iter().map(|p| p.mentor.id.as_str()).collect();
        let mentee_ids: HashSet<&str> = result.pairs.iter().map(|p| p.mentee.id.as_str()).collect();
        assert_eq!(mentor_ids.len(), result.pairs.len());
        assert_eq!(mentee_ids.len(), result.pairs.len());

        assert_eq!(result.pairs.len() + result.unmatched_mentors.len(), m);
        assert_eq!(result.pairs.len() + result.unmatched_mentees.len(), n);

        // Paired mentors keep input order
        let paired_order: Vec<&str> = result.pairs.iter().map(|p| p.mentor.id.as_str()).collect();
        let input_order: Vec<&str> = mentors
            .iter()
            .map(|p| p.id.as_str())
            .filter(|id| mentor_ids.contains(id))
            .collect();
        assert_eq!(paired_order, input_order);

        for pair in &result.pairs {
            assert_eq!(pair.mentor.role, Role::Mentor);
            assert_eq!(pair.mentee.role, Role::Mentee);
        }
    }
}
