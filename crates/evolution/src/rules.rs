//! Reinforce / diversify / hold decision applied to a persona from a
//! sorted set of release scores.

use rand::seq::SliceRandom;

use artist_pipeline_core::persona::{Persona, PersonaMutationToken, PromptHistoryEntry};
use artist_pipeline_core::progression::{ProgressionAction, ProgressionEntry};
use artist_pipeline_core::release::ReleaseId;

const SUCCESS_KEYWORDS: &[&str] = &["resonant", "engaging", "hit-potential"];
const EXPERIMENTAL_KEYWORD: &str = "experimental";

/// Joins each release's score into one line, e.g.
/// `"release ..: score=12.30 | release ..: score=4.10"`.
fn performance_summary(release_scores: &[(ReleaseId, f64)]) -> String {
    release_scores
        .iter()
        .map(|(id, score)| format!("release {id}: score={score:.2}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Appends the decision to the persona's evolution log/prompt history and
/// attaches the performance summary and the post-mutation snapshot to
/// `entry`. Must run after every style mutation the decision makes, so the
/// snapshot reflects the persona's state strictly after this decision.
fn finalize(
    persona: &mut Persona,
    token: PersonaMutationToken,
    entry: ProgressionEntry,
    release_scores: &[(ReleaseId, f64)],
    keywords_added: Vec<String>,
    keywords_removed: Vec<String>,
) -> ProgressionEntry {
    let summary = performance_summary(release_scores);
    let prompt_entry = PromptHistoryEntry {
        release_id: entry.release_id,
        action: entry.action,
        score: entry.score_at_decision,
        keywords_added,
        keywords_removed,
        recorded_at: entry.decided_at,
    };
    persona.push_evolution_entry(token, entry.description.clone(), prompt_entry);
    entry.with_performance_summary(summary).with_persona_snapshot(persona.clone())
}

/// `release_scores` need not be pre-sorted; this function sorts a local
/// copy descending by score.
pub fn apply_evolution_rules(
    persona: &mut Persona,
    token: PersonaMutationToken,
    release_scores: &[(ReleaseId, f64)],
    reinforce_multiplier: f64,
    diversify_multiplier: f64,
) -> ProgressionEntry {
    if release_scores.is_empty() {
        let mut keywords_added = Vec::new();
        if !persona.style_keywords.contains(EXPERIMENTAL_KEYWORD) {
            persona.reinforce_keyword(token, EXPERIMENTAL_KEYWORD);
            keywords_added.push(EXPERIMENTAL_KEYWORD.to_string());
        }
        let entry = ProgressionEntry::new(
            persona.id,
            ProgressionAction::Experiment,
            EXPERIMENTAL_KEYWORD,
            0.0,
            0,
            "no releases to score yet, nudging toward experimentation",
        );
        return finalize(persona, token, entry, release_scores, keywords_added, Vec::new());
    }

    let mut sorted: Vec<(ReleaseId, f64)> = release_scores.to_vec();
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let average = sorted.iter().map(|(_, s)| s).sum::<f64>() / sorted.len() as f64;
    let (best_id, best_score) = sorted[0];
    let (worst_id, worst_score) = *sorted.last().unwrap();

    let reinforce_threshold = reinforce_multiplier * average;
    let diversify_threshold = diversify_multiplier * average;

    if best_score > reinforce_threshold && best_score > 0.0 {
        let keyword = *SUCCESS_KEYWORDS
            .choose(&mut rand::thread_rng())
            .expect("SUCCESS_KEYWORDS is non-empty");
        let mut keywords_added = Vec::new();
        if !persona.style_keywords.contains(keyword) {
            persona.reinforce_keyword(token, keyword);
            keywords_added.push(keyword.to_string());
        }
        let entry = ProgressionEntry::new(
            persona.id,
            ProgressionAction::Reinforce,
            keyword,
            best_score,
            sorted.len() as u32,
            format!("release {best_id} stood out, reinforcing '{keyword}'"),
        )
        .with_release(best_id);
        return finalize(persona, token, entry, release_scores, keywords_added, Vec::new());
    }

    if worst_score < diversify_threshold && sorted.len() > 1 {
        if persona.style_keywords.len() > 1 {
            let candidate = persona
                .style_keywords
                .iter()
                .collect::<Vec<_>>()
                .choose(&mut rand::thread_rng())
                .map(|s| s.to_string());
            if let Some(keyword) = candidate {
                persona.remove_keyword(token, &keyword);
                let entry = ProgressionEntry::new(
                    persona.id,
                    ProgressionAction::Diversify,
                    keyword.clone(),
                    worst_score,
                    sorted.len() as u32,
                    format!("release {worst_id} underperformed, dropping '{keyword}'"),
                )
                .with_release(worst_id);
                return finalize(
                    persona,
                    token,
                    entry,
                    release_scores,
                    Vec::new(),
                    vec![keyword],
                );
            }
        } else if !persona.style_keywords.contains(EXPERIMENTAL_KEYWORD) {
            persona.reinforce_keyword(token, EXPERIMENTAL_KEYWORD);
            let entry = ProgressionEntry::new(
                persona.id,
                ProgressionAction::Diversify,
                EXPERIMENTAL_KEYWORD,
                worst_score,
                sorted.len() as u32,
                format!("release {worst_id} underperformed, broadening with '{EXPERIMENTAL_KEYWORD}'"),
            )
            .with_release(worst_id);
            return finalize(
                persona,
                token,
                entry,
                release_scores,
                vec![EXPERIMENTAL_KEYWORD.to_string()],
                Vec::new(),
            );
        }
    }

    let entry = ProgressionEntry::new(
        persona.id,
        ProgressionAction::Hold,
        "",
        average,
        sorted.len() as u32,
        "scores within the no-deviation band, holding current style",
    );
    finalize(persona, token, entry, release_scores, Vec::new(), Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use artist_pipeline_core::progression::ProgressionAction;

    fn persona_with(keywords: &[&str]) -> Persona {
        Persona::new("Nova", "synthwave")
            .with_keywords(keywords.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_releases_adds_experimental() {
        let mut persona = persona_with(&["moody"]);
        let token = PersonaMutationToken::issue();
        let entry = apply_evolution_rules(&mut persona, token, &[], 1.2, 0.8);
        assert_eq!(entry.action, ProgressionAction::Experiment);
        assert!(persona.style_keywords.contains("experimental"));
    }

    #[test]
    fn standout_release_reinforces() {
        let mut persona = persona_with(&["moody"]);
        let token = PersonaMutationToken::issue();
        let scores = vec![
            (ReleaseId::new(), 100.0),
            (ReleaseId::new(), 10.0),
            (ReleaseId::new(), 12.0),
        ];
        let entry = apply_evolution_rules(&mut persona, token, &scores, 1.2, 0.8);
        assert_eq!(entry.action, ProgressionAction::Reinforce);
        assert!(persona.style_keywords.len() > 1);
    }

    #[test]
    fn underperformer_diversifies_when_multiple_keywords() {
        let mut persona = persona_with(&["moody", "nocturnal"]);
        let token = PersonaMutationToken::issue();
        let scores = vec![
            (ReleaseId::new(), 10.0),
            (ReleaseId::new(), 11.0),
            (ReleaseId::new(), 0.5),
        ];
        let entry = apply_evolution_rules(&mut persona, token, &scores, 1.2, 0.8);
        assert_eq!(entry.action, ProgressionAction::Diversify);
    }

    #[test]
    fn balanced_scores_hold() {
        let mut persona = persona_with(&["moody"]);
        let token = PersonaMutationToken::issue();
        let scores = vec![(ReleaseId::new(), 10.0), (ReleaseId::new(), 10.5)];
        let entry = apply_evolution_rules(&mut persona, token, &scores, 1.2, 0.8);
        assert_eq!(entry.action, ProgressionAction::Hold);
    }

    #[test]
    fn every_decision_logs_and_snapshots_post_mutation_state() {
        let mut persona = persona_with(&["moody"]);
        let token = PersonaMutationToken::issue();
        let scores = vec![
            (ReleaseId::new(), 100.0),
            (ReleaseId::new(), 10.0),
            (ReleaseId::new(), 12.0),
        ];
        let entry = apply_evolution_rules(&mut persona, token, &scores, 1.2, 0.8);

        assert_eq!(persona.evolution_log.len(), 1);
        assert_eq!(persona.prompt_history.len(), 1);
        assert_eq!(persona.evolution_log[0], entry.description);

        let summary = entry.performance_summary.expect("summary attached");
        assert!(summary.contains("score=100.00"));

        let snapshot = entry.persona_snapshot.expect("snapshot attached");
        assert_eq!(snapshot.evolution_log.len(), 1);
        assert_eq!(snapshot.prompt_history.len(), 1);
    }
}
