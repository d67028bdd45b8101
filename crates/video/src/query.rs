//! Maps tempo/energy plus persona keywords into a descriptive search
//! query string.

use rand::seq::SliceRandom;

use artist_pipeline_core::traits::AudioFeatures;

const FAST_TEMPO: &[&str] = &["fast", "energetic", "dynamic", "action"];
const SLOW_TEMPO: &[&str] = &["slow", "calm", "relaxing", "ambient", "serene"];
const MID_TEMPO: &[&str] = &["moderate tempo", "steady rhythm", "flowing"];
const HIGH_ENERGY: &[&str] = &["intense", "powerful", "vibrant", "bright"];
const LOW_ENERGY: &[&str] = &["gentle", "soft", "subtle", "dark", "muted"];

pub const FALLBACK_QUERIES: &[&str] = &[
    "abstract background",
    "nature landscape",
    "city lights",
    "technology",
    "music visualization",
];

/// Builds a query from persona keywords plus one tempo descriptor and,
/// for non-moderate energy, one energy descriptor, deduplicating while
/// preserving first-seen order. Falls back to `"abstract"` if nothing
/// was generated.
pub fn synthesize_query(features: AudioFeatures, persona_keywords: &[String]) -> String {
    let mut parts: Vec<String> = persona_keywords.to_vec();
    let mut rng = rand::thread_rng();

    let tempo_word = if features.tempo_bpm > 140.0 {
        FAST_TEMPO.choose(&mut rng)
    } else if features.tempo_bpm < 90.0 {
        SLOW_TEMPO.choose(&mut rng)
    } else {
        MID_TEMPO.choose(&mut rng)
    };
    if let Some(word) = tempo_word {
        parts.push(word.to_string());
    }

    if features.energy > 0.7 {
        if let Some(word) = HIGH_ENERGY.choose(&mut rng) {
            parts.push(word.to_string());
        }
    } else if features.energy < 0.3 {
        if let Some(word) = LOW_ENERGY.choose(&mut rng) {
            parts.push(word.to_string());
        }
    }

    let mut seen = std::collections::HashSet::new();
    let deduped: Vec<String> = parts.into_iter().filter(|p| seen.insert(p.clone())).collect();

    if deduped.is_empty() {
        "abstract".to_string()
    } else {
        deduped.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_loud_track_uses_fast_and_high_energy_vocabulary() {
        let features = AudioFeatures {
            tempo_bpm: 160.0,
            energy: 0.9,
            duration_secs: 180.0,
        };
        let query = synthesize_query(features, &[]);
        assert!(FAST_TEMPO.iter().any(|w| query.contains(w)));
        assert!(HIGH_ENERGY.iter().any(|w| query.contains(w)));
    }

    #[test]
    fn moderate_track_skips_energy_descriptor() {
        let features = AudioFeatures {
            tempo_bpm: 115.0,
            energy: 0.5,
            duration_secs: 180.0,
        };
        let query = synthesize_query(features, &[]);
        assert!(MID_TEMPO.iter().any(|w| query.contains(w)));
        assert!(!HIGH_ENERGY.iter().any(|w| query.contains(w)));
        assert!(!LOW_ENERGY.iter().any(|w| query.contains(w)));
    }

    #[test]
    fn persona_keywords_are_included() {
        let features = AudioFeatures {
            tempo_bpm: 115.0,
            energy: 0.5,
            duration_secs: 180.0,
        };
        let query = synthesize_query(features, &["synthwave".to_string()]);
        assert!(query.contains("synthwave"));
    }
}
