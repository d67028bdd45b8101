//! Fixed selector table and prompt-to-action translation.

use artist_pipeline_core::traits::BrowserAction;

use crate::prompt::{GenerationPrompt, LyricsMode};

/// Known models; anything else falls back to the first entry.
const KNOWN_MODELS: &[&str] = &["v4.5", "v4", "v3.5"];

/// Selector used to read back the link to the just-generated track once
/// the create button has been clicked and validated.
pub const GENERATED_SONG_LINK_SELECTOR: &str = "generated_song_link";

fn model_selector(model: &str) -> &'static str {
    match model {
        "v4.5" => "model_option_v4.5",
        "v4" => "model_option_v4",
        "v3.5" => "model_option_v3.5",
        _ => "model_option_v4.5",
    }
}

/// The model id actually selected in the UI, after the unknown-model
/// fallback rule is applied.
pub fn resolve_model(prompt: &GenerationPrompt) -> &'static str {
    if KNOWN_MODELS.contains(&prompt.model.as_str()) {
        KNOWN_MODELS
            .iter()
            .find(|m| **m == prompt.model)
            .copied()
            .unwrap_or("v4.5")
    } else {
        "v4.5"
    }
}

/// Translates a generation prompt into the ordered sequence of browser
/// actions needed to produce it: navigate, pick a model, fill in lyrics
/// and style, set the title, then submit.
pub fn translate_prompt_to_actions(prompt: &GenerationPrompt) -> Vec<BrowserAction> {
    let mut actions = Vec::new();

    actions.push(BrowserAction::Navigate {
        url: "https://suno.com/create/".to_string(),
    });

    let model = if KNOWN_MODELS.contains(&prompt.model.as_str()) {
        prompt.model.as_str()
    } else {
        "v4.5"
    };

    actions.push(BrowserAction::Click {
        selector: "model_dropdown".to_string(),
    });
    actions.push(BrowserAction::Click {
        selector: model_selector(model).to_string(),
    });

    if let Some(lyrics) = &prompt.lyrics {
        let toggle = match prompt.lyrics_mode {
            LyricsMode::ByLine => "by_line_toggle",
            LyricsMode::FullSong => "full_song_toggle",
        };
        actions.push(BrowserAction::Click {
            selector: toggle.to_string(),
        });
        actions.push(BrowserAction::TypeText {
            selector: "lyrics_input".to_string(),
            text: lyrics.clone(),
        });
    }

    if !prompt.style.is_empty() {
        actions.push(BrowserAction::TypeText {
            selector: "style_input".to_string(),
            text: prompt.style.clone(),
        });
    }

    if !prompt.title.is_empty() {
        actions.push(BrowserAction::TypeText {
            selector: "song_title_input".to_string(),
            text: prompt.title.clone(),
        });
    }

    actions.push(BrowserAction::Click {
        selector: "create_button".to_string(),
    });

    actions
}

/// Actions for which a completed click or type still warrants a vision
/// check before moving on: the style input (easy to leave empty by
/// mistake) and the final submit.
pub fn requires_validation(action: &BrowserAction) -> bool {
    match action {
        BrowserAction::TypeText { selector, .. } => selector == "style_input",
        BrowserAction::Click { selector } => selector == "create_button",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_model_falls_back_for_unknown_models() {
        let mut prompt = GenerationPrompt::new("lo-fi", "Test Song");
        prompt.model = "madeup-v9".to_string();
        assert_eq!(resolve_model(&prompt), "v4.5");

        prompt.model = "v3.5".to_string();
        assert_eq!(resolve_model(&prompt), "v3.5");
    }

    #[test]
    fn unknown_model_falls_back_to_default() {
        let mut prompt = GenerationPrompt::new("lo-fi", "Test Song");
        prompt.model = "madeup-v9".to_string();
        let actions = translate_prompt_to_actions(&prompt);
        assert!(actions.iter().any(|a| matches!(
            a,
            BrowserAction::Click { selector } if selector == "model_option_v4.5"
        )));
    }

    #[test]
    fn navigate_is_always_first_and_create_always_last() {
        let prompt = GenerationPrompt::new("lo-fi", "Test Song");
        let actions = translate_prompt_to_actions(&prompt);
        assert!(matches!(actions.first(), Some(BrowserAction::Navigate { .. })));
        assert!(matches!(
            actions.last(),
            Some(BrowserAction::Click { selector }) if selector == "create_button"
        ));
    }

    #[test]
    fn style_input_and_create_button_require_validation() {
        assert!(requires_validation(&BrowserAction::TypeText {
            selector: "style_input".to_string(),
            text: "x".to_string(),
        }));
        assert!(requires_validation(&BrowserAction::Click {
            selector: "create_button".to_string(),
        }));
        assert!(!requires_validation(&BrowserAction::Navigate {
            url: "https://example.invalid".to_string(),
        }));
    }
}
