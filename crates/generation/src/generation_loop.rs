//! Executes a translated action sequence, validating risky steps and
//! self-repairing with the validator's suggested fix.

use std::collections::VecDeque;
use std::sync::Arc;

use artist_pipeline_core::traits::{BrowserAction, BrowserDriver, VisionValidator};

use crate::prompt::GenerationPrompt;
use crate::translator::{requires_validation, resolve_model, translate_prompt_to_actions, GENERATED_SONG_LINK_SELECTOR};
use crate::GenerationError;

/// Reference to the track Suno produced, parsed out of the generated
/// song link once the create action has been validated.
#[derive(Debug, Clone)]
pub struct TrackRef {
    pub track_id: String,
    pub track_url: String,
}

pub struct GenerationOutcome {
    pub last_screenshot: Vec<u8>,
    pub steps_executed: u32,
    pub model_used: String,
    pub track: TrackRef,
}

pub struct GenerationLoop {
    driver: Arc<dyn BrowserDriver>,
    validator: Arc<dyn VisionValidator>,
    max_repair_rounds: u32,
}

impl GenerationLoop {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        validator: Arc<dyn VisionValidator>,
        max_repair_rounds: u32,
    ) -> Self {
        Self {
            driver,
            validator,
            max_repair_rounds,
        }
    }

    pub async fn run(&self, prompt: &GenerationPrompt) -> Result<GenerationOutcome, GenerationError> {
        let mut queue: VecDeque<BrowserAction> = translate_prompt_to_actions(prompt).into();
        let mut last_screenshot = Vec::new();
        let mut steps_executed = 0;

        while let Some(action) = queue.pop_front() {
            let needs_validation = requires_validation(&action);
            let observation = self
                .driver
                .execute(action.clone())
                .await
                .map_err(|e| GenerationError::ActionFailed(e.to_string()))?;
            steps_executed += 1;
            last_screenshot = observation.screenshot.clone();

            if !observation.action_succeeded {
                return Err(GenerationError::ActionFailed(
                    observation
                        .error
                        .unwrap_or_else(|| "unknown action execution error".to_string()),
                ));
            }

            if !needs_validation {
                continue;
            }

            let mut round = 0;
            loop {
                let expectation = expectation_for(&action);
                let outcome = self
                    .validator
                    .validate(&observation.screenshot, &expectation)
                    .await
                    .map_err(|e| GenerationError::ValidationExhausted(e.to_string()))?;

                if outcome.approved {
                    break;
                }

                round += 1;
                if round > self.max_repair_rounds {
                    return Err(GenerationError::ValidationExhausted(outcome.feedback));
                }

                match outcome.suggested_fix {
                    Some(fix) if !fix.is_empty() => {
                        for (i, fix_action) in fix.into_iter().enumerate() {
                            queue.insert(i, fix_action);
                        }
                        break;
                    }
                    _ => {
                        return Err(GenerationError::ValidationExhausted(outcome.feedback));
                    }
                }
            }
        }

        let track = self.extract_track_ref().await?;

        Ok(GenerationOutcome {
            last_screenshot,
            steps_executed,
            model_used: resolve_model(prompt).to_string(),
            track,
        })
    }

    /// Reads back the generated song link and parses a track id out of it.
    /// Mirrors the original translator's `extract_final_output` step.
    async fn extract_track_ref(&self) -> Result<TrackRef, GenerationError> {
        let observation = self
            .driver
            .execute(BrowserAction::GetElementText {
                selector: GENERATED_SONG_LINK_SELECTOR.to_string(),
            })
            .await
            .map_err(|e| GenerationError::ExtractionFailed(e.to_string()))?;

        let track_url = observation
            .extracted_text
            .filter(|url| url.contains("suno.com/song/"))
            .ok_or_else(|| {
                GenerationError::ExtractionFailed(
                    "could not find or parse a generated song URL".to_string(),
                )
            })?;

        let track_id = track_url
            .rsplit("/song/")
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                GenerationError::ExtractionFailed(format!(
                    "could not extract song id from url: {track_url}"
                ))
            })?
            .to_string();

        Ok(TrackRef { track_id, track_url })
    }
}

fn expectation_for(action: &BrowserAction) -> String {
    match action {
        BrowserAction::TypeText { selector, text } => {
            format!("the field '{selector}' should contain '{text}'")
        }
        BrowserAction::Click { selector } => {
            format!("clicking '{selector}' should have changed the page state")
        }
        _ => "the action should have completed".to_string(),
    }
}
