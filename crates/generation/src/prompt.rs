//! Structured generation prompt handed to the UI translator.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LyricsMode {
    FullSong,
    ByLine,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationPrompt {
    pub model: String,
    pub lyrics: Option<String>,
    pub lyrics_mode: LyricsMode,
    pub style: String,
    pub title: String,
}

impl GenerationPrompt {
    pub fn new(style: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            model: "v4.5".to_string(),
            lyrics: None,
            lyrics_mode: LyricsMode::FullSong,
            style: style.into(),
            title: title.into(),
        }
    }

    pub fn with_lyrics(mut self, lyrics: impl Into<String>, mode: LyricsMode) -> Self {
        self.lyrics = Some(lyrics.into());
        self.lyrics_mode = mode;
        self
    }
}
