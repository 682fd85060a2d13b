use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_SIZE: u16 = 18;
pub const MIN_FONT_SIZE: u16 = 12;
pub const MAX_FONT_SIZE: u16 = 36;

fn default_font_size() -> u16 {
    DEFAULT_FONT_SIZE
}

fn default_reading_poll_ms() -> u64 {
    50
}

fn default_pause_poll_ms() -> u64 {
    100
}

fn default_words_per_minute() -> u32 {
    160
}

fn default_theme() -> String {
    "light".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ReaderConfig {
    #[serde(default = "default_font_size")]
    pub font_size: u16,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// How often the reading worker checks playback and the stop flag
    #[serde(default = "default_reading_poll_ms")]
    pub reading_poll_ms: u64,
    /// Poll interval while a reading session is paused
    #[serde(default = "default_pause_poll_ms")]
    pub pause_poll_ms: u64,
    /// Speaking rate of the console speech stand-in
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            theme: default_theme(),
            reading_poll_ms: default_reading_poll_ms(),
            pause_poll_ms: default_pause_poll_ms(),
            words_per_minute: default_words_per_minute(),
        }
    }
}

pub fn clamp_font_size(size: u16) -> u16 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}
