use std::sync::Mutex;
use std::time::{Duration, Instant};

use songngu_core::reading::{SpeechError, SpeechOutput};

/// Stand-in voice: prints what it reads and stays busy for as long as saying it would take
pub struct ConsoleSpeech {
    words_per_minute: u32,
    busy_until: Mutex<Option<Instant>>,
}

impl ConsoleSpeech {
    pub fn new(words_per_minute: u32) -> Self {
        Self {
            words_per_minute: words_per_minute.max(1),
            busy_until: Mutex::new(None),
        }
    }

    pub fn duration_of(&self, text: &str) -> Duration {
        let words = text.split_whitespace().count() as u64;
        Duration::from_millis(words * 60_000 / u64::from(self.words_per_minute))
    }
}

impl SpeechOutput for ConsoleSpeech {
    fn play(&self, text: &str) -> Result<(), SpeechError> {
        let mut busy = self
            .busy_until
            .lock()
            .map_err(|_| SpeechError::Playback("speech state poisoned".to_string()))?;
        println!("(reading) {}", text);
        *busy = Some(Instant::now() + self.duration_of(text));
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.busy_until
            .lock()
            .map(|busy| busy.is_some_and(|until| Instant::now() < until))
            .unwrap_or(false)
    }

    fn halt(&self) {
        if let Ok(mut busy) = self.busy_until.lock() {
            *busy = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_follows_rate() {
        let speech = ConsoleSpeech::new(120);
        assert_eq!(speech.duration_of("one two three"), Duration::from_millis(1500));
        assert_eq!(speech.duration_of("   "), Duration::ZERO);
    }

    #[test]
    fn test_halt_clears_busy() {
        let speech = ConsoleSpeech::new(1);
        speech.play("a long pause").unwrap();
        assert!(speech.is_busy());
        speech.halt();
        assert!(!speech.is_busy());
    }
}
