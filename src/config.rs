use crate::{
    error::{
        LotteryError,
        Result,
    },
    timeline::VISIBLE_ROWS,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fs,
    path::Path,
    time::Duration,
};

pub const DEFAULT_ELEMENT_HEIGHT: u32 = 30;
pub const DEFAULT_ALPHABET: &str = "0123456789";
pub const DEFAULT_PADDING: &str = "0";

/// What a reel scrolls through before it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReelContentMode {
    /// Every reel repeats the full sorted alphabet.
    #[default]
    Flat,
    /// Each reel narrows down to digits still possible once the lower digits
    /// are known.
    DigitFiltered,
}

/// Animation and planning parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    pub element_height: u32,
    /// Time the reel takes to travel one symbol at full speed.
    pub ms_per_step: u64,
    pub start_index: u64,
    pub min_stops: usize,
    pub max_stops: usize,
    pub min_rotations: u64,
    pub max_rotations: u64,
    pub alphabet: String,
    pub padding: String,
    pub content_mode: ReelContentMode,
    pub frame_interval_ms: u64,
    pub start_delay_ms: u64,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            element_height: DEFAULT_ELEMENT_HEIGHT,
            ms_per_step: 250,
            start_index: 0,
            min_stops: 1,
            max_stops: 10,
            min_rotations: 3,
            max_rotations: 20,
            alphabet: DEFAULT_ALPHABET.to_string(),
            padding: DEFAULT_PADDING.to_string(),
            content_mode: ReelContentMode::Flat,
            frame_interval_ms: 30,
            start_delay_ms: 100,
        }
    }
}

impl SlotConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: SlotConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.element_height == 0 {
            return Err(LotteryError::validation("element_height must be positive"));
        }
        if self.element_height.checked_mul(VISIBLE_ROWS).is_none() {
            return Err(LotteryError::validation(format!(
                "element_height {} is too large",
                self.element_height
            )));
        }
        if self.ms_per_step == 0 {
            return Err(LotteryError::validation("ms_per_step must be positive"));
        }
        if self.alphabet.is_empty() {
            return Err(LotteryError::validation("alphabet must not be empty"));
        }
        if self.padding.is_empty() {
            return Err(LotteryError::validation("padding must not be empty"));
        }
        if self.max_stops < self.min_stops {
            return Err(LotteryError::validation(format!(
                "max_stops {} is below min_stops {}",
                self.max_stops, self.min_stops
            )));
        }
        if self.max_rotations < self.min_rotations {
            return Err(LotteryError::validation(format!(
                "max_rotations {} is below min_rotations {}",
                self.max_rotations, self.min_rotations
            )));
        }
        Ok(())
    }

    pub fn display_height(&self) -> u32 {
        self.element_height.saturating_mul(VISIBLE_ROWS)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }
}
