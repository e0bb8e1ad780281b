//! Volume control
//!
//! Linear 0.0-1.0 volume as the media element takes it, plus a mute flag that
//! preserves the level so unmuting restores it.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};

/// Volume icon bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VolumeLevel {
    /// Silent (level 0 or muted)
    Muted,
    /// Below half volume
    Low,
    /// Half volume or more
    High,
}

/// Volume controller
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f64,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller, clamping `level` into 0.0-1.0
    pub fn new(level: f64) -> Self {
        let level = if level.is_nan() { 1.0 } else { level.clamp(0.0, 1.0) };
        Self { level, muted: false }
    }

    /// Set volume level, clamped to 0.0-1.0
    ///
    /// Moving the slider also unmutes, like a volume knob.
    pub fn set_level(&mut self, level: f64) -> Result<()> {
        if level.is_nan() {
            return Err(PlaybackError::InvalidVolume(level));
        }

        self.level = level.clamp(0.0, 1.0);
        self.muted = false;
        Ok(())
    }

    /// Get current volume level (0.0-1.0)
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Volume to hand to the media element
    ///
    /// Returns 0.0 if muted, otherwise the level
    pub fn gain(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }

    /// Icon bucket for the effective volume
    pub fn indicator(&self) -> VolumeLevel {
        let gain = self.gain();
        if gain <= 0.0 {
            VolumeLevel::Muted
        } else if gain < 0.5 {
            VolumeLevel::Low
        } else {
            VolumeLevel::High
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(0.8);
        assert_eq!(vol.level(), 0.8);
        assert!(!vol.is_muted());

        assert_eq!(Volume::new(3.0).level(), 1.0);
        assert_eq!(Volume::new(f64::NAN).level(), 1.0);
    }

    #[test]
    fn set_volume_level_clamps() {
        let mut vol = Volume::new(0.5);

        vol.set_level(0.75).unwrap();
        assert_eq!(vol.level(), 0.75);

        vol.set_level(1.5).unwrap();
        assert_eq!(vol.level(), 1.0);

        vol.set_level(-0.2).unwrap();
        assert_eq!(vol.level(), 0.0);
    }

    #[test]
    fn nan_level_rejected() {
        let mut vol = Volume::new(0.4);
        assert!(matches!(
            vol.set_level(f64::NAN),
            Err(PlaybackError::InvalidVolume(_))
        ));
        assert_eq!(vol.level(), 0.4);
    }

    #[test]
    fn toggle_mute_preserves_level() {
        let mut vol = Volume::new(0.8);

        vol.toggle_mute();
        assert!(vol.is_muted());
        assert_eq!(vol.gain(), 0.0);
        assert_eq!(vol.level(), 0.8);

        vol.toggle_mute();
        assert!(!vol.is_muted());
        assert_eq!(vol.gain(), 0.8);
    }

    #[test]
    fn setting_level_unmutes() {
        let mut vol = Volume::new(0.8);
        vol.toggle_mute();
        vol.set_level(0.3).unwrap();
        assert!(!vol.is_muted());
        assert_eq!(vol.gain(), 0.3);
    }

    #[test]
    fn indicator_buckets() {
        assert_eq!(Volume::new(0.0).indicator(), VolumeLevel::Muted);
        assert_eq!(Volume::new(0.2).indicator(), VolumeLevel::Low);
        assert_eq!(Volume::new(0.5).indicator(), VolumeLevel::High);
        assert_eq!(Volume::new(1.0).indicator(), VolumeLevel::High);

        let mut vol = Volume::new(0.9);
        vol.toggle_mute();
        assert_eq!(vol.indicator(), VolumeLevel::Muted);
    }
}
