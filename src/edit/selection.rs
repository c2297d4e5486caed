//! Region selection policy
//!
//! The splice engine only ever looks at one region. `Selection` is where
//! several candidate regions get collapsed to that one, and where the default
//! region for freshly loaded audio is placed.

use super::Region;
use crate::error::{SpliceError, Result};

#[derive(Debug, Clone, Default)]
pub struct Selection {
    regions: Vec<Region>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region. If one was already selected, the older one is dropped.
    pub fn insert(&mut self, region: Region) {
        self.regions.push(region);
        if self.regions.len() > 1 {
            let dropped = self.regions.drain(..self.regions.len() - 1).count();
            log::debug!("Selection collapsed, {} older region(s) dropped", dropped);
        }
    }

    /// The region the splice engine should act on.
    pub fn active(&self) -> Option<&Region> {
        self.regions.first()
    }

    /// Select [`default_region`] if nothing is selected yet.
    pub fn ensure_default(&mut self, duration: f64) -> Result<()> {
        if self.regions.is_empty() {
            self.insert(default_region(duration)?);
        }
        Ok(())
    }
}

/// Region placed on newly loaded audio: it ends at the middle (whole seconds)
/// and starts a fifth of the whole-second duration earlier.
pub fn default_region(duration: f64) -> Result<Region> {
    let end = (duration / 2.0).floor();
    let start = (end - duration.floor() / 5.0).max(0.0);
    Region::new(start, end)
}

/// Region from the playhead to the end of the audio. A playhead past the end
/// gives an empty region at the end.
pub fn split_region(current_time: f64, duration: f64) -> Result<Region> {
    if !current_time.is_finite() || current_time < 0.0 {
        return Err(SpliceError::region(format!("Playhead position must be a non-negative time: {}", current_time)));
    }
    Region::new(current_time.min(duration), duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_collapses_to_newest() {
        let mut selection = Selection::new();
        assert!(selection.active().is_none());

        selection.insert(Region::new(0.0, 1.0).unwrap());
        selection.insert(Region::new(2.0, 3.0).unwrap());

        assert_eq!(selection.regions.len(), 1);
        assert_eq!(selection.active().unwrap().start(), 2.0);
    }

    #[test]
    fn test_default_region() {
        let region = default_region(10.0).unwrap();
        assert_eq!(region.start(), 3.0);
        assert_eq!(region.end(), 5.0);

        let region = default_region(7.5).unwrap();
        assert!((region.start() - 1.6).abs() < 1e-9);
        assert_eq!(region.end(), 3.0);

        // Short clips clamp at zero.
        let region = default_region(1.0).unwrap();
        assert_eq!(region.start(), 0.0);
        assert_eq!(region.end(), 0.0);

        assert!(default_region(f64::NAN).is_err());
    }

    #[test]
    fn test_ensure_default() {
        let mut selection = Selection::new();
        selection.ensure_default(20.0).unwrap();
        assert_eq!(selection.active().unwrap().end(), 10.0);

        let explicit = Region::new(1.0, 2.0).unwrap();
        let mut selection = Selection::new();
        selection.insert(explicit);
        selection.ensure_default(20.0).unwrap();
        assert_eq!(selection.active(), Some(&explicit));
    }

    #[test]
    fn test_split_region() {
        let region = split_region(1.25, 4.0).unwrap();
        assert_eq!(region.start(), 1.25);
        assert_eq!(region.end(), 4.0);

        let region = split_region(9.0, 4.0).unwrap();
        assert_eq!(region.start(), 4.0);
        assert_eq!(region.duration(), 0.0);
    }

    #[test]
    fn test_split_region_rejects_negative_playhead() {
        assert!(matches!(split_region(-1.0, 4.0), Err(SpliceError::Region { .. })));
        assert!(matches!(split_region(f64::NAN, 4.0), Err(SpliceError::Region { .. })));
    }
}
