use std::sync::atomic::{AtomicU64, Ordering};

use crate::compositing::intensity::BokehIntensity;

const ENABLED_BIT: u64 = 1 << 32;

/// Immutable view of the user settings, taken once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BokehSnapshot {
    pub enabled: bool,
    pub intensity: BokehIntensity,
}

/// Live settings shared between the UI side and the processing worker.
///
/// Both fields are packed into a single atomic word so a reader always sees
/// a matching pair; an intensity change can never be observed alongside a
/// stale enabled flag.
#[derive(Debug)]
pub struct BokehSettings {
    packed: AtomicU64,
}

impl BokehSettings {
    pub fn new(enabled: bool, intensity: BokehIntensity) -> Self {
        Self {
            packed: AtomicU64::new(pack(enabled, intensity)),
        }
    }

    pub fn snapshot(&self) -> BokehSnapshot {
        unpack(self.packed.load(Ordering::Acquire))
    }

    pub fn set(&self, enabled: bool, intensity: BokehIntensity) {
        self.packed
            .store(pack(enabled, intensity), Ordering::Release);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.update(|s| BokehSnapshot { enabled, ..s });
    }

    pub fn set_intensity(&self, intensity: BokehIntensity) {
        self.update(|s| BokehSnapshot { intensity, ..s });
    }

    fn update(&self, f: impl Fn(BokehSnapshot) -> BokehSnapshot) {
        let _ = self
            .packed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                let next = f(unpack(word));
                Some(pack(next.enabled, next.intensity))
            });
    }
}

impl Default for BokehSettings {
    fn default() -> Self {
        Self::new(false, BokehIntensity::new(0.5))
    }
}

fn pack(enabled: bool, intensity: BokehIntensity) -> u64 {
    let bits = intensity.value().to_bits() as u64;
    if enabled {
        bits | ENABLED_BIT
    } else {
        bits
    }
}

fn unpack(word: u64) -> BokehSnapshot {
    BokehSnapshot {
        enabled: word & ENABLED_BIT != 0,
        intensity: BokehIntensity::new(f32::from_bits(word as u32)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    #[test]
    fn test_snapshot_reflects_constructor() {
        let settings = BokehSettings::new(true, BokehIntensity::new(0.75));
        let snap = settings.snapshot();
        assert!(snap.enabled);
        assert_relative_eq!(snap.intensity.value(), 0.75);
    }

    #[test]
    fn test_default_is_disabled() {
        let snap = BokehSettings::default().snapshot();
        assert!(!snap.enabled);
        assert_relative_eq!(snap.intensity.value(), 0.5);
    }

    #[test]
    fn test_set_enabled_keeps_intensity() {
        let settings = BokehSettings::new(false, BokehIntensity::new(0.3));
        settings.set_enabled(true);
        let snap = settings.snapshot();
        assert!(snap.enabled);
        assert_relative_eq!(snap.intensity.value(), 0.3);
    }

    #[test]
    fn test_set_intensity_keeps_enabled() {
        let settings = BokehSettings::new(true, BokehIntensity::NONE);
        settings.set_intensity(BokehIntensity::new(2.0));
        let snap = settings.snapshot();
        assert!(snap.enabled);
        assert_relative_eq!(snap.intensity.value(), 1.0);
    }

    #[test]
    fn test_snapshots_never_tear() {
        // Writer alternates between two consistent states; readers must only
        // ever observe one of them.
        let settings = Arc::new(BokehSettings::new(false, BokehIntensity::NONE));
        let writer = {
            let settings = Arc::clone(&settings);
            std::thread::spawn(move || {
                for i in 0..10_000 {
                    if i % 2 == 0 {
                        settings.set(true, BokehIntensity::FULL);
                    } else {
                        settings.set(false, BokehIntensity::NONE);
                    }
                }
            })
        };
        for _ in 0..10_000 {
            let snap = settings.snapshot();
            let expected = if snap.enabled { 1.0 } else { 0.0 };
            assert_relative_eq!(snap.intensity.value(), expected);
        }
        writer.join().unwrap();
    }
}
