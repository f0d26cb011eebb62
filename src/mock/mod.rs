//! Synthetic PSD producer
//!
//! Generates dB-scale spectra with a noise floor plus one occupied band,
//! min-max normalizes them into [0, 1] and labels them. Used by the
//! `psd-mock` server, the viewer's "Draw Mock Data" control and the tests.

#[cfg(feature = "native")]
pub mod server;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{trace, warn};

use crate::core::frame::{Classification, Frame, FRAME_LEN};
use crate::core::parser::FrameMessage;

/// Noise floor of the synthetic spectrum, in dB
const NOISE_FLOOR_DB: f32 = -90.0;
/// Peak-to-peak noise around the floor, in dB
const NOISE_SPREAD_DB: f32 = 6.0;

/// Occupied band shape per signal type
#[derive(Debug, Clone, Copy)]
struct BandProfile {
    /// Fraction of the spectrum covered
    width: f32,
    /// Rise above the noise floor, in dB
    gain_db: f32,
}

const WIFI_BAND: BandProfile = BandProfile {
    width: 0.25,
    gain_db: 30.0,
};

const BLUETOOTH_BAND: BandProfile = BandProfile {
    width: 0.02,
    gain_db: 25.0,
};

/// Min-max normalize into [0, 1]. A flat input maps to all zeros.
pub fn normalize_psd(psd: &[f32]) -> Vec<f32> {
    let (min, max) = psd
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if range.is_nan() || range <= 0.0 {
        return vec![0.0; psd.len()];
    }
    psd.iter()
        .map(|&v| ((v - min) / range).clamp(0.0, 1.0))
        .collect()
}

/// Seeded generator of labelled frames
pub struct MockSource {
    rng: StdRng,
    frames: u64,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            frames: 0,
        }
    }

    /// Deterministic source for tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            frames: 0,
        }
    }

    pub fn frames_generated(&self) -> u64 {
        self.frames
    }

    /// Raw spectrum in dB with one occupied band for `classification`.
    pub fn spectrum_db(&mut self, classification: &Classification) -> Vec<f32> {
        let mut psd: Vec<f32> = (0..FRAME_LEN)
            .map(|_| NOISE_FLOOR_DB + self.rng.random_range(0.0..NOISE_SPREAD_DB))
            .collect();

        let profile = match classification {
            Classification::WiFi => Some(WIFI_BAND),
            Classification::Bluetooth => Some(BLUETOOTH_BAND),
            _ => None,
        };

        if let Some(profile) = profile {
            let band = ((FRAME_LEN as f32 * profile.width) as usize).max(1);
            let start = self.rng.random_range(0..=FRAME_LEN - band);
            let half = band as f32 / 2.0;
            for (i, value) in psd[start..start + band].iter_mut().enumerate() {
                // Raised-cosine edges
                let x = (i as f32 - half) / half;
                let shape = 0.5 * (1.0 + (std::f32::consts::PI * x).cos());
                *value += profile.gain_db * shape;
            }
        }
        psd
    }

    /// Next frame with a random WiFi or Bluetooth label.
    pub fn next_frame(&mut self) -> Frame {
        let classification = if self.rng.random_bool(0.5) {
            Classification::WiFi
        } else {
            Classification::Bluetooth
        };
        self.frame_for(classification)
    }

    /// Next frame for a given label
    pub fn frame_for(&mut self, classification: Classification) -> Frame {
        let values = normalize_psd(&self.spectrum_db(&classification));
        self.frames += 1;
        trace!(classification = %classification, frames = self.frames, "Mock frame generated");
        // normalize_psd output is finite, in range and FRAME_LEN long
        Frame::new(values, classification).unwrap_or_else(|e| {
            warn!(error = %e, "Mock frame failed validation");
            Frame::uniform(0.0)
        })
    }

    /// Next frame serialized in the wire format
    pub fn next_message(&mut self) -> Result<String, serde_json::Error> {
        let frame = self.next_frame();
        serde_json::to_string(&FrameMessage::from_frame(&frame))
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}
