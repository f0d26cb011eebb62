//! Intensity → color lookup table (jet-like)
//!
//! The table is built once per session and shared read-only by every render.

/// RGBA color, 8 bits per channel
pub type Rgba = [u8; 4];

/// Number of entries in the color table
pub const TABLE_SIZE: usize = 256;

/// Width of each of the four color bands
const BAND: usize = TABLE_SIZE / 4;

/// Fixed 256-entry colormap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    entries: [Rgba; TABLE_SIZE],
}

impl ColorTable {
    /// Entry for a table index
    #[inline]
    pub fn entry(&self, index: u8) -> Rgba {
        self.entries[index as usize]
    }

    /// Color for a normalized intensity in [0, 1]
    #[inline]
    pub fn lookup(&self, value: f32) -> Rgba {
        self.entry(intensity_index(value))
    }

    pub fn entries(&self) -> &[Rgba; TABLE_SIZE] {
        &self.entries
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        build_color_table()
    }
}

/// Build the colormap: blue → cyan → green → yellow → red.
///
/// Four contiguous bands of 64 entries. Inside each band one channel ramps
/// up or down by 4 per step while the others stay fixed. Alpha is always 255.
pub fn build_color_table() -> ColorTable {
    let mut entries = [[0u8; 4]; TABLE_SIZE];

    for (i, entry) in entries.iter_mut().enumerate() {
        // step within band, 0..=63, so 4 * step fits in a u8
        let step = (i % BAND) as u8 * 4;
        let [r, g, b] = match i / BAND {
            0 => [0, step, 255],
            1 => [0, 255, 255 - step],
            2 => [step, 255, 0],
            _ => [255, 255 - step, 0],
        };
        *entry = [r, g, b, 255];
    }

    tracing::debug!(entries = TABLE_SIZE, "Color table built");
    ColorTable { entries }
}

/// Map a normalized value to a table index: `clamp(floor(v * 255), 0, 255)`.
///
/// NaN maps to 0.
#[inline]
pub fn intensity_index(value: f32) -> u8 {
    // `as` saturates and maps NaN to 0
    (value * 255.0).floor().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_endpoints() {
        let table = build_color_table();
        assert_eq!(table.entry(0), [0, 0, 255, 255]);
        assert_eq!(table.entry(63), [0, 252, 255, 255]);
        assert_eq!(table.entry(64), [0, 255, 255, 255]);
        assert_eq!(table.entry(127), [0, 255, 3, 255]);
        assert_eq!(table.entry(128), [0, 255, 0, 255]);
        assert_eq!(table.entry(191), [252, 255, 0, 255]);
        assert_eq!(table.entry(192), [255, 255, 0, 255]);
        assert_eq!(table.entry(255), [255, 3, 0, 255]);
    }

    #[test]
    fn test_alpha_always_opaque() {
        let table = build_color_table();
        assert!(table.entries().iter().all(|c| c[3] == 255));
    }

    #[test]
    fn test_channels_monotonic_within_band() {
        let table = build_color_table();
        for band in 0..4 {
            let start = band * BAND;
            for ch in 0..3 {
                let values: Vec<u8> = (start..start + BAND)
                    .map(|i| table.entries()[i][ch])
                    .collect();
                let rising = values.windows(2).all(|w| w[0] <= w[1]);
                let falling = values.windows(2).all(|w| w[0] >= w[1]);
                assert!(
                    rising || falling,
                    "band {} channel {} is not monotonic: {:?}",
                    band,
                    ch,
                    values
                );
            }
        }
    }

    #[test]
    fn test_intensity_index_clamps() {
        assert_eq!(intensity_index(0.0), 0);
        assert_eq!(intensity_index(1.0), 255);
        assert_eq!(intensity_index(0.5), 127);
        assert_eq!(intensity_index(-0.2), 0);
        assert_eq!(intensity_index(1.5), 255);
        assert_eq!(intensity_index(f32::NAN), 0);
        assert_eq!(intensity_index(f32::INFINITY), 255);
    }

    #[test]
    fn test_lookup_matches_entry() {
        let table = build_color_table();
        assert_eq!(table.lookup(1.0), table.entry(255));
        assert_eq!(table.lookup(0.0), table.entry(0));
        assert_eq!(table.lookup(0.25), table.entry(63));
    }
}
