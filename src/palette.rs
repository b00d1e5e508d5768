//! The palette builder.  A palette is a fixed 256-entry lookup table
//! of HSB triples; each of the three channels is shaped across the
//! table by its own easing curve over its own range.  Building one
//! depends only on the color configuration, never on the grid, so a
//! palette is built once per configuration change and reused across
//! renders.

use easing::Easing;

/// Number of entries in every palette.
pub const PALETTE_SIZE: usize = 256;

/// One color channel: the `[0, 1]` range it sweeps (begin at palette
/// index 0, end at index 255) and the curve that shapes the sweep.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpec {
    /// `(begin, end)` channel values in `[0, 1]`.  Begin may exceed
    /// end for a reversed sweep.
    pub range: (f64, f64),
    /// The curve shaping the sweep.
    pub easing: Easing,
}

/// The full color configuration: one channel spec each for hue,
/// saturation, and brightness.  Treated as an immutable snapshot for
/// the duration of a build.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Hue channel, where 0.0 and 1.0 are both red.
    pub hue: ChannelSpec,
    /// Saturation channel.
    pub saturation: ChannelSpec,
    /// Brightness channel.
    pub brightness: ChannelSpec,
}

/// The configuration used when a caller supplies none: a fixed
/// mid-spectrum hue at full saturation with brightness ramping
/// linearly from black, so iteration count reads directly as
/// lightness.
pub const DEFAULT_CONFIG: PaletteConfig = PaletteConfig {
    hue: ChannelSpec {
        range: (0.5, 0.5),
        easing: Easing::Fixed,
    },
    saturation: ChannelSpec {
        range: (1.0, 1.0),
        easing: Easing::Fixed,
    },
    brightness: ChannelSpec {
        range: (0.0, 1.0),
        easing: Easing::Linear,
    },
};

/// A 256-entry table of `(h, s, b)` byte triples, indexed by a
/// normalized divergence value.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    entries: Vec<(u8, u8, u8)>,
}

impl Palette {
    /// Builds the table from a configuration.  Each channel's easing
    /// is evaluated at `t = i` over a total of 255, so index 0 lands
    /// exactly on the channel's begin value and index 255 exactly on
    /// its end value, then scaled into a byte.
    pub fn build(config: &PaletteConfig) -> Palette {
        let entries = (0..PALETTE_SIZE)
            .map(|i| {
                let t = i as f64;
                (
                    channel_byte(&config.hue, t),
                    channel_byte(&config.saturation, t),
                    channel_byte(&config.brightness, t),
                )
            })
            .collect();
        Palette { entries }
    }

    /// The entry at `index`.  Indexing by byte makes out-of-range
    /// lookups unrepresentable.
    pub fn get(&self, index: u8) -> (u8, u8, u8) {
        self.entries[index as usize]
    }

    /// All 256 entries in order.
    pub fn entries(&self) -> &[(u8, u8, u8)] {
        &self.entries
    }
}

fn channel_byte(spec: &ChannelSpec, t: f64) -> u8 {
    let v = spec
        .easing
        .calc(t, (PALETTE_SIZE - 1) as f64, spec.range.1, spec.range.0);
    num::clamp((v * 255.0).round(), 0.0, 255.0) as u8
}
