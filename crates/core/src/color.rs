//! Color mapping from field samples to displayable pixels, and back.
//!
//! Field samples become a display value in [0, 1] (stored in a
//! [`Field`](crate::field::Field)) and then an 8-bit RGB triple. The
//! decibel gain scale is invertible: [`GainColorScale::decode`] recovers an
//! approximate gain from a rendered pixel, which is how the pointer probe
//! reads the gain map. Forward and inverse share the same endpoints, held in
//! one [`GainColorScale`] value.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::WaveError;

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`. The hex round-trip has 8-bit
/// quantization, which matches the rendered buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    /// Gray with every channel set to `v`.
    pub fn gray(v: f64) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Builds a color from 8-bit channels.
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self {
            r: rgb[0] as f64 / 255.0,
            g: rgb[1] as f64 / 255.0,
            b: rgb[2] as f64 / 255.0,
        }
    }

    /// Quantizes to 8-bit channels with rounding; out-of-range and NaN inputs clamp.
    pub fn to_rgb8(self) -> [u8; 3] {
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Srgb, WaveError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(WaveError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| WaveError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb::from_rgb8([
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ]))
    }

    /// Formats as `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn quantize(c: f64) -> u8 {
    let c = if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) };
    (c * 255.0).round() as u8
}

/// Display value of a signed instantaneous amplitude: `clamp(Σ/2 + 1/2, 0, 1)`.
pub fn amplitude_to_display(sum: f64) -> f64 {
    (sum * 0.5 + 0.5).clamp(0.0, 1.0)
}

/// Red/blue diverging scale between a minimum and maximum gain in decibels.
///
/// Gain `g` maps to `ratio = (g - min_gain) / (max_gain - min_gain)`; red
/// rises from `min_red` to `max_red` and blue falls from `min_blue` to
/// `max_blue` as the ratio goes from 0 to 1. Green is constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainColorScale {
    pub min_gain_db: f64,
    pub max_gain_db: f64,
    pub min_red: u8,
    pub max_red: u8,
    pub min_blue: u8,
    pub max_blue: u8,
    pub green: u8,
}

impl Default for GainColorScale {
    fn default() -> Self {
        Self {
            min_gain_db: -80.0,
            max_gain_db: 0.0,
            min_red: 64,
            max_red: 255,
            min_blue: 255,
            max_blue: 64,
            green: 64,
        }
    }
}

impl GainColorScale {
    /// Gain in decibels of a steady-state magnitude, `20·log10(m)`, clamped to the scale.
    ///
    /// Zero (and anything non-positive or NaN) maps to the minimum gain.
    pub fn magnitude_to_db(&self, magnitude: f64) -> f64 {
        if magnitude.is_nan() || magnitude <= 0.0 {
            return self.min_gain_db;
        }
        (20.0 * magnitude.log10()).clamp(self.min_gain_db, self.max_gain_db)
    }

    /// Position of `db` on the scale, in [0, 1].
    pub fn ratio_for_db(&self, db: f64) -> f64 {
        let span = self.max_gain_db - self.min_gain_db;
        if span == 0.0 || db.is_nan() {
            return 0.0;
        }
        ((db - self.min_gain_db) / span).clamp(0.0, 1.0)
    }

    /// Gain at position `ratio` on the scale.
    pub fn db_for_ratio(&self, ratio: f64) -> f64 {
        self.min_gain_db + ratio.clamp(0.0, 1.0) * (self.max_gain_db - self.min_gain_db)
    }

    /// Color at position `ratio` on the scale.
    pub fn encode_ratio(&self, ratio: f64) -> [u8; 3] {
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        [
            lerp_channel(self.min_red, self.max_red, ratio),
            self.green,
            lerp_channel(self.min_blue, self.max_blue, ratio),
        ]
    }

    /// Color of a gain in decibels.
    pub fn encode_db(&self, db: f64) -> [u8; 3] {
        self.encode_ratio(self.ratio_for_db(db))
    }

    /// Approximate gain in decibels of a rendered color.
    ///
    /// Red and blue are each inverted to a ratio, the two ratios are
    /// averaged, and the average is mapped back onto the gain range.
    /// Precision is bounded by 8-bit quantization.
    pub fn decode(&self, rgb: [u8; 3]) -> f64 {
        let red = unlerp_channel(self.min_red, self.max_red, rgb[0]);
        let blue = unlerp_channel(self.min_blue, self.max_blue, rgb[2]);
        self.db_for_ratio((red + blue) / 2.0)
    }
}

fn lerp_channel(from: u8, to: u8, ratio: f64) -> u8 {
    let v = from as f64 + ratio * (to as f64 - from as f64);
    v.round().clamp(0.0, 255.0) as u8
}

fn unlerp_channel(from: u8, to: u8, value: u8) -> f64 {
    if from == to {
        return 0.0;
    }
    ((value as f64 - from as f64) / (to as f64 - from as f64)).clamp(0.0, 1.0)
}

/// How field samples are turned into display values and colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scale", rename_all = "snake_case")]
pub enum ColorMapper {
    /// Signed instantaneous amplitude on a grayscale ramp centered at mid-gray.
    Amplitude,
    /// Steady-state magnitude on a grayscale ramp, saturating at 1.
    GainLinear,
    /// Steady-state magnitude in decibels on an invertible red/blue scale.
    GainDecibel(GainColorScale),
}

impl ColorMapper {
    /// Decibel gain mapper with the default endpoints.
    pub fn gain_decibel() -> Self {
        ColorMapper::GainDecibel(GainColorScale::default())
    }

    /// Maps a raw field sample to a display value in [0, 1].
    pub fn display_value(&self, sample: f64) -> f64 {
        match self {
            ColorMapper::Amplitude => amplitude_to_display(sample),
            ColorMapper::GainLinear => sample.clamp(0.0, 1.0),
            ColorMapper::GainDecibel(scale) => {
                scale.ratio_for_db(scale.magnitude_to_db(sample))
            }
        }
    }

    /// Maps a display value to an 8-bit color. NaN is treated as 0.
    pub fn color(&self, value: f64) -> [u8; 3] {
        match self {
            ColorMapper::Amplitude | ColorMapper::GainLinear => Srgb::gray(value).to_rgb8(),
            ColorMapper::GainDecibel(scale) => scale.encode_ratio(value),
        }
    }

    /// Recovers a gain in decibels from a rendered color, if this mapper is invertible.
    pub fn probe(&self, rgb: [u8; 3]) -> Option<f64> {
        match self {
            ColorMapper::GainDecibel(scale) => Some(scale.decode(rgb)),
            ColorMapper::Amplitude | ColorMapper::GainLinear => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Srgb --

    #[test]
    fn from_hex_parses_with_and_without_hash() {
        assert_eq!(Srgb::from_hex("#ff0000").unwrap().to_rgb8(), [255, 0, 0]);
        assert_eq!(Srgb::from_hex("00ff00").unwrap().to_rgb8(), [0, 255, 0]);
    }

    #[test]
    fn from_hex_returns_error_for_invalid_hex() {
        assert!(Srgb::from_hex("#gggggg").is_err());
        assert!(Srgb::from_hex("#fff").is_err());
        assert!(Srgb::from_hex("").is_err());
        assert!(Srgb::from_hex("#ff00ff00").is_err());
    }

    #[test]
    fn from_hex_to_hex_round_trip() {
        let original = "#40c0ee";
        assert_eq!(Srgb::from_hex(original).unwrap().to_hex(), original);
    }

    #[test]
    fn to_rgb8_clamps_out_of_range_and_nan() {
        let c = Srgb {
            r: 1.5,
            g: -0.1,
            b: f64::NAN,
        };
        assert_eq!(c.to_rgb8(), [255, 0, 0]);
    }

    #[test]
    fn srgb_serializes_as_hex_string() {
        let json = serde_json::to_string(&Srgb::gray(1.0)).unwrap();
        assert_eq!(json, "\"#ffffff\"");
        let back: Srgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Srgb::gray(1.0));
    }

    // -- amplitude grayscale --

    #[test]
    fn amplitude_zero_is_mid_gray() {
        assert_eq!(amplitude_to_display(0.0), 0.5);
        assert_eq!(ColorMapper::Amplitude.color(0.5), [128, 128, 128]);
    }

    #[test]
    fn amplitude_saturates_at_both_ends() {
        assert_eq!(amplitude_to_display(1.0), 1.0);
        assert_eq!(amplitude_to_display(-1.0), 0.0);
        assert_eq!(amplitude_to_display(7.5), 1.0);
        assert_eq!(amplitude_to_display(-7.5), 0.0);
    }

    #[test]
    fn gain_linear_clamps_magnitude() {
        let m = ColorMapper::GainLinear;
        assert_eq!(m.display_value(0.25), 0.25);
        assert_eq!(m.display_value(3.0), 1.0);
        assert_eq!(m.color(1.0), [255, 255, 255]);
        assert_eq!(m.probe([255, 255, 255]), None);
    }

    // -- decibel scale --

    #[test]
    fn magnitude_to_db_uses_amplitude_decibels() {
        let s = GainColorScale::default();
        assert!((s.magnitude_to_db(0.1) - (-20.0)).abs() < 1e-12);
        assert_eq!(s.magnitude_to_db(1.0), 0.0);
        assert_eq!(s.magnitude_to_db(5.0), 0.0);
        assert_eq!(s.magnitude_to_db(0.0), -80.0);
        assert_eq!(s.magnitude_to_db(1e-9), -80.0);
    }

    #[test]
    fn scale_endpoints_encode_to_documented_channels() {
        let s = GainColorScale::default();
        assert_eq!(s.encode_db(-80.0), [64, 64, 255]);
        assert_eq!(s.encode_db(0.0), [255, 64, 64]);
    }

    #[test]
    fn decode_endpoints() {
        let s = GainColorScale::default();
        assert_eq!(s.decode([64, 64, 255]), -80.0);
        assert_eq!(s.decode([255, 64, 64]), 0.0);
    }

    #[test]
    fn decode_clamps_colors_outside_the_scale() {
        let s = GainColorScale::default();
        assert_eq!(s.decode([0, 0, 255]), -80.0);
        assert_eq!(s.decode([255, 255, 0]), 0.0);
    }

    #[test]
    fn mapper_decibel_display_and_probe_agree() {
        let m = ColorMapper::gain_decibel();
        let value = m.display_value(0.01); // -40 dB
        assert!((value - 0.5).abs() < 1e-12);
        let db = m.probe(m.color(value)).unwrap();
        assert!((db + 40.0).abs() < 0.33, "got {db}");
    }

    #[test]
    fn mapper_serializes_with_scale_tag() {
        let json = serde_json::to_value(ColorMapper::Amplitude).unwrap();
        assert_eq!(json["scale"], "amplitude");
        let json = serde_json::to_value(ColorMapper::gain_decibel()).unwrap();
        assert_eq!(json["scale"], "gain_decibel");
        assert_eq!(json["min_gain_db"], -80.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn decibel_round_trip_within_one_quantization_step(g in -80.0_f64..=0.0) {
                let s = GainColorScale::default();
                let decoded = s.decode(s.encode_db(g));
                prop_assert!(
                    (decoded - g).abs() <= 80.0 / 191.0 * 0.5 + 1e-9,
                    "encoded {} decoded {}", g, decoded
                );
                prop_assert!((decoded - g).abs() < 0.33);
            }

            #[test]
            fn display_values_stay_in_unit_range(sample in prop::num::f64::ANY) {
                prop_assume!(!sample.is_nan());
                for m in [ColorMapper::Amplitude, ColorMapper::GainLinear, ColorMapper::gain_decibel()] {
                    let v = m.display_value(sample);
                    prop_assert!((0.0..=1.0).contains(&v), "{:?} gave {}", m, v);
                }
            }

            #[test]
            fn louder_never_decodes_quieter(a in -80.0_f64..=0.0, b in -80.0_f64..=0.0) {
                let s = GainColorScale::default();
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(s.decode(s.encode_db(lo)) <= s.decode(s.encode_db(hi)));
            }
        }
    }
}
