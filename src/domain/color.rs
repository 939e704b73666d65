//! Deterministic Node Coloring
//!
//! Every node color is derived from a fingerprint of strings: each string is
//! hashed (32-bit FNV-1), placed on a spectral gradient, and the resulting
//! colors are blended in HCL space. Hashes are sorted before blending so the
//! result does not depend on the order the fingerprint was collected in.

use std::f64::consts::PI;

/// Color of a node whose fingerprint is empty.
pub const DEFAULT_COLOR: Color = Color::from_rgb8(0x3d, 0x4c, 0xc4);

/// Spectral gradient, positions in [0, 1].
const GRADIENT: [(Color, f64); 11] = [
    (Color::from_rgb8(0x9e, 0x01, 0x42), 0.0),
    (Color::from_rgb8(0xd5, 0x3e, 0x4f), 0.1),
    (Color::from_rgb8(0xf4, 0x6d, 0x43), 0.2),
    (Color::from_rgb8(0xfd, 0xae, 0x61), 0.3),
    (Color::from_rgb8(0xfe, 0xe0, 0x90), 0.4),
    (Color::from_rgb8(0xff, 0xff, 0xbf), 0.5),
    (Color::from_rgb8(0xe6, 0xf5, 0x98), 0.6),
    (Color::from_rgb8(0xab, 0xdd, 0xa4), 0.7),
    (Color::from_rgb8(0x66, 0xc2, 0xa5), 0.8),
    (Color::from_rgb8(0x32, 0x88, 0xbd), 0.9),
    (Color::from_rgb8(0x5e, 0x4f, 0xa2), 1.0),
];

// D65 reference white.
const WHITE_REF: [f64; 3] = [0.95047, 1.00000, 1.08883];

/// Chroma below which the hue of a color is meaningless.
const ACHROMATIC: f64 = 0.00015;

const FNV32_OFFSET: u32 = 0x811c9dc5;
const FNV32_PRIME: u32 = 0x01000193;

/// 32-bit FNV-1 (multiply, then xor).
pub fn fnv1_32(data: &[u8]) -> u32 {
    let mut hash = FNV32_OFFSET;
    for &byte in data {
        hash = hash.wrapping_mul(FNV32_PRIME);
        hash ^= byte as u32;
    }
    hash
}

/// An sRGB color with channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parse `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Color::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }

    /// `#rrggbb`, lowercase.
    pub fn to_hex(&self) -> String {
        let c = self.clamped();
        let channel = |v: f64| (v * 255.0 + 0.5) as u8;
        format!("#{:02x}{:02x}{:02x}", channel(c.r), channel(c.g), channel(c.b))
    }

    pub fn clamped(&self) -> Self {
        Color {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Blend towards `other` by `t` in HCL space along the shortest hue arc.
    pub fn blend_hcl(&self, other: &Color, t: f64) -> Color {
        let (mut h1, c1, l1) = self.to_hcl();
        let (mut h2, c2, l2) = other.to_hcl();

        // An achromatic endpoint adopts the other endpoint's hue.
        if c1 <= ACHROMATIC && c2 >= ACHROMATIC {
            h1 = h2;
        } else if c2 <= ACHROMATIC && c1 >= ACHROMATIC {
            h2 = h1;
        }

        Color::from_hcl(interp_angle(h1, h2, t), c1 + t * (c2 - c1), l1 + t * (l2 - l1)).clamped()
    }

    fn to_hcl(self) -> (f64, f64, f64) {
        let (l, a, b) = self.to_lab();
        let c = a.hypot(b);
        let h = if c > 1e-4 {
            b.atan2(a).to_degrees().rem_euclid(360.0)
        } else {
            0.0
        };
        (h, c, l)
    }

    fn from_hcl(h: f64, c: f64, l: f64) -> Color {
        let rad = h * PI / 180.0;
        Color::from_lab(l, rad.cos() * c, rad.sin() * c)
    }

    fn to_lab(self) -> (f64, f64, f64) {
        let (r, g, b) = (linearize(self.r), linearize(self.g), linearize(self.b));
        let x = 0.41239079926595948 * r + 0.35758433938387796 * g + 0.18048078840183429 * b;
        let y = 0.21263900587151036 * r + 0.71516867876775593 * g + 0.072192315360733715 * b;
        let z = 0.019330818715591851 * r + 0.11919477979462599 * g + 0.95053215224966058 * b;

        let fy = lab_f(y / WHITE_REF[1]);
        let l = 1.16 * fy - 0.16;
        let a = 5.0 * (lab_f(x / WHITE_REF[0]) - fy);
        let b = 2.0 * (fy - lab_f(z / WHITE_REF[2]));
        (l, a, b)
    }

    fn from_lab(l: f64, a: f64, b: f64) -> Color {
        let l2 = (l + 0.16) / 1.16;
        let x = WHITE_REF[0] * lab_finv(l2 + a / 5.0);
        let y = WHITE_REF[1] * lab_finv(l2);
        let z = WHITE_REF[2] * lab_finv(l2 - b / 2.0);

        let r = 3.2409699419045214 * x - 1.5373831775700935 * y - 0.49861076029300328 * z;
        let g = -0.96924363628087983 * x + 1.8759675015077207 * y + 0.041555057407175613 * z;
        let b = 0.055630079696993609 * x - 0.20397695888897657 * y + 1.0569715142428786 * z;
        Color {
            r: delinearize(r),
            g: delinearize(g),
            b: delinearize(b),
        }
    }
}

fn linearize(v: f64) -> f64 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

fn delinearize(v: f64) -> f64 {
    if v <= 0.0031308 {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

fn lab_f(t: f64) -> f64 {
    if t > 6.0 / 29.0 * 6.0 / 29.0 * 6.0 / 29.0 {
        t.cbrt()
    } else {
        t / 3.0 * 29.0 / 6.0 * 29.0 / 6.0 + 4.0 / 29.0
    }
}

fn lab_finv(t: f64) -> f64 {
    if t > 6.0 / 29.0 {
        t * t * t
    } else {
        3.0 * 6.0 / 29.0 * 6.0 / 29.0 * (t - 4.0 / 29.0)
    }
}

fn interp_angle(a0: f64, a1: f64, t: f64) -> f64 {
    let delta = ((a1 - a0).rem_euclid(360.0) + 540.0).rem_euclid(360.0) - 180.0;
    (a0 + t * delta + 360.0).rem_euclid(360.0)
}

/// Maps fingerprints onto colors.
pub struct ColorEncoder;

impl ColorEncoder {
    /// Position `t` in [0, 1] on the spectral gradient.
    pub fn gradient_at(t: f64) -> Color {
        for pair in GRADIENT.windows(2) {
            let (c1, p1) = pair[0];
            let (c2, p2) = pair[1];
            if p1 <= t && t <= p2 {
                return c1.blend_hcl(&c2, (t - p1) / (p2 - p1));
            }
        }
        GRADIENT[GRADIENT.len() - 1].0
    }

    pub fn hash_color(hash: u32) -> Color {
        Self::gradient_at(hash as f64 / u32::MAX as f64)
    }

    /// Blend of the gradient colors of every fingerprint entry, each with
    /// equal weight. Empty fingerprints map to `DEFAULT_COLOR`.
    pub fn color_for<S: AsRef<str>>(fingerprint: &[S]) -> Color {
        let mut hashes: Vec<u32> = fingerprint
            .iter()
            .map(|s| fnv1_32(s.as_ref().as_bytes()))
            .collect();
        hashes.sort_unstable();

        let mut colors = hashes.into_iter().map(Self::hash_color);
        let Some(mut mix) = colors.next() else {
            return DEFAULT_COLOR;
        };
        // Running mean: the i-th color (1-based) moves the mix by 1/i.
        for (i, c) in colors.enumerate() {
            mix = mix.blend_hcl(&c, 1.0 / (i + 2) as f64);
        }
        mix
    }

    /// Half parameter colors, half result colors.
    pub fn signature_color<S: AsRef<str>>(params: &[S], results: &[S]) -> Color {
        Self::color_for(params).blend_hcl(&Self::color_for(results), 0.5)
    }

    pub fn label_color(label: &str) -> Color {
        Self::color_for(&[label])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1_known_vectors() {
        assert_eq!(fnv1_32(b""), 0x811c9dc5);
        assert_eq!(fnv1_32(b"a"), 0x050c5d7e);
        assert_eq!(fnv1_32(b"foobar"), 0x31f0b262);
    }

    #[test]
    fn test_hex_round_trip() {
        let c = Color::from_hex("#3D4CC4").unwrap();
        assert_eq!(c.to_hex(), "#3d4cc4");
        assert!(Color::from_hex("3d4cc4").is_none());
        assert!(Color::from_hex("#3d4c").is_none());
    }

    #[test]
    fn test_lab_round_trip_is_stable() {
        for &(c, _) in GRADIENT.iter() {
            let (l, a, b) = c.to_lab();
            assert_eq!(Color::from_lab(l, a, b).to_hex(), c.to_hex());
        }
    }

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(ColorEncoder::gradient_at(0.0).to_hex(), "#9e0142");
        assert_eq!(ColorEncoder::gradient_at(1.0).to_hex(), "#5e4fa2");
        assert_eq!(ColorEncoder::gradient_at(0.5).to_hex(), "#ffffbf");
    }

    #[test]
    fn test_empty_fingerprint_uses_default() {
        let empty: [&str; 0] = [];
        assert_eq!(ColorEncoder::color_for(&empty), DEFAULT_COLOR);
    }

    #[test]
    fn test_single_entry_is_gradient_color() {
        let hash = fnv1_32(b"int");
        assert_eq!(ColorEncoder::color_for(&["int"]), ColorEncoder::hash_color(hash));
    }

    #[test]
    fn test_blend_endpoints() {
        let a = Color::from_rgb8(0x9e, 0x01, 0x42);
        let b = Color::from_rgb8(0x32, 0x88, 0xbd);
        assert_eq!(a.blend_hcl(&b, 0.0).to_hex(), a.to_hex());
        assert_eq!(a.blend_hcl(&b, 1.0).to_hex(), b.to_hex());
    }

    #[test]
    fn test_order_independence() {
        let base = ["string", "int", "error", "*bytes.Buffer"];
        let expected = ColorEncoder::color_for(&base).to_hex();
        let perms = [
            ["int", "string", "error", "*bytes.Buffer"],
            ["*bytes.Buffer", "error", "int", "string"],
            ["error", "*bytes.Buffer", "string", "int"],
        ];
        for p in perms.iter() {
            assert_eq!(ColorEncoder::color_for(p).to_hex(), expected);
        }
    }

    #[test]
    fn test_interp_angle_takes_short_arc() {
        assert!((interp_angle(350.0, 10.0, 0.5) - 0.0).abs() < 1e-9);
        assert!((interp_angle(10.0, 350.0, 0.5) - 0.0).abs() < 1e-9);
    }
}
