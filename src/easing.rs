//! The easing library: the named interpolation curves that shape a
//! color channel across the palette index, plus a generalized cubic
//! Bezier curve.  Every curve is a pure function of
//! `(t, total, max, min)`, valid for `t` in `[0, total]`, returning
//! `min` at the start of the domain and `max` at the end -- except
//! `Fixed`, which pins the channel to `max` everywhere.
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use errors::Error;
use normalize::normalize_values;

/// Number of parameter values at which a Bezier curve is sampled
/// before being rescaled into the target range.
const BEZIER_SAMPLES: usize = 256;

/// An interpolation curve.  The named variants are the classic Penner
/// easing family; `CubicBezier` carries its two control points as
/// data, spanning a curve from `(0, 0)` to `(1, 1)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Easing {
    /// Always the `max` endpoint, regardless of `t`.
    Fixed,
    /// Straight-line interpolation.
    Linear,
    /// Quadratic, accelerating from rest.
    InQuad,
    /// Quadratic, decelerating to rest.
    OutQuad,
    /// Quadratic, accelerating then decelerating.
    InOutQuad,
    /// Cubic, accelerating from rest.
    InCubic,
    /// Cubic, decelerating to rest.
    OutCubic,
    /// Cubic, accelerating then decelerating.
    InOutCubic,
    /// Quartic, accelerating from rest.
    InQuart,
    /// Quartic, decelerating to rest.
    OutQuart,
    /// Quartic, accelerating then decelerating.
    InOutQuart,
    /// Quintic, accelerating from rest.
    InQuint,
    /// Quintic, decelerating to rest.
    OutQuint,
    /// Quintic, accelerating then decelerating.
    InOutQuint,
    /// Sinusoidal, accelerating from rest.
    InSine,
    /// Sinusoidal, decelerating to rest.
    OutSine,
    /// Sinusoidal, accelerating then decelerating.
    InOutSine,
    /// Exponential, accelerating from rest.
    InExp,
    /// Exponential, decelerating to rest.
    OutExp,
    /// Exponential, accelerating then decelerating.
    InOutExp,
    /// Circular, accelerating from rest.
    InCirc,
    /// Circular, decelerating to rest.
    OutCirc,
    /// Circular, accelerating then decelerating.
    InOutCirc,
    /// A cubic Bezier from `(0, 0)` to `(1, 1)`, sampled and rescaled
    /// into the channel range.
    CubicBezier {
        /// First control point.
        p1: (f64, f64),
        /// Second control point.
        p2: (f64, f64),
    },
}

/// The registry of named curves, in canonical spelling.  Lookup is by
/// this table; dispatch is always the exhaustive `match` in `calc`.
pub const NAMED_CURVES: [(&'static str, Easing); 23] = [
    ("Fixed", Easing::Fixed),
    ("Linear", Easing::Linear),
    ("InQuad", Easing::InQuad),
    ("OutQuad", Easing::OutQuad),
    ("InOutQuad", Easing::InOutQuad),
    ("InCubic", Easing::InCubic),
    ("OutCubic", Easing::OutCubic),
    ("InOutCubic", Easing::InOutCubic),
    ("InQuart", Easing::InQuart),
    ("OutQuart", Easing::OutQuart),
    ("InOutQuart", Easing::InOutQuart),
    ("InQuint", Easing::InQuint),
    ("OutQuint", Easing::OutQuint),
    ("InOutQuint", Easing::InOutQuint),
    ("InSine", Easing::InSine),
    ("OutSine", Easing::OutSine),
    ("InOutSine", Easing::InOutSine),
    ("InExp", Easing::InExp),
    ("OutExp", Easing::OutExp),
    ("InOutExp", Easing::InOutExp),
    ("InCirc", Easing::InCirc),
    ("OutCirc", Easing::OutCirc),
    ("InOutCirc", Easing::InOutCirc),
];

impl Easing {
    /// Looks a curve up by its canonical name.  `CubicBezier` is not
    /// nameable; it is constructed with its control points instead.
    pub fn from_name(name: &str) -> Result<Easing, Error> {
        for &(n, curve) in NAMED_CURVES.iter() {
            if n == name {
                return Ok(curve);
            }
        }
        Err(Error::unknown_easing(name))
    }

    /// The canonical name of this curve.
    pub fn name(&self) -> &'static str {
        for &(n, curve) in NAMED_CURVES.iter() {
            if curve == *self {
                return n;
            }
        }
        "CubicBezier"
    }

    /// Evaluates the curve at `t` over the domain `[0, total]`,
    /// interpolating from `min` to `max`.  A collapsed domain
    /// (`total <= 0`) yields the `max` endpoint.
    pub fn calc(&self, t: f64, total: f64, max: f64, min: f64) -> f64 {
        if total <= 0.0 {
            return max;
        }
        let d = total;
        let c = max - min;
        match *self {
            Easing::Fixed => max,
            Easing::Linear => c * t / d + min,
            Easing::InQuad => {
                let p = t / d;
                c * p * p + min
            }
            Easing::OutQuad => {
                let p = t / d;
                -c * p * (p - 2.0) + min
            }
            Easing::InOutQuad => {
                let p = t / (d * 0.5);
                if p < 1.0 {
                    c * 0.5 * p * p + min
                } else {
                    let p = p - 1.0;
                    -c * 0.5 * (p * (p - 2.0) - 1.0) + min
                }
            }
            Easing::InCubic => {
                let p = t / d;
                c * p.powi(3) + min
            }
            Easing::OutCubic => {
                let p = t / d - 1.0;
                c * (p.powi(3) + 1.0) + min
            }
            Easing::InOutCubic => {
                let p = t / (d * 0.5);
                if p < 1.0 {
                    c * 0.5 * p.powi(3) + min
                } else {
                    let p = p - 2.0;
                    c * 0.5 * (p.powi(3) + 2.0) + min
                }
            }
            Easing::InQuart => {
                let p = t / d;
                c * p.powi(4) + min
            }
            Easing::OutQuart => {
                let p = t / d - 1.0;
                -c * (p.powi(4) - 1.0) + min
            }
            Easing::InOutQuart => {
                let p = t / (d * 0.5);
                if p < 1.0 {
                    c * 0.5 * p.powi(4) + min
                } else {
                    let p = p - 2.0;
                    -c * 0.5 * (p.powi(4) - 2.0) + min
                }
            }
            Easing::InQuint => {
                let p = t / d;
                c * p.powi(5) + min
            }
            Easing::OutQuint => {
                let p = t / d - 1.0;
                c * (p.powi(5) + 1.0) + min
            }
            Easing::InOutQuint => {
                let p = t / (d * 0.5);
                if p < 1.0 {
                    c * 0.5 * p.powi(5) + min
                } else {
                    let p = p - 2.0;
                    c * 0.5 * (p.powi(5) + 2.0) + min
                }
            }
            Easing::InSine => {
                -c * (t / d * ::std::f64::consts::FRAC_PI_2).cos() + c + min
            }
            Easing::OutSine => c * (t / d * ::std::f64::consts::FRAC_PI_2).sin() + min,
            Easing::InOutSine => {
                -c * 0.5 * ((::std::f64::consts::PI * t / d).cos() - 1.0) + min
            }
            Easing::InExp => {
                // The exponential family never quite reaches its
                // endpoints; both are pinned exactly.
                if t == 0.0 {
                    min
                } else if t == d {
                    max
                } else {
                    c * (2.0f64).powf(10.0 * (t / d - 1.0)) + min
                }
            }
            Easing::OutExp => {
                if t == 0.0 {
                    min
                } else if t == d {
                    max
                } else {
                    c * (1.0 - (2.0f64).powf(-10.0 * t / d)) + min
                }
            }
            Easing::InOutExp => {
                if t == 0.0 {
                    min
                } else if t == d {
                    max
                } else {
                    let p = t / (d * 0.5);
                    if p < 1.0 {
                        c * 0.5 * (2.0f64).powf(10.0 * (p - 1.0)) + min
                    } else {
                        let p = p - 1.0;
                        c * 0.5 * (2.0 - (2.0f64).powf(-10.0 * p)) + min
                    }
                }
            }
            Easing::InCirc => {
                let p = t / d;
                -c * ((1.0 - p * p).sqrt() - 1.0) + min
            }
            Easing::OutCirc => {
                let p = t / d - 1.0;
                c * (1.0 - p * p).sqrt() + min
            }
            Easing::InOutCirc => {
                let p = t / (d * 0.5);
                if p < 1.0 {
                    -c * 0.5 * ((1.0 - p * p).sqrt() - 1.0) + min
                } else {
                    let p = p - 2.0;
                    c * 0.5 * ((1.0 - p * p).sqrt() + 1.0) + min
                }
            }
            Easing::CubicBezier { p1, p2 } => {
                let mut ys = Vec::with_capacity(BEZIER_SAMPLES);
                for i in 0..BEZIER_SAMPLES {
                    let u = i as f64 / (BEZIER_SAMPLES - 1) as f64;
                    ys.push(bezier_y(p1, p2, u));
                }
                let ys = normalize_values(&ys, min, max);
                let pos = (t / d).max(0.0).min(1.0);
                ys[(pos * (BEZIER_SAMPLES - 1) as f64).round() as usize]
            }
        }
    }
}

/// The y component of the cubic Bezier from `(0, 0)` to `(1, 1)` with
/// control points `p1`, `p2`, at parameter `u`.
fn bezier_y(p1: (f64, f64), p2: (f64, f64), u: f64) -> f64 {
    let v = 1.0 - u;
    3.0 * v * v * u * p1.1 + 3.0 * v * u * u * p2.1 + u * u * u
}

/// The persisted form: a bare curve name, or a `{p1, p2}` object for
/// the Bezier variant.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum EasingRepr {
    Named(String),
    Bezier { p1: [f64; 2], p2: [f64; 2] },
}

impl Serialize for Easing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Easing::CubicBezier { p1, p2 } => EasingRepr::Bezier {
                p1: [p1.0, p1.1],
                p2: [p2.0, p2.1],
            }
            .serialize(serializer),
            ref named => EasingRepr::Named(named.name().to_string()).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Easing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Easing, D::Error> {
        match EasingRepr::deserialize(deserializer)? {
            EasingRepr::Named(name) => Easing::from_name(&name).map_err(de::Error::custom),
            EasingRepr::Bezier { p1, p2 } => Ok(Easing::CubicBezier {
                p1: (p1[0], p1[1]),
                p2: (p2[0], p2[1]),
            }),
        }
    }
}
