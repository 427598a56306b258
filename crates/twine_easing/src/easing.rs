//! Easing equations
//!
//! Robert Penner's equations plus a CSS-style cubic bezier. Every equation maps
//! a normalized time `t` in `[0, 1]` to a progress value. Overshooting curves
//! (back, elastic) may leave `[0, 1]` transiently.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// A stateless easing equation.
pub trait EasingFunction {
    /// Map normalized time `t` to eased progress.
    fn compute(&self, t: f32) -> f32;

    /// Stable display name, used for diagnostics.
    fn name(&self) -> &str;
}

/// Closures can be used directly as easing functions.
impl<F> EasingFunction for F
where
    F: Fn(f32) -> f32,
{
    fn compute(&self, t: f32) -> f32 {
        self(t)
    }

    fn name(&self) -> &str {
        "Custom"
    }
}

/// Optional tuning for the elastic equations.
///
/// Unset values fall back to an amplitude of 1 and a period of 0.3 (0.45 for
/// the in/out variant).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Elastic {
    #[serde(default)]
    pub amplitude: Option<f32>,
    #[serde(default)]
    pub period: Option<f32>,
}

impl Elastic {
    pub fn new(amplitude: f32, period: f32) -> Self {
        Self {
            amplitude: Some(amplitude),
            period: Some(period),
        }
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = Some(amplitude);
        self
    }

    pub fn with_period(mut self, period: f32) -> Self {
        self.period = Some(period);
        self
    }

    /// Resolve (amplitude, period, phase shift) for a default period.
    fn resolve(&self, default_period: f32) -> (f32, f32, f32) {
        let p = self.period.unwrap_or(default_period);
        match self.amplitude {
            Some(a) if a >= 1.0 => (a, p, p / (2.0 * PI) * (1.0 / a).asin()),
            _ => (1.0, p, p / 4.0),
        }
    }
}

/// The built-in easing catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    QuadIn,
    QuadOut,
    #[default]
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    SineIn,
    SineOut,
    SineInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    CircIn,
    CircOut,
    CircInOut,
    BackIn,
    BackOut,
    BackInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
    ElasticIn(Elastic),
    ElasticOut(Elastic),
    ElasticInOut(Elastic),
    CubicBezier(f32, f32, f32, f32),
}

/// Overshoot used by the back equations.
const BACK_OVERSHOOT: f32 = 1.70158;

impl Easing {
    /// Apply the easing equation to a normalized time value.
    pub fn apply(&self, t: f32) -> f32 {
        match *self {
            Easing::Linear => t,

            Easing::QuadIn => t * t,
            Easing::QuadOut => -t * (t - 2.0),
            Easing::QuadInOut => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t
                } else {
                    -0.5 * ((t - 1.0) * (t - 3.0) - 1.0)
                }
            }

            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            Easing::CubicInOut => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t * t
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * t + 2.0)
                }
            }

            Easing::QuartIn => t.powi(4),
            Easing::QuartOut => -((t - 1.0).powi(4) - 1.0),
            Easing::QuartInOut => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t.powi(4)
                } else {
                    -0.5 * ((t - 2.0).powi(4) - 2.0)
                }
            }

            Easing::QuintIn => t.powi(5),
            Easing::QuintOut => (t - 1.0).powi(5) + 1.0,
            Easing::QuintInOut => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t.powi(5)
                } else {
                    0.5 * ((t - 2.0).powi(5) + 2.0)
                }
            }

            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -0.5 * ((PI * t).cos() - 1.0),

            Easing::ExpoIn => {
                if t == 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * (t - 1.0))
                }
            }
            Easing::ExpoOut => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            Easing::ExpoInOut => {
                if t == 0.0 {
                    return 0.0;
                }
                if t == 1.0 {
                    return 1.0;
                }
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * 2f32.powf(10.0 * (t - 1.0))
                } else {
                    0.5 * (2.0 - 2f32.powf(-10.0 * (t - 1.0)))
                }
            }

            Easing::CircIn => 1.0 - (1.0 - t * t).sqrt(),
            Easing::CircOut => (1.0 - (t - 1.0) * (t - 1.0)).sqrt(),
            Easing::CircInOut => {
                let t = t * 2.0;
                if t < 1.0 {
                    -0.5 * ((1.0 - t * t).sqrt() - 1.0)
                } else {
                    let t = t - 2.0;
                    0.5 * ((1.0 - t * t).sqrt() + 1.0)
                }
            }

            Easing::BackIn => {
                let s = BACK_OVERSHOOT;
                t * t * ((s + 1.0) * t - s)
            }
            Easing::BackOut => {
                let s = BACK_OVERSHOOT;
                let t = t - 1.0;
                t * t * ((s + 1.0) * t + s) + 1.0
            }
            Easing::BackInOut => {
                let s = BACK_OVERSHOOT * 1.525;
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * (t * t * ((s + 1.0) * t - s))
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * ((s + 1.0) * t + s) + 2.0)
                }
            }

            Easing::BounceIn => bounce_in(t),
            Easing::BounceOut => bounce_out(t),
            Easing::BounceInOut => {
                if t < 0.5 {
                    bounce_in(t * 2.0) * 0.5
                } else {
                    bounce_out(t * 2.0 - 1.0) * 0.5 + 0.5
                }
            }

            Easing::ElasticIn(params) => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let (a, p, s) = params.resolve(0.3);
                let t = t - 1.0;
                -(a * 2f32.powf(10.0 * t) * ((t - s) * (2.0 * PI) / p).sin())
            }
            Easing::ElasticOut(params) => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let (a, p, s) = params.resolve(0.3);
                a * 2f32.powf(-10.0 * t) * ((t - s) * (2.0 * PI) / p).sin() + 1.0
            }
            Easing::ElasticInOut(params) => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let (a, p, s) = params.resolve(0.3 * 1.5);
                let t = t * 2.0 - 1.0;
                if t < 0.0 {
                    -0.5 * (a * 2f32.powf(10.0 * t) * ((t - s) * (2.0 * PI) / p).sin())
                } else {
                    a * 2f32.powf(-10.0 * t) * ((t - s) * (2.0 * PI) / p).sin() * 0.5 + 1.0
                }
            }

            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }

    /// Display name in `Family.MODE` form.
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "Linear.INOUT",
            Easing::QuadIn => "Quad.IN",
            Easing::QuadOut => "Quad.OUT",
            Easing::QuadInOut => "Quad.INOUT",
            Easing::CubicIn => "Cubic.IN",
            Easing::CubicOut => "Cubic.OUT",
            Easing::CubicInOut => "Cubic.INOUT",
            Easing::QuartIn => "Quart.IN",
            Easing::QuartOut => "Quart.OUT",
            Easing::QuartInOut => "Quart.INOUT",
            Easing::QuintIn => "Quint.IN",
            Easing::QuintOut => "Quint.OUT",
            Easing::QuintInOut => "Quint.INOUT",
            Easing::SineIn => "Sine.IN",
            Easing::SineOut => "Sine.OUT",
            Easing::SineInOut => "Sine.INOUT",
            Easing::ExpoIn => "Expo.IN",
            Easing::ExpoOut => "Expo.OUT",
            Easing::ExpoInOut => "Expo.INOUT",
            Easing::CircIn => "Circ.IN",
            Easing::CircOut => "Circ.OUT",
            Easing::CircInOut => "Circ.INOUT",
            Easing::BackIn => "Back.IN",
            Easing::BackOut => "Back.OUT",
            Easing::BackInOut => "Back.INOUT",
            Easing::BounceIn => "Bounce.IN",
            Easing::BounceOut => "Bounce.OUT",
            Easing::BounceInOut => "Bounce.INOUT",
            Easing::ElasticIn(_) => "Elastic.IN",
            Easing::ElasticOut(_) => "Elastic.OUT",
            Easing::ElasticInOut(_) => "Elastic.INOUT",
            Easing::CubicBezier(..) => "CubicBezier",
        }
    }
}

impl EasingFunction for Easing {
    fn compute(&self, t: f32) -> f32 {
        self.apply(t)
    }

    fn name(&self) -> &str {
        Easing::name(self)
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

fn bounce_in(t: f32) -> f32 {
    1.0 - bounce_out(1.0 - t)
}

/// Cubic bezier easing with fixed endpoints (0,0) and (1,1).
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let x = BezierAxis::new(x1 as f64, x2 as f64);
    let y = BezierAxis::new(y1 as f64, y2 as f64);
    y.at(x.solve(t as f64)) as f32
}

const BEZIER_TOLERANCE: f64 = 1e-7;

/// One coordinate of a unit cubic bezier, as the polynomial
/// `((a·s + b)·s + c)·s` in the curve parameter `s`.
struct BezierAxis {
    a: f64,
    b: f64,
    c: f64,
}

impl BezierAxis {
    fn new(p1: f64, p2: f64) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        Self {
            a: 1.0 - c - b,
            b,
            c,
        }
    }

    fn at(&self, s: f64) -> f64 {
        ((self.a * s + self.b) * s + self.c) * s
    }

    fn derivative(&self, s: f64) -> f64 {
        (3.0 * self.a * s + 2.0 * self.b) * s + self.c
    }

    /// Curve parameter whose coordinate is `target`, for `target` in (0, 1).
    fn solve(&self, target: f64) -> f64 {
        let mut s = target;
        for _ in 0..8 {
            let error = self.at(s) - target;
            if error.abs() < BEZIER_TOLERANCE {
                return s;
            }
            let slope = self.derivative(s);
            if slope.abs() < BEZIER_TOLERANCE {
                break;
            }
            s -= error / slope;
        }

        // Newton stalled: bisect the monotonic x curve
        let (mut low, mut high) = (0.0_f64, 1.0_f64);
        s = target;
        while high - low > BEZIER_TOLERANCE {
            let value = self.at(s);
            if (value - target).abs() < BEZIER_TOLERANCE {
                break;
            }
            if value < target {
                low = s;
            } else {
                high = s;
            }
            s = 0.5 * (low + high);
        }
        s
    }
}
