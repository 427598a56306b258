//! Waypoint paths
//!
//! A path maps eased progress onto an ordered control sequence
//! `[start, waypoint_0, .., waypoint_n, target]` for one attribute component.

use serde::{Deserialize, Serialize};

/// A stateless path through a sequence of control values.
pub trait PathFunction {
    /// Evaluate the path at progress `t` over `points`.
    fn compute(&self, t: f32, points: &[f32]) -> f32;

    /// Stable display name, used for diagnostics.
    fn name(&self) -> &str;
}

/// Built-in path algorithms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Path {
    /// Straight segments between consecutive points.
    Linear,
    /// Catmull-Rom spline through every point, with clamped end tangents.
    #[default]
    CatmullRom,
}

impl Path {
    pub fn apply(&self, t: f32, points: &[f32]) -> f32 {
        match points {
            [] => 0.0,
            [only] => *only,
            _ => {
                let (segment, local) = locate(t, points.len());
                match self {
                    Path::Linear => {
                        let a = points[segment];
                        let b = points[segment + 1];
                        a + local * (b - a)
                    }
                    Path::CatmullRom => {
                        // Out-of-range neighbours repeat the end points.
                        let at = |i: isize| points[i.clamp(0, points.len() as isize - 1) as usize];
                        let s = segment as isize;
                        catmull_rom_spline(at(s - 1), at(s), at(s + 1), at(s + 2), local)
                    }
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Path::Linear => "Linear",
            Path::CatmullRom => "CatmullRom",
        }
    }
}

impl PathFunction for Path {
    fn compute(&self, t: f32, points: &[f32]) -> f32 {
        self.apply(t, points)
    }

    fn name(&self) -> &str {
        Path::name(self)
    }
}

/// Find the segment containing `t` and the progress within it.
fn locate(t: f32, count: usize) -> (usize, f32) {
    let spans = (count - 1) as f32;
    let segment = ((spans * t).floor().max(0.0) as usize).min(count - 2);
    (segment, t * spans - segment as f32)
}

/// Hermite form of the Catmull-Rom segment between `b` and `c`.
fn catmull_rom_spline(a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
    let t1 = (c - a) * 0.5;
    let t2 = (d - b) * 0.5;
    let t_2 = t * t;
    let t_3 = t_2 * t;
    let h1 = 2.0 * t_3 - 3.0 * t_2 + 1.0;
    let h2 = -2.0 * t_3 + 3.0 * t_2;
    let h3 = t_3 - 2.0 * t_2 + t;
    let h4 = t_3 - t_2;
    b * h1 + c * h2 + t1 * h3 + t2 * h4
}
