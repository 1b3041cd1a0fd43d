use crate::coords::Vec2;

use super::{Path, PathEl, PathError};

/// Upper bound on segments emitted for a single curve.
const MAX_SEGMENTS: u32 = 256;

/// Closed polyline produced by flattening.
///
/// The closing edge from the last point back to the first is implicit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    pub points: Vec<Vec2>,
}

/// Converts a path to closed polylines whose distance from the true curve
/// stays within `tolerance`.
///
/// Open subpaths are closed implicitly (fills ignore openness). Contours with
/// fewer than three distinct points enclose no area and are dropped.
pub fn flatten(path: &Path, tolerance: f32) -> Result<Vec<Contour>, PathError> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(PathError::BadTolerance(tolerance));
    }

    let mut out = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();
    let mut start = Vec2::zero();
    let mut last = Vec2::zero();

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                finish(&mut out, &mut current);
                current.push(p);
                start = p;
                last = p;
            }
            PathEl::LineTo(p) => {
                begin_if_needed(&mut current, last);
                push_point(&mut current, p);
                last = p;
            }
            PathEl::QuadTo(c, p) => {
                begin_if_needed(&mut current, last);
                let n = quad_segments(last, c, p, tolerance);
                for i in 1..=n {
                    let t = i as f32 / n as f32;
                    push_point(&mut current, eval_quad(last, c, p, t));
                }
                last = p;
            }
            PathEl::CubicTo(c0, c1, p) => {
                begin_if_needed(&mut current, last);
                let n = cubic_segments(last, c0, c1, p, tolerance);
                for i in 1..=n {
                    let t = i as f32 / n as f32;
                    push_point(&mut current, eval_cubic(last, c0, c1, p, t));
                }
                last = p;
            }
            PathEl::Close => {
                finish(&mut out, &mut current);
                last = start;
            }
        }
    }
    finish(&mut out, &mut current);

    Ok(out)
}

/// Segment count for a quadratic so chord error stays below `tol`.
///
/// Chord error over a parameter step `h` is bounded by `|B''| h^2 / 8` with
/// `|B''| = 2 |p0 - 2 p1 + p2|`.
pub(crate) fn quad_segments(p0: Vec2, p1: Vec2, p2: Vec2, tol: f32) -> u32 {
    let dd = (p0 - p1 * 2.0 + p2).length();
    segments_for(0.25 * dd, tol)
}

/// Segment count for a cubic; `|B''| <= 6 max(|second differences|)`.
pub(crate) fn cubic_segments(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, tol: f32) -> u32 {
    let d0 = (p0 - p1 * 2.0 + p2).length();
    let d1 = (p1 - p2 * 2.0 + p3).length();
    segments_for(0.75 * d0.max(d1), tol)
}

fn segments_for(bound: f32, tol: f32) -> u32 {
    let n = (bound / tol).sqrt().ceil();
    if n.is_finite() {
        (n as u32).clamp(1, MAX_SEGMENTS)
    } else {
        MAX_SEGMENTS
    }
}

fn eval_quad(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let mt = 1.0 - t;
    p0 * (mt * mt) + p1 * (2.0 * mt * t) + p2 * (t * t)
}

fn eval_cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + p1 * (3.0 * mt * mt * t) + p2 * (3.0 * mt * t * t) + p3 * (t * t * t)
}

fn begin_if_needed(current: &mut Vec<Vec2>, last: Vec2) {
    if current.is_empty() {
        current.push(last);
    }
}

fn push_point(current: &mut Vec<Vec2>, p: Vec2) {
    if current.last() != Some(&p) {
        current.push(p);
    }
}

fn finish(out: &mut Vec<Contour>, current: &mut Vec<Vec2>) {
    if current.len() > 1 && current.first() == current.last() {
        current.pop();
    }
    if current.len() >= 3 {
        out.push(Contour {
            points: std::mem::take(current),
        });
    } else {
        current.clear();
    }
}
