/// Easing curves for uniform interpolation.
///
/// `PowerIn(n)`/`PowerOut(n)` are polynomial eases of degree `n + 1`
/// (`PowerOut(1)` is the quadratic out-ease, `PowerOut(2)` the cubic one).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    Linear,
    PowerIn(u8),
    PowerOut(u8),
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

/// The hand-tuned settle curve used by hover and mask animations.
pub const SETTLE_BEZIER: Ease = Ease::CubicBezier {
    x1: 0.53,
    y1: 0.24,
    x2: 0.08,
    y2: 0.99,
};

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::PowerIn(p) => t.powi(i32::from(p) + 1),
            Ease::PowerOut(p) => 1.0 - (1.0 - t).powi(i32::from(p) + 1),
            Ease::CubicBezier { x1, y1, x2, y2 } => bezier_axis(solve_bezier(t, x1, x2), y1, y2),
        }
    }
}

// One axis of a cubic bezier through (0,0) (c1,·) (c2,·) (1,1).
#[inline]
fn bezier_axis(t: f32, c1: f32, c2: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * t * c1 + 3.0 * u * t * t * c2 + t * t * t
}

// Invert the x axis by bisection; the curves in use are monotone in x.
fn solve_bezier(x: f32, x1: f32, x2: f32) -> f32 {
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut t = x;
    for _ in 0..24 {
        let cur = bezier_axis(t, x1, x2);
        if (cur - x).abs() < 1e-5 {
            break;
        }
        if cur < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) * 0.5;
    }
    t
}
