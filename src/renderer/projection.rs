//! Perspective projection and near-plane clipping.

use crate::constants::{VIEW_SIZE, VIEW_X0, VIEW_X1, VIEW_Y0, VIEW_Y1};
use crate::math::deg_to_rad;
use crate::math::vec::Vec3;

/// Narrowest vertical field of view the projection accepts, in degrees.
pub const MIN_FOV_DEGREES: f32 = 1.0;
/// Widest vertical field of view the projection accepts, in degrees.
pub const MAX_FOV_DEGREES: f32 = 179.0;
/// Screen offsets are clamped to this many pixels before conversion.
const PIXEL_LIMIT: f32 = 1.0e6;

/// Rounds a screen offset to whole pixels, saturating far outside any screen.
///
/// NaN becomes 0.
pub fn to_pixel(offset: f32) -> i32 {
    offset.round().clamp(-PIXEL_LIMIT, PIXEL_LIMIT) as i32
}

/// The on-screen rectangle the 3D view is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Left frame column.
    pub x0: i32,
    /// Top frame row.
    pub y0: i32,
    /// Right frame column.
    pub x1: i32,
    /// Bottom frame row.
    pub y1: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x0: VIEW_X0,
            y0: VIEW_Y0,
            x1: VIEW_X1,
            y1: VIEW_Y1,
        }
    }
}

impl Viewport {
    /// Square viewport of `side` pixels with its frame starting at `(x0, y0)`.
    pub fn square(x0: i32, y0: i32, side: i32) -> Self {
        Self {
            x0,
            y0,
            x1: x0 + side - 1,
            y1: y0 + side - 1,
        }
    }

    pub fn center_x(&self) -> i32 {
        (self.x0 + self.x1) / 2
    }

    pub fn center_y(&self) -> i32 {
        (self.y0 + self.y1) / 2
    }

    /// Drawable height inside the frame.
    pub fn inner_height(&self) -> i32 {
        self.y1 - self.y0 - 1
    }

    /// Drawable width inside the frame.
    pub fn inner_width(&self) -> i32 {
        self.x1 - self.x0 - 1
    }

    /// Whether a pixel lies strictly inside the frame.
    pub fn contains_inner(&self, x: i32, y: i32) -> bool {
        x > self.x0 && x < self.x1 && y > self.y0 && y < self.y1
    }
}

/// Pinhole projection onto a [`Viewport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Focal length in pixels.
    pub focal: f32,
    /// Screen column of the optical axis.
    pub center_x: i32,
    /// Screen row of the optical axis.
    pub center_y: i32,
    /// Clip plane depth.
    pub near: f32,
}

impl Projection {
    /// Builds the projection from a vertical field of view in degrees.
    ///
    /// The focal length is fixed once here: half the drawable height over
    /// `tan(fov / 2)`. The angle is first clamped into
    /// [`MIN_FOV_DEGREES`]`..=`[`MAX_FOV_DEGREES`] (NaN lands on the narrow
    /// end), so the focal length is always finite and positive.
    pub fn new(viewport: &Viewport, fov_degrees: f32, near: f32) -> Self {
        let half_height = viewport.inner_height() as f32 * 0.5;
        let fov = fov_degrees.max(MIN_FOV_DEGREES).min(MAX_FOV_DEGREES);
        Self {
            focal: half_height / (deg_to_rad(fov) * 0.5).tan(),
            center_x: viewport.center_x(),
            center_y: viewport.center_y(),
            near,
        }
    }

    /// Screen position of a view-space point, `None` at or behind the eye.
    pub fn project(&self, view: Vec3) -> Option<(i32, i32)> {
        let (dx, dy) = self.offset(view)?;
        Some((self.center_x + to_pixel(dx), self.center_y + to_pixel(dy)))
    }

    /// Sub-pixel offset from the optical axis, with y growing downwards.
    /// `None` at or behind the eye.
    pub fn offset(&self, view: Vec3) -> Option<(f32, f32)> {
        if view.z() <= 0.0 {
            return None;
        }
        let scale = self.focal / view.z();
        Some((view.x() * scale, -view.y() * scale))
    }

    /// Sub-pixel screen column of a view-space point in front of the eye.
    pub fn screen_x(&self, view: Vec3) -> f32 {
        self.center_x as f32 + view.x() * self.focal / view.z()
    }

    /// Clips a segment against `z = near`; `None` when fully behind it.
    pub fn clip_segment(&self, a: Vec3, b: Vec3) -> Option<(Vec3, Vec3)> {
        clip_segment_near(a, b, self.near)
    }

    /// Clips a convex polygon against `z = near`.
    pub fn clip_polygon(&self, polygon: &[Vec3]) -> Vec<Vec3> {
        clip_polygon_near(polygon, self.near)
    }
}

/// Liang–Barsky clip of the 2D segment `a -> b` against the rectangle
/// spanned by `min` and `max`.
///
/// Returns the parameter range `t0..=t1` of the part inside, or `None` when
/// the segment misses the rectangle or has a non-finite endpoint.
pub fn clip_segment_rect(
    a: (f32, f32),
    b: (f32, f32),
    min: (f32, f32),
    max: (f32, f32),
) -> Option<(f32, f32)> {
    if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    for (p, q) in [
        (-dx, a.0 - min.0),
        (dx, max.0 - a.0),
        (-dy, a.1 - min.1),
        (dy, max.1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
    }
    (t0 <= t1).then_some((t0, t1))
}

/// Moves any endpoint at or behind `near` onto the plane.
pub fn clip_segment_near(a: Vec3, b: Vec3, near: f32) -> Option<(Vec3, Vec3)> {
    let a_in = a.z() > near;
    let b_in = b.z() > near;
    match (a_in, b_in) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        _ => {
            let t = (near - a.z()) / (b.z() - a.z());
            let cut = a.lerp(&b, t);
            let cut = Vec3::new(cut.x(), cut.y(), near);
            if a_in { Some((a, cut)) } else { Some((cut, b)) }
        }
    }
}

/// Clips a segment against `z = far`, keeping the near part.
pub fn clip_segment_far(a: Vec3, b: Vec3, far: f32) -> Option<(Vec3, Vec3)> {
    let a_in = a.z() <= far;
    let b_in = b.z() <= far;
    match (a_in, b_in) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        _ => {
            let t = (far - a.z()) / (b.z() - a.z());
            let cut = a.lerp(&b, t);
            let cut = Vec3::new(cut.x(), cut.y(), far);
            if a_in { Some((a, cut)) } else { Some((cut, b)) }
        }
    }
}

/// Single-plane Sutherland–Hodgman clip of a convex polygon against
/// `z = near`. Each crossing edge adds one vertex on the plane.
pub fn clip_polygon_near(polygon: &[Vec3], near: f32) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(polygon.len() + 2);
    if polygon.is_empty() {
        return out;
    }
    for (i, &current) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        let current_in = current.z() > near;
        let next_in = next.z() > near;
        if current_in {
            out.push(current);
        }
        if current_in != next_in {
            let t = (near - current.z()) / (next.z() - current.z());
            let cut = current.lerp(&next, t);
            out.push(Vec3::new(cut.x(), cut.y(), near));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport_layout() {
        let viewport = Viewport::default();
        assert_eq!(viewport, Viewport::square(8, 2, VIEW_SIZE));
        assert_eq!(viewport.inner_height(), 94);
        assert!(viewport.contains_inner(9, 3));
        assert!(!viewport.contains_inner(viewport.x1, 50));
    }

    #[test]
    fn test_focal_length_from_fov() {
        let projection = Projection::new(&Viewport::default(), 90.0, 0.12);
        assert!((projection.focal - 47.0).abs() < 1e-3);
    }

    #[test]
    fn test_project_centre_and_offsets() {
        let viewport = Viewport::default();
        let projection = Projection::new(&viewport, 90.0, 0.12);
        let (cx, cy) = (viewport.center_x(), viewport.center_y());
        assert_eq!(projection.project(Vec3::new(0.0, 0.0, 3.0)), Some((cx, cy)));
        assert_eq!(projection.project(Vec3::new(1.0, 1.0, 47.0)), Some((cx + 1, cy - 1)));
        assert_eq!(projection.project(Vec3::new(0.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_fov_is_clamped_to_a_finite_focal_length() {
        let viewport = Viewport::default();
        let narrowest = Projection::new(&viewport, MIN_FOV_DEGREES, 0.12).focal;
        for fov in [0.0, -30.0, f32::NAN] {
            let focal = Projection::new(&viewport, fov, 0.12).focal;
            assert!(focal.is_finite() && focal > 0.0, "{fov}");
            assert_eq!(focal, narrowest);
        }
        let widest = Projection::new(&viewport, 180.0, 0.12).focal;
        assert!(widest.is_finite() && widest > 0.0);
    }

    #[test]
    fn test_huge_offsets_saturate() {
        assert_eq!(to_pixel(f32::INFINITY), 1_000_000);
        assert_eq!(to_pixel(f32::NEG_INFINITY), -1_000_000);
        assert_eq!(to_pixel(f32::NAN), 0);
        assert_eq!(to_pixel(-2.5), -3);

        let viewport = Viewport::default();
        let projection = Projection {
            focal: f32::MAX,
            ..Projection::new(&viewport, 60.0, 0.12)
        };
        let (x, y) = projection.project(Vec3::new(1.0e3, -1.0e3, 0.5)).unwrap();
        assert_eq!(x, viewport.center_x() + 1_000_000);
        assert_eq!(y, viewport.center_y() + 1_000_000);
    }

    #[test]
    fn test_rect_clip_trims_both_ends() {
        let (t0, t1) =
            clip_segment_rect((-10.0, 0.0), (10.0, 0.0), (-5.0, -1.0), (5.0, 1.0)).unwrap();
        assert!((t0 - 0.25).abs() < 1e-6);
        assert!((t1 - 0.75).abs() < 1e-6);

        let inside = clip_segment_rect((-1.0, 0.0), (1.0, 0.5), (-5.0, -1.0), (5.0, 1.0));
        assert_eq!(inside, Some((0.0, 1.0)));
        assert!(clip_segment_rect((-10.0, 2.0), (10.0, 2.0), (-5.0, -1.0), (5.0, 1.0)).is_none());
        assert!(clip_segment_rect((f32::INFINITY, 0.0), (0.0, 0.0), (-5.0, -1.0), (5.0, 1.0)).is_none());
    }

    #[test]
    fn test_segment_clip_lands_on_near_plane() {
        let a = Vec3::new(0.0, 0.0, -1.0);
        let b = Vec3::new(2.0, 0.0, 1.0);
        let (ca, cb) = clip_segment_near(a, b, 0.5).unwrap();
        assert_eq!(ca.z(), 0.5);
        assert!((ca.x() - 1.5).abs() < 1e-6);
        assert_eq!(cb, b);
        assert!(clip_segment_near(a, Vec3::new(0.0, 0.0, 0.1), 0.5).is_none());
    }

    #[test]
    fn test_far_clip_keeps_near_part() {
        let a = Vec3::new(0.0, 0.0, 2.0);
        let b = Vec3::new(0.0, 0.0, 12.0);
        let (ca, cb) = clip_segment_far(a, b, 8.0).unwrap();
        assert_eq!(ca, a);
        assert_eq!(cb.z(), 8.0);
    }

    #[test]
    fn test_polygon_clip_adds_one_vertex_per_crossing() {
        // a quad with one corner behind the plane becomes a pentagon
        let quad = [
            Vec3::new(-1.0, 0.0, -0.5),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 2.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ];
        let clipped = clip_polygon_near(&quad, 0.1);
        assert_eq!(clipped.len(), 5);
        assert!(clipped.iter().all(|v| v.z() >= 0.1 - 1e-6));

        let behind: Vec<Vec3> = quad.iter().map(|v| Vec3::new(v.x(), v.y(), -5.0)).collect();
        assert!(clip_polygon_near(&behind, 0.1).is_empty());
    }
}
