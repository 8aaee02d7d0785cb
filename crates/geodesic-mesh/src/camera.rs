//! Camera pose and projection used by the cull pass.

use glam::{Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A camera that maps world points to normalized viewport coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World-space position.
    pub position: Vec3,
    /// Rotation as a unit quaternion. Identity looks down -Z with +Y up.
    pub rotation: Quat,
    /// Projection parameters.
    pub projection: Projection,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

/// Projection type for the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f32,
        /// Width / height.
        aspect_ratio: f32,
    },
    /// Orthographic projection.
    Orthographic {
        /// Half-width of the view volume in world units.
        half_width: f32,
        /// Half-height of the view volume in world units.
        half_height: f32,
    },
}

/// A point expressed in normalized viewport space.
///
/// `x` and `y` are 0 at the left/bottom edge and 1 at the right/top edge.
/// `depth` is the distance in front of the camera along its forward axis;
/// points behind the camera have negative depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
    /// Signed distance along the view direction.
    pub depth: f32,
}

impl Camera {
    /// Camera at `eye` looking at `target`.
    ///
    /// If `up` is parallel to the view direction, world X is used as the
    /// right axis instead.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3, projection: Projection) -> Self {
        let forward = (target - eye).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(up).try_normalize().unwrap_or(Vec3::X);
        let true_up = right.cross(forward);
        let rotation = Quat::from_mat3(&Mat3::from_cols(right, true_up, -forward)).normalize();
        Self {
            position: eye,
            rotation,
            projection,
            ..Self::default()
        }
    }

    /// Compute the view matrix (inverse of camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Compute the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective {
                fov_y,
                aspect_ratio,
            } => Mat4::perspective_rh(fov_y, aspect_ratio, self.near, self.far),
            Projection::Orthographic {
                half_width,
                half_height,
            } => Mat4::orthographic_rh(
                -half_width,
                half_width,
                -half_height,
                half_height,
                self.near,
                self.far,
            ),
        }
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Width / height of the view volume.
    pub fn aspect_ratio(&self) -> f32 {
        match self.projection {
            Projection::Perspective { aspect_ratio, .. } => aspect_ratio,
            Projection::Orthographic {
                half_width,
                half_height,
            } => half_width / half_height,
        }
    }

    /// Update the aspect ratio for perspective projection.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if let Projection::Perspective { aspect_ratio, .. } = &mut self.projection {
            *aspect_ratio = width / height;
        }
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// The up direction vector (+Y in camera space).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// The right direction vector (+X in camera space).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Project a world point into normalized viewport space.
    pub fn world_to_viewport(&self, point: Vec3) -> ViewportPoint {
        project(&self.view_matrix(), &self.projection_matrix(), point)
    }
}

/// Project `point` with precomputed view and projection matrices.
///
/// Points on the camera plane have no defined screen position and come back
/// with NaN coordinates, which fail every bounds test.
pub(crate) fn project(view: &Mat4, projection: &Mat4, point: Vec3) -> ViewportPoint {
    let view_pos = view.transform_point3(point);
    let clip = *projection * view_pos.extend(1.0);
    let (ndc_x, ndc_y) = if clip.w.abs() > f32::EPSILON {
        (clip.x / clip.w, clip.y / clip.w)
    } else {
        (f32::NAN, f32::NAN)
    };
    ViewportPoint {
        x: ndc_x * 0.5 + 0.5,
        y: ndc_y * 0.5 + 0.5,
        depth: -view_pos.z,
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            projection: Projection::Perspective {
                fov_y: std::f32::consts::FRAC_PI_3, // 60 degrees
                aspect_ratio: 16.0 / 9.0,
            },
            near: 0.01,
            far: 1000.0,
        }
    }
}
