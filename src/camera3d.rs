use glam::{Mat4, UVec2, Vec2, Vec3, Vec4};

const DEFAULT_UP: Vec3 = Vec3::Y;

/// Perspective viewport camera. This is the editor's own view, not a scene camera object.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new(Vec3::new(6.0, 6.0, 10.0), Vec3::ZERO, 50.0_f32.to_radians(), 0.1, 1000.0)
    }
}

impl Camera3D {
    pub fn new(position: Vec3, target: Vec3, fov_y_radians: f32, near: f32, far: f32) -> Self {
        Self { position, target, up: DEFAULT_UP, fov_y_radians, near, far }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians, aspect.max(0.0001), self.near, self.far)
    }

    pub fn view_projection(&self, viewport: UVec2) -> Mat4 {
        let aspect = if viewport.y > 0 { viewport.x as f32 / viewport.y as f32 } else { 1.0 };
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Projects a world point to viewport pixels. Returns the pixel position and the view-space
    /// distance so callers can order hits front to back.
    pub fn project_point(&self, point: Vec3, viewport: UVec2) -> Option<(Vec2, f32)> {
        if viewport.x == 0 || viewport.y == 0 {
            return None;
        }
        let clip: Vec4 = self.view_projection(viewport) * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            // behind the camera
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let x = (ndc.x + 1.0) * 0.5 * viewport.x as f32;
        let y = (1.0 - ndc.y) * 0.5 * viewport.y as f32;
        Some((Vec2::new(x, y), clip.w))
    }
}
