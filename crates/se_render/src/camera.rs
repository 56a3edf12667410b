use glam::{Mat4, Vec2, Vec4};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Fixed screen-space camera: origin at the top-left corner, y pointing down,
/// one unit per logical pixel. The physical surface size only affects
/// rasterization, never game coordinates.
pub struct ScreenCamera {
    pub logical_size: Vec2,
}

impl ScreenCamera {
    pub fn new(logical_width: u32, logical_height: u32) -> Self {
        Self {
            logical_size: Vec2::new(logical_width as f32, logical_height as f32),
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        Mat4::orthographic_rh(
            0.0,
            self.logical_size.x,
            self.logical_size.y,
            0.0,
            -1.0,
            1.0,
        )
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
        }
    }

    /// Convert a physical cursor position into logical game coordinates.
    pub fn physical_to_logical(&self, physical: (f64, f64), scale_factor: f64) -> Vec2 {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Vec2::new((physical.0 / scale) as f32, (physical.1 / scale) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(camera: &ScreenCamera, x: f32, y: f32) -> Vec4 {
        camera.view_proj() * Vec4::new(x, y, 0.0, 1.0)
    }

    #[test]
    fn corners_map_to_clip_space() {
        let camera = ScreenCamera::new(800, 450);
        let top_left = project(&camera, 0.0, 0.0);
        assert!((top_left.x + 1.0).abs() < 1e-5);
        assert!((top_left.y - 1.0).abs() < 1e-5);

        let bottom_right = project(&camera, 800.0, 450.0);
        assert!((bottom_right.x - 1.0).abs() < 1e-5);
        assert!((bottom_right.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn physical_cursor_is_scaled_down() {
        let camera = ScreenCamera::new(800, 450);
        let logical = camera.physical_to_logical((800.0, 380.0), 2.0);
        assert_eq!(logical, Vec2::new(400.0, 190.0));
    }

    #[test]
    fn zero_scale_factor_is_treated_as_one() {
        let camera = ScreenCamera::new(800, 450);
        let logical = camera.physical_to_logical((10.0, 20.0), 0.0);
        assert_eq!(logical, Vec2::new(10.0, 20.0));
    }
}
