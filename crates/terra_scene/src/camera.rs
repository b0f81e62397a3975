use glam::Mat4;

/// A camera whose projection is supplied from outside.
///
/// Map hosts hand over a combined view-projection matrix every frame; the
/// overlay folds the model placement into it and stores the result here.
/// There is no view matrix and no frustum of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    projection_matrix: Mat4,
}

impl Camera {
    #[must_use]
    pub fn new() -> Self {
        Self {
            projection_matrix: Mat4::IDENTITY,
        }
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[inline]
    pub fn set_projection_matrix(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
