use glam::Vec3;
use terra_core::LightingProfile;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform fill from every direction.
    Ambient,
    /// Parallel rays coming *from* `direction` (unit length).
    Directional { direction: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Ambient,
        }
    }

    /// A directional light positioned at `position`, pointing at the origin.
    #[must_use]
    pub fn directional(color: Vec3, intensity: f32, position: Vec3) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Directional {
                direction: position.normalize_or(Vec3::Y),
            },
        }
    }
}

/// Lights installed in every model scene for a given profile.
#[must_use]
pub fn lighting_rig(profile: LightingProfile) -> Vec<Light> {
    let key_position = Vec3::new(0.0, -70.0, 100.0);

    match profile {
        LightingProfile::Standard => vec![Light::directional(Vec3::ONE, 1.0, key_position)],
        LightingProfile::Enhanced => vec![
            Light::ambient(Vec3::ONE, 0.8),
            Light::directional(Vec3::ONE, 1.5, key_position),
            Light::directional(Vec3::ONE, 0.8, Vec3::new(50.0, 50.0, 50.0)),
        ],
    }
}
