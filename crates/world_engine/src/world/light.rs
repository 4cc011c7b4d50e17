//! Light sources owned by the world
//!
//! Lights have no polygon mesh; picking treats each one as a small
//! synthetic box centered on its position, so the data here is the subset
//! the spatial core reads.

use crate::foundation::math::Vec3;

/// Families of positional light the world stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Radiates in all directions from a position
    Point,
    /// Cone of light from a position along a direction
    Spot,
}

/// A positional light source
#[derive(Debug, Clone)]
pub struct Light {
    /// Which family of light this is
    pub kind: LightKind,
    /// Position in world space
    pub position: Vec3,
    /// RGB color in the 0..1 range
    pub color: Vec3,
    /// Intensity multiplier
    pub intensity: f32,
    /// Maximum range of the light's influence
    pub range: f32,
    /// Cone direction in world space (spot lights)
    pub direction: Vec3,
    /// Outer cone angle in radians (spot lights)
    pub cone_angle: f32,
    /// Whether the light participates in queries
    pub enabled: bool,
}

impl Light {
    /// Create a point light
    pub fn point(position: Vec3, color: Vec3, intensity: f32, range: f32) -> Self {
        Self {
            kind: LightKind::Point,
            position,
            color,
            intensity,
            range,
            direction: Vec3::new(0.0, -1.0, 0.0), // Irrelevant for point lights
            cone_angle: 0.0,
            enabled: true,
        }
    }

    /// Create a spot light
    pub fn spot(
        position: Vec3,
        direction: Vec3,
        cone_angle: f32,
        color: Vec3,
        intensity: f32,
        range: f32,
    ) -> Self {
        Self {
            kind: LightKind::Spot,
            position,
            color,
            intensity,
            range,
            direction: direction.normalize(),
            cone_angle,
            enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_direction_normalized() {
        let light = Light::spot(
            Vec3::zeros(),
            Vec3::new(0.0, -2.0, 0.0),
            0.5,
            Vec3::new(1.0, 1.0, 1.0),
            1.0,
            10.0,
        );
        assert!((light.direction.norm() - 1.0).abs() < 1e-6);
        assert_eq!(light.kind, LightKind::Spot);
    }
}
