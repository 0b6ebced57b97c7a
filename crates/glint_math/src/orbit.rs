use glam::Vec3;

/// Orbit camera rig for the interactive viewer.
///
/// Maintains a target point plus spherical yaw/pitch/distance around
/// it. The viewer feeds it mouse deltas; the render camera consumes
/// the resulting eye/target/up pose each frame.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitCamera {
    /// Create a rig looking at `target` from `distance` along +Z.
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance: distance.max(0.01),
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Camera eye position in world space.
    pub fn position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(sy * cp, sp, cy * cp) * self.distance
    }

    /// World up reference (the pitch clamp keeps this valid).
    pub fn up(&self) -> Vec3 {
        Vec3::Y
    }

    /// Orbit by mouse deltas (radians per unit are folded into the
    /// caller's sensitivity).
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        // Keep away from the poles so look_at stays well conditioned
        self.pitch = (self.pitch + delta_pitch).clamp(-1.54, 1.54);
    }

    /// Pan the target in the camera's screen plane.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.target - self.position()).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);
        let scale = self.distance * 0.002;
        self.target += (-right * dx + up * dy) * scale;
    }

    /// Dolly towards/away from the target.
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance * (1.0 - amount * 0.1)).max(0.01);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_default_position() {
        let rig = OrbitCamera::new(Vec3::ZERO, 5.0);
        let pos = rig.position();
        assert!((pos - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_orbit_pitch_clamp() {
        let mut rig = OrbitCamera::new(Vec3::ZERO, 5.0);
        rig.orbit(0.0, 10.0);
        assert!(rig.pitch <= 1.54);
        rig.orbit(0.0, -20.0);
        assert!(rig.pitch >= -1.54);
    }

    #[test]
    fn test_zoom_stays_positive() {
        let mut rig = OrbitCamera::new(Vec3::ZERO, 1.0);
        for _ in 0..100 {
            rig.zoom(1.0);
        }
        assert!(rig.distance > 0.0);
    }

    #[test]
    fn test_orbit_distance_preserved() {
        let mut rig = OrbitCamera::new(Vec3::new(1.0, 2.0, 3.0), 4.0);
        rig.orbit(1.0, 0.5);
        let d = (rig.position() - rig.target).length();
        assert!((d - 4.0).abs() < 1e-4);
    }
}
