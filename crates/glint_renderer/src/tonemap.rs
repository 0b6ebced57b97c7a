//! HDR to display mapping.

use glint_math::Vec3;

/// Tone mapping operator applied after exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tonemap {
    /// Straight clamp to [0, 1].
    None,
    /// Reinhard `x / (1 + x)`.
    Reinhard,
    /// ACES filmic fit (Narkowicz approximation).
    #[default]
    Aces,
}

/// Display transform parameters, shared by the CPU preview and the
/// image export path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySettings {
    /// Linear exposure multiplier applied before tone mapping.
    pub exposure: f32,
    pub tonemap: Tonemap,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            tonemap: Tonemap::Aces,
        }
    }
}

fn aces(x: Vec3) -> Vec3 {
    let a = 2.51;
    let b = 0.03;
    let c = 2.43;
    let d = 0.59;
    let e = 0.14;
    ((x * (a * x + Vec3::splat(b))) / (x * (c * x + Vec3::splat(d)) + Vec3::splat(e)))
        .clamp(Vec3::ZERO, Vec3::ONE)
}

/// Map a linear HDR pixel to display-referred sRGB in [0, 1].
pub fn tonemap_pixel(color: Vec3, settings: &DisplaySettings) -> Vec3 {
    let exposed = color * settings.exposure;
    let mapped = match settings.tonemap {
        Tonemap::None => exposed.clamp(Vec3::ZERO, Vec3::ONE),
        Tonemap::Reinhard => exposed / (Vec3::ONE + exposed),
        Tonemap::Aces => aces(exposed),
    };
    // Gamma 2.2 encode
    mapped.powf(1.0 / 2.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_stays_in_unit_range() {
        let settings_variants = [
            DisplaySettings {
                exposure: 1.0,
                tonemap: Tonemap::None,
            },
            DisplaySettings {
                exposure: 4.0,
                tonemap: Tonemap::Reinhard,
            },
            DisplaySettings {
                exposure: 16.0,
                tonemap: Tonemap::Aces,
            },
        ];
        for settings in settings_variants {
            for value in [0.0_f32, 0.18, 1.0, 10.0, 1000.0] {
                let out = tonemap_pixel(Vec3::splat(value), &settings);
                assert!(out.min_element() >= 0.0);
                assert!(out.max_element() <= 1.0, "{settings:?} {value} -> {out:?}");
            }
        }
    }

    #[test]
    fn test_black_maps_to_black() {
        for tonemap in [Tonemap::None, Tonemap::Reinhard, Tonemap::Aces] {
            let settings = DisplaySettings {
                exposure: 1.0,
                tonemap,
            };
            assert_eq!(tonemap_pixel(Vec3::ZERO, &settings), Vec3::ZERO);
        }
    }

    #[test]
    fn test_operators_are_monotonic() {
        for tonemap in [Tonemap::None, Tonemap::Reinhard, Tonemap::Aces] {
            let settings = DisplaySettings {
                exposure: 1.0,
                tonemap,
            };
            let mut last = -1.0;
            for i in 0..100 {
                let x = i as f32 * 0.05;
                let y = tonemap_pixel(Vec3::splat(x), &settings).x;
                assert!(y >= last - 1e-6, "{tonemap:?} not monotonic at {x}");
                last = y;
            }
        }
    }

    #[test]
    fn test_exposure_scales_before_mapping() {
        let dim = DisplaySettings {
            exposure: 0.5,
            tonemap: Tonemap::None,
        };
        let out = tonemap_pixel(Vec3::splat(1.0), &dim);
        let expected = 0.5_f32.powf(1.0 / 2.2);
        assert!((out.x - expected).abs() < 1e-5);
    }
}
