/// Wave/zoom tuning values read each time a plane activation starts.
///
/// An external control surface may overwrite any field at any time; changes
/// apply to animations started afterwards. The curvature constants are the
/// exception and are pushed straight through to every slot's uniforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveConfig {
    pub altitude: f32,
    pub amplitude: f32,
    pub curve_x: f32,
    pub curve_y: f32,
    pub scale: f32,
    pub wave_speed: f32,
    pub settle_speed: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            altitude: 50.0,
            amplitude: 0.25,
            curve_x: 1.8,
            curve_y: 0.2,
            scale: 0.94,
            wave_speed: 1.8,
            settle_speed: 1.2,
        }
    }
}

/// Page-transition animation lengths in seconds, set by the host page's
/// transition coordinator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransitionDurations {
    pub enter: f32,
    pub exit: f32,
}
