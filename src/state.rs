#[cfg(feature = "gui")]
use druid::Data;

/// Identifies one of the two animated squares
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeId {
    Blue,
    Red,
}

impl ShapeId {
    pub const ALL: [ShapeId; 2] = [ShapeId::Blue, ShapeId::Red];

    pub fn profile(self) -> &'static AnimationProfile {
        &PROFILES[self as usize]
    }

    pub fn label(self) -> &'static str {
        match self {
            ShapeId::Blue => "Blue",
            ShapeId::Red => "Red",
        }
    }

    /// Base display color as RGBA
    pub fn rgba(self) -> [u8; 4] {
        match self {
            ShapeId::Blue => [0, 0, 255, 255],
            ShapeId::Red => [255, 0, 0, 255],
        }
    }
}

/// Periodic function driving an oscillator
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Wave {
    Sin,
    Cos,
}

impl Wave {
    pub fn eval(self, radians: f64) -> f64 {
        match self {
            Wave::Sin => radians.sin(),
            Wave::Cos => radians.cos(),
        }
    }
}

/// `amplitude * wave(theta * frequency * speed)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillator {
    pub amplitude: f64,
    pub frequency: f64,
    pub wave: Wave,
}

impl Oscillator {
    pub fn eval(&self, theta: f64, speed: f64) -> f64 {
        self.amplitude * self.wave.eval(theta * self.frequency * speed)
    }
}

/// Per-shape constants governing how its parameters evolve each tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationProfile {
    /// Multiplier on the global rotation speed; negative spins backwards
    pub rotation_factor: f64,
    pub translate_x: Oscillator,
    pub translate_y: Oscillator,
    /// Scale is `scale_base + |scale|`, so it never drops below `scale_base`
    pub scale_base: f64,
    pub scale: Oscillator,
    /// Parameters the shape starts with: angle, tx, ty, scale
    pub initial: [f64; 4],
}

pub const PROFILES: [AnimationProfile; 2] = [
    AnimationProfile {
        rotation_factor: 1.0,
        translate_x: Oscillator {
            amplitude: 100.0,
            frequency: 0.5,
            wave: Wave::Sin,
        },
        translate_y: Oscillator {
            amplitude: 100.0,
            frequency: 0.7,
            wave: Wave::Cos,
        },
        scale_base: 0.5,
        scale: Oscillator {
            amplitude: 0.5,
            frequency: 0.25,
            wave: Wave::Sin,
        },
        initial: [0.0, 50.0, 50.0, 1.0],
    },
    AnimationProfile {
        rotation_factor: -0.8,
        translate_x: Oscillator {
            amplitude: 150.0,
            frequency: 0.6,
            wave: Wave::Cos,
        },
        translate_y: Oscillator {
            amplitude: 150.0,
            frequency: 0.4,
            wave: Wave::Sin,
        },
        scale_base: 1.0,
        scale: Oscillator {
            amplitude: 0.7,
            frequency: 0.3,
            wave: Wave::Cos,
        },
        initial: [45.0, 150.0, 150.0, 1.5],
    },
];

/// Global speed factors shared by both shapes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpeeds {
    /// Degrees added to the angle per tick (before the profile factor)
    pub rotation: f64,
    pub translation: f64,
    pub scale: f64,
}

impl Default for AnimationSpeeds {
    fn default() -> Self {
        AnimationSpeeds {
            rotation: 6.0,
            translation: 4.0,
            scale: 2.0,
        }
    }
}

/// Animation parameters of one square
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatedShape {
    pub id: ShapeId,
    /// Degrees, always in `[0, 360)`
    pub angle: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl AnimatedShape {
    pub fn new(id: ShapeId) -> Self {
        let [angle, translate_x, translate_y, scale] = id.profile().initial;
        AnimatedShape {
            id,
            angle,
            translate_x,
            translate_y,
            scale,
        }
    }

    /// Advances this shape by one tick according to its profile
    pub fn advance(&mut self, speeds: &AnimationSpeeds) {
        let profile = self.id.profile();
        self.angle = (self.angle + speeds.rotation * profile.rotation_factor).rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if self.angle >= 360.0 {
            self.angle = 0.0;
        }

        let theta = self.angle.to_radians();
        self.translate_x = profile.translate_x.eval(theta, speeds.translation);
        self.translate_y = profile.translate_y.eval(theta, speeds.translation);
        self.scale = profile.scale_base + profile.scale.eval(theta, speeds.scale).abs();
    }
}

/// Application state
#[derive(Clone, Debug)]
#[cfg_attr(feature = "gui", derive(Data))]
pub struct AppState {
    /// Both squares, indexed by `ShapeId as usize`
    #[cfg_attr(feature = "gui", data(same_fn = "PartialEq::eq"))]
    pub shapes: [AnimatedShape; 2],
    #[cfg_attr(feature = "gui", data(same_fn = "PartialEq::eq"))]
    pub speeds: AnimationSpeeds,
    /// Ticks applied since start or the last reset
    pub ticks: u64,
    /// Enable debug mode
    pub debug: bool,
    /// Simulation paused
    pub paused: bool,
}

impl AppState {
    pub fn new(speeds: AnimationSpeeds) -> Self {
        AppState {
            shapes: ShapeId::ALL.map(AnimatedShape::new),
            speeds,
            ticks: 0,
            debug: false,
            paused: false,
        }
    }

    pub fn shape(&self, id: ShapeId) -> &AnimatedShape {
        &self.shapes[id as usize]
    }

    /// Advances every shape by one step. Does nothing while paused.
    ///
    /// Returns whether the animation moved.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }
        for shape in self.shapes.iter_mut() {
            shape.advance(&self.speeds);
        }
        self.ticks += 1;
        log::trace!("tick {}: {:?}", self.ticks, self.shapes);
        true
    }

    /// Puts both squares back to their starting parameters
    pub fn reset(&mut self) {
        self.shapes = ShapeId::ALL.map(AnimatedShape::new);
        self.ticks = 0;
        log::debug!("animation reset");
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::debug!("paused: {}", self.paused);
    }

    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
        log::debug!("debug overlay: {}", self.debug);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn initial_parameters() {
        let state = AppState::new(AnimationSpeeds::default());
        let blue = state.shape(ShapeId::Blue);
        assert_eq!(
            (blue.angle, blue.translate_x, blue.translate_y, blue.scale),
            (0.0, 50.0, 50.0, 1.0)
        );
        let red = state.shape(ShapeId::Red);
        assert_eq!(
            (red.angle, red.translate_x, red.translate_y, red.scale),
            (45.0, 150.0, 150.0, 1.5)
        );
    }

    #[test]
    fn single_tick_matches_closed_form() {
        let mut state = AppState::new(AnimationSpeeds::default());
        state.tick();

        let blue = state.shape(ShapeId::Blue);
        let theta = 6.0_f64.to_radians();
        assert!((blue.angle - 6.0).abs() < EPSILON);
        assert!((blue.translate_x - 100.0 * (theta * 0.5 * 4.0).sin()).abs() < EPSILON);
        assert!((blue.translate_y - 100.0 * (theta * 0.7 * 4.0).cos()).abs() < EPSILON);
        assert!((blue.scale - (0.5 + 0.5 * (theta * 0.25 * 2.0).sin().abs())).abs() < EPSILON);

        let red = state.shape(ShapeId::Red);
        let theta = 40.2_f64.to_radians();
        assert!((red.angle - 40.2).abs() < EPSILON);
        assert!((red.translate_x - 150.0 * (theta * 0.6 * 4.0).cos()).abs() < EPSILON);
        assert!((red.translate_y - 150.0 * (theta * 0.4 * 4.0).sin()).abs() < EPSILON);
        assert!((red.scale - (1.0 + 0.7 * (theta * 0.3 * 2.0).cos().abs())).abs() < EPSILON);
        assert_eq!(state.ticks, 1);
    }

    #[test]
    fn angles_and_scales_stay_in_range() {
        let mut state = AppState::new(AnimationSpeeds::default());
        for _ in 0..5000 {
            state.tick();
            let blue = state.shape(ShapeId::Blue);
            let red = state.shape(ShapeId::Red);
            assert!((0.0..360.0).contains(&blue.angle), "blue angle {}", blue.angle);
            assert!((0.0..360.0).contains(&red.angle), "red angle {}", red.angle);
            assert!(blue.scale >= 0.5 && blue.scale <= 1.0, "blue scale {}", blue.scale);
            assert!(red.scale >= 1.0 && red.scale <= 1.7, "red scale {}", red.scale);
        }
    }

    #[test]
    fn red_square_wraps_below_zero() {
        let mut state = AppState::new(AnimationSpeeds::default());
        // 45 degrees at -4.8 per tick crosses zero on the tenth tick
        for _ in 0..10 {
            state.tick();
        }
        let red = state.shape(ShapeId::Red);
        assert!((red.angle - 357.0).abs() < 1e-6, "red angle {}", red.angle);
    }

    #[test]
    fn odd_speeds_keep_angle_in_range() {
        let speeds = AnimationSpeeds {
            rotation: 1234.567,
            translation: 0.3,
            scale: 9.0,
        };
        let mut state = AppState::new(speeds);
        for _ in 0..1000 {
            state.tick();
            for shape in state.shapes.iter() {
                assert!((0.0..360.0).contains(&shape.angle));
                assert!(shape.scale > 0.0);
            }
        }
    }

    #[test]
    fn paused_tick_is_a_no_op() {
        let mut state = AppState::new(AnimationSpeeds::default());
        state.toggle_pause();
        let before = state.shapes;
        assert!(!state.tick());
        assert_eq!(state.shapes, before);
        assert_eq!(state.ticks, 0);

        state.toggle_pause();
        assert!(state.tick());
        assert_ne!(state.shapes, before);
    }

    #[test]
    fn reset_restores_initial_shapes() {
        let mut state = AppState::new(AnimationSpeeds::default());
        for _ in 0..17 {
            state.tick();
        }
        state.reset();
        assert_eq!(state.shapes, AppState::new(AnimationSpeeds::default()).shapes);
        assert_eq!(state.ticks, 0);
    }

    #[test]
    fn shapes_evolve_independently() {
        let mut blue = AnimatedShape::new(ShapeId::Blue);
        let red = AnimatedShape::new(ShapeId::Red);
        blue.advance(&AnimationSpeeds::default());
        assert_eq!(red, AnimatedShape::new(ShapeId::Red));
    }
}
