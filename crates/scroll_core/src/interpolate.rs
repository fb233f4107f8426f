//! Time-driven value interpolation for cosmetic effects.
//!
//! An `Interpolator` runs once from progress 0 towards 1, then resets itself
//! and stops. Effects such as the bump shake on scenery are built from it.

/// How progress maps to a value.
#[derive(Debug, Clone, Copy)]
pub enum Curve {
    Linear { from: f32, to: f32 },
    Custom(fn(f32) -> f32),
}

impl Curve {
    fn eval(&self, progress: f32) -> f32 {
        match *self {
            Self::Linear { from, to } => from + (to - from) * progress,
            Self::Custom(f) => f(progress),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Interpolator {
    curve: Curve,
    duration: f32,
    progress: f32,
    playing: bool,
    current: f32,
}

impl Interpolator {
    /// `duration` is in seconds.
    pub fn new(curve: Curve, duration: f32) -> Self {
        Self {
            curve,
            duration,
            progress: 0.0,
            playing: false,
            current: curve.eval(0.0),
        }
    }

    pub fn linear(from: f32, to: f32, duration: f32) -> Self {
        Self::new(Curve::Linear { from, to }, duration)
    }

    /// Small upward hop used when the actor bumps scenery from below.
    pub fn shake() -> Self {
        Self::new(Curve::Custom(shake_curve), 0.15)
    }

    /// Starts a run. Does nothing while a run is already in progress.
    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        if self.duration <= 0.0 {
            self.reset();
            return;
        }

        self.progress += dt / self.duration;
        if self.progress >= 1.0 {
            self.reset();
            return;
        }
        self.current = self.curve.eval(self.progress);
    }

    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.playing = false;
        self.current = self.curve.eval(0.0);
    }
}

fn shake_curve(progress: f32) -> f32 {
    if progress < 0.5 {
        5.0 * progress
    } else {
        5.0 - 5.0 * progress
    }
}
