//! Frame delta bookkeeping.
//!
//! The presentation side measures wall-clock time and hands the core an opaque
//! elapsed-seconds value per frame. `FrameClock` turns that into the delta the
//! tick integrates with: non-finite or negative values become 0, and values
//! above `max_dt` are capped so a long stall cannot launch the actor through
//! the level in one step.

const FPS_SAMPLE_COUNT: usize = 60;

#[derive(Debug, Clone)]
pub struct FrameClock {
    pub max_dt: Option<f32>,
    pub dt: f32,
    pub total_time: f64,
    pub frame_count: u64,

    fps_samples: [f32; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f32,
}

impl FrameClock {
    pub fn new(max_dt: Option<f32>) -> Self {
        Self {
            max_dt,
            dt: 0.0,
            total_time: 0.0,
            frame_count: 0,
            fps_samples: [0.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 0.0,
        }
    }

    /// Zeroes the delta so the first tick after (re)starting is a no-op step.
    pub fn reset(&mut self) {
        self.dt = 0.0;
    }

    pub fn begin_frame(&mut self, elapsed: f32) -> f32 {
        let mut dt = elapsed;
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Ignoring invalid frame delta {elapsed}; treating as 0");
            dt = 0.0;
        }
        if let Some(max_dt) = self.max_dt {
            if dt > max_dt {
                log::warn!(
                    "Frame took {:.1}ms; capping delta to {:.1}ms",
                    dt * 1000.0,
                    max_dt * 1000.0
                );
                dt = max_dt;
            }
        }

        self.dt = dt;
        self.total_time += f64::from(dt);
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let sampled = self.frame_count.min(FPS_SAMPLE_COUNT as u64) as usize;
        let avg_dt = self.fps_samples.iter().sum::<f32>() / sampled as f32;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(None)
    }
}
