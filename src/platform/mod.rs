//! Platform abstraction layer
//!
//! Frame pacing for both targets:
//! - `FixedStep`: converts variable browser frame times into whole sim steps
//! - `FrameClock`: sleeps a native loop to the target frame rate

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Add `elapsed` seconds and return how many steps to run now.
    /// Time beyond `max_substeps` steps is dropped to avoid a spiral of death.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.clamp(0.0, 0.1);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }
}

/// Sleeps to hold a loop at a fixed rate
#[cfg(not(target_arch = "wasm32"))]
pub struct FrameClock {
    period: std::time::Duration,
    next: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            period: std::time::Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            next: std::time::Instant::now(),
        }
    }

    /// Wait until the next frame is due
    pub fn tick(&mut self) {
        self.next += self.period;
        let now = std::time::Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
        } else {
            // Running behind; don't try to catch up
            self.next = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step_accumulates() {
        let mut stepper = FixedStep::new(0.01, 4);
        assert_eq!(stepper.advance(0.005), 0);
        assert_eq!(stepper.advance(0.006), 1);
        assert_eq!(stepper.advance(0.025), 2);
    }

    #[test]
    fn test_fixed_step_caps_substeps() {
        let mut stepper = FixedStep::new(0.01, 4);
        assert_eq!(stepper.advance(0.1), 4);
        // Backlog was dropped
        assert!(stepper.advance(0.0) <= 1);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_frame_clock_paces() {
        let mut clock = FrameClock::new(200);
        let start = std::time::Instant::now();
        for _ in 0..4 {
            clock.tick();
        }
        assert!(start.elapsed() >= std::time::Duration::from_millis(15));
    }
}
