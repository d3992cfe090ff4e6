/// Fixed timestep accumulator.
/// Turns variable frame times into a whole number of equal simulation steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    /// The fixed delta time per step.
    step: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    /// Most steps a single frame may run.
    max_steps: u32,
}

impl Timer {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
            max_steps: 10,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        // Cap to prevent spiral of death after a long stall
        self.accumulator = self.accumulator.min(self.step * self.max_steps as f32);
        let steps = (self.accumulator / self.step) as u32;
        self.accumulator -= steps as f32 * self.step;
        steps
    }

    /// Accumulate `frame_dt` and run `update` once per due step.
    /// Stops at the first error; the remaining steps of this frame are dropped.
    pub fn advance<E>(
        &mut self,
        frame_dt: f32,
        mut update: impl FnMut(f32) -> Result<(), E>,
    ) -> Result<u32, E> {
        let steps = self.accumulate(frame_dt);
        for _ in 0..steps {
            update(self.step)?;
        }
        Ok(steps)
    }

    /// Interpolation alpha for rendering between steps (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// The fixed delta time.
    pub fn step(&self) -> f32 {
        self.step
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}
