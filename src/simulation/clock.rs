/// Simulation time. Only [`SimClock::advance`] moves it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    elapsed: f64,
    ticks: u64,
}

impl SimClock {
    pub fn advance(&mut self, dt: f32) -> f64 {
        self.elapsed += f64::from(dt.max(0.0));
        self.ticks += 1;
        self.elapsed
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
