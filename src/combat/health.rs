//! Player hit points.

/// Health pool clamped to `[0, maximum]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    /// Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.current);
        self.current -= actual;
        actual
    }

    /// Returns the amount actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.maximum - self.current);
        self.current += actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.maximum
    }

    pub fn percentage(&self) -> f32 {
        if self.maximum <= 0.0 {
            return 0.0;
        }
        self.current / self.maximum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_clamps_at_zero() {
        let mut health = Health::new(100.0);
        assert_eq!(health.take_damage(30.0), 30.0);
        assert_eq!(health.take_damage(500.0), 70.0);
        assert!(health.is_dead());
        assert_eq!(health.current, 0.0);
    }

    #[test]
    fn heal_clamps_at_maximum() {
        let mut health = Health::new(100.0);
        health.take_damage(10.0);
        assert_eq!(health.heal(30.0), 10.0);
        assert!(health.is_full());
        assert_eq!(health.percentage(), 1.0);
    }
}
