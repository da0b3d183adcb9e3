//! "STAGE N" banner timing.

/// Banner style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementKind {
    /// First stage: black backdrop, held then faded out.
    Intro,
    /// Between stages: fade in, hold, fade out. No backdrop.
    Transition,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Announcement {
    pub kind: AnnouncementKind,
    pub stage: u32,
    pub started_at: f64,
    pub duration: f32,
}

impl Announcement {
    pub fn new(kind: AnnouncementKind, stage: u32, now: f64, duration: f32) -> Self {
        Self {
            kind,
            stage,
            started_at: now,
            duration,
        }
    }

    /// Fraction of the banner elapsed, `[0, 1]`.
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (((now - self.started_at) as f32) / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now - self.started_at >= f64::from(self.duration)
    }

    /// Opacity of the banner text.
    pub fn text_opacity(&self, now: f64) -> f32 {
        let t = self.progress(now);
        match self.kind {
            AnnouncementKind::Intro => {
                if t < 0.5 {
                    1.0
                } else {
                    1.0 - (t - 0.5) / 0.5
                }
            }
            AnnouncementKind::Transition => {
                if t < 0.3 {
                    t / 0.3
                } else if t < 0.7 {
                    1.0
                } else {
                    1.0 - (t - 0.7) / 0.3
                }
            }
        }
        .clamp(0.0, 1.0)
    }

    /// Opacity of the full-screen black backdrop.
    pub fn backdrop_opacity(&self, now: f64) -> f32 {
        match self.kind {
            AnnouncementKind::Intro => self.text_opacity(now),
            AnnouncementKind::Transition => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intro_holds_then_fades() {
        let intro = Announcement::new(AnnouncementKind::Intro, 1, 0.0, 6.0);
        assert_eq!(intro.text_opacity(0.0), 1.0);
        assert_eq!(intro.text_opacity(2.9), 1.0);
        assert!((intro.text_opacity(4.5) - 0.5).abs() < 1e-4);
        assert_eq!(intro.text_opacity(6.0), 0.0);
        assert!((intro.backdrop_opacity(4.5) - 0.5).abs() < 1e-4);
        assert!(!intro.is_finished(5.9));
        assert!(intro.is_finished(6.0));
    }

    #[test]
    fn transition_fades_in_holds_and_out() {
        let banner = Announcement::new(AnnouncementKind::Transition, 4, 10.0, 3.0);
        assert_eq!(banner.text_opacity(10.0), 0.0);
        assert!((banner.text_opacity(10.45) - 0.5).abs() < 1e-3);
        assert_eq!(banner.text_opacity(11.5), 1.0);
        assert!((banner.text_opacity(12.55) - 0.5).abs() < 1e-3);
        assert_eq!(banner.text_opacity(13.0), 0.0);
        assert_eq!(banner.backdrop_opacity(11.5), 0.0);
    }
}
