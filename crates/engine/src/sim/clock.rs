use tracing::info;

/// Fed with the driver's wall-clock time once per frame.
///
/// `average_delta` is the mean frame interval since the simulation started,
/// not the last interval, so movement speed follows the long-run framerate.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    frame_counter: u64,
    time: f64,
    average_delta: f64,
    last_fps_report: f64,
    fps_report_interval: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsReport {
    pub mean_fps: f64,
    pub current_fps: f64,
}

impl FrameClock {
    pub fn new(fps_report_interval: f64) -> Self {
        Self {
            frame_counter: 0,
            time: 0.0,
            average_delta: 0.0,
            last_fps_report: 0.0,
            fps_report_interval,
        }
    }

    /// Returns an FPS report when the report interval has passed since the
    /// previous one.
    pub fn advance(&mut self, current_time: f64) -> Option<FpsReport> {
        let report = if current_time - self.last_fps_report > self.fps_report_interval {
            self.last_fps_report = current_time;
            let report = FpsReport {
                mean_fps: inverse(self.average_delta),
                current_fps: inverse(current_time - self.time),
            };
            info!(
                mean_fps = report.mean_fps,
                current_fps = report.current_fps,
                "fps_report"
            );
            Some(report)
        } else {
            None
        };

        self.frame_counter = self.frame_counter.saturating_add(1);
        self.time = current_time;
        self.average_delta = current_time / self.frame_counter as f64;
        report
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn average_delta(&self) -> f64 {
        self.average_delta
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }
}

fn inverse(delta: f64) -> f64 {
    if delta > 0.0 {
        1.0 / delta
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_delta_is_cumulative_mean() {
        let mut clock = FrameClock::new(10.0);
        clock.advance(0.1);
        clock.advance(0.5);
        assert_eq!(clock.frame_counter(), 2);
        assert_eq!(clock.time(), 0.5);
        assert!((clock.average_delta() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn steady_frames_average_to_frame_interval() {
        let mut clock = FrameClock::new(10.0);
        for frame in 1..=120 {
            clock.advance(frame as f64 / 60.0);
        }
        assert!((clock.average_delta() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn fps_report_fires_once_per_interval() {
        let mut clock = FrameClock::new(1.0);
        let mut reports = Vec::new();
        for frame in 1..=150 {
            if let Some(report) = clock.advance(frame as f64 / 50.0) {
                reports.push(report);
            }
        }
        assert_eq!(reports.len(), 2, "reports at t>1 and t>2");
        assert!((reports[1].mean_fps - 50.0).abs() < 0.5);
        assert!((reports[1].current_fps - 50.0).abs() < 0.5);
    }
}
