//! Animation frames as pure functions of elapsed time.

/// Ping-pong frame index in `0..=period`: `|floor(t·scale + period) mod
/// 2·period − period|`.
pub fn triangular_wave(time: f64, period: u32, scale: f64) -> u32 {
    if period == 0 {
        return 0;
    }
    let period = i64::from(period);
    let raw = (time * scale + period as f64).floor() as i64;
    (raw.rem_euclid(2 * period) - period).unsigned_abs() as u32
}

/// Frame of the shield lightning effect. Only two of every six phases show a
/// bolt (frames 1..=4); the rest return 0, the empty frame.
pub fn lightning_index(time: f64, scale: f64) -> u32 {
    let phase = ((scale * 6.0 * time).floor() as i64).rem_euclid(6);
    if phase == 0 || phase == 2 {
        ((scale * time).floor() as i64).rem_euclid(4) as u32 + 1
    } else {
        0
    }
}

/// Frame of a looping strip advancing `frames_per_second` frames each second.
pub fn looping_index(time: f64, frames_per_second: f64, frame_count: u32) -> u32 {
    if frame_count == 0 {
        return 0;
    }
    ((time * frames_per_second).floor() as i64).rem_euclid(i64::from(frame_count)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangular_wave_ping_pongs_within_period() {
        let frames = (0..8)
            .map(|step| triangular_wave(step as f64, 2, 1.0))
            .collect::<Vec<_>>();
        assert_eq!(frames, vec![0, 1, 2, 1, 0, 1, 2, 1]);
    }

    #[test]
    fn triangular_wave_stays_in_range() {
        for step in 0..500 {
            let frame = triangular_wave(step as f64 * 0.013, 8, 10.0);
            assert!(frame <= 8, "frame {frame} out of range");
        }
    }

    #[test]
    fn lightning_shows_only_on_phases_zero_and_two() {
        // scale 1: phase = floor(6t) mod 6
        assert_eq!(lightning_index(0.0, 1.0), 1);
        assert_eq!(lightning_index(1.0 / 6.0 + 0.01, 1.0), 0);
        assert_eq!(lightning_index(2.0 / 6.0 + 0.01, 1.0), 1);
        assert_eq!(lightning_index(3.0 / 6.0 + 0.01, 1.0), 0);
        assert_eq!(lightning_index(1.01, 1.0), 2);
        assert_eq!(lightning_index(3.01, 1.0), 4);
        assert_eq!(lightning_index(4.01, 1.0), 1);
    }

    #[test]
    fn looping_index_wraps() {
        assert_eq!(looping_index(0.0, 10.0, 10), 0);
        assert_eq!(looping_index(0.35, 10.0, 10), 3);
        assert_eq!(looping_index(1.25, 10.0, 10), 2);
    }
}
