use rand::Rng;

use crate::config::DelaySettings;

/// Uniform integer draws used by the delay simulation
pub trait RandomSource {
    /// Draw from `[0, upper)`; `upper` is positive
    fn below(&mut self, upper: u32) -> u32;

    /// Draw from `[low, high)`; `low < high`
    fn between(&mut self, low: u32, high: u32) -> u32;
}

impl<R: Rng> RandomSource for R {
    fn below(&mut self, upper: u32) -> u32 {
        self.gen_range(0..upper)
    }

    fn between(&mut self, low: u32, high: u32) -> u32 {
        self.gen_range(low..high)
    }
}

/// Decide how many milliseconds to hold back a response.
///
/// Returns 0 whenever any setting is non-positive. Otherwise the request is
/// delayed with probability `1 / frequency_one_from`. An empty duration range
/// (`from >= to`) delays by exactly `duration_from_ms`.
pub fn decide_delay<R: RandomSource + ?Sized>(settings: &DelaySettings, rng: &mut R) -> u64 {
    if !settings.is_enabled() {
        return 0;
    }

    let frequency = settings.frequency_one_from as u32;
    if rng.below(frequency) != 0 {
        return 0;
    }

    let from = settings.duration_from_ms as u32;
    let to = settings.duration_to_ms as u32;
    if from >= to {
        return u64::from(from);
    }

    u64::from(rng.between(from, to))
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    /// Replays a fixed sequence of draws, ignoring the requested bounds
    struct ScriptedRandom {
        draws: VecDeque<u32>,
        calls: usize,
    }

    impl ScriptedRandom {
        fn new(draws: &[u32]) -> Self {
            Self {
                draws: draws.iter().copied().collect(),
                calls: 0,
            }
        }

        fn next(&mut self) -> u32 {
            self.calls += 1;
            self.draws.pop_front().expect("script exhausted")
        }
    }

    impl RandomSource for ScriptedRandom {
        fn below(&mut self, _upper: u32) -> u32 {
            self.next()
        }

        fn between(&mut self, _low: u32, _high: u32) -> u32 {
            self.next()
        }
    }

    fn settings(frequency: i32, from: i32, to: i32) -> DelaySettings {
        DelaySettings {
            frequency_one_from: frequency,
            duration_from_ms: from,
            duration_to_ms: to,
        }
    }

    #[test]
    fn test_zero_frequency_never_delays() {
        let mut rng = ScriptedRandom::new(&[0, 500, 0, 500]);

        assert_eq!(decide_delay(&settings(0, 100, 1000), &mut rng), 0);
        assert_eq!(rng.calls, 0);
    }

    #[test]
    fn test_non_positive_durations_never_delay() {
        let mut rng = ScriptedRandom::new(&[]);

        assert_eq!(decide_delay(&settings(1, 0, 1000), &mut rng), 0);
        assert_eq!(decide_delay(&settings(1, 100, 0), &mut rng), 0);
        assert_eq!(decide_delay(&settings(-3, 100, 1000), &mut rng), 0);
        assert_eq!(decide_delay(&settings(1, -100, 1000), &mut rng), 0);
        assert_eq!(rng.calls, 0);
    }

    #[test]
    fn test_eligible_request_uses_second_draw() {
        let mut rng = ScriptedRandom::new(&[0, 500]);

        assert_eq!(decide_delay(&settings(1, 100, 1000), &mut rng), 500);
        assert_eq!(rng.calls, 2);
    }

    #[test]
    fn test_ineligible_request_is_not_delayed() {
        let mut rng = ScriptedRandom::new(&[2]);

        assert_eq!(decide_delay(&settings(3, 100, 1000), &mut rng), 0);
        assert_eq!(rng.calls, 1);
    }

    #[test]
    fn test_empty_range_delays_by_lower_bound() {
        let mut rng = ScriptedRandom::new(&[0]);

        assert_eq!(decide_delay(&settings(1, 300, 300), &mut rng), 300);
        assert_eq!(rng.calls, 1);
    }

    #[test]
    fn test_real_rng_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = settings(1, 100, 1000);

        for _ in 0..1000 {
            let delay = decide_delay(&config, &mut rng);
            assert!((100..1000).contains(&delay), "delay {} out of range", delay);
        }
    }

    #[test]
    fn test_frequency_controls_delay_rate() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = settings(4, 10, 20);

        let delayed = (0..4000)
            .filter(|_| decide_delay(&config, &mut rng) > 0)
            .count();

        // Expected around 1000 for a 1-in-4 rate
        assert!((800..1200).contains(&delayed), "delayed {} of 4000", delayed);
    }
}
