//! Multi-sample temperature reads
//!
//! One transport read per tick, ticks one sample interval apart. After every
//! tick the output slot receives either the running average of the
//! successful samples so far or, if that tick's read failed,
//! [`TEMPERATURE_SENTINEL`]. A failed tick does not enter the average.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;
use probelight_core::device::TEMPERATURE_SENTINEL;
use probelight_core::CancelToken;
use probelight_hal::I2cBus;

use super::tmp117::Tmp117;

/// Incremental mean in O(1) memory
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningAverage {
    mean: f32,
    samples: u32,
}

impl RunningAverage {
    /// Empty average
    pub const fn new() -> Self {
        Self {
            mean: 0.0,
            samples: 0,
        }
    }

    /// Fold in one sample and return the updated mean
    ///
    /// `avg_k = (avg_{k-1} * (k - 1) + x_k) / k`
    pub fn push(&mut self, sample: f32) -> f32 {
        self.samples += 1;
        let k = self.samples as f32;
        self.mean = (self.mean * (k - 1.0) + sample) / k;
        self.mean
    }

    /// Mean of the samples so far, if any
    pub fn mean(&self) -> Option<f32> {
        (self.samples > 0).then_some(self.mean)
    }

    /// Number of samples folded in
    pub fn samples(&self) -> u32 {
        self.samples
    }
}

impl<B: I2cBus, D: DelayNs> Tmp117<B, D> {
    /// Take up to `count` samples, publishing to `average` after each tick
    ///
    /// Cancellation is checked before every tick, so a stop lets the current
    /// read finish and prevents the next one.
    pub async fn sample<M: RawMutex>(
        &mut self,
        count: u8,
        average: &Signal<M, f32>,
        cancel: &CancelToken,
    ) -> RunningAverage {
        let mut acc = RunningAverage::new();

        for tick in 1..=count {
            if tick > 1 {
                self.delay.delay_ms(self.timing.sample.interval_ms).await;
            }
            if cancel.is_cancelled() {
                debug!("sampling stopped after {=u8} of {=u8}", tick - 1, count);
                break;
            }

            match self.read_celsius().await {
                Ok(celsius) => {
                    info!("sample {=u8}/{=u8}: {=f32} C", tick, count, celsius);
                    average.signal(acc.push(celsius));
                }
                Err(e) => {
                    warn!(
                        "sample {=u8}/{=u8} failed: {=str}",
                        tick,
                        count,
                        e.description()
                    );
                    average.signal(TEMPERATURE_SENTINEL);
                }
            }
        }

        if count > 1 {
            if let Some(mean) = acc.mean() {
                info!("average of {=u32} samples: {=f32} C", acc.samples(), mean);
            }
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::fake::{FakeTmp117, RecordingDelay};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use probelight_hal::I2cFailure;
    use proptest::prelude::*;

    type Slot = Signal<CriticalSectionRawMutex, f32>;

    /// Raw result register value for a temperature
    fn raw(celsius: f32) -> Result<i16, I2cFailure> {
        Ok((celsius * 128.0) as i16)
    }

    #[test]
    fn test_running_average() {
        let mut acc = RunningAverage::new();
        assert_eq!(acc.mean(), None);
        assert_eq!(acc.push(20.0), 20.0);
        assert_eq!(acc.push(22.0), 21.0);
        assert_eq!(acc.push(24.0), 22.0);
        assert_eq!(acc.samples(), 3);
    }

    #[test]
    fn test_failed_tick_publishes_sentinel_and_is_excluded() {
        let slot = Slot::new();
        let cancel = CancelToken::new();
        let mut fake = FakeTmp117::new();
        fake.temperatures.extend([raw(20.0), Err(I2cFailure::DataNack), raw(24.0)]);
        let mut delay = RecordingDelay {
            watch: Some(&slot),
            ..RecordingDelay::default()
        };

        let mut tmp = Tmp117::new(&mut fake, FakeTmp117::ADDRESS, &mut delay);
        let acc = block_on(tmp.sample(3, &slot, &cancel));

        // Tick 1 reading, tick 2 sentinel, tick 3 mean of ticks 1 and 3
        assert_eq!(delay.observed, vec![Some(20.0), Some(TEMPERATURE_SENTINEL)]);
        assert_eq!(slot.try_take(), Some(22.0));
        assert_eq!(acc.samples(), 2);
        assert_eq!(delay.waits_ms, vec![1000, 1000]);
    }

    #[test]
    fn test_single_sample_has_no_wait() {
        let slot = Slot::new();
        let cancel = CancelToken::new();
        let mut fake = FakeTmp117::new();
        fake.temperatures.push_back(raw(-10.5));
        let mut delay = RecordingDelay::default();

        let mut tmp = Tmp117::new(&mut fake, FakeTmp117::ADDRESS, &mut delay);
        block_on(tmp.sample(1, &slot, &cancel));

        assert_eq!(slot.try_take(), Some(-10.5));
        assert!(delay.waits_ms.is_empty());
    }

    #[test]
    fn test_all_failed_leaves_sentinel() {
        let slot = Slot::new();
        let cancel = CancelToken::new();
        let mut fake = FakeTmp117::new();
        fake.fail_after = Some(0);
        let mut delay = RecordingDelay::default();

        let mut tmp = Tmp117::new(&mut fake, FakeTmp117::ADDRESS, &mut delay);
        let acc = block_on(tmp.sample(2, &slot, &cancel));

        assert_eq!(slot.try_take(), Some(TEMPERATURE_SENTINEL));
        assert_eq!(acc.mean(), None);
    }

    #[test]
    fn test_cancelled_before_start_reads_nothing() {
        let slot = Slot::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut fake = FakeTmp117::new();
        let mut delay = RecordingDelay::default();

        let mut tmp = Tmp117::new(&mut fake, FakeTmp117::ADDRESS, &mut delay);
        block_on(tmp.sample(5, &slot, &cancel));

        assert!(!slot.signaled());
        assert_eq!(fake.exchanges, 0);
    }

    #[test]
    fn test_stop_mid_run_finishes_current_sample() {
        let slot = Slot::new();
        let cancel = CancelToken::new();
        let mut fake = FakeTmp117::new();
        fake.temperatures.extend([raw(21.5), raw(30.0), raw(30.0)]);
        let mut delay = RecordingDelay {
            watch: Some(&slot),
            stop_at_interval: Some(&cancel),
            ..RecordingDelay::default()
        };

        let mut tmp = Tmp117::new(&mut fake, FakeTmp117::ADDRESS, &mut delay);
        let acc = block_on(tmp.sample(5, &slot, &cancel));

        // The first tick completed and published before the stop landed
        assert_eq!(acc.samples(), 1);
        assert_eq!(acc.mean(), Some(21.5));
        assert_eq!(delay.observed, vec![Some(21.5)]);
        assert_eq!(delay.waits_ms, vec![1000]);
        assert_eq!(fake.exchanges, 1);
        assert_eq!(fake.temperatures.len(), 2);
        assert!(!slot.signaled());
    }

    proptest! {
        #[test]
        fn prop_average_matches_batch_mean(samples in prop::collection::vec(-40.0f32..125.0, 1..50)) {
            let mut acc = RunningAverage::new();
            for s in &samples {
                acc.push(*s);
            }
            let batch = samples.iter().sum::<f32>() / samples.len() as f32;
            prop_assert!((acc.mean().unwrap() - batch).abs() < 0.01);
        }
    }
}
