use sinew_core::{Result, SinewError};

use crate::values::Interpolatable;

/// How a track fills the gap between two keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Lerp for vectors, shortest-arc slerp for rotations.
    #[default]
    Linear,
    /// Hold the left key until the next one.
    Step,
}

/// How many neighbouring intervals the cursor inspects before giving up and
/// falling back to a binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers where the previous lookup landed so sequential playback finds
/// its bracketing keys in O(1).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

/// Time-stamped samples of a single property.
///
/// Key times are non-decreasing and the track holds at least one key; both
/// are checked on construction, so sampling never has to deal with an empty
/// or unordered track. Keys sharing a timestamp are allowed: sampling at that
/// time yields the later key, and the zero-length span between them is never
/// interpolated.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    times: Vec<f32>,
    values: Vec<T>,
    interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Result<Self> {
        if times.is_empty() {
            return Err(SinewError::InvalidTrack("track has no keys".into()));
        }
        if times.len() != values.len() {
            return Err(SinewError::InvalidTrack(format!(
                "{} key times but {} values",
                times.len(),
                values.len()
            )));
        }
        if let Some(bad) = times.iter().position(|t| !t.is_finite()) {
            return Err(SinewError::InvalidTrack(format!("key {bad} has a non-finite time")));
        }
        if let Some(pair) = times.windows(2).position(|w| w[1] < w[0]) {
            return Err(SinewError::InvalidTrack(format!(
                "key times decrease at key {}",
                pair + 1
            )));
        }

        Ok(Self {
            times,
            values,
            interpolation,
        })
    }

    /// A track that holds `value` for all time.
    pub fn constant(value: T) -> Self {
        Self {
            times: vec![0.0],
            values: vec![value],
            interpolation: InterpolationMode::Step,
        }
    }

    /// Shorthand for a linear track.
    pub fn linear(times: Vec<f32>, values: Vec<T>) -> Result<Self> {
        Self::new(times, values, InterpolationMode::Linear)
    }

    #[inline]
    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false; tracks are never empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn start_time(&self) -> f32 {
        self.times[0]
    }

    #[inline]
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times[self.times.len() - 1]
    }

    /// Stateless sampling via binary search.
    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        self.sample_at(self.locate(time), time)
    }

    /// Sampling with a cursor hint. Produces exactly the same value as
    /// [`sample`](Self::sample); only the lookup cost differs.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> T {
        let index = self.locate_from(cursor.last_index, time);
        cursor.last_index = index;
        self.sample_at(index, time)
    }

    /// Index of the last key at or before `time`, or 0 if `time` precedes
    /// every key.
    fn locate(&self, time: f32) -> usize {
        self.times.partition_point(|&t| t <= time).saturating_sub(1)
    }

    fn locate_from(&self, hint: usize, time: f32) -> usize {
        let last = self.times.len() - 1;
        let hint = hint.min(last);

        if time >= self.times[hint] {
            // Playing forward: each failed check proves time >= times[idx + 1].
            for idx in hint..=(hint + MAX_SCAN_OFFSET).min(last) {
                if idx == last || time < self.times[idx + 1] {
                    return idx;
                }
            }
        } else {
            // Playing backward or wrapped around a loop.
            let floor = hint.saturating_sub(MAX_SCAN_OFFSET);
            for idx in (floor..hint).rev() {
                if time >= self.times[idx] {
                    return idx;
                }
            }
            if floor == 0 {
                return 0;
            }
        }

        self.locate(time)
    }

    fn sample_at(&self, index: usize, time: f32) -> T {
        let last = self.times.len() - 1;
        if index >= last || time <= self.times[0] {
            let clamped = if time <= self.times[0] { 0 } else { last };
            return self.values[clamped];
        }

        let t0 = self.times[index];
        let t1 = self.times[index + 1];
        let dt = t1 - t0;
        let f = if dt > 0.0 {
            ((time - t0) / dt).clamp(0.0, 1.0)
        } else {
            0.0
        };

        if f == 0.0 {
            return self.values[index];
        }

        match self.interpolation {
            InterpolationMode::Step => self.values[index],
            InterpolationMode::Linear => {
                T::interpolate_linear(&self.values[index], &self.values[index + 1], f)
            }
        }
    }
}
