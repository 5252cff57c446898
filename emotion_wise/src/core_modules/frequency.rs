use crate::core_modules::emotion::Emotion;

/// Cumulative count per label since the session started.
///
/// Labels are kept in the order they were first seen, which is also the
/// left-to-right order of the overlay's bar chart.
#[derive(Debug, Clone, Default)]
pub struct FrequencyCounter {
    counts: Vec<(Emotion, u64)>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more sighting of `emotion` and returns its new total.
    pub fn increment(&mut self, emotion: Emotion) -> u64 {
        if let Some((_, count)) = self.counts.iter_mut().find(|(e, _)| *e == emotion) {
            *count += 1;
            *count
        } else {
            self.counts.push((emotion, 1));
            1
        }
    }

    pub fn count(&self, emotion: Emotion) -> u64 {
        self.counts
            .iter()
            .find(|(e, _)| *e == emotion)
            .map_or(0, |(_, count)| *count)
    }

    /// The largest count, or `None` before anything was recorded.
    pub fn max_count(&self) -> Option<u64> {
        self.counts.iter().map(|(_, count)| *count).max()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, count)| *count).sum()
    }

    /// Number of distinct labels seen so far.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, u64)> + '_ {
        self.counts.iter().copied()
    }
}
