use chrono::{DateTime, Utc};

use super::error::LookupError;
use crate::feed::StateVector;

/// Time-sorted state vectors answering exact and nearest-epoch queries with a
/// binary search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpochIndex {
    states: Vec<StateVector>,
}

impl EpochIndex {
    /// The caller guarantees strictly increasing epochs (the parser enforces it).
    pub fn new(states: Vec<StateVector>) -> Self {
        debug_assert!(states.windows(2).all(|w| w[0].epoch < w[1].epoch));
        Self { states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> &[StateVector] {
        &self.states
    }

    pub fn epochs(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.states.iter().map(|s| s.epoch)
    }

    pub fn exact(&self, epoch: DateTime<Utc>) -> Result<&StateVector, LookupError> {
        if self.states.is_empty() {
            return Err(LookupError::EmptyDataset);
        }
        self.states
            .binary_search_by(|state| state.epoch.cmp(&epoch))
            .map(|idx| &self.states[idx])
            .map_err(|_| LookupError::NotFound(epoch))
    }

    /// Closest state vector by absolute time difference. When `epoch` sits
    /// exactly halfway between two samples the earlier one wins.
    pub fn nearest(&self, epoch: DateTime<Utc>) -> Result<&StateVector, LookupError> {
        let idx = self.states.partition_point(|state| state.epoch < epoch);
        if idx == 0 {
            return self.first();
        }
        if idx == self.states.len() {
            return self.last();
        }
        let before = &self.states[idx - 1];
        let after = &self.states[idx];
        if epoch - before.epoch <= after.epoch - epoch {
            Ok(before)
        } else {
            Ok(after)
        }
    }

    pub fn closest_to_now(&self) -> Result<&StateVector, LookupError> {
        self.nearest(Utc::now())
    }

    pub fn first(&self) -> Result<&StateVector, LookupError> {
        self.states.first().ok_or(LookupError::EmptyDataset)
    }

    pub fn last(&self) -> Result<&StateVector, LookupError> {
        self.states.last().ok_or(LookupError::EmptyDataset)
    }
}
