//! Storage port for rate observations

use core_kernel::{DomainPort, PortError};

use crate::observation::RateObservation;

/// Persistence boundary for the observation history
///
/// `append_observation` carries the per-day serialization duty: adapters
/// must treat a same-day duplicate insert as a conflict-as-no-op rather
/// than storing a second identical row when two pollers race.
pub trait RateObservationStore: DomainPort {
    /// Returns every stored observation
    fn rate_observations(&self) -> Result<Vec<RateObservation>, PortError>;

    /// Appends a new observation
    fn append_observation(&self, observation: RateObservation) -> Result<(), PortError>;
}
