//! Client-side state shared by the lifecycles.

use crate::cache::EntityCache;
use crate::selection::SelectionController;
use crate::service::in_flight::InFlightRegistry;

/// Everything the core keeps between user actions.
///
/// Passed explicitly by reference to every lifecycle call; there is no
/// ambient selection or cache.
#[derive(Debug, Default)]
pub struct ClientState {
    pub cache: EntityCache,
    pub selection: SelectionController,
    pub in_flight: InFlightRegistry,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets selection, every cached result and every pending reservation.
    ///
    /// Confirmation requests issued before the reset can no longer release
    /// or lock anything.
    pub fn reset(&mut self) {
        self.selection.clear();
        self.cache.clear();
        self.in_flight.clear();
    }
}
