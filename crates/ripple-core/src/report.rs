//! Per-tick counters for the simulation engines.
//!
//! [`TickReport`] captures what one `update()` call did, enabling
//! telemetry and test assertions without any logging dependency.

/// Counters collected during a single tick.
///
/// Both engines return one per `update()`. Counts are engine-specific
/// where noted: the spherical engine counts wavefronts and transient
/// mirrors, the ray-cast engine counts rays and live emissions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// New wavefronts (or rays) spawned from polled emissions.
    pub spawned: usize,
    /// Transient mirror wavefronts derived (or rays re-emitted off
    /// obstacle contacts).
    pub reflections: usize,
    /// Arrival events recorded across all receivers.
    pub arrivals: usize,
    /// Receivers that were handed a combined reading.
    pub deliveries: usize,
    /// Wavefronts removed (or emissions culled) this tick.
    pub retired: usize,
    /// Wavefronts (or emissions) still live after the tick.
    pub live: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_report_is_zero() {
        let r = TickReport::default();
        assert_eq!(r.spawned, 0);
        assert_eq!(r.reflections, 0);
        assert_eq!(r.arrivals, 0);
        assert_eq!(r.deliveries, 0);
        assert_eq!(r.retired, 0);
        assert_eq!(r.live, 0);
    }
}
