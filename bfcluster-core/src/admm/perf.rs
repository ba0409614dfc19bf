//! Wall-clock accounting for the phases of an ADMM iteration.

use std::time::{Duration, Instant};

#[derive(Debug, Copy, Clone)]
pub enum PerfSection {
    Birkhoff,
    Fantope,
    DualUpdate,
    Residuals,
}

/// Wall-clock time spent in each phase of the ADMM iteration.
#[derive(Debug, Default, Clone)]
pub struct PerfTimers {
    pub birkhoff: Duration,
    pub fantope: Duration,
    pub dual_update: Duration,
    pub residuals: Duration,
}

impl PerfTimers {
    pub fn scoped<'a>(&'a mut self, section: PerfSection) -> PerfGuard<'a> {
        PerfGuard { section, start: Instant::now(), timers: self }
    }

    pub fn add(&mut self, section: PerfSection, dt: Duration) {
        match section {
            PerfSection::Birkhoff => self.birkhoff += dt,
            PerfSection::Fantope => self.fantope += dt,
            PerfSection::DualUpdate => self.dual_update += dt,
            PerfSection::Residuals => self.residuals += dt,
        }
    }

    pub fn total(&self) -> Duration {
        self.birkhoff + self.fantope + self.dual_update + self.residuals
    }
}

pub struct PerfGuard<'a> {
    section: PerfSection,
    start: Instant,
    timers: &'a mut PerfTimers,
}

impl Drop for PerfGuard<'_> {
    fn drop(&mut self) {
        self.timers.add(self.section, self.start.elapsed());
    }
}
