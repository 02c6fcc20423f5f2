//! Compartment allocation within a job
//!
//! A tanker trailer has a fixed number of discrete compartments. Within one
//! job every cargo must sit in its own compartment, and a job cannot have
//! more drops than the trailer has compartments.

use std::collections::BTreeSet;

use tanklog_types::Job;

/// Allocator for a trailer with `compartment_count` compartments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompartmentAllocator {
    compartment_count: u32,
}

impl CompartmentAllocator {
    pub fn new(compartment_count: u32) -> Self {
        Self { compartment_count }
    }

    pub fn compartment_count(&self) -> u32 {
        self.compartment_count
    }

    /// Compartment numbers occupied by any cargo of the job
    pub fn used_compartments(&self, job: &Job) -> BTreeSet<u32> {
        job.cargos().map(|c| c.compartment).collect()
    }

    pub fn remaining_count(&self, job: &Job) -> u32 {
        let used = u32::try_from(self.used_compartments(job).len()).unwrap_or(u32::MAX);
        self.compartment_count.saturating_sub(used)
    }

    pub fn can_add_drop(&self, job: &Job) -> bool {
        let drops = u32::try_from(job.drops.len()).unwrap_or(u32::MAX);
        drops < self.compartment_count && self.remaining_count(job) > 0
    }

    /// Lowest free compartment, if any
    pub fn next_free_compartment(&self, job: &Job) -> Option<u32> {
        let used = self.used_compartments(job);
        (1..=self.compartment_count).find(|c| !used.contains(c))
    }

    /// Whether `compartment` may be chosen for a cargo.
    ///
    /// The cargo identified by `excluding_cargo_id` does not count as an
    /// occupant, so a cargo can always keep its own compartment.
    pub fn is_compartment_selectable(
        &self,
        job: &Job,
        compartment: u32,
        excluding_cargo_id: Option<&str>,
    ) -> bool {
        if !(1..=self.compartment_count).contains(&compartment) {
            return false;
        }
        !job
            .cargos()
            .any(|c| c.compartment == compartment && Some(c.id.as_str()) != excluding_cargo_id)
    }

    pub fn selectable_compartments(&self, job: &Job, excluding_cargo_id: Option<&str>) -> Vec<u32> {
        (1..=self.compartment_count)
            .filter(|&c| self.is_compartment_selectable(job, c, excluding_cargo_id))
            .collect()
    }
}
