//! Priority-aware distribution of a shared pool across concurrent incidents.
//!
//! Each tracked resource is handled independently. When the pool covers
//! every request, every incident gets exactly what it asked for. Under
//! shortage each incident's share is proportional to
//! `requested × priority_bonus`, where
//! `priority_bonus = 1 + priority / Σ priorities × 0.10`. Shares are capped
//! at the request and the excess is redistributed among incidents that are
//! still short, so the pool is never overdrawn and nothing is wasted on
//! over-allocation. Quantities are floored to whole units at the end.

use tracing::{info, instrument};

use super::priority::{IncidentPriority, PriorityCalculator};
use super::report::{AllocationReport, IncidentAllocation, ResourceAllocation, ResourceUsage};
use crate::domain::{AllocationPool, Incident, TrackedResource};

/// Maximum extra share a single incident can earn from priority (10%)
pub const PRIORITY_BONUS: f64 = 0.10;

/// Stateless scarce-resource allocator
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceAllocator;

impl ResourceAllocator {
    /// Create an allocator
    pub fn new() -> Self {
        Self
    }

    /// Allocate `pool` across `incidents`.
    ///
    /// Never fails: scarcity produces partial allocations, not errors.
    /// Incidents are reported in descending priority order; ties keep input order.
    #[instrument(skip_all, fields(incidents = incidents.len()))]
    pub fn allocate(&self, pool: &AllocationPool, incidents: &[Incident]) -> AllocationReport {
        let priorities: Vec<IncidentPriority> = incidents.iter().map(PriorityCalculator::assess).collect();
        let bonuses = priority_bonuses(&priorities);

        let mut granted: Vec<Vec<ResourceAllocation>> = vec![Vec::new(); incidents.len()];
        let mut resources = Vec::with_capacity(TrackedResource::ALL.len());

        for resource in TrackedResource::ALL {
            let available = pool.get(resource);
            let requests: Vec<u64> = incidents.iter().map(|i| i.needs.get(resource)).collect();
            let total_requested: u64 = requests.iter().fold(0u64, |acc, r| acc.saturating_add(*r));

            let shares = if total_requested <= available {
                requests.clone()
            } else {
                info!(
                    resource = %resource,
                    available,
                    requested = total_requested,
                    "Resource shortage, allocating by priority"
                );
                share_scarce(available, &requests, &bonuses, &priorities)
            };

            let allocated: u64 = shares.iter().sum();
            for (i, (&requested, &share)) in requests.iter().zip(&shares).enumerate() {
                granted[i].push(ResourceAllocation::new(resource, requested, share));
            }
            resources.push(ResourceUsage::new(resource, available, total_requested, allocated));
        }

        let shortage = resources.iter().any(|r| r.shortage);
        let mut reports: Vec<IncidentAllocation> = incidents
            .iter()
            .zip(priorities)
            .zip(granted)
            .zip(&bonuses)
            .map(|(((incident, priority), allocations), bonus)| {
                let bonus_percent = if shortage { (bonus - 1.0) * 100.0 } else { 0.0 };
                IncidentAllocation::new(
                    incident.name.clone(),
                    incident.location.clone(),
                    incident.affected_population.get(),
                    priority,
                    bonus_percent,
                    allocations,
                )
            })
            .collect();
        // Stable sort keeps input order among equal scores.
        reports.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));

        info!(shortage, "Allocation completed");
        AllocationReport {
            incidents: reports,
            resources,
        }
    }
}

/// `1 + priority / Σ priorities × 0.10`, or 1.0 for everyone when Σ is zero
fn priority_bonuses(priorities: &[IncidentPriority]) -> Vec<f64> {
    let total: f64 = priorities.iter().map(|p| p.score as f64).sum();
    priorities
        .iter()
        .map(|p| {
            if total > 0.0 {
                1.0 + (p.score as f64 / total) * PRIORITY_BONUS
            } else {
                1.0
            }
        })
        .collect()
}

/// Capped proportional split of `available` when requests exceed it.
///
/// Each incident's share is `weight / Σ weight` of the pool, capped at its
/// request; units freed by the cap are split again among the incidents still
/// short, so a pass can repeat up to once per incident. The floored result
/// is normalised so the total never exceeds the pool: shares are not
/// independent of one another.
fn share_scarce(
    available: u64,
    requests: &[u64],
    bonuses: &[f64],
    priorities: &[IncidentPriority],
) -> Vec<u64> {
    let n = requests.len();
    let weights: Vec<f64> = requests
        .iter()
        .zip(bonuses)
        .map(|(&r, &b)| r as f64 * b)
        .collect();

    let mut exact = vec![0.0_f64; n];
    let mut capped: Vec<bool> = requests.iter().map(|&r| r == 0).collect();
    let mut pool = available as f64;

    loop {
        let open: Vec<usize> = (0..n).filter(|&i| !capped[i]).collect();
        let total_weight: f64 = open.iter().map(|&i| weights[i]).sum();
        if open.is_empty() || total_weight <= 0.0 || pool <= 0.0 {
            break;
        }

        let saturated: Vec<usize> = open
            .iter()
            .copied()
            .filter(|&i| pool * weights[i] / total_weight >= requests[i] as f64)
            .collect();

        if saturated.is_empty() {
            for &i in &open {
                exact[i] = pool * weights[i] / total_weight;
            }
            break;
        }
        for i in saturated {
            exact[i] = requests[i] as f64;
            pool -= requests[i] as f64;
            capped[i] = true;
        }
    }

    let mut shares: Vec<u64> = exact
        .iter()
        .zip(requests)
        .map(|(&x, &r)| (x.max(0.0).floor() as u64).min(r))
        .collect();

    // Floating point can leave the floored sum a unit above the pool; take the
    // excess back from the lowest-priority incidents first.
    let mut excess = shares.iter().sum::<u64>().saturating_sub(available);
    if excess > 0 {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| priorities[i].score);
        for i in order {
            let take = excess.min(shares[i]);
            shares[i] -= take;
            excess -= take;
            if excess == 0 {
                break;
            }
        }
    }
    shares
}
