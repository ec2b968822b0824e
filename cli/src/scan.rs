//! Parallel trainer-ID scans.

use std::ops::RangeInclusive;

use anyhow::{Context, Result};
use cxd_core::trainer::trainer_id_origin;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

/// A SID whose trainer seed the name screen can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SidHit {
    pub sid: u16,
    pub origin: u32,
    pub depth: u8,
}

/// Every reachable SID for `tid`, in ascending order.
pub fn scan_sids(tid: u16, jobs: Option<usize>) -> Result<Vec<SidHit>> {
    scan_sid_range(tid, 0..=u16::MAX, jobs)
}

pub fn scan_sid_range(
    tid: u16,
    sids: RangeInclusive<u16>,
    jobs: Option<usize>,
) -> Result<Vec<SidHit>> {
    let probe = |sid: u16| {
        trainer_id_origin(tid, sid).map(|found| SidHit {
            sid,
            origin: found.origin,
            depth: found.depth,
        })
    };

    let hits: Vec<SidHit> = if let Some(jobs) = jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| sids.clone().into_par_iter().filter_map(probe).collect())
    } else {
        sids.clone().into_par_iter().filter_map(probe).collect()
    };

    info!(
        tid,
        scanned = sids.len(),
        reachable = hits.len(),
        "sid scan finished"
    );
    Ok(hits)
}

/// Hits bucketed by how many skip runs they needed, index = depth.
pub fn depth_histogram(hits: &[SidHit]) -> Vec<usize> {
    let mut histogram = Vec::new();
    for hit in hits {
        let depth = hit.depth as usize;
        if histogram.len() <= depth {
            histogram.resize(depth + 1, 0);
        }
        histogram[depth] += 1;
    }
    histogram
}
