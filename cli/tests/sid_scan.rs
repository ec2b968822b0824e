use anyhow::Result;
use cxd_cli::scan::{depth_histogram, scan_sid_range, SidHit};
use cxd_core::trainer::is_trainer_id_reachable;

#[test]
fn scan_matches_single_lookups() -> Result<()> {
    let hits = scan_sid_range(36976, 57936..=57943, Some(2))?;
    let sids: Vec<u16> = hits.iter().map(|hit| hit.sid).collect();
    assert_eq!(sids, vec![57936, 57938, 57941, 57942, 57943]);
    for sid in 57936..=57943u16 {
        assert_eq!(sids.contains(&sid), is_trainer_id_reachable(36976, sid));
    }
    Ok(())
}

#[test]
fn default_pool_agrees_with_sized_pool() -> Result<()> {
    let sized = scan_sid_range(36976, 57900..=57999, Some(3))?;
    let default = scan_sid_range(36976, 57900..=57999, None)?;
    assert_eq!(sized, default);
    Ok(())
}

#[test]
fn histogram_counts_each_depth() {
    let hit = |sid, depth| SidHit {
        sid,
        origin: 0,
        depth,
    };
    let hits = [hit(1, 0), hit(2, 0), hit(3, 2)];
    assert_eq!(depth_histogram(&hits), vec![2, 0, 1]);
    assert!(depth_histogram(&[]).is_empty());
}
