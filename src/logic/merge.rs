use std::collections::{HashSet, VecDeque};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::farm::{Farm, Plot};

/// A merge needs at least this many connected plots.
pub const MIN_MERGE_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MergeOutcome {
    /// `count` plots now form one group.
    Merged { count: usize },
    /// Fewer than two selected plots were connected; the farm is unchanged.
    InsufficientAdjacency,
}

impl MergeOutcome {
    pub fn is_merged(&self) -> bool {
        matches!(self, MergeOutcome::Merged { .. })
    }
}

/// Returns the connected component of the selection that contains its first plot
/// in column-then-row order, in breadth-first visiting order.
///
/// Only selected plots are traversed. Ids that do not exist in the farm are ignored.
pub fn connected_selection<'a>(farm: &'a Farm, selected: &HashSet<String>) -> Vec<&'a Plot> {
    let start = farm
        .plots
        .iter()
        .filter(|p| selected.contains(&p.id))
        .min_by_key(|p| (p.col, p.row));
    let Some(start) = start else {
        return Vec::new();
    };

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&Plot> = VecDeque::from([start]);
    let mut connected = Vec::new();

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current.id.as_str()) {
            continue;
        }
        connected.push(current);
        for neighbor in farm.neighbors(current) {
            if selected.contains(&neighbor.id) && !visited.contains(neighbor.id.as_str()) {
                queue.push_back(neighbor);
            }
        }
    }
    connected
}

/// Collapses the connected part of `selected` into one merge group headed by its
/// first plot. Every plot of the new group is blanked to `empty`.
pub fn merge(farm: &Farm, selected: &HashSet<String>) -> (Farm, MergeOutcome) {
    let connected: Vec<String> = connected_selection(farm, selected)
        .into_iter()
        .map(|p| p.id.clone())
        .collect();

    if connected.len() < MIN_MERGE_SIZE {
        warn!(
            "Merge rejected on '{}': {} of {} selected plot(s) connected",
            farm.name,
            connected.len(),
            selected.len()
        );
        return (farm.clone(), MergeOutcome::InsufficientAdjacency);
    }
    if connected.len() < selected.len() {
        debug!(
            "Merge on '{}' keeps {} connected plot(s), {} selected plot(s) left out",
            farm.name,
            connected.len(),
            selected.len() - connected.len()
        );
    }

    let head_id = connected[0].as_str();
    let count = connected.len();
    let mut plots: Vec<Plot> = farm
        .plots
        .iter()
        .map(|p| {
            let mut p = p.clone();
            if p.id == head_id {
                p.clear_cultivation();
                p.merged_with = None;
                p.is_merge_start = true;
                p.merge_count = Some(count);
            } else if connected.contains(&p.id) {
                p.clear_cultivation();
                p.is_merge_start = false;
                p.merge_count = None;
                p.merged_with = Some(head_id.to_string());
            }
            p
        })
        .collect();
    normalize_groups(&mut plots);

    info!("Merged {count} plot(s) on '{}' under '{head_id}'", farm.name);
    (
        Farm {
            plots,
            ..farm.clone()
        },
        MergeOutcome::Merged { count },
    )
}

/// Dissolves the group headed by `head_id`. Cultivation state is left as it is.
/// A no-op when `head_id` is not a merge head.
pub fn unmerge(farm: &Farm, head_id: &str) -> Farm {
    let is_head = farm.plot(head_id).is_some_and(|p| p.is_merge_start);
    if !is_head {
        debug!("Unmerge on '{}': '{head_id}' is not a merge head", farm.name);
        return farm.clone();
    }

    let plots = farm
        .plots
        .iter()
        .map(|p| {
            let mut p = p.clone();
            if p.id == head_id {
                p.is_merge_start = false;
                p.merge_count = None;
            } else if p.merged_with.as_deref() == Some(head_id) {
                p.merged_with = None;
            }
            p
        })
        .collect();

    info!(
        "Unmerged group '{head_id}' ({} plot(s)) on '{}'",
        farm.group_size(head_id),
        farm.name
    );
    Farm {
        plots,
        ..farm.clone()
    }
}

/// Fixes broken merge links in a stored farm: a plot flagged as both head and
/// member stays a head, members of missing heads are released, and counts are
/// recomputed. Crops, logs and settings are kept.
pub fn repair_groups(farm: &Farm) -> Farm {
    let mut plots = farm.plots.clone();
    for plot in plots.iter_mut().filter(|p| p.is_merge_start) {
        plot.merged_with = None;
    }
    normalize_groups(&mut plots);
    Farm {
        plots,
        ..farm.clone()
    }
}

/// Restores the merge invariants after plots were pulled out of their groups:
/// members pointing at a plot that is no longer a head are released, and every
/// head's `merge_count` is recomputed from its actual membership. A head left
/// without members becomes an independent plot again.
pub(crate) fn normalize_groups(plots: &mut [Plot]) {
    let heads: HashSet<String> = plots
        .iter()
        .filter(|p| p.is_merge_start)
        .map(|p| p.id.clone())
        .collect();

    for plot in plots.iter_mut() {
        let dangling = plot
            .merged_with
            .as_ref()
            .is_some_and(|head| !heads.contains(head));
        if dangling {
            plot.merged_with = None;
        }
    }

    let members: Vec<String> = plots.iter().filter_map(|p| p.merged_with.clone()).collect();
    for plot in plots.iter_mut().filter(|p| p.is_merge_start) {
        let size = 1 + members.iter().filter(|h| **h == plot.id).count();
        if size < MIN_MERGE_SIZE {
            plot.is_merge_start = false;
            plot.merge_count = None;
        } else {
            plot.merge_count = Some(size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::crop::{Crop, CropStatus};

    fn ids(list: &[&str]) -> HashSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn planted_farm(rows: usize, cols: usize) -> Farm {
        let mut farm = Farm::new("test", rows, cols, "");
        for plot in farm.plots.iter_mut() {
            plot.crop = Some(Crop::new("tomato", "Tomato", "#E53935"));
            plot.status = CropStatus::Planted;
            plot.planted_date = chrono::NaiveDate::from_ymd_opt(2025, 9, 15);
        }
        farm
    }

    #[test]
    fn test_straight_run_merges_under_leftmost_plot() {
        let farm = planted_farm(3, 9);
        let (merged, outcome) = merge(&farm, &ids(&["0-5", "0-3", "0-4"]));
        assert_eq!(outcome, MergeOutcome::Merged { count: 3 });

        let head = merged.plot("0-3").unwrap();
        assert!(head.is_merge_start);
        assert_eq!(head.merge_count, Some(3));
        assert_eq!(head.merged_with, None);
        for id in ["0-4", "0-5"] {
            assert_eq!(merged.plot(id).unwrap().merged_with.as_deref(), Some("0-3"));
        }
        for id in ["0-3", "0-4", "0-5"] {
            let p = merged.plot(id).unwrap();
            assert_eq!(p.status, CropStatus::Empty);
            assert!(p.crop.is_none());
            assert!(p.planted_date.is_none());
        }
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn test_disconnected_pair_is_rejected() {
        let farm = planted_farm(3, 3);
        let (after, outcome) = merge(&farm, &ids(&["0-0", "2-2"]));
        assert_eq!(outcome, MergeOutcome::InsufficientAdjacency);
        assert_eq!(after, farm);
    }

    #[test]
    fn test_single_selection_is_rejected() {
        let farm = planted_farm(2, 2);
        let (_, outcome) = merge(&farm, &ids(&["0-0"]));
        assert!(!outcome.is_merged());
    }

    #[test]
    fn test_island_outside_start_component_is_untouched() {
        let farm = planted_farm(3, 3);
        // (0,0)-(1,0) connected; (2,2) is an island
        let (after, outcome) = merge(&farm, &ids(&["0-0", "1-0", "2-2"]));
        assert_eq!(outcome, MergeOutcome::Merged { count: 2 });
        assert_eq!(after.plot("2-2"), farm.plot("2-2"));
        assert_eq!(after.plot("1-0").unwrap().merged_with.as_deref(), Some("0-0"));
    }

    #[test]
    fn test_start_plot_uses_column_then_row_order() {
        let farm = planted_farm(3, 3);
        // (2,0) has the lowest column even though (0,1) has the lowest row
        let (after, _) = merge(&farm, &ids(&["0-1", "1-1", "1-0", "2-0"]));
        assert!(after.plot("1-0").unwrap().is_merge_start);
    }

    #[test]
    fn test_start_island_smaller_than_other_island_is_rejected() {
        let farm = planted_farm(3, 3);
        // (0,0) alone in column 0; (0,2)-(1,2) connected but not reachable
        let (after, outcome) = merge(&farm, &ids(&["0-0", "0-2", "1-2"]));
        assert_eq!(outcome, MergeOutcome::InsufficientAdjacency);
        assert_eq!(after, farm);
    }

    #[test]
    fn test_l_shape_merges_through_corner() {
        let farm = planted_farm(3, 3);
        let selected = ids(&["0-0", "1-0", "2-0", "2-1", "2-2"]);
        let connected: Vec<&str> = connected_selection(&farm, &selected)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(connected, vec!["0-0", "1-0", "2-0", "2-1", "2-2"]);
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let farm = planted_farm(2, 2);
        let (after, outcome) = merge(&farm, &ids(&["0-0", "0-1", "9-9"]));
        assert_eq!(outcome, MergeOutcome::Merged { count: 2 });
        assert_eq!(after.plots.len(), 4);
    }

    #[test]
    fn test_unmerge_releases_members_and_keeps_state() {
        let farm = planted_farm(1, 6);
        let (merged, _) = merge(&farm, &ids(&["0-3", "0-4", "0-5"]));
        let split = unmerge(&merged, "0-3");
        for id in ["0-3", "0-4", "0-5"] {
            let p = split.plot(id).unwrap();
            assert!(!p.is_merged());
            assert_eq!(p.merge_count, None);
            assert_eq!(p.status, CropStatus::Empty);
            assert!(p.crop.is_none());
        }
    }

    #[test]
    fn test_unmerge_is_idempotent() {
        let farm = planted_farm(1, 3);
        let (merged, _) = merge(&farm, &ids(&["0-0", "0-1"]));
        let once = unmerge(&merged, "0-0");
        let twice = unmerge(&once, "0-0");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unmerge_on_member_is_noop() {
        let farm = planted_farm(1, 3);
        let (merged, _) = merge(&farm, &ids(&["0-0", "0-1"]));
        assert_eq!(unmerge(&merged, "0-1"), merged);
    }

    #[test]
    fn test_merging_over_existing_head_releases_its_other_members() {
        let farm = planted_farm(2, 3);
        let (first, _) = merge(&farm, &ids(&["0-1", "0-2"]));
        // new group takes (0,0) and the old head (0,1), leaving (0,2) behind
        let (second, outcome) = merge(&first, &ids(&["0-0", "0-1"]));
        assert_eq!(outcome, MergeOutcome::Merged { count: 2 });
        assert_eq!(second.plot("0-1").unwrap().merged_with.as_deref(), Some("0-0"));
        assert!(!second.plot("0-1").unwrap().is_merge_start);
        assert!(!second.plot("0-2").unwrap().is_merged());
        assert!(second.validate().is_ok());
    }

    #[test]
    fn test_stealing_member_recounts_old_group() {
        let farm = planted_farm(2, 3);
        let (first, _) = merge(&farm, &ids(&["0-0", "0-1", "0-2"]));
        let (second, _) = merge(&first, &ids(&["0-2", "1-2"]));
        assert_eq!(second.plot("0-0").unwrap().merge_count, Some(2));
        assert_eq!(second.plot("0-2").unwrap().merge_count, Some(2));
        assert!(second.validate().is_ok());
    }

    #[test]
    fn test_repair_keeps_head_flag_and_releases_orphans() {
        let mut farm = Farm::new("test", 1, 4, "");
        farm.plots[1].is_merge_start = true;
        farm.plots[1].merged_with = Some("0-0".into());
        farm.plots[2].merged_with = Some("0-1".into());
        farm.plots[3].merged_with = Some("0-0".into());

        let repaired = repair_groups(&farm);
        assert!(repaired.validate().is_ok());
        assert_eq!(repaired.group_size("0-1"), 2);
        assert_eq!(repaired.plot("0-1").unwrap().merge_count, Some(2));
        assert!(repaired.plot("0-3").unwrap().merged_with.is_none());
    }
}
