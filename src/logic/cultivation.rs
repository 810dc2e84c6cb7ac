use std::collections::HashSet;

use chrono::{Local, NaiveDate};
use log::{debug, info};

use crate::logic::merge::normalize_groups;
use crate::models::{
    crop::{Crop, CropStatus},
    farm::{Direction, Farm, Plot},
};

/// Blanks every selected plot and detaches it from its merge group.
///
/// Resetting a head dissolves its whole group; resetting a member shrinks its
/// group, and a group reduced to its head alone is dissolved too.
pub fn reset(farm: &Farm, selected: &HashSet<String>) -> Farm {
    if selected.is_empty() {
        debug!("Reset on '{}' with an empty selection", farm.name);
        return farm.clone();
    }

    let mut plots: Vec<Plot> = farm
        .plots
        .iter()
        .map(|p| {
            let mut p = p.clone();
            if selected.contains(&p.id) {
                p.clear_cultivation();
                p.clear_merge();
            }
            p
        })
        .collect();
    normalize_groups(&mut plots);

    let count = farm.plots.iter().filter(|p| selected.contains(&p.id)).count();
    info!("Reset {count} plot(s) on '{}'", farm.name);
    Farm {
        plots,
        ..farm.clone()
    }
}

/// Assigns a crop and status to one plot, stamping today's date on first planting.
pub fn set_crop_and_status(
    farm: &Farm,
    plot_id: &str,
    crop: Option<Crop>,
    status: CropStatus,
) -> Farm {
    set_crop_and_status_on(farm, plot_id, crop, status, Local::now().date_naive())
}

/// Like [`set_crop_and_status`] with an explicit "today".
///
/// When the plot heads a merge group the status (not the crop) is copied to
/// every member so the group reads as one cultivation unit.
pub fn set_crop_and_status_on(
    farm: &Farm,
    plot_id: &str,
    crop: Option<Crop>,
    status: CropStatus,
    today: NaiveDate,
) -> Farm {
    let Some(target) = farm.plot(plot_id) else {
        debug!("Crop update on '{}': unknown plot '{plot_id}'", farm.name);
        return farm.clone();
    };
    let propagate = target.is_merge_start;

    let plots = farm
        .plots
        .iter()
        .map(|p| {
            let mut p = p.clone();
            if p.id == plot_id {
                if crop.is_some() && p.planted_date.is_none() {
                    p.planted_date = Some(today);
                }
                p.crop = crop.clone();
                p.status = status;
            } else if propagate && p.merged_with.as_deref() == Some(plot_id) {
                p.status = status;
            }
            p
        })
        .collect();

    info!(
        "Plot '{plot_id}' on '{}' set to {} ({})",
        farm.name,
        crop.as_ref().map(|c| c.name.as_str()).unwrap_or("no crop"),
        status.label()
    );
    Farm {
        plots,
        ..farm.clone()
    }
}

pub fn set_direction(farm: &Farm, direction: Direction) -> Farm {
    Farm {
        direction,
        ..farm.clone()
    }
}
