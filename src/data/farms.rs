use chrono::NaiveDate;

use crate::data::crops::get_built_in_crops;
use crate::models::{
    crop::{Crop, CropStatus},
    farm::{ActivityLog, Farm, LogType},
};

fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn crop(id: &str) -> Option<Crop> {
    get_built_in_crops().into_iter().find(|c| c.id == id)
}

fn plant(farm: &mut Farm, index: usize, crop_id: &str, status: CropStatus, date: Option<NaiveDate>) {
    if let Some(plot) = farm.plots.get_mut(index) {
        plot.crop = crop(crop_id);
        plot.status = status;
        plot.planted_date = date;
    }
}

/// Main club farm next to campus: 6 rows x 9 columns, ids `r-c`.
pub fn seed_sfc_farm() -> Farm {
    let mut farm = Farm::new("SFC neighbourhood farm", 6, 9, "");
    plant(&mut farm, 0, "tomato", CropStatus::Harvest, ymd(2025, 9, 15));
    plant(&mut farm, 1, "eggplant", CropStatus::Planted, ymd(2025, 10, 1));
    plant(&mut farm, 9, "spinach", CropStatus::Planted, ymd(2025, 12, 20));

    farm.logs = [
        ("1", "0-0", ymd(2026, 1, 7), LogType::Watering, "Watered in the morning"),
        ("2", "0-1", ymd(2026, 1, 5), LogType::Fertilizing, "Top-dressed with organic fertiliser"),
    ]
    .into_iter()
    .filter_map(|(id, plot_id, date, kind, notes)| {
        Some(ActivityLog {
            id: id.into(),
            plot_id: plot_id.into(),
            date: date?,
            kind,
            notes: notes.into(),
            photos: None,
        })
    })
    .collect();
    farm
}

/// Second farm laid out as 9 ridges (columns) of 3 plots each, ids `yu-r-c`.
/// Ridge 3 is seeded as one merged daikon bed; its members carry no state of their own.
pub fn seed_field_yu_farm() -> Farm {
    let mut farm = Farm::new("Field Yu", 3, 9, "yu-");
    plant(&mut farm, 0, "carrot", CropStatus::Planted, ymd(2025, 11, 1));
    plant(&mut farm, 9, "spinach", CropStatus::Planted, ymd(2025, 11, 1));
    plant(&mut farm, 3, "daikon", CropStatus::Harvest, ymd(2025, 10, 15));
    plant(&mut farm, 14, "cabbage", CropStatus::Planted, ymd(2025, 10, 20));

    if let Some(head) = farm.plots.get_mut(3) {
        head.is_merge_start = true;
        head.merge_count = Some(3);
    }
    for index in [12, 21] {
        if let Some(member) = farm.plots.get_mut(index) {
            member.merged_with = Some("yu-0-3".into());
        }
    }
    farm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sfc_seed_is_valid() {
        let farm = seed_sfc_farm();
        assert!(farm.validate().is_ok());
        assert_eq!(farm.plots.len(), 54);
        assert_eq!(farm.logs.len(), 2);
        assert_eq!(farm.plot("0-0").unwrap().status, CropStatus::Harvest);
    }

    #[test]
    fn test_field_yu_seed_has_merged_ridge() {
        let farm = seed_field_yu_farm();
        assert!(farm.validate().is_ok());
        assert_eq!(farm.plots.len(), 27);
        assert_eq!(farm.group_size("yu-0-3"), 3);
        assert_eq!(farm.plot("yu-0-3").unwrap().merge_count, Some(3));
        let member = farm.plot("yu-2-3").unwrap();
        assert_eq!(member.merged_with.as_deref(), Some("yu-0-3"));
        assert_eq!(member.status, CropStatus::Empty);
        assert!(member.crop.is_none());
    }

    #[test]
    fn test_seeds_are_deterministic() {
        assert_eq!(seed_sfc_farm(), seed_sfc_farm());
        assert_eq!(seed_field_yu_farm(), seed_field_yu_farm());
    }
}
