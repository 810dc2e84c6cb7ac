use chrono::NaiveDate;
use log::{debug, info};

use crate::models::farm::{ActivityLog, Farm, LogType};

/// Appends a log entry for an existing plot and returns it with the updated farm.
/// Returns `None` when the plot is unknown.
pub fn add_log(
    farm: &Farm,
    plot_id: &str,
    date: NaiveDate,
    kind: LogType,
    notes: &str,
) -> Option<(Farm, ActivityLog)> {
    if !farm.contains(plot_id) {
        debug!("Log rejected on '{}': unknown plot '{plot_id}'", farm.name);
        return None;
    }
    let next_id = farm
        .logs
        .iter()
        .filter_map(|l| l.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        + 1;

    let entry = ActivityLog {
        id: next_id.to_string(),
        plot_id: plot_id.to_string(),
        date,
        kind,
        notes: notes.trim().to_string(),
        photos: None,
    };
    let mut logs = farm.logs.clone();
    logs.push(entry.clone());
    info!("Logged {} on plot '{plot_id}' of '{}'", kind.label(), farm.name);
    Some((
        Farm {
            logs,
            ..farm.clone()
        },
        entry,
    ))
}

/// Logs ordered newest first; entries sharing a date keep insertion order.
pub fn sorted_logs(farm: &Farm) -> Vec<ActivityLog> {
    let mut logs = farm.logs.clone();
    logs.sort_by(|a, b| b.date.cmp(&a.date));
    logs
}

pub fn last_watering(farm: &Farm, plot_id: &str) -> Option<NaiveDate> {
    farm.logs
        .iter()
        .filter(|l| l.plot_id == plot_id && l.kind == LogType::Watering)
        .map(|l| l.date)
        .max()
}

pub fn days_since(date: NaiveDate, today: NaiveDate) -> i64 {
    (today - date).num_days()
}
