use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

use crate::error::FarmError;
use crate::models::{
    crop::{Crop, CropStatus},
    Coordinate,
};

/// Compass orientation of the top edge of the grid. Display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

/// One edge of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    pub fn opposite(&self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    fn offset(&self) -> (i64, i64) {
        match self {
            Side::Top => (-1, 0),
            Side::Bottom => (1, 0),
            Side::Left => (0, -1),
            Side::Right => (0, 1),
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    pub id: String,
    pub row: usize,
    pub col: usize,
    pub crop: Option<Crop>,
    #[serde(default)]
    pub status: CropStatus,
    pub planted_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Id of the head plot this plot is merged into.
    pub merged_with: Option<String>,
    #[serde(default)]
    pub is_merge_start: bool,
    /// Number of plots in the group, head included. Heads only.
    pub merge_count: Option<usize>,
}

impl Plot {
    pub fn empty(id: impl Into<String>, row: usize, col: usize) -> Self {
        Self {
            id: id.into(),
            row,
            col,
            crop: None,
            status: CropStatus::Empty,
            planted_date: None,
            notes: None,
            merged_with: None,
            is_merge_start: false,
            merge_count: None,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.row, self.col)
    }

    /// Identity of the merge group this plot belongs to: its own id for a head,
    /// the head's id for a member, `None` when independent.
    pub fn group_id(&self) -> Option<&str> {
        if self.is_merge_start {
            Some(self.id.as_str())
        } else {
            self.merged_with.as_deref()
        }
    }

    pub fn is_merged(&self) -> bool {
        self.group_id().is_some()
    }

    /// Blanks cultivation state: no crop, empty status, no planting date.
    pub(crate) fn clear_cultivation(&mut self) {
        self.crop = None;
        self.status = CropStatus::Empty;
        self.planted_date = None;
    }

    pub(crate) fn clear_merge(&mut self) {
        self.is_merge_start = false;
        self.merge_count = None;
        self.merged_with = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Watering,
    Thinning,
    Fertilizing,
    Pesticide,
    Other,
}

impl LogType {
    pub fn label(&self) -> &'static str {
        match self {
            LogType::Watering => "watering",
            LogType::Thinning => "thinning",
            LogType::Fertilizing => "fertilizing / soil care",
            LogType::Pesticide => "pest and weed control",
            LogType::Other => "other",
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub plot_id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: LogType,
    pub notes: String,
    pub photos: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub plots: Vec<Plot>,
    #[serde(default)]
    pub logs: Vec<ActivityLog>,
    #[serde(default)]
    pub direction: Direction,
}

impl Farm {
    /// Builds an all-empty grid in row-major order. Plot ids are `{prefix}{row}-{col}`.
    pub fn new(name: impl Into<String>, rows: usize, cols: usize, id_prefix: &str) -> Self {
        let plots = (0..rows)
            .flat_map(|row| {
                (0..cols).map(move |col| Plot::empty(format!("{id_prefix}{row}-{col}"), row, col))
            })
            .collect();
        Self {
            name: name.into(),
            rows,
            cols,
            plots,
            logs: Vec::new(),
            direction: Direction::North,
        }
    }

    pub fn plot(&self, id: &str) -> Option<&Plot> {
        self.plots.iter().find(|p| p.id == id)
    }

    pub fn plot_at(&self, row: usize, col: usize) -> Option<&Plot> {
        self.plots.iter().find(|p| p.row == row && p.col == col)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.plot(id).is_some()
    }

    /// The plot across the given edge, if it lies inside the grid.
    pub fn neighbor(&self, plot: &Plot, side: Side) -> Option<&Plot> {
        let (dr, dc) = side.offset();
        let nr = plot.row as i64 + dr;
        let nc = plot.col as i64 + dc;
        if nr >= 0 && nr < self.rows as i64 && nc >= 0 && nc < self.cols as i64 {
            self.plot_at(nr as usize, nc as usize)
        } else {
            None
        }
    }

    pub fn neighbors(&self, plot: &Plot) -> Vec<&Plot> {
        Side::ALL
            .iter()
            .filter_map(|side| self.neighbor(plot, *side))
            .collect()
    }

    /// Plots whose `merged_with` points at `head_id`.
    pub fn members_of<'a>(&'a self, head_id: &'a str) -> impl Iterator<Item = &'a Plot> + 'a {
        self.plots
            .iter()
            .filter(move |p| p.merged_with.as_deref() == Some(head_id))
    }

    /// Actual size of a merge group, computed from membership rather than `merge_count`.
    pub fn group_size(&self, head_id: &str) -> usize {
        match self.plot(head_id) {
            Some(head) if head.is_merge_start => 1 + self.members_of(head_id).count(),
            _ => 0,
        }
    }

    /// Checks grid completeness and merge-group consistency.
    pub fn validate(&self) -> Result<(), FarmError> {
        let expected = self.rows * self.cols;
        if self.plots.len() != expected {
            return Err(FarmError::PlotCount {
                expected,
                found: self.plots.len(),
            });
        }

        let mut seen_ids = HashSet::new();
        let mut seen_cells = HashSet::new();
        for plot in &self.plots {
            if plot.row >= self.rows || plot.col >= self.cols {
                return Err(FarmError::OutOfBounds {
                    id: plot.id.clone(),
                    row: plot.row,
                    col: plot.col,
                });
            }
            if !seen_ids.insert(plot.id.as_str()) {
                return Err(FarmError::DuplicateId(plot.id.clone()));
            }
            if !seen_cells.insert(plot.coordinate()) {
                return Err(FarmError::DuplicateCell {
                    row: plot.row,
                    col: plot.col,
                });
            }
        }

        for plot in &self.plots {
            if let Some(head_id) = &plot.merged_with {
                if plot.is_merge_start {
                    return Err(FarmError::HeadAndMember(plot.id.clone()));
                }
                let head_ok = self.plot(head_id).is_some_and(|h| h.is_merge_start);
                if !head_ok {
                    return Err(FarmError::HeadlessMember {
                        id: plot.id.clone(),
                        head: head_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
