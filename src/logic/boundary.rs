use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::farm::{Farm, Plot, Side};

/// Which edges of a cell should be drawn without a border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HiddenBorders {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl HiddenBorders {
    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }

    fn set(&mut self, side: Side, hidden: bool) {
        match side {
            Side::Top => self.top = hidden,
            Side::Bottom => self.bottom = hidden,
            Side::Left => self.left = hidden,
            Side::Right => self.right = hidden,
        }
    }
}

/// True when the neighbour across `side` belongs to the same merge group as `plot`.
pub fn is_boundary_hidden(farm: &Farm, plot: &Plot, side: Side) -> bool {
    let Some(group) = plot.group_id() else {
        return false;
    };
    farm.neighbor(plot, side)
        .is_some_and(|adj| adj.group_id() == Some(group))
}

/// Same as [`is_boundary_hidden`], but also hides the edge between two plots that
/// are both in a pending merge selection.
pub fn is_boundary_hidden_with_selection(
    farm: &Farm,
    plot: &Plot,
    side: Side,
    selection: &HashSet<String>,
) -> bool {
    if is_boundary_hidden(farm, plot, side) {
        return true;
    }
    selection.contains(&plot.id)
        && farm
            .neighbor(plot, side)
            .is_some_and(|adj| selection.contains(&adj.id))
}

pub fn hidden_borders(farm: &Farm, plot: &Plot, selection: Option<&HashSet<String>>) -> HiddenBorders {
    let mut borders = HiddenBorders::default();
    for side in Side::ALL {
        let hidden = match selection {
            Some(sel) => is_boundary_hidden_with_selection(farm, plot, side, sel),
            None => is_boundary_hidden(farm, plot, side),
        };
        borders.set(side, hidden);
    }
    borders
}
