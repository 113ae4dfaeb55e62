//! The collapsing border model.
//!
//! [§ 17.6.2 The collapsing border model](https://www.w3.org/TR/CSS2/tables.html#collapsing-borders)
//!
//! "In the collapsing border model, it is possible to specify borders that
//! surround all or part of a cell, row, row group, column, and column
//! group." Conflicts are resolved once per table into two grids of edges;
//! the boxes themselves are left with transparent borders of half the
//! winning width so that layout reserves the right amount of room.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::style::{BorderStyle, BorderValue, ColorValue, ComputedStyle, Side};

use super::boxes::{BoxKind, LayoutBox};

/// Conflict resolution key, compared lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Score {
    hidden: u8,
    width: f32,
    rank: u8,
}

impl Score {
    fn is_lower(self, other: Self) -> bool {
        (self.hidden, self.width, self.rank) < (other.hidden, other.width, other.rank)
    }
}

/// [§ 17.6.2.1 Border conflict resolution](https://www.w3.org/TR/CSS2/tables.html#border-conflict-resolution)
///
/// "If border styles differ only in color ... in order of preference:
/// 'double', 'solid', 'dashed', 'dotted', 'ridge', 'outset', 'groove', and
/// the lowest: 'inset'." `hidden` beats everything, `none` loses to all.
const fn style_rank(style: BorderStyle) -> u8 {
    match style {
        BorderStyle::Hidden => 9,
        BorderStyle::Double => 8,
        BorderStyle::Solid => 7,
        BorderStyle::Dashed => 6,
        BorderStyle::Dotted => 5,
        BorderStyle::Ridge => 4,
        BorderStyle::Outset => 3,
        BorderStyle::Groove => 2,
        BorderStyle::Inset => 1,
        BorderStyle::None => 0,
    }
}

/// One resolved edge of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollapsedBorder {
    /// Winning style; `inset` and `outset` are stored as `ridge` and `groove`.
    pub style: BorderStyle,
    /// Winning width.
    pub width: f32,
    /// Winning color.
    pub color: ColorValue,
    #[serde(skip)]
    score: Score,
}

impl CollapsedBorder {
    /// "none" with the lowest score: any border wins over it.
    const WEAK_NONE: Self = Self {
        style: BorderStyle::None,
        width: 0.0,
        color: ColorValue::TRANSPARENT,
        score: Score {
            hidden: 0,
            width: 0.0,
            rank: 0,
        },
    };

    /// "hidden" that no border can win over.
    const STRONG_HIDDEN: Self = Self {
        style: BorderStyle::Hidden,
        width: 0.0,
        color: ColorValue::TRANSPARENT,
        score: Score {
            hidden: 1,
            width: 0.0,
            rank: style_rank(BorderStyle::Hidden),
        },
    };

    fn from_border(border: &BorderValue) -> Self {
        let width = border.used_width();
        // In the collapsing model "'inset' means the same as 'ridge'" and
        // "'outset' means the same as 'groove'".
        let style = match border.style {
            BorderStyle::Inset => BorderStyle::Ridge,
            BorderStyle::Outset => BorderStyle::Groove,
            other => other,
        };
        Self {
            style,
            width,
            color: border.color,
            score: Score {
                hidden: u8::from(border.style == BorderStyle::Hidden),
                width,
                rank: style_rank(border.style),
            },
        }
    }
}

/// Resolved border grids of a table.
///
/// `vertical[row][col]` is the edge left of grid column `col` (there are
/// `width + 1` per row); `horizontal[row][col]` is the edge above grid row
/// `row` (there are `height + 1` rows of them).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollapsedBorders {
    /// Vertical edges, `height` rows of `width + 1`.
    pub vertical: Vec<Vec<CollapsedBorder>>,
    /// Horizontal edges, `height + 1` rows of `width`.
    pub horizontal: Vec<Vec<CollapsedBorder>>,
}

impl CollapsedBorders {
    fn new(grid_width: usize, grid_height: usize) -> Self {
        Self {
            vertical: vec![vec![CollapsedBorder::WEAK_NONE; grid_width + 1]; grid_height],
            horizontal: vec![vec![CollapsedBorder::WEAK_NONE; grid_width]; grid_height + 1],
        }
    }

    /// A later writer only wins with a strictly higher score, so that in a
    /// tie the earlier, more specific box keeps the edge.
    fn set_one(slot: &mut CollapsedBorder, border: &BorderValue) {
        let candidate = CollapsedBorder::from_border(border);
        if slot.score.is_lower(candidate.score) {
            *slot = candidate;
        }
    }

    fn set_borders(&mut self, style: &ComputedStyle, x: usize, y: usize, w: usize, h: usize) {
        for row in &mut self.vertical[y..y + h] {
            Self::set_one(&mut row[x], &style.border.left);
            Self::set_one(&mut row[x + w], &style.border.right);
        }
        for slot in &mut self.horizontal[y][x..x + w] {
            Self::set_one(slot, &style.border.top);
        }
        for slot in &mut self.horizontal[y + h][x..x + w] {
            Self::set_one(slot, &style.border.bottom);
        }
    }

    fn max_vertical_width(&self, x: usize, y: usize, h: usize) -> f32 {
        self.vertical[y..y + h]
            .iter()
            .map(|row| row[x].width)
            .fold(0.0, f32::max)
    }

    fn max_horizontal_width(&self, x: usize, y: usize, w: usize) -> f32 {
        self.horizontal[y][x..x + w]
            .iter()
            .map(|edge| edge.width)
            .fold(0.0, f32::max)
    }
}

fn set_transparent_border(style: &mut ComputedStyle, side: Side, twice_width: f32) {
    *style.border.get_mut(side) = BorderValue::new(twice_width / 2.0, BorderStyle::Solid, ColorValue::TRANSPARENT);
}

fn remove_borders(style: &mut ComputedStyle) {
    for side in [Side::Top, Side::Right, Side::Bottom, Side::Left] {
        set_transparent_border(style, side, 0.0);
    }
}

fn cell_slots(cell: &LayoutBox) -> (usize, usize, usize) {
    match cell.kind {
        BoxKind::TableCell {
            colspan,
            rowspan,
            grid_x,
        } => (grid_x, colspan, rowspan),
        _ => panic!("table row child is not a cell: {}", cell.kind_name()),
    }
}

/// [§ 17.6.2.1 Border conflict resolution](https://www.w3.org/TR/CSS2/tables.html#border-conflict-resolution)
///
/// Resolve the borders of a wrapped table whose children are row groups
/// with grid coordinates assigned. Sets the collapsed border widths on the
/// table, cells, rows, row groups, columns and column groups, and returns
/// the grids, or `None` for an empty grid.
pub fn collapse_table_borders(table: &mut LayoutBox, grid_width: usize, grid_height: usize) -> Option<CollapsedBorders> {
    if grid_width == 0 || grid_height == 0 {
        return None;
    }
    let mut grids = CollapsedBorders::new(grid_width, grid_height);

    // "A style set on a cell wins over one on a row, which wins over a row
    // group, column, column group and, lastly, table."

    // STEP 1: Cells, with no edges inside a spanning cell.
    let mut grid_y = 0;
    for group in &table.children {
        for row in &group.children {
            for cell in &row.children {
                let (grid_x, colspan, rowspan) = cell_slots(cell);
                for row_edges in &mut grids.vertical[grid_y..grid_y + rowspan] {
                    for edge in &mut row_edges[grid_x + 1..grid_x + colspan] {
                        *edge = CollapsedBorder::STRONG_HIDDEN;
                    }
                }
                for row_edges in &mut grids.horizontal[grid_y + 1..grid_y + rowspan] {
                    for edge in &mut row_edges[grid_x..grid_x + colspan] {
                        *edge = CollapsedBorder::STRONG_HIDDEN;
                    }
                }
                grids.set_borders(&cell.style, grid_x, grid_y, colspan, rowspan);
            }
            grid_y += 1;
        }
    }

    // STEP 2: Rows.
    let mut grid_y = 0;
    for group in &table.children {
        for row in &group.children {
            grids.set_borders(&row.style, 0, grid_y, grid_width, 1);
            grid_y += 1;
        }
    }

    // STEP 3: Row groups.
    let mut grid_y = 0;
    for group in &table.children {
        let rows = group.children.len();
        grids.set_borders(&group.style, 0, grid_y, grid_width, rows);
        grid_y += rows;
    }

    // STEP 4: Columns, then column groups.
    let column_groups = table.table_data().map(|data| data.column_groups.clone()).unwrap_or_default();
    for group in &column_groups {
        for column in &group.children {
            if let BoxKind::TableColumn { grid_x, .. } = column.kind {
                grids.set_borders(&column.style, grid_x, 0, 1, grid_height);
            }
        }
    }
    for group in &column_groups {
        if let BoxKind::TableColumnGroup { span, grid_x } = group.kind {
            grids.set_borders(&group.style, grid_x, 0, span, grid_height);
        }
    }

    // STEP 5: The table.
    grids.set_borders(&table.style, 0, 0, grid_width, grid_height);

    // STEP 6: Give every box transparent borders of the resolved widths;
    // the grid is painted separately.
    let mut grid_y = 0;
    for group in &mut table.children {
        let group = Arc::make_mut(group);
        remove_borders(group.style_mut());
        for row in &mut group.children {
            let row = Arc::make_mut(row);
            remove_borders(row.style_mut());
            for cell in &mut row.children {
                let cell = Arc::make_mut(cell);
                let (grid_x, colspan, rowspan) = cell_slots(cell);
                let top = grids.max_horizontal_width(grid_x, grid_y, colspan);
                let bottom = grids.max_horizontal_width(grid_x, grid_y + rowspan, colspan);
                let left = grids.max_vertical_width(grid_x, grid_y, rowspan);
                let right = grids.max_vertical_width(grid_x + colspan, grid_y, rowspan);
                let style = cell.style_mut();
                set_transparent_border(style, Side::Top, top);
                set_transparent_border(style, Side::Bottom, bottom);
                set_transparent_border(style, Side::Left, left);
                set_transparent_border(style, Side::Right, right);
            }
            grid_y += 1;
        }
    }

    if let Some(data) = table.table_data_mut() {
        for group in &mut data.column_groups {
            let group = Arc::make_mut(group);
            remove_borders(group.style_mut());
            for column in &mut group.children {
                remove_borders(Arc::make_mut(column).style_mut());
            }
        }
    }

    let top = grids.max_horizontal_width(0, 0, grid_width);
    let bottom = grids.max_horizontal_width(0, grid_height, grid_width);
    // "UAs must compute an initial left and right border width for the
    // table by examining the first and last cells in the first row of the
    // table."
    let left = grids.max_vertical_width(0, 0, 1);
    let right = grids.max_vertical_width(grid_width, 0, 1);
    let style = table.style_mut();
    set_transparent_border(style, Side::Top, top);
    set_transparent_border(style, Side::Bottom, bottom);
    set_transparent_border(style, Side::Left, left);
    set_transparent_border(style, Side::Right, right);

    debug!(grid_width, grid_height, "collapsed table borders");
    Some(grids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_wins_over_wider() {
        let wide = CollapsedBorder::from_border(&BorderValue::new(10.0, BorderStyle::Double, ColorValue::BLACK));
        let hidden = CollapsedBorder::from_border(&BorderValue::new(1.0, BorderStyle::Hidden, ColorValue::BLACK));
        assert!(wide.score.is_lower(hidden.score));
        assert_eq!(hidden.width, 0.0, "hidden borders have no used width");
    }

    #[test]
    fn test_width_then_style_rank() {
        let thin_double = CollapsedBorder::from_border(&BorderValue::new(1.0, BorderStyle::Double, ColorValue::BLACK));
        let thick_dotted = CollapsedBorder::from_border(&BorderValue::new(2.0, BorderStyle::Dotted, ColorValue::BLACK));
        let thick_solid = CollapsedBorder::from_border(&BorderValue::new(2.0, BorderStyle::Solid, ColorValue::BLACK));
        assert!(thin_double.score.is_lower(thick_dotted.score));
        assert!(thick_dotted.score.is_lower(thick_solid.score));
        assert!(!thick_solid.score.is_lower(thick_solid.score), "ties keep the earlier edge");
    }

    #[test]
    fn test_inset_outset_are_stored_as_ridge_groove() {
        let inset = CollapsedBorder::from_border(&BorderValue::new(1.0, BorderStyle::Inset, ColorValue::BLACK));
        let outset = CollapsedBorder::from_border(&BorderValue::new(1.0, BorderStyle::Outset, ColorValue::BLACK));
        assert_eq!(inset.style, BorderStyle::Ridge);
        assert_eq!(outset.style, BorderStyle::Groove);
        assert_eq!(inset.score.rank, 1, "inset keeps its own rank");
    }
}
