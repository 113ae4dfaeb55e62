//! Anonymous table objects and the table grid.
//!
//! [§ 17.2.1 Anonymous table objects](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes)
//!
//! "Document languages other than HTML may not contain all the elements in
//! the CSS 2.1 table model. In these cases, the 'missing' elements must be
//! assumed in order for the table model to work." The rules below are
//! applied bottom-up; every table then gets its anonymous wrapper box and
//! grid coordinates.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::style::{BorderCollapse, CaptionSide, ComputedStyle, Display, InternalDisplayType};

use super::boxes::{BoxKind, BoxRef, LayoutBox, TableData};
use super::collapse::collapse_table_borders;

/// [§ 17.2.1](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes)
///
/// Remove and add boxes according to the table model, for `b` and all of
/// its descendants. Existing table wrappers are left as they are, so the
/// pass can run more than once.
#[must_use]
pub fn anonymous_table_boxes(b: &BoxRef) -> BoxRef {
    if !b.is_parent() || b.flags.is_table_wrapper {
        return Arc::clone(b);
    }
    let children: Vec<BoxRef> = b.children.iter().map(anonymous_table_boxes).collect();
    let normalized = table_boxes_children(b, children);
    if !b.is_table() && same_children(&normalized.children, &b.children) {
        return Arc::clone(b);
    }
    normalized
}

/// "White space" per § 17.2.1: a text run of only tabs, line feeds,
/// form feeds, carriage returns and spaces.
fn is_whitespace(b: &LayoutBox) -> bool {
    b.text()
        .is_some_and(|text| text.trim_matches([' ', '\t', '\n', '\x0C', '\r']).is_empty())
}

fn same_children(a: &[BoxRef], b: &[BoxRef]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
}

/// Apply the table rules to `b` given its already normalized children.
fn table_boxes_children(b: &LayoutBox, mut children: Vec<BoxRef>) -> BoxRef {
    match b.kind {
        // STEP 1.1: "All child boxes of a 'table-column' parent are treated
        // as if they had 'display: none'."
        BoxKind::TableColumn { .. } => children.clear(),
        // STEP 1.2: "If a child C of a 'table-column-group' parent is not a
        // 'table-column' box, then it is treated as if it had 'display: none'."
        BoxKind::TableColumnGroup { span, .. } => {
            children.retain(|child| matches!(child.kind, BoxKind::TableColumn { .. }));
            // NOTE: a column group always ends up with at least one column.
            if children.is_empty() {
                children = (0..span)
                    .map(|_| Arc::new(LayoutBox::anonymous_from(b, BoxKind::column(), Vec::new())))
                    .collect();
            }
        }
        _ => {}
    }

    // STEP 1.3: "If a child C of a tabular container P is an anonymous inline
    // box that contains only white space, and its immediately preceding
    // sibling, if any, is a proper table child of P or a 'table-caption' or
    // internal table box, and its immediately following sibling, if any, is
    // a proper table child of P or a 'table-caption' or internal table box,
    // then it is treated as if it had 'display: none'."
    if b.is_tabular_container() && children.len() >= 2 {
        let last = children.len() - 1;
        if children[last - 1].is_internal_table_or_caption() && is_whitespace(&children[last]) {
            let _ = children.pop();
        }
        if children.len() >= 2 && children[1].is_internal_table_or_caption() && is_whitespace(&children[0]) {
            let _ = children.remove(0);
        }
    }

    // STEP 1.4: "If a box B is an anonymous inline containing only white
    // space, and is between two immediate siblings each of which is an
    // internal table box or a 'table-caption' box then B is treated as if
    // it had 'display: none'."
    let children: Vec<BoxRef> = children
        .iter()
        .enumerate()
        .filter(|&(index, child)| {
            let between_internal = index > 0
                && index + 1 < children.len()
                && children[index - 1].is_internal_table_or_caption()
                && children[index + 1].is_internal_table_or_caption();
            !(between_internal && is_whitespace(child))
        })
        .map(|(_, child)| Arc::clone(child))
        .collect();

    let mut children = children;
    if b.is_table() {
        // STEP 2.1: "If a child C of a 'table' or 'inline-table' box is not a
        // proper table child, then generate an anonymous 'table-row' box
        // around C and all consecutive siblings of C that are not proper
        // table children."
        children = wrap_improper(b, children, &BoxKind::TableRow, LayoutBox::is_proper_table_child);
    } else if matches!(b.kind, BoxKind::TableRowGroup { .. }) {
        // STEP 2.2: "If a child C of a row group box is not a 'table-row'
        // box, then generate an anonymous 'table-row' box around C and all
        // consecutive siblings of C that are not 'table-row' boxes."
        children = wrap_improper(b, children, &BoxKind::TableRow, |child| {
            matches!(child.kind, BoxKind::TableRow)
        });
    }

    if matches!(b.kind, BoxKind::TableRow) {
        // STEP 2.3: "If a child C of a 'table-row' box is not a 'table-cell',
        // then generate an anonymous 'table-cell' box around C and all
        // consecutive siblings of C that are not 'table-cell' boxes."
        children = wrap_improper(b, children, &BoxKind::cell(), |child| {
            matches!(child.kind, BoxKind::TableCell { .. })
        });
    } else {
        // STEP 3.1: "For each 'table-cell' box C in a sequence of
        // consecutive internal table and 'table-caption' siblings, if C's
        // parent is not a 'table-row' then generate an anonymous 'table-row'
        // box around C and all consecutive siblings of C that are
        // 'table-cell' boxes."
        children = wrap_improper(b, children, &BoxKind::TableRow, |child| {
            !matches!(child.kind, BoxKind::TableCell { .. })
        });
    }

    // STEP 3.2: "For each proper table child C, if C is misparented then
    // generate an anonymous 'table' or 'inline-table' box T around C and all
    // consecutive siblings of C that are proper table children. If C's
    // parent is an 'inline' box, then T must be an 'inline-table' box;
    // otherwise it must be a 'table' box."
    if matches!(b.kind, BoxKind::Inline) {
        children = wrap_improper(b, children, &BoxKind::InlineTable(TableData::default()), |child| {
            !child.is_proper_table_child()
        });
    } else {
        children = wrap_improper(b, children, &BoxKind::Table(TableData::default()), |child| {
            !child.is_proper_table_child() || child.is_proper_parent(b)
        });
    }

    if b.is_table() {
        return wrap_table(b, children);
    }
    Arc::new(b.with_children(children))
}

/// Wrap each run of consecutive children failing `is_proper` in an
/// anonymous `wrapper` box, normalized again with the table rules.
///
/// [§ 4 Flex Items](https://www.w3.org/TR/css-flexbox-1/#flex-items)
///
/// In a flex container the failing children are dropped instead: "the
/// display value of a flex item is blockified".
fn wrap_improper(
    parent: &LayoutBox,
    children: Vec<BoxRef>,
    wrapper: &BoxKind,
    is_proper: impl Fn(&LayoutBox) -> bool,
) -> Vec<BoxRef> {
    let mut out = Vec::with_capacity(children.len());
    let mut improper = Vec::new();
    let flush = |improper: &mut Vec<BoxRef>, out: &mut Vec<BoxRef>| {
        if !improper.is_empty() {
            let anonymous = LayoutBox::anonymous_from(parent, wrapper.clone(), Vec::new());
            out.push(table_boxes_children(&anonymous, std::mem::take(improper)));
        }
    };

    for child in children {
        if is_proper(&child) {
            flush(&mut improper, &mut out);
            out.push(child);
        } else if !parent.is_flex_container() {
            improper.push(child);
        }
    }
    flush(&mut improper, &mut out);
    out
}

/// Move the properties that apply to the wrapper from the table style to
/// the wrapper style, leaving their initial value on the table.
macro_rules! move_to_wrapper {
    ($wrapper:expr, $table:expr; $($field:ident),+ $(,)?) => {{
        let initial = ComputedStyle::default();
        $(
            $wrapper.$field = std::mem::replace(&mut $table.$field, initial.$field);
        )+
    }};
}

/// [§ 17.4 Tables in the visual formatting model](https://www.w3.org/TR/CSS2/tables.html#model)
///
/// Order the children of a table, assign grid coordinates to its columns
/// and cells, and return the table inside its anonymous wrapper box.
///
/// # Panics
///
/// Panics if `b` is not a table, or if a child is not a proper table child.
fn wrap_table(b: &LayoutBox, children: Vec<BoxRef>) -> BoxRef {
    assert!(b.is_table(), "wrap_table on a {} box", b.kind_name());

    // STEP 1: Group the children by type.
    let mut columns = Vec::new();
    let mut rows = Vec::new();
    let mut captions = Vec::new();
    for child in children {
        match child.kind {
            BoxKind::TableColumn { .. } | BoxKind::TableColumnGroup { .. } => columns.push(child),
            BoxKind::TableRow | BoxKind::TableRowGroup { .. } => rows.push(child),
            BoxKind::TableCaption => captions.push(child),
            _ => panic!("unexpected {} child in a table", child.kind_name()),
        }
    }

    // STEP 2: "The caption boxes are principal block-level boxes that
    // retain their own content, padding, margin, and border areas, and are
    // rendered as normal block boxes inside the table wrapper box."
    let (captions_top, captions_bottom): (Vec<BoxRef>, Vec<BoxRef>) = captions
        .into_iter()
        .partition(|caption| caption.style.caption_side == CaptionSide::Top);

    // STEP 3: Assign grid columns to column groups and columns.
    let mut grid_x = 0;
    let column_groups: Vec<BoxRef> = wrap_improper(b, columns, &BoxKind::column_group(), |child| {
        matches!(child.kind, BoxKind::TableColumnGroup { .. })
    })
    .into_iter()
    .map(|group| {
        let mut group = Arc::unwrap_or_clone(group);
        let group_x = grid_x;
        if group.children.is_empty() {
            if let BoxKind::TableColumnGroup { span, .. } = group.kind {
                grid_x += span;
            }
        } else {
            // The span of a group with columns is its column count; a
            // column's own span was expanded into copies by the builder.
            group.children = group
                .children
                .iter()
                .map(|column| {
                    let mut column = LayoutBox::clone(column);
                    if let BoxKind::TableColumn { grid_x: column_x, .. } = &mut column.kind {
                        *column_x = grid_x;
                    }
                    grid_x += 1;
                    Arc::new(column)
                })
                .collect();
        }
        let column_count = group.children.len();
        if let BoxKind::TableColumnGroup { span, grid_x } = &mut group.kind {
            *grid_x = group_x;
            if column_count > 0 {
                *span = column_count;
            }
        }
        Arc::new(group)
    })
    .collect();
    let mut grid_width = grid_x;

    // STEP 4: Wrap bare rows, then pull out the first header and footer.
    let mut header = None;
    let mut footer = None;
    let mut body = Vec::new();
    let row_groups = wrap_improper(b, rows, &BoxKind::row_group(), |child| {
        matches!(child.kind, BoxKind::TableRowGroup { .. })
    });
    for group in row_groups {
        match group.style.display {
            Display::Internal(InternalDisplayType::TableHeaderGroup) if header.is_none() => {
                header = Some(with_group_role(&group, true, false));
            }
            Display::Internal(InternalDisplayType::TableFooterGroup) if footer.is_none() => {
                footer = Some(with_group_role(&group, false, true));
            }
            _ => body.push(group),
        }
    }
    let mut row_groups: Vec<BoxRef> = header.into_iter().chain(body).chain(footer).collect();

    // STEP 5: Assign a grid column to each cell. "Cells may span several
    // rows or columns", but a rowspan never extends past its row group, so
    // each group is independent.
    let mut grid_height = 0;
    for group in &mut row_groups {
        let group = Arc::make_mut(group);
        let row_count = group.children.len();
        // Grid columns already taken by row-spanning cells, per row.
        let mut occupied: Vec<HashSet<usize>> = vec![HashSet::new(); row_count];
        for (row_index, row) in group.children.iter_mut().enumerate() {
            let row = Arc::make_mut(row);
            let mut grid_x = 0;
            for cell in &mut row.children {
                let cell = Arc::make_mut(cell);
                let BoxKind::TableCell {
                    colspan,
                    rowspan,
                    grid_x: cell_x,
                } = &mut cell.kind
                else {
                    panic!("table row child is not a cell");
                };
                while occupied[row_index].contains(&grid_x) {
                    grid_x += 1;
                }
                *cell_x = grid_x;
                let next_grid_x = grid_x + *colspan;
                if *rowspan != 1 {
                    // [HTML § 4.9.11 rowspan](https://html.spec.whatwg.org/multipage/tables.html#attr-tdth-rowspan)
                    // "The value zero means that the cell is to span all the
                    // remaining rows in the row group."
                    let max_rowspan = row_count - row_index;
                    *rowspan = if *rowspan == 0 { max_rowspan } else { (*rowspan).min(max_rowspan) };
                    for spanned in &mut occupied[row_index + 1..row_index + *rowspan] {
                        spanned.extend(grid_x..next_grid_x);
                    }
                }
                grid_x = next_grid_x;
                grid_width = grid_width.max(grid_x);
            }
        }
        grid_height += row_count;
    }

    // STEP 6: Build the table with row groups as children.
    let mut table = b.with_children(row_groups);
    if let Some(data) = table.table_data_mut() {
        data.column_groups = column_groups;
    }
    if table.style.border_collapse == BorderCollapse::Collapse {
        let borders = collapse_table_borders(&mut table, grid_width, grid_height);
        if let Some(data) = table.table_data_mut() {
            data.collapsed_borders = borders;
        }
    }

    // STEP 7: [§ 17.4](https://www.w3.org/TR/CSS2/tables.html#model)
    // "The table generates a principal block container box called the table
    // wrapper box that contains the table box itself and any caption boxes."
    let wrapper_kind = if matches!(b.kind, BoxKind::InlineTable(_)) {
        BoxKind::InlineBlock
    } else {
        BoxKind::Block
    };
    let mut wrapper = LayoutBox::anonymous_from(b, wrapper_kind, Vec::new());
    wrapper.flags.is_table_wrapper = true;

    // "The computed values of properties 'position', 'float', 'margin-*',
    // 'top', 'right', 'bottom', and 'left' on the table element are used on
    // the table wrapper box and not the table box; all other values of
    // non-inheritable properties are used on the table box and not the
    // table wrapper box."
    {
        let wrapper_style = wrapper.style_mut();
        let table_style = table.style_mut();
        move_to_wrapper!(
            wrapper_style, table_style;
            position, float, clear, z_index, top, right, bottom, left, margin, opacity,
            overflow, transform, transform_origin, vertical_align, break_before,
            break_after, break_inside, counter_reset, counter_set, counter_increment,
        );
    }

    debug!(grid_width, grid_height, tag = %b.element_tag, "wrapped table");
    wrapper.children = captions_top
        .into_iter()
        .chain(std::iter::once(Arc::new(table)))
        .chain(captions_bottom)
        .collect();
    Arc::new(wrapper)
}

fn with_group_role(group: &BoxRef, header: bool, footer: bool) -> BoxRef {
    let mut group = LayoutBox::clone(group);
    if let BoxKind::TableRowGroup { is_header, is_footer } = &mut group.kind {
        *is_header = header;
        *is_footer = footer;
    }
    Arc::new(group)
}
