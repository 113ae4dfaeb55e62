//! Integration tests for tables.
//!
//! [§ 17 Tables](https://www.w3.org/TR/CSS2/tables.html)

mod common;

use std::sync::Arc;

use common::{body_box, build, default_styles, html_document, styles_with, summary, text_content, text_element};
use quire_css::layout::{BoxKind, BoxRef, LayoutBox, anonymous_table_boxes};
use quire_css::style::{
    BorderCollapse, BorderStyle, BorderValue, CaptionSide, ColorValue, Display, Float, InternalDisplayType,
    Position, Sides,
};
use quire_dom::{DomTree, NodeId};

/// `<tr>` with one `<td>` per text.
fn row(tree: &mut DomTree, parent: NodeId, texts: &[&str]) -> NodeId {
    let tr = tree.append_element(parent, "tr", &[]);
    for text in texts {
        let _ = cell(tree, tr, text, &[]);
    }
    tr
}

fn cell(tree: &mut DomTree, tr: NodeId, text: &str, attrs: &[(&str, &str)]) -> NodeId {
    let td = tree.append_element(tr, "td", attrs);
    let _ = tree.append_text(td, text);
    td
}

/// The wrapper box of the first table in the body.
fn wrapper(root: &BoxRef) -> &BoxRef {
    let wrapper = &body_box(root).children[0];
    assert!(wrapper.flags.is_table_wrapper, "expected a table wrapper, got {}", wrapper.kind_name());
    wrapper
}

fn table_of(wrapper: &BoxRef) -> &BoxRef {
    wrapper
        .children
        .iter()
        .find(|child| child.is_table())
        .expect("wrapper should hold a table")
}

fn cell_grid_x(cell: &LayoutBox) -> (usize, usize, usize) {
    match cell.kind {
        BoxKind::TableCell {
            colspan,
            rowspan,
            grid_x,
        } => (grid_x, colspan, rowspan),
        _ => panic!("not a cell: {}", cell.kind_name()),
    }
}

#[test]
fn test_rows_get_anonymous_row_group() {
    let (mut tree, body) = html_document();
    let table = tree.append_element(body, "table", &[]);
    let _ = tree.append_text(table, "\n  ");
    let _ = row(&mut tree, table, &["a", "b"]);
    let _ = tree.append_text(table, "\n");
    let root = build(&tree, &default_styles(&tree));

    let wrapper = wrapper(&root);
    assert!(matches!(wrapper.kind, BoxKind::Block));
    let table = table_of(wrapper);
    assert_eq!(table.children.len(), 1, "white space between rows is dropped");
    let group = &table.children[0];
    assert!(group.flags.is_anonymous);
    assert!(matches!(group.kind, BoxKind::TableRowGroup { is_header: false, is_footer: false }));
    assert_eq!(text_content(group), "ab");
}

#[test]
fn test_captions_are_placed_around_the_table() {
    let (mut tree, body) = html_document();
    let table = tree.append_element(body, "table", &[]);
    let _ = text_element(&mut tree, table, "caption", "below");
    let _ = row(&mut tree, table, &["a"]);
    let _ = text_element(&mut tree, table, "caption", "above");
    let mut styles = default_styles(&tree);
    let first_caption = tree.children(table)[0];
    let _ = styles.update(first_caption, None, |style| style.caption_side = CaptionSide::Bottom);
    let root = build(&tree, &styles);

    let wrapper = wrapper(&root);
    let kinds: Vec<&str> = wrapper.children.iter().map(|child| child.kind_name()).collect();
    assert_eq!(kinds, ["TableCaption", "Table", "TableCaption"]);
    assert_eq!(text_content(&wrapper.children[0]), "above");
    assert_eq!(text_content(&wrapper.children[2]), "below");
}

#[test]
fn test_header_and_footer_groups_are_reordered() {
    let (mut tree, body) = html_document();
    let table = tree.append_element(body, "table", &[]);
    for (tag, text) in [("tfoot", "foot"), ("tbody", "body"), ("thead", "head"), ("thead", "second head")] {
        let group = tree.append_element(table, tag, &[]);
        let _ = row(&mut tree, group, &[text]);
    }
    let root = build(&tree, &default_styles(&tree));

    let table = table_of(wrapper(&root));
    let texts: Vec<String> = table.children.iter().map(|group| text_content(group)).collect();
    assert_eq!(texts, ["head", "body", "second head", "foot"]);
    assert!(matches!(table.children[0].kind, BoxKind::TableRowGroup { is_header: true, is_footer: false }));
    assert!(matches!(table.children[2].kind, BoxKind::TableRowGroup { is_header: false, is_footer: false }));
    assert!(matches!(table.children[3].kind, BoxKind::TableRowGroup { is_header: false, is_footer: true }));
}

#[test]
fn test_cell_grid_positions_with_spans() {
    let (mut tree, body) = html_document();
    let table = tree.append_element(body, "table", &[]);
    let first = tree.append_element(table, "tr", &[]);
    let _ = cell(&mut tree, first, "a", &[("rowspan", "2")]);
    let _ = cell(&mut tree, first, "b", &[("colspan", "2")]);
    let _ = cell(&mut tree, first, "c", &[]);
    let second = tree.append_element(table, "tr", &[]);
    let _ = cell(&mut tree, second, "d", &[]);
    let _ = cell(&mut tree, second, "e", &[("rowspan", "0")]);
    let third = tree.append_element(table, "tr", &[]);
    let _ = cell(&mut tree, third, "f", &[("colspan", "0")]);
    let _ = cell(&mut tree, third, "g", &[("rowspan", "5")]);
    let root = build(&tree, &default_styles(&tree));

    let group = &table_of(wrapper(&root)).children[0];
    let grid: Vec<Vec<(usize, usize, usize)>> = group
        .children
        .iter()
        .map(|row| row.children.iter().map(|cell| cell_grid_x(cell)).collect())
        .collect();
    assert_eq!(
        grid,
        [
            vec![(0, 1, 2), (1, 2, 1), (3, 1, 1)],
            // "d" skips the column taken by "a".
            vec![(1, 1, 1), (2, 1, 2)],
            // colspan="0" is invalid and ignored; rowspans stop at the group end.
            vec![(0, 1, 1), (1, 1, 1)],
        ]
    );
}

#[test]
fn test_zero_rowspan_covers_the_row_group() {
    let (mut tree, body) = html_document();
    let table = tree.append_element(body, "table", &[]);
    let tbody = tree.append_element(table, "tbody", &[]);
    let first = tree.append_element(tbody, "tr", &[]);
    let _ = cell(&mut tree, first, "a", &[("rowspan", "0")]);
    let _ = cell(&mut tree, first, "b", &[]);
    for text in ["c", "d", "e"] {
        let _ = row(&mut tree, tbody, &[text]);
    }
    let root = build(&tree, &default_styles(&tree));

    let group = &table_of(wrapper(&root)).children[0];
    assert_eq!(group.children.len(), 4);
    assert_eq!(cell_grid_x(&group.children[0].children[0]), (0, 1, 4));
    for row in &group.children[1..] {
        assert_eq!(cell_grid_x(&row.children[0]), (1, 1, 1), "column 0 is taken by the spanning cell");
    }
}

#[test]
fn test_column_groups_and_columns() {
    let (mut tree, body) = html_document();
    let table = tree.append_element(body, "table", &[]);
    let _ = tree.append_element(table, "colgroup", &[("span", "3")]);
    let group = tree.append_element(table, "colgroup", &[("span", "7")]);
    let _ = tree.append_element(group, "col", &[("span", "2")]);
    let _ = tree.append_element(group, "col", &[]);
    let _ = tree.append_element(table, "col", &[]);
    let _ = row(&mut tree, table, &["a"]);
    let root = build(&tree, &default_styles(&tree));

    let table = table_of(wrapper(&root));
    let data = table.table_data().unwrap();
    let groups: Vec<(usize, usize, usize)> = data
        .column_groups
        .iter()
        .map(|group| match group.kind {
            BoxKind::TableColumnGroup { span, grid_x } => (grid_x, span, group.children.len()),
            _ => panic!("not a column group"),
        })
        .collect();
    assert_eq!(groups, [(0, 3, 3), (3, 3, 3), (6, 1, 1)]);
    assert!(data.column_groups[2].flags.is_anonymous, "a bare column gets a group");

    let columns: Vec<usize> = data.column_groups[1]
        .children
        .iter()
        .map(|column| match column.kind {
            BoxKind::TableColumn { grid_x, span } => {
                assert_eq!(span, 1);
                grid_x
            }
            _ => panic!("not a column"),
        })
        .collect();
    assert_eq!(columns, [3, 4, 5]);
}

#[test]
fn test_stray_cells_get_anonymous_table() {
    let (mut tree, body) = html_document();
    let _ = text_element(&mut tree, body, "div", "one");
    let _ = text_element(&mut tree, body, "div", "two");
    let styles = styles_with(&tree, |_, element, style| {
        if element.tag_name == "div" {
            style.display = Display::Internal(InternalDisplayType::TableCell);
        }
    });
    let root = build(&tree, &styles);

    let wrapper = wrapper(&root);
    assert!(wrapper.flags.is_anonymous);
    let table = table_of(wrapper);
    assert!(table.flags.is_anonymous);
    let row = &table.children[0].children[0];
    assert!(matches!(row.kind, BoxKind::TableRow));
    assert_eq!(row.children.len(), 2);
    assert_eq!(text_content(row), "onetwo");
}

#[test]
fn test_inline_table_gets_inline_block_wrapper() {
    let (mut tree, body) = html_document();
    let p = tree.append_element(body, "p", &[]);
    let _ = tree.append_text(p, "before ");
    let span = tree.append_element(p, "span", &[]);
    let _ = row(&mut tree, span, &["cell"]);
    let styles = styles_with(&tree, |node, _, style| {
        if node == span {
            style.display = Display::inline_table();
        }
    });
    let root = build(&tree, &styles);

    let line = &body_box(&root).children[0].children[0];
    assert!(matches!(line.kind, BoxKind::Line));
    let wrapper = &line.children[1];
    assert!(wrapper.flags.is_table_wrapper);
    assert!(matches!(wrapper.kind, BoxKind::InlineBlock));
    assert!(matches!(wrapper.children[0].kind, BoxKind::InlineTable(_)));
}

#[test]
fn test_positioning_moves_to_wrapper() {
    let (mut tree, body) = html_document();
    let table = tree.append_element(body, "table", &[]);
    let _ = row(&mut tree, table, &["a"]);
    let styles = styles_with(&tree, |node, _, style| {
        if node == table {
            style.position = Position::Relative;
            style.float = Float::Left;
            style.border = Sides::all(BorderValue::new(1.0, BorderStyle::Solid, ColorValue::BLACK));
        }
    });
    let root = build(&tree, &styles);

    let wrapper = &body_box(&root).children[0];
    assert!(wrapper.flags.is_table_wrapper);
    assert_eq!(wrapper.style.position, Position::Relative);
    assert_eq!(wrapper.style.float, Float::Left);
    let table = table_of(wrapper);
    assert_eq!(table.style.position, Position::Static);
    assert_eq!(table.style.float, Float::None);
    assert_eq!(table.style.border.top.width, 1.0, "borders stay on the table");
}

#[test]
fn test_collapsed_borders() {
    let (mut tree, body) = html_document();
    let table = tree.append_element(body, "table", &[]);
    let _ = row(&mut tree, table, &["a", "b"]);
    let styles = styles_with(&tree, |_, element, style| match element.tag_name.as_str() {
        "table" => {
            style.border_collapse = BorderCollapse::Collapse;
            style.border = Sides::all(BorderValue::new(4.0, BorderStyle::Solid, ColorValue::BLACK));
        }
        "td" => style.border = Sides::all(BorderValue::new(2.0, BorderStyle::Dashed, ColorValue::WHITE)),
        _ => {}
    });
    let root = build(&tree, &styles);

    let table = table_of(wrapper(&root));
    let borders = table.table_data().unwrap().collapsed_borders.as_ref().unwrap();
    assert_eq!(borders.vertical.len(), 1);
    assert_eq!(borders.vertical[0].len(), 3);
    assert_eq!(borders.horizontal.len(), 2);

    // The wider table border wins on the outside, the cells inside.
    assert_eq!(borders.vertical[0][0].width, 4.0);
    assert_eq!(borders.vertical[0][0].style, BorderStyle::Solid);
    assert_eq!(borders.vertical[0][1].width, 2.0);
    assert_eq!(borders.vertical[0][1].style, BorderStyle::Dashed);
    assert_eq!(borders.vertical[0][1].color, ColorValue::WHITE);

    // Boxes keep transparent borders of half the winning width.
    assert_eq!(table.style.border.left.width, 2.0);
    assert!(table.style.border.left.color.is_transparent());
    let first_cell = &table.children[0].children[0].children[0];
    assert_eq!(first_cell.style.border.left.width, 2.0);
    assert_eq!(first_cell.style.border.right.width, 1.0);
}

#[test]
fn test_stray_row_normalizes_once() {
    let (mut tree, body) = html_document();
    let div = tree.append_element(body, "div", &[]);
    let tr = tree.append_element(div, "div", &[]);
    let td = text_element(&mut tree, tr, "div", "cell");
    let styles = styles_with(&tree, |node, _, style| {
        if node == tr {
            style.display = Display::Internal(InternalDisplayType::TableRow);
        } else if node == td {
            style.display = Display::Internal(InternalDisplayType::TableCell);
        }
    });
    let root = build(&tree, &styles);

    let div = &body_box(&root).children[0];
    let wrapper = &div.children[0];
    assert!(wrapper.flags.is_table_wrapper);
    let table = table_of(wrapper);
    assert!(table.flags.is_anonymous);
    let row = &table.children[0].children[0];
    assert!(matches!(row.kind, BoxKind::TableRow));
    assert!(!row.flags.is_anonymous, "the element's own row is kept");
    assert_eq!(text_content(row), "cell");

    let again = anonymous_table_boxes(&root);
    assert!(Arc::ptr_eq(&again, &root), "a second run should change nothing");
    assert_eq!(summary(&again), summary(&root));
}

#[test]
fn test_collapsed_border_conflicts_between_neighbours() {
    let (mut tree, body) = html_document();
    let table = tree.append_element(body, "table", &[]);
    let tr = tree.append_element(table, "tr", &[]);
    let a = cell(&mut tree, tr, "a", &[]);
    let b = cell(&mut tree, tr, "b", &[]);
    let tr = tree.append_element(table, "tr", &[]);
    let c = cell(&mut tree, tr, "c", &[]);
    let d = cell(&mut tree, tr, "d", &[]);
    let red = ColorValue { r: 255, g: 0, b: 0, a: 255 };
    let styles = styles_with(&tree, |node, element, style| {
        if element.tag_name == "table" {
            style.border_collapse = BorderCollapse::Collapse;
        } else if node == a {
            style.border.right = BorderValue::new(3.0, BorderStyle::Solid, ColorValue::BLACK);
            style.border.bottom = BorderValue::new(1.0, BorderStyle::Groove, ColorValue::BLACK);
        } else if node == b {
            style.border.left = BorderValue::new(5.0, BorderStyle::Double, red);
            style.border.bottom = BorderValue::new(1.0, BorderStyle::Hidden, ColorValue::BLACK);
        } else if node == c {
            style.border.top = BorderValue::new(1.0, BorderStyle::Ridge, red);
            style.border.right = BorderValue::new(2.0, BorderStyle::Solid, ColorValue::BLACK);
        } else if node == d {
            style.border.top = BorderValue::new(10.0, BorderStyle::Solid, red);
            style.border.left = BorderValue::new(2.0, BorderStyle::Dotted, red);
        }
    });
    let root = build(&tree, &styles);
    let borders = table_of(wrapper(&root)).table_data().unwrap().collapsed_borders.clone().unwrap();

    // Wider wins, from the later cell.
    assert_eq!(borders.vertical[0][1].width, 5.0);
    assert_eq!(borders.vertical[0][1].style, BorderStyle::Double);
    assert_eq!(borders.vertical[0][1].color, red);
    // Same width: solid ranks above dotted, from the earlier cell.
    assert_eq!(borders.vertical[1][1].style, BorderStyle::Solid);
    assert_eq!(borders.vertical[1][1].color, ColorValue::BLACK);
    // Same width: ridge ranks above groove.
    assert_eq!(borders.horizontal[1][0].style, BorderStyle::Ridge);
    assert_eq!(borders.horizontal[1][0].color, red);
    // Hidden suppresses even a wider border.
    assert_eq!(borders.horizontal[1][1].style, BorderStyle::Hidden);
    assert_eq!(borders.horizontal[1][1].width, 0.0);

    let rebuilt = build(&tree, &styles);
    let rebuilt_borders = table_of(wrapper(&rebuilt)).table_data().unwrap().collapsed_borders.clone();
    assert_eq!(rebuilt_borders, Some(borders), "resolution is deterministic");
}
