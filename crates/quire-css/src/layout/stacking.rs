//! CSS Stacking Contexts and Painting Order.
//!
//! [§ 9.9 Layered presentation](https://www.w3.org/TR/CSS2/visuren.html#layers)
//!
//! "An element in CSS 2 may have a stack level, which describes its position
//! within a set of elements sharing the same stacking context."
//!
//! [CSS 2.1 Appendix E: Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)

use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::style::{ComputedStyle, Overflow, ZIndex};

use super::boxes::{BoxKind, BoxRef, LayoutBox};

/// A stacking context in the CSS painting order.
///
/// [§ Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
///
/// "Each box belongs to one stacking context. Each positioned box in a given
/// stacking context has an integer stack level, which is its position on the
/// z-axis relative to other stack levels within the same stacking context."
///
/// `layout_box` is the box forming the context, with the boxes of its child
/// contexts removed from its subtree.
#[derive(Debug, Clone)]
pub struct StackingContext {
    /// The box forming this context.
    pub layout_box: BoxRef,
    /// The stack level of this context (from z-index, `auto` being 0).
    pub z_index: i32,
    /// Child contexts with negative stack levels, most negative first.
    pub negative_z: Vec<StackingContext>,
    /// Child contexts with stack level 0, in tree order.
    pub zero_z: Vec<StackingContext>,
    /// Child contexts with positive stack levels, least positive first.
    pub positive_z: Vec<StackingContext>,
    /// Non-positioned floats.
    pub floats: Vec<StackingContext>,
    /// In-flow, non-positioned block-level descendants.
    pub block_level_boxes: Vec<BoxRef>,
    /// Block-level descendants and table cells, whose lines are painted in
    /// the inline content step.
    pub blocks_and_cells: Vec<BoxRef>,
    /// Contexts of inline-block and inline-flex descendants. Their boxes
    /// stay in the tree and are painted where they appear in their line.
    pub inline_contexts: Vec<StackingContext>,
}

/// One step of the painting order.
#[derive(Debug, Clone, Serialize)]
pub enum PaintStep {
    /// Enter a stacking context (group for opacity, transform).
    PushContext(BoxRef),
    /// Paint the background and borders of a box.
    BackgroundAndBorder(BoxRef),
    /// Paint a Text box.
    Text(BoxRef),
    /// Paint the content of a replaced box.
    Replaced(BoxRef),
    /// Paint the outline of a box.
    Outline(BoxRef),
    /// Leave the stacking context opened by the matching push.
    PopContext(BoxRef),
}

impl PaintStep {
    /// The box painted by this step.
    #[must_use]
    pub fn layout_box(&self) -> &LayoutBox {
        match self {
            Self::PushContext(b)
            | Self::BackgroundAndBorder(b)
            | Self::Text(b)
            | Self::Replaced(b)
            | Self::Outline(b)
            | Self::PopContext(b) => b,
        }
    }
}

/// [§ 9.9.1 'z-index'](https://www.w3.org/TR/CSS2/visuren.html#z-index)
/// and [CSS Color 4 § 'opacity'](https://www.w3.org/TR/css-color-4/#transparency):
/// "Since an element with opacity less than 1 is composited from a single
/// offscreen image, content outside of it cannot be layered in z-order
/// between pieces of content inside of it".
fn establishes_context(style: &ComputedStyle) -> bool {
    (style.is_positioned() && style.z_index != ZIndex::Auto)
        || style.opacity < 1.0
        || !style.transform.is_empty()
        || style.overflow != Overflow::Visible
}

/// Boxes and contexts collected while dispatching the subtree of one
/// context.
#[derive(Default)]
struct Dispatch {
    block_level_boxes: Vec<BoxRef>,
    blocks_and_cells: Vec<BoxRef>,
    floats: Vec<StackingContext>,
    inline_contexts: Vec<StackingContext>,
}

impl Dispatch {
    /// Route `b` to a context list or to the block lists. Returns the box
    /// to keep in the tree, if any.
    fn dispatch(&mut self, b: &BoxRef, child_contexts: &mut Vec<StackingContext>) -> Option<BoxRef> {
        if establishes_context(&b.style) {
            // This box defines a new stacking context, remove it from the
            // "normal" children list.
            child_contexts.push(StackingContext::from_box(b));
            return None;
        }

        if b.style.is_positioned() {
            // "treat the element as if it created a new stacking context,
            // but any positioned descendants and descendants which actually
            // create a new stacking context should be considered part of the
            // parent stacking context, not this new one."
            let index = child_contexts.len();
            let context = StackingContext::build(b, Some(&mut *child_contexts));
            child_contexts.insert(index, context);
            return None;
        }

        if b.is_floated() {
            let context = StackingContext::build(b, Some(&mut *child_contexts));
            self.floats.push(context);
            return None;
        }

        if matches!(b.kind, BoxKind::InlineBlock | BoxKind::InlineFlex) {
            let context = StackingContext::build(b, Some(&mut *child_contexts));
            let kept = Arc::clone(&context.layout_box);
            self.inline_contexts.push(context);
            return Some(kept);
        }

        // Record the positions before dispatching the children, so that
        // ancestors come before their descendants.
        let blocks_index = b.is_block_level().then_some(self.block_level_boxes.len());
        let cells_index = (b.is_block_level() || matches!(b.kind, BoxKind::TableCell { .. }))
            .then_some(self.blocks_and_cells.len());

        let new_box = self.dispatch_children(b, child_contexts);

        if let Some(index) = blocks_index {
            self.block_level_boxes.insert(index, Arc::clone(&new_box));
        }
        if let Some(index) = cells_index {
            self.blocks_and_cells.insert(index, Arc::clone(&new_box));
        }
        Some(new_box)
    }

    fn dispatch_children(&mut self, b: &BoxRef, child_contexts: &mut Vec<StackingContext>) -> BoxRef {
        if !b.is_parent() {
            return Arc::clone(b);
        }
        let children: Vec<BoxRef> = b
            .children
            .iter()
            .filter_map(|child| self.dispatch(child, child_contexts))
            .collect();
        let unchanged = children.len() == b.children.len()
            && children.iter().zip(&b.children).all(|(new, old)| Arc::ptr_eq(new, old));
        if unchanged {
            return Arc::clone(b);
        }
        let mut copy = LayoutBox::clone(b);
        copy.children = children;
        Arc::new(copy)
    }
}

impl StackingContext {
    /// [§ Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
    ///
    /// The stacking context formed by `b` and its descendants.
    #[must_use]
    pub fn from_box(b: &BoxRef) -> Self {
        Self::build(b, None)
    }

    /// [CSS Paged Media § 3.1 Page Model](https://www.w3.org/TR/css-page-3/#page-model)
    ///
    /// Page children (the root box and the margin boxes) as well as the page
    /// itself are unconditionally stacking contexts.
    #[must_use]
    pub fn from_page(page: &BoxRef) -> Self {
        let child_contexts = page.children.iter().map(Self::from_box).collect();
        let page_box = Arc::new(page.shallow_copy());
        Self::new(page_box, child_contexts, Dispatch::default())
    }

    /// Build the context of `b`. `shared_contexts` is the child context
    /// list of the parent context when `b` forms a "fake" context whose
    /// positioned descendants belong to its parent.
    fn build(b: &BoxRef, shared_contexts: Option<&mut Vec<Self>>) -> Self {
        let mut own_contexts = Vec::new();
        let mut dispatch = Dispatch::default();
        let layout_box = match shared_contexts {
            Some(contexts) => dispatch.dispatch_children(b, contexts),
            None => dispatch.dispatch_children(b, &mut own_contexts),
        };
        Self::new(layout_box, own_contexts, dispatch)
    }

    fn new(layout_box: BoxRef, child_contexts: Vec<Self>, dispatch: Dispatch) -> Self {
        let mut negative_z = Vec::new();
        let mut zero_z = Vec::new();
        let mut positive_z = Vec::new();
        for context in child_contexts {
            match context.z_index {
                z if z < 0 => negative_z.push(context),
                0 => zero_z.push(context),
                _ => positive_z.push(context),
            }
        }
        // Stable sorts: by z-index, then tree order.
        negative_z.sort_by_key(|context| context.z_index);
        positive_z.sort_by_key(|context| context.z_index);

        let z_index = layout_box.style.z_index.level();
        trace!(
            tag = layout_box.element_tag.as_str(),
            z_index,
            negative = negative_z.len(),
            zero = zero_z.len(),
            positive = positive_z.len(),
            floats = dispatch.floats.len(),
            "stacking context"
        );
        Self {
            layout_box,
            z_index,
            negative_z,
            zero_z,
            positive_z,
            floats: dispatch.floats,
            block_level_boxes: dispatch.block_level_boxes,
            blocks_and_cells: dispatch.blocks_and_cells,
            inline_contexts: dispatch.inline_contexts,
        }
    }

    /// The context of an inline-block or inline-flex box kept in this
    /// context's tree.
    fn inline_context_for(&self, b: &BoxRef) -> Option<&Self> {
        self.inline_contexts
            .iter()
            .find(|context| Arc::ptr_eq(&context.layout_box, b))
    }

    /// [§ Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    ///
    /// "Within each stacking context, the following layers are painted in
    /// back-to-front order:
    ///
    /// 1. the background and borders of the element forming the stacking
    ///    context.
    /// 2. the child stacking contexts with negative stack levels (most
    ///    negative first).
    /// 3. the in-flow, non-inline-level, non-positioned descendants.
    /// 4. the non-positioned floats.
    /// 5. the in-flow, inline-level, non-positioned descendants, including
    ///    inline tables and inline blocks.
    /// 6. the child stacking contexts with stack level 0 and the positioned
    ///    descendants with stack level 0.
    /// 7. the child stacking contexts with positive stack levels (least
    ///    positive first)."
    ///
    /// Outlines are painted last.
    #[must_use]
    pub fn paint_order(&self) -> Vec<PaintStep> {
        let mut steps = Vec::new();
        self.paint_into(&mut steps);
        steps
    }

    fn paint_into(&self, steps: &mut Vec<PaintStep>) {
        let b = &self.layout_box;
        steps.push(PaintStep::PushContext(Arc::clone(b)));

        // STEP 1: Background and borders of the element forming the context.
        if matches!(
            b.kind,
            BoxKind::Block
                | BoxKind::TableCaption
                | BoxKind::MarginBox { .. }
                | BoxKind::InlineBlock
                | BoxKind::TableCell { .. }
                | BoxKind::Flex
                | BoxKind::InlineFlex
        ) || b.is_replaced()
        {
            steps.push(PaintStep::BackgroundAndBorder(Arc::clone(b)));
        }

        // STEP 2: Negative stack levels.
        for context in &self.negative_z {
            context.paint_into(steps);
        }

        // STEP 3: Block-level descendants.
        for block in &self.block_level_boxes {
            paint_block_background(block, steps);
        }

        // STEP 4: Floats.
        for context in &self.floats {
            context.paint_into(steps);
        }

        // STEP 5: Inline-level content.
        if matches!(b.kind, BoxKind::Inline) {
            self.paint_inline(b, steps);
        }
        for block in std::iter::once(b).chain(&self.blocks_and_cells) {
            if block.is_replaced() {
                steps.push(PaintStep::Replaced(Arc::clone(block)));
                continue;
            }
            for child in &block.children {
                if matches!(child.kind, BoxKind::Line) {
                    self.paint_inline(child, steps);
                }
            }
        }

        // STEP 6: Stack level 0, positioned descendants included.
        for context in &self.zero_z {
            context.paint_into(steps);
        }

        // STEP 7: Positive stack levels.
        for context in &self.positive_z {
            context.paint_into(steps);
        }

        // [§ 18.4 Dynamic outlines](https://www.w3.org/TR/CSS2/ui.html#dynamic-outlines)
        // "The outline may be drawn starting just outside the border edge."
        self.paint_outlines(b, steps);

        steps.push(PaintStep::PopContext(Arc::clone(b)));
    }

    /// The content of a Line or Inline box: text, inline boxes, atomic
    /// inlines.
    fn paint_inline(&self, b: &BoxRef, steps: &mut Vec<PaintStep>) {
        for child in &b.children {
            if let Some(context) = self.inline_context_for(child) {
                context.paint_into(steps);
                continue;
            }
            match &child.kind {
                BoxKind::Text(_) => steps.push(PaintStep::Text(Arc::clone(child))),
                BoxKind::InlineReplaced(_) => steps.push(PaintStep::Replaced(Arc::clone(child))),
                _ => {
                    steps.push(PaintStep::BackgroundAndBorder(Arc::clone(child)));
                    self.paint_inline(child, steps);
                }
            }
        }
    }

    fn paint_outlines(&self, b: &BoxRef, steps: &mut Vec<PaintStep>) {
        if b.style.outline.used_width() > 0.0 {
            steps.push(PaintStep::Outline(Arc::clone(b)));
        }
        for child in &b.children {
            if self.inline_context_for(child).is_none() {
                self.paint_outlines(child, steps);
            }
        }
    }
}

/// Background and borders of a block-level box. A table also paints its
/// column groups, columns, row groups, rows and cells, in that order.
///
/// [§ 17.5.1 Table layers and transparency](https://www.w3.org/TR/CSS2/tables.html#table-layers)
fn paint_block_background(block: &BoxRef, steps: &mut Vec<PaintStep>) {
    steps.push(PaintStep::BackgroundAndBorder(Arc::clone(block)));
    let Some(table) = block.table_data() else {
        return;
    };
    for group in &table.column_groups {
        steps.push(PaintStep::BackgroundAndBorder(Arc::clone(group)));
        for column in &group.children {
            steps.push(PaintStep::BackgroundAndBorder(Arc::clone(column)));
        }
    }
    for row_group in &block.children {
        steps.push(PaintStep::BackgroundAndBorder(Arc::clone(row_group)));
        for row in &row_group.children {
            steps.push(PaintStep::BackgroundAndBorder(Arc::clone(row)));
            for cell in &row.children {
                steps.push(PaintStep::BackgroundAndBorder(Arc::clone(cell)));
            }
        }
    }
}
