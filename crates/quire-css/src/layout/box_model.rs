//! CSS Box Model geometry.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//!
//! Every box carries a [`BoxGeometry`]. It is zero after box generation and
//! filled in by flow layout; the paint walk reads it back.

use serde::Serialize;

use crate::style::Side;

/// A rectangle positioned in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f32,
    /// Vertical position of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

/// Edge sizes for padding, border, or margin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f32,
    /// Right edge size.
    pub right: f32,
    /// Bottom edge size.
    pub bottom: f32,
    /// Left edge size.
    pub left: f32,
}

impl EdgeSizes {
    /// Mutable access to one side.
    pub const fn side_mut(&mut self, side: Side) -> &mut f32 {
        match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        }
    }
}

/// [§ 5.1 'border-radius'](https://www.w3.org/TR/css-backgrounds-3/#border-radius)
///
/// "The two length or percentage values of the border-*-radius properties
/// define the radii of a quarter ellipse." Stored as `(horizontal, vertical)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CornerRadii {
    /// Top-left corner.
    pub top_left: (f32, f32),
    /// Top-right corner.
    pub top_right: (f32, f32),
    /// Bottom-right corner.
    pub bottom_right: (f32, f32),
    /// Bottom-left corner.
    pub bottom_left: (f32, f32),
}

/// A rectangle with rounded corners.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RoundedRect {
    /// The bounding rectangle.
    pub rect: Rect,
    /// Corner radii, already shrunk to this edge.
    pub radii: CornerRadii,
}

/// Used geometry of a box.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// "Each box has a content area and optional surrounding padding, border,
/// and margin areas."
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoxGeometry {
    /// Position of the margin edge's top-left corner.
    pub position_x: f32,
    /// Position of the margin edge's top-left corner.
    pub position_y: f32,
    /// Content area width.
    pub width: f32,
    /// Content area height.
    pub height: f32,
    /// Margin widths.
    pub margin: EdgeSizes,
    /// Padding widths.
    pub padding: EdgeSizes,
    /// Border widths.
    pub border: EdgeSizes,
    /// Outer border radii.
    pub radii: CornerRadii,
}

impl BoxGeometry {
    // (position_x, position_y) is the margin edge; each inner box is inset
    // by one ring of edge sizes.

    /// [§ 3.1 Margins](https://www.w3.org/TR/css-box-3/#margins)
    ///
    /// "The margin box is the outermost box, and contains all four areas."
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        Rect {
            x: self.position_x,
            y: self.position_y,
            width: self.margin_width(),
            height: self.margin_height(),
        }
    }

    /// [§ 3.3 Borders](https://www.w3.org/TR/css-box-3/#borders)
    ///
    /// ```text
    /// x = position_x + margin.left
    /// width = content + padding + border
    /// ```
    #[must_use]
    pub fn border_box(&self) -> Rect {
        Rect {
            x: self.position_x + self.margin.left,
            y: self.position_y + self.margin.top,
            width: self.border_width(),
            height: self.border_height(),
        }
    }

    /// [§ 3.2 Padding](https://www.w3.org/TR/css-box-3/#paddings)
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        let border = self.border_box();
        Rect {
            x: border.x + self.border.left,
            y: border.y + self.border.top,
            width: self.padding_width(),
            height: self.padding_height(),
        }
    }

    /// "The content box contains the actual content of the element."
    #[must_use]
    pub fn content_box(&self) -> Rect {
        let padding = self.padding_box();
        Rect {
            x: padding.x + self.padding.left,
            y: padding.y + self.padding.top,
            width: self.width,
            height: self.height,
        }
    }

    /// Width of the padding box.
    #[must_use]
    pub fn padding_width(&self) -> f32 {
        self.width + self.padding.left + self.padding.right
    }

    /// Height of the padding box.
    #[must_use]
    pub fn padding_height(&self) -> f32 {
        self.height + self.padding.top + self.padding.bottom
    }

    /// Width of the border box.
    #[must_use]
    pub fn border_width(&self) -> f32 {
        self.padding_width() + self.border.left + self.border.right
    }

    /// Height of the border box.
    #[must_use]
    pub fn border_height(&self) -> f32 {
        self.padding_height() + self.border.top + self.border.bottom
    }

    /// Width of the margin box.
    #[must_use]
    pub fn margin_width(&self) -> f32 {
        self.border_width() + self.margin.left + self.margin.right
    }

    /// Height of the margin box.
    #[must_use]
    pub fn margin_height(&self) -> f32 {
        self.border_height() + self.margin.top + self.margin.bottom
    }

    /// [§ 5.2 Corner Shaping](https://www.w3.org/TR/css-backgrounds-3/#corner-shaping)
    ///
    /// "The padding edge (inner border) radius is the outer border radius
    /// minus the corresponding border thickness. In the case where this
    /// results in a negative value, the inner radius is zero."
    ///
    /// `inset` are the widths removed from the border box on each side.
    ///
    /// [§ 5.5 Overlapping Curves](https://www.w3.org/TR/css-backgrounds-3/#corner-overlap)
    ///
    /// "Let f = min(Li/Si), where i ∈ {top, right, bottom, left}, Si is the
    /// sum of the two corresponding radii of the corners on side i, and
    /// Ltop = Lbottom = the width of the box, and Lleft = Lright = the height
    /// of the box. If f < 1, then all corner radii are reduced by
    /// multiplying them by f."
    #[must_use]
    pub fn rounded_box(&self, inset: EdgeSizes) -> RoundedRect {
        let border = self.border_box();
        let shrink = |(rx, ry): (f32, f32), dx: f32, dy: f32| ((rx - dx).max(0.0), (ry - dy).max(0.0));
        let top_left = shrink(self.radii.top_left, inset.left, inset.top);
        let top_right = shrink(self.radii.top_right, inset.right, inset.top);
        let bottom_right = shrink(self.radii.bottom_right, inset.right, inset.bottom);
        let bottom_left = shrink(self.radii.bottom_left, inset.left, inset.bottom);

        let rect = Rect {
            x: border.x + inset.left,
            y: border.y + inset.top,
            width: border.width - inset.left - inset.right,
            height: border.height - inset.top - inset.bottom,
        };

        let ratio = [
            (rect.width, top_left.0 + top_right.0),
            (rect.width, bottom_left.0 + bottom_right.0),
            (rect.height, top_left.1 + bottom_left.1),
            (rect.height, top_right.1 + bottom_right.1),
        ]
        .into_iter()
        .filter(|&(_, sum)| sum > 0.0)
        .map(|(length, sum)| length / sum)
        .fold(1.0_f32, f32::min);
        let scale = |(rx, ry): (f32, f32)| (rx * ratio, ry * ratio);

        RoundedRect {
            rect,
            radii: CornerRadii {
                top_left: scale(top_left),
                top_right: scale(top_right),
                bottom_right: scale(bottom_right),
                bottom_left: scale(bottom_left),
            },
        }
    }

    /// The border box with the outer radii.
    #[must_use]
    pub fn rounded_border_box(&self) -> RoundedRect {
        self.rounded_box(EdgeSizes::default())
    }

    /// The padding box with radii reduced by the border widths.
    #[must_use]
    pub fn rounded_padding_box(&self) -> RoundedRect {
        self.rounded_box(self.border)
    }

    /// The content box with radii reduced by border and padding widths.
    #[must_use]
    pub fn rounded_content_box(&self) -> RoundedRect {
        self.rounded_box(EdgeSizes {
            top: self.border.top + self.padding.top,
            right: self.border.right + self.padding.right,
            bottom: self.border.bottom + self.padding.bottom,
            left: self.border.left + self.padding.left,
        })
    }
}
