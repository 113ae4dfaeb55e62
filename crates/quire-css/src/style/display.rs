//! CSS Display property types and parsing
//!
//! [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)

use serde::Serialize;
use strum_macros::{Display as StrumDisplay, EnumString};

use quire_common::warning::warn_once;

// [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
//
// "The display property defines an element's display type, which consists of
// the two basic qualities of how an element generates boxes:
//   - the inner display type, which defines the kind of formatting context
//     it generates, dictating how its descendant boxes are laid out.
//   - the outer display type, which dictates how the principal box itself
//     participates in flow layout."

/// [§ 2.1 Outer Display Roles](https://www.w3.org/TR/css-display-3/#outer-role)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OuterDisplayType {
    /// "The element generates a block-level box when placed in flow layout."
    Block,
    /// "The element generates an inline-level box when placed in flow layout."
    Inline,
}

/// [§ 2.2 Inner Display Layout Models](https://www.w3.org/TR/css-display-3/#inner-model)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InnerDisplayType {
    /// "The element lays out its contents using flow layout (block-and-inline layout)."
    Flow,
    /// Same as Flow but establishes a new block formatting context.
    FlowRoot,
    /// "The element lays out its contents using table layout."
    Table,
    /// "The element lays out its contents using flex layout."
    Flex,
    /// "The element lays out its contents using grid layout."
    ///
    /// NOTE: grid containers generate ordinary block containers here.
    Grid,
}

/// [§ 2.4 Layout-Internal Display Types](https://www.w3.org/TR/css-display-3/#layout-specific-display)
///
/// "Some layout models split boxes into several internal pieces; the
/// `<display-internal>` keywords define these layout-specific roles."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, StrumDisplay, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum InternalDisplayType {
    /// `table-row-group`
    TableRowGroup,
    /// `table-header-group`
    TableHeaderGroup,
    /// `table-footer-group`
    TableFooterGroup,
    /// `table-row`
    TableRow,
    /// `table-cell`
    TableCell,
    /// `table-column-group`
    TableColumnGroup,
    /// `table-column`
    TableColumn,
    /// `table-caption`
    TableCaption,
}

/// Computed value of the `display` property.
///
/// [§ 2 Box Layout Modes](https://www.w3.org/TR/css-display-3/#the-display-properties)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Display {
    /// "The element and its descendants generate no boxes or text runs."
    None,
    /// An `<display-outside> <display-inside> list-item?` triple.
    Box {
        /// The outer display type.
        outer: OuterDisplayType,
        /// The inner display type.
        inner: InnerDisplayType,
        /// [§ 2.3 Generating Marker Boxes](https://www.w3.org/TR/css-display-3/#list-items)
        /// "The list-item keyword causes the element to generate a ::marker
        /// pseudo-element box."
        list_item: bool,
    },
    /// A `<display-internal>` table keyword.
    Internal(InternalDisplayType),
}

impl Display {
    const fn pair(outer: OuterDisplayType, inner: InnerDisplayType) -> Self {
        Self::Box {
            outer,
            inner,
            list_item: false,
        }
    }

    /// `display: block`
    #[must_use]
    pub const fn block() -> Self {
        Self::pair(OuterDisplayType::Block, InnerDisplayType::Flow)
    }

    /// `display: inline`
    #[must_use]
    pub const fn inline() -> Self {
        Self::pair(OuterDisplayType::Inline, InnerDisplayType::Flow)
    }

    /// `display: inline-block`
    #[must_use]
    pub const fn inline_block() -> Self {
        Self::pair(OuterDisplayType::Inline, InnerDisplayType::FlowRoot)
    }

    /// `display: list-item`
    #[must_use]
    pub const fn list_item() -> Self {
        Self::Box {
            outer: OuterDisplayType::Block,
            inner: InnerDisplayType::Flow,
            list_item: true,
        }
    }

    /// `display: table`
    #[must_use]
    pub const fn table() -> Self {
        Self::pair(OuterDisplayType::Block, InnerDisplayType::Table)
    }

    /// `display: inline-table`
    #[must_use]
    pub const fn inline_table() -> Self {
        Self::pair(OuterDisplayType::Inline, InnerDisplayType::Table)
    }

    /// `display: flex`
    #[must_use]
    pub const fn flex() -> Self {
        Self::pair(OuterDisplayType::Block, InnerDisplayType::Flex)
    }

    /// `display: inline-flex`
    #[must_use]
    pub const fn inline_flex() -> Self {
        Self::pair(OuterDisplayType::Inline, InnerDisplayType::Flex)
    }

    /// Whether this is `display: none`.
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Whether the element generates a `::marker` box.
    #[must_use]
    pub const fn is_list_item(self) -> bool {
        matches!(self, Self::Box { list_item: true, .. })
    }

    /// Whether the outer display type is `block`.
    #[must_use]
    pub const fn is_block_outside(self) -> bool {
        matches!(
            self,
            Self::Box {
                outer: OuterDisplayType::Block,
                ..
            }
        )
    }

    /// [§ 2 The display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
    ///
    /// Parse a display value from its keywords (`"inline list-item"`,
    /// `"table-row"`, `"flow-root"`, ...). Unknown values are reported once
    /// and yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let lower = value.trim().to_ascii_lowercase();
        let keywords: Vec<&str> = lower.split_ascii_whitespace().collect();

        match keywords.as_slice() {
            ["none"] => return Some(Self::None),
            // [§ 2.5 Box Generation](https://www.w3.org/TR/css-display-3/#box-generation)
            // NOTE: `contents` is treated as `inline`.
            ["inline" | "contents"] => return Some(Self::inline()),
            ["inline-block"] => return Some(Self::inline_block()),
            ["inline-table"] => return Some(Self::inline_table()),
            ["inline-flex"] => return Some(Self::inline_flex()),
            ["inline-grid"] => return Some(Self::pair(OuterDisplayType::Inline, InnerDisplayType::Grid)),
            [single] => {
                if let Ok(internal) = single.parse::<InternalDisplayType>() {
                    return Some(Self::Internal(internal));
                }
            }
            _ => {}
        }

        // [§ 2.1 / § 2.2] Multi-keyword syntax: any order, each at most once.
        let mut outer = None;
        let mut inner = None;
        let mut list_item = false;
        for keyword in &keywords {
            match *keyword {
                "block" if outer.is_none() => outer = Some(OuterDisplayType::Block),
                "inline" if outer.is_none() => outer = Some(OuterDisplayType::Inline),
                "flow" if inner.is_none() => inner = Some(InnerDisplayType::Flow),
                "flow-root" if inner.is_none() => inner = Some(InnerDisplayType::FlowRoot),
                "table" if inner.is_none() => inner = Some(InnerDisplayType::Table),
                "flex" if inner.is_none() => inner = Some(InnerDisplayType::Flex),
                "grid" if inner.is_none() => inner = Some(InnerDisplayType::Grid),
                "list-item" if !list_item => list_item = true,
                _ => {
                    warn_once("CSS", &format!("unsupported display value '{value}'"));
                    return None;
                }
            }
        }
        if keywords.is_empty() {
            return None;
        }

        // "If a <display-outside> value is specified but <display-inside> is
        // omitted, the element's inner display type defaults to flow. If
        // <display-inside> is specified but <display-outside> is omitted, the
        // element's outer display type defaults to block."
        let inner = inner.unwrap_or(InnerDisplayType::Flow);
        if list_item && !matches!(inner, InnerDisplayType::Flow | InnerDisplayType::FlowRoot) {
            warn_once("CSS", &format!("unsupported display value '{value}'"));
            return None;
        }
        Some(Self::Box {
            outer: outer.unwrap_or(OuterDisplayType::Block),
            inner,
            list_item,
        })
    }
}

impl Default for Display {
    /// The initial value is `inline`.
    fn default() -> Self {
        Self::inline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_keywords() {
        assert_eq!(Display::parse("block"), Some(Display::block()));
        assert_eq!(Display::parse("INLINE"), Some(Display::inline()));
        assert_eq!(Display::parse("list-item"), Some(Display::list_item()));
        assert_eq!(Display::parse("none"), Some(Display::None));
        assert_eq!(
            Display::parse("table-header-group"),
            Some(Display::Internal(InternalDisplayType::TableHeaderGroup))
        );
        assert_eq!(Display::parse("flex"), Some(Display::flex()));
    }

    #[test]
    fn test_parse_multi_keyword() {
        assert_eq!(
            Display::parse("inline list-item"),
            Some(Display::Box {
                outer: OuterDisplayType::Inline,
                inner: InnerDisplayType::Flow,
                list_item: true,
            })
        );
        assert_eq!(Display::parse("block flow-root"), Some(Display::pair(OuterDisplayType::Block, InnerDisplayType::FlowRoot)));
        assert_eq!(Display::parse("block block"), None);
        assert_eq!(Display::parse("table list-item"), None);
        assert_eq!(Display::parse("bogus"), None);
    }
}
