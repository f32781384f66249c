//! Active-group navigation.
//!
//! When the active group changes, the view scrolls the matching node to
//! the top of the viewport. Purely a navigation aid; responses are never
//! touched.

use serde::Serialize;

use crate::render::{RenderNode, find_node};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollOptions {
    pub const SMOOTH_TOP: ScrollOptions = ScrollOptions {
        behavior: ScrollBehavior::Smooth,
        block: ScrollBlock::Start,
    };
}

/// The presentation surface that owns the rendered nodes.
pub trait Viewport {
    /// Bring the node rendered for question `key` into view.
    fn scroll_into_view(&mut self, key: &str, options: ScrollOptions);
}

/// Tracks the active group id and scrolls on change.
#[derive(Debug, Clone, Default)]
pub struct ActiveGroup {
    current: Option<String>,
}

impl ActiveGroup {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Set the active group. Scrolls only when the id actually changed
    /// and the node is present in `rendered`. Returns whether it scrolled.
    pub fn set(
        &mut self,
        active: Option<&str>,
        rendered: &[RenderNode<'_>],
        viewport: &mut dyn Viewport,
    ) -> bool {
        if self.current.as_deref() == active {
            return false;
        }
        self.current = active.map(str::to_string);

        let Some(key) = active else {
            return false;
        };
        if find_node(rendered, key).is_none() {
            tracing::debug!(group_id = %key, "active group is not rendered, not scrolling");
            return false;
        }
        viewport.scroll_into_view(key, ScrollOptions::SMOOTH_TOP);
        true
    }
}
