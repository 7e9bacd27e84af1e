//! Compose service — turns a registry snapshot into a mount plan.
//!
//! DESIGN
//! ======
//! The composer is read-only: it re-reads the registry on every render
//! signal and decides which presentation components to mount. Names it
//! does not recognize are skipped, never rejected; the registry itself
//! does not validate component names.
//!
//! Full-width views take the whole content area. When one is present, the
//! grid views in the same layout are not mounted.

use serde::Serialize;
use tracing::debug;

use crate::intent::{Props, ViewId};
use crate::registry::{NOTES_PANEL, Registry};

/// Views that occupy the full content area.
pub const FULL_WIDTH_VIEWS: [&str; 5] =
    ["CustomerDashboard", "AnalyticsView", "TimelineView", "CalendarView", "WorkflowView"];

/// Views laid out side by side in a grid.
pub const GRID_VIEWS: [&str; 3] = ["TriageBoard", "EntityDetail", "EntityList"];

/// Panels stacked below the primary views.
pub const PANELS: [&str; 1] = [NOTES_PANEL];

/// Component types the dynamic component factory can build.
pub const FACTORY_TYPES: [&str; 3] = ["ChartRenderer", "ChatInterface", "WorkflowProgress"];

const ANALYTICS_VIEW: &str = "AnalyticsView";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicMount {
    pub id: String,
    pub component: String,
    pub props: Props,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartMount {
    pub container_id: String,
    pub title: Option<String>,
    pub chart_config: serde_json::Value,
}

/// What the view composer mounts for one render cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MountPlan {
    pub view: ViewId,
    /// Primary view components, in layout order.
    pub primary: Vec<String>,
    /// Panels, in layout order.
    pub panels: Vec<String>,
    /// Dynamic components with a known factory type, by id.
    pub dynamic: Vec<DynamicMount>,
    /// Charts, only populated while the analytics view is mounted.
    pub charts: Vec<ChartMount>,
}

impl MountPlan {
    /// Total mounted components, for status lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.primary.len() + self.panels.len() + self.dynamic.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// COMPOSE
// =============================================================================

/// Build the mount plan for the registry's current view.
#[must_use]
pub fn compose(registry: &Registry) -> MountPlan {
    let view = registry.current_view();
    let layout = registry.current_layout();
    let full_width = layout.iter().any(|name| FULL_WIDTH_VIEWS.contains(&name.as_str()));

    let mut primary = Vec::new();
    let mut panels = Vec::new();
    for name in layout {
        let name = name.as_str();
        if FULL_WIDTH_VIEWS.contains(&name) {
            primary.push(name.to_owned());
        } else if GRID_VIEWS.contains(&name) {
            if !full_width {
                primary.push(name.to_owned());
            }
        } else if PANELS.contains(&name) {
            panels.push(name.to_owned());
        } else {
            debug!(%view, component = name, "compose: unknown layout component skipped");
        }
    }

    let dynamic = registry
        .components()
        .filter_map(|(id, entry)| {
            if FACTORY_TYPES.contains(&entry.component.as_str()) {
                Some(DynamicMount { id: id.to_owned(), component: entry.component.clone(), props: entry.props.clone() })
            } else {
                debug!(id, component = %entry.component, "compose: unknown component type skipped");
                None
            }
        })
        .collect();

    let charts = if primary.iter().any(|name| name == ANALYTICS_VIEW) {
        registry
            .charts()
            .map(|(container_id, payload)| ChartMount {
                container_id: container_id.to_owned(),
                title: payload.title.clone(),
                chart_config: payload.chart_config.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    MountPlan { view, primary, panels, dynamic, charts }
}

#[cfg(test)]
#[path = "compose_test.rs"]
mod tests;
