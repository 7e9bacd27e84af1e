//! Registry — the view state machine and its single writer.
//!
//! DESIGN
//! ======
//! `Registry` owns the current view, the per-view layout lists, the
//! mounting constraints, chart payloads, and ad-hoc dynamic components.
//! Its fields are private; `Registry::apply` is the only way to mutate it.
//! Every "do nothing" branch returns an explicit `Outcome::Ignored` so
//! callers can tell a no-op from a change without diffing state.
//!
//! INVARIANTS
//! ==========
//! - `current_view` is always a member of `ViewId::ALL`.
//! - Every view has a layout entry; entries are never removed.
//! - A component name appears at most once in a view's layout.
//! - Charts and dynamic components are last-write-wins by key.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::intent::{Intent, Props, ViewId};

/// Panel mounted alongside a detail or triage view.
pub const NOTES_PANEL: &str = "NotesPanel";

// =============================================================================
// TYPES
// =============================================================================

/// Mounting dependency: the component only makes sense when the current
/// view's layout already holds one of `anchors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constraint {
    #[serde(rename = "mustMountWithin")]
    pub anchors: Vec<String>,
}

/// Chart payload stored per container id. Replaced wholesale on each write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    #[serde(rename = "chartConfig")]
    pub chart_config: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Agent-authored component instance, outside any view layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicComponent {
    pub component: String,
    pub props: Props,
}

/// How `add_panel` treats a declared constraint whose anchor is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintPolicy {
    /// Mount anyway and log a warning.
    #[default]
    Advisory,
    /// Refuse the mount.
    Enforce,
}

/// What an applied intent changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    ViewSet(ViewId),
    PanelAdded { view: ViewId, panel: String },
    PanelRemoved { view: ViewId, panel: String },
    ChartRendered { container_id: String },
    ComponentAdded { id: String },
    ComponentPropsUpdated { id: String },
    ComponentRemoved { id: String },
}

/// Why an intent left the registry untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    UnknownIntent,
    PanelAlreadyMounted { view: ViewId, panel: String },
    PanelNotMounted { view: ViewId, panel: String },
    ComponentNotFound { id: String },
    ConstraintUnsatisfied { panel: String, anchors: Vec<String> },
}

/// Result of applying one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied(Change),
    Ignored(IgnoreReason),
}

impl Outcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    current_view: ViewId,
    layout: BTreeMap<ViewId, Vec<String>>,
    constraints: BTreeMap<String, Constraint>,
    charts: BTreeMap<String, ChartPayload>,
    components: BTreeMap<String, DynamicComponent>,
    #[serde(skip)]
    policy: ConstraintPolicy,
}

fn default_layout(view: ViewId) -> Vec<String> {
    let names: &[&str] = match view {
        ViewId::CustomerList => &["EntityList"],
        ViewId::CustomerDetail => &["EntityDetail", NOTES_PANEL],
        ViewId::Triage => &["TriageBoard", NOTES_PANEL],
        ViewId::Dashboard => &["CustomerDashboard"],
        ViewId::Analytics => &["AnalyticsView"],
        ViewId::Timeline => &["TimelineView"],
        ViewId::Calendar => &["CalendarView"],
        ViewId::Workflow => &["WorkflowView"],
    };
    names.iter().map(|s| (*s).to_owned()).collect()
}

impl Registry {
    /// Registry with the startup view, default layouts, and the notes panel
    /// constraint. Uses the advisory constraint policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(ConstraintPolicy::default())
    }

    #[must_use]
    pub fn with_policy(policy: ConstraintPolicy) -> Self {
        let layout = ViewId::ALL.into_iter().map(|v| (v, default_layout(v))).collect();
        let mut constraints = BTreeMap::new();
        constraints.insert(
            NOTES_PANEL.to_owned(),
            Constraint { anchors: vec!["EntityDetail".into(), "TriageBoard".into()] },
        );
        Self {
            current_view: ViewId::DEFAULT,
            layout,
            constraints,
            charts: BTreeMap::new(),
            components: BTreeMap::new(),
            policy,
        }
    }

    #[must_use]
    pub fn current_view(&self) -> ViewId {
        self.current_view
    }

    #[must_use]
    pub fn policy(&self) -> ConstraintPolicy {
        self.policy
    }

    /// Layout for `view`. Always present.
    #[must_use]
    pub fn layout_for(&self, view: ViewId) -> &[String] {
        self.layout.get(&view).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn current_layout(&self) -> &[String] {
        self.layout_for(self.current_view)
    }

    #[must_use]
    pub fn constraint(&self, component: &str) -> Option<&Constraint> {
        self.constraints.get(component)
    }

    #[must_use]
    pub fn chart(&self, container_id: &str) -> Option<&ChartPayload> {
        self.charts.get(container_id)
    }

    pub fn charts(&self) -> impl Iterator<Item = (&str, &ChartPayload)> {
        self.charts.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn component(&self, id: &str) -> Option<&DynamicComponent> {
        self.components.get(id)
    }

    /// Dynamic components in id order.
    pub fn components(&self) -> impl Iterator<Item = (&str, &DynamicComponent)> {
        self.components.iter().map(|(k, v)| (k.as_str(), v))
    }

    // =========================================================================
    // APPLY
    // =========================================================================

    /// Apply one intent. Total: never fails, never blocks.
    pub fn apply(&mut self, intent: &Intent) -> Outcome {
        match intent {
            Intent::SetView { view_id } => {
                self.current_view = *view_id;
                Outcome::Applied(Change::ViewSet(*view_id))
            }
            Intent::AddPanel { panel } => self.add_panel(panel),
            Intent::RemovePanel { panel } => self.remove_panel(panel),
            Intent::RenderChart { container_id, chart_config, title, description } => {
                self.charts.insert(
                    container_id.clone(),
                    ChartPayload {
                        chart_config: chart_config.clone(),
                        title: title.clone(),
                        description: description.clone(),
                    },
                );
                // Charts live on the analytics surface; reveal it.
                self.current_view = ViewId::Analytics;
                Outcome::Applied(Change::ChartRendered { container_id: container_id.clone() })
            }
            Intent::AddComponent { id, component, props } => {
                self.components.insert(
                    id.clone(),
                    DynamicComponent { component: component.clone(), props: props.clone().unwrap_or_default() },
                );
                Outcome::Applied(Change::ComponentAdded { id: id.clone() })
            }
            Intent::UpdateComponentProps { id, props } => {
                let Some(entry) = self.components.get_mut(id) else {
                    return Outcome::Ignored(IgnoreReason::ComponentNotFound { id: id.clone() });
                };
                for (key, value) in props {
                    entry.props.insert(key.clone(), value.clone());
                }
                Outcome::Applied(Change::ComponentPropsUpdated { id: id.clone() })
            }
            Intent::RemoveComponent { id } => {
                if self.components.remove(id).is_none() {
                    return Outcome::Ignored(IgnoreReason::ComponentNotFound { id: id.clone() });
                }
                Outcome::Applied(Change::ComponentRemoved { id: id.clone() })
            }
            Intent::Unknown => Outcome::Ignored(IgnoreReason::UnknownIntent),
        }
    }

    fn add_panel(&mut self, panel: &str) -> Outcome {
        let view = self.current_view;
        let layout = self.layout.entry(view).or_default();
        if layout.iter().any(|p| p == panel) {
            return Outcome::Ignored(IgnoreReason::PanelAlreadyMounted { view, panel: panel.to_owned() });
        }

        if let Some(constraint) = self.constraints.get(panel) {
            let anchored = constraint.anchors.iter().any(|a| layout.contains(a));
            if !anchored {
                match self.policy {
                    ConstraintPolicy::Advisory => {
                        warn!(%view, panel, anchors = ?constraint.anchors, "registry: panel mounted without anchor");
                    }
                    ConstraintPolicy::Enforce => {
                        return Outcome::Ignored(IgnoreReason::ConstraintUnsatisfied {
                            panel: panel.to_owned(),
                            anchors: constraint.anchors.clone(),
                        });
                    }
                }
            }
        }

        layout.push(panel.to_owned());
        Outcome::Applied(Change::PanelAdded { view, panel: panel.to_owned() })
    }

    fn remove_panel(&mut self, panel: &str) -> Outcome {
        let view = self.current_view;
        let layout = self.layout.entry(view).or_default();
        let before = layout.len();
        layout.retain(|p| p != panel);
        if layout.len() == before {
            return Outcome::Ignored(IgnoreReason::PanelNotMounted { view, panel: panel.to_owned() });
        }
        Outcome::Applied(Change::PanelRemoved { view, panel: panel.to_owned() })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
