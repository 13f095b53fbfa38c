//! Which other recognizers may run alongside the element's drag, and which
//! one wins when they compete.

use super::arbitration::ArbitrationConfig;
use crate::scroll::ContainerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Pan,
    /// System edge-swipe (back navigation and similar).
    ScreenEdgePan,
    Tap,
    Other,
}

/// Description of a competing recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureDescriptor {
    pub kind: GestureKind,
    /// Container the recognizer is attached to, if it belongs to one.
    pub container: Option<ContainerId>,
}

impl GestureDescriptor {
    pub fn new(kind: GestureKind) -> Self {
        Self {
            kind,
            container: None,
        }
    }

    pub fn container_pan(container: ContainerId) -> Self {
        Self {
            kind: GestureKind::Pan,
            container: Some(container),
        }
    }
}

/// Only the pan of the container being tracked runs together with the
/// element's drag. Screen edge pans never do, and with
/// `ignores_scroll_view` no container gesture does.
pub fn should_recognize_simultaneously(
    config: &ArbitrationConfig,
    tracked: Option<ContainerId>,
    other: &GestureDescriptor,
) -> bool {
    if other.kind == GestureKind::ScreenEdgePan {
        return false;
    }
    if config.ignores_scroll_view && other.container.is_some() {
        return false;
    }
    other.kind == GestureKind::Pan && tracked.is_some() && other.container == tracked
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureMode {
    #[default]
    Normal,
    HighPriority,
}

/// Winner of a conflict between the element's drag and a sibling gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePrecedence {
    Element,
    Sibling,
}

impl GestureMode {
    /// Equal modes favour the element, whose gesture is the more specific.
    pub fn precedence_against(self, sibling: GestureMode) -> GesturePrecedence {
        match (self, sibling) {
            (GestureMode::Normal, GestureMode::HighPriority) => GesturePrecedence::Sibling,
            _ => GesturePrecedence::Element,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACKED: ContainerId = ContainerId(7);

    #[test]
    fn only_the_tracked_container_pan_runs_together() {
        let config = ArbitrationConfig::default();
        assert!(should_recognize_simultaneously(
            &config,
            Some(TRACKED),
            &GestureDescriptor::container_pan(TRACKED)
        ));
        assert!(!should_recognize_simultaneously(
            &config,
            Some(TRACKED),
            &GestureDescriptor::container_pan(ContainerId(8))
        ));
        assert!(!should_recognize_simultaneously(
            &config,
            None,
            &GestureDescriptor::new(GestureKind::Pan)
        ));
        assert!(!should_recognize_simultaneously(
            &config,
            Some(TRACKED),
            &GestureDescriptor::new(GestureKind::Tap)
        ));
    }

    #[test]
    fn screen_edge_pans_never_run_together() {
        let edge = GestureDescriptor {
            kind: GestureKind::ScreenEdgePan,
            container: Some(TRACKED),
        };
        assert!(!should_recognize_simultaneously(
            &ArbitrationConfig::default(),
            Some(TRACKED),
            &edge
        ));
    }

    #[test]
    fn ignoring_scroll_views_excludes_container_gestures() {
        let config = ArbitrationConfig::default().with_ignores_scroll_view(true);
        assert!(!should_recognize_simultaneously(
            &config,
            Some(TRACKED),
            &GestureDescriptor::container_pan(TRACKED)
        ));
    }

    #[test]
    fn high_priority_beats_normal() {
        use GestureMode::*;
        assert_eq!(HighPriority.precedence_against(Normal), GesturePrecedence::Element);
        assert_eq!(Normal.precedence_against(HighPriority), GesturePrecedence::Sibling);
        assert_eq!(Normal.precedence_against(Normal), GesturePrecedence::Element);
    }
}
