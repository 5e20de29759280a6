use crate::arrange::ResizeEdge;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Every mutation of [`EditorState`] goes through one of these.
///
/// User input and player feedback are both expressed as actions and applied
/// by [`crate::reducer::reduce`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EditorAction {
    // -- Playback -----------------------------------------------------------
    Play,
    Pause,
    /// Seek, from the user or from a programmatic reset.
    SetTime(f64),
    /// Advance by this many seconds of observed player time.
    Tick(f64),

    // -- Segments -----------------------------------------------------------
    AddSegment(VideoSegment),
    MoveSegment {
        segment_id: SegmentId,
        delta: f64,
    },
    ResizeSegment {
        segment_id: SegmentId,
        delta: f64,
        edge: ResizeEdge,
    },

    // -- Overlays -----------------------------------------------------------
    AddOverlay(Overlay),
    AddOverlayTiming(OverlayTiming),
    /// Replaces the timing with the same overlay/segment pair.
    UpdateOverlayTiming(OverlayTiming),
    UpdateOverlayGeometry {
        overlay_id: OverlayId,
        geometry: OverlayGeometry,
    },
    MoveOverlay {
        overlay_id: OverlayId,
        dx: f64,
        dy: f64,
    },
    ResizeOverlay {
        overlay_id: OverlayId,
        geometry: GeometryPatch,
    },
    UpdateOverlayContent {
        overlay_id: OverlayId,
        text: Option<String>,
        image_src: Option<String>,
    },
    UpdateTextStyle {
        overlay_id: OverlayId,
        style: TextStylePatch,
    },

    // -- Selection ----------------------------------------------------------
    SelectOverlay(OverlayId),
    StartEditText(OverlayId),
    DeselectOverlay,
}

impl EditorAction {
    /// Actions that change segment layout and therefore the cached duration.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            EditorAction::AddSegment(_)
                | EditorAction::MoveSegment { .. }
                | EditorAction::ResizeSegment { .. }
        )
    }
}
