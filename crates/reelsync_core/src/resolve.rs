use crate::types::*;

/// A segment together with the playback position inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentTime<'a> {
    pub segment: &'a VideoSegment,
    pub local_time: f64,
}

/// Find the segment playing at timeline `time`.
///
/// Scans in sequence order and returns the first segment whose `[start, end)`
/// interval contains `time`, so overlapping input still resolves
/// deterministically. Gaps, times past the end and empty timelines give `None`.
pub fn resolve_active_segment(time: f64, segments: &[VideoSegment]) -> Option<SegmentTime<'_>> {
    segments
        .iter()
        .find(|segment| segment.contains(time))
        .map(|segment| SegmentTime {
            segment,
            local_time: time - segment.start_time,
        })
}

/// Overlays visible at `time`, in overlay order.
///
/// An overlay is visible when any of its timings covers `time` in absolute
/// timeline terms. Timings pointing at unknown segments are ignored.
pub fn active_overlays(state: &EditorState, time: f64) -> Vec<&Overlay> {
    state
        .timeline
        .overlays
        .iter()
        .filter(|overlay| {
            state
                .overlay_timings
                .iter()
                .filter(|t| t.overlay_id == overlay.id)
                .any(|t| {
                    state
                        .timeline
                        .segments
                        .iter()
                        .find(|s| s.id == t.segment_id)
                        .map(|s| {
                            let (start, end) = t.absolute_window(s);
                            time >= start && time < end
                        })
                        .unwrap_or(false)
                })
        })
        .collect()
}
