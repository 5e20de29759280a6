use crate::error::{CoreError, Result};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Which edge of a segment a resize drags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResizeEdge {
    Start,
    End,
}

/// End of the last-ending segment, or 0 for an empty timeline.
pub fn total_duration(segments: &[VideoSegment]) -> f64 {
    segments.iter().map(VideoSegment::end_time).fold(0.0, f64::max)
}

/// Sort by start time and push each segment forward so it begins no earlier
/// than the previous one ends. Ties keep their sequence order.
pub fn normalize_segments(segments: &[VideoSegment]) -> Vec<VideoSegment> {
    let mut sorted = segments.to_vec();
    sorted.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    for i in 1..sorted.len() {
        let prev_end = sorted[i - 1].end_time();
        if sorted[i].start_time < prev_end {
            sorted[i].start_time = prev_end;
        }
    }

    sorted
}

/// Apply a resize to a single segment.
///
/// `Start` moves the in-point by `delta` (never before 0) and shrinks or grows
/// the duration by the amount actually moved, keeping the end fixed. `End`
/// changes the duration only. Fails if the duration would end up `<= 0`.
pub fn resized(segment: &VideoSegment, delta: f64, edge: ResizeEdge) -> Result<VideoSegment> {
    let (start_time, duration) = match edge {
        ResizeEdge::Start => {
            let new_start = (segment.start_time + delta).max(0.0);
            let moved = new_start - segment.start_time;
            (new_start, segment.duration - moved)
        }
        ResizeEdge::End => (segment.start_time, segment.duration + delta),
    };

    if duration <= 0.0 {
        return Err(CoreError::InvalidOperation(
            "segment duration must stay positive".into(),
        ));
    }

    Ok(VideoSegment {
        start_time,
        duration,
        ..segment.clone()
    })
}

/// Resize the segment with `id` and re-normalize the whole sequence.
pub fn resize_segments(
    segments: &[VideoSegment],
    id: SegmentId,
    delta: f64,
    edge: ResizeEdge,
) -> Result<Vec<VideoSegment>> {
    let idx = segments
        .iter()
        .position(|s| s.id == id)
        .ok_or(CoreError::SegmentNotFound(id))?;

    let mut updated = segments.to_vec();
    updated[idx] = resized(&segments[idx], delta, edge)?;
    Ok(normalize_segments(&updated))
}
