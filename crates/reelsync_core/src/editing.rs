use crate::arrange::{normalize_segments, resize_segments, total_duration, ResizeEdge};
use crate::error::{CoreError, Result};
use crate::geometry::constrain_overlay;
use crate::types::*;

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segment(&self, id: SegmentId) -> Option<&VideoSegment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id == id)
    }

    /// Append a segment directly after the current last one (or at 0).
    /// The incoming `start_time` is ignored. Segments without a positive,
    /// finite duration are rejected.
    pub fn append_segment(&mut self, mut segment: VideoSegment) -> Result<()> {
        if !(segment.duration.is_finite() && segment.duration > 0.0) {
            return Err(CoreError::InvalidOperation(format!(
                "segment duration must be positive, got {}",
                segment.duration
            )));
        }
        segment.start_time = self.segments.last().map_or(0.0, VideoSegment::end_time);
        self.segments.push(segment);
        self.refresh_duration();
        Ok(())
    }

    /// Shift a segment's start by `delta` (never before 0), then re-normalize.
    pub fn move_segment(&mut self, id: SegmentId, delta: f64) -> Result<()> {
        let idx = self.segment_index(id)?;

        let mut segments = self.segments.clone();
        let seg = &mut segments[idx];
        seg.start_time = (seg.start_time + delta).max(0.0);

        self.segments = normalize_segments(&segments);
        self.refresh_duration();
        Ok(())
    }

    /// Resize a segment from one edge. A resize that would leave a non-positive
    /// duration is rejected and the timeline is left untouched.
    pub fn resize_segment(&mut self, id: SegmentId, delta: f64, edge: ResizeEdge) -> Result<()> {
        self.segments = resize_segments(&self.segments, id, delta, edge)?;
        self.refresh_duration();
        Ok(())
    }

    pub fn add_overlay(&mut self, overlay: Overlay) {
        self.overlays.push(overlay);
    }

    /// Nudge an overlay by a fraction of the frame. The result is constrained.
    pub fn move_overlay(&mut self, id: OverlayId, dx: f64, dy: f64) -> Result<()> {
        let overlay = self.overlay_mut(id)?;
        let g = overlay.geometry;
        overlay.geometry = constrain_overlay(OverlayGeometry {
            x: g.x + dx,
            y: g.y + dy,
            ..g
        });
        Ok(())
    }

    /// Patch an overlay's geometry. The result is constrained.
    pub fn resize_overlay(&mut self, id: OverlayId, patch: GeometryPatch) -> Result<()> {
        let overlay = self.overlay_mut(id)?;
        overlay.geometry = constrain_overlay(patch.apply_to(overlay.geometry));
        Ok(())
    }

    /// Replace an overlay's geometry. The result is constrained.
    pub fn set_overlay_geometry(&mut self, id: OverlayId, geometry: OverlayGeometry) -> Result<()> {
        let overlay = self.overlay_mut(id)?;
        overlay.geometry = constrain_overlay(geometry);
        Ok(())
    }

    /// Replace text and/or image source; `None` keeps the current value.
    pub fn update_overlay_content(
        &mut self,
        id: OverlayId,
        text: Option<String>,
        image_src: Option<String>,
    ) -> Result<()> {
        let overlay = self.overlay_mut(id)?;
        if let Some(text) = text {
            overlay.text = Some(text);
        }
        if let Some(src) = image_src {
            overlay.image_src = Some(src);
        }
        Ok(())
    }

    pub fn update_text_style(&mut self, id: OverlayId, patch: &TextStylePatch) -> Result<()> {
        let overlay = self.overlay_mut(id)?;
        overlay.text_style = Some(patch.merge_onto(overlay.text_style.as_ref()));
        Ok(())
    }

    fn refresh_duration(&mut self) {
        self.duration = total_duration(&self.segments);
    }

    fn segment_index(&self, id: SegmentId) -> Result<usize> {
        self.segments
            .iter()
            .position(|s| s.id == id)
            .ok_or(CoreError::SegmentNotFound(id))
    }

    fn overlay_mut(&mut self, id: OverlayId) -> Result<&mut Overlay> {
        self.overlays
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(CoreError::OverlayNotFound(id))
    }
}
