use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SegmentId = Uuid;
pub type OverlayId = Uuid;

// ---------------------------------------------------------------------------
// VideoSegment
// ---------------------------------------------------------------------------

/// One media source placed on the timeline. Times are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoSegment {
    pub id: SegmentId,
    pub source: String,
    pub start_time: f64,
    pub duration: f64,
}

impl VideoSegment {
    /// A fresh segment at time zero. `ADD_SEGMENT` decides the real start.
    pub fn new(source: impl Into<String>, duration: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            start_time: 0.0,
            duration,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Half-open containment: `[start, end)`.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time()
    }
}

// ---------------------------------------------------------------------------
// OverlayGeometry
// ---------------------------------------------------------------------------

/// Placement of an overlay as fractions of the video frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OverlayGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl OverlayGeometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl Default for OverlayGeometry {
    fn default() -> Self {
        Self::new(0.1, 0.1, 0.3, 0.1)
    }
}

/// Partial geometry used by `RESIZE_OVERLAY`. Unset fields keep their value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct GeometryPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl GeometryPatch {
    pub fn apply_to(&self, geometry: OverlayGeometry) -> OverlayGeometry {
        OverlayGeometry {
            x: self.x.unwrap_or(geometry.x),
            y: self.y.unwrap_or(geometry.y),
            width: self.width.unwrap_or(geometry.width),
            height: self.height.unwrap_or(geometry.height),
        }
    }
}

// ---------------------------------------------------------------------------
// TextStyle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub color: String,
    pub background_color: String,
    pub background_opacity: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            color: "#ffffff".to_string(),
            background_color: "#000000".to_string(),
            background_opacity: 0.4,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextStylePatch {
    pub font_size: Option<f64>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub background_opacity: Option<f64>,
}

impl TextStylePatch {
    /// Merge onto `base`, falling back to [`TextStyle::default`] for anything
    /// neither side sets.
    pub fn merge_onto(&self, base: Option<&TextStyle>) -> TextStyle {
        let base = base.cloned().unwrap_or_default();
        TextStyle {
            font_size: self.font_size.unwrap_or(base.font_size),
            color: self.color.clone().unwrap_or(base.color),
            background_color: self
                .background_color
                .clone()
                .unwrap_or(base.background_color),
            background_opacity: self
                .background_opacity
                .unwrap_or(base.background_opacity),
        }
    }
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OverlayKind {
    Text,
    Image,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Overlay {
    pub id: OverlayId,
    pub kind: OverlayKind,
    pub geometry: OverlayGeometry,
    pub text: Option<String>,
    pub image_src: Option<String>,
    pub text_style: Option<TextStyle>,
}

impl Overlay {
    pub fn text(text: impl Into<String>, geometry: OverlayGeometry) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: OverlayKind::Text,
            geometry,
            text: Some(text.into()),
            image_src: None,
            text_style: None,
        }
    }

    pub fn image(image_src: impl Into<String>, geometry: OverlayGeometry) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: OverlayKind::Image,
            geometry,
            text: None,
            image_src: Some(image_src.into()),
            text_style: None,
        }
    }
}

// ---------------------------------------------------------------------------
// OverlayTiming
// ---------------------------------------------------------------------------

/// Visible window of an overlay inside one segment, relative to the segment start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayTiming {
    pub overlay_id: OverlayId,
    pub segment_id: SegmentId,
    pub start_time: f64,
    pub duration: f64,
}

impl OverlayTiming {
    /// Absolute `[start, end)` window on the timeline given the owning segment.
    pub fn absolute_window(&self, segment: &VideoSegment) -> (f64, f64) {
        let start = segment.start_time + self.start_time;
        (start, start + self.duration)
    }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Timeline {
    pub segments: Vec<VideoSegment>,
    pub overlays: Vec<Overlay>,
    /// Cached `total_duration(&segments)`, refreshed by every structural edit.
    pub duration: f64,
}

// ---------------------------------------------------------------------------
// EditorState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EditorState {
    pub timeline: Timeline,
    pub current_time: f64,
    pub is_playing: bool,
    pub overlay_timings: Vec<OverlayTiming>,
    pub selected_overlay_id: Option<OverlayId>,
    pub editing_overlay_id: Option<OverlayId>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
