use crate::error::Result;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Export projection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentExport {
    pub id: SegmentId,
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementExport {
    pub segment_id: SegmentId,
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayExport {
    pub id: OverlayId,
    pub text: Option<String>,
    pub geometry: OverlayGeometry,
    pub placements: Vec<PlacementExport>,
}

/// Read-only view of the committed timeline for a downstream render step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineExport {
    pub segments: Vec<SegmentExport>,
    pub overlays: Vec<OverlayExport>,
}

pub fn export_timeline(state: &EditorState) -> TimelineExport {
    let segments = state
        .timeline
        .segments
        .iter()
        .map(|s| SegmentExport {
            id: s.id,
            start: s.start_time,
            duration: s.duration,
        })
        .collect();

    let overlays = state
        .timeline
        .overlays
        .iter()
        .map(|o| OverlayExport {
            id: o.id,
            text: o.text.clone(),
            geometry: o.geometry,
            placements: state
                .overlay_timings
                .iter()
                .filter(|t| t.overlay_id == o.id)
                .map(|t| PlacementExport {
                    segment_id: t.segment_id,
                    start: t.start_time,
                    duration: t.duration,
                })
                .collect(),
        })
        .collect();

    TimelineExport { segments, overlays }
}

impl TimelineExport {
    /// Write as pretty-printed JSON.
    /// Automatically appends `.json` extension if not present.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = ensure_extension(path.as_ref());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }
}

fn ensure_extension(path: &Path) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        path.to_path_buf()
    } else {
        let mut p = path.to_path_buf();
        let mut name = p.file_name().unwrap_or_default().to_os_string();
        name.push(".json");
        p.set_file_name(name);
        p
    }
}
