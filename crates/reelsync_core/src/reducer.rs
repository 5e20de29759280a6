use crate::action::EditorAction;
use crate::error::{CoreError, Result};
use crate::types::*;

/// Apply one action to a state snapshot and return the next snapshot.
///
/// Total over [`EditorAction`]: an edit that is rejected or references an
/// unknown segment/overlay yields a copy of `state`, never an error.
pub fn reduce(state: &EditorState, action: &EditorAction) -> EditorState {
    let mut next = state.clone();
    match apply(&mut next, action) {
        Ok(()) => next,
        Err(_) => state.clone(),
    }
}

fn apply(state: &mut EditorState, action: &EditorAction) -> Result<()> {
    match action {
        EditorAction::Play => state.is_playing = true,
        EditorAction::Pause => state.is_playing = false,
        EditorAction::SetTime(t) => state.current_time = t.max(0.0),
        EditorAction::Tick(dt) => {
            let next_time = state.current_time + dt;
            // Overshoot wraps to the start and stops playback.
            if next_time >= state.timeline.duration {
                state.current_time = 0.0;
                state.is_playing = false;
            } else {
                state.current_time = next_time.max(0.0);
            }
        }

        EditorAction::AddSegment(segment) => state.timeline.append_segment(segment.clone())?,
        EditorAction::MoveSegment { segment_id, delta } => {
            state.timeline.move_segment(*segment_id, *delta)?
        }
        EditorAction::ResizeSegment {
            segment_id,
            delta,
            edge,
        } => state.timeline.resize_segment(*segment_id, *delta, *edge)?,

        EditorAction::AddOverlay(overlay) => state.timeline.add_overlay(overlay.clone()),
        EditorAction::AddOverlayTiming(timing) => {
            ensure_overlay(state, timing.overlay_id)?;
            if state.timeline.segment(timing.segment_id).is_none() {
                return Err(CoreError::SegmentNotFound(timing.segment_id));
            }
            state.overlay_timings.push(timing.clone());
        }
        EditorAction::UpdateOverlayTiming(timing) => {
            let existing = state
                .overlay_timings
                .iter_mut()
                .find(|t| t.overlay_id == timing.overlay_id && t.segment_id == timing.segment_id)
                .ok_or_else(|| {
                    CoreError::InvalidOperation("no timing for overlay/segment pair".into())
                })?;
            *existing = timing.clone();
        }
        EditorAction::UpdateOverlayGeometry {
            overlay_id,
            geometry,
        } => state.timeline.set_overlay_geometry(*overlay_id, *geometry)?,
        EditorAction::MoveOverlay { overlay_id, dx, dy } => {
            state.timeline.move_overlay(*overlay_id, *dx, *dy)?
        }
        EditorAction::ResizeOverlay {
            overlay_id,
            geometry,
        } => state.timeline.resize_overlay(*overlay_id, *geometry)?,
        EditorAction::UpdateOverlayContent {
            overlay_id,
            text,
            image_src,
        } => state
            .timeline
            .update_overlay_content(*overlay_id, text.clone(), image_src.clone())?,
        EditorAction::UpdateTextStyle { overlay_id, style } => {
            state.timeline.update_text_style(*overlay_id, style)?
        }

        EditorAction::SelectOverlay(id) => {
            ensure_overlay(state, *id)?;
            state.selected_overlay_id = Some(*id);
            state.editing_overlay_id = None;
        }
        EditorAction::StartEditText(id) => {
            ensure_overlay(state, *id)?;
            state.selected_overlay_id = Some(*id);
            state.editing_overlay_id = Some(*id);
        }
        EditorAction::DeselectOverlay => {
            state.selected_overlay_id = None;
            state.editing_overlay_id = None;
        }
    }
    Ok(())
}

fn ensure_overlay(state: &EditorState, id: OverlayId) -> Result<()> {
    state
        .timeline
        .overlay(id)
        .map(|_| ())
        .ok_or(CoreError::OverlayNotFound(id))
}

// ---------------------------------------------------------------------------
// EditorStore
// ---------------------------------------------------------------------------

/// Owns the authoritative [`EditorState`]. The only way to change it is
/// [`EditorStore::dispatch`].
#[derive(Debug, Default)]
pub struct EditorStore {
    state: EditorState,
    revision: u64,
}

impl EditorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: EditorState) -> Self {
        Self { state, revision: 0 }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Bumped every time a dispatch actually changes the state.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Reduce `action` into the held state. Returns whether anything changed.
    pub fn dispatch(&mut self, action: &EditorAction) -> bool {
        let next = reduce(&self.state, action);
        if next == self.state {
            return false;
        }
        self.state = next;
        self.revision += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrange::{total_duration, ResizeEdge};
    use crate::resolve::resolve_active_segment;
    use proptest::prelude::*;
    use uuid::Uuid;

    /// A at 0..5 and B at 5..10.
    fn make_store() -> (EditorStore, SegmentId, SegmentId) {
        let mut store = EditorStore::new();
        let a = VideoSegment::new("a.mp4", 5.0);
        let b = VideoSegment::new("b.mp4", 5.0);
        let (a_id, b_id) = (a.id, b.id);
        store.dispatch(&EditorAction::AddSegment(a));
        store.dispatch(&EditorAction::AddSegment(b));
        (store, a_id, b_id)
    }

    fn with_overlay(store: &mut EditorStore) -> OverlayId {
        let overlay = Overlay::text("caption", OverlayGeometry::new(0.4, 0.4, 0.2, 0.2));
        let id = overlay.id;
        store.dispatch(&EditorAction::AddOverlay(overlay));
        id
    }

    #[test]
    fn play_and_pause_are_idempotent() {
        let mut store = EditorStore::new();
        assert!(store.dispatch(&EditorAction::Play));
        assert!(!store.dispatch(&EditorAction::Play));
        assert!(store.state().is_playing);
        assert!(store.dispatch(&EditorAction::Pause));
        assert!(!store.dispatch(&EditorAction::Pause));
        assert!(!store.state().is_playing);
    }

    #[test]
    fn set_time_clamps_negative_to_zero() {
        let (mut store, _, _) = make_store();
        store.dispatch(&EditorAction::SetTime(-3.0));
        assert_eq!(store.state().current_time, 0.0);
        store.dispatch(&EditorAction::SetTime(7.5));
        assert_eq!(store.state().current_time, 7.5);
    }

    #[test]
    fn tick_advances_time() {
        let (mut store, _, _) = make_store();
        store.dispatch(&EditorAction::Play);
        store.dispatch(&EditorAction::Tick(1.25));
        store.dispatch(&EditorAction::Tick(0.25));
        assert_eq!(store.state().current_time, 1.5);
        assert!(store.state().is_playing);
    }

    #[test]
    fn tick_crossing_duration_wraps_and_stops() {
        let (mut store, _, _) = make_store();
        store.dispatch(&EditorAction::Play);
        for _ in 0..9 {
            store.dispatch(&EditorAction::Tick(1.0));
        }
        assert_eq!(store.state().current_time, 9.0);
        store.dispatch(&EditorAction::Tick(1.5));
        assert_eq!(store.state().current_time, 0.0);
        assert!(!store.state().is_playing);
    }

    #[test]
    fn tick_on_empty_timeline_stops() {
        let mut store = EditorStore::new();
        store.dispatch(&EditorAction::Play);
        store.dispatch(&EditorAction::Tick(0.1));
        assert_eq!(store.state().current_time, 0.0);
        assert!(!store.state().is_playing);
    }

    #[test]
    fn set_time_then_resolve_scenario() {
        let (mut store, a, b) = make_store();

        store.dispatch(&EditorAction::SetTime(4.0));
        let st = store.state();
        let hit = resolve_active_segment(st.current_time, &st.timeline.segments).unwrap();
        assert_eq!((hit.segment.id, hit.local_time), (a, 4.0));

        store.dispatch(&EditorAction::SetTime(6.0));
        let st = store.state();
        let hit = resolve_active_segment(st.current_time, &st.timeline.segments).unwrap();
        assert_eq!((hit.segment.id, hit.local_time), (b, 1.0));

        store.dispatch(&EditorAction::SetTime(11.0));
        let st = store.state();
        assert!(resolve_active_segment(st.current_time, &st.timeline.segments).is_none());
    }

    #[test]
    fn resize_end_scenario() {
        let (mut store, a, b) = make_store();
        store.dispatch(&EditorAction::ResizeSegment {
            segment_id: a,
            delta: -2.0,
            edge: ResizeEdge::End,
        });
        let tl = &store.state().timeline;
        assert_eq!(tl.segment(a).unwrap().duration, 3.0);
        assert_eq!(tl.segment(b).unwrap().start_time, 5.0);
    }

    #[test]
    fn move_segment_scenario() {
        let (mut store, a, b) = make_store();
        store.dispatch(&EditorAction::MoveSegment {
            segment_id: b,
            delta: -8.0,
        });
        let tl = &store.state().timeline;
        let a_seg = tl.segment(a).unwrap();
        assert_eq!(tl.segment(b).unwrap().start_time, a_seg.start_time + a_seg.duration);
    }

    #[test]
    fn duration_tracks_segments_after_structural_actions() {
        let (mut store, a, b) = make_store();
        let actions = vec![
            EditorAction::MoveSegment {
                segment_id: b,
                delta: 2.5,
            },
            EditorAction::ResizeSegment {
                segment_id: a,
                delta: 4.0,
                edge: ResizeEdge::End,
            },
            EditorAction::ResizeSegment {
                segment_id: b,
                delta: 1.0,
                edge: ResizeEdge::Start,
            },
            EditorAction::AddSegment(VideoSegment::new("c.mp4", 1.5)),
            EditorAction::MoveSegment {
                segment_id: a,
                delta: -100.0,
            },
            EditorAction::ResizeSegment {
                segment_id: a,
                delta: -100.0,
                edge: ResizeEdge::End,
            },
        ];
        for action in actions {
            assert!(action.is_structural());
            store.dispatch(&action);
            let tl = &store.state().timeline;
            assert_eq!(tl.duration, total_duration(&tl.segments));
            assert_eq!(tl.duration == 0.0, tl.segments.is_empty());
        }
    }

    #[test]
    fn degenerate_segments_are_not_added() {
        let mut store = EditorStore::new();
        for duration in [0.0, -3.0, f64::NAN] {
            assert!(!store.dispatch(&EditorAction::AddSegment(VideoSegment::new("bad.mp4", duration))));
            let tl = &store.state().timeline;
            assert!(tl.segments.is_empty());
            assert_eq!(tl.duration, 0.0);
        }
        assert_eq!(store.revision(), 0);

        assert!(store.dispatch(&EditorAction::AddSegment(VideoSegment::new("ok.mp4", 2.0))));
        let tl = &store.state().timeline;
        assert_eq!(tl.duration == 0.0, tl.segments.is_empty());
        assert_eq!(tl.duration, 2.0);
    }

    #[test]
    fn rejected_resize_returns_prior_state() {
        let (mut store, a, _) = make_store();
        let before = store.state().clone();
        let rev = store.revision();
        let changed = store.dispatch(&EditorAction::ResizeSegment {
            segment_id: a,
            delta: -5.0,
            edge: ResizeEdge::End,
        });
        assert!(!changed);
        assert_eq!(store.state(), &before);
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let (mut store, a, _) = make_store();
        let overlay = with_overlay(&mut store);
        let before = store.state().clone();
        let missing = Uuid::new_v4();

        let actions = vec![
            EditorAction::MoveSegment {
                segment_id: missing,
                delta: 1.0,
            },
            EditorAction::MoveOverlay {
                overlay_id: missing,
                dx: 0.1,
                dy: 0.1,
            },
            EditorAction::SelectOverlay(missing),
            EditorAction::StartEditText(missing),
            EditorAction::AddOverlayTiming(OverlayTiming {
                overlay_id: overlay,
                segment_id: missing,
                start_time: 0.0,
                duration: 1.0,
            }),
            EditorAction::AddOverlayTiming(OverlayTiming {
                overlay_id: missing,
                segment_id: a,
                start_time: 0.0,
                duration: 1.0,
            }),
            EditorAction::UpdateOverlayTiming(OverlayTiming {
                overlay_id: overlay,
                segment_id: a,
                start_time: 0.0,
                duration: 1.0,
            }),
        ];
        for action in actions {
            assert!(!store.dispatch(&action), "{action:?} changed state");
        }
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn overlay_geometry_stays_in_frame_for_extreme_deltas() {
        let mut store = EditorStore::new();
        let id = with_overlay(&mut store);
        let deltas = [-1e6, -3.0, -0.7, 0.0, 0.33, 0.9, 2.0, 1e6];
        for &dx in &deltas {
            for &dy in &deltas {
                store.dispatch(&EditorAction::MoveOverlay {
                    overlay_id: id,
                    dx,
                    dy,
                });
                store.dispatch(&EditorAction::ResizeOverlay {
                    overlay_id: id,
                    geometry: GeometryPatch {
                        width: Some(dx),
                        height: Some(dy),
                        ..Default::default()
                    },
                });
                let g = store.state().timeline.overlay(id).unwrap().geometry;
                assert!((0.05..=1.0).contains(&g.width));
                assert!((0.05..=1.0).contains(&g.height));
                assert!(g.x >= 0.0 && g.x <= 1.0 - g.width + 1e-12);
                assert!(g.y >= 0.0 && g.y <= 1.0 - g.height + 1e-12);
            }
        }
    }

    #[test]
    fn update_overlay_geometry_is_constrained() {
        let mut store = EditorStore::new();
        let id = with_overlay(&mut store);
        store.dispatch(&EditorAction::UpdateOverlayGeometry {
            overlay_id: id,
            geometry: OverlayGeometry::new(-1.0, 2.0, 0.0, 5.0),
        });
        let g = store.state().timeline.overlay(id).unwrap().geometry;
        assert_eq!(g, OverlayGeometry::new(0.0, 0.0, 0.05, 1.0));
    }

    #[test]
    fn timings_are_added_and_replaced_by_pair() {
        let (mut store, a, b) = make_store();
        let overlay = with_overlay(&mut store);
        let timing = |segment_id, start_time| OverlayTiming {
            overlay_id: overlay,
            segment_id,
            start_time,
            duration: 1.0,
        };
        store.dispatch(&EditorAction::AddOverlayTiming(timing(a, 0.0)));
        store.dispatch(&EditorAction::AddOverlayTiming(timing(b, 0.0)));
        store.dispatch(&EditorAction::UpdateOverlayTiming(timing(b, 2.5)));

        let timings = &store.state().overlay_timings;
        assert_eq!(timings.len(), 2);
        assert_eq!(timings[0].start_time, 0.0);
        assert_eq!(timings[1].start_time, 2.5);
    }

    #[test]
    fn content_and_style_merge_by_id() {
        let mut store = EditorStore::new();
        let id = with_overlay(&mut store);
        store.dispatch(&EditorAction::UpdateOverlayContent {
            overlay_id: id,
            text: Some("edited".into()),
            image_src: None,
        });
        store.dispatch(&EditorAction::UpdateTextStyle {
            overlay_id: id,
            style: TextStylePatch {
                color: Some("#ff00ff".into()),
                ..Default::default()
            },
        });
        let overlay = store.state().timeline.overlay(id).unwrap();
        assert_eq!(overlay.text.as_deref(), Some("edited"));
        let style = overlay.text_style.as_ref().unwrap();
        assert_eq!(style.color, "#ff00ff");
        assert_eq!(style.font_size, 16.0);
        assert_eq!(style.background_color, "#000000");
        assert_eq!(style.background_opacity, 0.4);
    }

    #[test]
    fn selection_and_edit_mode_stay_consistent() {
        let mut store = EditorStore::new();
        let first = with_overlay(&mut store);
        let second = with_overlay(&mut store);

        let consistent = |st: &EditorState| match st.editing_overlay_id {
            Some(editing) => st.selected_overlay_id == Some(editing),
            None => true,
        };

        store.dispatch(&EditorAction::StartEditText(first));
        assert_eq!(store.state().selected_overlay_id, Some(first));
        assert_eq!(store.state().editing_overlay_id, Some(first));
        assert!(consistent(store.state()));

        store.dispatch(&EditorAction::SelectOverlay(second));
        assert_eq!(store.state().selected_overlay_id, Some(second));
        assert_eq!(store.state().editing_overlay_id, None);
        assert!(consistent(store.state()));

        store.dispatch(&EditorAction::StartEditText(second));
        store.dispatch(&EditorAction::DeselectOverlay);
        assert_eq!(store.state().selected_overlay_id, None);
        assert_eq!(store.state().editing_overlay_id, None);
    }

    #[test]
    fn reduce_does_not_touch_input_snapshot() {
        let (store, _, _) = make_store();
        let snapshot = store.state().clone();
        let next = reduce(&snapshot, &EditorAction::SetTime(3.0));
        assert_eq!(snapshot.current_time, 0.0);
        assert_eq!(next.current_time, 3.0);
    }

    proptest! {
        #[test]
        fn overlay_stays_in_frame_after_any_move_and_resize(
            dx in -1e6f64..1e6,
            dy in -1e6f64..1e6,
            width in prop_oneof![-10.0f64..10.0, Just(f64::NAN), Just(f64::INFINITY)],
            height in prop_oneof![-10.0f64..10.0, Just(f64::NAN), Just(f64::NEG_INFINITY)],
        ) {
            let mut store = EditorStore::new();
            let id = with_overlay(&mut store);
            store.dispatch(&EditorAction::MoveOverlay { overlay_id: id, dx, dy });
            store.dispatch(&EditorAction::ResizeOverlay {
                overlay_id: id,
                geometry: GeometryPatch {
                    width: Some(width),
                    height: Some(height),
                    ..Default::default()
                },
            });
            store.dispatch(&EditorAction::MoveOverlay { overlay_id: id, dx: dy, dy: dx });

            let g = store.state().timeline.overlay(id).unwrap().geometry;
            prop_assert!((0.05..=1.0).contains(&g.width));
            prop_assert!((0.05..=1.0).contains(&g.height));
            prop_assert!(g.x >= 0.0 && g.x <= 1.0 - g.width + 1e-12);
            prop_assert!(g.y >= 0.0 && g.y <= 1.0 - g.height + 1e-12);
        }
    }
}
