use super::*;
use canvas::remap::SurfaceBox;

fn overlay(regions: Vec<RemappedErrorRegion>) -> Overlay {
    Overlay {
        crop: Rect::new(0.0, 0.0, 100.0, 100.0),
        regions,
        translated_handwriting: None,
        ocr_text: None,
        ai_feedback: None,
        image_gcs_url: None,
    }
}

#[test]
fn only_idle_is_free() {
    assert!(!Phase::Idle.is_busy());
    for phase in [
        Phase::BoundsPending,
        Phase::Selecting,
        Phase::Exporting,
        Phase::AwaitingService,
        Phase::Remapping,
        Phase::Done(Outcome::Success),
    ] {
        assert!(phase.is_busy(), "{phase:?}");
    }
}

#[test]
fn loading_covers_background_work_only() {
    assert!(Phase::AwaitingService.is_loading());
    assert!(Phase::Exporting.is_loading());
    assert!(!Phase::Selecting.is_loading());
    assert!(!Phase::Done(Outcome::Failure).is_loading());
}

#[test]
fn overlay_without_regions_is_correct() {
    assert!(overlay(Vec::new()).is_correct());
    let region = RemappedErrorRegion { bounds: SurfaceBox { x1: 0.0, y1: 0.0, x2: 1.0, y2: 1.0 }, text: "x".into() };
    assert!(!overlay(vec![region]).is_correct());
}

#[test]
fn default_view_is_idle_and_empty() {
    let view = FeedbackView::default();
    assert_eq!(view.phase, Phase::Idle);
    assert_eq!(view.generation, 0);
    assert!(view.bounding_box.is_none() && view.overlay.is_none() && view.error.is_none());
    assert!(!view.is_loading());
}
