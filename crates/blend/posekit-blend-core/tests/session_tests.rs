use posekit_blend_core::{
    AttrRef, BlendEngine, BlendError, PoseAsset, PoseData, RigHandle, SessionPhase,
};
use posekit_rig_memory::MemoryScene;

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn attr(s: &str) -> AttrRef {
    AttrRef::parse(s).unwrap()
}

fn mk_scene(attrs: &[(&str, f32)]) -> (MemoryScene, RigHandle) {
    let rig = RigHandle::from("hero");
    let mut scene = MemoryScene::new();
    scene.add_rig(rig.clone());
    for (name, value) in attrs {
        scene.add_attr(&rig, attr(name), *value);
    }
    (scene, rig)
}

fn mk_pose(name: &str, values: &[(&str, f32)]) -> PoseAsset {
    let data: PoseData = values.iter().map(|(k, v)| (attr(k), *v)).collect();
    PoseAsset::new(name, data)
}

/// it should write pre + (target - pre) * w for every shared attribute
#[test]
fn blend_writes_lerp_for_every_shared_attr() {
    let (scene, rig) = mk_scene(&[("a_ctrl.tx", 2.0), ("b_ctrl.ty", -1.0)]);
    let pose = mk_pose("reach", &[("a_ctrl.tx", 6.0), ("b_ctrl.ty", 3.0)]);
    let mut engine = BlendEngine::new(scene);

    engine.begin_blend(&pose, &rig).unwrap();

    let report = engine.blend(0.25);
    assert_eq!(report.written, 2);
    assert!(report.is_clean());
    approx(engine.host().value_of(&attr("a_ctrl.tx")).unwrap(), 3.0, 1e-6);
    approx(engine.host().value_of(&attr("b_ctrl.ty")).unwrap(), 0.0, 1e-6);

    // weight 0 reproduces the pre-blend capture exactly
    engine.blend(0.0);
    assert_eq!(engine.host().value_of(&attr("a_ctrl.tx")), Some(2.0));
    assert_eq!(engine.host().value_of(&attr("b_ctrl.ty")), Some(-1.0));

    // weight 1 reproduces the target capture
    engine.blend(1.0);
    approx(engine.host().value_of(&attr("a_ctrl.tx")).unwrap(), 6.0, 1e-6);
    approx(engine.host().value_of(&attr("b_ctrl.ty")).unwrap(), 3.0, 1e-6);
}

/// it should produce identical writes when blending the same weight twice
#[test]
fn blend_is_idempotent_for_repeated_weights() {
    let (scene, rig) = mk_scene(&[("a_ctrl.tx", 0.1), ("b_ctrl.ty", 7.3)]);
    let pose = mk_pose("reach", &[("a_ctrl.tx", 0.9), ("b_ctrl.ty", -7.3)]);
    let mut engine = BlendEngine::new(scene);
    engine.begin_blend(&pose, &rig).unwrap();

    let first_written = engine.blend(0.37).written;
    let a_first = engine.host().value_of(&attr("a_ctrl.tx")).unwrap();
    let b_first = engine.host().value_of(&attr("b_ctrl.ty")).unwrap();

    let second_written = engine.blend(0.37).written;
    assert_eq!(first_written, second_written);
    assert_eq!(engine.host().value_of(&attr("a_ctrl.tx")), Some(a_first));
    assert_eq!(engine.host().value_of(&attr("b_ctrl.ty")), Some(b_first));
}

/// it should treat begin_blend re-entry with the same pose as a no-op
#[test]
fn begin_blend_reentry_skips_second_capture() {
    let (scene, rig) = mk_scene(&[("a_ctrl.tx", 0.0), ("b_ctrl.ty", 1.0)]);
    let pose = mk_pose("reach", &[("a_ctrl.tx", 4.0)]);
    let mut engine = BlendEngine::new(scene);

    engine.begin_blend(&pose, &rig).unwrap();
    let reads = engine.host().read_count();
    let writes = engine.host().write_count();

    // same pose again: no capture cycle, no rig traffic
    let report = engine.begin_blend(&pose, &rig).unwrap();
    assert_eq!(report.written, 0);
    assert_eq!(engine.host().read_count(), reads);
    assert_eq!(engine.host().write_count(), writes);
    assert_eq!(engine.pending_pose().map(|p| p.name()), Some("reach"));
}

/// it should land exactly on the stored pose values on commit, not the last weight
#[test]
fn commit_lands_exactly_on_target_values() {
    let (scene, rig) = mk_scene(&[("a_ctrl.tx", 0.1), ("b_ctrl.ty", -0.7)]);
    let pose = mk_pose("reach", &[("a_ctrl.tx", 0.3), ("b_ctrl.ty", 12.25)]);
    let mut engine = BlendEngine::new(scene);

    engine.begin_blend(&pose, &rig).unwrap();
    engine.blend(0.3);

    let report = engine.commit(&pose, &rig).unwrap();
    assert_eq!(report.written, 2);
    // raw stored values, bit-exact: commit re-applies, it does not lerp(1.0)
    assert_eq!(engine.host().value_of(&attr("a_ctrl.tx")), Some(0.3));
    assert_eq!(engine.host().value_of(&attr("b_ctrl.ty")), Some(12.25));
    assert_eq!(engine.phase(), SessionPhase::Idle);
    assert!(engine.pending_pose().is_none());
}

/// it should clear the session on cancel without touching the rig
#[test]
fn cancel_clears_state_without_writing() {
    let (scene, rig) = mk_scene(&[("a_ctrl.tx", 0.0)]);
    let pose = mk_pose("reach", &[("a_ctrl.tx", 10.0)]);
    let mut engine = BlendEngine::new(scene);

    engine.begin_blend(&pose, &rig).unwrap();
    engine.blend(0.4);
    let parked = engine.host().value_of(&attr("a_ctrl.tx")).unwrap();
    let writes = engine.host().write_count();

    engine.cancel();
    assert_eq!(engine.host().write_count(), writes);
    assert_eq!(engine.host().value_of(&attr("a_ctrl.tx")), Some(parked));
    assert_eq!(engine.phase(), SessionPhase::Idle);
    assert!(!engine.is_blending());
    assert!(engine.pending_pose().is_none());
}

/// it should extrapolate past both endpoints when the weight leaves [0, 1]
#[test]
fn weights_outside_unit_interval_extrapolate() {
    let (scene, rig) = mk_scene(&[("a_ctrl.v", 0.0), ("b_ctrl.v", 10.0)]);
    let pose = mk_pose("push", &[("a_ctrl.v", 4.0), ("b_ctrl.v", 0.0)]);
    let mut engine = BlendEngine::new(scene);
    engine.begin_blend(&pose, &rig).unwrap();

    engine.blend(0.5);
    approx(engine.host().value_of(&attr("a_ctrl.v")).unwrap(), 2.0, 1e-6);
    approx(engine.host().value_of(&attr("b_ctrl.v")).unwrap(), 5.0, 1e-6);

    engine.blend(1.5);
    approx(engine.host().value_of(&attr("a_ctrl.v")).unwrap(), 6.0, 1e-6);
    approx(engine.host().value_of(&attr("b_ctrl.v")).unwrap(), -5.0, 1e-6);

    engine.blend(-0.5);
    approx(engine.host().value_of(&attr("a_ctrl.v")).unwrap(), -2.0, 1e-6);
}

/// it should leave the visible rig at the pre-blend state right after begin_blend
#[test]
fn begin_blend_rests_rig_at_pre_blend_state() {
    let (scene, rig) = mk_scene(&[("a_ctrl.tx", 0.25), ("b_ctrl.ty", -3.0)]);
    let pose = mk_pose("reach", &[("a_ctrl.tx", 1.0), ("b_ctrl.ty", 8.0)]);
    let mut engine = BlendEngine::new(scene);

    engine.begin_blend(&pose, &rig).unwrap();
    assert_eq!(engine.host().value_of(&attr("a_ctrl.tx")), Some(0.25));
    assert_eq!(engine.host().value_of(&attr("b_ctrl.ty")), Some(-3.0));
    assert!(engine.is_blending());
}

/// it should refuse a different pose mid-session until cancel or commit
#[test]
fn second_pose_mid_session_is_session_active() {
    let (scene, rig) = mk_scene(&[("a_ctrl.tx", 0.0)]);
    let fist = mk_pose("fist", &[("a_ctrl.tx", 1.0)]);
    let relaxed = mk_pose("relaxed", &[("a_ctrl.tx", 0.2)]);
    let mut engine = BlendEngine::new(scene);

    engine.begin_blend(&fist, &rig).unwrap();
    engine.blend(0.6);

    let err = engine.begin_blend(&relaxed, &rig).unwrap_err();
    match err {
        BlendError::SessionActive { pending, requested } => {
            assert_eq!(pending, "fist");
            assert_eq!(requested, "relaxed");
        }
        other => panic!("expected SessionActive, got {other:?}"),
    }
    // session untouched by the refused request
    assert!(engine.is_blending());
    assert_eq!(engine.pending_pose().map(|p| p.name()), Some("fist"));

    engine.cancel();
    engine.begin_blend(&relaxed, &rig).unwrap();
    assert_eq!(engine.pending_pose().map(|p| p.name()), Some("relaxed"));
}

/// it should derive Idle -> Blending -> Idle from the session contents
#[test]
fn phase_follows_the_session() {
    let (scene, rig) = mk_scene(&[("a_ctrl.tx", 0.0)]);
    let pose = mk_pose("reach", &[("a_ctrl.tx", 1.0)]);
    let mut engine = BlendEngine::new(scene);
    assert_eq!(engine.phase(), SessionPhase::Idle);
    assert!(!engine.is_blending());

    engine.begin_blend(&pose, &rig).unwrap();
    assert_eq!(engine.phase(), SessionPhase::Blending);
    assert!(engine.is_blending());

    engine.commit(&pose, &rig).unwrap();
    assert_eq!(engine.phase(), SessionPhase::Idle);
}

/// it should apply a pose directly when committing from Idle
#[test]
fn commit_from_idle_applies_pose_directly() {
    let (scene, rig) = mk_scene(&[("a_ctrl.tx", 0.0), ("b_ctrl.ty", 0.0)]);
    let pose = mk_pose("stamp", &[("a_ctrl.tx", 2.5), ("b_ctrl.ty", -1.5)]);
    let mut engine = BlendEngine::new(scene);

    let report = engine.commit(&pose, &rig).unwrap();
    assert_eq!(report.written, 2);
    assert!(report.is_clean());
    assert_eq!(engine.host().value_of(&attr("a_ctrl.tx")), Some(2.5));
    assert_eq!(engine.host().value_of(&attr("b_ctrl.ty")), Some(-1.5));
    assert_eq!(engine.phase(), SessionPhase::Idle);
}

/// it should write nothing when blending without a session
#[test]
fn blend_with_no_session_writes_nothing() {
    let (scene, _rig) = mk_scene(&[("a_ctrl.tx", 1.0)]);
    let mut engine = BlendEngine::new(scene);

    let report = engine.blend(0.7);
    assert_eq!(report.written, 0);
    assert!(report.is_clean());
    assert_eq!(engine.host().write_count(), 0);
    assert_eq!(engine.host().value_of(&attr("a_ctrl.tx")), Some(1.0));
}
