use posekit_blend_core::{AttrRef, BlendEngine, PoseAsset, PoseData, RigHandle};
use posekit_rig_memory::MemoryScene;

fn main() -> anyhow::Result<()> {
    // A small rig and a "fist" pose to drag toward.
    let rig = RigHandle::from("hero");
    let spread = AttrRef::parse("hand_ctrl.spread").unwrap();
    let curl = AttrRef::parse("hand_ctrl.curl").unwrap();
    let twist = AttrRef::parse("arm_ctrl.twist").unwrap();

    let mut scene = MemoryScene::new();
    scene.add_rig(rig.clone());
    scene.add_attr(&rig, spread.clone(), 0.1);
    scene.add_attr(&rig, curl.clone(), 0.0);
    scene.add_attr(&rig, twist.clone(), 12.0);

    let mut data = PoseData::new();
    data.insert(spread.clone(), 1.0);
    data.insert(curl.clone(), 0.9);
    data.insert(twist.clone(), -10.0);
    let fist = PoseAsset::new("fist", data);

    let mut engine = BlendEngine::new(scene);

    // Middle-click on the pose: capture, apply, capture, rest at weight 0.
    engine.begin_blend(&fist, &rig)?;
    println!("session started for '{}'", fist.name());

    // Pointer drag: one blend per move event, overshoot included.
    for weight in [0.0_f32, 0.25, 0.5, 0.75, 1.0, 1.25] {
        let written = engine.blend(weight).written;
        println!(
            "w={weight:>5.2}  spread={:>6.3}  curl={:>6.3}  twist={:>7.3}  ({written} writes)",
            engine.host().value_of(&spread).unwrap(),
            engine.host().value_of(&curl).unwrap(),
            engine.host().value_of(&twist).unwrap(),
        );
    }

    // Release: land exactly on the stored pose values.
    let report = engine.commit(&fist, &rig)?;
    println!(
        "committed '{}': {} writes, {} warnings",
        fist.name(),
        report.written,
        report.warnings.len()
    );
    println!(
        "final     spread={:>6.3}  curl={:>6.3}  twist={:>7.3}",
        engine.host().value_of(&spread).unwrap(),
        engine.host().value_of(&curl).unwrap(),
        engine.host().value_of(&twist).unwrap(),
    );
    Ok(())
}
