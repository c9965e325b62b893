use approx::assert_relative_eq;
use softcell::{
    Joint, JointConfig, JointForce, Node, NodeForce, PhysicsError, SoftBody, Vec, Vec3,
};

#[test]
fn node_rejects_non_positive_mass() {
    for mass in [0.0f64, -1.0, f64::NAN] {
        let err = Node::new(Vec3::zero(), mass).unwrap_err();
        assert!(matches!(err, PhysicsError::InvalidParameter { .. }), "mass {mass}");
    }
}

#[test]
fn apply_force_scales_by_inverse_mass() {
    let mut node = Node::new(Vec3::<f64>::zero(), 4.0).unwrap();
    node.apply_force(Vec3::new(2.0, 0.0, 0.0));
    assert_eq!(node.accumulated_acceleration(), Vec3::new(0.5, 0.0, 0.0));
}

#[test]
fn integrate_clears_acceleration_and_snapshots_previous() {
    let mut node = Node::new(Vec3::new(1.0f64, 0.0, 0.0), 1.0).unwrap();
    node.apply_force(Vec3::new(0.0, 2.0, 0.0));
    node.integrate(2);
    assert_eq!(node.previous_position(), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(node.velocity(), Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(node.position(), Vec3::new(1.0, 0.5, 0.0));
    assert_eq!(node.accumulated_acceleration(), Vec3::zero());
}

#[test]
fn tick_impulse_independent_of_substeps() {
    let velocity_after = |sub_steps: usize| {
        let mut body = SoftBody::<Vec3<f64>>::new();
        let n = body.spawn_node(Vec3::zero(), 2.0).unwrap();
        body.register_force(NodeForce { node: n, force: Vec3::new(0.0, -3.0, 0.0) });
        body.enable();
        body.step(sub_steps);
        body.node(n).unwrap().velocity().y
    };
    let single = velocity_after(1);
    assert_relative_eq!(single, -1.5, epsilon = 1e-12);
    for sub_steps in [2, 4, 8] {
        assert_relative_eq!(velocity_after(sub_steps), single, epsilon = 1e-9);
    }
}

#[test]
fn inverted_distance_limits_rejected() {
    let mut body = SoftBody::<Vec3<f32>>::new();
    let a = body.spawn_node(Vec3::zero(), 1.0).unwrap();
    let b = body.spawn_node(Vec3::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let config = JointConfig::new().with_distance_limits(2.0, 1.0);
    let err = body.connect(a, b, config).unwrap_err();
    assert!(matches!(err, PhysicsError::InvalidParameter { .. }));
    assert_eq!(body.joint_count(), 0);
}

#[test]
fn joint_needs_distinct_endpoints() {
    let mut body = SoftBody::<Vec3<f32>>::new();
    let a = body.spawn_node(Vec3::zero(), 1.0).unwrap();
    assert!(Joint::<Vec3<f32>>::new(a, a, JointConfig::new()).is_err());
}

#[test]
fn membrane_joint_doubles_stiffness() {
    let config = JointConfig::<f64>::new().with_stiffness(0.75);
    assert_eq!(config.effective_stiffness(), 0.75);
    assert_eq!(config.with_membrane(true).effective_stiffness(), 1.5);
}

#[test]
fn stretched_joint_pulls_ends_together() {
    let mut body = SoftBody::<Vec3<f64>>::new();
    let a = body.spawn_node(Vec3::zero(), 1.0).unwrap();
    let b = body.spawn_node(Vec3::new(3.0, 0.0, 0.0), 1.0).unwrap();
    body.connect(a, b, JointConfig::new().with_stiffness(2.0)).unwrap();
    body.enable();
    body.step(1);
    // k * (3 - 1) * 0.5 = 2 on each end, unit mass
    assert_relative_eq!(body.node(a).unwrap().velocity().x, 2.0, epsilon = 1e-12);
    assert_relative_eq!(body.node(b).unwrap().velocity().x, -2.0, epsilon = 1e-12);
}

#[test]
fn coincident_endpoints_do_not_produce_nan() {
    let mut body = SoftBody::<Vec3<f64>>::new();
    let a = body.spawn_node(Vec3::zero(), 1.0).unwrap();
    let b = body.spawn_node(Vec3::zero(), 1.0).unwrap();
    body.connect(a, b, JointConfig::new().with_distance_limits(0.5, 2.0))
        .unwrap();
    body.enable();
    body.step(2);
    for p in body.positions() {
        assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
    }
}

#[test]
fn max_distance_holds_after_projection() {
    let mut body = SoftBody::<Vec3<f64>>::new();
    let a = body.spawn_node(Vec3::zero(), 1.0).unwrap();
    let b = body.spawn_node(Vec3::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let joint = body
        .connect(a, b, JointConfig::new().with_distance_limits(0.8, 1.2))
        .unwrap();
    body.add_node_force(b, Vec3::new(0.6, 0.0, 0.0)).unwrap();
    body.enable();
    for _ in 0..50 {
        body.step(2);
        let d = body.joint(joint).unwrap().length(body.nodes());
        assert!(d <= 1.2 + 1e-9, "stretched past max: {d}");
        assert!(d >= 0.8 - 1e-9, "squeezed past min: {d}");
    }
}

#[test]
fn min_distance_holds_after_projection() {
    let mut body = SoftBody::<Vec3<f64>>::new();
    let a = body.spawn_node(Vec3::zero(), 1.0).unwrap();
    let b = body.spawn_node(Vec3::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let joint = body
        .connect(a, b, JointConfig::new().with_distance_limits(0.8, 1.2))
        .unwrap();
    body.add_node_force(b, Vec3::new(-0.6, 0.0, 0.0)).unwrap();
    body.enable();
    for _ in 0..50 {
        body.step(2);
        let d = body.joint(joint).unwrap().length(body.nodes());
        assert!(d >= 0.8 - 1e-9, "squeezed past min: {d}");
    }
}

#[test]
fn disabled_joint_reports_inactive() {
    let mut body = SoftBody::<Vec3<f32>>::new();
    let a = body.spawn_node(Vec3::zero(), 1.0).unwrap();
    let b = body.spawn_node(Vec3::new(2.0, 0.0, 0.0), 1.0).unwrap();
    let mut joint = Joint::dormant(a, b, JointConfig::new()).unwrap();
    assert!(!joint.is_enabled());

    let mut nodes = [
        Node::new(Vec3::zero(), 1.0).unwrap(),
        Node::new(Vec3::new(2.0, 0.0, 0.0), 1.0).unwrap(),
    ];
    assert_eq!(joint.compute_force(&mut nodes), JointForce::Inactive);
    assert_eq!(nodes[0].accumulated_acceleration(), Vec3::zero());
}
