use approx::assert_relative_eq;
use softcell::Vec as _;
use softcell::{
    JointConfig, Pressure, PressureConfig, Shell, ShellConfig, SoftBody, Vec3, GAS_CONSTANT,
};

fn shell(count: usize, radius: f64) -> (SoftBody<Vec3<f64>>, Shell<f64>) {
    let config = ShellConfig::new(count, radius).with_joint(JointConfig::new().with_stiffness(1.0));
    let mut body = SoftBody::new();
    let shell = Shell::build(&mut body, &config).unwrap();
    (body, shell)
}

#[test]
fn every_node_moves_outward_after_one_tick() {
    let (mut body, shell) = shell(200, 2.0);
    body.register_force(shell.pressure(PressureConfig::new()));
    body.enable();
    body.step(2);

    for (&node, normal) in shell.nodes().iter().zip(shell.normals()) {
        let outward = body.node(node).unwrap().velocity().dot(*normal);
        assert!(outward > 0.0, "node {} moved inward: {outward}", node.index());
    }
}

#[test]
fn pressure_inflates_shell() {
    let (mut body, shell) = shell(150, 1.0);
    let before = body.mean_radius();
    body.register_force(shell.pressure(PressureConfig::new().with_coefficient(0.0005)));
    body.enable();
    for _ in 0..10 {
        body.step(2);
    }
    assert!(body.mean_radius() > before);
    assert!(body.centroid().length() < 1e-6);
}

#[test]
fn zero_coefficient_is_inert() {
    let (mut body, shell) = shell(80, 1.0);
    body.register_force(shell.pressure(PressureConfig::new().with_coefficient(0.0)));
    body.enable();
    body.step(2);
    assert_eq!(body.kinetic_energy(), 0.0);
}

#[test]
fn magnitude_falls_off_with_radius() {
    let pressure: Pressure<f64> = Pressure::new(Vec::new(), Vec::new(), PressureConfig::new());
    let near = pressure.magnitude(1.0);
    let far = pressure.magnitude(2.0);
    assert_relative_eq!(near, 2.0 * far, max_relative = 1e-9);
    // 3 / (4r) * T * R * coefficient
    assert_relative_eq!(
        near,
        0.75 * 300.0 * GAS_CONSTANT * 0.001,
        max_relative = 1e-6
    );
}
