use approx::assert_abs_diff_eq;
use softcell::{
    expected_joint_count, Bilayer, BilayerConfig, GridWiring, JointConfig, RestLength,
    SimulationProfile, SoftBody, Vec, Vec3,
};

fn profile() -> SimulationProfile<f64> {
    SimulationProfile::new()
        .with_node_mass(0.5)
        .with_lipid_joint(JointConfig::new().with_stiffness(1.0).with_damping(0.1))
        .with_membrane_joint(JointConfig::new().with_stiffness(4.0).with_damping(0.1))
}

#[test]
fn joint_count_is_two_sheets_plus_links() {
    let (x, y) = (6, 4);
    let mut body = SoftBody::<Vec3<f64>>::new();
    let config = BilayerConfig::new(x, y, 0.5).with_profile(profile());
    let bilayer = Bilayer::build(&mut body, &config).unwrap();

    assert_eq!(body.node_count(), 2 * x * y);
    assert_eq!(bilayer.links().len(), x * y);
    assert_eq!(
        body.joint_count(),
        2 * expected_joint_count(x, y, GridWiring::Hex) + x * y
    );
}

#[test]
fn links_use_doubled_membrane_stiffness() {
    let mut body = SoftBody::<Vec3<f64>>::new();
    let plain = profile().with_membrane_joint(JointConfig::new().with_stiffness(4.0));
    let config = BilayerConfig::new(3, 3, 1.0).with_profile(plain);
    let bilayer = Bilayer::build(&mut body, &config).unwrap();

    for &link in bilayer.links() {
        let joint = body.joint(link).unwrap();
        assert!(joint.config().membrane);
        assert_eq!(joint.config().effective_stiffness(), 8.0);
    }
    for &sheet_joint in bilayer.upper().joints() {
        assert!(!body.joint(sheet_joint).unwrap().config().membrane);
    }
}

#[test]
fn sheets_are_offset_by_gap_and_spaced_by_pitch() {
    let mut body = SoftBody::<Vec3<f64>>::new();
    let origin = Vec3::new(0.0, 3.0, 0.0);
    let config = BilayerConfig::new(4, 4, 0.5).with_gap(1.25).with_origin(origin);
    let bilayer = Bilayer::build(&mut body, &config).unwrap();

    for (&a, &b) in bilayer.upper().nodes().iter().zip(bilayer.lower().nodes()) {
        let (pa, pb) = (body.position(a).unwrap(), body.position(b).unwrap());
        assert_eq!(pa.y, 3.0);
        assert_abs_diff_eq!(pa.y - pb.y, 1.25, epsilon = 1e-12);
        assert_eq!((pa.x, pa.z), (pb.x, pb.z));
    }

    let upper = bilayer.upper();
    let p00 = body.position(upper.node(0, 0).unwrap()).unwrap();
    let p10 = body.position(upper.node(1, 0).unwrap()).unwrap();
    let p01 = body.position(upper.node(0, 1).unwrap()).unwrap();
    let pitch = 0.5 * 3.0f64.sqrt();
    assert_abs_diff_eq!(p00.distance(p10), pitch, epsilon = 1e-12);
    assert_abs_diff_eq!(p00.distance(p01), pitch, epsilon = 1e-12);
}

#[test]
fn placement_bilayer_is_at_rest() {
    let mut body = SoftBody::<Vec3<f64>>::new();
    let config = BilayerConfig::new(5, 5, 0.4)
        .with_rest_length(RestLength::Placement)
        .with_profile(profile());
    Bilayer::build(&mut body, &config).unwrap();
    body.enable();
    for _ in 0..20 {
        body.step(2);
    }
    assert!(body.kinetic_energy() < 1e-20);
}

#[test]
fn config_rest_length_draws_sheets_to_link_length() {
    let mut body = SoftBody::<Vec3<f64>>::new();
    let profile = profile()
        .with_lipid_joint(
            JointConfig::new()
                .with_rest_length(0.5 * 3.0f64.sqrt())
                .with_damping(0.1),
        )
        .with_membrane_joint(JointConfig::new().with_rest_length(0.6).with_damping(0.1));
    let config = BilayerConfig::new(3, 3, 0.5).with_profile(profile);
    let bilayer = Bilayer::build(&mut body, &config).unwrap();
    body.enable();
    for _ in 0..300 {
        body.step(2);
    }
    for &link in bilayer.links() {
        let length = body.joint(link).unwrap().length(body.nodes());
        assert_abs_diff_eq!(length, 0.6, epsilon = 1e-2);
    }
}

#[test]
fn non_positive_gap_rejected() {
    let mut body = SoftBody::<Vec3<f32>>::new();
    assert!(Bilayer::build(&mut body, &BilayerConfig::new(3, 3, 1.0).with_gap(0.0)).is_err());
    assert_eq!(body.node_count(), 0);
}

#[test]
fn rejected_link_joint_adds_no_nodes() {
    let bad = profile().with_membrane_joint(JointConfig::new().with_distance_limits(2.0, 1.0));
    let mut body = SoftBody::<Vec3<f64>>::new();
    assert!(Bilayer::build(&mut body, &BilayerConfig::new(3, 3, 1.0).with_profile(bad)).is_err());
    assert_eq!(body.node_count(), 0);
    assert_eq!(body.joint_count(), 0);
}
