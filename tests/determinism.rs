use softcell::{
    Bilayer, BilayerConfig, Gravity, JointConfig, PressureConfig, Shell, ShellConfig,
    SimulationProfile, SoftBody, Vec3,
};

fn bilayer_run() -> Vec<Vec3<f32>> {
    let mut body = SoftBody::new();
    let profile = SimulationProfile::new()
        .with_lipid_joint(JointConfig::new().with_damping(0.1))
        .with_membrane_joint(JointConfig::new().with_stiffness(2.0).with_damping(0.1));
    let config = BilayerConfig::new(6, 6, 0.5).with_profile(profile);
    Bilayer::build(&mut body, &config).unwrap();
    body.register_force(Gravity::new(Vec3::new(0.0, -0.01, 0.0)));
    body.enable();
    for _ in 0..60 {
        body.step(3);
    }
    body.positions()
}

fn shell_run() -> Vec<Vec3<f32>> {
    let config = ShellConfig::new(120, 1.5f32)
        .with_joint(JointConfig::new().with_stiffness(1.5).with_damping(0.05));
    let mut body = SoftBody::new();
    let shell = Shell::build(&mut body, &config).unwrap();
    body.register_force(shell.pressure(PressureConfig::new().with_coefficient(0.0002)));
    body.enable();
    for _ in 0..60 {
        body.step(2);
    }
    body.positions()
}

#[test]
fn bilayer_deterministic() {
    let results: Vec<_> = (0..5).map(|_| bilayer_run()).collect();
    for r in &results[1..] {
        for (a, b) in results[0].iter().zip(r.iter()) {
            assert_eq!(a.x, b.x);
            assert_eq!(a.y, b.y);
            assert_eq!(a.z, b.z);
        }
    }
}

#[test]
fn shell_deterministic() {
    let results: Vec<_> = (0..5).map(|_| shell_run()).collect();
    for r in &results[1..] {
        assert_eq!(&results[0], r);
    }
}
