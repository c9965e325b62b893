//! Particle-and-spring soft bodies for membrane-like deformation.
//!
//! `softcell` simulates point masses joined by breakable, distance-limited
//! springs, stepped on a fixed tick split into substeps. Topology builders lay
//! the nodes out as membrane sheets, lipid bilayers and quasi-uniform
//! spherical shells.
//!
//! # Features
//!
//! - **Semi-Verlet substeps**: forces, integration, single-pass constraint
//!   projection, then velocity recovered from displacement
//! - **Breakable joints**: one-shot, irreversible break past a threshold length
//! - **Builders**: square/hex grids, bilayers, Deserno equal-area shells with
//!   proximity bonding, and a scripted rupture rig
//! - **Force fields**: gravity, drag, per-node pulls, ideal-gas shell pressure
//! - **Observable**: monitor steps via the `StepObserver` trait and `tracing`
//! - **`no_std` compatible**: only needs `alloc`
//!
//! ```
//! use softcell::{JointConfig, SoftBody, Vec, Vec3};
//!
//! let mut body = SoftBody::<Vec3<f64>>::new();
//! let a = body.spawn_node(Vec3::new(0.0, 0.0, 0.0), 1.0).unwrap();
//! let b = body.spawn_node(Vec3::new(2.0, 0.0, 0.0), 1.0).unwrap();
//! body.connect(a, b, JointConfig::new().with_stiffness(0.2).with_damping(0.9)).unwrap();
//! body.enable();
//! for _ in 0..60 {
//!     body.step(2);
//! }
//! let d = body.position(a).unwrap().distance(body.position(b).unwrap());
//! assert!((d - 1.0).abs() < 1e-3);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod node;
pub mod joint;
pub mod softbody;
pub mod force;
pub mod grid;
pub mod bilayer;
pub mod shell;
pub mod spatial;
pub mod rupture;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec3};
pub use node::{Node, NodeId};
pub use joint::{Joint, JointForce, JointId};
pub use softbody::SoftBody;
pub use force::{Drag, ForceField, Gravity, NodeForce, Pressure, PressureConfig, GAS_CONSTANT};
pub use grid::{expected_joint_count, grid_bonds, GridConfig, GridLayout, GridWiring, MembraneGrid, RestLength};
pub use bilayer::{Bilayer, BilayerConfig};
pub use shell::{bond_by_proximity, sphere_points, Shell, ShellConfig};
pub use spatial::{BruteForce, ProximityQuery, UniformGrid};
pub use rupture::{RuptureConfig, RuptureReport, RuptureRig};
pub use observer::{NoOpStepObserver, StepObserver};
pub use config::{JointConfig, SimulationProfile};
pub use error::{PhysicsError, Result};
