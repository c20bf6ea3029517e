//! A self-contained ballistic world for exercising the hop pilot end to end
//! without a host program.

mod adapters;
mod orbit;
mod world;

pub use adapters::{
    shared, SharedWorld, SimAttitude, SimCorrection, SimDescent, SimPrediction, SimThrust, SimWarp,
};
pub use orbit::apsis_times;
pub use world::{SimVehicle, SimWorld};

use crate::systems::{GuidanceError, VesselSystems};

/// Wire all six capability adapters to one shared world.
pub fn systems(world: &SharedWorld) -> Result<VesselSystems, GuidanceError> {
    VesselSystems::builder()
        .attitude(SimAttitude::new(world.clone()))
        .thrust(SimThrust::new(world.clone()))
        .prediction(SimPrediction::new(world.clone()))
        .correction(SimCorrection::new(world.clone()))
        .warp(SimWarp::new(world.clone()))
        .descent(SimDescent::new(world.clone()))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::presets;
    use crate::geodesy::GeoPoint;
    use crate::pilot::HopPilot;

    fn hop_setup(target: GeoPoint) -> (HopPilot, SharedWorld) {
        let body = presets::kerbin();
        let world = shared(SimWorld::new(
            body.clone(),
            GeoPoint::new(0.0, 0.0),
            target,
            SimVehicle::default(),
        ));
        let systems = systems(&world).expect("all six adapters are wired");
        (HopPilot::new(systems, body), world)
    }

    /// Drive both tick callbacks until the session closes or time runs out,
    /// stepping the world at whatever warp rate guidance asked for.
    fn fly(pilot: &mut HopPilot, world: &SharedWorld, max_time: f64) {
        let dt = 0.1;
        while pilot.active() && world.borrow().time() < max_time {
            let input = world.borrow().control_input(true);
            pilot.drive(&input);
            pilot.on_fixed_update(&input);
            let warp = world.borrow().warp_rate();
            world.borrow_mut().step(dt * warp);
        }
    }

    #[test]
    fn full_hop_lands_near_the_target() {
        let (mut pilot, world) = hop_setup(GeoPoint::new(0.0, 0.75));
        pilot.config_mut().set_launch_angle(50.0);

        let input = world.borrow().control_input(true);
        pilot.hop("flight-test", &input);
        assert!(pilot.active());

        fly(&mut pilot, &world, 4_000.0);

        let w = world.borrow();
        assert!(w.landed(), "still airborne at {:.0} m", w.altitude());
        assert!(!pilot.active(), "session must close itself after touchdown");
        assert!(
            w.miss_distance() < 2_500.0,
            "hop of ~7.9 km missed by {:.0} m",
            w.miss_distance()
        );
        assert!(w.propellant() > 0.0, "ran the tanks dry");
    }

    #[test]
    fn ascend_only_hop_ends_in_flight() {
        let (mut pilot, world) = hop_setup(GeoPoint::new(0.0, 0.75));
        pilot.config_mut().ascend_only = true;

        let input = world.borrow().control_input(true);
        pilot.hop("flight-test", &input);
        fly(&mut pilot, &world, 400.0);

        let w = world.borrow();
        assert!(!pilot.active(), "cutoff must end the session");
        assert!(!w.landed(), "the session ends while the vehicle is still up");
        assert!(w.altitude() > 50.0);
        assert_eq!(w.throttle(), 0.0, "cutoff leaves the engine off");
    }

    #[test]
    fn phases_run_in_pipeline_order() {
        let (mut pilot, world) = hop_setup(GeoPoint::new(0.0, 0.75));
        pilot.config_mut().set_launch_angle(50.0);
        pilot.config_mut().set_max_course_correction_error(40.0);
        pilot.config_mut().perform_course_correction = true;

        let input = world.borrow().control_input(true);
        pilot.hop("flight-test", &input);

        let rank = |name: &str| match name {
            "Ascend" => 0,
            "CourseCorrection" => 1,
            "CoastToApoapsis" => 2,
            "FinalDescent" => 3,
            other => panic!("unknown step {other}"),
        };
        let mut walk = Vec::new();
        let dt = 0.1;
        while pilot.active() && world.borrow().time() < 4_000.0 {
            let input = world.borrow().control_input(true);
            pilot.drive(&input);
            pilot.on_fixed_update(&input);
            if let Some(name) = pilot.current_step_name() {
                if walk.last() != Some(&name) {
                    walk.push(name);
                }
            }
            let warp = world.borrow().warp_rate();
            world.borrow_mut().step(dt * warp);
        }

        assert_eq!(walk.first(), Some(&"Ascend"), "walk {walk:?}");
        assert_eq!(walk.last(), Some(&"FinalDescent"), "walk {walk:?}");
        assert!(
            walk.contains(&"CoastToApoapsis"),
            "every hop coasts over the crest, walk {walk:?}"
        );
        for pair in walk.windows(2) {
            assert!(
                rank(pair[0]) < rank(pair[1]),
                "phases may only move forward, walk {walk:?}"
            );
        }
        assert!(world.borrow().landed());
    }

    #[test]
    fn hop_can_be_restarted_mid_flight() {
        let (mut pilot, world) = hop_setup(GeoPoint::new(0.0, 0.75));

        let input = world.borrow().control_input(true);
        pilot.hop("first", &input);

        // Let the ascent get properly under way.
        for _ in 0..40 {
            let input = world.borrow().control_input(true);
            pilot.drive(&input);
            pilot.on_fixed_update(&input);
            world.borrow_mut().step(0.1);
        }
        assert!(pilot.active());

        let input = world.borrow().control_input(true);
        pilot.hop("second", &input);
        assert_eq!(pilot.current_step_name(), Some("Ascend"), "restart replans from scratch");
        assert_eq!(pilot.dependents(), ["first", "second"]);

        fly(&mut pilot, &world, 4_000.0);
        assert!(world.borrow().landed());
        assert!(!pilot.active());
    }
}
