use hop_guidance::body::presets;
use hop_guidance::geodesy::{self, GeoPoint};
use hop_guidance::sim::{self, SimVehicle, SimWorld};
use hop_guidance::HopPilot;

fn main() {
    // -----------------------------------------------------------------------
    // Scenario: 21 km hop along the Kerbin equator
    // -----------------------------------------------------------------------
    let body = presets::kerbin();
    let start = GeoPoint::new(0.0, 0.0);
    let target = GeoPoint::new(0.0, 2.0);
    let planned_distance = geodesy::surface_distance(start, target, body.radius);

    let vehicle = SimVehicle::default();
    let world = sim::shared(SimWorld::new(body.clone(), start, target, vehicle.clone()));

    let systems = match sim::systems(&world) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("capability wiring failed: {e}");
            return;
        }
    };

    let mut pilot = HopPilot::new(systems, body);
    pilot.config_mut().set_launch_angle(50.0);
    pilot.config_mut().set_max_course_correction_error(40.0);
    pilot.config_mut().perform_course_correction = true;
    pilot.config_mut().use_corrected_heading = true;

    println!();
    println!("====================================================================");
    println!("  SURFACE HOP — {}", pilot.body().name);
    println!("====================================================================");
    println!();
    println!("  Hop Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Start:         ({:>7.3}, {:>8.3})   Target:    ({:>7.3}, {:>8.3})",
        start.latitude(),
        start.longitude(),
        target.latitude(),
        target.longitude()
    );
    println!(
        "  Distance:      {:>8.0} m        Launch angle: {:>5.1} deg",
        planned_distance,
        pilot.config().launch_angle()
    );
    println!(
        "  Vehicle:       {:>8.0} kg wet    Thrust:    {:>8.0} N",
        vehicle.dry_mass + vehicle.propellant_mass,
        vehicle.max_thrust
    );
    println!();
    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");

    // -----------------------------------------------------------------------
    // Fly
    // -----------------------------------------------------------------------
    let dt = 0.1;
    let max_time = 4_000.0;
    let propellant_start = world.borrow().propellant();

    let input = world.borrow().control_input(true);
    pilot.hop("demo", &input);

    let mut last_phase = "";
    let mut next_sample = 0.0;
    while pilot.active() && world.borrow().time() < max_time {
        let input = world.borrow().control_input(true);
        pilot.drive(&input);
        pilot.on_fixed_update(&input);

        let phase = pilot.current_step_name().unwrap_or("Done");
        let (t, alt, miss) = {
            let w = world.borrow();
            (w.time(), w.altitude(), w.miss_distance())
        };
        if phase != last_phase {
            println!(
                "  {:>16}  t={:>7.1}s  alt={:>7.0}m  miss={:>8.0}m",
                phase.to_uppercase(),
                t,
                alt,
                miss
            );
            last_phase = phase;
            next_sample = t + 25.0;
        } else if t >= next_sample {
            println!(
                "  {:>16}  t={:>7.1}s  alt={:>7.0}m  miss={:>8.0}m  [{}]",
                "·",
                t,
                alt,
                miss,
                pilot.status()
            );
            next_sample = t + 25.0;
        }

        let warp = world.borrow().warp_rate();
        world.borrow_mut().step(dt * warp);
    }

    // -----------------------------------------------------------------------
    // Report
    // -----------------------------------------------------------------------
    let w = world.borrow();
    println!();
    println!("  Hop Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Outcome:       {}",
        if w.landed() && !pilot.active() {
            "landed, session closed"
        } else if w.landed() {
            "landed, session still open"
        } else {
            "timed out in flight"
        }
    );
    println!("  Flight time:   {:>8.1} s", w.time());
    println!("  Final miss:    {:>8.0} m", w.miss_distance());
    println!(
        "  Propellant:    {:>8.0} kg used of {:.0} kg",
        propellant_start - w.propellant(),
        propellant_start
    );
    println!("====================================================================");
    println!();
}
