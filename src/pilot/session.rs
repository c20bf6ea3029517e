//! The hop pilot: session lifecycle around the guidance step machine.

use crate::body::Body;
use crate::guidance::{Ascend, GuidanceView, Step, StepCtx, TickKind};
use crate::state::ControlInput;
use crate::systems::VesselSystems;

use super::config::HopConfig;

/// Identity the pilot uses when claiming vehicle systems and subscribing to
/// the impact predictor.
pub const PILOT_ID: &str = "hop-pilot";

/// Owns one hop session: the configuration, the active guidance step, the
/// hop timer, and the vehicle capabilities the steps drive.
///
/// Strictly single-threaded and non-blocking; the host calls [`drive`] at
/// command rate and [`on_fixed_update`] at physics rate, and every call
/// returns after at most one step tick.
///
/// [`drive`]: HopPilot::drive
/// [`on_fixed_update`]: HopPilot::on_fixed_update
pub struct HopPilot {
    systems: VesselSystems,
    config: HopConfig,
    body: Body,
    current_step: Option<Step>,
    hop_started: Option<f64>,
    dependents: Vec<String>,
    status: String,
    enabled: bool,
}

impl HopPilot {
    /// A pilot for the given body, with default configuration and no hop in
    /// progress. `systems` has already been completeness-checked by its
    /// builder.
    pub fn new(systems: VesselSystems, body: Body) -> Self {
        HopPilot {
            systems,
            config: HopConfig::default(),
            body,
            current_step: None,
            hop_started: None,
            dependents: Vec::new(),
            status: String::new(),
            enabled: false,
        }
    }

    pub fn config(&self) -> &HopConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut HopConfig {
        &mut self.config
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Latest one-line status from the active step; empty while idle.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether a hop is in progress. True exactly when a step is held.
    pub fn active(&self) -> bool {
        self.current_step.is_some()
    }

    /// Name of the current phase, for displays and logs.
    pub fn current_step_name(&self) -> Option<&'static str> {
        self.current_step.as_ref().map(Step::name)
    }

    /// Modules that requested the current hop and are waiting on it.
    pub fn dependents(&self) -> &[String] {
        &self.dependents
    }

    /// Seconds since the hop started; 0 while idle.
    pub fn time_since_hop(&self, now: f64) -> f64 {
        self.hop_started.map_or(0.0, |t0| (now - t0).max(0.0))
    }

    /// Read-only query surface over one tick's input, for host displays.
    pub fn view<'a>(&'a self, input: &'a ControlInput) -> GuidanceView<'a> {
        GuidanceView {
            body: &self.body,
            config: &self.config,
            input,
            prediction: &*self.systems.prediction,
        }
    }

    /// Seconds until predicted touchdown; 0 while no prediction exists.
    pub fn time_to_land(&self, input: &ControlInput) -> f64 {
        self.view(input).time_to_land()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Subscribe to the impact predictor. Idempotent.
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.systems.prediction.add_dependent(PILOT_ID);
        self.enabled = true;
    }

    /// End any hop, release commands, and drop the predictor subscription.
    pub fn disable(&mut self) {
        self.end_hop();
        if self.enabled {
            self.systems.prediction.remove_dependent(PILOT_ID);
            self.enabled = false;
        }
    }

    /// Start a hop toward the current target on behalf of `requester`.
    ///
    /// Starting while a hop is active replaces the running step with a fresh
    /// ascent and re-arms the timer; there is no queueing. The requester is
    /// recorded as a dependent of the session.
    pub fn hop(&mut self, requester: &str, input: &ControlInput) {
        self.enable();
        self.dependents.push(requester.to_string());
        self.hop_started = Some(input.now);
        let step = Ascend::new(&self.view(input));
        self.current_step = Some(Step::Ascend(step));
    }

    /// Stop the hop: timer cleared, dependents dropped, thrust cut, attitude
    /// released. The single cancellation point; calling it again is a no-op
    /// apart from re-issuing the (idempotent) release commands.
    pub fn end_hop(&mut self) {
        self.hop_started = None;
        self.dependents.clear();
        self.current_step = None;
        self.status.clear();
        self.systems.thrust.thrust_off();
        self.systems.attitude.deactivate();
    }

    // -----------------------------------------------------------------------
    // Ticks
    // -----------------------------------------------------------------------

    /// High-rate command tick. No-op while no hop is active.
    pub fn drive(&mut self, input: &ControlInput) {
        self.tick(TickKind::Drive, input);
    }

    /// Physics-rate tick, where the transition decisions live. No-op while
    /// no hop is active.
    pub fn on_fixed_update(&mut self, input: &ControlInput) {
        self.tick(TickKind::Physics, input);
    }

    fn tick(&mut self, kind: TickKind, input: &ControlInput) {
        let Some(step) = self.current_step.take() else {
            return;
        };

        let next = {
            let VesselSystems {
                attitude,
                thrust,
                prediction,
                correction,
                warp,
                descent,
            } = &mut self.systems;
            let mut ctx = StepCtx {
                view: GuidanceView {
                    body: &self.body,
                    config: &self.config,
                    input,
                    prediction: &**prediction,
                },
                attitude: &mut **attitude,
                thrust: &mut **thrust,
                correction: &mut **correction,
                warp: &mut **warp,
                descent: &mut **descent,
                status: &mut self.status,
            };
            step.advance(kind, &mut ctx)
        };

        match next {
            Some(step) => self.current_step = Some(step),
            None => self.end_hop(),
        }
    }
}
