//! The boundary demonstration: take off, hover, then read and rewrite the simulator's
//! geofence around the vehicle, pausing for the operator between phases.

use std::{thread, time::Duration};

use log::{debug, error, info, warn};

use crate::{AirSimError, Boundary, MultirotorClient, Prompt, Vector3r};


/// Number of custom boundaries pushed to the simulator.
pub const ITERATIONS: u32 = 4;
/// Half-width of the first (largest) boundary square, in metres.
pub const BASE_HALF_WIDTH: f32 = 10.0;

/// How the pushed boundary changes from one iteration to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundaryVariant {
    /// Half-width `10 / i` for iteration `i` in `1..=4`.
    #[default]
    Shrinking,
    /// Half-width `10` on every iteration.
    Fixed,
}

impl BoundaryVariant {
    /// Half-width of the square pushed on `iteration` (1-based).
    pub fn half_width(&self, iteration: u32) -> f32 {
        match self {
            BoundaryVariant::Shrinking => BASE_HALF_WIDTH / iteration as f32,
            BoundaryVariant::Fixed => BASE_HALF_WIDTH,
        }
    }
}

/// Settings for [BoundaryDemo].
#[derive(Clone, Debug)]
pub struct DemoConfiguration {
    pub variant: BoundaryVariant,
    /// Passed to the simulator with the takeoff command.
    pub takeoff_timeout: Duration,
    /// Pause after printing each pushed boundary.
    pub iteration_pause: Duration,
}

impl Default for DemoConfiguration {
    fn default() -> Self {
        DemoConfiguration {
            variant: BoundaryVariant::default(),
            takeoff_timeout: Duration::from_secs(20),
            iteration_pause: Duration::from_secs(1),
        }
    }
}

/// Builds a square boundary referenced at `center`.
///
/// Corners are `(h, -h, z)`, `(-h, h, z)`, `(h, h, z)`, `(-h, -h, z)` where `h` is
/// `half_width` and `z` is the altitude of `center`. The corners are not offset by the
/// horizontal position of `center`; the simulator interprets them relative to `pos`.
///
/// ```
/// use airsim_boundary::{Vector3r, square_boundary};
///
/// let boundary = square_boundary(Vector3r::new(0.0, 0.0, -5.0), 2.5);
/// assert_eq!(boundary.boundary[0], Vector3r::new(2.5, -2.5, -5.0));
/// assert_eq!(boundary.boundary[3], Vector3r::new(-2.5, -2.5, -5.0));
/// ```
pub fn square_boundary(center: Vector3r, half_width: f32) -> Boundary {
    let z = center.z_val;
    Boundary {
        pos: center,
        boundary: vec![
            Vector3r::new(half_width, -half_width, z),
            Vector3r::new(-half_width, half_width, z),
            Vector3r::new(half_width, half_width, z),
            Vector3r::new(-half_width, -half_width, z),
        ],
    }
}

/// A connected demo session.
///
/// Created by [BoundaryDemo::connect], which takes API control of the vehicle. From then
/// on the session must be released with [BoundaryDemo::stop]; [BoundaryDemo::run] does
/// both phases and guarantees the release even when the main sequence fails.
pub struct BoundaryDemo<'a, C: MultirotorClient + ?Sized> {
    client: &'a C,
    configuration: DemoConfiguration,
}

impl<'a, C: MultirotorClient + ?Sized> BoundaryDemo<'a, C> {
    /// Confirms the connection and takes API control of the vehicle.
    ///
    /// # Errors
    ///
    /// Propagates the client's error if the simulator is unreachable or refuses control.
    /// Nothing needs releasing in that case.
    pub fn connect(client: &'a C, configuration: DemoConfiguration) -> Result<Self, AirSimError> {
        client.confirm_connection()?;
        client.enable_api_control(true)?;
        info!("API control enabled");

        Ok(BoundaryDemo {
            client,
            configuration,
        })
    }

    /// Runs the main sequence and then the teardown, exactly once each.
    ///
    /// Returns the main sequence's error if it failed, otherwise the first teardown error.
    pub fn run<P: Prompt + ?Sized>(self, prompt: &mut P) -> Result<(), AirSimError> {
        let outcome = self.execute(prompt);
        if let Err(e) = &outcome {
            error!("Boundary demo failed: {}", e);
        }

        let teardown = self.stop(prompt);
        outcome.and(teardown)
    }

    /// Arms, takes off, hovers, reads the boundary and pushes the custom boundaries.
    pub fn execute<P: Prompt + ?Sized>(&self, prompt: &mut P) -> Result<(), AirSimError> {
        println!("arming the drone...");
        self.client.arm_disarm(true)?;

        let state = self.client.get_multirotor_state()?;
        debug!("state: {:#?}", state);

        prompt.wait("Press any key to takeoff")?;
        self.client.takeoff(self.configuration.takeoff_timeout)?;

        // Captured once after takeoff, every pushed boundary is referenced at this position
        let state = self.client.get_multirotor_state()?;
        debug!("state: {:#?}", state);
        let position = state.position();

        self.client.hover()?;
        info!("Hovering");

        prompt.wait("Press any key to get Boundary readings")?;
        let boundary = self.client.sim_get_boundary()?;
        println!("{}", boundary);

        prompt.wait("Press any key to set Boundary")?;
        self.client.sim_enable_custom_boundary_data(true)?;

        for iteration in 1..=ITERATIONS {
            let half_width = self.configuration.variant.half_width(iteration);
            info!("Setting boundary {} with half-width {}", iteration, half_width);

            let boundary = square_boundary(position, half_width);
            self.client.sim_set_boundary(&boundary)?;
            let boundary = self.client.sim_get_boundary()?;
            println!("{}", boundary);

            thread::sleep(self.configuration.iteration_pause);
        }

        Ok(())
    }

    /// Disarms, resets the simulation and releases API control.
    ///
    /// Every step is attempted even if an earlier one fails; the first failure is returned.
    pub fn stop<P: Prompt + ?Sized>(&self, prompt: &mut P) -> Result<(), AirSimError> {
        let mut first_error = None;

        attempt(
            &mut first_error,
            "prompt",
            prompt.wait("Press any key to reset to original state"),
        );
        attempt(
            &mut first_error,
            "disarm",
            self.client.arm_disarm(false).map(|_| ()),
        );
        attempt(&mut first_error, "reset", self.client.reset());
        attempt(
            &mut first_error,
            "release API control",
            self.client.enable_api_control(false),
        );

        println!("Done!\n");

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn attempt(first_error: &mut Option<AirSimError>, step: &str, result: Result<(), AirSimError>) {
    if let Err(e) = result {
        warn!("Teardown step '{}' failed: {}", step, e);
        first_error.get_or_insert(e);
    }
}
