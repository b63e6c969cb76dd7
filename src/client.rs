use std::time::Duration;

use crate::{AirSimError, Boundary, MultirotorState};

pub mod airsim;

/// Remote operations on a simulated multirotor.
///
/// Each call blocks until the simulator has answered. Manoeuvres such as
/// [MultirotorClient::takeoff] and [MultirotorClient::hover] only return once the
/// vehicle has completed them.
pub trait MultirotorClient {
    /// Checks that the simulator answers and that client and server versions are compatible.
    ///
    /// Version mismatches are reported as warnings. An `Err` means the simulator could
    /// not be reached at all.
    fn confirm_connection(&self) -> Result<(), AirSimError>;

    /// Requests (`true`) or releases (`false`) API control authority over the vehicle.
    ///
    /// While API control is enabled the simulator ignores its own RC input for the
    /// vehicle and accepts commands through this interface only.
    fn enable_api_control(&self, enabled: bool) -> Result<(), AirSimError>;

    /// Arms (`true`) or disarms (`false`) the motors. Returns whether the simulator
    /// accepted the change.
    fn arm_disarm(&self, arm: bool) -> Result<bool, AirSimError>;

    /// Resets the simulation to its initial state.
    fn reset(&self) -> Result<(), AirSimError>;

    /// Snapshot of the vehicle's estimated kinematics and status.
    fn get_multirotor_state(&self) -> Result<MultirotorState, AirSimError>;

    /// Takes off and blocks until the vehicle is airborne or `timeout` expires on the
    /// simulator side.
    fn takeoff(&self, timeout: Duration) -> Result<(), AirSimError>;

    /// Holds the current position and blocks until the vehicle is stable.
    fn hover(&self) -> Result<(), AirSimError>;

    /// Returns the boundary region currently active in the simulator.
    fn sim_get_boundary(&self) -> Result<Boundary, AirSimError>;

    /// Switches the simulator between its built-in boundary and boundaries pushed through
    /// [MultirotorClient::sim_set_boundary].
    fn sim_enable_custom_boundary_data(&self, enabled: bool) -> Result<(), AirSimError>;

    /// Replaces the active custom boundary.
    fn sim_set_boundary(&self, boundary: &Boundary) -> Result<(), AirSimError>;
}
