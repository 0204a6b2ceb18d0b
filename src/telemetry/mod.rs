pub mod engine;
pub mod random;
pub mod reading;
pub mod simulator;


pub use engine::{EngineHandle, StateObserver, TelemetryEngine};
pub use random::{RngSource, UnitSource};
pub use reading::{DistanceSample, EngineState, VehicleReading};
pub use simulator::TelemetrySimulator;
