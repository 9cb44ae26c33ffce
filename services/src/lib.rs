pub mod config;
pub mod directions;
pub mod error;
pub mod planner;
pub mod radar;

pub use config::Config;
pub use directions::{DirectionsApi, DirectionsClient};
pub use error::Error;
pub use planner::{Planned, RoutePlanner};
pub use radar::{RadarClient, RadarPoller, RadarSource};
