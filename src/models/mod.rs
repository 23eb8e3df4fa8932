//! The models module provides the queueing network model and its building
//! blocks - the network configuration, the station resources, and builders
//! for the classic scenarios.  Additionally, this module specifies the
//! requirements of any custom model, via the `QueueingModel` trait.

pub mod config;
pub mod model_trait;
pub mod network;
pub mod scenarios;
pub mod station;

pub use self::config::{
    Capacity, Discipline, GroupSizeConfig, NetworkConfig, RouteConfig, StageConfig, StationConfig,
};
pub use self::model_trait::{ModelRecord, Occupancy, QueueingModel};
pub use self::network::Network;
pub use self::scenarios::CafeteriaLayout;
pub use self::station::Resource;
