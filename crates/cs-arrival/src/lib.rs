//! `cs-arrival` — when and where cyclists appear.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`distribution`] | `ArrivalDistribution`, `DistributionKind`, `DistributionSpec` |
//! | [`picker`]       | `WeightedPicker` (probability-weighted choice)            |
//! | [`matrix`]       | `RouteMatrix` (origin → destination probabilities)        |
//! | [`generator`]    | `ArrivalGenerator`                                        |
//! | [`loader`]       | CSV loaders for profile, route and distribution tables    |
//! | [`error`]        | `ArrivalError`, `ArrivalResult<T>`                        |

pub mod distribution;
pub mod error;
pub mod generator;
pub mod loader;
pub mod matrix;
pub mod picker;


pub use distribution::{
    ArrivalDistribution, DistributionKind, DistributionSpec, FALLBACK_DELAY_SECS, MIN_DELAY_SECS,
};
pub use error::{ArrivalError, ArrivalResult};
pub use generator::ArrivalGenerator;
pub use loader::{
    load_distributions_csv, load_distributions_reader, load_profiles_csv, load_profiles_reader,
    load_route_matrix_csv, load_route_matrix_reader,
};
pub use matrix::RouteMatrix;
pub use picker::{WeightedPicker, PROBABILITY_TOLERANCE};
