//! `cs-spatial` — road network, rider profiles, and profile-weighted routing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`network`]   | `RoadNetwork` (CSR), `RoadNetworkBuilder`                 |
//! | [`attribute`] | `EdgeAttribute`, `EdgeAttributes`, `AttributeRanges`      |
//! | [`layout`]    | geographic projection and spring layout                   |
//! | [`profile`]   | `Profile`, `ProfileWeights`, `ProfileSet`                 |
//! | [`router`]    | `Router` trait, `Route`, `DijkstraRouter`, `fewest_hops`  |
//! | [`cache`]     | `RouteCache`, `RouteKey`, `CacheBudget`, `CacheStats`     |
//! | [`resolver`]  | `RouteResolver`, `ResolvedRoute`                          |
//! | [`loader`]    | `load_network_csv`, `load_network_reader`                 |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Forwards to `cs-core/serde`.                                 |

pub mod attribute;
pub mod cache;
pub mod error;
pub mod layout;
pub mod loader;
pub mod network;
pub mod profile;
pub mod resolver;
pub mod router;

#[cfg(test)]
mod tests;

pub use attribute::{AttributeRange, AttributeRanges, EdgeAttribute, EdgeAttributes};
pub use cache::{CacheBudget, CacheStats, RouteCache, RouteKey};
pub use error::{SpatialError, SpatialResult};
pub use loader::{load_network_csv, load_network_reader};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use profile::{Profile, ProfileSet, ProfileWeights, HOP_COST};
pub use resolver::{ResolvedRoute, RouteResolver};
pub use router::{fewest_hops, DijkstraRouter, Route, Router};
