pub mod config;
pub mod error;
pub mod likelihood;
pub mod presets;
pub mod profile;
pub mod scoring;
pub mod snapshot;
pub mod store;
pub mod weights;

pub use config::*;
pub use error::ProspectError;
pub use likelihood::*;
pub use profile::*;
pub use scoring::*;
pub use snapshot::*;
pub use store::*;
pub use weights::*;
