pub mod framing;
pub mod params;
pub mod protocol;
pub mod server;

pub use server::ProspectServer;
