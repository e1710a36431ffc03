pub mod fingerprint;
pub mod record;
pub mod recommendation;

pub use fingerprint::*;
pub use record::*;
pub use recommendation::*;
