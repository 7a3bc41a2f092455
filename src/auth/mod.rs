mod extractors;
pub mod token;

pub use extractors::AuthUser;
