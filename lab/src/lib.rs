pub mod arena;
pub mod profiles;
pub mod replay;
pub mod runner;
pub mod scenario;
pub mod settings;
pub mod sweep;
pub mod util;
