mod init;
mod seed;
mod user;

pub use init::cmd_init;
pub use seed::{SeedReport, cmd_seed, seed_sample_data};
pub use user::cmd_create_user;
