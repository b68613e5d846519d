mod time;

pub use time::{cmd_time, exit_code};
