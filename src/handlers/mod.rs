pub mod attempt_handler;

pub use attempt_handler::{
    abandon_attempt, attempts_left, complete_attempt, create_attempt, get_attempt, health_check,
    list_attempts, time_out_attempt,
};
