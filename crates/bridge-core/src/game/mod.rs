pub mod deal;
pub mod rules;
pub mod state;
