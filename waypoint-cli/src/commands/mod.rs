pub mod player;
pub mod runs;
