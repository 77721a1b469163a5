pub mod campaign;
pub mod pitch;
pub mod playlist;
