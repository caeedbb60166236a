pub mod controller;
pub mod eigen;
pub mod frequency;
pub mod model;
pub mod polynomial;
pub mod simulator;
pub mod trajectory;
pub mod transfer_function;
