//! Static soil classification

mod percolation;

pub use percolation::{assign_percolation_rates, TextureClass};
