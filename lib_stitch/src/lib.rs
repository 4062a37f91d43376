pub mod alignment_matrix;
pub mod alignment_result;
pub mod alphabet;
pub mod error;
pub mod hierarchy;
mod io;
pub mod phylogeny;
pub mod symbol;
pub mod tree;
