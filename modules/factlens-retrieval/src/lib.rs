pub mod brave;

pub use brave::BraveSearch;
