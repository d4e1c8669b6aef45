pub mod product;

pub use product::ProductInput;
