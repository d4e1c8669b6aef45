pub mod product;

pub use product::{ActiveModel as ProductActiveModel, Entity as Product, Model as ProductModel};
