pub mod embed;
pub mod validate;
