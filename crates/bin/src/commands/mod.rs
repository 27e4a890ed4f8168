pub mod health;
pub mod maps;
pub mod serve;
