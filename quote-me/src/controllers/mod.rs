pub mod dev_proxy;
pub mod health;
pub mod quotes;
