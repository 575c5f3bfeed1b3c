pub mod application;
pub mod audit;
pub mod crop;
pub mod declaration;
pub mod dispatch;
pub mod init;
pub mod lab;
pub mod label;
pub mod order;
pub mod permit;
pub mod planting_return;
pub mod product;
pub mod role;
pub mod schema;
pub mod shared;
pub mod stock;
pub mod token;
pub mod trace;
pub mod user;
pub mod whoami;
