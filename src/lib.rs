pub mod command;
pub mod error;
pub mod relay;
pub mod reply;
pub mod request;
pub mod server;

mod session;

pub use command::Command;
pub use error::Error;
pub use reply::Reply;
pub use request::SocksRequest;
pub use server::Server;
