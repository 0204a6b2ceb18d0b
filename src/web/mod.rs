pub mod server;
pub mod view;

pub use server::WebServer;
