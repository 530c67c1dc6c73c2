//! HTTP side of seedline: transport, interceptor chain, gateway and the
//! feature request services built on top of it.

pub mod gateway;
pub mod handler;
pub mod interceptor;
pub mod services;
pub mod testing;
pub mod transport;

pub use gateway::{ApiGateway, api_path};
pub use handler::RequestHandler;
pub use interceptor::AuthInterceptor;
pub use services::{AuthRequestService, FileRequestService, MessagingService, NodeRequestService};
pub use transport::ReqwestTransport;
