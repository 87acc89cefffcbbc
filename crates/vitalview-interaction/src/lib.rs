//! Network adapters for the VitalView chat endpoint.

pub mod http_transport;

pub use http_transport::HttpChatTransport;
