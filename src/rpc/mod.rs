//! Transport-agnostic JSON-RPC 2.0 engine
//!
//! Framing, the payload codec, the fixed method registry and the dispatcher that ties them into
//! one request/response cycle. Both the stdio and the HTTP adapters drive this module.

pub mod codec;
pub mod dispatcher;
pub mod frame;
pub mod handlers;
pub mod registry;

pub use codec::{ErrorCode, Request, RequestId, Response, RpcError};
pub use dispatcher::Dispatcher;
pub use registry::{Method, MethodRegistry};
