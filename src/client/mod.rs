//! Admin-side list controllers and the gateways they talk to.

pub mod controller;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod form;
pub mod gateway;
pub mod http;
pub mod memory;
pub mod notify;
pub mod resource;
pub mod sample;
pub mod session;

pub use controller::{ControllerOptions, FilterMode, ListView, LoadPolicy, ResourceListController};
pub use error::{ClientError, RequestFailed};
pub use gateway::CrudGateway;
pub use http::{ApiClient, HttpGateway};
pub use memory::MemoryGateway;
pub use resource::Resource;
pub use session::{AuthState, Session, SessionStore};
