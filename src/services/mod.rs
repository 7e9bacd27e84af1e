//! Services — the logic behind the registry handle, the agent socket, and
//! the relay hub. Route handlers and the transport loop call into these;
//! they never touch `ViewState` or `RelayState` fields directly.

pub mod agent_socket;
pub mod compose;
pub mod emitter;
pub mod local;
pub mod relay;
pub mod render;
pub mod view;
