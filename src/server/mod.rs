//! HTTP surface
//!
//! JSON endpoints for polls plus a Server-Sent Events stream per poll.
//!
//! | Method | Path                   | Handler                 |
//! |--------|------------------------|-------------------------|
//! | GET    | `/api/polls`           | list, newest first      |
//! | POST   | `/api/polls`           | create                  |
//! | GET    | `/api/polls/{id}`      | snapshot                |
//! | DELETE | `/api/polls/{id}`      | delete                  |
//! | POST   | `/api/polls/{id}/vote` | vote + broadcast        |
//! | GET    | `/events/{id}`         | live snapshots over SSE |
//!
//! List, get and create answer with a [`PollView`]; vote responses and
//! events carry the bare [`Poll`](crate::Poll) snapshot.

pub mod config;
pub mod error;
pub mod handlers;
pub mod listener;
pub mod routes;
pub mod state;
pub mod view;

pub use config::ServerConfig;
pub use error::ErrorResponse;
pub use handlers::{CreatePollRequest, VoteRequest};
pub use listener::PollServer;
pub use routes::router;
pub use state::AppState;
pub use view::{OptionView, PollView};
