//! # idm-console-rpc
//!
//! JSON-RPC command and batch dispatch layer for the IdM management console.
//!
//! Every user action in the console boils down to a [`Command`]: a wire
//! method name (`entity_method`), ordered positional arguments, named
//! options and optional success/error callbacks. Commands execute over a
//! pluggable [`Transport`] against a single POST endpoint; failures are
//! routed through an [`ErrorDialog`] presented by the embedding shell's
//! [`DialogHost`], which may retry the same command object.
//!
//! [`BatchCommand`] submits many commands in one round trip and
//! demultiplexes the aggregate response positionally, collecting partial
//! failures without blocking sibling commands.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use idm_console_rpc::{AutoCancelDialogs, Command, HttpTransport, RpcClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new("https://idm.example.test/session/json".parse()?);
//! let client = RpcClient::new(Arc::new(transport), Arc::new(AutoCancelDialogs));
//!
//! let mut command = Command::for_entity("user", "show");
//! command.add_arg("admin");
//! command.set_option("all", true);
//!
//! let response = command.execute(&client).await.into_result()?;
//! if let Some(record) = response.record() {
//!     println!("{record}");
//! }
//! # Ok(())
//! # }
//! ```

mod batch;
mod client;
mod command;
mod dialog;
mod error;
mod transport;
mod types;

// Re-export error types
pub use error::{RpcError, RpcResult};

// Re-export the command layer
pub use batch::{BatchCommand, BatchError};
pub use command::{Command, ErrorCallback, Outcome, SuccessCallback};

// Re-export the presentation contract
pub use dialog::{AutoCancelDialogs, DialogAction, DialogButton, DialogHost, ErrorDialog};

// Re-export transport and client context
pub use client::{ActivityCounter, RpcClient};
pub use transport::{HttpTransport, Reply, Transport};

// Re-export wire types
pub use types::{Request, Response, ResponseError};
