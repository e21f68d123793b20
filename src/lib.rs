//! rpcmock - stub matching engine for RPC mock servers
//!
//! The engine behind a protocol-mock server: generated server adapters
//! register canned responses ("stubs") per (service, method) and resolve
//! incoming requests against them, so clients and integration tests run
//! against a fake but protocol-correct service.
//!
//! # Features
//!
//! - **Rule Matching**: Match request payloads by deep equality, subset
//!   containment, or per-field regex
//! - **Metadata Routing**: Route the same payload to different stubs
//!   based on request metadata (e.g., per-tenant responses)
//! - **First-Match-Wins**: Stubs are tried in registration order
//! - **Closest-Match Diagnostics**: Failed lookups explain themselves by
//!   naming the most similar registered rule
//! - **Bulk Loading**: Load a directory of JSON/YAML stub files at
//!   startup
//!
//! # Example
//!
//! ```
//! use rpcmock::{FindQuery, Input, Meta, Output, Stub, StubStore};
//!
//! let store = StubStore::new();
//! store.register(Stub {
//!     service: "Greeter".to_string(),
//!     method: "Hello".to_string(),
//!     input: Input {
//!         equals: serde_json::json!({"name": "Ann"}).as_object().cloned(),
//!         ..Default::default()
//!     },
//!     meta: Meta::new(),
//!     output: Output {
//!         data: serde_json::json!({"message": "Hi Ann"})
//!             .as_object()
//!             .cloned()
//!             .unwrap(),
//!         error: None,
//!     },
//! });
//!
//! let output = store
//!     .resolve(&FindQuery {
//!         service: "Greeter".to_string(),
//!         method: "Hello".to_string(),
//!         data: serde_json::json!({"name": "Ann"})
//!             .as_object()
//!             .cloned()
//!             .unwrap(),
//!         meta: Meta::new(),
//!     })
//!     .unwrap();
//! assert_eq!(output.data["message"], "Hi Ann");
//! ```

pub mod diagnostic;
pub mod loader;
pub mod matcher;
pub mod storage;
pub mod stub;

pub use storage::{ResolveError, StoredStub, StubMapping, StubStore};
pub use stub::{Fields, FindQuery, Input, Meta, Output, Stub};
