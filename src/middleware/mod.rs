pub mod error_handler;
pub mod request_id;
pub mod session;

pub use error_handler::{json_error_handler, query_error_handler, ErrorLogger};
pub use request_id::{RequestId, RequestIdValue, REQUEST_ID_HEADER};
pub use session::{
    hash_admin_token, verify_admin_token, SessionContext, SessionGate, ADMIN_TOKEN_HEADER,
};
