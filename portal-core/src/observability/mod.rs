pub mod logging;
pub mod trace_context;

pub use logging::{LogFormat, init_tracing};
pub use trace_context::{
    REQUEST_ID_HEADER, TracedClientExt, TracedRequest, extract_request_id, new_request_id,
};
