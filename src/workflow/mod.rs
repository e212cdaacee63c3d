pub mod interface;
pub mod langflow;
pub mod extract;

pub use interface::{WorkflowClient, WorkflowError, WorkflowRequest};
pub use langflow::LangflowClient;
pub use extract::extract_reply;
