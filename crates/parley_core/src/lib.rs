pub mod conversation;
pub mod error;
pub mod fragment;
pub mod message;
pub mod request;

pub use conversation::Conversation;
pub use error::{CoreError, Result};
pub use fragment::{
    CodeExecutionInvocation, CodeExecutionResponse, DataRef, DocData, DocPart, ExtraFields,
    Fragment, FunctionCallInvocation, FunctionCallResponse, ImageRefPart, Part, ToolCallPart,
    ToolInvocation, ToolResponse, ToolResponsePart,
};
pub use message::{Message, MessageMetadata, Role};
pub use request::{
    GenerationRequest, OutputPart, SystemMessage, TextPart, Turn, TurnRole,
    create_inline_image_part, create_meta_reply_to_part,
};
