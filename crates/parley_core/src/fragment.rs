//! Message fragments and the typed parts they carry.
//!
//! Both unions are closed but keep an explicit `Unknown` variant: data written
//! by a newer producer still deserializes and is dropped by the converter
//! with a diagnostic instead of failing the whole conversation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn new_fragment_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "ft")]
pub enum Fragment {
    #[serde(rename = "content")]
    Content {
        #[serde(rename = "fId", default = "new_fragment_id")]
        fid: String,
        part: Part,
    },
    #[serde(rename = "attachment")]
    Attachment {
        #[serde(rename = "fId", default = "new_fragment_id")]
        fid: String,
        #[serde(default)]
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        part: Part,
    },
    #[serde(rename = "_ft_sentinel")]
    Sentinel,
    #[serde(other)]
    Unknown,
}

impl Fragment {
    pub fn content(part: Part) -> Self {
        Fragment::Content {
            fid: new_fragment_id(),
            part,
        }
    }

    pub fn attachment(title: impl Into<String>, part: Part) -> Self {
        Fragment::Attachment {
            fid: new_fragment_id(),
            title: title.into(),
            caption: None,
            part,
        }
    }

    /// The carried part, for content and attachment fragments only.
    pub fn part(&self) -> Option<&Part> {
        match self {
            Fragment::Content { part, .. } | Fragment::Attachment { part, .. } => Some(part),
            Fragment::Sentinel | Fragment::Unknown => None,
        }
    }

    pub fn is_content(&self) -> bool {
        matches!(self, Fragment::Content { .. })
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Fragment::Content { .. } => "content",
            Fragment::Attachment { .. } => "attachment",
            Fragment::Sentinel => "_ft_sentinel",
            Fragment::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pt", rename_all = "snake_case")]
pub enum Part {
    Text {
        text: String,
    },
    ImageRef(ImageRefPart),
    Doc(DocPart),
    Error {
        error: String,
    },
    ToolCall(ToolCallPart),
    ToolResponse(ToolResponsePart),
    #[serde(rename = "ph")]
    Placeholder {
        #[serde(rename = "pText", default)]
        p_text: String,
    },
    #[serde(rename = "_pt_sentinel")]
    Sentinel,
    #[serde(other)]
    Unknown,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Part::Error {
            error: error.into(),
        }
    }

    pub fn image_ref(data_ref: DataRef) -> Self {
        Part::ImageRef(ImageRefPart::new(data_ref))
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Part::Placeholder {
            p_text: text.into(),
        }
    }

    /// Wire tag of this part, used in diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            Part::Text { .. } => "text",
            Part::ImageRef(_) => "image_ref",
            Part::Doc(_) => "doc",
            Part::Error { .. } => "error",
            Part::ToolCall(_) => "tool_call",
            Part::ToolResponse(_) => "tool_response",
            Part::Placeholder { .. } => "ph",
            Part::Sentinel => "_pt_sentinel",
            Part::Unknown => "unknown",
        }
    }

    /// Sentinels and placeholders never carry generation content.
    pub fn is_void(&self) -> bool {
        matches!(self, Part::Sentinel | Part::Placeholder { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRefPart {
    pub data_ref: DataRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ImageRefPart {
    pub fn new(data_ref: DataRef) -> Self {
        Self {
            data_ref,
            alt_text: None,
            width: None,
            height: None,
        }
    }
}

/// Where the bytes of an image live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reftype", rename_all = "snake_case")]
pub enum DataRef {
    /// Stored in the local asset store.
    Dblob {
        #[serde(
            rename = "dblobAssetId",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        dblob_asset_id: Option<String>,
        #[serde(rename = "mimeType", default)]
        mime_type: String,
        #[serde(rename = "bytesSize", default, skip_serializing_if = "Option::is_none")]
        bytes_size: Option<u64>,
    },
    Url {
        url: String,
        #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

impl DataRef {
    pub fn dblob(asset_id: impl Into<String>, mime_type: impl Into<String>) -> Self {
        DataRef::Dblob {
            dblob_asset_id: Some(asset_id.into()),
            mime_type: mime_type.into(),
            bytes_size: None,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        DataRef::Url {
            url: url.into(),
            mime_type: None,
        }
    }

    pub fn reftype(&self) -> &'static str {
        match self {
            DataRef::Dblob { .. } => "dblob",
            DataRef::Url { .. } => "url",
            DataRef::Unknown => "unknown",
        }
    }

    /// Mime type declared on the reference itself.
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            DataRef::Dblob { mime_type, .. } => Some(mime_type.as_str()),
            DataRef::Url { mime_type, .. } => mime_type.as_deref(),
            DataRef::Unknown => None,
        }
        .filter(|m| !m.is_empty())
    }
}

/// Fields a producer sent that this model does not name. Kept so parts that
/// pass through to the request come out unchanged.
pub type ExtraFields = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocPart {
    /// Mime type the document is presented as, e.g. `text/markdown`.
    pub vdt: String,
    pub data: DocData,
    #[serde(rename = "ref", default)]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l1_title: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl DocPart {
    pub fn new(
        vdt: impl Into<String>,
        text: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            vdt: vdt.into(),
            data: DocData {
                mime_type: None,
                text: text.into(),
                extra: ExtraFields::new(),
            },
            reference: reference.into(),
            l1_title: None,
            extra: ExtraFields::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub text: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallPart {
    pub id: String,
    pub call: ToolInvocation,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl ToolCallPart {
    pub fn function(id: impl Into<String>, name: impl Into<String>, args: Option<String>) -> Self {
        Self {
            id: id.into(),
            call: ToolInvocation::FunctionCall(FunctionCallInvocation {
                name: name.into(),
                args,
                extra: ExtraFields::new(),
            }),
            extra: ExtraFields::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "ctype", rename_all = "snake_case")]
pub enum ToolInvocation {
    FunctionCall(FunctionCallInvocation),
    CodeExecution(CodeExecutionInvocation),
    #[serde(other)]
    Unknown,
}

impl ToolInvocation {
    pub fn is_unknown(&self) -> bool {
        matches!(self, ToolInvocation::Unknown)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallInvocation {
    pub name: String,
    /// JSON-encoded arguments, if any.
    #[serde(default)]
    pub args: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeExecutionInvocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub code: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponsePart {
    pub id: String,
    pub response: ToolResponse,
    /// `false`, or an error flag/message reported by the tool runner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rtype", rename_all = "snake_case")]
pub enum ToolResponse {
    FunctionCall(FunctionCallResponse),
    CodeExecution(CodeExecutionResponse),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallResponse {
    pub name: String,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeExecutionResponse {
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_fragment_json() {
        let json = r#"{ "ft": "content", "fId": "f1", "part": { "pt": "text", "text": "hello" } }"#;
        let fragment: Fragment = serde_json::from_str(json).unwrap();
        assert!(fragment.is_content());
        assert_eq!(fragment.part(), Some(&Part::text("hello")));
    }

    #[test]
    fn test_attachment_fragment_json() {
        let json = r##"{
            "ft": "attachment",
            "fId": "f2",
            "title": "notes.md",
            "part": {
                "pt": "doc",
                "vdt": "text/markdown",
                "data": { "idt": "text", "text": "# Notes" },
                "ref": "notes.md",
                "l1Title": "Notes"
            }
        }"##;
        let fragment: Fragment = serde_json::from_str(json).unwrap();
        let Some(Part::Doc(doc)) = fragment.part() else {
            panic!("expected doc part");
        };
        assert_eq!(doc.vdt, "text/markdown");
        assert_eq!(doc.data.text, "# Notes");
        assert_eq!(doc.reference, "notes.md");
        assert_eq!(doc.l1_title.as_deref(), Some("Notes"));
    }

    #[test]
    fn test_unknown_fragment_and_part_tags() {
        let fragment: Fragment = serde_json::from_str(r#"{ "ft": "void" }"#).unwrap();
        assert_eq!(fragment, Fragment::Unknown);
        assert!(fragment.part().is_none());

        let part: Part = serde_json::from_str(r#"{ "pt": "hologram" }"#).unwrap();
        assert_eq!(part, Part::Unknown);
        assert_eq!(part.tag(), "unknown");
    }

    #[test]
    fn test_sentinel_and_placeholder_are_void() {
        let sentinel: Part = serde_json::from_str(r#"{ "pt": "_pt_sentinel" }"#).unwrap();
        assert!(sentinel.is_void());

        let ph: Part = serde_json::from_str(r#"{ "pt": "ph", "pText": "thinking..." }"#).unwrap();
        assert_eq!(ph, Part::placeholder("thinking..."));
        assert!(ph.is_void());

        assert!(!Part::text("x").is_void());
    }

    #[test]
    fn test_image_ref_dblob_json() {
        let json = r#"{
            "pt": "image_ref",
            "dataRef": { "reftype": "dblob", "dblobAssetId": "a1", "mimeType": "image/png", "bytesSize": 42 },
            "width": 640,
            "height": 480
        }"#;
        let part: Part = serde_json::from_str(json).unwrap();
        let Part::ImageRef(image) = part else {
            panic!("expected image_ref part");
        };
        assert_eq!(image.data_ref.reftype(), "dblob");
        assert_eq!(image.data_ref.mime_type(), Some("image/png"));
        assert_eq!(image.width, Some(640));
    }

    #[test]
    fn test_data_ref_mime_type_fallbacks() {
        assert_eq!(DataRef::url("https://x/y.png").mime_type(), None);
        assert_eq!(DataRef::dblob("a", "").mime_type(), None);
        assert_eq!(DataRef::Unknown.mime_type(), None);

        let unknown: DataRef = serde_json::from_str(r#"{ "reftype": "s3" }"#).unwrap();
        assert_eq!(unknown, DataRef::Unknown);
    }

    #[test]
    fn test_dblob_without_asset_id() {
        let data_ref: DataRef =
            serde_json::from_str(r#"{ "reftype": "dblob", "mimeType": "image/jpeg" }"#).unwrap();
        assert!(matches!(
            data_ref,
            DataRef::Dblob {
                dblob_asset_id: None,
                ..
            }
        ));
    }

    #[test]
    fn test_tool_call_and_response_json() {
        let call: Part = serde_json::from_str(
            r#"{ "pt": "tool_call", "id": "t1", "call": { "ctype": "function_call", "name": "search", "args": "{\"q\":\"rust\"}" } }"#,
        )
        .unwrap();
        assert_eq!(
            call,
            Part::ToolCall(ToolCallPart::function(
                "t1",
                "search",
                Some("{\"q\":\"rust\"}".to_string())
            ))
        );

        let response: Part = serde_json::from_str(
            r#"{ "pt": "tool_response", "id": "t1", "error": false, "response": { "rtype": "function_call", "name": "search", "result": "[]" } }"#,
        )
        .unwrap();
        assert_eq!(response.tag(), "tool_response");
    }

    #[test]
    fn test_text_part_serialization() {
        let json = serde_json::to_string(&Part::text("hi")).unwrap();
        assert_eq!(json, r#"{"pt":"text","text":"hi"}"#);
    }

    #[test]
    fn test_doc_part_keeps_unnamed_fields() {
        let json = serde_json::json!({
            "pt": "doc",
            "vdt": "text/markdown",
            "data": { "idt": "text", "text": "A" },
            "ref": "a.md",
            "l1Title": "A",
            "version": 3,
            "meta": { "srcFileName": "a.md" }
        });
        let part: Part = serde_json::from_value(json.clone()).unwrap();
        let Part::Doc(doc) = &part else {
            panic!("expected doc part");
        };
        assert_eq!(doc.extra.get("version"), Some(&Value::from(3)));
        assert_eq!(doc.data.extra.get("idt"), Some(&Value::from("text")));

        assert_eq!(serde_json::to_value(&part).unwrap(), json);
    }

    #[test]
    fn test_tool_call_keeps_unnamed_fields() {
        let json = serde_json::json!({
            "pt": "tool_call",
            "id": "t1",
            "call": {
                "ctype": "function_call",
                "name": "search",
                "args": "{}",
                "_description": "web search"
            }
        });
        let part: Part = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&part).unwrap(), json);
    }

    #[test]
    fn test_unknown_tool_shapes() {
        let call: ToolCallPart = serde_json::from_str(
            r#"{ "id": "t1", "call": { "ctype": "browser_action", "url": "https://x" } }"#,
        )
        .unwrap();
        assert!(call.call.is_unknown());

        let response: Part = serde_json::from_str(
            r#"{ "pt": "tool_response", "id": "t1", "response": { "rtype": "mcp_result", "payload": [] } }"#,
        )
        .unwrap();
        let Part::ToolResponse(response) = response else {
            panic!("expected tool_response part");
        };
        assert_eq!(response.response, ToolResponse::Unknown);
    }
}
