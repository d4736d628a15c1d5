use html5ever::serialize::{serialize, SerializeOpts};
use markup5ever_rcdom::{RcDom, SerializableHandle};

use crate::core::WebOneError;

/// 序列化文档，输出始终为 UTF-8
pub fn serialize_document(dom: RcDom) -> Result<Vec<u8>, WebOneError> {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = dom.document.into();
    serialize(&mut buf, &serializable, SerializeOpts::default())
        .map_err(|e| WebOneError::Parse(format!("unable to serialize DOM: {}", e)))?;

    Ok(buf)
}
