//! OData wire format
//!
//! Request model, `$batch` envelope encoding and response decoding. Nothing
//! in here touches the network.

pub mod batch;
pub mod decoder;
pub mod request;
pub mod response;

pub use batch::{BatchEncoder, BatchItem, BoundaryKind, Changeset, EncodedBody};
pub use decoder::{ResponseDecoder, decode_json_body};
pub use request::{APPLICATION_JSON, Method, ODataRequest, QueryOptions};
pub use response::{ParsedResponse, ResponseHeader, ResponseLeaf};
