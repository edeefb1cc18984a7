//! Read-side runtime: byte sources, the streaming reader, and generic items.

pub mod byte_source;
pub mod item;
pub mod reader;

pub use byte_source::{ByteSource, ReaderSource, SliceSource};
pub use item::{record_name_code, GenericItem, ItemField, RecordKey, RECORD_ID_TAG};
pub use reader::Iso8211Reader;
