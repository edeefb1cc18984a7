//! ISO 8211 wire format: leaders and directories, field-type descriptors,
//! subfield values, data records, text encodings, and the record writer.

pub mod encode;
pub mod field_type;
pub mod leader;
pub mod record;
pub mod text;
pub mod value;

pub use encode::{DataRecordBuilder, DescriptiveRecordBuilder, FieldDefinition, FieldWriter};
pub use field_type::{
    parse_format_controls, DataStructureCode, DataTypeCode, FieldControl, FieldTypeDescriptor,
    FieldTypeTable, SubfieldKind, SubfieldType, FILE_CONTROL_TAG,
};
pub use leader::{DirectoryEntry, Leader, RecordHeader, FIELD_TERMINATOR, UNIT_TERMINATOR};
pub use record::{decode_record, DataRecord, Field};
pub use text::{TextEncoding, TextEncodings};
pub use value::{FromSubfield, SubfieldGroup, SubfieldValue};
