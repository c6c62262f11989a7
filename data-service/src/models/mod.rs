pub mod record;

pub use record::{
    created_at_now, parse_record_body, record_from_document, record_to_document, stamp_created_at,
    Record, CREATED_AT_FIELD,
};
