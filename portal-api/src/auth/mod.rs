mod extractor;

pub use extractor::{Caller, USER_ID_HEADER, USER_ROLE_HEADER};
