mod property_roundtrip;
pub(crate) mod utils;
