pub mod locale;
pub mod result;
pub mod table;
