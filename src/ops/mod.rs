pub mod entry_builder;
pub mod filter;
pub mod form;
pub mod labels;
