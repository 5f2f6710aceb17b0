// Reusable components live here.

pub mod entity_table;
pub mod error_banner;
pub mod form_fields;
pub mod header;
pub mod loading_spinner;
pub mod modal;
pub mod pagination;
pub mod section_card;
pub mod toast;
