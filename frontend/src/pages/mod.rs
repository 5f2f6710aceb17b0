pub mod dashboard;
pub mod entity_panel;
pub mod not_found;
pub mod term_form;
pub mod upload_results;
