pub mod pane_chrome;
pub mod query_input;
pub mod toast;
