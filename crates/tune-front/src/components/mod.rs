pub mod favorites_list;
pub mod preview_modal;
pub mod results_panel;
pub mod search_bar;
