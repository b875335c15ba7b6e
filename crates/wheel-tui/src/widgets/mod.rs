// TUI widget modules for each panel.

pub mod dialog;
pub mod pool_list;
pub mod selection;
pub mod status_bar;
pub mod wheel_panel;
