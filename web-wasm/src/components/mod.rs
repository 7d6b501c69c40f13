pub mod camera_view;
pub mod control_bar;
pub mod header;
pub mod result_view;
pub mod share_buttons;
pub mod status;
