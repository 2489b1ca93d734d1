pub mod progress_bar;
pub mod puzzle_board;
pub mod score_panel;
pub mod topic_picker;
