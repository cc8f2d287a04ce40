//! Blocking prompts built on the console.

pub mod choice_list;
pub mod confirm;
pub mod line_input;
pub mod pause;

pub use choice_list::{select_many, select_one, ChoiceList, ChoiceMode};
pub use confirm::confirm_two_way;
pub use line_input::{read_line, read_line_counted, LineEditor, Submitted};
pub use pause::wait_for_enter;
