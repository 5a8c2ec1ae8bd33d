pub mod chat;
pub mod logging;
pub mod prefs;
pub mod selection;
pub mod source_list;
pub mod workflow;
