pub mod format_hms;
