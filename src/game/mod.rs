pub mod gameplay;
pub mod judgment;
pub mod note;
pub mod scoring;
pub mod timing_stats;
pub mod timing_windows;
pub mod track;
