mod report;

pub use report::write_session_report;
