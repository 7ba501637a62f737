pub mod outcome_writer;
pub mod submission_reader;
